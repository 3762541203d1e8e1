use std::time::Duration;
use tokio::time::sleep;

/// A fixed-delay rate limiter.
///
/// The pipeline's only throttling mechanism: every page fetch and every
/// send attempt is followed by one `pause`, unconditionally. Keeping the
/// policy behind this type means the loops never embed timing decisions.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Waits out the configured delay.
    pub async fn pause(&self) {
        sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pause_waits_the_configured_delay() {
        let throttle = Throttle::new(Duration::from_millis(50));

        let before = std::time::Instant::now();
        throttle.pause().await;

        assert!(before.elapsed() >= Duration::from_millis(50));
    }
}
