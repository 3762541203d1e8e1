use std::time::Instant;

use anyhow::Context;
use leadharvest::outreach::SmtpMailer;
use leadharvest::{sender, SenderConfig};
use tracing::info;

/// The outreach sender entry point.
///
/// Loads the configuration from the environment, collapses the lead table
/// into unique recipients and sends the campaign template to each one,
/// logging every outcome. Dry-run is the default; set `DRY_RUN=false` to
/// deliver for real.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = SenderConfig::from_env().context("sender startup")?;
    if config.dry_run {
        info!("Dry-run mode: sends are simulated");
    }

    let transport = SmtpMailer::new(&config);

    let start_time = Instant::now();
    let summary = sender::run(&config, transport).await?;
    let elapsed = start_time.elapsed();

    println!("\n=== Send Summary ===");
    println!("Unique recipients: {}", summary.recipients);
    println!("Sent: {}", summary.sent);
    println!("Failed: {}", summary.failed);
    println!("Processing time: {:.2?}", elapsed);

    Ok(())
}
