use std::path::Path;

use tracing::{error, info};

use crate::outreach::{MailTransport, Outreach};
use crate::store::{read_recipients, SentLog};
use crate::throttle::Throttle;
use crate::{HarvestError, Result, SendStatus, SendSummary, SenderConfig, SentRecord};

/// Runs one full send pass over the lead table.
///
/// Recipients are collapsed to one attempt each (last query wins), sends
/// are strictly serialized with a fixed pause between them, and every
/// attempt's outcome is appended to the sent log before the next attempt
/// starts. A failed send is terminal for this run; later recipients are
/// unaffected.
pub async fn run<T: MailTransport>(config: &SenderConfig, transport: T) -> Result<SendSummary> {
    let leads_path = Path::new(&config.leads_file);
    if !leads_path.exists() {
        return Err(HarvestError::ConfigError(format!(
            "Lead table not found: {}",
            config.leads_file
        )));
    }

    let recipients = read_recipients(leads_path)?;
    info!("Unique valid recipients: {}", recipients.len());

    let mut summary = SendSummary {
        recipients: recipients.len(),
        ..Default::default()
    };

    if recipients.is_empty() {
        info!("No valid emails found, nothing to send");
        return Ok(summary);
    }

    let outreach = Outreach::new(config, transport);
    let sent_log = SentLog::new(config.sent_file.as_str());
    let throttle = Throttle::new(config.send_delay);

    for (email, query) in &recipients {
        let status = match outreach.dispatch(email).await {
            Ok(()) => {
                info!("Sent to {}", email);
                summary.sent += 1;
                SendStatus::Sent
            }
            Err(e) => {
                error!("Send failed for {}: {}", email, e);
                summary.failed += 1;
                SendStatus::Failed
            }
        };

        sent_log.record(&SentRecord {
            email: email.clone(),
            status,
            query: query.clone(),
        })?;

        throttle.pause().await;
    }

    info!(
        "Send run complete: {} sent, {} failed",
        summary.sent, summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outreach::testing::RecordingTransport;
    use std::time::Duration;

    fn test_config(dir: &Path, dry_run: bool) -> SenderConfig {
        SenderConfig {
            smtp_user: "me@gmail.com".to_string(),
            smtp_password: "app-password".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            dry_run,
            leads_file: dir.join("leads.csv").to_string_lossy().into_owned(),
            sent_file: dir.join("sent.csv").to_string_lossy().into_owned(),
            from_name: "Outreach".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            send_delay: Duration::from_millis(0),
        }
    }

    fn write_leads(dir: &Path, rows: &str) {
        std::fs::write(
            dir.join("leads.csv"),
            format!("Query,Website,Email\n{}", rows),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_dry_run_sends_once_per_recipient_with_last_query() {
        let dir = tempfile::tempdir().unwrap();
        write_leads(
            dir.path(),
            "q1,http://a.test,x@y.com\nq2,http://b.test,x@y.com\n",
        );

        let config = test_config(dir.path(), true);
        let transport = RecordingTransport::new(false);
        let summary = run(&config, &transport).await.unwrap();

        assert_eq!(summary.recipients, 1);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 0);
        assert!(transport.calls.borrow().is_empty());

        let sent = std::fs::read_to_string(dir.path().join("sent.csv")).unwrap();
        assert_eq!(sent, "Email,Status,Query\nx@y.com,Sent,q2\n");
    }

    #[tokio::test]
    async fn test_transport_failure_is_terminal_per_recipient_only() {
        let dir = tempfile::tempdir().unwrap();
        write_leads(
            dir.path(),
            "q1,http://a.test,a@y.com\nq2,http://b.test,b@y.com\n",
        );

        let config = test_config(dir.path(), false);
        let transport = RecordingTransport::new(true);
        let summary = run(&config, &transport).await.unwrap();

        assert_eq!(summary.sent, 0);
        assert_eq!(summary.failed, 2);
        assert_eq!(transport.calls.borrow().len(), 2);

        let sent = std::fs::read_to_string(dir.path().join("sent.csv")).unwrap();
        assert_eq!(
            sent,
            "Email,Status,Query\na@y.com,Failed,q1\nb@y.com,Failed,q2\n"
        );
    }

    #[tokio::test]
    async fn test_missing_lead_table_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);

        let result = run(&config, &RecordingTransport::new(false)).await;

        assert!(matches!(result, Err(HarvestError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_no_valid_recipients_completes_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        write_leads(dir.path(), "q1,http://a.test,user@domain.com\n");

        let config = test_config(dir.path(), true);
        let summary = run(&config, &RecordingTransport::new(false)).await.unwrap();

        assert_eq!(summary, SendSummary::default());
        assert!(!dir.path().join("sent.csv").exists());
    }
}
