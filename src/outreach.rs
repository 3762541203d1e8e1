use async_smtp::authentication::Credentials;
use async_smtp::{EmailAddress, Envelope, SendableEmail, SmtpClient, SmtpTransport};
use tokio::io::BufStream;
use tokio::net::TcpStream;
use tracing::debug;

use crate::{HarvestError, Result, SenderConfig};

/// A single outbound message, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The seam between the send loop and the wire.
///
/// Live runs go through [`SmtpMailer`]; tests substitute a recording fake.
#[allow(async_fn_in_trait)]
pub trait MailTransport {
    async fn deliver(&self, mail: &OutboundEmail) -> Result<()>;
}

impl<T: MailTransport> MailTransport for &T {
    async fn deliver(&self, mail: &OutboundEmail) -> Result<()> {
        (**self).deliver(mail).await
    }
}

/// The `SmtpMailer` struct delivers mail over SMTP, opening one connection
/// per send. It speaks plain TCP; the configured relay owns TLS.
pub struct SmtpMailer {
    host: String,
    port: u16,
    user: String,
    password: String,
    from_name: String,
}

impl SmtpMailer {
    pub fn new(config: &SenderConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            user: config.smtp_user.clone(),
            password: config.smtp_password.clone(),
            from_name: config.from_name.clone(),
        }
    }

    /// Renders the message headers and body. The display name goes into the
    /// From header; the envelope sender stays the bare account address.
    fn format_message(&self, mail: &OutboundEmail) -> String {
        format!(
            "From: \"{}\" <{}>\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
            self.from_name, self.user, mail.to, mail.subject, mail.body
        )
    }
}

impl MailTransport for SmtpMailer {
    async fn deliver(&self, mail: &OutboundEmail) -> Result<()> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(transport_err)?;

        let client = SmtpClient::new()
            .credentials(Credentials::new(self.user.clone(), self.password.clone()));
        let mut transport = SmtpTransport::new(client, BufStream::new(stream))
            .await
            .map_err(transport_err)?;

        let envelope = Envelope::new(
            Some(self.user.parse::<EmailAddress>().map_err(transport_err)?),
            vec![mail.to.parse::<EmailAddress>().map_err(transport_err)?],
        )
        .map_err(transport_err)?;
        let email = SendableEmail::new(envelope, self.format_message(mail));

        transport.send(email).await.map_err(transport_err)?;
        transport.quit().await.map_err(transport_err)?;

        Ok(())
    }
}

fn transport_err(e: impl std::fmt::Display) -> HarvestError {
    HarvestError::MailError(e.to_string())
}

/// The `Outreach` struct sends the fixed campaign template to one recipient
/// at a time through whatever transport it was given.
pub struct Outreach<T> {
    transport: T,
    dry_run: bool,
    subject: String,
    body: String,
}

impl<T: MailTransport> Outreach<T> {
    pub fn new(config: &SenderConfig, transport: T) -> Self {
        Self {
            transport,
            dry_run: config.dry_run,
            subject: config.subject.clone(),
            body: config.body.clone(),
        }
    }

    /// Sends the template to a single recipient.
    ///
    /// In dry-run mode this reports success immediately and the transport
    /// is never contacted. A live transport error is returned as a value;
    /// the run loop logs it and records the attempt as failed.
    pub async fn dispatch(&self, to: &str) -> Result<()> {
        if self.dry_run {
            debug!("Dry-run, would send to {}", to);
            return Ok(());
        }

        let mail = OutboundEmail {
            to: to.to_string(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        };
        self.transport.deliver(&mail).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;

    fn test_config(dry_run: bool) -> SenderConfig {
        SenderConfig {
            smtp_user: "me@gmail.com".to_string(),
            smtp_password: "app-password".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            dry_run,
            leads_file: "leads.csv".to_string(),
            sent_file: "sent.csv".to_string(),
            from_name: "Outreach".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            send_delay: std::time::Duration::from_millis(0),
        }
    }

    #[tokio::test]
    async fn test_dry_run_never_contacts_transport() {
        let config = test_config(true);
        let outreach = Outreach::new(&config, RecordingTransport::new(false));

        outreach.dispatch("x@y.com").await.unwrap();

        assert!(outreach.transport.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_live_dispatch_renders_the_template() {
        let config = test_config(false);
        let outreach = Outreach::new(&config, RecordingTransport::new(false));

        outreach.dispatch("x@y.com").await.unwrap();

        let calls = outreach.transport.calls.borrow();
        assert_eq!(
            *calls,
            vec![OutboundEmail {
                to: "x@y.com".to_string(),
                subject: "Hello".to_string(),
                body: "Body".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_transport_errors_surface_as_values() {
        let config = test_config(false);
        let outreach = Outreach::new(&config, RecordingTransport::new(true));

        let result = outreach.dispatch("x@y.com").await;

        assert!(matches!(result, Err(HarvestError::MailError(_))));
    }

    #[test]
    fn test_message_carries_display_name_from() {
        let mailer = SmtpMailer::new(&test_config(false));
        let message = mailer.format_message(&OutboundEmail {
            to: "x@y.com".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
        });

        assert!(message.starts_with("From: \"Outreach\" <me@gmail.com>\r\n"));
        assert!(message.contains("\r\nTo: x@y.com\r\n"));
        assert!(message.contains("\r\nSubject: Hello\r\n\r\nBody"));
    }
}
