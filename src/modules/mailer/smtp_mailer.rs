use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::core::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Best-effort outbound notification gateway.
///
/// Callers must treat delivery failure as a reportable flag, never as a
/// reason to fail or roll back the business operation that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// SMTP notifier backed by lettre
pub struct SmtpMailer {
    server: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        let credentials = Credentials::new(config.username, config.password);
        Self {
            server: config.server,
            port: config.port,
            credentials,
            from_email: config.from_email,
            from_name: config.from_name,
        }
    }

    /// A fresh transport per message avoids connection pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport, NotifyError> {
        Ok(SmtpTransport::starttls_relay(&self.server)
            .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {}", e)))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Wrap the body in the service's standard HTML template
    fn html_body(body: &str) -> String {
        format!(
            "<html>\
               <body>\
                 <p>{}</p>\
                 <br>\
                 <p style=\"font-size:small;color:gray;\">\
                   This is an automated message from Campus Lost &amp; Found.\
                 </p>\
               </body>\
             </html>",
            body
        )
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| NotifyError::InvalidAddress(format!("from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| NotifyError::InvalidAddress(format!("to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(Self::html_body(body))
            .map_err(|e| NotifyError::BuildFailed(e.to_string()))?;

        let mailer = self.build_transport()?;

        // lettre's sync transport blocks on the SMTP round-trip
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map(|_| ())
                .map_err(|e| NotifyError::Transport(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Transport(format!("send task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_body_wraps_content() {
        let body = SmtpMailer::html_body("Your item has been claimed");
        assert!(body.starts_with("<html>"));
        assert!(body.contains("Your item has been claimed"));
        assert!(body.contains("automated message from Campus Lost"));
    }
}
