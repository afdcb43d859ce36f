//! Outbound email transport.
//!
//! The dispatcher composes messages; implementations of [`EmailSender`] only
//! move them. The SMTP sender is the production path, the console sender is
//! the local-development default when no SMTP server is configured, and the
//! memory sender records messages for tests.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub reply_to: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
            reply_to: None,
        }
    }
}

/// A fully composed message ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DomainError>;
}

/// Sends through an SMTP relay with lettre.
pub struct SmtpEmailSender {
    config: EmailConfig,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    // A fresh transport per send avoids holding pooled connections across
    // long idle stretches.
    fn build_transport(&self) -> Result<SmtpTransport, DomainError> {
        let tls_params = TlsParameters::new(self.config.smtp_server.clone())
            .map_err(|e| DomainError::Dispatch(format!("TLS setup failed: {e}")))?;

        Ok(SmtpTransport::relay(&self.config.smtp_server)
            .map_err(|e| DomainError::Dispatch(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build())
    }

    fn build_message(&self, email: &OutboundEmail) -> Result<Message, DomainError> {
        let mut builder = Message::builder()
            .from(
                self.config
                    .from_email
                    .parse::<Mailbox>()
                    .map_err(|e| DomainError::Dispatch(format!("invalid from address: {e}")))?,
            )
            .to(email
                .to
                .parse::<Mailbox>()
                .map_err(|e| DomainError::Dispatch(format!("invalid to address: {e}")))?);

        if let Some(reply_to) = &self.config.reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse::<Mailbox>()
                    .map_err(|e| DomainError::Dispatch(format!("invalid reply-to address: {e}")))?,
            );
        }

        builder
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| DomainError::Dispatch(format!("failed to build email: {e}")))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        let message = self.build_message(email)?;
        let transport = self.build_transport()?;

        // lettre's SmtpTransport is blocking; keep it off the runtime.
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| DomainError::Dispatch(format!("failed to send email: {e}")))
        })
        .await
        .map_err(|e| DomainError::Dispatch(format!("email task failed: {e}")))??;

        info!("Email sent to {}", email.to);
        Ok(())
    }
}

/// Logs instead of sending. Used when no SMTP server is configured.
pub struct ConsoleEmailSender;

#[async_trait]
impl EmailSender for ConsoleEmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        info!(
            "Email (console) to {}: {} | {}",
            email.to, email.subject, email.text_body
        );
        Ok(())
    }
}

/// Records messages for assertions in tests.
#[derive(Clone, Default)]
pub struct MemoryEmailSender {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl MemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailSender for MemoryEmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> OutboundEmail {
        OutboundEmail {
            to: "parent@example.com".to_string(),
            subject: "Your check-in QR codes".to_string(),
            text_body: "Alice: http://localhost/assets/a.png".to_string(),
            html_body: "<p>Alice</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_sender_records_messages() {
        let sender = MemoryEmailSender::new();
        sender.send(&sample_email()).await.expect("send");
        sender.send(&sample_email()).await.expect("send");

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "parent@example.com");
    }

    #[tokio::test]
    async fn test_console_sender_accepts_messages() {
        ConsoleEmailSender.send(&sample_email()).await.expect("send");
    }

    #[test]
    fn test_smtp_message_builds_with_reply_to() {
        let sender = SmtpEmailSender::new(EmailConfig {
            from_email: "events@example.com".to_string(),
            reply_to: Some("office@example.com".to_string()),
            ..EmailConfig::default()
        });
        sender.build_message(&sample_email()).expect("build");
    }

    #[test]
    fn test_smtp_message_rejects_bad_from() {
        let sender = SmtpEmailSender::new(EmailConfig::default());
        let err = sender.build_message(&sample_email()).expect_err("must fail");
        assert!(matches!(err, DomainError::Dispatch(_)));
    }
}
