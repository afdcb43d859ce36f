//! Credential delivery over email and SMS.
//!
//! Lookups key on the contact value exactly as stored; all matching
//! registrants are aggregated into one outbound message per request.

use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::notifications::{
    DispatchOutcome, EmailCredentialsCommand, RegistrantSummary, TextCredentialsCommand,
};
use crate::domain::email::{EmailSender, OutboundEmail};
use crate::domain::errors::DomainError;
use crate::domain::models::Registrant;
use crate::domain::sms::{normalize_phone, SmsSender};
use crate::storage::RegistrantStorage;

/// Knobs for outbound credential messages.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub email_subject: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email_subject: "Your check-in QR codes".to_string(),
        }
    }
}

/// Service for sending stored credentials to a guardian's contact address
#[derive(Clone)]
pub struct NotificationService {
    registrants: Arc<dyn RegistrantStorage>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
    config: NotificationConfig,
}

impl NotificationService {
    pub fn new(
        registrants: Arc<dyn RegistrantStorage>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            registrants,
            email,
            sms,
            config,
        }
    }

    /// Email every credential registered under the given address, as one
    /// message. No matches is a no-op, not an error.
    pub async fn email_credentials(
        &self,
        command: EmailCredentialsCommand,
    ) -> Result<DispatchOutcome, DomainError> {
        if !command.actor.can_send_credentials() {
            return Err(DomainError::Authorization("send credentials".to_string()));
        }

        info!("Emailing credentials to {}", command.email);

        let matches = self
            .registrants
            .list_by_email(&command.email)
            .await
            .map_err(DomainError::Persistence)?;

        let matched = matches.len();
        if matched == 0 {
            info!("No registrants for email {}", command.email);
            return Ok(DispatchOutcome {
                matched: 0,
                dispatched: false,
            });
        }

        let summaries = self.summaries(&matches);
        if summaries.is_empty() {
            warn!(
                "All {} registrants for {} are still pending, nothing to send",
                matched, command.email
            );
            return Ok(DispatchOutcome {
                matched,
                dispatched: false,
            });
        }

        self.send_email(&command.email, &summaries).await?;

        Ok(DispatchOutcome {
            matched,
            dispatched: true,
        })
    }

    /// Text every credential registered under the given phone number, as one
    /// message.
    pub async fn text_credentials(
        &self,
        command: TextCredentialsCommand,
    ) -> Result<DispatchOutcome, DomainError> {
        if !command.actor.can_send_credentials() {
            return Err(DomainError::Authorization("send credentials".to_string()));
        }

        info!("Texting credentials to {}", command.phone);

        let matches = self
            .registrants
            .list_by_phone(&command.phone)
            .await
            .map_err(DomainError::Persistence)?;

        let matched = matches.len();
        if matched == 0 {
            info!("No registrants for phone {}", command.phone);
            return Ok(DispatchOutcome {
                matched: 0,
                dispatched: false,
            });
        }

        let summaries = self.summaries(&matches);
        if summaries.is_empty() {
            warn!(
                "All {} registrants for {} are still pending, nothing to send",
                matched, command.phone
            );
            return Ok(DispatchOutcome {
                matched,
                dispatched: false,
            });
        }

        self.send_text(&command.phone, &summaries).await?;

        Ok(DispatchOutcome {
            matched,
            dispatched: true,
        })
    }

    /// Format and send one credentials email.
    pub async fn send_email(
        &self,
        to: &str,
        summaries: &[RegistrantSummary],
    ) -> Result<(), DomainError> {
        let outbound = OutboundEmail {
            to: to.to_string(),
            subject: self.config.email_subject.clone(),
            text_body: format_text_body(summaries),
            html_body: format_html_body(summaries),
        };
        self.email.send(&outbound).await?;

        info!("Sent credentials email to {}", to);
        Ok(())
    }

    /// Format and send one credentials SMS. The destination is normalized
    /// here, at dispatch time; stored numbers keep whatever the form held.
    pub async fn send_text(
        &self,
        to: &str,
        summaries: &[RegistrantSummary],
    ) -> Result<(), DomainError> {
        let normalized = normalize_phone(to);
        self.sms.send(&normalized, &format_sms_body(summaries)).await?;

        info!("Sent credentials text to {}", normalized);
        Ok(())
    }

    /// One summary line per registrant that actually has a credential.
    fn summaries(&self, registrants: &[Registrant]) -> Vec<RegistrantSummary> {
        registrants
            .iter()
            .filter_map(|registrant| match &registrant.credential {
                Some(url) => Some(RegistrantSummary {
                    label: registrant.name.clone(),
                    credential_ref: url.clone(),
                }),
                None => {
                    warn!(
                        "Registrant {} has no credential yet, skipping",
                        registrant.id
                    );
                    None
                }
            })
            .collect()
    }
}

fn format_text_body(summaries: &[RegistrantSummary]) -> String {
    let mut body =
        String::from("You have been registered. Below are links to the QR codes for check-in:\n");
    for summary in summaries {
        body.push_str(&format!("  {}: {}\n", summary.label, summary.credential_ref));
    }
    body
}

fn format_html_body(summaries: &[RegistrantSummary]) -> String {
    let mut body = String::from(
        "<html>\n  <body>\n    <p>You have been registered. Below are the QR codes for check-in:</p>\n",
    );
    for summary in summaries {
        body.push_str(&format!(
            "    <p>{}</p>\n    <img src=\"{}\" alt=\"{} check-in QR code\">\n",
            summary.label, summary.credential_ref, summary.label
        ));
    }
    body.push_str("  </body>\n</html>\n");
    body
}

fn format_sms_body(summaries: &[RegistrantSummary]) -> String {
    let mut lines = vec!["Your check-in QR codes:".to_string()];
    for summary in summaries {
        lines.push(format!("{}: {}", summary.label, summary.credential_ref));
    }
    lines.join("\n")
}
