//! Outbound SMS transport.
//!
//! Numbers are stored raw and normalized to E.164 only here, at dispatch
//! time, so the stored value always matches what was typed on the form.
//! The HTTP sender posts to a vendor-neutral gateway; console and memory
//! senders mirror the email module.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Gateway endpoint that accepts `{to, body, from}` JSON.
    pub gateway_url: String,
    pub auth_token: String,
    pub from: String,
}

/// Collapse a stored phone value to "+1" plus its digits.
/// "(555) 123-4567", "555-123-4567", and "5551234567" all come out as
/// "+15551234567". Garbage digits are the gateway's problem, not ours.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("+1{digits}")
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// `to` must already be normalized; `body` is the full message text.
    async fn send(&self, to: &str, body: &str) -> Result<(), DomainError>;
}

/// Posts messages to an HTTP SMS gateway.
pub struct HttpSmsSender {
    client: reqwest::Client,
    config: SmsConfig,
}

impl HttpSmsSender {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .post(&self.config.gateway_url)
            .bearer_auth(&self.config.auth_token)
            .json(&json!({
                "to": to,
                "body": body,
                "from": self.config.from,
            }))
            .send()
            .await
            .map_err(|e| DomainError::Dispatch(format!("SMS gateway unreachable: {e}")))?;

        response
            .error_for_status()
            .map_err(|e| DomainError::Dispatch(format!("SMS gateway rejected message: {e}")))?;

        info!("SMS sent to {}", to);
        Ok(())
    }
}

/// Logs instead of sending. Used when no gateway is configured.
pub struct ConsoleSmsSender;

#[async_trait]
impl SmsSender for ConsoleSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), DomainError> {
        info!("SMS (console) to {}: {}", to, body);
        Ok(())
    }
}

/// Records messages for assertions in tests.
#[derive(Clone, Default)]
pub struct MemorySmsSender {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemorySmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(to, body)` pairs in send order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl SmsSender for MemorySmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), DomainError> {
        self.sent
            .lock()
            .await
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}
