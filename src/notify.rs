//! Best-effort push notification dispatch
//!
//! The ledger depends on the `NotificationSender` port, not a concrete
//! client; production wires in `FcmSender`, unconfigured deployments and
//! tests get `NoopSender`. Delivery is fire-and-forget: `dispatch` spawns
//! the send off the request path and swallows every failure. A push that
//! cannot be delivered must never fail or roll back the financial
//! transaction that triggered it.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("push request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("push rejected with status {0}")]
    Rejected(u16),
}

/// Outbound push port. One-way; there is no acknowledgment path back into
/// the caller's transaction.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// FCM legacy HTTP sender.
pub struct FcmSender {
    http: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmSender {
    pub fn new(endpoint: String, server_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            server_key,
        }
    }
}

#[async_trait]
impl NotificationSender for FcmSender {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "to": device_token,
            "notification": {
                "title": title,
                "body": body,
            },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Sender used when no FCM key is configured. Logs and drops.
pub struct NoopSender;

#[async_trait]
impl NotificationSender for NoopSender {
    async fn send(&self, _device_token: &str, title: &str, _body: &str) -> Result<(), NotifyError> {
        tracing::debug!(title = %title, "push dispatch skipped (no sender configured)");
        Ok(())
    }
}

/// Dispatch a push to a device token, off the request path.
///
/// A `None` token (actor has no registered device) is silently skipped.
/// Failures are logged at warn and swallowed.
pub fn dispatch(
    sender: Arc<dyn NotificationSender>,
    device_token: Option<String>,
    title: String,
    body: String,
) {
    let Some(token) = device_token.filter(|t| !t.is_empty()) else {
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = sender.send(&token, &title, &body).await {
            tracing::warn!(error = %e, title = %title, "push delivery failed, dropping");
        }
    });
}
