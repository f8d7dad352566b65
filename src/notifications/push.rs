use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error code the dispatch endpoint returns for a token that must be pruned.
pub const DEVICE_NOT_REGISTERED: &str = "DeviceNotRegistered";

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push endpoint returned HTTP {0}")]
    Endpoint(u16),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushTicketDetails {
    pub error: Option<String>,
}

/// Per-message delivery status, parallel to the submitted batch.
#[derive(Debug, Clone, Deserialize)]
pub struct PushTicket {
    pub status: String,
    pub id: Option<String>,
    pub message: Option<String>,
    pub details: Option<PushTicketDetails>,
}

impl PushTicket {
    pub fn ok(&self) -> bool {
        self.status == "ok"
    }

    pub fn error_code(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.error.as_deref())
    }
}

#[async_trait]
pub trait PushClient: Send + Sync {
    /// Submit one batch; the returned tickets are index-aligned with `messages`.
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    data: Vec<PushTicket>,
}

/// Expo-compatible HTTP dispatcher.
#[derive(Clone)]
pub struct ExpoPush {
    http: reqwest::Client,
    endpoint: String,
}

impl ExpoPush {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl PushClient for ExpoPush {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(messages)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PushError::Endpoint(resp.status().as_u16()));
        }
        let parsed: PushResponse = resp.json().await?;
        debug!(count = parsed.data.len(), "push tickets received");
        Ok(parsed.data)
    }
}
