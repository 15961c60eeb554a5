use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::feature::Feature;
use crate::core::message::Message;

/// Errors that can occur while talking to the backend proxy.
/// Each variant knows whether a user-initiated retry makes sense.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Gateway misconfigured (bad base URL, client build failure). Not retryable.
    Config(String),
    /// Network-level failure (DNS, connection refused, reset). Retryable.
    Network(String),
    /// No response within the configured timeout. Retryable.
    Timeout,
    /// Backend answered with a non-2xx status. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Body was not valid JSON for the expected shape. Not retryable.
    Parse(String),
    /// Body parsed but is not an acceptable reply (wrong role, missing content). Not retryable.
    Malformed(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) | GatewayError::Timeout => true,
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Config(_) | GatewayError::Parse(_) | GatewayError::Malformed(_) => false,
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Config(msg) => write!(f, "config error: {msg}"),
            GatewayError::Network(msg) => write!(f, "network error: {msg}"),
            GatewayError::Timeout => write!(f, "request timed out"),
            GatewayError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            GatewayError::Parse(msg) => write!(f, "parse error: {msg}"),
            GatewayError::Malformed(msg) => write!(f, "malformed reply: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// One round trip: the full transcript (history plus the new prompt) for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRequest {
    /// Correlation id. Replies for an id the app no longer waits on are dropped.
    pub id: Uuid,
    pub feature: Feature,
    pub messages: Vec<Message>,
}

impl ExchangeRequest {
    pub fn new(feature: Feature, messages: Vec<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            feature,
            messages,
        }
    }
}

/// Generation counters as reported by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub used: u32,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl UsageSnapshot {
    /// Short label for the title bar, e.g. `3/5 generations`.
    pub fn label(&self) -> String {
        match self.limit {
            Some(limit) => format!("{}/{} generations", self.used, limit),
            None => format!("{} generations", self.used),
        }
    }
}

#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Returns the name of the gateway.
    fn name(&self) -> &str;

    /// Sends the request and returns the assistant's reply.
    async fn exchange(&self, request: &ExchangeRequest) -> Result<Message, GatewayError>;

    /// Fetches current usage counters. `Ok(None)` when the backend exposes none.
    async fn usage(&self) -> Result<Option<UsageSnapshot>, GatewayError> {
        Ok(None)
    }
}
