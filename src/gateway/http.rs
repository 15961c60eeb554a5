//! HTTP gateway to the backend proxy.
//!
//! The proxy is stateless: each call carries the complete transcript as
//! `{ "messages": [...] }` and answers with exactly one message object.
//! Replies are checked before they are handed to the app, so a non-assistant
//! role or missing content becomes a typed error instead of a bad transcript
//! entry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::message::{Message, Role};
use crate::gateway::{ExchangeGateway, ExchangeRequest, GatewayError, UsageSnapshot};

/// Header carrying the exchange id, so backend logs can be matched to ours.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// ============================================================================
// Wire Types
// ============================================================================

/// The request body.
#[derive(Serialize, Debug)]
struct ExchangeBody<'a> {
    messages: &'a [Message],
}

/// The reply as it comes off the wire, before shape checks.
#[derive(Deserialize, Debug)]
struct ReplyBody {
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

/// Checks a parsed reply and converts it into a transcript message.
fn accept_reply(reply: ReplyBody) -> Result<Message, GatewayError> {
    if reply.role != Role::Assistant {
        return Err(GatewayError::Malformed(format!(
            "expected role 'assistant', got '{}'",
            reply.role.label()
        )));
    }
    match reply.content {
        Some(content) => Ok(Message::assistant(content)),
        None => Err(GatewayError::Malformed("reply has no content".to_string())),
    }
}

fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

// ============================================================================
// Gateway Implementation
// ============================================================================

#[derive(Debug)]
pub struct HttpGateway {
    base_url: String,
    usage_path: Option<String>,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Builds a gateway for `base_url`. `timeout` of `None` waits forever.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        usage_path: Option<String>,
    ) -> Result<Self, GatewayError> {
        reqwest::Url::parse(base_url)
            .map_err(|e| GatewayError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            usage_path: usage_path.map(|p| p.trim_start_matches('/').to_string()),
            client,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ExchangeGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn exchange(&self, request: &ExchangeRequest) -> Result<Message, GatewayError> {
        let url = self.url_for(request.feature.endpoint());
        info!(
            "Exchange {}: POST {} ({} messages)",
            request.id,
            url,
            request.messages.len()
        );
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, request.id.to_string())
            .json(&ExchangeBody {
                messages: &request.messages,
            })
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        debug!("Exchange {} response status: {}", request.id, status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error for {}: {} - {}", request.id, status, err_body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let body = response.text().await.map_err(map_send_error)?;
        let reply: ReplyBody =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;
        let message = accept_reply(reply)?;

        info!(
            "Exchange {} done in {}ms ({} reply bytes)",
            request.id,
            started.elapsed().as_millis(),
            message.content.len()
        );
        Ok(message)
    }

    async fn usage(&self) -> Result<Option<UsageSnapshot>, GatewayError> {
        let Some(path) = &self.usage_path else {
            return Ok(None);
        };
        let url = self.url_for(path);
        debug!("Refreshing usage: GET {}", url);

        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(map_send_error)?;
        let snapshot: UsageSnapshot =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> ReplyBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_accepts_assistant_reply() {
        let msg = accept_reply(reply(r#"{"role":"assistant","content":"```jsx\n```"}"#)).unwrap();
        assert_eq!(msg, Message::assistant("```jsx\n```"));
    }

    #[test]
    fn test_rejects_user_role() {
        let err = accept_reply(reply(r#"{"role":"user","content":"echo"}"#)).unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
    }

    #[test]
    fn test_rejects_null_content() {
        let err = accept_reply(reply(r#"{"role":"assistant","content":null}"#)).unwrap_err();
        assert_eq!(err, GatewayError::Malformed("reply has no content".to_string()));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = HttpGateway::new("not a url", None, None);
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_url_joining_normalizes_slashes() {
        let gateway =
            HttpGateway::new("http://localhost:3000/", None, Some("/api/usage".into())).unwrap();
        assert_eq!(gateway.url_for("api/code"), "http://localhost:3000/api/code");
        assert_eq!(gateway.usage_path.as_deref(), Some("api/usage"));
    }

    #[test]
    fn test_body_shape() {
        let messages = vec![Message::user("hi")];
        let json = serde_json::to_value(ExchangeBody { messages: &messages }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "messages": [{ "role": "user", "content": "hi" }] })
        );
    }
}
