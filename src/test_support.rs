//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::feature::Feature;
use crate::core::message::Message;
use crate::core::state::App;
use crate::gateway::{ExchangeGateway, ExchangeRequest, GatewayError};

/// A gateway that answers every exchange with a canned result and
/// records the requests it saw.
pub struct StubGateway {
    reply: Result<Message, GatewayError>,
    pub seen: Mutex<Vec<ExchangeRequest>>,
}

impl StubGateway {
    pub fn replying(reply: Result<Message, GatewayError>) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ExchangeGateway for StubGateway {
    fn name(&self) -> &str {
        "stub"
    }

    async fn exchange(&self, request: &ExchangeRequest) -> Result<Message, GatewayError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Creates a test App on the code page with a stub gateway that replies "ok".
pub fn test_app() -> App {
    App::new(
        Arc::new(StubGateway::replying(Ok(Message::assistant("ok")))),
        Feature::Code,
    )
}
