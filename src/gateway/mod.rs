//! # Gateway
//!
//! Everything that talks to the backend proxy. The app only sees the
//! [`ExchangeGateway`] trait; [`HttpGateway`] is the real implementation.
//!
//! The helpers here turn gateway results into core `Action`s, so the TUI and
//! the one-shot CLI drive the reducer the same way.

pub mod client;
pub mod http;

pub use client::{ExchangeGateway, ExchangeRequest, GatewayError, UsageSnapshot};
pub use http::HttpGateway;

use std::sync::Arc;

use log::warn;

use crate::core::action::Action;
use crate::core::config::ResolvedConfig;

/// Build the HTTP gateway from a resolved config.
pub fn build_gateway(config: &ResolvedConfig) -> Result<Arc<dyn ExchangeGateway>, GatewayError> {
    let gateway = HttpGateway::new(&config.base_url, config.timeout, config.usage_path.clone())?;
    Ok(Arc::new(gateway))
}

/// Runs one exchange and reports the outcome as an action for `update()`.
pub async fn run_exchange(gateway: Arc<dyn ExchangeGateway>, request: ExchangeRequest) -> Action {
    let id = request.id;
    match gateway.exchange(&request).await {
        Ok(reply) => Action::ExchangeSucceeded { id, reply },
        Err(error) => Action::ExchangeFailed { id, error },
    }
}

/// Fetches usage counters. Failures are logged and otherwise ignored.
pub async fn refresh_usage(gateway: Arc<dyn ExchangeGateway>) -> Option<Action> {
    match gateway.usage().await {
        Ok(snapshot) => snapshot.map(Action::UsageRefreshed),
        Err(e) => {
            warn!("Usage refresh failed: {}", e);
            None
        }
    }
}
