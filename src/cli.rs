//! # One-shot mode
//!
//! `muse --prompt "..."` runs a single exchange without the TUI and prints
//! the reply's Markdown to stdout. It goes through the same reducer as the
//! interactive page, so validation and reply checks behave identically.

use std::io::{self, Write};
use std::sync::Arc;

use log::info;

use crate::core::action::{Action, Effect, update};
use crate::core::feature::Feature;
use crate::core::state::App;
use crate::gateway::{self, ExchangeGateway};

/// Runs one exchange. Returns `Ok(true)` when a reply was printed to `out`;
/// validation and gateway failures go to `err` and return `Ok(false)`.
pub async fn run_once(
    gateway: Arc<dyn ExchangeGateway>,
    feature: Feature,
    prompt: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let mut app = App::new(gateway, feature);
    update(&mut app, Action::PromptChanged(prompt.to_string()));

    let request = match update(&mut app, Action::Submit) {
        Effect::SpawnExchange(request) => request,
        _ => {
            if let Some(e) = app.form.error() {
                writeln!(err, "{}", e)?;
            }
            return Ok(false);
        }
    };

    let outcome = gateway::run_exchange(app.gateway.clone(), request).await;
    if update(&mut app, outcome) == Effect::RefreshUsage
        && let Some(action) = gateway::refresh_usage(app.gateway.clone()).await
    {
        update(&mut app, action);
    }

    if let Some(usage) = &app.usage {
        info!("Usage after exchange: {}", usage.label());
    }

    if let Some(failure) = &app.failure {
        writeln!(err, "error: {}", failure.message)?;
        if failure.retryable {
            writeln!(err, "(this error is usually temporary; try again)")?;
        }
        return Ok(false);
    }

    match app.transcript.messages().last() {
        Some(reply) => {
            writeln!(out, "{}", reply.content)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
