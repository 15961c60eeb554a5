//! # Application State
//!
//! Core business state for Muse. Presentation state (cursor position,
//! scroll offsets) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── gateway: Arc<dyn ExchangeGateway>  // backend proxy
//! ├── feature: Feature                   // active page
//! ├── transcript: Transcript             // page-local conversation
//! ├── form: PromptForm                   // prompt field + idle/submitting
//! ├── in_flight: Option<InFlight>        // exchange awaiting a reply
//! ├── status_message: String             // status bar text
//! ├── failure: Option<ExchangeFailure>   // last surfaced exchange error
//! └── usage: Option<UsageSnapshot>       // backend usage counters
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::ResolvedConfig;
use crate::core::feature::Feature;
use crate::core::form::PromptForm;
use crate::core::message::Message;
use crate::core::transcript::Transcript;
use crate::gateway::{ExchangeGateway, GatewayError, UsageSnapshot};

/// The exchange currently awaiting a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct InFlight {
    pub id: Uuid,
    /// Joins the transcript only once the reply arrives.
    pub prompt: Message,
}

/// A failed exchange, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeFailure {
    pub message: String,
    pub retryable: bool,
}

impl From<&GatewayError> for ExchangeFailure {
    fn from(error: &GatewayError) -> Self {
        Self {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

pub struct App {
    pub gateway: Arc<dyn ExchangeGateway>,
    pub feature: Feature,
    pub transcript: Transcript,
    pub form: PromptForm,
    pub in_flight: Option<InFlight>,
    pub status_message: String,
    pub failure: Option<ExchangeFailure>,
    pub usage: Option<UsageSnapshot>,
}

impl App {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, feature: Feature) -> Self {
        Self {
            gateway,
            feature,
            transcript: Transcript::new(),
            form: PromptForm::new(),
            in_flight: None,
            status_message: String::from("Ready"),
            failure: None,
            usage: None,
        }
    }

    pub fn from_config(gateway: Arc<dyn ExchangeGateway>, config: &ResolvedConfig) -> Self {
        Self::new(gateway, config.feature)
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }
}
