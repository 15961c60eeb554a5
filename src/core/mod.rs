//! # Core Application Logic
//!
//! Muse's business logic. Nothing in here knows about the terminal.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Transcript (log)     │
//!                    │  • PromptForm           │
//!                    │  • Action / update()    │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!              ┌─────────────────┼─────────────────┐
//!              ▼                 ▼                 ▼
//!       ┌────────────┐    ┌────────────┐    ┌────────────┐
//!       │    TUI     │    │    CLI     │    │  Gateway   │
//!       │ (ratatui)  │    │ (one-shot) │    │ (reqwest)  │
//!       └────────────┘    └────────────┘    └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `Message` and `Role`, the only entity on the wire
//! - [`transcript`]: append-only conversation log for one feature page
//! - [`validation`]: the prompt schema
//! - [`form`]: prompt field plus the idle/submitting toggle
//! - [`feature`]: the feature pages and their backend endpoints
//! - [`state`]: the `App` struct
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: config file and override resolution

pub mod action;
pub mod config;
pub mod feature;
pub mod form;
pub mod message;
pub mod state;
pub mod transcript;
pub mod validation;
