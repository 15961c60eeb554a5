//! # Actions
//!
//! Everything that can happen in Muse becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Backend answers? That's `Action::ExchangeSucceeded { .. }`.
//!
//! `update()` applies an action to the state and returns the `Effect` the
//! adapter must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::feature::Feature;
use crate::core::message::Message;
use crate::core::state::{App, ExchangeFailure, InFlight};
use crate::core::transcript::Transcript;
use crate::gateway::{ExchangeRequest, GatewayError, UsageSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The prompt field was edited.
    PromptChanged(String),
    Submit,
    ExchangeSucceeded { id: Uuid, reply: Message },
    ExchangeFailed { id: Uuid, error: GatewayError },
    /// User gave up waiting (Esc).
    CancelExchange,
    UsageRefreshed(UsageSnapshot),
    SwitchFeature(Feature),
    DismissError,
    Quit,
}

/// Side effects requested by `update()`, carried out by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnExchange(ExchangeRequest),
    /// Abort the running exchange task; its reply would be ignored anyway.
    AbortExchange,
    /// Re-fetch usage counters from the backend.
    RefreshUsage,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::PromptChanged(text) => {
            let had_error = app.form.error().is_some();
            if !app.form.set_value(text) {
                debug!("Prompt edit ignored while submitting");
            } else if had_error {
                app.status_message = String::from("Ready");
            }
            Effect::None
        }

        Action::Submit => {
            if app.form.is_submitting() {
                debug!("Submit ignored: exchange already in flight");
                return Effect::None;
            }
            let prompt = match app.form.begin_submit() {
                Ok(prompt) => prompt,
                Err(e) => {
                    debug!("Submit blocked: {}", e);
                    app.status_message = e.message;
                    return Effect::None;
                }
            };

            let user = Message::user(prompt);
            let request =
                ExchangeRequest::new(app.feature, app.transcript.with_pending(&user));
            info!(
                "Submitting {} prompt ({} messages in payload)",
                app.feature,
                request.messages.len()
            );
            app.in_flight = Some(InFlight {
                id: request.id,
                prompt: user,
            });
            app.failure = None;
            app.status_message = String::from("Generating...");
            Effect::SpawnExchange(request)
        }

        Action::ExchangeSucceeded { id, reply } => {
            let Some(in_flight) = take_matching(app, id) else {
                return Effect::None;
            };
            app.transcript.commit_exchange(in_flight.prompt, reply);
            app.form.finish(true);
            app.status_message = String::from("Ready");
            Effect::RefreshUsage
        }

        Action::ExchangeFailed { id, error } => {
            if take_matching(app, id).is_none() {
                return Effect::None;
            }
            warn!("Exchange {} failed: {}", id, error);
            app.form.finish(false);
            let failure = ExchangeFailure::from(&error);
            app.status_message = if failure.retryable {
                String::from("Request failed. Press Enter to retry.")
            } else {
                String::from("Request failed.")
            };
            app.failure = Some(failure);
            Effect::RefreshUsage
        }

        Action::CancelExchange => {
            let Some(in_flight) = app.in_flight.take() else {
                return Effect::None;
            };
            info!("Exchange {} cancelled by user", in_flight.id);
            app.form.finish(false);
            app.status_message = String::from("Cancelled");
            Effect::AbortExchange
        }

        Action::UsageRefreshed(snapshot) => {
            app.usage = Some(snapshot);
            Effect::None
        }

        Action::SwitchFeature(feature) => {
            if feature == app.feature {
                return Effect::None;
            }
            info!("Switching page: {} -> {}", app.feature, feature);
            let aborted = app.in_flight.take().is_some();
            app.feature = feature;
            app.transcript = Transcript::new();
            app.form.reset();
            app.failure = None;
            app.status_message = String::from("Ready");
            if aborted {
                Effect::AbortExchange
            } else {
                Effect::None
            }
        }

        Action::DismissError => {
            app.failure = None;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Takes the in-flight exchange if it matches `id`. Stale replies are logged and dropped.
fn take_matching(app: &mut App, id: Uuid) -> Option<InFlight> {
    match &app.in_flight {
        Some(in_flight) if in_flight.id == id => app.in_flight.take(),
        _ => {
            debug!("Dropping stale reply for exchange {}", id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::FormPhase;
    use crate::core::message::Role;
    use crate::test_support::test_app;

    /// Types `text` and submits it, returning the spawned request.
    fn submit(app: &mut App, text: &str) -> ExchangeRequest {
        update(app, Action::PromptChanged(text.to_string()));
        match update(app, Action::Submit) {
            Effect::SpawnExchange(request) => request,
            other => panic!("Expected SpawnExchange, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_prompt_blocks_submission() {
        let mut app = test_app();
        update(&mut app, Action::PromptChanged(String::new()));
        let effect = update(&mut app, Action::Submit);

        assert_eq!(effect, Effect::None);
        assert!(app.in_flight.is_none());
        assert_eq!(app.form.phase(), FormPhase::Idle);
        assert!(app.form.error().is_some());
        assert_eq!(app.status_message, "Prompt is required.");
    }

    #[test]
    fn test_editing_after_blocked_submit_restores_ready_status() {
        let mut app = test_app();
        update(&mut app, Action::Submit);
        assert_eq!(app.status_message, "Prompt is required.");

        update(&mut app, Action::PromptChanged("a toggle".into()));
        assert!(app.form.error().is_none());
        assert_eq!(app.status_message, "Ready");
    }

    #[test]
    fn test_submit_sends_history_plus_prompt() {
        let mut app = test_app();
        app.transcript
            .commit_exchange(Message::user("q1"), Message::assistant("a1"));

        let request = submit(&mut app, "  q2  ");

        assert_eq!(request.feature, Feature::Code);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2], Message::user("q2"));
        assert!(app.is_submitting());
        assert_eq!(app.transcript.len(), 2, "prompt not appended until reply");
    }

    #[test]
    fn test_toggle_button_scenario() {
        let mut app = test_app();
        let request = submit(&mut app, "A simple toggle button using React hooks");
        let reply = Message::assistant("```jsx\nconst [on, setOn] = useState(false);\n```");

        let effect = update(
            &mut app,
            Action::ExchangeSucceeded {
                id: request.id,
                reply: reply.clone(),
            },
        );

        assert_eq!(effect, Effect::RefreshUsage);
        assert_eq!(
            app.transcript.messages(),
            &[Message::user("A simple toggle button using React hooks"), reply]
        );
        assert_eq!(app.form.value(), "");
        assert!(!app.is_submitting());
    }

    #[test]
    fn test_network_failure_scenario() {
        let mut app = test_app();
        let request = submit(&mut app, "Piano solo");

        let effect = update(
            &mut app,
            Action::ExchangeFailed {
                id: request.id,
                error: GatewayError::Network("connection refused".into()),
            },
        );

        assert_eq!(effect, Effect::RefreshUsage);
        assert!(app.transcript.is_empty());
        assert!(!app.is_submitting());
        assert_eq!(app.form.value(), "Piano solo");
        let failure = app.failure.as_ref().unwrap();
        assert!(failure.retryable);
        assert!(failure.message.contains("connection refused"));
    }

    #[test]
    fn test_non_retryable_failure_status() {
        let mut app = test_app();
        let request = submit(&mut app, "x");
        update(
            &mut app,
            Action::ExchangeFailed {
                id: request.id,
                error: GatewayError::Malformed("no content".into()),
            },
        );
        assert_eq!(app.status_message, "Request failed.");
        assert!(!app.failure.as_ref().unwrap().retryable);
    }

    #[test]
    fn test_double_submit_ignored() {
        let mut app = test_app();
        submit(&mut app, "first");
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
    }

    #[test]
    fn test_edits_ignored_while_submitting() {
        let mut app = test_app();
        submit(&mut app, "first");
        update(&mut app, Action::PromptChanged("second".into()));
        assert_eq!(app.form.value(), "first");
    }

    #[test]
    fn test_stale_reply_ignored() {
        let mut app = test_app();
        let request = submit(&mut app, "hello");
        let effect = update(
            &mut app,
            Action::ExchangeSucceeded {
                id: Uuid::new_v4(),
                reply: Message::assistant("not for us"),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(app.transcript.is_empty());
        assert_eq!(app.in_flight.as_ref().map(|f| f.id), Some(request.id));
    }

    #[test]
    fn test_cancel_returns_to_idle_without_appending() {
        let mut app = test_app();
        let request = submit(&mut app, "hello");

        assert_eq!(update(&mut app, Action::CancelExchange), Effect::AbortExchange);
        assert!(!app.is_submitting());
        assert_eq!(app.form.value(), "hello");

        let late = update(
            &mut app,
            Action::ExchangeSucceeded {
                id: request.id,
                reply: Message::assistant("late"),
            },
        );
        assert_eq!(late, Effect::None);
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CancelExchange), Effect::None);
    }

    #[test]
    fn test_switch_feature_resets_page() {
        let mut app = test_app();
        app.transcript
            .commit_exchange(Message::user("q"), Message::assistant("a"));
        update(&mut app, Action::PromptChanged("draft".into()));

        let effect = update(&mut app, Action::SwitchFeature(Feature::Music));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.feature, Feature::Music);
        assert!(app.transcript.is_empty());
        assert_eq!(app.form.value(), "");
        assert_eq!(app.form.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_switch_feature_aborts_in_flight() {
        let mut app = test_app();
        submit(&mut app, "hello");
        let effect = update(&mut app, Action::SwitchFeature(Feature::Music));
        assert_eq!(effect, Effect::AbortExchange);
        assert!(app.in_flight.is_none());
        assert!(!app.is_submitting());
    }

    #[test]
    fn test_music_requests_use_music_feature() {
        let mut app = test_app();
        update(&mut app, Action::SwitchFeature(Feature::Music));
        let request = submit(&mut app, "Piano solo in the key of E");
        assert_eq!(request.feature, Feature::Music);
        assert_eq!(request.messages[0].role, Role::User);
    }

    #[test]
    fn test_usage_and_dismiss() {
        let mut app = test_app();
        let snapshot = UsageSnapshot { used: 2, limit: Some(5) };
        update(&mut app, Action::UsageRefreshed(snapshot));
        assert_eq!(app.usage, Some(snapshot));

        app.failure = Some(ExchangeFailure {
            message: "x".into(),
            retryable: false,
        });
        update(&mut app, Action::DismissError);
        assert!(app.failure.is_none());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
