//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! `update()` never does I/O. When it returns `Effect::SpawnExchange` the
//! loop spawns a tokio task that calls the gateway and sends the resulting
//! action back over an mpsc channel. The task's abort handle is kept so Esc
//! (or a page switch) can drop the request.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (exchange in flight): draws every ~80ms for the spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize, or
//!   background actions.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::state::App;
use crate::gateway;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(app.feature.placeholder()),
        }
    }

    /// Copy props from core state into the components.
    pub fn sync(&mut self, app: &App) {
        self.input_box.disabled = app.is_submitting();
        self.input_box.placeholder = app.feature.placeholder();
        self.input_box.error = app.form.error().map(|e| e.message.clone());
        self.input_box.sync(app.form.value());
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Background work started on behalf of the reducer.
struct Tasks {
    tx: mpsc::Sender<Action>,
    exchange: Option<AbortHandle>,
}

impl Tasks {
    /// Performs an effect. Returns true when the app should quit.
    fn apply(&mut self, app: &App, effect: Effect) -> bool {
        match effect {
            Effect::None => {}
            Effect::SpawnExchange(request) => {
                info!(
                    "Spawning exchange {} -> {}",
                    request.id,
                    request.feature.endpoint()
                );
                self.abort_exchange();
                let gateway = app.gateway.clone();
                let tx = self.tx.clone();
                let handle = tokio::spawn(async move {
                    let action = gateway::run_exchange(gateway, request).await;
                    if tx.send(action).is_err() {
                        warn!("Failed to send exchange result: receiver dropped");
                    }
                });
                self.exchange = Some(handle.abort_handle());
            }
            Effect::AbortExchange => self.abort_exchange(),
            Effect::RefreshUsage => {
                self.exchange = None;
                let gateway = app.gateway.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Some(action) = gateway::refresh_usage(gateway).await
                        && tx.send(action).is_err()
                    {
                        warn!("Failed to send usage update: receiver dropped");
                    }
                });
            }
            Effect::Quit => return true,
        }
        false
    }

    fn abort_exchange(&mut self) {
        if let Some(handle) = self.exchange.take() {
            debug!("Aborting in-flight exchange task");
            handle.abort();
        }
    }
}

/// Translate one terminal event into reducer actions. Returns true on quit.
fn handle_event(event: TuiEvent, app: &mut App, tui: &mut TuiState, tasks: &mut Tasks) -> bool {
    let action = match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => Action::Quit,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            return false;
        }
        TuiEvent::Escape if app.is_submitting() => Action::CancelExchange,
        TuiEvent::Escape => Action::DismissError,
        TuiEvent::NextFeature | TuiEvent::PrevFeature => {
            let target = if event == TuiEvent::NextFeature {
                app.feature.next()
            } else {
                app.feature.prev()
            };
            tui.message_list = MessageListState::new();
            Action::SwitchFeature(target)
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::Changed(value)) => Action::PromptChanged(value),
            Some(InputEvent::Submit) => Action::Submit,
            None => return false,
        },
    };
    let effect = update(app, action);
    tui.sync(app);
    tasks.apply(app, effect)
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut tasks = Tasks { tx, exchange: None };

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.sync(&app);

        let animating = app.is_submitting();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &mut app, &mut tui, &mut tasks) {
                break 'main;
            }
        }

        // Handle background task actions (exchange outcomes, usage)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if tasks.apply(&app, effect) {
                break 'main;
            }
        }
    }

    tasks.abort_exchange();
    ratatui::restore();
    Ok(())
}
