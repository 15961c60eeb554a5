//! # MessageList Component
//!
//! Scrollable view of the page transcript, newest exchange on top.
//!
//! ## Responsibilities
//!
//! - Show the loader card while an exchange is in flight
//! - Show the page's empty label when there is nothing to show
//! - Lay out message cards newest-first inside a `ScrollView`
//! - Cache card heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//! The transcript is append-only, so heights are cached by chronological
//! index and only new messages are measured. A width change or a shorter
//! transcript (page switch) throws the cache away.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::feature::Feature;
use crate::core::message::Message;
use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageCard;
use crate::tui::event::TuiEvent;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const LOADER_HEIGHT: u16 = 3;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Transcript length at the last render; growth scrolls back to the top.
    seen_len: usize,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Canvas height at the last render
    content_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            seen_len: 0,
            viewport_height: 0,
            content_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
            }
            _ => {}
        }
        None
    }
}

/// Card heights in chronological order, valid for one content width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Measure whatever is not cached yet.
    pub fn sync(&mut self, messages: &[Message], content_width: u16) {
        if self.content_width != content_width || messages.len() < self.heights.len() {
            self.heights.clear();
            self.content_width = content_width;
        }
        for message in messages.iter().skip(self.heights.len()) {
            self.heights
                .push(MessageCard::calculate_height(message, content_width));
        }
    }

    /// Sum of all card heights, saturating at the largest canvas a
    /// `ScrollView` can hold.
    pub fn total(&self) -> u16 {
        self.heights
            .iter()
            .fold(0u16, |acc, &height| acc.saturating_add(height))
    }
}

/// "Muse is thinking..." card with a braille spinner.
struct Loader {
    spinner_frame: usize,
}

impl Widget for Loader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        let line = Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Green)),
            Span::raw(" "),
            Span::styled(
                "Muse is thinking...",
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buf);
    }
}

/// Scrollable transcript view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub feature: Feature,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        feature: Feature,
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            feature,
            is_loading,
            spinner_frame,
        }
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let label = Paragraph::new(self.feature.empty_label())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        let y = area.y + area.height / 2;
        frame.render_widget(label, Rect::new(area.x, y, area.width, 1.min(area.height)));
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let messages = self.transcript.messages();

        if messages.is_empty() && !self.is_loading {
            self.state.seen_len = 0;
            self.state.content_height = 0;
            self.render_empty(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // scrollbar column
        self.state.layout.sync(messages, content_width);

        if messages.len() > self.state.seen_len {
            self.state.scroll_state.scroll_to_top();
        }
        self.state.seen_len = messages.len();

        let loader_height = if self.is_loading { LOADER_HEIGHT } else { 0 };
        self.state.content_height = loader_height.saturating_add(self.state.layout.total());
        self.state.viewport_height = area.height;
        self.state.clamp_scroll();

        let mut scroll_view =
            ScrollView::new(Size::new(content_width, self.state.content_height))
                .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
                .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        if self.is_loading {
            scroll_view.render_widget(
                Loader {
                    spinner_frame: self.spinner_frame,
                },
                Rect::new(0, 0, content_width, loader_height),
            );
        }

        // Cards outside the viewport (plus half a screen either side) are skipped.
        let offset = self.state.scroll_state.offset().y;
        let margin = area.height / 2;
        let visible_start = offset.saturating_sub(margin);
        let visible_end = offset.saturating_add(area.height).saturating_add(margin);

        let mut y = loader_height;
        for (message, &height) in messages
            .iter()
            .zip(self.state.layout.heights.iter())
            .rev()
        {
            // Cards past the end of the canvas are dropped, the last one clipped.
            let height = height.min(u16::MAX - y);
            if height == 0 {
                break;
            }
            if y.saturating_add(height) > visible_start && y < visible_end {
                scroll_view.render_widget(
                    MessageCard::new(message),
                    Rect::new(0, y, content_width, height),
                );
            }
            y = y.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
