//! # InputBox Component
//!
//! The prompt field. One line of text, horizontally scrolled when it is
//! wider than the box.
//!
//! The authoritative value lives in the core `PromptForm`. The box keeps a
//! working copy plus the cursor, reports edits as `InputEvent::Changed`, and
//! is re-synced from the form every frame (that is how a successful exchange
//! clears it). While `disabled` it swallows every event.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally.
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Box height: one text row plus top and bottom borders.
const BOX_HEIGHT: u16 = 3;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The text changed; carries the full new value.
    Changed(String),
    /// Enter pressed.
    Submit,
}

pub struct InputBox {
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    /// First visible display column.
    scroll: usize,
    /// Prop: form is submitting.
    pub disabled: bool,
    /// Prop: example prompt for the active page.
    pub placeholder: &'static str,
    /// Prop: inline validation message.
    pub error: Option<String>,
}

impl InputBox {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            disabled: false,
            placeholder,
            error: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Adopt the form's value if it differs (e.g. cleared after a reply).
    pub fn sync(&mut self, value: &str) {
        if self.buffer != value {
            self.buffer = value.to_string();
            self.cursor = self.buffer.len();
        }
    }

    /// Rows needed: the box, plus one for an inline error.
    pub fn height(&self) -> u16 {
        BOX_HEIGHT + u16::from(self.error.is_some())
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn changed(&self) -> Option<InputEvent> {
        Some(InputEvent::Changed(self.buffer.clone()))
    }

    /// Keep the cursor inside a window `width` columns wide.
    fn update_scroll(&mut self, width: usize) {
        let cursor_col = self.buffer[..self.cursor].width();
        if width == 0 {
            self.scroll = cursor_col;
        } else if cursor_col < self.scroll {
            self.scroll = cursor_col;
        } else if cursor_col >= self.scroll + width {
            self.scroll = cursor_col + 1 - width;
        }
    }
}

/// The part of `text` that falls in display columns `[start, start + width)`.
fn visible_slice(text: &str, start: usize, width: usize) -> String {
    let mut col = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if col >= start {
            if col + w > start + width {
                break;
            }
            out.push(c);
        }
        col += w;
    }
    out
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [box_area, error_area] =
            Layout::vertical([Constraint::Length(BOX_HEIGHT), Constraint::Min(0)]).areas(area);

        let inner_width = box_area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.update_scroll(inner_width);

        let (border_style, title) = if self.disabled {
            (Style::default().fg(Color::DarkGray), "Prompt (generating...)")
        } else if self.error.is_some() {
            (Style::default().fg(Color::Red), "Prompt")
        } else {
            (Style::default().fg(Color::Green), "Prompt")
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let line = if self.buffer.is_empty() {
            Line::from(Span::styled(
                self.placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            let style = if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                visible_slice(&self.buffer, self.scroll, inner_width),
                style,
            ))
        };

        frame.render_widget(Paragraph::new(line).block(block), box_area);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), Style::default().fg(Color::Red))),
                error_area,
            );
        }

        if !self.disabled {
            let cursor_col = self.buffer[..self.cursor].width().saturating_sub(self.scroll);
            let x = box_area.x + 2 + cursor_col as u16;
            frame.set_cursor_position((x.min(box_area.right().saturating_sub(2)), box_area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                let c = if c.is_control() { ' ' } else { *c };
                self.insert(c.encode_utf8(&mut [0; 4]));
                self.changed()
            }
            TuiEvent::Paste(text) => {
                let single_line: String = text
                    .chars()
                    .map(|c| if c.is_control() { ' ' } else { c })
                    .collect();
                self.insert(&single_line);
                self.changed()
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}
