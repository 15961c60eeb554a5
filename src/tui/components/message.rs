use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{Message, Role};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// One transcript entry, drawn as a bordered card with Markdown content.
///
/// User prompts get a cyan outline on the terminal background. Assistant
/// replies sit on a muted fill so they read as a separate surface, the way
/// the generated code is the thing being looked at. System messages are
/// yellow.
///
/// Cards are created fresh each frame. [`MessageCard::calculate_height`]
/// measures without drawing so the list can size its scroll canvas first.
#[derive(Clone, Copy)]
pub struct MessageCard<'a> {
    pub message: &'a Message,
}

/// Text color for a role's content.
pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Gray,
        Role::System => Color::Yellow,
    }
}

fn container_style(role: Role) -> Style {
    match role {
        Role::Assistant => Style::default().bg(Color::Rgb(38, 38, 44)),
        Role::User | Role::System => Style::default(),
    }
}

fn border_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Assistant => Style::default().fg(Color::Green).add_modifier(Modifier::DIM),
        Role::System => Style::default().fg(Color::Yellow),
    }
}

impl<'a> MessageCard<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    fn body(&self) -> Text<'static> {
        markdown::render(self.message.content.trim(), role_color(self.message.role))
    }

    /// Rows the card occupies at `width` columns.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let lines = Paragraph::new(MessageCard::new(message).body())
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl<'a> Widget for MessageCard<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let role = self.message.role;
        let border = border_style(role);

        let block = Block::bordered()
            .title(role.label())
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title_style(border.add_modifier(Modifier::BOLD))
            .style(container_style(role))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
