//! # TitleBar Component
//!
//! Top status line: app name, active page, usage counter (when the backend
//! reports one), and the current status message.
//!
//! Stateless. All fields are props copied from `App` each frame:
//!
//! ```text
//! Muse · Code Generation | 3/5 generations | Generating...
//! ```
//!
//! Segments that are empty are dropped, so a narrow terminal still shows the
//! page name first.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::feature::Feature;
use crate::tui::component::Component;

pub struct TitleBar {
    pub feature: Feature,
    /// Pre-formatted usage label, e.g. "3/5 generations"
    pub usage: Option<String>,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(feature: Feature, usage: Option<String>, status_message: String) -> Self {
        Self {
            feature,
            usage,
            status_message,
        }
    }

    fn line(&self) -> Line<'static> {
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled("Muse", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" · "),
            Span::raw(self.feature.title()),
        ];
        if let Some(usage) = &self.usage {
            spans.push(separator.clone());
            spans.push(Span::styled(usage.clone(), Style::default().fg(Color::Cyan)));
        }
        if !self.status_message.is_empty() {
            spans.push(separator);
            spans.push(Span::raw(self.status_message.clone()));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                title_bar.render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_usage_and_status() {
        let mut title_bar = TitleBar::new(
            Feature::Code,
            Some("3/5 generations".into()),
            "Generating...".into(),
        );
        let text = render_text(&mut title_bar);
        assert!(text.contains("Muse · Code Generation"));
        assert!(text.contains("3/5 generations"));
        assert!(text.contains("Generating..."));
    }

    #[test]
    fn test_title_bar_without_usage() {
        let mut title_bar = TitleBar::new(Feature::Music, None, "Ready".into());
        let text = render_text(&mut title_bar);
        assert!(text.contains("Music Generation | Ready"));
        assert!(!text.contains("generations"));
    }

    #[test]
    fn test_title_bar_empty_status_has_no_separator() {
        let mut title_bar = TitleBar::new(Feature::Code, None, String::new());
        let text = render_text(&mut title_bar);
        assert!(text.contains("Code Generation"));
        assert!(!text.contains('|'));
    }
}
