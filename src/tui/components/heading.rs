//! # Heading Component
//!
//! Page tabs plus the active page's one-line description. Tab and
//! Shift+Tab move between pages; the tabs only display the selection.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Tabs};

use crate::core::feature::Feature;
use crate::tui::component::Component;

pub const HEADING_HEIGHT: u16 = 2;

/// Accent color used for a page's tab and description.
pub fn accent(feature: Feature) -> Color {
    match feature {
        Feature::Code => Color::Green,
        Feature::Music => Color::LightGreen,
    }
}

pub struct Heading {
    pub feature: Feature,
}

impl Heading {
    pub fn new(feature: Feature) -> Self {
        Self { feature }
    }
}

impl Component for Heading {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [tabs_area, description_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let selected = Feature::ALL
            .iter()
            .position(|f| *f == self.feature)
            .unwrap_or(0);
        let tabs = Tabs::new(Feature::ALL.iter().map(|f| Line::from(f.title())))
            .select(selected)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(accent(self.feature))
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, tabs_area);

        let description = Paragraph::new(self.feature.description())
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC));
        frame.render_widget(description, description_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_heading_lists_pages_and_description() {
        let mut terminal = Terminal::new(TestBackend::new(60, HEADING_HEIGHT)).unwrap();
        let mut heading = Heading::new(Feature::Music);
        terminal
            .draw(|f| {
                let area = f.area();
                heading.render(f, area);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Code Generation"));
        assert!(text.contains("Music Generation"));
        assert!(text.contains("Turn your prompt into music."));

        // The selected tab carries the page accent.
        let byte_idx = text.find("Music Generation").unwrap();
        let music_x = text[..byte_idx].chars().count() as u16;
        assert_eq!(buffer[(music_x, 0)].fg, Color::LightGreen);
    }

    #[test]
    fn test_accents_differ_per_page() {
        assert_ne!(accent(Feature::Code), accent(Feature::Music));
    }
}
