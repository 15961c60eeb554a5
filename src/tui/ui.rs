use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{HEADING_HEIGHT, Heading, MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const KEY_HINTS: &str = "Enter send · Esc cancel · Tab switch page · ↑/↓ scroll · Ctrl+C quit";
const MAX_FAILURE_LINES: usize = 3;

/// Wrapped failure text for the footer, or `None` when there is nothing to report.
fn failure_lines(app: &App, width: u16) -> Option<Vec<String>> {
    let failure = app.failure.as_ref()?;
    let hint = if failure.retryable {
        "Press Enter to retry, Esc to dismiss."
    } else {
        "Esc to dismiss."
    };
    let text = format!("✗ {} {}", failure.message, hint);
    let mut lines: Vec<String> = textwrap::wrap(&text, usize::from(width.max(1)))
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.len() > MAX_FAILURE_LINES {
        lines.truncate(MAX_FAILURE_LINES);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    Some(lines)
}

fn footer_height(app: &App, width: u16) -> u16 {
    failure_lines(app, width).map_or(1, |lines| lines.len() as u16)
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let paragraph = match failure_lines(app, area.width) {
        Some(lines) => Paragraph::new(
            lines
                .into_iter()
                .map(|line| Line::from(Span::raw(line)))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        None => Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(paragraph, area);
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let layout = Layout::vertical([
        Length(1),
        Length(HEADING_HEIGHT),
        Length(tui.input_box.height()),
        Min(0),
        Length(footer_height(app, area.width)),
    ]);
    let [title_area, heading_area, input_area, list_area, footer_area] = layout.areas(area);

    TitleBar::new(
        app.feature,
        app.usage.as_ref().map(|u| u.label()),
        app.status_message.clone(),
    )
    .render(frame, title_area);

    Heading::new(app.feature).render(frame, heading_area);

    tui.input_box.render(frame, input_area);

    MessageList::new(
        &mut tui.message_list,
        &app.transcript,
        app.feature,
        app.is_submitting(),
        spinner_frame,
    )
    .render(frame, list_area);

    draw_footer(frame, footer_area, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::message::Message;
    use crate::core::state::ExchangeFailure;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        tui.sync(app);
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_idle_page() {
        let app = test_app();
        let mut tui = TuiState::new(&app);
        let text = render(&app, &mut tui, 100, 24);

        assert!(text.contains("Muse · Code Generation"));
        assert!(text.contains("Generate code using descriptive text"));
        assert!(text.contains("A simple toggle button using React hooks"));
        assert!(text.contains("No conversation started"));
        assert!(text.contains("Ctrl+C quit"));
    }

    #[test]
    fn test_draw_ui_while_submitting() {
        let mut app = test_app();
        update(&mut app, Action::PromptChanged("toggle".into()));
        update(&mut app, Action::Submit);
        let mut tui = TuiState::new(&app);
        let text = render(&app, &mut tui, 100, 24);

        assert!(text.contains("Prompt (generating...)"));
        assert!(text.contains("Muse is thinking..."));
        assert!(text.contains("Generating..."));
    }

    #[test]
    fn test_draw_ui_with_transcript() {
        let mut app = test_app();
        app.transcript
            .commit_exchange(Message::user("make a button"), Message::assistant("Here you go"));
        let mut tui = TuiState::new(&app);
        let text = render(&app, &mut tui, 100, 24);

        assert!(text.contains("make a button"));
        assert!(text.contains("Here you go"));
        assert!(!text.contains("No conversation started"));
    }

    #[test]
    fn test_draw_ui_shows_failure_in_footer() {
        let mut app = test_app();
        app.failure = Some(ExchangeFailure {
            message: "network error: connection refused".into(),
            retryable: true,
        });
        let mut tui = TuiState::new(&app);
        let text = render(&app, &mut tui, 100, 24);

        assert!(text.contains("network error: connection refused"));
        assert!(text.contains("Press Enter to retry"));
        assert!(!text.contains("Ctrl+C quit"));
    }

    #[test]
    fn test_failure_lines_wrap_and_cap() {
        let mut app = test_app();
        app.failure = Some(ExchangeFailure {
            message: "word ".repeat(60),
            retryable: false,
        });
        let lines = failure_lines(&app, 30).unwrap();
        assert_eq!(lines.len(), MAX_FAILURE_LINES);
        assert!(lines[2].ends_with('…'));
        assert_eq!(footer_height(&app, 30), 3);

        app.failure = None;
        assert_eq!(footer_height(&app, 30), 1);
    }

    #[test]
    fn test_validation_error_shows_under_prompt() {
        let mut app = test_app();
        update(&mut app, Action::Submit);
        let mut tui = TuiState::new(&app);
        let text = render(&app, &mut tui, 100, 24);
        assert!(text.contains("Prompt is required."));
    }
}
