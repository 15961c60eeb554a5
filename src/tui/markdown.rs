//! Markdown → ratatui `Text`.
//!
//! Walks `pulldown_cmark` events and builds styled lines. Code is what the
//! backend mostly sends back, so it gets the most care: inline code spans get
//! a background, fenced blocks get a frame with the language in the top
//! border and syntect highlighting when the language is known.
//!
//! Output depends only on the input, so re-rendering a transcript is stable.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const TAB_WIDTH: &str = "    ";

fn frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn inline_code_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

fn code_theme() -> Option<&'static Theme> {
    THEME_SET.themes.get(CODE_THEME)
}

/// Render markdown into owned, styled text. Plain text uses `base_fg`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut r = Renderer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        r.handle(event);
    }
    r.text
}

enum CodeMode {
    Off,
    Plain,
    Highlighted(HighlightLines<'static>),
}

struct Renderer {
    text: Text<'static>,
    base_fg: Color,
    /// Composed inline styles; top of stack is current.
    styles: Vec<Style>,
    /// Spans prepended to every new line (quote bars, code frame).
    prefixes: Vec<Span<'static>>,
    /// One entry per open list: `None` bullets, `Some(n)` next ordinal.
    lists: Vec<Option<u64>>,
    code: CodeMode,
    link_target: Option<String>,
    pending_gap: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: Vec::new(),
            prefixes: Vec::new(),
            lists: Vec::new(),
            code: CodeMode::Off,
            link_target: None,
            pending_gap: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn new_line(&mut self, line: Line<'static>) {
        let mut spans = self.prefixes.clone();
        spans.extend(line.spans);
        self.text.lines.push(Line::from(spans));
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(Line::from(span)),
        }
    }

    /// Separates consecutive blocks with one empty line.
    fn gap(&mut self) {
        if self.pending_gap {
            self.new_line(Line::default());
            self.pending_gap = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.push_span(Span::styled(c.to_string(), inline_code_style())),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.new_line(Line::default()),
            Event::Rule => {
                self.gap();
                self.new_line(Line::from(Span::styled("─".repeat(32), frame_style())));
                self.pending_gap = true;
            }
            Event::TaskListMarker(done) => {
                self.push_span(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.gap();
                self.new_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.gap();
                let style = heading_style(self.base_fg, level);
                self.new_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(heading_depth(level))),
                    style,
                )));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.gap();
                self.prefixes.push(Span::styled("▌ ", frame_style()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.new_line(Line::default());
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                self.push_span(Span::styled(marker, frame_style()));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_target = Some(dest_url.to_string());
                self.push_style(link_style());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.pending_gap = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.pending_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.prefixes.pop();
                self.pop_style();
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                self.code = CodeMode::Off;
                self.prefixes.pop();
                self.new_line(Line::from(Span::styled("└──", frame_style())));
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.pending_gap = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_target.take() {
                    self.push_span(Span::raw(" <"));
                    self.push_span(Span::styled(url, link_style()));
                    self.push_span(Span::raw(">"));
                }
            }
            _ => {}
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        if !self.text.lines.is_empty() {
            self.pending_gap = true;
        }
        self.gap();

        let lang = match &kind {
            CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
            CodeBlockKind::Indented => "",
        };

        let top = if lang.is_empty() {
            Line::from(Span::styled("┌──", frame_style()))
        } else {
            Line::from(vec![
                Span::styled("┌── ", frame_style()),
                Span::styled(lang.to_owned(), frame_style().add_modifier(Modifier::BOLD)),
                Span::styled(" ──", frame_style()),
            ])
        };
        self.new_line(top);
        self.prefixes.push(Span::styled("│ ", frame_style()));

        let syntax = (!lang.is_empty())
            .then(|| SYNTAX_SET.find_syntax_by_token(lang))
            .flatten();
        self.code = match (syntax, code_theme()) {
            (Some(syntax), Some(theme)) => CodeMode::Highlighted(HighlightLines::new(syntax, theme)),
            _ => CodeMode::Plain,
        };
    }

    fn text(&mut self, cow: CowStr<'_>) {
        let text = cow.replace('\t', TAB_WIDTH);

        match std::mem::replace(&mut self.code, CodeMode::Off) {
            CodeMode::Highlighted(mut hl) => {
                for line in LinesWithEndings::from(text.as_str()) {
                    let spans: Vec<Span<'static>> = match hl.highlight_line(line, &SYNTAX_SET) {
                        Ok(ranges) => ranges
                            .into_iter()
                            .map(|(style, frag)| {
                                let fg = Color::Rgb(
                                    style.foreground.r,
                                    style.foreground.g,
                                    style.foreground.b,
                                );
                                Span::styled(
                                    frag.trim_end_matches('\n').to_owned(),
                                    Style::default().fg(fg),
                                )
                            })
                            .filter(|span| !span.content.is_empty())
                            .collect(),
                        Err(_) => vec![Span::raw(line.trim_end_matches('\n').to_owned())],
                    };
                    self.new_line(Line::from(spans));
                }
                self.code = CodeMode::Highlighted(hl);
            }
            CodeMode::Plain => {
                for line in text.lines() {
                    self.new_line(Line::from(Span::styled(
                        line.to_owned(),
                        Style::default().fg(Color::White),
                    )));
                }
                self.code = CodeMode::Plain;
            }
            CodeMode::Off => {
                let style = self.style();
                self.push_span(Span::styled(text, style));
            }
        }
    }
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(base_fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Hello", Color::Blue);
        let line = &text.lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {:?}", line);
        let body = &line.spans[1];
        assert_eq!(body.content, "Hello");
        assert!(body.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(body.style.fg, Some(Color::Blue));
    }

    #[test]
    fn inline_code_has_background() {
        let text = render("Use `useState` here", Color::Blue);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "useState")
            .unwrap();
        assert_eq!(span.style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn fenced_code_is_framed_with_language() {
        let text = render("```jsx\nconst a = 1;\n```", Color::Blue);
        let lines = plain_lines(&text);
        assert!(lines[0].starts_with("┌── jsx"), "got {:?}", lines[0]);
        assert!(lines[1].starts_with("│ "), "got {:?}", lines[1]);
        assert!(lines[1].contains("const a = 1;"));
        assert!(lines.last().unwrap().starts_with('└'));
    }

    #[test]
    fn unknown_language_falls_back_to_plain() {
        let text = render("```nosuchlang\nline1\nline2\n```", Color::Blue);
        let lines = plain_lines(&text);
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│ line2");
    }

    #[test]
    fn ordered_list_numbers_items() {
        let text = render("1. one\n2. two", Color::Blue);
        let lines = plain_lines(&text);
        assert!(lines.iter().any(|l| l == "1. one"), "got {:?}", lines);
        assert!(lines.iter().any(|l| l == "2. two"), "got {:?}", lines);
    }

    #[test]
    fn plain_text_uses_base_color() {
        let text = render("hello", Color::Green);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn tabs_expanded_in_code() {
        let text = render("```\n\tindented\n```", Color::Blue);
        let lines = plain_lines(&text);
        assert!(lines.iter().any(|l| l.contains("    indented")));
        assert!(!lines.iter().any(|l| l.contains('\t')));
    }

    #[test]
    fn rendering_is_deterministic() {
        let md = "# Title\n\nSome *text* and `code`.\n\n```rust\nfn main() {}\n```";
        assert_eq!(render(md, Color::Blue), render(md, Color::Blue));
    }
}
