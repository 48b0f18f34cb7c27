use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::ThemePalette;

/// Renders an issue body into styled terminal lines. Raw HTML, including
/// issue-form comments, is dropped.
pub fn render(input: &str, theme: &ThemePalette) -> Vec<Line<'static>> {
    let parser = Parser::new_ext(input, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS);

    let mut state = RenderState::new(theme);
    for event in parser {
        state.handle(event);
    }
    state.finish()
}

struct RenderState<'t> {
    theme: &'t ThemePalette,
    lines: Vec<Vec<Span<'static>>>,
    style_stack: Vec<Style>,
    list_depth: usize,
    blockquote_depth: usize,
}

impl<'t> RenderState<'t> {
    fn new(theme: &'t ThemePalette) -> Self {
        Self {
            theme,
            lines: vec![Vec::new()],
            style_stack: vec![Style::default().fg(theme.text_primary)],
            list_depth: 0,
            blockquote_depth: 0,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(text.as_ref()),
            Event::Code(text) => {
                let style = Style::default().fg(self.theme.accent);
                self.push_span(Span::styled(text.into_string(), style));
            }
            Event::SoftBreak | Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.new_line();
                self.push_span(Span::styled(
                    "-".repeat(40),
                    Style::default().fg(self.theme.text_muted),
                ));
                self.new_line();
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.ensure_blank_line();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::BlockQuote(_) => {
                self.blockquote_depth += 1;
                self.new_line();
            }
            Tag::List(_) => {
                self.list_depth += 1;
                self.new_line();
            }
            Tag::Item => {
                self.new_line();
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.push_text(&format!("{}- ", indent));
            }
            Tag::CodeBlock(_) => {
                self.new_line();
                self.push_style(Style::default().fg(self.theme.accent));
            }
            Tag::Link { .. } => {
                self.push_style(Style::default().add_modifier(Modifier::UNDERLINED));
            }
            Tag::Paragraph => self.ensure_blank_line(),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.pop_style();
                self.new_line();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            TagEnd::BlockQuote(_) => {
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.new_line();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                self.new_line();
            }
            TagEnd::CodeBlock => {
                self.pop_style();
                self.new_line();
            }
            TagEnd::Paragraph => self.new_line(),
            _ => {}
        }
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        match level {
            HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3 => style.fg(self.theme.accent),
            _ => style.fg(self.theme.text_primary),
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        while self.lines.len() > 1 && self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        while self.lines.len() > 1 && self.lines.first().is_some_and(|line| line.is_empty()) {
            self.lines.remove(0);
        }
        self.lines.into_iter().map(Line::from).collect()
    }

    fn ensure_blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.new_line();
        }
    }

    fn new_line(&mut self) {
        self.lines.push(Vec::new());
        if self.blockquote_depth > 0 {
            let style = Style::default().fg(self.theme.text_muted);
            self.push_span(Span::styled("| ".repeat(self.blockquote_depth), style));
        }
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.current_style().patch(style);
        self.style_stack.push(merged);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let style = self.current_style();
        self.push_span(Span::styled(text.to_string(), style));
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push(span),
            None => self.lines.push(vec![span]),
        }
    }
}
