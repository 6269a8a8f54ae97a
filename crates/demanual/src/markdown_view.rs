//! Markdown to styled terminal text.
//!
//! Covers what the site's pages and posts use: headings, paragraphs,
//! emphasis, lists, quotes, code, links, rules and simple tables. Raw HTML
//! is dropped, as it is for the web rendering.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use crate::theme::Theme;

const RULE_WIDTH: usize = 40;
const CODE_INDENT: &str = "  ";
const QUOTE_PREFIX: &str = "│ ";

/// Render `markdown` into lines ready for a `Paragraph`.
pub fn render(markdown: &str, theme: &Theme) -> Text<'static> {
    let mut renderer = Renderer::new(theme);
    for event in Parser::new_ext(markdown, demanual_posts::markdown::options()) {
        renderer.event(event);
    }
    renderer.finish()
}

/// An open container, popped by the matching end event.
enum Block {
    Paragraph,
    Heading,
    Quote,
    CodeBlock,
    List(Option<u64>),
    Item,
    Styled,
    /// Destination and the index of the first span of the link text.
    Link(String, usize),
    Image,
    TableHead,
    TableRow,
    Other,
}

struct Renderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    stack: Vec<Block>,
    quote_depth: usize,
    in_code_block: bool,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![theme.text()],
            stack: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = self.theme.code();
                self.spans.push(Span::styled(code.to_string(), style));
            }
            Event::SoftBreak => self.push(" ", self.style()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.gap();
                self.lines
                    .push(Line::styled("─".repeat(RULE_WIDTH), self.theme.muted()));
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push(marker, self.theme.accent());
            }
            Event::FootnoteReference(label) => {
                self.push(format!("[{label}]"), self.theme.muted());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let block = match tag {
            Tag::Paragraph => {
                self.gap();
                Block::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.gap();
                let style = self.heading_style(level);
                self.styles.push(style);
                Block::Heading
            }
            Tag::BlockQuote(..) => {
                self.flush();
                self.gap();
                self.quote_depth += 1;
                self.push_style(Style::new().add_modifier(Modifier::ITALIC));
                Block::Quote
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.gap();
                self.in_code_block = true;
                Block::CodeBlock
            }
            Tag::List(start) => {
                self.flush();
                self.gap();
                Block::List(start)
            }
            Tag::Item => {
                self.flush();
                let marker = self.item_marker();
                self.push(marker, self.theme.accent());
                Block::Item
            }
            Tag::Emphasis => {
                self.push_style(Style::new().add_modifier(Modifier::ITALIC));
                Block::Styled
            }
            Tag::Strong => {
                self.push_style(Style::new().add_modifier(Modifier::BOLD));
                Block::Styled
            }
            Tag::Strikethrough => {
                self.push_style(Style::new().add_modifier(Modifier::CROSSED_OUT));
                Block::Styled
            }
            Tag::Link { dest_url, .. } => {
                self.push_style(
                    Style::new()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::UNDERLINED),
                );
                Block::Link(dest_url.to_string(), self.spans.len())
            }
            Tag::Image { .. } => {
                self.push("[image: ", self.theme.muted());
                self.push_style(self.theme.muted());
                Block::Image
            }
            Tag::Table(_) => {
                self.flush();
                self.gap();
                Block::Other
            }
            Tag::TableHead => {
                self.push_style(Style::new().add_modifier(Modifier::BOLD));
                Block::TableHead
            }
            Tag::TableRow => Block::TableRow,
            Tag::TableCell => {
                if !self.spans.is_empty() {
                    self.push(" │ ", self.theme.muted());
                }
                Block::Other
            }
            _ => Block::Other,
        };
        self.stack.push(block);
    }

    fn end(&mut self) {
        let Some(block) = self.stack.pop() else {
            return;
        };
        match block {
            Block::Paragraph | Block::List(_) | Block::Item | Block::TableRow => self.flush(),
            Block::Heading => {
                self.flush();
                self.pop_style();
            }
            Block::Quote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
            }
            Block::CodeBlock => self.in_code_block = false,
            Block::Styled => self.pop_style(),
            Block::Link(url, first_span) => {
                self.pop_style();
                let text: String = self
                    .spans
                    .get(first_span..)
                    .unwrap_or_default()
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect();
                if !url.is_empty() && !url.starts_with('#') && text != url {
                    self.push(format!(" <{url}>"), self.theme.muted());
                }
            }
            Block::Image => {
                self.pop_style();
                self.push("]", self.theme.muted());
            }
            Block::TableHead => {
                self.pop_style();
                self.flush();
                let width = self.lines.last().map_or(0, Line::width);
                self.lines
                    .push(Line::styled("─".repeat(width), self.theme.muted()));
            }
            Block::Other => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.theme.code();
            for line in text.lines() {
                self.push(format!("{CODE_INDENT}{line}"), style);
                self.flush();
            }
        } else {
            self.push(text.to_string(), self.style());
        }
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.theme.accent(),
            HeadingLevel::H2 => self.theme.text().add_modifier(Modifier::BOLD),
            _ => self
                .theme
                .text()
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        }
    }

    fn item_marker(&mut self) -> String {
        let depth = self
            .stack
            .iter()
            .filter(|b| matches!(b, Block::List(_)))
            .count();
        let indent = "  ".repeat(depth.saturating_sub(1));
        let list = self.stack.iter_mut().rev().find_map(|b| match b {
            Block::List(start) => Some(start),
            _ => None,
        });
        match list {
            Some(Some(n)) => {
                let marker = format!("{indent}{n}. ");
                *n += 1;
                marker
            }
            _ => format!("{indent}• "),
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn push(&mut self, content: impl Into<String>, style: Style) {
        self.spans.push(Span::styled(content.into(), style));
    }

    /// End the current line, if it has any content.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                QUOTE_PREFIX.repeat(self.quote_depth),
                self.theme.muted(),
            ));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Blank line between top-level blocks.
    fn gap(&mut self) {
        let in_item = self.stack.iter().any(|b| matches!(b, Block::Item));
        let after_blank = self.lines.last().is_none_or(|line| line.width() == 0);
        if !in_item && !after_blank {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(markdown: &str) -> Vec<String> {
        render(markdown, &Theme::default())
            .lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn find_span<'a>(text: &'a Text<'static>, content: &str) -> &'a Span<'static> {
        text.lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .find(|span| span.content == content)
            .unwrap()
    }

    #[test]
    fn test_heading_and_paragraphs() {
        assert_eq!(
            plain("# Title\n\nFirst line\nwraps here.\n\nSecond."),
            ["Title", "", "First line wraps here.", "", "Second."]
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            plain("- a\n- b\n\n1. x\n2. y\n"),
            ["• a", "• b", "", "1. x", "2. y"]
        );
        assert_eq!(plain("- a\n  - b\n- c\n"), ["• a", "  • b", "• c"]);
        assert_eq!(plain("3. three\n4. four\n"), ["3. three", "4. four"]);
        assert_eq!(plain("- [x] done\n- [ ] todo\n"), ["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn test_inline_styles() {
        let text = render("*it* **bold** ~~gone~~ `code`", &Theme::default());
        let has = |content: &str, modifier: Modifier| {
            find_span(&text, content).style.add_modifier.contains(modifier)
        };
        assert!(has("it", Modifier::ITALIC));
        assert!(has("bold", Modifier::BOLD));
        assert!(has("gone", Modifier::CROSSED_OUT));
        assert_eq!(
            find_span(&text, "code").style.fg,
            Some(Theme::default().code)
        );
    }

    #[test]
    fn test_links_show_destination() {
        assert_eq!(
            plain("[site](https://www.demanualai.com)"),
            ["site <https://www.demanualai.com>"]
        );
        assert_eq!(plain("<https://example.com>"), ["https://example.com"]);
        assert_eq!(plain("[top](#intro)"), ["top"]);
        assert_eq!(plain("![logo](/images/logo.png)"), ["[image: logo]"]);
    }

    #[test]
    fn test_code_block_and_quote() {
        assert_eq!(
            plain("```rust\nfn main() {}\nlet x = 1;\n```\n"),
            ["  fn main() {}", "  let x = 1;"]
        );
        assert_eq!(plain("> quoted\n> text"), ["│ quoted text"]);
    }

    #[test]
    fn test_rule_and_table() {
        assert_eq!(
            plain("a\n\n---\n\nb"),
            ["a".to_string(), String::new(), "─".repeat(RULE_WIDTH), String::new(), "b".to_string()]
        );
        assert_eq!(
            plain("| a | b |\n|---|---|\n| 1 | 2 |\n"),
            ["a │ b", "─────", "1 │ 2"]
        );
    }

    #[test]
    fn test_raw_html_dropped() {
        assert_eq!(plain("<div>hidden</div>\n\nshown <b>bold</b>"), ["shown bold"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(plain("").is_empty());
        assert!(plain("\n\n").is_empty());
    }
}
