use std::time::Instant;

use chrono::NaiveDate;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use demanual_background::GlowBackground;
use demanual_config::Config;
use demanual_core::{Page, Rgba};
use demanual_posts::{Post, PostContent, PostError, PostRepository};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::markdown_view;
use crate::pages;
use crate::theme::Theme;

/// Widest the page content grows before it is centered.
const MAX_CONTENT_WIDTH: u16 = 100;

/// Lines moved by PageUp and PageDown.
const PAGE_LINES: i16 = 10;

const COPYRIGHT: &str = "© Copyright 2025 DemanualAI Inc.";

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    repository: PostRepository,
    theme: Theme,
    /// Page currently shown.
    page: Page,
    blog: BlogState,
    /// Animated grid of the current page view, if animation is enabled.
    background: Option<GlowBackground>,
    /// First visible line of the page body.
    scroll: u16,
    started: Instant,
}

#[derive(Debug, Default)]
struct BlogState {
    posts: Vec<Post>,
    list: ListState,
    /// Post opened from the listing.
    open: Option<PostContent>,
    error: Option<String>,
}

impl App {
    /// Open the post repository and show the configured start page.
    pub fn new(config: Config) -> Result<Self, PostError> {
        let mut repository = PostRepository::open(&config.posts_dir)?;
        if let Some(images_dir) = &config.images_dir {
            repository = repository.with_images_dir(images_dir)?;
        }

        let mut app = Self {
            running: false,
            theme: Theme::for_background(config.background_color),
            repository,
            page: config.start_page,
            blog: BlogState::default(),
            background: None,
            scroll: 0,
            started: Instant::now(),
            config,
        };
        app.navigate(app.config.start_page);
        Ok(app)
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        match &mut self.background {
            Some(background) => background.render(frame, area, timestamp_ms),
            None => {
                let (r, g, b) = self.config.background_color.over(Rgba::BLACK);
                frame.render_widget(Block::new().bg(Color::Rgb(r, g, b)), area);
            }
        }

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(2), // Navigation
            Constraint::Fill(1),   // Page content
            Constraint::Length(1), // Help text
        ])
        .areas(area);

        self.render_header(frame, header);
        let content = centered(body, MAX_CONTENT_WIDTH);
        match (self.page, self.blog.open.is_some()) {
            (Page::Blog, true) => self.render_post(frame, content),
            (Page::Blog, false) => self.render_blog(frame, content),
            (page, _) => self.render_document(frame, content, page),
        }
        self.render_footer(frame, footer);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("DemanualAI", self.theme.accent()),
            Span::raw("    "),
        ];
        for (index, page) in Page::NAVIGATION.into_iter().enumerate() {
            let style = if page == self.page {
                self.theme.accent().add_modifier(Modifier::UNDERLINED)
            } else {
                self.theme.text()
            };
            spans.push(Span::styled(format!("{} ", index + 1), self.theme.muted()));
            spans.push(Span::styled(page.title(), style));
            spans.push(Span::raw("   "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), centered(area, MAX_CONTENT_WIDTH));
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str| k.bold().fg(self.theme.accent);
        let label = |l: &'static str| l.fg(self.theme.muted);

        let mut help = vec![key("←/→"), label(" pages  "), key("1-7"), label(" jump  ")];
        match (self.page, self.blog.open.is_some()) {
            (Page::Blog, false) => {
                help.extend([key("↑/↓"), label(" select  "), key("enter"), label(" open  ")]);
            }
            (Page::Blog, true) => {
                help.extend([key("↑/↓"), label(" scroll  "), key("⌫"), label(" back  ")]);
            }
            _ => help.extend([key("↑/↓"), label(" scroll  ")]),
        }
        help.extend([key("q"), label(" quit")]);

        let [left, right] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(COPYRIGHT.chars().count() as u16 + 1),
        ])
        .areas(area);
        frame.render_widget(Line::from(help), left);
        frame.render_widget(Line::styled(COPYRIGHT, self.theme.muted()).right_aligned(), right);
    }

    fn render_document(&mut self, frame: &mut Frame, area: Rect, page: Page) {
        let Some(source) = pages::document(page) else {
            return;
        };
        let text = markdown_view::render(source, &self.theme);
        self.render_scrolled(frame, area, text);
    }

    fn render_blog(&mut self, frame: &mut Frame, area: Rect) {
        let [title, listing] =
            Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(area);
        frame.render_widget(Line::styled("Blog", self.theme.accent()), title);

        let notice = if let Some(error) = &self.blog.error {
            Some(format!("Could not load posts: {error}"))
        } else if self.blog.posts.is_empty() {
            Some(format!(
                "No posts yet. Add markdown files to {}.",
                self.repository.posts_dir().display()
            ))
        } else {
            None
        };
        if let Some(notice) = notice {
            let paragraph = Paragraph::new(notice)
                .style(self.theme.muted())
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, listing);
            return;
        }

        let items: Vec<ListItem> = self
            .blog
            .posts
            .iter()
            .map(|post| post_item(post, &self.theme))
            .collect();
        let list = List::new(items)
            .highlight_symbol("▸ ")
            .highlight_style(Style::new().fg(self.theme.accent));
        frame.render_stateful_widget(list, listing, &mut self.blog.list);
    }

    fn render_post(&mut self, frame: &mut Frame, area: Rect) {
        let text = match &self.blog.open {
            Some(content) => post_text(content, &self.theme),
            None => return,
        };
        self.render_scrolled(frame, area, text);
    }

    fn render_scrolled(&mut self, frame: &mut Frame, area: Rect, text: Text<'static>) {
        let last_line = u16::try_from(text.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.min(last_line);
        let paragraph = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame interval so the background keeps animating.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.config.animation.frame_interval())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Right | KeyCode::Tab) => self.navigate(self.page.next()),
            (_, KeyCode::Left | KeyCode::BackTab) => self.navigate(self.page.prev()),
            (_, KeyCode::Home | KeyCode::Char('h')) => self.navigate(Page::Home),
            (_, KeyCode::Char(digit @ '1'..='7')) => self.jump(digit),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.move_by(-1),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.move_by(1),
            (_, KeyCode::PageUp) => self.scroll_by(-PAGE_LINES),
            (_, KeyCode::PageDown) => self.scroll_by(PAGE_LINES),
            (_, KeyCode::Enter) => self.open_selected(),
            (_, KeyCode::Backspace) => self.close_post(),
            (_, KeyCode::Char('r')) if self.page == Page::Blog => self.reload_posts(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if let Some(background) = &mut self.background {
                    background.pointer_moved(mouse.column, mouse.row);
                }
            }
            MouseEventKind::ScrollUp => self.move_by(-1),
            MouseEventKind::ScrollDown => self.move_by(1),
            _ => {}
        }
    }

    /// Show `page`, starting a fresh background with its preset.
    fn navigate(&mut self, page: Page) {
        tracing::debug!(from = %self.page, to = %page, "navigate");
        self.page = page;
        self.scroll = 0;
        self.blog.open = None;
        if page == Page::Blog {
            self.reload_posts();
        }
        self.reset_background();
    }

    /// Jump to the page under a number key, `1` being the first.
    fn jump(&mut self, digit: char) {
        let page = digit
            .to_digit(10)
            .and_then(|n| Page::ALL.get((n as usize).checked_sub(1)?).copied());
        if let Some(page) = page {
            self.navigate(page);
        }
    }

    /// Replace the background so each page view runs its own engine.
    fn reset_background(&mut self) {
        let animation = &self.config.animation;
        self.background = animation.enabled.then(|| {
            GlowBackground::new(animation.glow_config(self.page), self.config.background_color)
        });
    }

    fn reload_posts(&mut self) {
        match self.repository.list_posts() {
            Ok(posts) => {
                let selected = self.blog.list.selected().unwrap_or(0);
                self.blog.list.select(match posts.len() {
                    0 => None,
                    len => Some(selected.min(len - 1)),
                });
                self.blog.posts = posts;
                self.blog.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to list posts");
                self.blog.posts.clear();
                self.blog.list.select(None);
                self.blog.error = Some(e.to_string());
            }
        }
    }

    fn open_selected(&mut self) {
        if self.page != Page::Blog || self.blog.open.is_some() {
            return;
        }
        let Some(post) = self
            .blog
            .list
            .selected()
            .and_then(|index| self.blog.posts.get(index))
        else {
            return;
        };

        let id = post.id.clone();
        match self.repository.get_post(&id) {
            Ok(content) => {
                tracing::debug!(id = %id, "opened post");
                self.blog.open = Some(content);
                self.scroll = 0;
                self.reset_background();
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(id = %id, "post disappeared");
                self.navigate(Page::NotFound);
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "failed to load post");
                self.blog.error = Some(e.to_string());
            }
        }
    }

    fn close_post(&mut self) {
        if self.blog.open.take().is_some() {
            self.scroll = 0;
            self.reset_background();
        }
    }

    /// Arrow keys select posts in the listing and scroll everywhere else.
    fn move_by(&mut self, delta: i16) {
        if self.page == Page::Blog && self.blog.open.is_none() {
            let len = self.blog.posts.len();
            if len > 0 {
                let current = self.blog.list.selected().unwrap_or(0);
                let next = current.saturating_add_signed(delta as isize).min(len - 1);
                self.blog.list.select(Some(next));
            }
        } else {
            self.scroll_by(delta);
        }
    }

    fn scroll_by(&mut self, delta: i16) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
        if let Some(background) = &mut self.background {
            background.stop();
        }
    }
}

/// Shrink `area` to at most `max_width` columns, centered, with a small margin.
fn centered(area: Rect, max_width: u16) -> Rect {
    let width = area.width.saturating_sub(4).min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// `2024-01-15` as `January 15, 2024`; other values are shown as written.
fn format_date(date: &str) -> String {
    date.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|day| day.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

fn byline(post: &Post) -> String {
    format!("{} · {}, {}", format_date(&post.date), post.author, post.role)
}

fn post_item(post: &Post, theme: &Theme) -> ListItem<'static> {
    ListItem::new(vec![
        Line::styled(post.title.clone(), theme.text().add_modifier(Modifier::BOLD)),
        Line::styled(byline(post), theme.muted()),
        Line::styled(post.excerpt.clone(), theme.text()),
        Line::default(),
    ])
}

fn post_text(content: &PostContent, theme: &Theme) -> Text<'static> {
    let mut lines = vec![
        Line::styled(content.post.title.clone(), theme.accent()),
        Line::styled(byline(&content.post), theme.muted()),
        Line::default(),
    ];
    lines.extend(markdown_view::render(&content.markdown, theme).lines);
    Text::from(lines)
}
