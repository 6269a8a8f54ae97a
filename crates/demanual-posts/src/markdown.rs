//! Markdown rendering for post bodies.
//!
//! Uses pulldown-cmark with the GFM extensions posts are written with
//! (tables, strikethrough, task lists). Output is meant to be embedded
//! directly into a page, so raw HTML is dropped and links or images with
//! script-capable URL schemes lose their destination.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html::push_html};

/// URL schemes a link may not point at.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Parser options shared by every markdown consumer of the site.
pub fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES
}

/// Render markdown to sanitized HTML.
pub fn render_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, options()).filter_map(sanitize);

    let mut html = String::with_capacity(markdown.len() * 2);
    push_html(&mut html, events);
    html
}

fn sanitize(event: Event<'_>) -> Option<Event<'_>> {
    match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        other => Some(other),
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_blocked_url(&url) {
        CowStr::Borrowed("")
    } else {
        url
    }
}

/// Browsers ignore whitespace and control characters inside a scheme, so
/// those are skipped before comparing.
fn is_blocked_url(url: &str) -> bool {
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|s| scheme.starts_with(s))
}
