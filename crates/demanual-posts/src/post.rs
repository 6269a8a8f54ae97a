use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::front_matter::FrontMatter;

/// Image shown for posts that do not name one.
pub const DEFAULT_IMAGE: &str = "/posts/images/default.jpg";

/// Listing metadata of a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// File name without the `.md` extension.
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Publication date as written in the header, ideally `YYYY-MM-DD`.
    pub date: String,
    pub author: String,
    pub role: String,
    pub image: String,
}

impl Post {
    /// Fill a post from its header, defaulting every missing field.
    pub fn from_front_matter(id: impl Into<String>, front_matter: FrontMatter) -> Self {
        let FrontMatter {
            title,
            excerpt,
            date,
            author,
            role,
            image,
        } = front_matter;

        Self {
            id: id.into(),
            title: title.unwrap_or_else(|| "Untitled".to_string()),
            excerpt: excerpt.unwrap_or_else(|| "No excerpt available".to_string()),
            date: date.unwrap_or_else(now_iso8601),
            author: author.unwrap_or_else(|| "Anonymous".to_string()),
            role: role.unwrap_or_else(|| "Contributor".to_string()),
            image: image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        }
    }
}

/// A post with its body, as shown on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostContent {
    #[serde(flatten)]
    pub post: Post,
    /// Markdown body after the header.
    pub markdown: String,
    /// Sanitized HTML rendering of the body.
    pub content_html: String,
}

/// Current UTC time, e.g. `2024-01-15T09:30:00.000Z`.
fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
