//! The pages of the site.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A top-level page of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Services,
    About,
    Blog,
    Contact,
    Privacy,
    Terms,
    NotFound,
}

impl Page {
    /// Pages in header navigation order.
    pub const NAVIGATION: [Page; 5] = [
        Page::Home,
        Page::Services,
        Page::About,
        Page::Blog,
        Page::Contact,
    ];

    /// Every page reachable by cycling, in footer order after the navigation.
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Services,
        Page::About,
        Page::Blog,
        Page::Contact,
        Page::Privacy,
        Page::Terms,
    ];

    /// Label shown in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Services => "services",
            Page::About => "about us",
            Page::Blog => "blog",
            Page::Contact => "contact us",
            Page::Privacy => "privacy policy",
            Page::Terms => "terms of service",
            Page::NotFound => "not found",
        }
    }

    /// URL path segment of the page.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "",
            Page::Services => "services",
            Page::About => "about",
            Page::Blog => "blog",
            Page::Contact => "contact",
            Page::Privacy => "privacy",
            Page::Terms => "terms",
            Page::NotFound => "404",
        }
    }

    /// Next page in [`Page::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous page in [`Page::ALL`], wrapping around.
    pub fn prev(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    // NotFound is not in ALL; cycling from it starts at Home.
    fn position(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error for a slug that names no page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page: {0:?}")]
pub struct ParsePageError(String);

impl FromStr for Page {
    type Err = ParsePageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().trim_matches('/').to_ascii_lowercase();
        match slug.as_str() {
            "" | "home" | "index" => Ok(Page::Home),
            "404" | "not-found" => Ok(Page::NotFound),
            other => Self::ALL
                .into_iter()
                .find(|p| p.slug() == other)
                .ok_or_else(|| ParsePageError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Page::Home.next(), Page::Services);
        assert_eq!(Page::Terms.next(), Page::Home);
        assert_eq!(Page::Home.prev(), Page::Terms);
        assert_eq!(Page::NotFound.next(), Page::Services);
    }

    #[test]
    fn test_parse_slugs() {
        assert_eq!("/".parse::<Page>(), Ok(Page::Home));
        assert_eq!("/about".parse::<Page>(), Ok(Page::About));
        assert_eq!("Blog".parse::<Page>(), Ok(Page::Blog));
        assert_eq!("404".parse::<Page>(), Ok(Page::NotFound));
        let err = "careers".parse::<Page>().unwrap_err();
        assert_eq!(err.to_string(), "unknown page: \"careers\"");
    }
}
