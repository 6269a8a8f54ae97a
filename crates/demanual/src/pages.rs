//! Static page documents compiled into the binary.

use demanual_core::Page;

const HOME: &str = include_str!("../pages/home.md");
const SERVICES: &str = include_str!("../pages/services.md");
const ABOUT: &str = include_str!("../pages/about.md");
const CONTACT: &str = include_str!("../pages/contact.md");
const PRIVACY: &str = include_str!("../pages/privacy.md");
const TERMS: &str = include_str!("../pages/terms.md");
const NOT_FOUND: &str = include_str!("../pages/not-found.md");

/// Markdown source of a static page. The blog is built from posts instead.
pub fn document(page: Page) -> Option<&'static str> {
    match page {
        Page::Home => Some(HOME),
        Page::Services => Some(SERVICES),
        Page::About => Some(ABOUT),
        Page::Contact => Some(CONTACT),
        Page::Privacy => Some(PRIVACY),
        Page::Terms => Some(TERMS),
        Page::NotFound => Some(NOT_FOUND),
        Page::Blog => None,
    }
}
