//! Blog posts stored as markdown files with a YAML front matter header.
//!
//! Every `<id>.md` file in the posts directory is one post:
//!
//! ```text
//! ---
//! title: Getting Started with AI Automation
//! excerpt: Learn the basics of implementing AI automation in your business.
//! date: "2024-01-15"
//! author: Jane Doe
//! role: Engineer
//! image: /posts/images/getting-started.jpg
//! ---
//! Markdown body...
//! ```
//!
//! Missing header fields fall back to defaults, so a bare markdown file is
//! still a valid post.

mod error;
mod front_matter;
pub mod markdown;
mod post;
mod repository;

pub use error::PostError;
pub use front_matter::FrontMatter;
pub use post::{DEFAULT_IMAGE, Post, PostContent};
pub use repository::PostRepository;
