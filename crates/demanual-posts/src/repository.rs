//! Directory-backed post storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PostError;
use crate::front_matter::FrontMatter;
use crate::markdown;
use crate::post::{Post, PostContent};

const EXTENSION: &str = "md";

/// Read-only access to the posts in one directory.
///
/// Posts are immutable while the site runs, so concurrent reads need no
/// coordination.
#[derive(Debug, Clone)]
pub struct PostRepository {
    posts_dir: PathBuf,
    images_dir: Option<PathBuf>,
}

impl PostRepository {
    /// Open the repository at `posts_dir`, creating the directory if needed.
    pub fn open(posts_dir: impl Into<PathBuf>) -> Result<Self, PostError> {
        let posts_dir = posts_dir.into();
        ensure_dir(&posts_dir)?;
        Ok(Self {
            posts_dir,
            images_dir: None,
        })
    }

    /// Also keep a directory for post images, creating it if needed.
    pub fn with_images_dir(mut self, images_dir: impl Into<PathBuf>) -> Result<Self, PostError> {
        let images_dir = images_dir.into();
        ensure_dir(&images_dir)?;
        self.images_dir = Some(images_dir);
        Ok(self)
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    pub fn images_dir(&self) -> Option<&Path> {
        self.images_dir.as_deref()
    }

    /// All posts, newest first.
    ///
    /// Dates are compared as strings, which orders correctly only for
    /// zero-padded `YYYY-MM-DD` dates. Posts with equal dates are ordered
    /// by id.
    pub fn list_posts(&self) -> Result<Vec<Post>, PostError> {
        let entries = match fs::read_dir(&self.posts_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(dir = %self.posts_dir.display(), "posts directory vanished, recreating");
                ensure_dir(&self.posts_dir)?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(PostError::io(&self.posts_dir, e)),
        };

        let mut posts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PostError::io(&self.posts_dir, e))?;
            let path = entry.path();
            let Some(id) = post_id(&path) else {
                continue;
            };
            if !path.is_file() {
                continue;
            }

            let source = read_source(&path).map_err(|e| PostError::io(&path, e))?;
            let (front_matter, _) = FrontMatter::extract(&source);
            posts.push(Post::from_front_matter(id, front_matter));
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        tracing::debug!(count = posts.len(), dir = %self.posts_dir.display(), "listed posts");
        Ok(posts)
    }

    /// Ids of all posts, in listing order.
    pub fn list_post_ids(&self) -> Result<Vec<String>, PostError> {
        Ok(self.list_posts()?.into_iter().map(|post| post.id).collect())
    }

    /// Load one post with its rendered body.
    pub fn get_post(&self, id: &str) -> Result<PostContent, PostError> {
        if !is_valid_id(id) {
            return Err(PostError::NotFound { id: id.to_string() });
        }

        let path = self.posts_dir.join(format!("{id}.{EXTENSION}"));
        let source = match read_source(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PostError::NotFound { id: id.to_string() });
            }
            Err(e) => return Err(PostError::io(&path, e)),
        };

        let (front_matter, body) = FrontMatter::extract(&source);
        Ok(PostContent {
            post: Post::from_front_matter(id, front_matter),
            markdown: body.to_string(),
            content_html: markdown::render_html(body),
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<(), PostError> {
    fs::create_dir_all(dir).map_err(|e| PostError::io(dir, e))
}

/// Read a post file. Invalid UTF-8 is replaced rather than failing the read.
fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(source) => Ok(source),
        Err(e) => {
            tracing::warn!(path = %path.display(), "post is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Id of the post stored at `path`, if it is a markdown file.
fn post_id(path: &Path) -> Option<String> {
    if path.extension()? != EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_valid_id(stem).then(|| stem.to_string())
}

/// An id must name a file directly inside the posts directory.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}
