use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("post not found: {id}")]
    NotFound { id: String },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PostError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PostError::NotFound { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PostError::Io {
            path: path.into(),
            source,
        }
    }
}
