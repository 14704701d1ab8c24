//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

use super::ContentKind;

/// Errors raised while reading content from disk
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no {kind} found for slug `{slug}`")]
    NotFound { kind: ContentKind, slug: String },

    #[error("invalid front-matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
