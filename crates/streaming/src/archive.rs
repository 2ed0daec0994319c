//! Tile-archive reader abstraction.
//!
//! The map only needs one thing from an archive: its metadata document,
//! which declares the named vector layers packed inside. Readers are used
//! from the single UI thread, so their futures are not required to be `Send`.

use std::future::Future;
use std::pin::Pin;

use crate::metadata::ArchiveMetadata;

/// Error type for archive operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to read archive {location}: {reason}")]
    Fetch { location: String, reason: String },
    #[error("archive metadata is not valid JSON: {0}")]
    Parse(String),
}

impl ArchiveError {
    pub fn fetch(location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Type alias for a boxed future bound to the current thread.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub trait ArchiveReader {
    /// Where the archive lives (URL or path), for diagnostics.
    fn location(&self) -> &str;

    /// Fetches and parses the archive's metadata document. One attempt; the
    /// reader does not retry.
    fn metadata(&self) -> LocalBoxFuture<'_, Result<ArchiveMetadata, ArchiveError>>;
}
