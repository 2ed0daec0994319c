use std::cell::Cell;

use crate::archive::{ArchiveError, ArchiveReader, LocalBoxFuture};
use crate::metadata::ArchiveMetadata;

/// In-memory archive for testing: returns a fixed metadata result.
pub struct MemoryArchive {
    location: String,
    result: Result<ArchiveMetadata, ArchiveError>,
    fetches: Cell<usize>,
}

impl MemoryArchive {
    pub fn new(result: Result<ArchiveMetadata, ArchiveError>) -> Self {
        Self {
            location: "memory://archive".to_string(),
            result,
            fetches: Cell::new(0),
        }
    }

    pub fn with_layers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Ok(ArchiveMetadata::with_layers(names)))
    }

    pub fn unreachable() -> Self {
        let location = "memory://archive";
        Self::new(Err(ArchiveError::fetch(location, "connection refused")))
    }

    /// Number of metadata requests served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl ArchiveReader for MemoryArchive {
    fn location(&self) -> &str {
        &self.location
    }

    fn metadata(&self) -> LocalBoxFuture<'_, Result<ArchiveMetadata, ArchiveError>> {
        Box::pin(async move {
            self.fetches.set(self.fetches.get() + 1);
            self.result.clone()
        })
    }
}
