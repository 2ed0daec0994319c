use pmtiles::async_reader::AsyncPmTilesReader;

use crate::archive::{ArchiveError, ArchiveReader, LocalBoxFuture};
use crate::metadata::ArchiveMetadata;

/// URL scheme the renderer uses to route tile requests through the
/// PMTiles protocol handler.
pub const PMTILES_SCHEME: &str = "pmtiles://";

/// Plain archive URL, with any `pmtiles://` prefix removed.
pub fn archive_url(location: &str) -> &str {
    location.strip_prefix(PMTILES_SCHEME).unwrap_or(location)
}

/// Source URL for the renderer: the archive URL behind the `pmtiles://` scheme.
pub fn source_url(location: &str) -> String {
    format!("{PMTILES_SCHEME}{}", archive_url(location))
}

/// PMTiles archive read over HTTP range requests.
///
/// Only the header and metadata block are fetched; the archive is never
/// downloaded in full.
pub struct PmtilesArchive {
    url: String,
    client: reqwest::Client,
}

impl PmtilesArchive {
    pub fn new(location: &str) -> Self {
        Self {
            url: archive_url(location).to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl ArchiveReader for PmtilesArchive {
    fn location(&self) -> &str {
        &self.url
    }

    fn metadata(&self) -> LocalBoxFuture<'_, Result<ArchiveMetadata, ArchiveError>> {
        Box::pin(async move {
            let reader = AsyncPmTilesReader::new_with_url(self.client.clone(), self.url.as_str())
                .await
                .map_err(|e| ArchiveError::fetch(&self.url, e))?;
            let json = reader
                .get_metadata()
                .await
                .map_err(|e| ArchiveError::fetch(&self.url, e))?;
            ArchiveMetadata::from_json(&json)
        })
    }
}
