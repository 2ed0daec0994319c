use layers::{Basemap, SourceSpec};
use serde::{Deserialize, Serialize};
use streaming::source_url;

pub const DEFAULT_ARCHIVE_URL: &str =
    "https://data.lynker-spatial.com/vector-resources/beaver-scape/beaver-scape.pmtiles";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid map config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Map settings. Every field has a default, so a partial JSON document
/// overrides only what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Plain `https://` URL or `pmtiles://` location of the archive.
    pub archive_url: String,
    /// Renderer source id for the thematic vector tiles.
    pub source_id: String,
    pub source_attribution: Option<String>,
    /// `[lng, lat]`.
    pub center: [f64; 2],
    pub zoom: f64,
    /// Keep the camera position in the URL fragment.
    pub hash: bool,
    pub basemap: Basemap,
    /// How many distinct ownership values the load-time sample logs.
    pub owner_sample_size: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            source_id: "ref".to_string(),
            source_attribution: Some(
                "&copy; <a href=\"https://www.lynker-spatial.com\" target=\"_blank\" rel=\"noopener\">Lynker Spatial</a>"
                    .to_string(),
            ),
            center: [-105.5, 39.0],
            zoom: 6.0,
            hash: true,
            basemap: Basemap::default(),
            owner_sample_size: 15,
        }
    }
}

impl MapConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    /// The thematic vector source, routed through the `pmtiles://` protocol.
    pub fn vector_source(&self) -> SourceSpec {
        SourceSpec::Vector {
            url: source_url(&self.archive_url),
            attribution: self.source_attribution.clone(),
        }
    }
}
