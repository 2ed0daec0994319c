use std::collections::BTreeSet;

use runtime::{Diagnostics, kinds};

use crate::archive::ArchiveReader;

/// Which thematic layers the archive actually contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Exactly the layers the metadata declares.
    Known(BTreeSet<String>),
    /// Metadata could not be read; every layer is assumed present.
    Unknown,
}

impl Availability {
    /// `Unknown` answers `true` for every layer: a metadata failure must
    /// never hide layers that may well exist.
    pub fn is_available(&self, name: &str) -> bool {
        match self {
            Availability::Known(names) => names.contains(name),
            Availability::Unknown => true,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Availability::Known(_))
    }
}

/// Discovers the vector layers packed in an archive.
#[derive(Debug, Clone)]
pub struct LayerAvailabilityResolver {
    diagnostics: Diagnostics,
}

impl LayerAvailabilityResolver {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Single attempt, no retry. Failures degrade to [`Availability::Unknown`].
    pub async fn resolve(&self, archive: &dyn ArchiveReader) -> Availability {
        let metadata = match archive.metadata().await {
            Ok(metadata) => metadata,
            Err(err) => {
                self.diagnostics.warn(
                    kinds::METADATA_UNAVAILABLE,
                    format!("unable to read archive metadata, proceeding optimistically: {err}"),
                );
                return Availability::Unknown;
            }
        };

        match metadata.layer_ids() {
            Some(ids) => {
                self.diagnostics.info(
                    kinds::METADATA_LAYERS,
                    format!(
                        "vector layers discovered: {}",
                        ids.iter().cloned().collect::<Vec<_>>().join(", ")
                    ),
                );
                Availability::Known(ids)
            }
            None => {
                self.diagnostics.warn(
                    kinds::METADATA_UNAVAILABLE,
                    format!(
                        "archive {} declares no vector_layers, proceeding optimistically",
                        archive.location()
                    ),
                );
                Availability::Unknown
            }
        }
    }
}
