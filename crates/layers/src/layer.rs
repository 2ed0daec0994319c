use serde::{Deserialize, Serialize};

use crate::spec::LayerSpec;

/// Identifier of a layer inside the renderer's live style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A named vector layer that expands into one or more renderer layers.
pub trait Layer {
    /// Source-layer name inside the tile archive.
    fn name(&self) -> &str;

    /// Renderer layers in insertion order, all bound to `source_id`.
    fn specs(&self, source_id: &str) -> Vec<LayerSpec>;

    fn renderer_ids(&self) -> Vec<LayerId> {
        self.specs("").into_iter().map(|spec| spec.id).collect()
    }
}
