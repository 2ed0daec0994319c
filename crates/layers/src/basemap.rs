use serde::{Deserialize, Serialize};

use crate::layer::LayerId;
use crate::spec::{LayerSpec, SourceSpec};

/// Raster imagery drawn beneath the thematic layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Basemap {
    pub source_id: String,
    pub layer_id: String,
    /// XYZ URL templates.
    pub tiles: Vec<String>,
    pub tile_size: u32,
    pub attribution: Option<String>,
}

impl Basemap {
    pub fn layer_id(&self) -> LayerId {
        LayerId::new(self.layer_id.clone())
    }

    pub fn source_spec(&self) -> SourceSpec {
        SourceSpec::Raster {
            tiles: self.tiles.clone(),
            tile_size: self.tile_size,
            attribution: self.attribution.clone(),
        }
    }

    pub fn layer_spec(&self) -> LayerSpec {
        LayerSpec::raster(self.layer_id(), &self.source_id)
    }
}

impl Default for Basemap {
    fn default() -> Self {
        Self {
            source_id: "esri-sat".to_string(),
            layer_id: "basemap-satellite".to_string(),
            tiles: vec![
                "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
            ],
            tile_size: 256,
            attribution: Some(
                "Imagery &copy; <a href=\"https://www.esri.com/\">Esri</a> | Boundaries &copy; contributors"
                    .to_string(),
            ),
        }
    }
}
