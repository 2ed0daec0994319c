use serde::Serialize;

use crate::expression::Expression;
use crate::layer::LayerId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Line,
    Raster,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillPaint {
    #[serde(rename = "fill-color")]
    pub color: Expression,
    #[serde(rename = "fill-opacity")]
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePaint {
    #[serde(rename = "line-color")]
    pub color: Expression,
    #[serde(rename = "line-width")]
    pub width: f64,
    #[serde(rename = "line-opacity", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RasterPaint {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Fill(FillPaint),
    Line(LinePaint),
    Raster(RasterPaint),
}

/// Renderer layer description, serialized in the style-spec JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: LayerId,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    pub paint: Paint,
}

impl LayerSpec {
    pub fn fill(
        id: impl Into<LayerId>,
        source: &str,
        source_layer: &str,
        color: Expression,
        opacity: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Fill,
            source: source.to_string(),
            source_layer: Some(source_layer.to_string()),
            paint: Paint::Fill(FillPaint { color, opacity }),
        }
    }

    pub fn line(
        id: impl Into<LayerId>,
        source: &str,
        source_layer: &str,
        color: Expression,
        width: f64,
        opacity: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Line,
            source: source.to_string(),
            source_layer: Some(source_layer.to_string()),
            paint: Paint::Line(LinePaint {
                color,
                width,
                opacity,
            }),
        }
    }

    pub fn raster(id: impl Into<LayerId>, source: &str) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Raster,
            source: source.to_string(),
            source_layer: None,
            paint: Paint::Raster(RasterPaint::default()),
        }
    }
}

/// Renderer source description, tagged by `type` like the style spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    Raster {
        tiles: Vec<String>,
        #[serde(rename = "tileSize")]
        tile_size: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    Vector {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
}
