use symbology::Color;

use crate::expression::Expression;
use crate::layer::{Layer, LayerId};
use crate::paint::ownership_fill_color;
use crate::spec::LayerSpec;

/// Feature attribute carrying the raw ownership text.
pub const OWNERSHIP_FIELD: &str = "d_Mang_Type";

pub const OWNER_LAYER: &str = "owner";
pub const BOUNDARY_LAYER: &str = "huc10";
pub const ACTIVITY_SUFFIX: &str = "_Colorado_Beaver_Activity_Areas";

pub const OWNER_FILL: &str = "owner-fill";
pub const OWNER_OUTLINE: &str = "owner-outline";
pub const BOUNDARY_OUTLINE: &str = "huc10-outline";

/// Survey years and their outline colors, in legend order.
pub const ACTIVITY_YEARS: [(u16, Color); 5] = [
    (2013, Color::hex(0x3FB64B)),
    (2015, Color::hex(0x7D1739)),
    (2017, Color::hex(0xC97B7F)),
    (2019, Color::hex(0xF2C300)),
    (2021, Color::hex(0xFFC233)),
];

const OWNER_FILL_OPACITY: f64 = 0.35;
const OWNER_OUTLINE_COLOR: Color = Color::hex(0x222222);
const BOUNDARY_COLOR: Color = Color::hex(0x000000);
const ACTIVITY_FILL_OPACITY: f64 = 0.18;
const ACTIVITY_OUTLINE_WIDTH: f64 = 0.8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ThematicKind {
    Ownership,
    Boundary,
    ActivityArea { year: u16, outline: Color },
}

/// A vector layer that may or may not be present in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThematicLayer {
    name: String,
    pub kind: ThematicKind,
}

impl ThematicLayer {
    pub fn ownership() -> Self {
        Self {
            name: OWNER_LAYER.to_string(),
            kind: ThematicKind::Ownership,
        }
    }

    pub fn boundary() -> Self {
        Self {
            name: BOUNDARY_LAYER.to_string(),
            kind: ThematicKind::Boundary,
        }
    }

    pub fn activity_area(year: u16, outline: Color) -> Self {
        Self {
            name: format!("{year}{ACTIVITY_SUFFIX}"),
            kind: ThematicKind::ActivityArea { year, outline },
        }
    }

    pub fn is_activity_area(&self) -> bool {
        matches!(self.kind, ThematicKind::ActivityArea { .. })
    }

    /// Renderer layers that accept click/hover interaction.
    pub fn clickable_ids(&self) -> Vec<LayerId> {
        match self.kind {
            ThematicKind::Ownership => vec![LayerId::from(OWNER_FILL)],
            ThematicKind::Boundary => vec![LayerId::from(BOUNDARY_OUTLINE)],
            ThematicKind::ActivityArea { .. } => self.renderer_ids(),
        }
    }

    pub fn legend_label(&self) -> String {
        match self.kind {
            ThematicKind::Ownership => "Show ownership".to_string(),
            ThematicKind::Boundary => "HUC10 outline".to_string(),
            ThematicKind::ActivityArea { .. } => self
                .name
                .strip_suffix(ACTIVITY_SUFFIX)
                .unwrap_or(&self.name)
                .to_string(),
        }
    }

    pub fn swatch(&self) -> Option<Color> {
        match self.kind {
            ThematicKind::ActivityArea { outline, .. } => Some(outline),
            _ => None,
        }
    }

    fn activity_ids(&self) -> (String, String) {
        (
            format!("beaver-{}-fill", self.name),
            format!("beaver-{}-outline", self.name),
        )
    }
}

impl Layer for ThematicLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn specs(&self, source_id: &str) -> Vec<LayerSpec> {
        match self.kind {
            ThematicKind::Ownership => vec![
                LayerSpec::fill(
                    OWNER_FILL,
                    source_id,
                    &self.name,
                    ownership_fill_color(OWNERSHIP_FIELD),
                    OWNER_FILL_OPACITY,
                ),
                LayerSpec::line(
                    OWNER_OUTLINE,
                    source_id,
                    &self.name,
                    Expression::color(OWNER_OUTLINE_COLOR),
                    0.5,
                    Some(0.6),
                ),
            ],
            ThematicKind::Boundary => vec![LayerSpec::line(
                BOUNDARY_OUTLINE,
                source_id,
                &self.name,
                Expression::color(BOUNDARY_COLOR),
                0.6,
                Some(0.8),
            )],
            ThematicKind::ActivityArea { outline, .. } => {
                let (fill_id, line_id) = self.activity_ids();
                vec![
                    LayerSpec::fill(
                        fill_id,
                        source_id,
                        &self.name,
                        Expression::color(outline),
                        ACTIVITY_FILL_OPACITY,
                    ),
                    LayerSpec::line(
                        line_id,
                        source_id,
                        &self.name,
                        Expression::color(outline),
                        ACTIVITY_OUTLINE_WIDTH,
                        None,
                    ),
                ]
            }
        }
    }
}

/// The fixed set of thematic layers, in composition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThematicCatalog {
    layers: Vec<ThematicLayer>,
}

impl ThematicCatalog {
    pub fn new(layers: Vec<ThematicLayer>) -> Self {
        Self { layers }
    }

    /// Ownership, HUC10 boundaries, then one activity-area layer per year.
    pub fn standard() -> Self {
        let mut layers = vec![ThematicLayer::ownership(), ThematicLayer::boundary()];
        layers.extend(
            ACTIVITY_YEARS
                .iter()
                .map(|&(year, outline)| ThematicLayer::activity_area(year, outline)),
        );
        Self { layers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThematicLayer> + '_ {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name().to_string()).collect()
    }

    pub fn activity_areas(&self) -> impl Iterator<Item = &ThematicLayer> + '_ {
        self.layers.iter().filter(|l| l.is_activity_area())
    }

    pub fn clickable_ids(&self) -> Vec<LayerId> {
        self.layers.iter().flat_map(|l| l.clickable_ids()).collect()
    }
}

impl Default for ThematicCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_catalog_order() {
        let catalog = ThematicCatalog::standard();
        assert_eq!(
            catalog.names(),
            vec![
                "owner",
                "huc10",
                "2013_Colorado_Beaver_Activity_Areas",
                "2015_Colorado_Beaver_Activity_Areas",
                "2017_Colorado_Beaver_Activity_Areas",
                "2019_Colorado_Beaver_Activity_Areas",
                "2021_Colorado_Beaver_Activity_Areas",
            ]
        );
        assert_eq!(catalog.activity_areas().count(), 5);
    }

    #[test]
    fn activity_area_expands_to_fill_and_outline() {
        let layer = ThematicLayer::activity_area(2015, Color::hex(0x7D1739));
        let specs = layer.specs("ref");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].id.as_str(), "beaver-2015_Colorado_Beaver_Activity_Areas-fill");
        assert_eq!(specs[1].id.as_str(), "beaver-2015_Colorado_Beaver_Activity_Areas-outline");
        for spec in &specs {
            assert_eq!(spec.source, "ref");
            assert_eq!(spec.source_layer.as_deref(), Some(layer.name()));
        }
        assert_eq!(layer.legend_label(), "2015");
        assert_eq!(layer.swatch(), Some(Color::hex(0x7D1739)));
    }

    #[test]
    fn renderer_ids_per_kind() {
        assert_eq!(
            ThematicLayer::ownership().renderer_ids(),
            vec![LayerId::from(OWNER_FILL), LayerId::from(OWNER_OUTLINE)]
        );
        assert_eq!(
            ThematicLayer::boundary().renderer_ids(),
            vec![LayerId::from(BOUNDARY_OUTLINE)]
        );
    }

    #[test]
    fn clickable_ids_skip_owner_outline() {
        let ids = ThematicCatalog::standard().clickable_ids();
        assert_eq!(ids.len(), 1 + 1 + 5 * 2);
        assert!(ids.contains(&LayerId::from(OWNER_FILL)));
        assert!(!ids.contains(&LayerId::from(OWNER_OUTLINE)));
    }
}
