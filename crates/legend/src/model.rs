use layers::{Layer, ThematicCatalog, ThematicKind};
use symbology::{Category, Color};

pub const LEGEND_TITLE: &str = "Layers";
pub const OWNERSHIP_SECTION: &str = "Ownership";
pub const ACTIVITY_SECTION: &str = "Beaver Activity Areas";

/// What a checkbox changes when toggled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegendIntent {
    Category(Category),
    /// Visibility of one thematic layer (all of its renderer layers).
    Layer(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendRow {
    /// DOM id of the checkbox; unique within the legend.
    pub control_id: String,
    pub label: String,
    pub swatch: Option<Color>,
    pub intent: LegendIntent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendSection {
    /// Sections without a title render their rows directly under the
    /// previous one.
    pub title: Option<String>,
    pub rows: Vec<LegendRow>,
}

/// Static layout of the legend control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendModel {
    pub title: String,
    pub sections: Vec<LegendSection>,
}

impl LegendModel {
    /// Ownership categories first, then the boundary toggle, the activity
    /// years, and finally the ownership group toggle.
    pub fn build(catalog: &ThematicCatalog) -> Self {
        let mut sections = vec![LegendSection {
            title: Some(OWNERSHIP_SECTION.to_string()),
            rows: Category::ALL.iter().map(|c| category_row(*c)).collect(),
        }];

        let boundary: Vec<LegendRow> = catalog
            .iter()
            .filter(|l| l.kind == ThematicKind::Boundary)
            .map(|l| layer_row(l.name(), l.legend_label(), l.swatch()))
            .collect();
        if !boundary.is_empty() {
            sections.push(LegendSection {
                title: None,
                rows: boundary,
            });
        }

        let activity: Vec<LegendRow> = catalog
            .activity_areas()
            .map(|l| layer_row(l.name(), l.legend_label(), l.swatch()))
            .collect();
        if !activity.is_empty() {
            sections.push(LegendSection {
                title: Some(ACTIVITY_SECTION.to_string()),
                rows: activity,
            });
        }

        let group: Vec<LegendRow> = catalog
            .iter()
            .filter(|l| l.kind == ThematicKind::Ownership)
            .map(|l| layer_row(l.name(), l.legend_label(), None))
            .collect();
        if !group.is_empty() {
            sections.push(LegendSection {
                title: None,
                rows: group,
            });
        }

        Self {
            title: LEGEND_TITLE.to_string(),
            sections,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &LegendRow> + '_ {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    pub fn row(&self, control_id: &str) -> Option<&LegendRow> {
        self.rows().find(|r| r.control_id == control_id)
    }
}

fn category_row(category: Category) -> LegendRow {
    LegendRow {
        control_id: format!("lg-owner-{}", slug(category.canonical_key())),
        label: category.label().to_string(),
        swatch: Some(category.color()),
        intent: LegendIntent::Category(category),
    }
}

fn layer_row(name: &str, label: String, swatch: Option<Color>) -> LegendRow {
    LegendRow {
        control_id: format!("lg-{name}"),
        label,
        swatch,
        intent: LegendIntent::Layer(name.to_string()),
    }
}

fn slug(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ACTIVITY_SECTION, LegendIntent, LegendModel, OWNERSHIP_SECTION};
    use layers::ThematicCatalog;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use symbology::{Category, Color};

    #[test]
    fn one_row_per_category_layer_and_group() {
        let catalog = ThematicCatalog::standard();
        let model = LegendModel::build(&catalog);

        let categories = model
            .rows()
            .filter(|r| matches!(r.intent, LegendIntent::Category(_)))
            .count();
        let layers = model
            .rows()
            .filter(|r| matches!(r.intent, LegendIntent::Layer(_)))
            .count();
        assert_eq!(categories, Category::COUNT);
        assert_eq!(layers, catalog.len());
    }

    #[test]
    fn control_ids_are_unique() {
        let model = LegendModel::build(&ThematicCatalog::standard());
        let ids: BTreeSet<&str> = model.rows().map(|r| r.control_id.as_str()).collect();
        assert_eq!(ids.len(), model.rows().count());
    }

    #[test]
    fn layout_follows_the_legend_order() {
        let model = LegendModel::build(&ThematicCatalog::standard());
        let titles: Vec<Option<&str>> = model.sections.iter().map(|s| s.title.as_deref()).collect();
        assert_eq!(
            titles,
            vec![Some(OWNERSHIP_SECTION), None, Some(ACTIVITY_SECTION), None]
        );
        assert_eq!(model.sections[1].rows[0].control_id, "lg-huc10");
        assert_eq!(model.sections[1].rows[0].label, "HUC10 outline");
        assert_eq!(model.sections[3].rows[0].control_id, "lg-owner");
        assert_eq!(model.sections[3].rows[0].label, "Show ownership");
    }

    #[test]
    fn activity_rows_use_year_and_outline_swatch() {
        let model = LegendModel::build(&ThematicCatalog::standard());
        let row = model
            .row("lg-2019_Colorado_Beaver_Activity_Areas")
            .expect("2019 row");
        assert_eq!(row.label, "2019");
        assert_eq!(row.swatch, Some(Color::hex(0xF2C300)));
        assert_eq!(
            row.intent,
            LegendIntent::Layer("2019_Colorado_Beaver_Activity_Areas".to_string())
        );
    }

    #[test]
    fn category_rows_carry_fill_swatch() {
        let model = LegendModel::build(&ThematicCatalog::standard());
        let row = model.row("lg-owner-local-government").expect("row");
        assert_eq!(row.label, "Local Government");
        assert_eq!(row.swatch, Some(Category::LocalGovernment.color()));
    }

    #[test]
    fn empty_catalog_keeps_category_rows() {
        let model = LegendModel::build(&ThematicCatalog::new(Vec::new()));
        assert_eq!(model.sections.len(), 1);
        assert_eq!(model.rows().count(), Category::COUNT);
    }
}
