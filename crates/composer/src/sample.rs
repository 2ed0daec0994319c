use std::collections::BTreeMap;

use layers::{OWNER_LAYER, OWNERSHIP_FIELD};
use runtime::{Diagnostics, Feature, Renderer, kinds};

/// Most frequent lower-cased values of `field`, highest count first.
/// Ties are ordered by value.
pub fn top_values(features: &[Feature], field: &str, limit: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for feature in features {
        *counts
            .entry(feature.property_text(field).to_lowercase())
            .or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Logs the ownership values present in the loaded owner tiles. Purely
/// informational; a failed query is logged and otherwise ignored.
pub fn log_owner_sample(
    renderer: &dyn Renderer,
    source_id: &str,
    limit: usize,
    diagnostics: &Diagnostics,
) {
    match renderer.query_source_features(source_id, OWNER_LAYER) {
        Ok(features) => {
            let top = top_values(&features, OWNERSHIP_FIELD, limit);
            let listed = top
                .iter()
                .map(|(value, count)| format!("{value:?}={count}"))
                .collect::<Vec<_>>()
                .join(", ");
            diagnostics.info(
                kinds::OWNER_SAMPLE,
                format!("top {OWNERSHIP_FIELD} values in view: [{listed}]"),
            );
        }
        Err(err) => {
            diagnostics.warn(kinds::OWNER_SAMPLE, format!("owner category sampling failed: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{log_owner_sample, top_values};
    use pretty_assertions::assert_eq;
    use runtime::{Diagnostics, Feature, Level, MemoryRenderer, Renderer, kinds};
    use layers::SourceSpec;

    fn owner(value: &str) -> Feature {
        Feature::default().with_property("d_Mang_Type", value)
    }

    #[test]
    fn counts_case_insensitively() {
        let features = vec![owner("Federal"), owner("federal"), owner("Private"), Feature::default()];
        assert_eq!(
            top_values(&features, "d_Mang_Type", 15),
            vec![
                ("federal".to_string(), 2),
                (String::new(), 1),
                ("private".to_string(), 1),
            ]
        );
    }

    #[test]
    fn truncates_to_limit() {
        let features: Vec<Feature> = (0..20).map(|i| owner(&format!("v{i:02}"))).collect();
        assert_eq!(top_values(&features, "d_Mang_Type", 15).len(), 15);
    }

    #[test]
    fn missing_source_is_logged_not_raised() {
        let renderer = MemoryRenderer::loaded();
        let diagnostics = Diagnostics::new();
        log_owner_sample(&renderer, "ref", 15, &diagnostics);
        let events = diagnostics.of_kind(kinds::OWNER_SAMPLE);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::Warn);
    }

    #[test]
    fn loaded_features_are_summarized() {
        let renderer = MemoryRenderer::loaded();
        renderer
            .add_source(
                "ref",
                &SourceSpec::Vector {
                    url: "pmtiles://x".to_string(),
                    attribution: None,
                },
            )
            .expect("source");
        renderer.set_features("ref", "owner", vec![owner("State"), owner("STATE")]);
        let diagnostics = Diagnostics::new();
        log_owner_sample(&renderer, "ref", 15, &diagnostics);
        let events = diagnostics.of_kind(kinds::OWNER_SAMPLE);
        assert_eq!(events[0].level, Level::Info);
        assert!(events[0].message.contains("\"state\"=2"));
    }
}
