use std::rc::Rc;

use layers::{Expression, Layer, LayerId, ThematicCatalog, ThematicKind};
use runtime::{Diagnostics, Renderer, kinds};
use selection::Selection;

use crate::filter::ownership_filter;

/// Renderer state derived from one selection snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// `None` clears the filter on that layer.
    pub filters: Vec<(LayerId, Option<Expression>)>,
    pub visibility: Vec<(LayerId, bool)>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub applied: usize,
    /// Calls skipped because the layer is not in the renderer (yet).
    pub missing: usize,
    pub failed: usize,
}

/// Pushes selection snapshots into the renderer as filters and layout
/// visibility.
///
/// Never fails: a layer that is absent from the renderer, or a call the
/// renderer rejects, is logged and skipped.
pub struct FilterSynchronizer {
    renderer: Rc<dyn Renderer>,
    catalog: Rc<ThematicCatalog>,
    diagnostics: Diagnostics,
}

impl FilterSynchronizer {
    pub fn new(
        renderer: Rc<dyn Renderer>,
        catalog: Rc<ThematicCatalog>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            renderer,
            catalog,
            diagnostics,
        }
    }

    pub fn plan(&self, selection: &Selection) -> SyncPlan {
        let filter = ownership_filter(&selection.categories());
        let mut filters = Vec::new();
        let mut visibility = Vec::new();

        for layer in self.catalog.iter() {
            let visible = selection.is_layer_visible(layer.name());
            for id in layer.renderer_ids() {
                if layer.kind == ThematicKind::Ownership {
                    filters.push((id.clone(), filter.clone()));
                }
                visibility.push((id, visible));
            }
        }

        SyncPlan {
            filters,
            visibility,
        }
    }

    pub fn apply(&self, selection: &Selection) -> SyncReport {
        let plan = self.plan(selection);
        let mut report = SyncReport::default();

        for (id, filter) in &plan.filters {
            if !self.renderer.has_layer(id) {
                report.missing += 1;
                self.diagnostics
                    .debug(kinds::FILTER_SKIPPED, format!("layer {id} not present"));
                continue;
            }
            match self.renderer.set_filter(id, filter.as_ref()) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    report.failed += 1;
                    self.diagnostics
                        .warn(kinds::FILTER_FAILED, format!("set filter on {id}: {err}"));
                }
            }
        }

        for (id, visible) in &plan.visibility {
            if !self.renderer.has_layer(id) {
                report.missing += 1;
                self.diagnostics
                    .debug(kinds::VISIBILITY_SKIPPED, format!("layer {id} not present"));
                continue;
            }
            match self.renderer.set_visibility(id, *visible) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    report.failed += 1;
                    self.diagnostics
                        .warn(kinds::VISIBILITY_FAILED, format!("set visibility on {id}: {err}"));
                }
            }
        }

        report
    }
}
