use std::cell::RefCell;
use std::rc::Rc;

use selection::SelectionState;
use sync::{FilterSynchronizer, SyncReport};

use crate::model::{LegendIntent, LegendModel, LegendRow};

/// Legend bound to the selection it edits.
///
/// Checkbox changes become selection toggles; the synchronizer subscribed
/// in [`LegendView::bind`] turns each resulting snapshot into renderer
/// filters and visibility.
pub struct LegendView {
    model: LegendModel,
    state: Rc<RefCell<SelectionState>>,
    synchronizer: Rc<FilterSynchronizer>,
}

impl LegendView {
    pub fn bind(
        model: LegendModel,
        state: Rc<RefCell<SelectionState>>,
        synchronizer: Rc<FilterSynchronizer>,
    ) -> Self {
        let sink = synchronizer.clone();
        state.borrow_mut().subscribe(move |snapshot| {
            sink.apply(snapshot);
        });
        Self {
            model,
            state,
            synchronizer,
        }
    }

    /// Pushes the current selection to the renderer again.
    ///
    /// Toggles made before the layers existed were skipped for those
    /// layers; call this once they have been added.
    pub fn reconcile(&self) -> SyncReport {
        self.synchronizer.apply(self.state.borrow().snapshot())
    }

    pub fn model(&self) -> &LegendModel {
        &self.model
    }

    /// Handles one checkbox change. Returns `false` for unknown controls.
    pub fn on_change(&self, control_id: &str, checked: bool) -> bool {
        let Some(row) = self.model.row(control_id) else {
            return false;
        };
        let mut state = self.state.borrow_mut();
        match &row.intent {
            LegendIntent::Category(category) => {
                state.toggle_category(*category, checked);
            }
            LegendIntent::Layer(name) => {
                state.toggle_layer_visibility(name, checked);
            }
        }
        true
    }

    pub fn is_checked(&self, row: &LegendRow) -> bool {
        let state = self.state.borrow();
        let snapshot = state.snapshot();
        match &row.intent {
            LegendIntent::Category(category) => snapshot.is_category_enabled(*category),
            LegendIntent::Layer(name) => snapshot.is_layer_visible(name),
        }
    }
}

impl std::fmt::Debug for LegendView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegendView")
            .field("rows", &self.model.rows().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::LegendView;
    use crate::model::LegendModel;
    use composer::{ComposerState, LayerComposer, MapConfig};
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use layers::{Layer, LayerId, SourceSpec, ThematicCatalog};
    use pretty_assertions::assert_eq;
    use runtime::{Diagnostics, MemoryRenderer, Renderer, kinds};
    use selection::SelectionState;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use streaming::MemoryArchive;
    use symbology::Category;
    use sync::FilterSynchronizer;

    struct Fixture {
        renderer: Rc<MemoryRenderer>,
        state: Rc<RefCell<SelectionState>>,
        view: LegendView,
    }

    fn fixture() -> Fixture {
        let catalog = Rc::new(ThematicCatalog::standard());
        let renderer = Rc::new(MemoryRenderer::loaded());
        renderer
            .add_source(
                "ref",
                &SourceSpec::Vector {
                    url: "pmtiles://x".to_string(),
                    attribution: None,
                },
            )
            .expect("source");
        for layer in catalog.iter() {
            for spec in layer.specs("ref") {
                renderer.add_layer(&spec).expect("add");
            }
        }
        let synchronizer = Rc::new(FilterSynchronizer::new(
            renderer.clone(),
            catalog.clone(),
            Diagnostics::new(),
        ));
        let state = Rc::new(RefCell::new(SelectionState::new(catalog.names())));
        let view = LegendView::bind(LegendModel::build(&catalog), state.clone(), synchronizer);
        Fixture {
            renderer,
            state,
            view,
        }
    }

    #[test]
    fn category_checkbox_drives_owner_filter() {
        let f = fixture();
        assert!(f.view.on_change("lg-owner-private", false));
        assert!(!f.state.borrow().snapshot().is_category_enabled(Category::Private));
        assert!(f.renderer.filter(&LayerId::from("owner-fill")).is_some());

        assert!(f.view.on_change("lg-owner-private", true));
        assert_eq!(f.renderer.filter(&LayerId::from("owner-fill")), None);
    }

    #[test]
    fn group_toggle_leaves_category_filter_alone() {
        let f = fixture();
        f.view.on_change("lg-owner-federal", false);
        let filter = f.renderer.filter(&LayerId::from("owner-fill"));
        assert!(filter.is_some());

        f.view.on_change("lg-owner", false);
        assert_eq!(f.renderer.is_visible(&LayerId::from("owner-fill")), Some(false));
        assert_eq!(f.renderer.is_visible(&LayerId::from("owner-outline")), Some(false));
        assert_eq!(f.renderer.filter(&LayerId::from("owner-fill")), filter);
        assert!(!f.state.borrow().snapshot().is_category_enabled(Category::Federal));
    }

    #[test]
    fn huc10_checkbox_hides_outline() {
        let f = fixture();
        f.view.on_change("lg-huc10", false);
        assert_eq!(f.renderer.is_visible(&LayerId::from("huc10-outline")), Some(false));
        assert_eq!(f.renderer.is_visible(&LayerId::from("owner-fill")), Some(true));
    }

    #[test]
    fn unknown_control_changes_nothing() {
        let f = fixture();
        let before = f.state.borrow().snapshot().clone();
        assert!(!f.view.on_change("lg-nope", false));
        assert_eq!(f.state.borrow().snapshot(), &before);
    }

    #[test]
    fn checked_state_mirrors_selection() {
        let f = fixture();
        let row = f.view.model().row("lg-2013_Colorado_Beaver_Activity_Areas").cloned().expect("row");
        assert!(f.view.is_checked(&row));
        f.view.on_change(&row.control_id, false);
        assert!(!f.view.is_checked(&row));
    }

    #[test]
    fn toggles_made_while_composing_reach_the_added_layers() {
        let activity = "2017_Colorado_Beaver_Activity_Areas";
        let catalog = Rc::new(ThematicCatalog::standard());
        let renderer = Rc::new(MemoryRenderer::loaded());
        let diagnostics = Diagnostics::new();
        let synchronizer = Rc::new(FilterSynchronizer::new(
            renderer.clone(),
            catalog.clone(),
            diagnostics.clone(),
        ));
        let state = Rc::new(RefCell::new(SelectionState::new(catalog.names())));
        let view = Rc::new(LegendView::bind(
            LegendModel::build(&catalog),
            state.clone(),
            synchronizer,
        ));
        let composer = Rc::new(LayerComposer::new(
            renderer.clone(),
            Rc::new(MemoryArchive::with_layers(["owner", activity])),
            catalog,
            MapConfig::default(),
            diagnostics.clone(),
        ));

        let mut pool = LocalPool::new();
        let done = Rc::new(Cell::new(false));
        {
            let composer = composer.clone();
            let view = view.clone();
            let done = done.clone();
            pool.spawner()
                .spawn_local(async move {
                    composer.compose().await;
                    view.reconcile();
                    done.set(true);
                })
                .expect("spawn");
        }
        pool.run_until_stalled();
        assert_eq!(composer.state(), ComposerState::WaitingForSource);

        assert!(view.on_change("lg-owner-private", false));
        assert!(view.on_change(&format!("lg-{activity}"), false));
        assert!(diagnostics.count(kinds::VISIBILITY_SKIPPED) > 0);

        renderer.finish_source_load("ref");
        pool.run_until_stalled();
        assert!(done.get());
        assert_eq!(composer.state(), ComposerState::Ready);

        let fill = LayerId::new(format!("beaver-{activity}-fill"));
        let outline = LayerId::new(format!("beaver-{activity}-outline"));
        assert_eq!(renderer.is_visible(&fill), Some(false));
        assert_eq!(renderer.is_visible(&outline), Some(false));
        assert_eq!(renderer.is_visible(&LayerId::from("owner-fill")), Some(true));

        let filter = renderer.filter(&LayerId::from("owner-fill")).expect("owner filter");
        assert_eq!(renderer.filter(&LayerId::from("owner-outline")), Some(filter.clone()));
        let labels = filter.value()[2][1].as_array().expect("labels").clone();
        assert_eq!(labels.len(), Category::COUNT - 1);
        assert!(!labels.contains(&serde_json::json!("private")));
    }

    #[test]
    fn reconcile_without_pending_toggles_keeps_defaults() {
        let f = fixture();
        let report = f.view.reconcile();
        assert_eq!(report.failed, 0);
        assert_eq!(report.missing, 0);
        assert_eq!(f.renderer.filter(&LayerId::from("owner-fill")), None);
        assert_eq!(f.renderer.is_visible(&LayerId::from("huc10-outline")), Some(true));
    }
}
