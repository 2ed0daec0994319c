use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use layers::{Layer, LayerId, LayerSpec, ThematicCatalog};
use runtime::{Diagnostics, Renderer, RendererEvent, SubscriptionId, kinds};
use streaming::{ArchiveReader, Availability, LayerAvailabilityResolver};

use crate::config::MapConfig;
use crate::interaction::attach_interactions;
use crate::sample::log_owner_sample;
use crate::wait::{wait_for_source, wait_for_style};

/// Composition lifecycle. States only move forward.
///
/// Idle -> WaitingForSource -> ResolvingAvailability -> AddingLayers -> Ready
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComposerState {
    Idle,
    WaitingForSource,
    ResolvingAvailability,
    AddingLayers,
    Ready,
}

impl ComposerState {
    pub fn as_str(self) -> &'static str {
        match self {
            ComposerState::Idle => "idle",
            ComposerState::WaitingForSource => "waiting-for-source",
            ComposerState::ResolvingAvailability => "resolving-availability",
            ComposerState::AddingLayers => "adding-layers",
            ComposerState::Ready => "ready",
        }
    }
}

impl fmt::Display for ComposerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    Failed(String),
}

/// What one composition pass did to the renderer's style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    pub availability: Option<Availability>,
    pub added: Vec<LayerId>,
    pub already_present: Vec<LayerId>,
    pub failed: Vec<LayerId>,
    /// Thematic layers the archive does not contain.
    pub skipped: Vec<String>,
    /// Layer ids wired for click and hover.
    pub interactive: Vec<LayerId>,
}

/// Adds the thematic layers to the renderer once the data is ready.
///
/// Safe to run more than once: every add is guarded by an existence check,
/// so a second pass re-reads the archive metadata but changes nothing.
pub struct LayerComposer {
    renderer: Rc<dyn Renderer>,
    archive: Rc<dyn ArchiveReader>,
    catalog: Rc<ThematicCatalog>,
    config: MapConfig,
    diagnostics: Diagnostics,
    state: Cell<ComposerState>,
    history: RefCell<Vec<ComposerState>>,
    interactive: Cell<bool>,
}

impl LayerComposer {
    pub fn new(
        renderer: Rc<dyn Renderer>,
        archive: Rc<dyn ArchiveReader>,
        catalog: Rc<ThematicCatalog>,
        config: MapConfig,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            renderer,
            archive,
            catalog,
            config,
            diagnostics,
            state: Cell::new(ComposerState::Idle),
            history: RefCell::new(vec![ComposerState::Idle]),
            interactive: Cell::new(false),
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state.get()
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> Vec<ComposerState> {
        self.history.borrow().clone()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub async fn compose(&self) -> CompositionReport {
        let mut report = CompositionReport::default();
        let renderer = self.renderer.as_ref();

        wait_for_style(renderer).await;
        if !self.install_sources() {
            return report;
        }

        self.enter(ComposerState::WaitingForSource);
        wait_for_source(renderer, &self.config.source_id).await;
        self.diagnostics.info(
            kinds::SOURCE_LOADED,
            format!("vector source '{}' loaded", self.config.source_id),
        );

        self.enter(ComposerState::ResolvingAvailability);
        let availability = LayerAvailabilityResolver::new(self.diagnostics.clone())
            .resolve(self.archive.as_ref())
            .await;
        if availability.is_known() {
            log_owner_sample(
                renderer,
                &self.config.source_id,
                self.config.owner_sample_size,
                &self.diagnostics,
            );
        }

        self.enter(ComposerState::AddingLayers);
        for layer in self.catalog.iter() {
            if !availability.is_available(layer.name()) {
                self.diagnostics.warn(
                    kinds::LAYER_SKIPPED,
                    format!("layer '{}' not found in archive; skipping", layer.name()),
                );
                report.skipped.push(layer.name().to_string());
                continue;
            }
            for spec in layer.specs(&self.config.source_id) {
                match self.add_layer(&spec) {
                    AddOutcome::Added => report.added.push(spec.id),
                    AddOutcome::AlreadyPresent => report.already_present.push(spec.id),
                    AddOutcome::Failed(_) => report.failed.push(spec.id),
                }
            }
        }

        report.interactive = self.catalog.clickable_ids();
        if !self.interactive.replace(true) {
            attach_interactions(&self.renderer, &report.interactive, &self.diagnostics);
        }
        report.availability = Some(availability);

        self.enter(ComposerState::Ready);
        report
    }

    /// Adds `spec` unless a layer with its id exists. Failures are logged
    /// and reported, never raised.
    pub fn add_layer(&self, spec: &LayerSpec) -> AddOutcome {
        if self.renderer.has_layer(&spec.id) {
            return AddOutcome::AlreadyPresent;
        }
        match self.renderer.add_layer(spec) {
            Ok(()) => {
                self.diagnostics
                    .debug(kinds::LAYER_ADDED, format!("added layer {}", spec.id));
                AddOutcome::Added
            }
            Err(err) => {
                self.diagnostics.warn(
                    kinds::LAYER_ADD_FAILED,
                    format!("failed to add layer {}: {err}", spec.id),
                );
                AddOutcome::Failed(err.to_string())
            }
        }
    }

    /// Basemap beneath, thematic vector source on top. Returns `false` when
    /// the thematic source could not be installed, since its loaded event
    /// would then never arrive.
    fn install_sources(&self) -> bool {
        let basemap = &self.config.basemap;
        self.add_source(&basemap.source_id, &basemap.source_spec());
        if self.renderer.has_source(&basemap.source_id) {
            self.add_layer(&basemap.layer_spec());
        }

        self.add_source(&self.config.source_id, &self.config.vector_source());
        if !self.renderer.has_source(&self.config.source_id) {
            self.diagnostics.error(
                kinds::SOURCE_ADD_FAILED,
                format!(
                    "thematic source '{}' unavailable; no layers will be added",
                    self.config.source_id
                ),
            );
            return false;
        }
        true
    }

    fn add_source(&self, id: &str, spec: &layers::SourceSpec) {
        if self.renderer.has_source(id) {
            return;
        }
        if let Err(err) = self.renderer.add_source(id, spec) {
            self.diagnostics
                .warn(kinds::SOURCE_ADD_FAILED, format!("failed to add source {id}: {err}"));
        }
    }

    fn enter(&self, next: ComposerState) {
        if next <= self.state.get() {
            return;
        }
        self.state.set(next);
        self.history.borrow_mut().push(next);
        self.diagnostics
            .debug(kinds::COMPOSER_STATE, format!("composer -> {next}"));
    }
}

impl fmt::Debug for LayerComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerComposer")
            .field("state", &self.state.get())
            .field("archive", &self.archive.location())
            .field("layers", &self.catalog.len())
            .finish()
    }
}

/// Forwards renderer runtime errors to the diagnostics log.
pub fn watch_renderer_errors(renderer: &dyn Renderer, diagnostics: &Diagnostics) -> SubscriptionId {
    let diagnostics = diagnostics.clone();
    renderer.subscribe(Box::new(move |event| {
        if let RendererEvent::Error { message } = event {
            diagnostics.error(kinds::RENDERER_ERROR, format!("map error: {message}"));
        }
    }))
}
