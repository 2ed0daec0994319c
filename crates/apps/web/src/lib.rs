use std::cell::RefCell;
use std::rc::Rc;

use composer::{LayerComposer, MapConfig, watch_renderer_errors};
use layers::ThematicCatalog;
use legend::{LegendModel, LegendView};
use runtime::{Diagnostic, Diagnostics, Level, Renderer, kinds};
use selection::SelectionState;
use streaming::{ArchiveReader, PmtilesArchive};
use sync::FilterSynchronizer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod legend_dom;
mod maplibre;

use legend_dom::{ChangeListener, render_legend};
use maplibre::MapLibreRenderer;

/// Everything that has to live as long as the page.
struct App {
    _renderer: Rc<MapLibreRenderer>,
    _legend: Rc<LegendView>,
    _listener: ChangeListener,
    diagnostics: Diagnostics,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Builds the map inside the element with id `container`.
///
/// `archive_url` overrides the configured archive when non-empty;
/// `config_json` is an optional partial [`MapConfig`] document.
#[wasm_bindgen]
pub fn init_map(
    container: &str,
    archive_url: &str,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    if APP.with(|app| app.borrow().is_some()) {
        return Err(JsValue::from_str("map already initialized"));
    }

    let mut config = match config_json {
        Some(text) => MapConfig::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => MapConfig::default(),
    };
    if !archive_url.is_empty() {
        config = config.with_archive_url(archive_url);
    }

    let diagnostics = Diagnostics::new();
    diagnostics.set_sink(log_to_console);

    let renderer = Rc::new(MapLibreRenderer::create(container, &config)?);
    let shared: Rc<dyn Renderer> = renderer.clone();
    watch_renderer_errors(&*shared, &diagnostics);

    let catalog = Rc::new(ThematicCatalog::standard());
    let archive: Rc<dyn ArchiveReader> = Rc::new(PmtilesArchive::new(&config.archive_url));
    let synchronizer = Rc::new(FilterSynchronizer::new(
        shared.clone(),
        catalog.clone(),
        diagnostics.clone(),
    ));
    let selection = Rc::new(RefCell::new(SelectionState::new(catalog.names())));
    let legend = Rc::new(LegendView::bind(
        LegendModel::build(&catalog),
        selection,
        synchronizer,
    ));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let (panel, listener) = render_legend(&document, legend.clone())?;
    renderer.add_control(&panel, "top-left");

    let composer = Rc::new(LayerComposer::new(
        shared,
        archive,
        catalog,
        config,
        diagnostics.clone(),
    ));
    let log = diagnostics.clone();
    let view = legend.clone();
    spawn_local(async move {
        let report = composer.compose().await;
        view.reconcile();
        log.info(
            kinds::COMPOSER_STATE,
            format!(
                "composition finished: {} added, {} present, {} skipped, {} failed",
                report.added.len(),
                report.already_present.len(),
                report.skipped.len(),
                report.failed.len()
            ),
        );
    });

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            _renderer: renderer,
            _legend: legend,
            _listener: listener,
            diagnostics,
        });
    });
    Ok(())
}

/// Diagnostics recorded so far, one `Level kind: message` line each.
#[wasm_bindgen]
pub fn diagnostics() -> Vec<String> {
    APP.with(|app| {
        app.borrow()
            .as_ref()
            .map(|app| app.diagnostics.events().iter().map(format_diagnostic).collect())
            .unwrap_or_default()
    })
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!("{:?} {}: {}", diagnostic.level, diagnostic.kind, diagnostic.message)
}

fn log_to_console(diagnostic: &Diagnostic) {
    let text = JsValue::from_str(&format_diagnostic(diagnostic));
    match diagnostic.level {
        Level::Debug => web_sys::console::debug_1(&text),
        Level::Info => web_sys::console::log_1(&text),
        Level::Warn => web_sys::console::warn_1(&text),
        Level::Error => web_sys::console::error_1(&text),
    }
}
