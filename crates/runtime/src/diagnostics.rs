use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Stable tags for the diagnostics the map emits.
pub mod kinds {
    pub const LAYER_ADDED: &str = "layer.added";
    pub const LAYER_SKIPPED: &str = "layer.skipped";
    pub const LAYER_ADD_FAILED: &str = "layer.add_failed";
    pub const SOURCE_ADD_FAILED: &str = "source.add_failed";
    pub const SOURCE_LOADED: &str = "source.loaded";
    pub const FILTER_FAILED: &str = "filter.failed";
    pub const FILTER_SKIPPED: &str = "filter.skipped";
    pub const VISIBILITY_FAILED: &str = "visibility.failed";
    pub const VISIBILITY_SKIPPED: &str = "visibility.skipped";
    pub const METADATA_UNAVAILABLE: &str = "metadata.unavailable";
    pub const METADATA_LAYERS: &str = "metadata.layers";
    pub const OWNER_SAMPLE: &str = "owner.sample";
    pub const INTERACTION_FAILED: &str = "interaction.failed";
    pub const RENDERER_ERROR: &str = "renderer.error";
    pub const COMPOSER_STATE: &str = "composer.state";
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// A non-fatal condition worth surfacing: a skipped layer, a swallowed
/// renderer failure, a metadata fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub kind: &'static str,
    pub message: String,
}

/// How many of the most recent diagnostics stay in memory.
pub const RETAINED_DIAGNOSTICS: usize = 512;

type Sink = Rc<dyn Fn(&Diagnostic)>;

#[derive(Default)]
struct DiagnosticsInner {
    events: VecDeque<Diagnostic>,
    sink: Option<Sink>,
}

/// Shared, single-threaded diagnostics log.
///
/// Every diagnostic is logged through `tracing`; the last
/// [`RETAINED_DIAGNOSTICS`] are kept in memory so the host can forward or
/// inspect them. Clones share the same log.
#[derive(Clone, Default)]
pub struct Diagnostics {
    inner: Rc<RefCell<DiagnosticsInner>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards every subsequent diagnostic to `sink` (e.g. the browser console).
    pub fn set_sink(&self, sink: impl Fn(&Diagnostic) + 'static) {
        self.inner.borrow_mut().sink = Some(Rc::new(sink));
    }

    pub fn emit(&self, level: Level, kind: &'static str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            level,
            kind,
            message: message.into(),
        };
        match level {
            Level::Debug => tracing::debug!(kind, "{}", diagnostic.message),
            Level::Info => tracing::info!(kind, "{}", diagnostic.message),
            Level::Warn => tracing::warn!(kind, "{}", diagnostic.message),
            Level::Error => tracing::error!(kind, "{}", diagnostic.message),
        }

        let sink = {
            let mut inner = self.inner.borrow_mut();
            if inner.events.len() == RETAINED_DIAGNOSTICS {
                inner.events.pop_front();
            }
            inner.events.push_back(diagnostic.clone());
            inner.sink.clone()
        };
        if let Some(sink) = sink {
            sink(&diagnostic);
        }
    }

    pub fn debug(&self, kind: &'static str, message: impl Into<String>) {
        self.emit(Level::Debug, kind, message);
    }

    pub fn info(&self, kind: &'static str, message: impl Into<String>) {
        self.emit(Level::Info, kind, message);
    }

    pub fn warn(&self, kind: &'static str, message: impl Into<String>) {
        self.emit(Level::Warn, kind, message);
    }

    pub fn error(&self, kind: &'static str, message: impl Into<String>) {
        self.emit(Level::Error, kind, message);
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.inner.borrow().events.iter().cloned().collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|d| d.kind == kind)
            .count()
    }

    pub fn of_kind(&self, kind: &str) -> Vec<Diagnostic> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Diagnostics")
            .field("events", &inner.events)
            .field("sink", &inner.sink.is_some())
            .finish()
    }
}
