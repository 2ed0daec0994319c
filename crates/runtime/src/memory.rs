use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use layers::{Expression, LayerId, LayerSpec, SourceSpec};

use crate::error::RendererError;
use crate::renderer::{
    EventHandler, Feature, LngLat, PointerEvent, PointerHandler, PointerKind, Renderer,
    RendererEvent, SubscriptionId,
};
use crate::subscribers::Subscribers;

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub at: LngLat,
    pub html: String,
}

#[derive(Debug, Default)]
struct Style {
    loaded: bool,
    sources: BTreeMap<String, SourceSpec>,
    loaded_sources: BTreeSet<String>,
    layers: Vec<LayerSpec>,
    filters: BTreeMap<LayerId, Expression>,
    visibility: BTreeMap<LayerId, bool>,
    rejected: BTreeSet<LayerId>,
    features: BTreeMap<(String, String), Vec<Feature>>,
    popups: Vec<Popup>,
    cursor: String,
    failed_calls: usize,
}

/// In-memory renderer for tests and headless use.
///
/// Mirrors the engine's observable contract: duplicate or rejected layer
/// adds fail, filter/visibility calls on missing layers fail, and events are
/// delivered only when the owner calls [`MemoryRenderer::emit`].
#[derive(Default)]
pub struct MemoryRenderer {
    style: RefCell<Style>,
    subscribers: Subscribers,
    pointer_handlers: RefCell<Vec<(LayerId, PointerKind, PointerHandler)>>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose base style has already loaded.
    pub fn loaded() -> Self {
        let renderer = Self::default();
        renderer.style.borrow_mut().loaded = true;
        renderer
    }

    /// Makes every subsequent add of `id` fail, like a malformed style spec.
    pub fn reject_layer(&self, id: impl Into<LayerId>) {
        self.style.borrow_mut().rejected.insert(id.into());
    }

    pub fn set_features(&self, source_id: &str, source_layer: &str, features: Vec<Feature>) {
        self.style
            .borrow_mut()
            .features
            .insert((source_id.to_string(), source_layer.to_string()), features);
    }

    /// Marks the style loaded and notifies subscribers.
    pub fn finish_style_load(&self) {
        self.style.borrow_mut().loaded = true;
        self.emit(&RendererEvent::StyleLoaded);
    }

    /// Marks `source_id` loaded and notifies subscribers.
    pub fn finish_source_load(&self, source_id: &str) {
        self.style
            .borrow_mut()
            .loaded_sources
            .insert(source_id.to_string());
        self.emit(&RendererEvent::SourceData {
            source_id: source_id.to_string(),
            is_source_loaded: true,
        });
    }

    /// Delivers `event` to every live subscriber.
    pub fn emit(&self, event: &RendererEvent) {
        self.subscribers.dispatch(event);
    }

    /// Simulates a pointer event on `layer`; returns how many handlers ran.
    pub fn fire_pointer(&self, kind: PointerKind, event: &PointerEvent) -> usize {
        if !self.has_layer(&event.layer_id) {
            return 0;
        }
        let mut handlers = std::mem::take(&mut *self.pointer_handlers.borrow_mut());
        let mut ran = 0;
        for (layer, handler_kind, handler) in handlers.iter_mut() {
            if *layer == event.layer_id && *handler_kind == kind {
                handler(event);
                ran += 1;
            }
        }
        let mut current = self.pointer_handlers.borrow_mut();
        let added = std::mem::take(&mut *current);
        *current = handlers;
        current.extend(added);
        ran
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.style
            .borrow()
            .layers
            .iter()
            .map(|spec| spec.id.clone())
            .collect()
    }

    pub fn layer(&self, id: &LayerId) -> Option<LayerSpec> {
        self.style
            .borrow()
            .layers
            .iter()
            .find(|spec| &spec.id == id)
            .cloned()
    }

    pub fn source(&self, id: &str) -> Option<SourceSpec> {
        self.style.borrow().sources.get(id).cloned()
    }

    pub fn filter(&self, id: &LayerId) -> Option<Expression> {
        self.style.borrow().filters.get(id).cloned()
    }

    /// Layout visibility; layers default to visible.
    pub fn is_visible(&self, id: &LayerId) -> Option<bool> {
        let style = self.style.borrow();
        if !style.layers.iter().any(|spec| &spec.id == id) {
            return None;
        }
        Some(style.visibility.get(id).copied().unwrap_or(true))
    }

    pub fn popups(&self) -> Vec<Popup> {
        self.style.borrow().popups.clone()
    }

    pub fn cursor(&self) -> String {
        self.style.borrow().cursor.clone()
    }

    pub fn pointer_handler_count(&self, layer: &LayerId) -> usize {
        self.pointer_handlers
            .borrow()
            .iter()
            .filter(|(id, _, _)| id == layer)
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of calls that returned an error.
    pub fn failed_calls(&self) -> usize {
        self.style.borrow().failed_calls
    }

    fn fail<T>(&self, err: RendererError) -> Result<T, RendererError> {
        self.style.borrow_mut().failed_calls += 1;
        Err(err)
    }
}

impl Renderer for MemoryRenderer {
    fn is_style_loaded(&self) -> bool {
        self.style.borrow().loaded
    }

    fn add_source(&self, id: &str, spec: &SourceSpec) -> Result<(), RendererError> {
        if self.has_source(id) {
            return self.fail(RendererError::rejected(id, "source already exists"));
        }
        self.style
            .borrow_mut()
            .sources
            .insert(id.to_string(), spec.clone());
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        self.style.borrow().sources.contains_key(id)
    }

    fn is_source_loaded(&self, id: &str) -> bool {
        self.style.borrow().loaded_sources.contains(id)
    }

    fn add_layer(&self, spec: &LayerSpec) -> Result<(), RendererError> {
        if self.has_layer(&spec.id) {
            return self.fail(RendererError::rejected(
                spec.id.as_str(),
                "layer already exists",
            ));
        }
        if !self.has_source(&spec.source) {
            return self.fail(RendererError::MissingSource(spec.source.clone()));
        }
        if self.style.borrow().rejected.contains(&spec.id) {
            return self.fail(RendererError::rejected(spec.id.as_str(), "invalid layer spec"));
        }
        self.style.borrow_mut().layers.push(spec.clone());
        Ok(())
    }

    fn has_layer(&self, id: &LayerId) -> bool {
        self.style.borrow().layers.iter().any(|spec| &spec.id == id)
    }

    fn set_filter(&self, id: &LayerId, filter: Option<&Expression>) -> Result<(), RendererError> {
        if !self.has_layer(id) {
            return self.fail(RendererError::MissingLayer(id.clone()));
        }
        let mut style = self.style.borrow_mut();
        match filter {
            Some(expr) => {
                style.filters.insert(id.clone(), expr.clone());
            }
            None => {
                style.filters.remove(id);
            }
        }
        Ok(())
    }

    fn set_visibility(&self, id: &LayerId, visible: bool) -> Result<(), RendererError> {
        if !self.has_layer(id) {
            return self.fail(RendererError::MissingLayer(id.clone()));
        }
        self.style
            .borrow_mut()
            .visibility
            .insert(id.clone(), visible);
        Ok(())
    }

    fn query_source_features(
        &self,
        source_id: &str,
        source_layer: &str,
    ) -> Result<Vec<Feature>, RendererError> {
        if !self.has_source(source_id) {
            return self.fail(RendererError::MissingSource(source_id.to_string()));
        }
        Ok(self
            .style
            .borrow()
            .features
            .get(&(source_id.to_string(), source_layer.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn subscribe(&self, handler: EventHandler) -> SubscriptionId {
        self.subscribers.subscribe(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    fn on_pointer(&self, layer: &LayerId, kind: PointerKind, handler: PointerHandler) {
        self.pointer_handlers
            .borrow_mut()
            .push((layer.clone(), kind, handler));
    }

    fn open_popup(&self, at: LngLat, html: &str) -> Result<(), RendererError> {
        self.style.borrow_mut().popups.push(Popup {
            at,
            html: html.to_string(),
        });
        Ok(())
    }

    fn set_cursor(&self, cursor: &str) {
        self.style.borrow_mut().cursor = cursor.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRenderer;
    use crate::renderer::{Renderer, RendererEvent};
    use layers::{Expression, LayerId, LayerSpec, SourceSpec};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn with_source() -> MemoryRenderer {
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
        renderer
    }

    fn line(id: &str) -> LayerSpec {
        LayerSpec::line(id, "ref", "huc10", Expression::string("#000000"), 1.0, None)
    }

    #[test]
    fn duplicate_add_fails() {
        let renderer = with_source();
        renderer.add_layer(&line("a")).expect("first add");
        assert!(renderer.add_layer(&line("a")).is_err());
        assert_eq!(renderer.layer_ids(), vec![LayerId::from("a")]);
        assert_eq!(renderer.failed_calls(), 1);
    }

    #[test]
    fn missing_layer_calls_fail() {
        let renderer = with_source();
        let id = LayerId::from("nope");
        assert!(renderer.set_visibility(&id, false).is_err());
        assert!(renderer.set_filter(&id, None).is_err());
        assert_eq!(renderer.is_visible(&id), None);
    }

    #[test]
    fn handlers_may_unsubscribe_during_emit() {
        let renderer = Rc::new(MemoryRenderer::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let weak = Rc::downgrade(&renderer);
        let own_id = Rc::new(RefCell::new(None));
        let slot = own_id.clone();
        let id = renderer.subscribe(Box::new(move |event: &RendererEvent| {
            log.borrow_mut().push(event.clone());
            if let (Some(r), Some(id)) = (weak.upgrade(), *slot.borrow()) {
                r.unsubscribe(id);
            }
        }));
        *own_id.borrow_mut() = Some(id);

        renderer.finish_style_load();
        renderer.finish_style_load();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(renderer.subscriber_count(), 0);
    }
}
