use layers::{Expression, LayerId, LayerSpec, SourceSpec};
use serde_json::{Map, Value};

use crate::error::RendererError;

pub type SubscriptionId = u64;

/// Map-level notification from the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    /// The base style finished its initial load.
    StyleLoaded,
    /// Data for a source changed; `is_source_loaded` is true once every
    /// pending request for it has settled.
    SourceData {
        source_id: String,
        is_source_loaded: bool,
    },
    /// Runtime failure inside the engine (bad tile, network hiccup).
    Error { message: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Click,
    Enter,
    Leave,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Loaded feature as seen by the renderer: only its attributes are needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Attribute rendered as text; missing and null read as empty.
    pub fn property_text(&self, key: &str) -> String {
        value_text(self.properties.get(key).unwrap_or(&Value::Null))
    }
}

/// Text form of an attribute value, matching the style language's `to-string`.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub layer_id: LayerId,
    pub lng_lat: LngLat,
    /// Features under the pointer, topmost first.
    pub features: Vec<Feature>,
}

pub type EventHandler = Box<dyn FnMut(&RendererEvent)>;
pub type PointerHandler = Box<dyn FnMut(&PointerEvent)>;

/// Layout `visibility` value for a flag.
pub const fn visibility_value(visible: bool) -> &'static str {
    if visible { "visible" } else { "none" }
}

/// Capabilities the map needs from the rendering engine.
///
/// Methods take `&self`: the engine owns its live style and all calls happen
/// on the single UI thread. Fallible calls report [`RendererError`]; none of
/// them may panic.
pub trait Renderer {
    fn is_style_loaded(&self) -> bool;

    fn add_source(&self, id: &str, spec: &SourceSpec) -> Result<(), RendererError>;
    fn has_source(&self, id: &str) -> bool;
    fn is_source_loaded(&self, id: &str) -> bool;

    fn add_layer(&self, spec: &LayerSpec) -> Result<(), RendererError>;
    fn has_layer(&self, id: &LayerId) -> bool;

    /// `None` clears the filter (show all features).
    fn set_filter(&self, id: &LayerId, filter: Option<&Expression>) -> Result<(), RendererError>;
    fn set_visibility(&self, id: &LayerId, visible: bool) -> Result<(), RendererError>;

    fn query_source_features(
        &self,
        source_id: &str,
        source_layer: &str,
    ) -> Result<Vec<Feature>, RendererError>;

    fn subscribe(&self, handler: EventHandler) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);

    /// Registers a handler scoped to one layer. Registering against a layer
    /// that does not exist yet is allowed; the handler simply never fires
    /// until it does.
    fn on_pointer(&self, layer: &LayerId, kind: PointerKind, handler: PointerHandler);

    fn open_popup(&self, at: LngLat, html: &str) -> Result<(), RendererError>;
    fn set_cursor(&self, cursor: &str);
}
