//! [`Renderer`] backed by a MapLibre GL map living in the page.
//!
//! Expects the `maplibregl` and `pmtiles` globals to be loaded before the
//! wasm module starts.

use std::cell::RefCell;
use std::rc::Rc;

use composer::MapConfig;
use layers::{Expression, LayerId, LayerSpec, SourceSpec};
use runtime::{
    EventHandler, Feature, LngLat, PointerEvent, PointerHandler, PointerKind, Renderer,
    RendererError, RendererEvent, SubscriptionId, Subscribers, visibility_value,
};
use serde_json::{Map, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = "
export function beaver_create_map(container, lng, lat, zoom, hash) {
    if (typeof pmtiles !== 'undefined' && !globalThis.__beaverPmtiles) {
        globalThis.__beaverPmtiles = new pmtiles.Protocol();
        maplibregl.addProtocol('pmtiles', globalThis.__beaverPmtiles.tile);
    }
    const map = new maplibregl.Map({
        container,
        style: { version: 8, sources: {}, layers: [] },
        center: [lng, lat],
        zoom,
        hash,
    });
    map.__beaverStyleReady = false;
    map.once('load', () => { map.__beaverStyleReady = true; });
    map.addControl(new maplibregl.NavigationControl(), 'top-right');
    return map;
}

export function beaver_watch_events(map, callback) {
    map.once('load', () => callback('load', '', false, ''));
    map.on('sourcedata', (e) => callback('sourcedata', e.sourceId || '', !!e.isSourceLoaded, ''));
    map.on('error', (e) => {
        const err = e && e.error ? e.error : e;
        callback('error', '', false, String(err && err.message ? err.message : err));
    });
}

export function beaver_is_style_ready(map) {
    return !!map.__beaverStyleReady;
}

export function beaver_add_source(map, id, spec) {
    map.addSource(id, JSON.parse(spec));
}

export function beaver_has_source(map, id) {
    return !!map.getSource(id);
}

export function beaver_is_source_loaded(map, id) {
    try {
        return !!map.getSource(id) && map.isSourceLoaded(id);
    } catch (e) {
        return false;
    }
}

export function beaver_add_layer(map, spec) {
    map.addLayer(JSON.parse(spec));
}

export function beaver_has_layer(map, id) {
    return !!map.getLayer(id);
}

export function beaver_set_filter(map, id, filter) {
    map.setFilter(id, filter == null ? null : JSON.parse(filter));
}

export function beaver_set_visibility(map, id, value) {
    map.setLayoutProperty(id, 'visibility', value);
}

export function beaver_query_source_features(map, source, sourceLayer) {
    const features = map.querySourceFeatures(source, { sourceLayer }) || [];
    return JSON.stringify(features.map((f) => f.properties || {}));
}

export function beaver_on_pointer(map, kind, layer, callback) {
    map.on(kind, layer, (e) => {
        const features = (e.features || []).map((f) => f.properties || {});
        callback(e.lngLat.lng, e.lngLat.lat, JSON.stringify(features));
    });
}

export function beaver_open_popup(map, lng, lat, html) {
    new maplibregl.Popup().setMaxWidth('none').setLngLat([lng, lat]).setHTML(html).addTo(map);
}

export function beaver_set_cursor(map, cursor) {
    map.getCanvas().style.cursor = cursor;
}

export function beaver_add_control(map, element, position) {
    map.addControl({ onAdd: () => element, onRemove: () => element.remove() }, position);
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn beaver_create_map(
        container: &str,
        lng: f64,
        lat: f64,
        zoom: f64,
        hash: bool,
    ) -> Result<JsValue, JsValue>;

    fn beaver_watch_events(map: &JsValue, callback: &Closure<dyn FnMut(String, String, bool, String)>);

    fn beaver_is_style_ready(map: &JsValue) -> bool;

    #[wasm_bindgen(catch)]
    fn beaver_add_source(map: &JsValue, id: &str, spec: &str) -> Result<(), JsValue>;

    fn beaver_has_source(map: &JsValue, id: &str) -> bool;

    fn beaver_is_source_loaded(map: &JsValue, id: &str) -> bool;

    #[wasm_bindgen(catch)]
    fn beaver_add_layer(map: &JsValue, spec: &str) -> Result<(), JsValue>;

    fn beaver_has_layer(map: &JsValue, id: &str) -> bool;

    #[wasm_bindgen(catch)]
    fn beaver_set_filter(map: &JsValue, id: &str, filter: Option<String>) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn beaver_set_visibility(map: &JsValue, id: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn beaver_query_source_features(
        map: &JsValue,
        source: &str,
        source_layer: &str,
    ) -> Result<String, JsValue>;

    fn beaver_on_pointer(
        map: &JsValue,
        kind: &str,
        layer: &str,
        callback: &Closure<dyn FnMut(f64, f64, String)>,
    );

    #[wasm_bindgen(catch)]
    fn beaver_open_popup(map: &JsValue, lng: f64, lat: f64, html: &str) -> Result<(), JsValue>;

    fn beaver_set_cursor(map: &JsValue, cursor: &str);

    fn beaver_add_control(map: &JsValue, element: &web_sys::HtmlElement, position: &str);
}

type EventBridge = Closure<dyn FnMut(String, String, bool, String)>;
type PointerBridge = Closure<dyn FnMut(f64, f64, String)>;

pub struct MapLibreRenderer {
    map: JsValue,
    subscribers: Rc<Subscribers>,
    _events: EventBridge,
    pointers: RefCell<Vec<PointerBridge>>,
}

impl MapLibreRenderer {
    /// Creates the map in the element with id `container`, starting from an
    /// empty style.
    pub fn create(container: &str, config: &MapConfig) -> Result<Self, JsValue> {
        let map = beaver_create_map(
            container,
            config.center[0],
            config.center[1],
            config.zoom,
            config.hash,
        )?;

        let subscribers = Rc::new(Subscribers::new());
        let sink = subscribers.clone();
        let events = EventBridge::new(
            move |kind: String, source_id: String, is_source_loaded: bool, message: String| {
                if let Some(event) = renderer_event(&kind, source_id, is_source_loaded, message) {
                    sink.dispatch(&event);
                }
            },
        );
        beaver_watch_events(&map, &events);

        Ok(Self {
            map,
            subscribers,
            _events: events,
            pointers: RefCell::new(Vec::new()),
        })
    }

    pub fn add_control(&self, element: &web_sys::HtmlElement, position: &str) {
        beaver_add_control(&self.map, element, position);
    }
}

fn renderer_event(
    kind: &str,
    source_id: String,
    is_source_loaded: bool,
    message: String,
) -> Option<RendererEvent> {
    match kind {
        "load" => Some(RendererEvent::StyleLoaded),
        "sourcedata" => Some(RendererEvent::SourceData {
            source_id,
            is_source_loaded,
        }),
        "error" => Some(RendererEvent::Error { message }),
        _ => None,
    }
}

fn pointer_event_name(kind: PointerKind) -> &'static str {
    match kind {
        PointerKind::Click => "click",
        PointerKind::Enter => "mouseenter",
        PointerKind::Leave => "mouseleave",
    }
}

fn describe(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{err:?}")
}

fn rejected(target: &str, err: JsValue) -> RendererError {
    RendererError::rejected(target, describe(&err))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RendererError> {
    serde_json::to_string(value).map_err(|e| RendererError::Call(e.to_string()))
}

fn parse_features(json: &str) -> Result<Vec<Feature>, serde_json::Error> {
    let list: Vec<Map<String, Value>> = serde_json::from_str(json)?;
    Ok(list.into_iter().map(Feature::new).collect())
}

impl Renderer for MapLibreRenderer {
    fn is_style_loaded(&self) -> bool {
        beaver_is_style_ready(&self.map)
    }

    fn add_source(&self, id: &str, spec: &SourceSpec) -> Result<(), RendererError> {
        let json = to_json(spec)?;
        beaver_add_source(&self.map, id, &json).map_err(|e| rejected(id, e))
    }

    fn has_source(&self, id: &str) -> bool {
        beaver_has_source(&self.map, id)
    }

    fn is_source_loaded(&self, id: &str) -> bool {
        beaver_is_source_loaded(&self.map, id)
    }

    fn add_layer(&self, spec: &LayerSpec) -> Result<(), RendererError> {
        let json = to_json(spec)?;
        beaver_add_layer(&self.map, &json).map_err(|e| rejected(spec.id.as_str(), e))
    }

    fn has_layer(&self, id: &LayerId) -> bool {
        beaver_has_layer(&self.map, id.as_str())
    }

    fn set_filter(&self, id: &LayerId, filter: Option<&Expression>) -> Result<(), RendererError> {
        let json = filter.map(to_json).transpose()?;
        beaver_set_filter(&self.map, id.as_str(), json).map_err(|e| rejected(id.as_str(), e))
    }

    fn set_visibility(&self, id: &LayerId, visible: bool) -> Result<(), RendererError> {
        beaver_set_visibility(&self.map, id.as_str(), visibility_value(visible))
            .map_err(|e| rejected(id.as_str(), e))
    }

    fn query_source_features(
        &self,
        source_id: &str,
        source_layer: &str,
    ) -> Result<Vec<Feature>, RendererError> {
        let json = beaver_query_source_features(&self.map, source_id, source_layer)
            .map_err(|e| rejected(source_id, e))?;
        parse_features(&json).map_err(|e| RendererError::Call(e.to_string()))
    }

    fn subscribe(&self, handler: EventHandler) -> SubscriptionId {
        self.subscribers.subscribe(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    fn on_pointer(&self, layer: &LayerId, kind: PointerKind, mut handler: PointerHandler) {
        let layer_id = layer.clone();
        let bridge = PointerBridge::new(move |lng: f64, lat: f64, features: String| {
            let event = PointerEvent {
                layer_id: layer_id.clone(),
                lng_lat: LngLat::new(lng, lat),
                features: parse_features(&features).unwrap_or_default(),
            };
            handler(&event);
        });
        beaver_on_pointer(&self.map, pointer_event_name(kind), layer.as_str(), &bridge);
        self.pointers.borrow_mut().push(bridge);
    }

    fn open_popup(&self, at: LngLat, html: &str) -> Result<(), RendererError> {
        beaver_open_popup(&self.map, at.lng, at.lat, html).map_err(|e| rejected("popup", e))
    }

    fn set_cursor(&self, cursor: &str) {
        beaver_set_cursor(&self.map, cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_features, pointer_event_name, renderer_event};
    use runtime::{PointerKind, RendererEvent};

    #[test]
    fn maps_engine_events() {
        assert_eq!(
            renderer_event("load", String::new(), false, String::new()),
            Some(RendererEvent::StyleLoaded)
        );
        assert_eq!(
            renderer_event("sourcedata", "ref".to_string(), true, String::new()),
            Some(RendererEvent::SourceData {
                source_id: "ref".to_string(),
                is_source_loaded: true,
            })
        );
        assert_eq!(renderer_event("idle", String::new(), false, String::new()), None);
    }

    #[test]
    fn pointer_kinds_use_engine_names() {
        assert_eq!(pointer_event_name(PointerKind::Enter), "mouseenter");
        assert_eq!(pointer_event_name(PointerKind::Leave), "mouseleave");
    }

    #[test]
    fn feature_payload_is_property_objects() {
        let features = parse_features(r#"[{"d_Mang_Type":"Federal"},{}]"#).expect("parse");
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].property_text("d_Mang_Type"), "Federal");
        assert!(parse_features("nope").is_err());
    }
}
