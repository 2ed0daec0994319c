use std::fmt::Write as _;
use std::rc::{Rc, Weak};

use layers::LayerId;
use runtime::{Diagnostics, Feature, PointerKind, Renderer, kinds, value_text};

pub const POINTER_CURSOR: &str = "pointer";

/// Wires click popups and the hover cursor onto `ids`.
///
/// Layers that are not in the renderer yet are wired all the same; their
/// handlers stay silent until the layer appears.
pub fn attach_interactions(renderer: &Rc<dyn Renderer>, ids: &[LayerId], diagnostics: &Diagnostics) {
    for id in ids {
        let target: Weak<dyn Renderer> = Rc::downgrade(renderer);
        let log = diagnostics.clone();
        renderer.on_pointer(
            id,
            PointerKind::Click,
            Box::new(move |event| {
                let Some(feature) = event.features.first() else {
                    return;
                };
                let Some(renderer) = target.upgrade() else {
                    return;
                };
                if let Err(err) = renderer.open_popup(event.lng_lat, &popup_html(feature)) {
                    log.warn(
                        kinds::INTERACTION_FAILED,
                        format!("popup on {} failed: {err}", event.layer_id),
                    );
                }
            }),
        );

        for (kind, cursor) in [(PointerKind::Enter, POINTER_CURSOR), (PointerKind::Leave, "")] {
            let target: Weak<dyn Renderer> = Rc::downgrade(renderer);
            renderer.on_pointer(
                id,
                kind,
                Box::new(move |_| {
                    if let Some(renderer) = target.upgrade() {
                        renderer.set_cursor(cursor);
                    }
                }),
            );
        }
    }
}

/// Attribute table for a clicked feature. Keys and values are escaped.
pub fn popup_html(feature: &Feature) -> String {
    let mut rows = String::new();
    for (key, value) in &feature.properties {
        let _ = write!(
            rows,
            "<tr><th style=\"text-align:left; padding:4px; border:1px solid #ddd; background:#f9f9f9;\">{}</th>\
             <td style=\"padding:4px; border:1px solid #ddd;\">{}</td></tr>",
            escape_html(key),
            escape_html(&value_text(value)),
        );
    }
    format!(
        "<div style=\"max-height:200px; overflow:auto;\">\
         <table style=\"border-collapse:collapse; font-family:sans-serif; font-size:13px; width:100%;\">\
         <tbody>{rows}</tbody></table></div>"
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
