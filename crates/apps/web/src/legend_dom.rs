use std::rc::Rc;

use legend::{LegendRow, LegendView};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlLabelElement};

pub type ChangeListener = Closure<dyn FnMut(Event)>;

/// Legend panel: one checkbox per row of the view's model.
///
/// The returned listener keeps the checkboxes live and must outlive the
/// element.
pub fn render_legend(
    document: &Document,
    view: Rc<LegendView>,
) -> Result<(HtmlElement, ChangeListener), JsValue> {
    let container = element(document, "div")?;
    container.set_class_name("maplibregl-ctrl beaver-legend");
    set_styles(
        &container,
        &[
            ("max-width", "280px"),
            ("padding", "8px"),
            ("background", "rgba(255,255,255,0.9)"),
            ("font", "12px/1.3 sans-serif"),
            ("overflow", "auto"),
            ("max-height", "50vh"),
        ],
    )?;

    let model = view.model();
    let title = element(document, "div")?;
    title.set_text_content(Some(&model.title));
    set_styles(&title, &[("font-weight", "600"), ("margin-bottom", "6px")])?;
    container.append_child(&title)?;

    for section in &model.sections {
        if let Some(heading) = &section.title {
            let header = element(document, "div")?;
            header.set_text_content(Some(heading));
            set_styles(&header, &[("font-weight", "600"), ("margin", "8px 0 4px")])?;
            container.append_child(&header)?;
        }
        for row in &section.rows {
            let row_el = row_element(document, row, view.is_checked(row))?;
            container.append_child(&row_el)?;
        }
    }

    // One delegated listener for every checkbox.
    let target = view.clone();
    let listener = ChangeListener::new(move |event: Event| {
        let Some(input) = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        target.on_change(&input.id(), input.checked());
    });
    container.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())?;

    Ok((container, listener))
}

fn row_element(document: &Document, row: &LegendRow, checked: bool) -> Result<HtmlElement, JsValue> {
    let line = element(document, "div")?;
    set_styles(
        &line,
        &[
            ("display", "flex"),
            ("align-items", "center"),
            ("gap", "6px"),
            ("margin", "2px 0"),
        ],
    )?;

    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_type("checkbox");
    input.set_id(&row.control_id);
    input.set_checked(checked);
    input.style().set_property("margin", "0")?;
    line.append_child(&input)?;

    if let Some(color) = row.swatch {
        let fill = color.to_hex();
        let swatch = element(document, "span")?;
        set_styles(
            &swatch,
            &[
                ("display", "inline-block"),
                ("width", "12px"),
                ("height", "12px"),
                ("border", "1px solid #999"),
                ("background", fill.as_str()),
            ],
        )?;
        line.append_child(&swatch)?;
    }

    let label: HtmlLabelElement = document.create_element("label")?.dyn_into()?;
    label.set_html_for(&row.control_id);
    label.set_text_content(Some(&row.label));
    label.style().set_property("cursor", "pointer")?;
    line.append_child(&label)?;

    Ok(line)
}

fn element(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element(tag)?.dyn_into()?)
}

fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = element.style();
    for (name, value) in styles {
        style.set_property(name, value)?;
    }
    Ok(())
}
