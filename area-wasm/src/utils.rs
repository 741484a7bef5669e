use area_core::{ImageBounds, ScreenPos};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, MouseEvent};

/// Prefix a relative path with `window.__BASE_URL` when the host page sets
/// one. Without it the path stays relative to the current page.
pub fn asset_url(path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let Some(base) = window_string("__BASE_URL") else {
        return p.to_string();
    };
    let base = if base.ends_with('/') {
        base
    } else {
        format!("{}/", base)
    };
    format!("{}{}", base, p.trim_start_matches('/'))
}

/// Read a string global the host page may have set on `window`.
pub fn window_string(key: &str) -> Option<String> {
    let w = web_sys::window()?;
    js_sys::Reflect::get(&w, &JsValue::from_str(key))
        .ok()?
        .as_string()
}

pub fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

/// Current value of an input or select, `None` if the element is missing.
pub fn field_value(document: &Document, id: &str) -> Option<String> {
    let el = document.get_element_by_id(id)?;
    if let Some(sel) = el.dyn_ref::<HtmlSelectElement>() {
        return Some(sel.value());
    }
    el.dyn_ref::<HtmlInputElement>().map(|i| i.value())
}

pub fn set_field_value(document: &Document, id: &str, value: &str) {
    if let Some(input) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

pub fn element_text(document: &Document, id: &str) -> Option<String> {
    document.get_element_by_id(id)?.text_content()
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_visible(document: &Document, id: &str, visible: bool) {
    if let Some(el) = html_element(document, id) {
        let display = if visible { "" } else { "none" };
        if let Err(e) = el.style().set_property("display", display) {
            log::warn!("#{} display not set: {:?}", id, e);
        }
    }
}

pub fn remove_element(document: &Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.remove();
    }
}

/// Position an element absolutely inside its container.
pub fn place_absolute(el: &HtmlElement, pos: ScreenPos) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("position", "absolute")?;
    style.set_property("left", &format!("{}px", pos.left))?;
    style.set_property("top", &format!("{}px", pos.top))?;
    Ok(())
}

/// Rendered size of an element.
pub fn element_bounds(el: &Element) -> ImageBounds {
    let rect = el.get_bounding_client_rect();
    ImageBounds::new(rect.width(), rect.height())
}

/// Pointer position relative to the element's top-left corner.
pub fn event_coords(e: &MouseEvent, el: &Element) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    (
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    )
}

/// Offset of `el` inside `container`, used to position overlays that are
/// appended to the container.
pub fn origin_within(el: &Element, container: &Element) -> ScreenPos {
    let a = el.get_bounding_client_rect();
    let b = container.get_bounding_client_rect();
    ScreenPos::new(a.left() - b.left(), a.top() - b.top())
}
