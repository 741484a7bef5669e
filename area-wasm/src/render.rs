//! Projection of the editor session onto the page. Every function here
//! rebuilds its part of the DOM from the session, never the other way.

use area_core::ScreenPos;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::constants::*;
use crate::state::State;
use crate::utils::{asset_url, html_element, place_absolute, remove_element, set_field_value};

/// Load handler shared by every overlay image: the popup follows the width
/// of the freshly loaded map.
pub fn overlay_onload(document: &Document, padding: f64) -> Closure<dyn FnMut(Event)> {
    let document = document.clone();
    Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let Some(img) = e
            .target()
            .and_then(|t| t.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        let Some(popup) = html_element(&document, MAP_POPUP) else {
            return;
        };
        let width = f64::from(img.width()) + padding;
        if let Err(e) = popup.style().set_property("width", &format!("{}px", width)) {
            log::warn!("popup not resized: {:?}", e);
        }
    }))
}

/// Swap in a new overlay image so the browser fetches `url`.
pub fn replace_overlay(state: &State, url: &str) -> Result<(), JsValue> {
    let doc = &state.document;
    remove_element(doc, MAP_IMAGE);
    let Some(container) = doc.get_element_by_id(MAP_DIV) else {
        log::warn!("#{} not found, overlay not shown", MAP_DIV);
        return Ok(());
    };
    let img = doc
        .create_element("img")?
        .dyn_into::<HtmlImageElement>()?;
    img.set_id(MAP_IMAGE);
    img.set_alt("");
    img.set_onload(Some(state.overlay_onload.as_ref().unchecked_ref()));
    img.set_src(url);
    container.append_child(&img)?;
    log::debug!("overlay -> {}", url);
    Ok(())
}

/// Reload the overlay from the current areas, if a map is selected.
pub fn refresh_overlay(state: &State) -> Result<(), JsValue> {
    match state.session.overlay_url() {
        Some(url) => replace_overlay(state, &url),
        None => Ok(()),
    }
}

fn marker_image(state: &State, id: &str, src: &str, pos: ScreenPos) -> Result<(), JsValue> {
    let doc = &state.document;
    remove_element(doc, id);
    let Some(container) = doc.get_element_by_id(MAP_DIV) else {
        return Ok(());
    };
    let img = doc.create_element("img")?.dyn_into::<HtmlElement>()?;
    img.set_id(id);
    img.set_attribute("src", &asset_url(src))?;
    img.set_attribute("alt", "")?;
    place_absolute(&img, pos)?;
    container.append_child(&img)?;
    Ok(())
}

pub fn show_pin(state: &State, pos: ScreenPos) -> Result<(), JsValue> {
    let icon = state.session.config().pin_icon.clone();
    marker_image(state, PIN, &icon, pos)
}

pub fn show_arrow(state: &State, pos: ScreenPos) -> Result<(), JsValue> {
    let icon = state.session.config().arrow_icon.clone();
    marker_image(state, ARROW, &icon, pos)
}

/// Rebuild the visible list: a delete entry and an angle field per area.
pub fn render_area_list(state: &State) -> Result<(), JsValue> {
    let doc = &state.document;
    let Some(list) = doc.get_element_by_id(AREA_LIST) else {
        return Ok(());
    };
    list.set_inner_html("");
    for area in state.session.areas() {
        let seq = area.sequence.to_string();

        let entry = doc.create_element("div")?;
        entry.set_id(&format!("div_area{seq}"));
        entry.set_class_name("delete");
        entry.set_attribute("data-seq", &seq)?;
        entry.set_inner_html(&format!(
            "Area {seq} <img src='{}' class='icon-delete' title='Delete area' />",
            asset_url(DELETE_ICON)
        ));
        list.append_child(&entry)?;

        let angle_div = doc.create_element("div")?;
        angle_div.set_id(&format!("angle_div{seq}"));
        angle_div.set_class_name("angle_div");
        angle_div.set_text_content(Some("Angle: "));
        let input = doc
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        input.set_type("text");
        input.set_id(&format!("angle_input{seq}"));
        input.set_size(2);
        input.set_value(area.angle.as_str());
        input.set_attribute("data-seq", &seq)?;
        angle_div.append_child(&input)?;
        list.append_child(&angle_div)?;
    }
    Ok(())
}

/// Rebuild the hidden inputs the server reads when the form is saved.
pub fn render_form_fields(state: &State) -> Result<(), JsValue> {
    let doc = &state.document;
    let container = doc.get_element_by_id(AREA_FIELDS);
    if let Some(c) = &container {
        c.set_inner_html("");
    }
    for field in state.session.form_fields() {
        if field.name == USED_AREAS {
            set_field_value(doc, USED_AREAS, &field.value);
            continue;
        }
        let Some(c) = &container else { continue };
        let input = doc
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        input.set_type("hidden");
        input.set_id(&field.name);
        input.set_name(&field.name);
        input.set_value(&field.value);
        c.append_child(&input)?;
    }
    Ok(())
}

/// Full re-projection after any change to the area collection.
pub fn render_areas(state: &State) -> Result<(), JsValue> {
    render_area_list(state)?;
    render_form_fields(state)?;
    refresh_overlay(state)
}
