use area_core::{MarkerConfig, marker_placement, parse_coords};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::utils::{asset_url, place_absolute};

/// jQuery's "slow" fade.
const FADE_MS: u32 = 600;

fn set_opacity(markers: &[HtmlElement], opacity: &str) {
    for m in markers {
        if let Err(e) = m.style().set_property("opacity", opacity) {
            log::warn!("marker opacity not set: {:?}", e);
        }
    }
}

fn after(window: &Window, ms: i32, markers: &[HtmlElement], opacity: &'static str) {
    let markers = markers.to_vec();
    let cb = Closure::once_into_js(move || set_opacity(&markers, opacity));
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
    {
        log::warn!("marker timer failed: {:?}", e);
    }
}

// Flash the markers `repeat_count` times, then settle.
fn schedule(window: &Window, markers: &[HtmlElement], config: &MarkerConfig) {
    for step in config.flash_schedule(FADE_MS) {
        let opacity = if step.visible { "1" } else { "0" };
        if config.animate {
            after(window, step.at_ms, markers, opacity);
        } else {
            set_opacity(markers, opacity);
        }
    }
}

fn wrap_map(document: &Document, img: &Element, level: &str) -> Result<HtmlElement, JsValue> {
    let wrapper = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    wrapper.set_id(&format!("map_{level}_wrapper"));
    let style = wrapper.style();
    style.set_property("position", "relative")?;
    style.set_property("display", "inline-block")?;
    if let Some(parent) = img.parent_node() {
        let before: &web_sys::Node = img;
        parent.insert_before(&wrapper, Some(before))?;
    }
    wrapper.append_child(img)?;
    Ok(wrapper)
}

/// Mark every hot area of the page's maps with an icon.
///
/// `settings` is a JSON object using the plugin's camelCase keys; an
/// empty string keeps all defaults.
#[wasm_bindgen]
pub fn animate_areas(settings: &str) -> Result<u32, JsValue> {
    let config = MarkerConfig::from_json(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let icon = asset_url(&config.icon_src());

    let maps = document.query_selector_all("img.map[id^=\"map_\"]")?;
    let mut placed = 0;
    for i in 0..maps.length() {
        let Some(img) = maps.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let id = img.id();
        let level = id.split('_').nth(1).unwrap_or_default().to_string();
        if !config.applies_to(&level) {
            continue;
        }
        let wrapper = wrap_map(&document, &img, &level)?;

        let areas = document.query_selector_all(&format!("map[name=\"{level}_coords\"] area"))?;
        let mut markers = Vec::new();
        for j in 0..areas.length() {
            let Some(area) = areas.item(j).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let coords = area.get_attribute("coords").unwrap_or_default();
            let rect = match parse_coords(&coords) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("{} map: {}", level, e);
                    continue;
                }
            };
            let Some(pos) = marker_placement(&rect, &config) else {
                continue;
            };
            let marker = document.create_element("img")?.dyn_into::<HtmlElement>()?;
            marker.set_class_name(&format!("marker_{level}"));
            marker.set_attribute("src", &icon)?;
            marker.set_attribute("alt", "")?;
            place_absolute(&marker, pos)?;
            let style = marker.style();
            style.set_property("width", &format!("{}px", config.icon_width))?;
            style.set_property("height", &format!("{}px", config.icon_height))?;
            style.set_property("opacity", "0")?;
            style.set_property("transition", &format!("opacity {}ms", FADE_MS))?;
            wrapper.append_child(&marker)?;
            markers.push(marker);
        }
        placed += markers.len() as u32;
        schedule(&window, &markers, &config);
    }
    log::debug!("placed {} area markers", placed);
    Ok(placed)
}
