use std::cell::RefCell;
use std::rc::Rc;

use area_core::{ClickOutcome, MapSelection, Point};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlInputElement, MouseEvent};

use crate::constants::*;
use crate::render::{
    render_area_list, render_areas, render_form_fields, refresh_overlay, replace_overlay,
    show_arrow, show_pin,
};
use crate::state::State;
use crate::utils::{
    element_bounds, element_text, event_coords, field_value, html_element, origin_within,
    remove_element, set_text, set_visible,
};

/// The server marks maps that need no area editing with `<span id="map-<id>">true</span>`.
/// A missing span is treated the same way.
pub fn map_already_rendered(document: &Document, map: MapSelection) -> bool {
    match map.id() {
        Some(id) => element_text(document, &format!("map-{id}"))
            .map(|t| t.trim() != "false")
            .unwrap_or(true),
        None => true,
    }
}

pub fn selected_map(document: &Document) -> MapSelection {
    field_value(document, SELECT_MAP)
        .map(|v| MapSelection::parse(&v))
        .unwrap_or_default()
}

fn clear_coordinates(document: &Document) {
    for id in [X_COORD, Y_COORD, X_CLICK, Y_CLICK] {
        set_text(document, id, "");
    }
}

// Sequence number carried by the closest `selector` ancestor of the event target.
fn event_sequence(e: &Event, selector: &str) -> Option<u32> {
    let target = e.target()?.dyn_into::<Element>().ok()?;
    let holder = target.closest(selector).ok()??;
    holder.get_attribute("data-seq")?.parse().ok()
}

fn on_select_map(state: &mut State) -> Result<(), JsValue> {
    let map = selected_map(&state.document);
    let rendered = map_already_rendered(&state.document, map);
    let view = state.session.select_map(map, rendered);

    clear_coordinates(&state.document);
    if let Some(div) = state.document.get_element_by_id(MAP_DIV) {
        div.set_inner_html("");
    }
    render_area_list(state)?;
    render_form_fields(state)?;
    if let Some(url) = &view.overlay_url {
        replace_overlay(state, url)?;
    }
    set_visible(&state.document, OPEN_MAP_DIALOG, view.show_configure);
    Ok(())
}

fn on_map_click(state: &mut State, e: &MouseEvent) -> Result<(), JsValue> {
    let (Some(img), Some(container)) = (
        state.document.get_element_by_id(MAP_IMAGE),
        state.document.get_element_by_id(MAP_DIV),
    ) else {
        return Ok(());
    };
    let (x, y) = event_coords(e, &img);
    let bounds = element_bounds(&img);
    let origin = origin_within(&img, &container);
    let outcome = state.session.pointer_click(x, y, bounds, origin);
    match outcome {
        ClickOutcome::Ignored => return Ok(()),
        ClickOutcome::CornerPlaced { pin, .. } => show_pin(state, pin)?,
        ClickOutcome::AreaCreated { overlay_url, .. } => {
            remove_element(&state.document, PIN);
            render_area_list(state)?;
            render_form_fields(state)?;
            replace_overlay(state, &overlay_url)?;
        }
    }
    let p = Point::rounded(x, y);
    set_text(&state.document, X_CLICK, &p.x.to_string());
    set_text(&state.document, Y_CLICK, &p.y.to_string());
    Ok(())
}

fn on_map_move(state: &State, e: &MouseEvent) {
    let Some(img) = state.document.get_element_by_id(MAP_IMAGE) else {
        return;
    };
    let (x, y) = event_coords(e, &img);
    if let Some(p) = state.session.pointer_move(x, y, element_bounds(&img)) {
        set_text(&state.document, X_COORD, &p.x.to_string());
        set_text(&state.document, Y_COORD, &p.y.to_string());
    }
}

fn on_area_hover(state: &State, sequence: u32) -> Result<(), JsValue> {
    let (Some(img), Some(container)) = (
        state.document.get_element_by_id(MAP_IMAGE),
        state.document.get_element_by_id(MAP_DIV),
    ) else {
        return Ok(());
    };
    match state.session.arrow_for(sequence, origin_within(&img, &container)) {
        Some(pos) => show_arrow(state, pos),
        None => Ok(()),
    }
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("area editor: {:?}", e);
    }
}

/// Register the editor's event handlers.
pub fn attach_editor(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    // Map selector
    if let Some(sel) = doc.get_element_by_id(SELECT_MAP) {
        let st = state.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            report(on_select_map(&mut st.borrow_mut()));
        }));
        sel.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    // Map pointer events
    if let Some(div) = html_element(&doc, MAP_DIV) {
        // Pin and arrow are positioned inside the map container.
        div.style().set_property("position", "relative")?;
        {
            let st = state.clone();
            let mousemove =
                Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
                    on_map_move(&st.borrow(), &e);
                }));
            div.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
            mousemove.forget();
        }
        {
            let st = state.clone();
            let click = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
                report(on_map_click(&mut st.borrow_mut(), &e));
            }));
            div.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();
        }
    }

    // Area list: entries are rebuilt on every change, so listen on the list.
    if let Some(list) = doc.get_element_by_id(AREA_LIST) {
        {
            let st = state.clone();
            let click = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
                let Some(seq) = event_sequence(&e, ".delete[data-seq]") else {
                    return;
                };
                let mut s = st.borrow_mut();
                remove_element(&s.document, ARROW);
                if s.session.delete_area(seq) {
                    report(render_areas(&s));
                }
            }));
            list.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();
        }
        {
            let st = state.clone();
            let mouseover = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
                if let Some(seq) = event_sequence(&e, ".delete[data-seq]") {
                    report(on_area_hover(&st.borrow(), seq));
                }
            }));
            list.add_event_listener_with_callback("mouseover", mouseover.as_ref().unchecked_ref())?;
            mouseover.forget();
        }
        {
            let st = state.clone();
            let mouseout = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
                if event_sequence(&e, ".delete[data-seq]").is_some() {
                    remove_element(&st.borrow().document, ARROW);
                }
            }));
            list.add_event_listener_with_callback("mouseout", mouseout.as_ref().unchecked_ref())?;
            mouseout.forget();
        }
        {
            let st = state.clone();
            let keyup = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
                let Some(seq) = event_sequence(&e, "input[data-seq]") else {
                    return;
                };
                let Some(input) = e
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut s = st.borrow_mut();
                if s.session.set_area_angle(seq, &input.value()) {
                    // Leave the visible list alone so the field keeps focus.
                    report(render_form_fields(&s).and_then(|_| refresh_overlay(&s)));
                }
            }));
            list.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }
    }

    // Popup open/close
    if let Some(btn) = html_element(&doc, OPEN_MAP_DIALOG) {
        let d = doc.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            set_visible(&d, MAP_POPUP, true);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    if let Some(btn) = html_element(&doc, CLOSE_MAP_DIALOG) {
        let d = doc.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            set_visible(&d, MAP_POPUP, false);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}
