use std::cell::RefCell;
use std::rc::Rc;

use area_core::{EditorConfig, EditorSession, MapSelection, StoredArea};
use wasm_bindgen::prelude::*;
use web_sys::Document;

mod constants;
mod editor;
mod links;
mod markers;
mod render;
mod state;
mod subjects;
mod utils;

pub use markers::animate_areas;
pub use subjects::link_subject_matters;

use crate::constants::{EXISTING_AREAS, OPEN_MAP_DIALOG, SELECT_MAP};
use crate::state::{STATE, State};
use crate::utils::{asset_url, element_text, set_visible, window_string};

fn load_config() -> EditorConfig {
    let config = EditorConfig::default();
    let endpoint = window_string("__IMAGE_CREATOR").unwrap_or_else(|| config.image_creator.clone());
    config.with_image_creator(asset_url(&endpoint))
}

fn existing_areas(document: &Document) -> Vec<StoredArea> {
    let text = element_text(document, EXISTING_AREAS).unwrap_or_default();
    match StoredArea::parse_list(&text) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("ignoring saved areas: {}", e);
            Vec::new()
        }
    }
}

fn init_session(document: &Document) -> EditorSession {
    let mut session = EditorSession::new(load_config());
    let map = editor::selected_map(document);
    match map {
        MapSelection::Map(_) => session.load_existing(map, existing_areas(document)),
        MapSelection::None => {
            session.select_map(map, true);
        }
    }
    session
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::log_1(&JsValue::from_str(&format!("logger not installed: {e}")));
    }
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let session = init_session(&document);
    let overlay_onload = render::overlay_onload(&document, session.config().dialog_padding);

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        session,
        overlay_onload,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    links::attach_links(state.clone())?;
    // Public map pages carry no editor; they only call `animate_areas`
    // and `link_subject_matters`.
    if state.borrow().document.get_element_by_id(SELECT_MAP).is_none() {
        return Ok(());
    }
    editor::attach_editor(state.clone())?;

    let s = state.borrow();
    render::render_areas(&s)?;
    let map = s.session.map();
    let configurable = map.id().is_some() && !editor::map_already_rendered(&s.document, map);
    set_visible(&s.document, OPEN_MAP_DIALOG, configurable);
    Ok(())
}

/// Overlay URL for the areas currently in the editor, for page scripts
/// that need to mirror the preview elsewhere.
#[wasm_bindgen]
pub fn overlay_url() -> Option<String> {
    STATE.with(|st| {
        st.borrow()
            .as_ref()
            .and_then(|s| s.borrow().session.overlay_url())
    })
}
