use std::cell::RefCell;
use std::rc::Rc;

use area_core::{BackLevel, back_url, image_link};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlSelectElement};

use crate::constants::*;
use crate::state::State;
use crate::utils::{element_text, field_value, html_element, set_visible};

fn image_select(document: &Document) -> Option<HtmlSelectElement> {
    document
        .query_selector("select[name=\"image\"]")
        .ok()??
        .dyn_into()
        .ok()
}

/// Point the "show image" link at the image chosen in the image selector.
pub fn update_image_link(document: &Document) {
    let Some(sel) = image_select(document) else {
        return;
    };
    let selected = sel.value();
    let path = element_text(document, IMAGES_PATH).unwrap_or_default();
    let link = element_text(document, &format!("image-{selected}")).unwrap_or_default();
    match image_link(&selected, path.trim(), link.trim()) {
        Some(href) => {
            if let Some(a) = html_element(document, SHOW_IMAGE) {
                if let Err(e) = a.set_attribute("href", &href) {
                    log::warn!("image link not set: {:?}", e);
                }
            }
            set_visible(document, SHOW_IMAGE, true);
        }
        None => set_visible(document, SHOW_IMAGE, false),
    }
}

/// Wire the back buttons and the image preview link.
pub fn attach_links(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    update_image_link(&doc);
    if let Some(sel) = image_select(&doc) {
        let d = doc.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            update_image_link(&d);
        }));
        sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    for (id, level) in [
        (BACK_LIBRARY, BackLevel::Library),
        (BACK_COLLECTION, BackLevel::Collection),
        (BACK_SHELF, BackLevel::Shelf),
    ] {
        let Some(btn) = html_element(&doc, id) else {
            continue;
        };
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let s = st.borrow();
            let library = field_value(&s.document, SELECT_LIBRARY);
            let collection = field_value(&s.document, SELECT_COLLECTION);
            let shelf = field_value(&s.document, SELECT_SHELF);
            let url = back_url(
                level,
                library.as_deref(),
                collection.as_deref(),
                shelf.as_deref(),
            );
            if let Err(e) = s.window.location().set_href(&url) {
                log::warn!("navigation to {} failed: {:?}", url, e);
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}
