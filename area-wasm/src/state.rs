use std::cell::RefCell;
use std::rc::Rc;

use area_core::EditorSession;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, Window};

/// Page state shared by every event handler.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub session: EditorSession,
    /// Set on every overlay image; lives as long as the page.
    pub overlay_onload: Closure<dyn FnMut(Event)>,
}

// The single editor instance of the page.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
