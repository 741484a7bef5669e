//! Data model and pure operations behind the map area editor.
//!
//! Nothing in here touches the browser: the wasm crate feeds pointer
//! coordinates in and projects the resulting state back onto the page.
//! The public map pages use the marker and subject link helpers.

mod area;
mod collection;
mod config;
mod error;
mod form;
mod geometry;
mod markers;
mod navigation;
mod overlay;
mod session;
mod subjects;

pub use area::{Angle, Area, Point, StoredArea};
pub use collection::AreaCollection;
pub use config::EditorConfig;
pub use error::AreaError;
pub use form::{FormField, form_fields};
pub use geometry::{ImageBounds, ScreenPos};
pub use markers::{FlashStep, MarkerConfig, MarkerRect, marker_placement, parse_coords};
pub use navigation::{BackLevel, back_url, image_link};
pub use overlay::{build_overlay_url, initial_overlay_url};
pub use session::{ClickOutcome, EditorSession, MapSelection, MapView};
pub use subjects::{
    EXPORTER, ExportedLocation, LOCATION_HANDLER, SubjectConfig, SubjectLink, SubjectLinks,
    parse_locations,
};
