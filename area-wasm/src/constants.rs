/// Element ids the editor page is expected to provide.
pub const SELECT_MAP: &str = "select_map";
pub const MAP_DIV: &str = "map_div";
pub const MAP_IMAGE: &str = "map";
pub const MAP_POPUP: &str = "map_popup";
pub const OPEN_MAP_DIALOG: &str = "open_map_dialog";
pub const CLOSE_MAP_DIALOG: &str = "close_map_dialog";
pub const PIN: &str = "pin";
pub const ARROW: &str = "arrow";
pub const X_COORD: &str = "x-coordinate";
pub const Y_COORD: &str = "y-coordinate";
pub const X_CLICK: &str = "x-coordinate1";
pub const Y_CLICK: &str = "y-coordinate1";
/// Visible area list with delete entries and angle fields.
pub const AREA_LIST: &str = "remove_area";
/// Hidden inputs submitted with the form.
pub const AREA_FIELDS: &str = "area_container";
pub const USED_AREAS: &str = "used_areas";
/// JSON array of the location's saved areas.
pub const EXISTING_AREAS: &str = "existing_areas";

pub const SELECT_LIBRARY: &str = "select_library";
pub const SELECT_COLLECTION: &str = "select_collection";
pub const SELECT_SHELF: &str = "select_shelf";
pub const BACK_LIBRARY: &str = "btn_back_library";
pub const BACK_COLLECTION: &str = "btn_back_collection";
pub const BACK_SHELF: &str = "btn_back_shelf";
pub const IMAGES_PATH: &str = "images_path";
pub const SHOW_IMAGE: &str = "show_image";

pub const DELETE_ICON: &str = "images/delete.png";
