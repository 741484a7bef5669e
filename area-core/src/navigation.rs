/// Which "back" button on a location edit page was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackLevel {
    Library,
    Collection,
    Shelf,
}

const LOCATIONS_PAGE: &str = "locations.htm";

/// URL of the location list, reopened at the current library, collection
/// and shelf up to `level`. Unset selections are left out.
pub fn back_url(
    level: BackLevel,
    library: Option<&str>,
    collection: Option<&str>,
    shelf: Option<&str>,
) -> String {
    let depth = match level {
        BackLevel::Library => 1,
        BackLevel::Collection => 2,
        BackLevel::Shelf => 3,
    };
    let params = [
        ("select_library", library),
        ("select_collection", collection),
        ("select_shelf", shelf),
    ];
    let query: Vec<String> = params
        .iter()
        .take(depth)
        .filter_map(|&(k, v)| v.map(|v| format!("{}={}", k, v)))
        .collect();
    if query.is_empty() {
        LOCATIONS_PAGE.to_string()
    } else {
        format!("{}?{}", LOCATIONS_PAGE, query.join("&"))
    }
}

/// Preview link for the image chosen in the image selector.
///
/// Absolute links are kept, anything else is relative to `images_path`.
/// `None` when no image (`-1`) is selected.
pub fn image_link(selected: &str, images_path: &str, link: &str) -> Option<String> {
    if selected.trim() == "-1" {
        return None;
    }
    if link.len() > 4 && link.starts_with("http") {
        Some(link.to_string())
    } else {
        Some(format!("{}{}", images_path, link))
    }
}
