/// Endpoint and icon settings for the editor.
///
/// Offsets are in CSS pixels and match the drawn size of the icons.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Overlay rendering endpoint, relative to the admin pages.
    pub image_creator: String,
    pub pin_icon: String,
    pub arrow_icon: String,
    /// The pin's tip is at its bottom-left corner, so it is lifted by its height.
    pub pin_offset: f64,
    /// The arrow points at its bottom-right corner.
    pub arrow_offset: f64,
    /// Extra popup width around the overlay image.
    pub dialog_padding: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            image_creator: "ImageCreator".to_string(),
            pin_icon: "images/pin.png".to_string(),
            arrow_icon: "images/arrow.png".to_string(),
            pin_offset: 16.0,
            arrow_offset: 16.0,
            dialog_padding: 150.0,
        }
    }
}

impl EditorConfig {
    pub fn with_image_creator(mut self, endpoint: impl Into<String>) -> Self {
        self.image_creator = endpoint.into();
        self
    }
}
