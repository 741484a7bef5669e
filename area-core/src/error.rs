use thiserror::Error;

/// Errors raised while reading area data handed over by the server.
#[derive(Error, Debug)]
pub enum AreaError {
    /// The embedded existing-areas payload is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exporter answered with malformed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An `<area coords>` attribute did not hold four integers
    #[error("Invalid coordinates: {coords:?}")]
    InvalidCoords {
        /// The raw attribute value
        coords: String,
    },
}
