use thiserror::Error;

/// Represents errors that abort a layout call.
///
/// Layout-quality problems (overlaps, missing fonts) are never errors: they are
/// reported as data in the operation results.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A supplied position is unusable (non-positive width/height, non-finite values).
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// The requested slide does not exist in the presentation.
    #[error("Slide index {index} is out of range (presentation has {count} slides)")]
    SlideIndexOutOfRange { index: usize, count: usize },

    /// The requested element does not exist on the slide.
    #[error("Element index {index} is out of range (slide has {count} elements)")]
    ElementIndexOutOfRange { index: usize, count: usize },

    /// The request itself is malformed (e.g. both or neither of `elements`/`markdown`).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A configuration value is unusable (non-finite or non-positive sizes).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error occurred during the deserialization of a JSON request or document.
    #[error("Failed to deserialize JSON: {0}")]
    JsonDeserialization(#[from] serde_json::Error),

    /// An I/O error occurred, e.g. while preparing the font cache directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for `Result<T, LayoutError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;
