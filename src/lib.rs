//! Markdown-driven slide layout: turns markdown documents or content fragments
//! into positioned, styled elements on a slide canvas, audits the result and
//! edits existing elements.

pub mod api;
pub mod config;
pub mod errors;
pub mod fonts;
pub mod layout;
pub mod markdown;
pub mod models;
pub mod wasm;

pub use api::{
    add_elements, find_and_replace, get_slide_elements, reposition_element, AddElementsRequest,
    AddElementsResponse, LayoutEngine,
};
pub use config::LayoutConfig;
pub use errors::{LayoutError, Result};
pub use fonts::FontResolver;
pub use layout::calculate_best_fit_font_size;
pub use markdown::{detect_placeholders_with_metadata, has_markdown_formatting};
pub use models::presentation::{Presentation, Slide};
