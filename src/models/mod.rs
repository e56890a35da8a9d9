//! Data model of slides, elements and styled text.

pub mod common;
pub mod elements;
pub mod presentation;
pub mod text;

pub use common::{BoundingBox, PositionUpdate, SlideDimensions};
pub use elements::{ContentKind, Element, ElementContent, ElementType, TableCell};
pub use presentation::{Presentation, Slide};
pub use text::{Alignment, ListMarker, RunStyle, StyleOverrides, StyledParagraph, StyledRun};
