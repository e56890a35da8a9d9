//! Markdown handling: placeholder annotations, structural classification,
//! block splitting and inline styling.

pub mod annotations;
pub mod blocks;
pub mod classify;
pub mod inline;

pub use annotations::{detect_placeholders_with_metadata, AnnotationMap, PlaceholderToken};
pub use blocks::{fragment_block, parse_blocks, Block, BlockBody, BlockLine};
pub use classify::{classify_fragment, has_markdown_formatting};
pub use inline::{markdown_to_runs, strip_inline_markdown};
