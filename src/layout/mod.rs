//! The layout engine proper: sizing, stacking, compiling, placing, auditing
//! and mutating elements.

pub mod audit;
pub mod compiler;
pub mod constants;
pub mod fit;
pub mod mutate;
pub mod placement;
pub mod stacking;
pub mod styling;

pub use audit::{audit_slide, LayoutStatus, OverlapSeverity, SlideElementsReport};
pub use compiler::{compile_document, CompiledDocument};
pub use fit::calculate_best_fit_font_size;
pub use mutate::{FindReplaceResult, Replacement, RepositionResult};
pub use placement::{place_batch, AddedElement, ElementRequest, PlacementDecision, SkippedElement};
