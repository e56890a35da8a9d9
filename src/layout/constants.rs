//! Defines constants used throughout text measurement and placement.

// Conversion factors
pub const PT_PER_INCH: f64 = 72.0;

// Text measurement heuristics. Average glyph advance and line height are
// expressed as fractions of the font size (em).
pub const AVG_CHAR_WIDTH_EM: f64 = 0.52;
pub const LINE_HEIGHT_EM: f64 = 1.2;
/// Extra vertical space each bullet line reserves (paragraph spacing).
pub const BULLET_LINE_EXTRA_EM: f64 = 0.3;
/// Horizontal room taken by the bullet glyph and its hanging indent.
pub const BULLET_INDENT_EM: f64 = 1.5;

// Text box insets (points), matching common presentation defaults.
pub const BOX_INSET_X_PT: f64 = 7.2;
pub const BOX_INSET_Y_PT: f64 = 3.6;

/// Smallest size the best-fit search may return.
pub const MIN_FONT_SIZE_PT: f64 = 10.0;
/// Decrement used by the best-fit search.
pub const FONT_SIZE_STEP_PT: f64 = 0.5;
/// Most steps the best-fit search takes; larger ceilings start lower.
pub const MAX_FIT_STEPS: u32 = 2000;

/// Height of a table row per point of font size, plus its fixed cell padding.
pub const TABLE_ROW_PADDING_IN: f64 = 0.15;
/// Default height given to a standalone image block.
pub const IMAGE_BLOCK_HEIGHT_IN: f64 = 3.0;

// Overlap severity thresholds, as a fraction of the smaller element's area.
pub const OVERLAP_MODERATE_FRACTION: f64 = 0.1;
pub const OVERLAP_SEVERE_FRACTION: f64 = 0.5;

pub const DEFAULT_QUOTE_COLOR: &str = "#555555";
