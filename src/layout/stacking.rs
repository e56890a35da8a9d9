//! Default positions: blocks stack top to bottom inside the content margins.

use super::constants::{IMAGE_BLOCK_HEIGHT_IN, LINE_HEIGHT_EM, PT_PER_INCH, TABLE_ROW_PADDING_IN};
use super::fit::estimate_text_height;
use crate::config::LayoutConfig;
use crate::markdown::blocks::{Block, BlockBody};
use crate::markdown::inline::strip_inline_markdown;
use crate::models::common::{BoundingBox, SlideDimensions};
use crate::models::elements::ContentKind;

/// Top of the next stacked block: below the lowest occupied bottom plus the
/// block gap, never above the top margin.
pub fn next_stack_top(occupied: &[BoundingBox], config: &LayoutConfig) -> f64 {
    occupied
        .iter()
        .map(BoundingBox::bottom)
        .reduce(f64::max)
        .map_or(config.margin_top, |bottom| {
            (bottom + config.block_gap).max(config.margin_top)
        })
}

/// Height `block` needs at its font ceiling when laid out `width` inches wide.
pub fn estimate_block_height(block: &Block, width: f64, config: &LayoutConfig) -> f64 {
    match &block.body {
        BlockBody::Lines(_) => {
            let text = strip_inline_markdown(&block.text());
            let is_list = matches!(block.kind, ContentKind::BulletList | ContentKind::NumberedList);
            estimate_text_height(&text, width, config.font_sizes.for_kind(block.kind), is_list)
        }
        BlockBody::Table(rows) => table_height(rows.len(), config),
        BlockBody::Media { .. } => IMAGE_BLOCK_HEIGHT_IN,
    }
}

/// Height a table of `rows` rows needs at the table font ceiling.
pub fn table_height(rows: usize, config: &LayoutConfig) -> f64 {
    let row_height = config.font_sizes.table * LINE_HEIGHT_EM / PT_PER_INCH + TABLE_ROW_PADDING_IN;
    rows.max(1) as f64 * row_height
}

/// The stacked box for `block` below everything in `occupied`.
///
/// The height is the estimate, at least `min_block_height`, cut down to the
/// room left above the bottom margin when that room is usable. Text in a cut
/// box is shrunk by best-fit sizing; a block with no usable room left keeps its
/// estimate and runs past the margin.
pub fn default_block_box(
    block: &Block,
    occupied: &[BoundingBox],
    canvas: &SlideDimensions,
    config: &LayoutConfig,
) -> BoundingBox {
    let top = next_stack_top(occupied, config);
    let width = config.content_width(canvas);
    let estimated = estimate_block_height(block, width, config).max(config.min_block_height);
    let remaining = config.content_bottom(canvas) - top;
    let height = if remaining >= config.min_block_height {
        estimated.min(remaining)
    } else {
        estimated
    };
    BoundingBox::new(config.margin_left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::blocks::{fragment_block, parse_blocks};

    #[test]
    fn test_empty_slide_starts_at_top_margin() {
        let config = LayoutConfig::default();
        assert_eq!(next_stack_top(&[], &config), 0.5);
    }

    #[test]
    fn test_stacks_below_lowest_bottom() {
        let config = LayoutConfig::default();
        let occupied = [
            BoundingBox::new(0.5, 0.5, 4.0, 1.0),
            BoundingBox::new(6.0, 0.5, 4.0, 2.5),
        ];
        assert!((next_stack_top(&occupied, &config) - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_default_box_uses_content_margins() {
        let config = LayoutConfig::default();
        let canvas = SlideDimensions::default();
        let block = fragment_block("Just a sentence.");
        let bbox = default_block_box(&block, &[], &canvas, &config);
        assert_eq!(bbox.left, 0.5);
        assert_eq!(bbox.top, 0.5);
        assert!((bbox.width - 12.333).abs() < 1e-9);
        assert!(bbox.height >= config.min_block_height);
    }

    #[test]
    fn test_box_is_cut_to_remaining_room() {
        let config = LayoutConfig::default();
        let canvas = SlideDimensions::default();
        let long = vec!["A sentence that keeps going on and on."; 60].join(" ");
        let block = fragment_block(&long);
        let occupied = [BoundingBox::new(0.5, 0.5, 12.0, 4.0)];
        let bbox = default_block_box(&block, &occupied, &canvas, &config);
        assert!((bbox.top - 4.7).abs() < 1e-9);
        assert!((bbox.bottom() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_table_and_image_heights() {
        let config = LayoutConfig::default();
        let blocks = parse_blocks("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n\n![x](x.png)");
        let table = estimate_block_height(&blocks[0], 10.0, &config);
        assert!((table - table_height(3, &config)).abs() < 1e-9);
        assert_eq!(estimate_block_height(&blocks[1], 10.0, &config), IMAGE_BLOCK_HEIGHT_IN);
    }
}
