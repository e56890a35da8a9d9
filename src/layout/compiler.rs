//! Auto-layout: one markdown document to stacked, styled elements.

use indexmap::IndexMap;
use log::{debug, info};

use super::stacking::default_block_box;
use super::styling::TextStyler;
use crate::config::LayoutConfig;
use crate::fonts::FontResolver;
use crate::markdown::blocks::parse_blocks;
use crate::models::elements::Element;
use crate::models::presentation::Slide;

/// Elements compiled from a document, in source order.
#[derive(Debug, Clone, Default)]
pub struct CompiledDocument {
    pub elements: Vec<Element>,
    /// Number of elements per content kind label (`heading_1`, `table`, ...).
    pub element_types: IndexMap<String, usize>,
}

/// Compiles `document` into elements for `slide`.
///
/// Blocks stack below the elements already on the slide and below each other;
/// ids continue the slide's element sequence. The slide itself is not modified.
pub fn compile_document(
    document: &str,
    slide: &Slide,
    config: &LayoutConfig,
    fonts: &FontResolver,
) -> CompiledDocument {
    let styler = TextStyler::new(config, fonts);
    let mut occupied = slide.occupied_boxes();
    let mut compiled = CompiledDocument::default();

    for (source_order, block) in parse_blocks(document).into_iter().enumerate() {
        let bbox = default_block_box(&block, &occupied, &slide.dimensions, config);
        let id = slide.next_element_id(compiled.elements.len());
        debug!(
            "[compile_document] block {} ({}) -> {} at {}",
            source_order,
            block.kind.label(),
            id,
            bbox.describe()
        );
        let element = Element {
            id,
            element_type: block.kind.element_type(),
            content_kind: block.kind,
            styled_content: styler.style_block(&block, &bbox),
            bounding_box: bbox,
            source_order,
        };
        *compiled.element_types.entry(block.kind.label()).or_insert(0) += 1;
        occupied.push(bbox);
        compiled.elements.push(element);
    }

    info!(
        "Compiled {} element(s) for slide {}",
        compiled.elements.len(),
        slide.object_id
    );
    compiled
}
