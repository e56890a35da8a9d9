//! Granular placement: explicit fragments with optional positions, placed one
//! after another with overlap avoidance.
//!
//! A batch is a fold over its requests. Each step sees the [`OccupiedRegions`]
//! left by the steps before it, decides where (or whether) its element goes and
//! hands the extended regions on.
//!
//! Auto-position search, from the requested (or default) box:
//! 1. vertical offsets `k * step` for `k = 1, 2, ...`, trying down before up at
//!    each distance; a candidate must stay on the canvas;
//! 2. the same for horizontal offsets, right before left;
//! 3. otherwise the box keeps its left edge and goes below the lowest occupied
//!    bottom plus the block gap, which may run past the canvas.
//!
//! `k` is bounded by the canvas size divided by the step, so the search always
//! terminates and always places the element.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::stacking::default_block_box;
use super::styling::TextStyler;
use crate::config::LayoutConfig;
use crate::errors::{LayoutError, Result};
use crate::fonts::FontResolver;
use crate::markdown::blocks::fragment_block;
use crate::models::common::{BoundingBox, SlideDimensions, GEOMETRY_EPSILON};
use crate::models::elements::{ContentKind, Element, ElementType};
use crate::models::presentation::Slide;

/// One fragment to place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_position: Option<bool>,
}

/// Report for a placed element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedElement {
    /// Position of the request in its batch.
    pub index: usize,
    pub element_id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub content_kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_position: Option<BoundingBox>,
    pub final_position: BoundingBox,
    pub position_adjusted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_reason: Option<String>,
}

/// Report for a request that was not placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedElement {
    pub index: usize,
    pub skip_reason: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlapping_element_ids: Vec<String>,
}

/// What happened to one request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementDecision {
    Placed {
        element: Box<Element>,
        report: AddedElement,
    },
    Skipped(SkippedElement),
}

/// Boxes already taken on a slide, with the ids of their elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccupiedRegions {
    regions: Vec<(String, BoundingBox)>,
}

impl OccupiedRegions {
    pub fn from_slide(slide: &Slide) -> Self {
        Self {
            regions: slide
                .elements
                .iter()
                .map(|e| (e.id.clone(), e.bounding_box))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.regions.iter().map(|(_, b)| *b).collect()
    }

    /// Ids of the regions `bbox` overlaps, in insertion order.
    pub fn overlapping(&self, bbox: &BoundingBox) -> Vec<String> {
        self.regions
            .iter()
            .filter(|(_, region)| region.overlaps(bbox))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_free(&self, bbox: &BoundingBox) -> bool {
        self.regions.iter().all(|(_, region)| !region.overlaps(bbox))
    }

    pub fn lowest_bottom(&self) -> Option<f64> {
        self.regions.iter().map(|(_, b)| b.bottom()).reduce(f64::max)
    }

    /// The regions with one more box.
    pub fn with(mut self, id: String, bbox: BoundingBox) -> Self {
        self.regions.push((id, bbox));
        self
    }
}

/// Searches for the nearest free box of the same size as `candidate`.
/// Returns the box and a description of the move.
pub fn find_free_slot(
    candidate: &BoundingBox,
    regions: &OccupiedRegions,
    canvas: &SlideDimensions,
    config: &LayoutConfig,
) -> (BoundingBox, String) {
    let step = if config.auto_position_step > GEOMETRY_EPSILON {
        config.auto_position_step
    } else {
        0.1
    };

    let max_vertical = (canvas.height / step).ceil() as usize;
    for k in 1..=max_vertical {
        let offset = k as f64 * step;
        for (direction, dy) in [("down", offset), ("up", -offset)] {
            let moved = candidate.moved_to(candidate.left, candidate.top + dy);
            if fits_vertically(&moved, canvas) && regions.is_free(&moved) {
                let reason = format!("moved {} by {:.2}in to clear the overlap", direction, offset);
                return (moved, reason);
            }
        }
    }

    let max_horizontal = (canvas.width / step).ceil() as usize;
    for k in 1..=max_horizontal {
        let offset = k as f64 * step;
        for (direction, dx) in [("right", offset), ("left", -offset)] {
            let moved = candidate.moved_to(candidate.left + dx, candidate.top);
            if fits_horizontally(&moved, canvas) && regions.is_free(&moved) {
                let reason = format!("moved {} by {:.2}in to clear the overlap", direction, offset);
                return (moved, reason);
            }
        }
    }

    let top = regions
        .lowest_bottom()
        .map_or(config.margin_top, |bottom| bottom + config.block_gap);
    let moved = candidate.moved_to(candidate.left, top);
    (
        moved,
        format!(
            "no free slot on the canvas; placed below the lowest element at top={:.2}in",
            top
        ),
    )
}

fn fits_vertically(bbox: &BoundingBox, canvas: &SlideDimensions) -> bool {
    bbox.top >= -GEOMETRY_EPSILON && bbox.bottom() <= canvas.height + GEOMETRY_EPSILON
}

fn fits_horizontally(bbox: &BoundingBox, canvas: &SlideDimensions) -> bool {
    bbox.left >= -GEOMETRY_EPSILON && bbox.right() <= canvas.width + GEOMETRY_EPSILON
}

/// Places a batch of requests on `slide`, in request order.
///
/// Every supplied position is validated before anything is placed; an invalid
/// one fails the whole call. Overlaps never fail the call: the element is either
/// moved (auto-position) or skipped with a reason. The slide is not modified;
/// the placed elements are returned in the decisions.
pub fn place_batch(
    requests: &[ElementRequest],
    slide: &Slide,
    config: &LayoutConfig,
    fonts: &FontResolver,
) -> Result<Vec<PlacementDecision>> {
    for (index, request) in requests.iter().enumerate() {
        if let Some(position) = &request.position {
            position.validate().map_err(|e| match e {
                LayoutError::InvalidPosition(msg) => {
                    LayoutError::InvalidPosition(format!("element {}: {}", index, msg))
                }
                other => other,
            })?;
        }
    }

    let placer = Placer {
        slide,
        config,
        styler: TextStyler::new(config, fonts),
    };
    let (_, decisions) = requests.iter().enumerate().fold(
        (OccupiedRegions::from_slide(slide), Vec::with_capacity(requests.len())),
        |(regions, mut decisions), (index, request)| {
            let placed_so_far = regions.len() - slide.elements.len();
            let decision = placer.place_one(index, request, &regions, placed_so_far);
            let regions = match &decision {
                PlacementDecision::Placed { element, .. } => {
                    regions.with(element.id.clone(), element.bounding_box)
                }
                PlacementDecision::Skipped(_) => regions,
            };
            decisions.push(decision);
            (regions, decisions)
        },
    );

    let added = decisions
        .iter()
        .filter(|d| matches!(d, PlacementDecision::Placed { .. }))
        .count();
    info!(
        "Placed {} of {} element(s) on slide {}",
        added,
        requests.len(),
        slide.object_id
    );
    Ok(decisions)
}

struct Placer<'a> {
    slide: &'a Slide,
    config: &'a LayoutConfig,
    styler: TextStyler<'a>,
}

impl Placer<'_> {
    fn place_one(
        &self,
        index: usize,
        request: &ElementRequest,
        regions: &OccupiedRegions,
        placed_so_far: usize,
    ) -> PlacementDecision {
        if request.content.trim().is_empty() {
            warn!("Skipping element {}: content is empty", index);
            return PlacementDecision::Skipped(SkippedElement {
                index,
                skip_reason: "content is empty".to_string(),
                suggestion: "provide text, markdown, a table or an image reference".to_string(),
                overlapping_element_ids: Vec::new(),
            });
        }

        let block = fragment_block(&request.content);
        let canvas = &self.slide.dimensions;
        let candidate = request
            .position
            .unwrap_or_else(|| default_block_box(&block, &regions.boxes(), canvas, self.config));
        debug!(
            "[place_one] element {} classified as {}, candidate {}",
            index,
            block.kind.label(),
            candidate.describe()
        );

        let overlapping = regions.overlapping(&candidate);
        let (final_position, adjustment_reason) = if overlapping.is_empty() {
            (candidate, None)
        } else if request.auto_position.unwrap_or(false) {
            let (moved, reason) = find_free_slot(&candidate, regions, canvas, self.config);
            debug!("[place_one] element {} {}", index, reason);
            (
                moved,
                Some(format!("overlapped {}; {}", overlapping.join(", "), reason)),
            )
        } else {
            warn!(
                "Skipping element {}: {} overlaps {}",
                index,
                candidate.describe(),
                overlapping.join(", ")
            );
            return PlacementDecision::Skipped(SkippedElement {
                index,
                skip_reason: format!(
                    "position {} overlaps existing element(s): {}",
                    candidate.describe(),
                    overlapping.join(", ")
                ),
                suggestion: "set autoPosition=true or choose a non-overlapping position"
                    .to_string(),
                overlapping_element_ids: overlapping,
            });
        };

        let element = Element {
            id: self.slide.next_element_id(placed_so_far),
            element_type: block.kind.element_type(),
            content_kind: block.kind,
            styled_content: self.styler.style_block(&block, &final_position),
            bounding_box: final_position,
            source_order: index,
        };
        let report = AddedElement {
            index,
            element_id: element.id.clone(),
            element_type: element.element_type,
            content_kind: element.content_kind,
            requested_position: request.position,
            final_position,
            position_adjusted: adjustment_reason.is_some(),
            adjustment_reason,
        };
        PlacementDecision::Placed {
            element: Box::new(element),
            report,
        }
    }
}
