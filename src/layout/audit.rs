//! Slide audit: boundary violations and pairwise overlaps.

use log::info;
use serde::{Deserialize, Serialize};

use super::constants::{OVERLAP_MODERATE_FRACTION, OVERLAP_SEVERE_FRACTION};
use crate::models::common::{BoundingBox, SlideDimensions};
use crate::models::elements::{ContentKind, ElementType};
use crate::models::presentation::Slide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStatus {
    NoIssues,
    IssuesDetected,
}

/// Overlap severity by intersection area relative to the smaller element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapSeverity {
    Low,
    Moderate,
    Severe,
}

impl OverlapSeverity {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction >= OVERLAP_SEVERE_FRACTION {
            OverlapSeverity::Severe
        } else if fraction >= OVERLAP_MODERATE_FRACTION {
            OverlapSeverity::Moderate
        } else {
            OverlapSeverity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryViolation {
    pub element_index: usize,
    pub element_id: String,
    /// Canvas edges crossed: `left`, `top`, `right`, `bottom`.
    pub edges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementOverlap {
    pub description: String,
    pub severity: OverlapSeverity,
    pub first_element_id: String,
    pub second_element_id: String,
    /// Intersection area in square inches.
    pub overlap_area: f64,
    /// Intersection area over the smaller element's area.
    pub overlap_fraction: f64,
}

/// One element as listed in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSummary {
    pub index: usize,
    pub element_id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub content_kind: ContentKind,
    pub bounding_box: BoundingBox,
    pub source_order: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideElementsReport {
    pub total_elements: usize,
    pub layout_status: LayoutStatus,
    pub slide_dimensions: SlideDimensions,
    pub elements_outside_boundary: usize,
    pub boundary_violations: Vec<BoundaryViolation>,
    pub total_overlapping_pairs: usize,
    pub element_overlaps: Vec<ElementOverlap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementSummary>>,
}

/// Audits every element of `slide`. Element text is listed only when
/// `include_content` is set.
pub fn audit_slide(slide: &Slide, include_content: bool) -> SlideElementsReport {
    let canvas = slide.dimensions;

    let boundary_violations: Vec<BoundaryViolation> = slide
        .elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let edges = element.bounding_box.edges_outside(&canvas);
            (!edges.is_empty()).then(|| BoundaryViolation {
                element_index: index,
                element_id: element.id.clone(),
                edges: edges.into_iter().map(String::from).collect(),
            })
        })
        .collect();

    let mut element_overlaps = Vec::new();
    for (i, first) in slide.elements.iter().enumerate() {
        for second in &slide.elements[i + 1..] {
            let (a, b) = (&first.bounding_box, &second.bounding_box);
            if !a.overlaps(b) {
                continue;
            }
            let overlap_area = a.intersection_area(b);
            let smaller = a.area().min(b.area());
            let overlap_fraction = if smaller > 0.0 {
                (overlap_area / smaller).min(1.0)
            } else {
                0.0
            };
            let severity = OverlapSeverity::from_fraction(overlap_fraction);
            element_overlaps.push(ElementOverlap {
                description: format!(
                    "{} overlaps {} by {:.2} sq in ({:.0}% of the smaller element)",
                    first.id,
                    second.id,
                    overlap_area,
                    overlap_fraction * 100.0
                ),
                severity,
                first_element_id: first.id.clone(),
                second_element_id: second.id.clone(),
                overlap_area,
                overlap_fraction,
            });
        }
    }

    let layout_status = if boundary_violations.is_empty() && element_overlaps.is_empty() {
        LayoutStatus::NoIssues
    } else {
        LayoutStatus::IssuesDetected
    };

    let elements = include_content.then(|| {
        slide
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| ElementSummary {
                index,
                element_id: element.id.clone(),
                element_type: element.element_type,
                content_kind: element.content_kind,
                bounding_box: element.bounding_box,
                source_order: element.source_order,
                content: Some(element.styled_content.plain_text()),
            })
            .collect()
    });

    info!(
        "Audited slide {}: {} element(s), {} outside, {} overlapping pair(s)",
        slide.object_id,
        slide.elements.len(),
        boundary_violations.len(),
        element_overlaps.len()
    );

    SlideElementsReport {
        total_elements: slide.elements.len(),
        layout_status,
        slide_dimensions: canvas,
        elements_outside_boundary: boundary_violations.len(),
        boundary_violations,
        total_overlapping_pairs: element_overlaps.len(),
        element_overlaps,
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::{Element, ElementContent};
    use crate::models::text::{RunStyle, StyledParagraph, StyledRun};

    fn element(id: &str, bbox: BoundingBox) -> Element {
        Element {
            id: id.to_string(),
            element_type: ElementType::Text,
            content_kind: ContentKind::Paragraph,
            styled_content: ElementContent::Text {
                paragraphs: vec![StyledParagraph::new(vec![StyledRun::new(
                    format!("text of {}", id),
                    RunStyle::plain("DejaVu Sans", 18.0),
                )])],
            },
            bounding_box: bbox,
            source_order: 0,
        }
    }

    fn slide(boxes: &[BoundingBox]) -> Slide {
        let mut slide = Slide::new("s1", SlideDimensions::default());
        for (i, bbox) in boxes.iter().enumerate() {
            slide.elements.push(element(&format!("e{}", i), *bbox));
        }
        slide
    }

    #[test]
    fn test_clean_slide_has_no_issues() {
        let report = audit_slide(
            &slide(&[
                BoundingBox::new(0.5, 0.5, 4.0, 1.0),
                BoundingBox::new(0.5, 1.5, 4.0, 1.0),
            ]),
            false,
        );
        assert_eq!(report.total_elements, 2);
        assert_eq!(report.layout_status, LayoutStatus::NoIssues);
        assert_eq!(report.total_overlapping_pairs, 0);
        assert!(report.elements.is_none());
    }

    #[test]
    fn test_boundary_and_overlap_detection() {
        let report = audit_slide(
            &slide(&[
                BoundingBox::new(1.0, 1.0, 2.0, 2.0),
                BoundingBox::new(1.0, 1.0, 1.0, 1.0),
                BoundingBox::new(2.9, 2.9, 2.0, 2.0),
                BoundingBox::new(12.0, 7.0, 2.0, 1.0),
            ]),
            true,
        );
        assert_eq!(report.layout_status, LayoutStatus::IssuesDetected);
        assert_eq!(report.elements_outside_boundary, 1);
        assert_eq!(report.boundary_violations[0].element_id, "e3");
        assert_eq!(report.boundary_violations[0].edges, vec!["right", "bottom"]);

        assert_eq!(report.total_overlapping_pairs, 2);
        let contained = &report.element_overlaps[0];
        assert_eq!(
            (
                contained.first_element_id.as_str(),
                contained.second_element_id.as_str()
            ),
            ("e0", "e1")
        );
        assert_eq!(contained.severity, OverlapSeverity::Severe);
        let corner = &report.element_overlaps[1];
        assert_eq!(corner.second_element_id, "e2");
        assert_eq!(corner.severity, OverlapSeverity::Low);

        let elements = report.elements.unwrap();
        assert_eq!(elements[1].content.as_deref(), Some("text of e1"));
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(OverlapSeverity::from_fraction(0.05), OverlapSeverity::Low);
        assert_eq!(OverlapSeverity::from_fraction(0.1), OverlapSeverity::Moderate);
        assert_eq!(OverlapSeverity::from_fraction(0.49), OverlapSeverity::Moderate);
        assert_eq!(OverlapSeverity::from_fraction(0.5), OverlapSeverity::Severe);
    }

    #[test]
    fn test_report_serializes_status_in_snake_case() {
        let report = audit_slide(&slide(&[]), false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["layoutStatus"], "no_issues");
        assert_eq!(json["totalElements"], 0);
        assert!(json.get("elements").is_none());
    }
}
