use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, Result};
use crate::models::common::{BoundingBox, SlideDimensions};
use crate::models::elements::Element;

/// A slide: an ordered sequence of elements on a fixed-size canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// The object ID for this slide. Element IDs are derived from it.
    pub object_id: String,
    /// The canvas size in inches.
    pub dimensions: SlideDimensions,
    /// The elements in z-order (insertion order).
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Slide {
    pub fn new(object_id: impl Into<String>, dimensions: SlideDimensions) -> Self {
        Self {
            object_id: object_id.into(),
            dimensions,
            elements: Vec::new(),
        }
    }

    /// Bounding boxes of the elements currently on the slide, in order.
    pub fn occupied_boxes(&self) -> Vec<BoundingBox> {
        self.elements.iter().map(|e| e.bounding_box).collect()
    }

    /// Object ID for the next element appended to this slide.
    /// Elements are never removed, so the count is a stable sequence.
    pub fn next_element_id(&self, offset: usize) -> String {
        format!("{}_element_{}", self.object_id, self.elements.len() + offset)
    }

    pub fn element_mut(&mut self, index: usize) -> Result<&mut Element> {
        let count = self.elements.len();
        self.elements
            .get_mut(index)
            .ok_or(LayoutError::ElementIndexOutOfRange { index, count })
    }
}

/// A presentation document: page size plus slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// The ID of the presentation.
    pub presentation_id: String,
    /// The size of pages in the presentation; new slides take it.
    #[serde(default)]
    pub page_size: SlideDimensions,
    /// The slides in the presentation.
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(presentation_id: impl Into<String>, page_size: SlideDimensions) -> Self {
        Self {
            presentation_id: presentation_id.into(),
            page_size,
            slides: Vec::new(),
        }
    }

    /// Appends an empty slide and returns its index.
    pub fn add_slide(&mut self) -> usize {
        let index = self.slides.len();
        let object_id = format!("{}_slide_{}", self.presentation_id, index);
        self.slides.push(Slide::new(object_id, self.page_size));
        index
    }

    pub fn slide(&self, index: usize) -> Result<&Slide> {
        let count = self.slides.len();
        self.slides
            .get(index)
            .ok_or(LayoutError::SlideIndexOutOfRange { index, count })
    }

    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide> {
        let count = self.slides.len();
        self.slides
            .get_mut(index)
            .ok_or(LayoutError::SlideIndexOutOfRange { index, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_slide_uses_page_size() {
        let mut deck = Presentation::new("deck", SlideDimensions { width: 10.0, height: 5.625 });
        let index = deck.add_slide();
        assert_eq!(index, 0);
        let slide = deck.slide(0).unwrap();
        assert_eq!(slide.object_id, "deck_slide_0");
        assert_eq!(slide.dimensions.width, 10.0);
        assert_eq!(slide.next_element_id(0), "deck_slide_0_element_0");
    }

    #[test]
    fn test_out_of_range_slide_is_an_error() {
        let deck = Presentation::new("deck", SlideDimensions::default());
        assert!(matches!(
            deck.slide(3),
            Err(LayoutError::SlideIndexOutOfRange { index: 3, count: 0 })
        ));
    }

    #[test]
    fn test_presentation_deserializes_with_defaults() {
        let deck: Presentation =
            serde_json::from_str(r#"{"presentationId": "p1"}"#).unwrap();
        assert!(deck.slides.is_empty());
        assert_eq!(deck.page_size, SlideDimensions::default());
    }
}
