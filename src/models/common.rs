use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, Result};

/// Tolerance used when comparing geometry expressed in inches.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// The fixed size of a slide canvas, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDimensions {
    /// The canvas width in inches.
    pub width: f64,
    /// The canvas height in inches.
    pub height: f64,
}

impl Default for SlideDimensions {
    /// Standard 16:9 widescreen canvas.
    fn default() -> Self {
        Self {
            width: 13.333,
            height: 7.5,
        }
    }
}

/// The rectangle occupied by an element on the canvas, in inches.
/// Invariant: `width > 0` and `height > 0` (checked by [`BoundingBox::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Distance from the left edge of the canvas.
    pub left: f64,
    /// Distance from the top edge of the canvas.
    pub top: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Rejects boxes with non-finite coordinates or a non-positive extent.
    pub fn validate(&self) -> Result<()> {
        let values = [self.left, self.top, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LayoutError::InvalidPosition(format!(
                "position values must be finite numbers, got {}",
                self.describe()
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::InvalidPosition(format!(
                "width and height must be positive, got width={} height={}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Area of the rectangle shared with `other`. Touching edges yield zero.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let overlap_w = self.right().min(other.right()) - self.left.max(other.left);
        let overlap_h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if overlap_w <= 0.0 || overlap_h <= 0.0 {
            0.0
        } else {
            overlap_w * overlap_h
        }
    }

    /// Two boxes overlap iff they intersect with positive area.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let overlap_w = self.right().min(other.right()) - self.left.max(other.left);
        let overlap_h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        overlap_w > GEOMETRY_EPSILON && overlap_h > GEOMETRY_EPSILON
    }

    /// Names of the canvas edges this box crosses (empty when fully inside).
    pub fn edges_outside(&self, canvas: &SlideDimensions) -> Vec<&'static str> {
        let mut edges = Vec::new();
        if self.left < -GEOMETRY_EPSILON {
            edges.push("left");
        }
        if self.top < -GEOMETRY_EPSILON {
            edges.push("top");
        }
        if self.right() > canvas.width + GEOMETRY_EPSILON {
            edges.push("right");
        }
        if self.bottom() > canvas.height + GEOMETRY_EPSILON {
            edges.push("bottom");
        }
        edges
    }

    pub fn is_within(&self, canvas: &SlideDimensions) -> bool {
        self.edges_outside(canvas).is_empty()
    }

    /// Same size, moved to a new origin.
    pub fn moved_to(&self, left: f64, top: f64) -> Self {
        Self { left, top, ..*self }
    }

    /// True when every coordinate matches `other` within [`GEOMETRY_EPSILON`].
    pub fn approx_eq(&self, other: &BoundingBox) -> bool {
        (self.left - other.left).abs() <= GEOMETRY_EPSILON
            && (self.top - other.top).abs() <= GEOMETRY_EPSILON
            && (self.width - other.width).abs() <= GEOMETRY_EPSILON
            && (self.height - other.height).abs() <= GEOMETRY_EPSILON
    }

    /// Human readable form used in diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "(left={:.2}in, top={:.2}in, width={:.2}in, height={:.2}in)",
            self.left, self.top, self.width, self.height
        )
    }
}

/// A partial geometry update; omitted fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl PositionUpdate {
    /// Applies the update on top of `current`.
    pub fn apply_to(&self, current: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.unwrap_or(current.left),
            top: self.top.unwrap_or(current.top),
            width: self.width.unwrap_or(current.width),
            height: self.height.unwrap_or(current.height),
        }
    }
}

impl From<BoundingBox> for PositionUpdate {
    fn from(b: BoundingBox) -> Self {
        Self {
            left: Some(b.left),
            top: Some(b.top),
            width: Some(b.width),
            height: Some(b.height),
        }
    }
}
