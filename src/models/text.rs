// src/models/text.rs

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default body text color.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Horizontal alignment of a paragraph inside its element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    /// The paragraph is aligned to the start of the line (left for LTR text).
    #[default]
    Start,
    /// The paragraph is centered.
    Center,
    /// The paragraph is aligned to the end of the line.
    End,
}

/// Concrete rendering style of a run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// The font family name used to render the run.
    pub font_family: String,
    /// The font size in points.
    pub font_size_pt: f64,
    /// Foreground color as `#RRGGBB`.
    pub color: String,
    /// Resolved font file. `None` when the family could not be resolved and the
    /// renderer should fall back to its default font.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
}

impl RunStyle {
    /// Plain style in the given family and size.
    pub fn plain(font_family: &str, font_size_pt: f64) -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            font_family: font_family.to_string(),
            font_size_pt,
            color: DEFAULT_TEXT_COLOR.to_string(),
            font_file: None,
        }
    }
}

/// A segment of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledRun {
    /// The text content of this run.
    pub text: String,
    /// The styling applied to this run.
    #[serde(flatten)]
    pub style: RunStyle,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// List marker carried by a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ListMarker {
    /// An unordered bullet at the given nesting level (0 = top level).
    Bullet { level: u8 },
    /// An ordered item with its number at the given nesting level.
    Numbered { number: u32, level: u8 },
}

/// A line/paragraph of styled text inside an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledParagraph {
    /// Runs in reading order.
    pub runs: Vec<StyledRun>,
    /// Bullet or number, if the paragraph is a list item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<ListMarker>,
    #[serde(default)]
    pub alignment: Alignment,
}

impl StyledParagraph {
    pub fn new(runs: Vec<StyledRun>) -> Self {
        Self {
            runs,
            marker: None,
            alignment: Alignment::Start,
        }
    }

    /// The paragraph text with all runs concatenated.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Optional style values, typically parsed from placeholder annotations.
/// Set fields override the base style, unset fields keep it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverrides {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub font_family: Option<String>,
    pub font_size_pt: Option<f64>,
    pub color: Option<String>,
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        *self == StyleOverrides::default()
    }

    /// Merges these overrides onto `base`, returning the merged style.
    pub fn apply(&self, base: &RunStyle) -> RunStyle {
        let mut merged = base.clone();
        if let Some(bold) = self.bold {
            merged.bold = bold;
        }
        if let Some(italic) = self.italic {
            merged.italic = italic;
        }
        if let Some(underline) = self.underline {
            merged.underline = underline;
        }
        if let Some(strikethrough) = self.strikethrough {
            merged.strikethrough = strikethrough;
        }
        if let Some(family) = &self.font_family {
            merged.font_family = family.clone();
            // the previous file belonged to another family
            merged.font_file = None;
        }
        if let Some(size) = self.font_size_pt {
            merged.font_size_pt = size;
        }
        if let Some(color) = &self.color {
            merged.color = color.clone();
        }
        debug!("[StyleOverrides::apply] {:?} -> {:?}", self, merged);
        merged
    }
}
