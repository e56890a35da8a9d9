// src/models/elements.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::common::BoundingBox;
use crate::models::text::StyledParagraph;

/// The closed set of element types that can live on a slide.
/// Fixed at creation; no operation changes it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// A text box (headings, paragraphs, code blocks).
    Text,
    /// A text box whose paragraphs are bullet items.
    BulletedList,
    /// A text box whose paragraphs are numbered items.
    NumberedList,
    /// A grid of cells.
    Table,
    /// An embedded picture (the embedding itself is handled elsewhere).
    Image,
    /// An embedded chart (the embedding itself is handled elsewhere).
    Chart,
    /// A quoted text box.
    Blockquote,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::BulletedList => "bulleted_list",
            ElementType::NumberedList => "numbered_list",
            ElementType::Table => "table",
            ElementType::Image => "image",
            ElementType::Chart => "chart",
            ElementType::Blockquote => "blockquote",
        }
    }

    /// Whether elements of this type carry styled text.
    pub fn is_text_bearing(&self) -> bool {
        !matches!(self, ElementType::Image | ElementType::Chart)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural classification of a markdown fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ContentKind {
    /// `#` .. `######` heading, level 1-6.
    Heading { level: u8 },
    /// Running text.
    Paragraph,
    /// Lines starting with `-`, `*`, `+` or `•`.
    BulletList,
    /// Lines starting with `1.` / `1)`.
    NumberedList,
    /// Pipe table rows.
    Table,
    /// Lines prefixed with `>`.
    Blockquote,
    /// A fenced code block.
    CodeBlock,
    /// A standalone `![alt](source)` image reference.
    Image,
}

impl ContentKind {
    /// The element type an element of this content gets at creation.
    pub fn element_type(&self) -> ElementType {
        match self {
            ContentKind::Heading { .. } | ContentKind::Paragraph | ContentKind::CodeBlock => {
                ElementType::Text
            }
            ContentKind::BulletList => ElementType::BulletedList,
            ContentKind::NumberedList => ElementType::NumberedList,
            ContentKind::Table => ElementType::Table,
            ContentKind::Blockquote => ElementType::Blockquote,
            ContentKind::Image => ElementType::Image,
        }
    }

    /// Short label used in per-type counts.
    pub fn label(&self) -> String {
        match self {
            ContentKind::Heading { level } => format!("heading_{}", level),
            ContentKind::Paragraph => "paragraph".to_string(),
            ContentKind::BulletList => "bulleted_list".to_string(),
            ContentKind::NumberedList => "numbered_list".to_string(),
            ContentKind::Table => "table".to_string(),
            ContentKind::Blockquote => "blockquote".to_string(),
            ContentKind::CodeBlock => "code_block".to_string(),
            ContentKind::Image => "image".to_string(),
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, ContentKind::Heading { .. })
    }
}

/// A single cell of a table element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub paragraphs: Vec<StyledParagraph>,
}

/// The styled content of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ElementContent {
    /// Paragraphs of styled runs (text, lists, blockquotes).
    Text { paragraphs: Vec<StyledParagraph> },
    /// A fixed `rows` x `columns` grid; `cells[row][column]`.
    Table {
        rows: usize,
        columns: usize,
        cells: Vec<Vec<TableCell>>,
    },
    /// A reference to external media (image or chart).
    Media {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt_text: Option<String>,
    },
}

impl ElementContent {
    /// All text-bearing paragraphs, in reading order (tables row by row).
    pub fn paragraphs(&self) -> Vec<&StyledParagraph> {
        match self {
            ElementContent::Text { paragraphs } => paragraphs.iter().collect(),
            ElementContent::Table { cells, .. } => cells
                .iter()
                .flatten()
                .flat_map(|cell| cell.paragraphs.iter())
                .collect(),
            ElementContent::Media { .. } => Vec::new(),
        }
    }

    /// Mutable access to all text-bearing paragraphs, in reading order.
    pub fn paragraphs_mut(&mut self) -> Vec<&mut StyledParagraph> {
        match self {
            ElementContent::Text { paragraphs } => paragraphs.iter_mut().collect(),
            ElementContent::Table { cells, .. } => cells
                .iter_mut()
                .flatten()
                .flat_map(|cell| cell.paragraphs.iter_mut())
                .collect(),
            ElementContent::Media { .. } => Vec::new(),
        }
    }

    /// Plain text of the element: paragraphs joined by newlines, table cells by ` | `.
    pub fn plain_text(&self) -> String {
        match self {
            ElementContent::Text { paragraphs } => paragraphs
                .iter()
                .map(|p| p.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
            ElementContent::Table { cells, .. } => cells
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| {
                            cell.paragraphs
                                .iter()
                                .map(|p| p.plain_text())
                                .collect::<Vec<_>>()
                                .join(" ")
                        })
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ElementContent::Media { source, alt_text } => {
                alt_text.clone().unwrap_or_else(|| source.clone())
            }
        }
    }
}

/// A positioned, styled visual element on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// The object ID of the element, unique within its presentation.
    pub id: String,
    /// The element type; fixed at creation.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// What the classifier saw when the element was created.
    pub content_kind: ContentKind,
    /// The styled content.
    pub styled_content: ElementContent,
    /// Where the element sits on the canvas.
    pub bounding_box: BoundingBox,
    /// Position in the originating batch or document; immutable.
    pub source_order: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::text::{RunStyle, StyledRun};

    fn para(text: &str) -> StyledParagraph {
        StyledParagraph::new(vec![StyledRun::new(text, RunStyle::plain("DejaVu Sans", 12.0))])
    }

    #[test]
    fn test_content_kind_maps_to_closed_element_types() {
        assert_eq!(
            ContentKind::Heading { level: 1 }.element_type(),
            ElementType::Text
        );
        assert_eq!(ContentKind::CodeBlock.element_type(), ElementType::Text);
        assert_eq!(
            ContentKind::BulletList.element_type(),
            ElementType::BulletedList
        );
        assert_eq!(ContentKind::Image.element_type(), ElementType::Image);
        assert_eq!(ContentKind::Heading { level: 2 }.label(), "heading_2");
    }

    #[test]
    fn test_table_plain_text_and_paragraph_order() {
        let content = ElementContent::Table {
            rows: 2,
            columns: 2,
            cells: vec![
                vec![
                    TableCell { paragraphs: vec![para("a")] },
                    TableCell { paragraphs: vec![para("b")] },
                ],
                vec![
                    TableCell { paragraphs: vec![para("c")] },
                    TableCell { paragraphs: vec![para("d")] },
                ],
            ],
        };
        assert_eq!(content.plain_text(), "a | b\nc | d");
        let order: Vec<String> = content.paragraphs().iter().map(|p| p.plain_text()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_element_type_serializes_snake_case() {
        let json = serde_json::to_string(&ElementType::BulletedList).unwrap();
        assert_eq!(json, "\"bulleted_list\"");
    }
}
