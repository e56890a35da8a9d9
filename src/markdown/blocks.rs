//! Splits a markdown document (or one content fragment) into top-level blocks.

use log::debug;

use super::classify::{
    bullet_item, classify_fragment, heading, image_ref, is_fence, is_horizontal_rule,
    is_table_row, is_table_separator, numbered_item, quote_line,
};
use crate::models::elements::ContentKind;
use crate::models::text::ListMarker;

/// One line of block text with list markup removed.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLine {
    /// Line text, still carrying inline markdown and placeholder tokens.
    pub text: String,
    pub marker: Option<ListMarker>,
}

impl BlockLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: None,
        }
    }
}

/// The payload of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    Lines(Vec<BlockLine>),
    /// Cell texts, row-major, every row padded to the same column count.
    Table(Vec<Vec<String>>),
    Media { source: String, alt_text: String },
}

/// A top-level markdown block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: ContentKind,
    pub body: BlockBody,
}

impl Block {
    fn lines(kind: ContentKind, lines: Vec<BlockLine>) -> Self {
        Self {
            kind,
            body: BlockBody::Lines(lines),
        }
    }

    /// Block text with one line per paragraph/row, used for height estimates.
    pub fn text(&self) -> String {
        match &self.body {
            BlockBody::Lines(lines) => lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            BlockBody::Table(rows) => rows
                .iter()
                .map(|row| row.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
            BlockBody::Media { alt_text, .. } => alt_text.clone(),
        }
    }
}

/// Splits `document` into blocks in source order.
///
/// Blank lines end paragraphs, lists, quotes and tables; horizontal rules are
/// dropped; a fence runs until its closing fence (or the end of the document).
pub fn parse_blocks(document: &str) -> Vec<Block> {
    let mut parser = BlockParser::default();
    for line in document.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Turns a single content fragment into one block of its classified kind.
/// Mixed fragments (a heading followed by bullets, say) keep every line.
pub fn fragment_block(content: &str) -> Block {
    let kind = classify_fragment(content);
    let blocks = parse_blocks(content);
    match kind {
        ContentKind::Table => {
            if let Some(table) = blocks.iter().find(|b| b.kind == ContentKind::Table) {
                return table.clone();
            }
        }
        ContentKind::Image => {
            if let Some(image) = blocks.iter().find(|b| b.kind == ContentKind::Image) {
                return image.clone();
            }
        }
        _ => {}
    }
    let lines = blocks
        .into_iter()
        .flat_map(|block| match block.body {
            BlockBody::Lines(lines) => lines,
            BlockBody::Table(rows) => rows
                .into_iter()
                .map(|row| BlockLine::plain(row.join(" | ")))
                .collect(),
            BlockBody::Media { alt_text, .. } => vec![BlockLine::plain(alt_text)],
        })
        .collect();
    Block::lines(kind, lines)
}

#[derive(Default)]
struct BlockParser {
    blocks: Vec<Block>,
    current: Option<Open>,
}

enum Open {
    Paragraph(Vec<BlockLine>),
    List(ContentKind, Vec<BlockLine>),
    Quote(Vec<BlockLine>),
    Table(Vec<Vec<String>>),
    Code(Vec<BlockLine>),
}

impl BlockParser {
    fn feed(&mut self, line: &str) {
        if let Some(Open::Code(lines)) = &mut self.current {
            if is_fence(line) {
                self.flush();
            } else {
                lines.push(BlockLine::plain(line));
            }
            return;
        }
        if line.trim().is_empty() {
            self.flush();
            return;
        }
        if is_fence(line) {
            self.flush();
            self.current = Some(Open::Code(Vec::new()));
            return;
        }
        if is_table_separator(line) || is_table_row(line) {
            if is_table_separator(line) {
                // separators only shape the markdown, they are not rows
                if !matches!(self.current, Some(Open::Table(_))) {
                    self.flush();
                    self.current = Some(Open::Table(Vec::new()));
                }
                return;
            }
            let cells = split_table_row(line);
            match &mut self.current {
                Some(Open::Table(rows)) => rows.push(cells),
                _ => {
                    self.flush();
                    self.current = Some(Open::Table(vec![cells]));
                }
            }
            return;
        }
        if is_horizontal_rule(line) {
            self.flush();
            return;
        }
        if let Some((level, text)) = heading(line) {
            self.flush();
            self.blocks.push(Block::lines(
                ContentKind::Heading { level },
                vec![BlockLine::plain(text)],
            ));
            return;
        }
        if let Some((alt, source)) = image_ref(line) {
            self.flush();
            self.blocks.push(Block {
                kind: ContentKind::Image,
                body: BlockBody::Media {
                    source: source.to_string(),
                    alt_text: alt.to_string(),
                },
            });
            return;
        }
        if let Some((level, text)) = bullet_item(line) {
            self.push_list_item(
                ContentKind::BulletList,
                BlockLine {
                    text: text.to_string(),
                    marker: Some(ListMarker::Bullet { level }),
                },
            );
            return;
        }
        if let Some((number, level, text)) = numbered_item(line) {
            self.push_list_item(
                ContentKind::NumberedList,
                BlockLine {
                    text: text.to_string(),
                    marker: Some(ListMarker::Numbered { number, level }),
                },
            );
            return;
        }
        if let Some(text) = quote_line(line) {
            match &mut self.current {
                Some(Open::Quote(lines)) => lines.push(BlockLine::plain(text)),
                _ => {
                    self.flush();
                    self.current = Some(Open::Quote(vec![BlockLine::plain(text)]));
                }
            }
            return;
        }
        self.push_text_line(line);
    }

    fn push_list_item(&mut self, kind: ContentKind, item: BlockLine) {
        match &mut self.current {
            Some(Open::List(open_kind, items)) if *open_kind == kind => items.push(item),
            _ => {
                self.flush();
                self.current = Some(Open::List(kind, vec![item]));
            }
        }
    }

    fn push_text_line(&mut self, line: &str) {
        match &mut self.current {
            // indented continuation of a list item
            Some(Open::List(_, items)) if line.starts_with(char::is_whitespace) => {
                if let Some(last) = items.last_mut() {
                    last.text.push(' ');
                    last.text.push_str(line.trim());
                }
            }
            // lazy continuation of a quote
            Some(Open::Quote(lines)) => lines.push(BlockLine::plain(line.trim())),
            Some(Open::Paragraph(lines)) => lines.push(BlockLine::plain(line.trim())),
            _ => {
                self.flush();
                self.current = Some(Open::Paragraph(vec![BlockLine::plain(line.trim())]));
            }
        }
    }

    fn flush(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };
        let block = match open {
            Open::Paragraph(lines) => Block::lines(ContentKind::Paragraph, lines),
            Open::List(kind, items) => Block::lines(kind, items),
            Open::Quote(lines) => Block::lines(ContentKind::Blockquote, lines),
            Open::Code(lines) => Block::lines(ContentKind::CodeBlock, lines),
            Open::Table(rows) => {
                if rows.is_empty() {
                    debug!("[BlockParser::flush] dropping table without rows");
                    return;
                }
                Block {
                    kind: ContentKind::Table,
                    body: BlockBody::Table(pad_rows(rows)),
                }
            }
        };
        self.blocks.push(block);
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Cell texts of a `| a | b |` row. `\|` stays a literal pipe inside a cell.
fn split_table_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn pad_rows(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(columns, String::new());
    }
    rows
}
