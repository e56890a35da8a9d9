//! Turns block text into styled content: placeholder annotations, inline
//! markdown, best-fit sizing and font resolution, in that order.

use log::debug;

use super::constants::DEFAULT_QUOTE_COLOR;
use super::fit::best_fit_font_size_with_floor;
use crate::config::LayoutConfig;
use crate::fonts::tables::MONO_FAMILY;
use crate::fonts::FontResolver;
use crate::markdown::annotations::{annotation_overrides, scan_placeholders};
use crate::markdown::blocks::{Block, BlockBody, BlockLine};
use crate::markdown::inline::markdown_to_runs;
use crate::models::common::BoundingBox;
use crate::models::elements::{ContentKind, ElementContent, TableCell};
use crate::models::text::{Alignment, RunStyle, StyledParagraph, StyledRun};

/// A run before sizing; `explicit_size` marks sizes set by an annotation,
/// which best-fit sizing leaves alone.
#[derive(Debug, Clone)]
struct DraftRun {
    run: StyledRun,
    explicit_size: bool,
}

/// Styles block content for a given box.
pub struct TextStyler<'a> {
    config: &'a LayoutConfig,
    fonts: &'a FontResolver,
}

impl<'a> TextStyler<'a> {
    pub fn new(config: &'a LayoutConfig, fonts: &'a FontResolver) -> Self {
        Self { config, fonts }
    }

    /// Builds the styled content of `block` laid out in `bbox`.
    pub fn style_block(&self, block: &Block, bbox: &BoundingBox) -> ElementContent {
        match &block.body {
            BlockBody::Lines(lines) => ElementContent::Text {
                paragraphs: self.style_lines(block.kind, lines, bbox),
            },
            BlockBody::Table(rows) => self.style_table(rows, bbox),
            BlockBody::Media { source, alt_text } => ElementContent::Media {
                source: source.clone(),
                alt_text: if alt_text.is_empty() {
                    None
                } else {
                    Some(alt_text.clone())
                },
            },
        }
    }

    /// Base run style for a block kind at `size`.
    pub fn base_style(&self, kind: ContentKind, size: f64) -> RunStyle {
        let mut style = RunStyle::plain(&self.config.fonts.default_family, size);
        match kind {
            ContentKind::Heading { .. } => style.bold = true,
            ContentKind::CodeBlock => style.font_family = MONO_FAMILY.to_string(),
            ContentKind::Blockquote => {
                style.italic = true;
                style.color = DEFAULT_QUOTE_COLOR.to_string();
            }
            _ => {}
        }
        style
    }

    fn style_lines(
        &self,
        kind: ContentKind,
        lines: &[BlockLine],
        bbox: &BoundingBox,
    ) -> Vec<StyledParagraph> {
        let ceiling = self.config.font_sizes.for_kind(kind);
        let base = self.base_style(kind, ceiling);
        let literal = kind == ContentKind::CodeBlock;
        let drafts: Vec<(Vec<DraftRun>, &BlockLine)> = lines
            .iter()
            .map(|line| (self.draft_line(&line.text, &base, literal), line))
            .collect();

        let plain = drafts
            .iter()
            .map(|(runs, _)| runs.iter().map(|d| d.run.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        let is_list = matches!(kind, ContentKind::BulletList | ContentKind::NumberedList);
        let size = best_fit_font_size_with_floor(
            &plain,
            bbox.width,
            bbox.height,
            ceiling,
            self.config.font_sizes.min,
            is_list,
        );
        debug!(
            "[style_lines] {:?}: fitted {}pt (ceiling {}pt) into {}",
            kind,
            size,
            ceiling,
            bbox.describe()
        );

        let alignment = match kind {
            ContentKind::Heading { level: 1 } if self.config.center_title => Alignment::Center,
            _ => Alignment::Start,
        };
        drafts
            .iter()
            .map(|(runs, line)| StyledParagraph {
                runs: self.finalize_runs(runs, size),
                marker: line.marker,
                alignment,
            })
            .collect()
    }

    fn style_table(&self, rows: &[Vec<String>], bbox: &BoundingBox) -> ElementContent {
        let row_count = rows.len();
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cell_width = bbox.width / column_count.max(1) as f64;
        let cell_height = bbox.height / row_count.max(1) as f64;
        let ceiling = self.config.font_sizes.table;

        let cells: Vec<Vec<TableCell>> = rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                row.iter()
                    .map(|text| {
                        let mut base = self.base_style(ContentKind::Table, ceiling);
                        // header row
                        base.bold = row_index == 0;
                        let drafts = self.draft_line(text, &base, false);
                        let plain: String = drafts.iter().map(|d| d.run.text.as_str()).collect();
                        let size = best_fit_font_size_with_floor(
                            &plain,
                            cell_width,
                            cell_height,
                            ceiling,
                            self.config.font_sizes.min,
                            false,
                        );
                        TableCell {
                            paragraphs: vec![StyledParagraph::new(
                                self.finalize_runs(&drafts, size),
                            )],
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        ElementContent::Table {
            rows: row_count,
            columns: column_count,
            cells,
        }
    }

    /// Splits a line around annotated placeholders; the rest goes through the
    /// inline markdown converter (or stays literal for code).
    fn draft_line(&self, text: &str, base: &RunStyle, literal: bool) -> Vec<DraftRun> {
        let mut drafts = Vec::new();
        let push_markdown =
            |drafts: &mut Vec<DraftRun>, segment: &str, style: &RunStyle, explicit: bool| {
                let runs = if literal {
                    if segment.is_empty() {
                        Vec::new()
                    } else {
                        vec![StyledRun::new(segment, style.clone())]
                    }
                } else {
                    markdown_to_runs(segment, style, MONO_FAMILY)
                };
                drafts.extend(runs.into_iter().map(|run| DraftRun {
                    run,
                    explicit_size: explicit,
                }));
            };

        let mut last = 0;
        for token in scan_placeholders(text) {
            if token.metadata.is_empty() {
                continue;
            }
            push_markdown(&mut drafts, &text[last..token.start], base, false);
            let overrides = annotation_overrides(&token.metadata);
            let style = overrides.apply(base);
            push_markdown(
                &mut drafts,
                &token.display_text(),
                &style,
                overrides.font_size_pt.is_some(),
            );
            last = token.end;
        }
        push_markdown(&mut drafts, &text[last..], base, false);
        drafts
    }

    /// Applies the fitted size and resolves the font of every run.
    fn finalize_runs(&self, drafts: &[DraftRun], fitted_size: f64) -> Vec<StyledRun> {
        drafts
            .iter()
            .map(|draft| {
                let mut run = draft.run.clone();
                if !draft.explicit_size {
                    run.style.font_size_pt = fitted_size;
                }
                let choice = self
                    .fonts
                    .resolve_run_font(&run.style.font_family, run.style.bold);
                run.style.font_family = choice.family;
                run.style.font_file = choice.file;
                run
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::fonts::testing::provisioned_font_dir;
    use crate::markdown::blocks::{fragment_block, parse_blocks};
    use crate::models::text::ListMarker;
    use tempfile::TempDir;

    fn fixtures() -> (LayoutConfig, FontResolver, TempDir) {
        let config = LayoutConfig::default();
        let font_dir = provisioned_font_dir();
        let fonts = FontResolver::offline(FontConfig {
            font_dir: font_dir.path().to_path_buf(),
            ..FontConfig::default()
        });
        (config, fonts, font_dir)
    }

    fn paragraphs(content: &ElementContent) -> &Vec<StyledParagraph> {
        match content {
            ElementContent::Text { paragraphs } => paragraphs,
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_is_bold_centered_and_resolved() {
        let (config, fonts, font_dir) = fixtures();
        let styler = TextStyler::new(&config, &fonts);
        let block = fragment_block("# Welcome");
        let content = styler.style_block(&block, &BoundingBox::new(0.5, 0.5, 12.0, 1.0));
        let paragraph = &paragraphs(&content)[0];
        assert_eq!(paragraph.alignment, Alignment::Center);
        let run = &paragraph.runs[0];
        assert_eq!(run.text, "Welcome");
        assert!(run.style.bold);
        assert_eq!(run.style.font_size_pt, 40.0);
        assert_eq!(
            run.style.font_file,
            Some(font_dir.path().join("DejaVuSans-Bold.ttf"))
        );
    }

    #[test]
    fn test_annotation_styles_placeholder_and_keeps_explicit_size() {
        let (config, fonts, _font_dir) = fixtures();
        let styler = TextStyler::new(&config, &fonts);
        let block = fragment_block("Hello [Name, Fontsize=32pt, Color=#003366], welcome **back**");
        let content = styler.style_block(&block, &BoundingBox::new(0.5, 0.5, 10.0, 2.0));
        let runs = &paragraphs(&content)[0].runs;
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello ", "[Name]", ", welcome ", "back"]);
        assert_eq!(runs[1].style.font_size_pt, 32.0);
        assert_eq!(runs[1].style.color, "#003366");
        assert_eq!(runs[0].style.font_size_pt, 18.0);
        assert!(runs[3].style.bold);
    }

    #[test]
    fn test_unresolvable_annotated_font_falls_back_to_default() {
        let (config, fonts, font_dir) = fixtures();
        let styler = TextStyler::new(&config, &fonts);
        let block = fragment_block("[Motto, Font=Imaginary Serif]");
        let content = styler.style_block(&block, &BoundingBox::new(0.5, 0.5, 10.0, 2.0));
        let run = &paragraphs(&content)[0].runs[0];
        assert_eq!(run.style.font_family, "DejaVu Sans");
        assert_eq!(run.style.font_file, Some(font_dir.path().join("DejaVuSans.ttf")));
    }

    #[test]
    fn test_list_markers_and_shrinking() {
        let (config, fonts, _font_dir) = fixtures();
        let styler = TextStyler::new(&config, &fonts);
        let items: Vec<String> = (1..=12)
            .map(|i| format!("- Item number {} with a fairly long description attached", i))
            .collect();
        let block = fragment_block(&items.join("\n"));
        let content = styler.style_block(&block, &BoundingBox::new(0.5, 0.5, 5.0, 2.0));
        let paragraphs = paragraphs(&content);
        assert_eq!(paragraphs.len(), 12);
        assert_eq!(paragraphs[0].marker, Some(ListMarker::Bullet { level: 0 }));
        let size = paragraphs[0].runs[0].style.font_size_pt;
        assert!(size < 18.0 && size >= 10.0);
    }

    #[test]
    fn test_code_block_stays_literal_and_monospace() {
        let (config, fonts, _font_dir) = fixtures();
        let styler = TextStyler::new(&config, &fonts);
        let blocks = parse_blocks("```\nlet x = **y**;\n```");
        let content = styler.style_block(&blocks[0], &BoundingBox::new(0.5, 0.5, 10.0, 1.0));
        let run = &paragraphs(&content)[0].runs[0];
        assert_eq!(run.text, "let x = **y**;");
        assert_eq!(run.style.font_family, "DejaVu Sans Mono");
    }

    #[test]
    fn test_table_cells_and_header_row() {
        let (config, fonts, _font_dir) = fixtures();
        let styler = TextStyler::new(&config, &fonts);
        let block = fragment_block("| Name | **Score** |\n|---|---|\n| Ada | 10 |");
        let content = styler.style_block(&block, &BoundingBox::new(0.5, 0.5, 8.0, 1.0));
        match content {
            ElementContent::Table { rows, columns, cells } => {
                assert_eq!((rows, columns), (2, 2));
                assert!(cells[0][0].paragraphs[0].runs[0].style.bold);
                assert!(!cells[1][0].paragraphs[0].runs[0].style.bold);
                assert_eq!(cells[0][1].paragraphs[0].runs[0].text, "Score");
            }
            other => panic!("expected table, got {:?}", other),
        }
    }
}
