//! Changes to existing elements: geometry-only repositioning and text
//! find-and-replace with markdown styling of the replacement.

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::constants::MIN_FONT_SIZE_PT;
use crate::errors::{LayoutError, Result};
use crate::fonts::tables::MONO_FAMILY;
use crate::fonts::FontResolver;
use crate::markdown::inline::markdown_to_runs;
use crate::models::common::{BoundingBox, PositionUpdate, GEOMETRY_EPSILON};
use crate::models::presentation::{Presentation, Slide};
use crate::models::text::{RunStyle, StyledParagraph, StyledRun};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositionResult {
    /// False when the element already had the requested geometry.
    pub modified: bool,
    pub element_id: String,
    pub previous_position: BoundingBox,
    pub new_position: BoundingBox,
    /// One entry per changed field, e.g. `top: 1.00in -> 2.50in (+1.50in)`.
    pub changes_made: Vec<String>,
}

/// Moves and/or resizes one element. Only the bounding box changes.
pub fn reposition_element(
    slide: &mut Slide,
    element_index: usize,
    update: &PositionUpdate,
) -> Result<RepositionResult> {
    let element = slide.element_mut(element_index)?;
    let previous = element.bounding_box;
    let target = update.apply_to(&previous);
    target.validate()?;

    let changes_made: Vec<String> = [
        ("left", previous.left, target.left),
        ("top", previous.top, target.top),
        ("width", previous.width, target.width),
        ("height", previous.height, target.height),
    ]
    .into_iter()
    .filter(|(_, before, after)| (after - before).abs() > GEOMETRY_EPSILON)
    .map(|(field, before, after)| {
        format!(
            "{}: {:.2}in -> {:.2}in ({:+.2}in)",
            field,
            before,
            after,
            after - before
        )
    })
    .collect();

    let modified = !changes_made.is_empty();
    if modified {
        element.bounding_box = target;
        info!("Repositioned {}: {}", element.id, changes_made.join(", "));
    } else {
        debug!("[reposition_element] {} already at {}", element.id, previous.describe());
    }

    Ok(RepositionResult {
        modified,
        element_id: element.id.clone(),
        previous_position: previous,
        new_position: element.bounding_box,
        changes_made,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    pub find: String,
    pub replace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindReplaceResult {
    pub success: bool,
    pub total_replacements: usize,
    /// Occurrences replaced per `find` string, in request order.
    pub replacements: IndexMap<String, usize>,
}

/// Replaces literal occurrences of each `find` in every text-bearing element
/// of the presentation, pairs applied in order.
///
/// Markdown in `replace` becomes styling on top of the style of the run where
/// the match starts. Matches may span several runs; the runs they cover are
/// cut at the match boundaries. A `find` with no occurrences counts zero.
pub fn find_and_replace(
    presentation: &mut Presentation,
    replacements: &[Replacement],
    fonts: &FontResolver,
) -> Result<FindReplaceResult> {
    if let Some(index) = replacements.iter().position(|r| r.find.is_empty()) {
        return Err(LayoutError::InvalidRequest(format!(
            "replacement {} has an empty find string",
            index
        )));
    }

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for replacement in replacements {
        let mut count = 0;
        for slide in &mut presentation.slides {
            let text_elements = slide
                .elements
                .iter_mut()
                .filter(|e| e.element_type.is_text_bearing());
            for element in text_elements {
                for paragraph in element.styled_content.paragraphs_mut() {
                    count += replace_in_paragraph(paragraph, replacement, fonts);
                }
            }
        }
        debug!("[find_and_replace] '{}' replaced {} time(s)", replacement.find, count);
        *counts.entry(replacement.find.clone()).or_insert(0) += count;
    }

    let total_replacements: usize = counts.values().sum();
    info!(
        "Find and replace on {}: {} replacement(s)",
        presentation.presentation_id, total_replacements
    );
    Ok(FindReplaceResult {
        success: true,
        total_replacements,
        replacements: counts,
    })
}

fn replace_in_paragraph(
    paragraph: &mut StyledParagraph,
    replacement: &Replacement,
    fonts: &FontResolver,
) -> usize {
    let full = paragraph.plain_text();
    let matches: Vec<usize> = full
        .match_indices(replacement.find.as_str())
        .map(|(start, _)| start)
        .collect();
    if matches.is_empty() {
        return 0;
    }

    let spans = run_spans(&paragraph.runs);
    let mut rebuilt = Vec::with_capacity(paragraph.runs.len() + matches.len());
    let mut cursor = 0;
    for &start in &matches {
        copy_range(&paragraph.runs, &spans, cursor, start, &mut rebuilt);
        let base = style_at(&paragraph.runs, &spans, start, fonts);
        for mut run in markdown_to_runs(&replacement.replace, &base, MONO_FAMILY) {
            let choice = fonts.resolve_run_font(&run.style.font_family, run.style.bold);
            run.style.font_family = choice.family;
            run.style.font_file = choice.file;
            push_run(&mut rebuilt, run);
        }
        cursor = start + replacement.find.len();
    }
    copy_range(&paragraph.runs, &spans, cursor, full.len(), &mut rebuilt);
    paragraph.runs = rebuilt;
    matches.len()
}

/// Byte range of every run in the paragraph text.
fn run_spans(runs: &[StyledRun]) -> Vec<(usize, usize)> {
    let mut offset = 0;
    runs.iter()
        .map(|run| {
            let span = (offset, offset + run.text.len());
            offset = span.1;
            span
        })
        .collect()
}

/// Copies the parts of `runs` inside `[from, to)` with their styles.
fn copy_range(
    runs: &[StyledRun],
    spans: &[(usize, usize)],
    from: usize,
    to: usize,
    out: &mut Vec<StyledRun>,
) {
    for (run, &(start, end)) in runs.iter().zip(spans) {
        let lo = from.max(start);
        let hi = to.min(end);
        if lo < hi {
            push_run(out, StyledRun::new(&run.text[lo - start..hi - start], run.style.clone()));
        }
    }
}

fn style_at(
    runs: &[StyledRun],
    spans: &[(usize, usize)],
    offset: usize,
    fonts: &FontResolver,
) -> RunStyle {
    runs.iter()
        .zip(spans)
        .find(|(_, span)| span.0 <= offset && offset < span.1)
        .map(|(run, _)| run)
        .or_else(|| runs.last())
        .map(|run| run.style.clone())
        .unwrap_or_else(|| RunStyle::plain(&fonts.config().default_family, MIN_FONT_SIZE_PT))
}

fn push_run(runs: &mut Vec<StyledRun>, run: StyledRun) {
    if run.text.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.style == run.style {
            last.text.push_str(&run.text);
            return;
        }
    }
    runs.push(run);
}
