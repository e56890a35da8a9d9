//! The four layout operations over a [`Presentation`], plus JSON-string
//! variants used by the wasm bindings.

use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::errors::{LayoutError, Result};
use crate::fonts::FontResolver;
use crate::layout::audit::{audit_slide, SlideElementsReport};
use crate::layout::compiler::compile_document;
use crate::layout::mutate::{self, FindReplaceResult, Replacement, RepositionResult};
use crate::layout::placement::{
    place_batch, AddedElement, ElementRequest, PlacementDecision, SkippedElement,
};
use crate::models::common::PositionUpdate;
use crate::models::presentation::Presentation;

/// Configuration plus the font resolver shared by every call.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    fonts: FontResolver,
}

impl LayoutEngine {
    /// Builds the engine and its font resolver. Natively the resolver can fetch
    /// substitute fonts over HTTP; in wasm it resolves offline.
    pub fn new(config: LayoutConfig) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let fonts = FontResolver::with_http(config.fonts.clone());
        #[cfg(target_arch = "wasm32")]
        let fonts = FontResolver::offline(config.fonts.clone());
        Self { config, fonts }
    }

    /// Uses an existing resolver, e.g. one with a custom fetcher.
    pub fn with_resolver(config: LayoutConfig, fonts: FontResolver) -> Self {
        Self { config, fonts }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontResolver {
        &self.fonts
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddElementsRequest {
    pub slide_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_layout: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddMode {
    Granular,
    AutoLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddElementsResponse {
    pub mode: AddMode,
    pub total_requested: usize,
    pub successfully_added: usize,
    pub skipped: usize,
    pub elements_added: Vec<AddedElement>,
    pub elements_skipped: Vec<SkippedElement>,
    /// Same as `successfully_added`.
    pub elements_created: usize,
    /// Added elements per content kind label (`heading_1`, `bulleted_list`, ...).
    pub element_types: IndexMap<String, usize>,
}

/// Adds elements to a slide, either from explicit fragments (granular) or from
/// one markdown document (auto-layout).
pub fn add_elements(
    engine: &LayoutEngine,
    presentation: &mut Presentation,
    request: &AddElementsRequest,
) -> Result<AddElementsResponse> {
    engine.config.validate()?;
    let mode = request_mode(request)?;
    let slide = presentation.slide_mut(request.slide_index)?;

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    let total_requested;
    match mode {
        AddMode::AutoLayout => {
            let document = request.markdown.as_deref().unwrap_or_default();
            let compiled = compile_document(document, slide, &engine.config, &engine.fonts);
            total_requested = compiled.elements.len();
            for element in compiled.elements {
                added.push(AddedElement {
                    index: element.source_order,
                    element_id: element.id.clone(),
                    element_type: element.element_type,
                    content_kind: element.content_kind,
                    requested_position: None,
                    final_position: element.bounding_box,
                    position_adjusted: false,
                    adjustment_reason: None,
                });
                slide.elements.push(element);
            }
        }
        AddMode::Granular => {
            let requests = request.elements.as_deref().unwrap_or_default();
            total_requested = requests.len();
            for decision in place_batch(requests, slide, &engine.config, &engine.fonts)? {
                match decision {
                    PlacementDecision::Placed { element, report } => {
                        slide.elements.push(*element);
                        added.push(report);
                    }
                    PlacementDecision::Skipped(report) => skipped.push(report),
                }
            }
        }
    }

    let mut element_types = IndexMap::new();
    for report in &added {
        *element_types.entry(report.content_kind.label()).or_insert(0) += 1;
    }
    info!(
        "add_elements ({:?}) on slide {}: {} added, {} skipped",
        mode,
        request.slide_index,
        added.len(),
        skipped.len()
    );
    Ok(AddElementsResponse {
        mode,
        total_requested,
        successfully_added: added.len(),
        skipped: skipped.len(),
        elements_created: added.len(),
        elements_added: added,
        elements_skipped: skipped,
        element_types,
    })
}

fn request_mode(request: &AddElementsRequest) -> Result<AddMode> {
    match (&request.elements, &request.markdown) {
        (Some(_), None) => Ok(AddMode::Granular),
        (None, Some(_)) if request.auto_layout == Some(false) => Err(LayoutError::InvalidRequest(
            "markdown requires autoLayout=true".to_string(),
        )),
        (None, Some(_)) => Ok(AddMode::AutoLayout),
        (Some(_), Some(_)) => Err(LayoutError::InvalidRequest(
            "supply either elements or markdown, not both".to_string(),
        )),
        (None, None) => Err(LayoutError::InvalidRequest(
            "supply elements or markdown".to_string(),
        )),
    }
}

/// Audit report for one slide.
pub fn get_slide_elements(
    presentation: &Presentation,
    slide_index: usize,
    include_content: bool,
) -> Result<SlideElementsReport> {
    let slide = presentation.slide(slide_index)?;
    Ok(audit_slide(slide, include_content))
}

/// Moves and/or resizes one element.
pub fn reposition_element(
    presentation: &mut Presentation,
    slide_index: usize,
    element_index: usize,
    position: &PositionUpdate,
) -> Result<RepositionResult> {
    let slide = presentation.slide_mut(slide_index)?;
    mutate::reposition_element(slide, element_index, position)
}

/// Find-and-replace across the whole presentation.
pub fn find_and_replace(
    engine: &LayoutEngine,
    presentation: &mut Presentation,
    replacements: &[Replacement],
) -> Result<FindReplaceResult> {
    mutate::find_and_replace(presentation, replacements, &engine.fonts)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSlideElementsRequest {
    pub slide_index: usize,
    #[serde(default)]
    pub include_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositionRequest {
    pub slide_index: usize,
    pub element_index: usize,
    pub position: PositionUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindReplaceRequest {
    pub replacements: Vec<Replacement>,
}

/// The (possibly updated) presentation together with an operation result.
#[derive(Debug, Serialize)]
struct JsonOutcome<'a, T> {
    presentation: &'a Presentation,
    result: T,
}

fn run_json<Req, Res, F>(presentation_json: &str, request_json: &str, op: F) -> Result<String>
where
    Req: for<'de> Deserialize<'de>,
    Res: Serialize,
    F: FnOnce(&mut Presentation, Req) -> Result<Res>,
{
    let mut presentation: Presentation = serde_json::from_str(presentation_json)?;
    let request: Req = serde_json::from_str(request_json)?;
    let result = op(&mut presentation, request)?;
    Ok(serde_json::to_string(&JsonOutcome {
        presentation: &presentation,
        result,
    })?)
}

/// [`add_elements`] over JSON: returns `{"presentation": ..., "result": ...}`.
pub fn add_elements_json(
    engine: &LayoutEngine,
    presentation_json: &str,
    request_json: &str,
) -> Result<String> {
    run_json(presentation_json, request_json, |p, req: AddElementsRequest| {
        add_elements(engine, p, &req)
    })
}

pub fn get_slide_elements_json(presentation_json: &str, request_json: &str) -> Result<String> {
    run_json(presentation_json, request_json, |p, req: GetSlideElementsRequest| {
        get_slide_elements(p, req.slide_index, req.include_content)
    })
}

pub fn reposition_element_json(presentation_json: &str, request_json: &str) -> Result<String> {
    run_json(presentation_json, request_json, |p, req: RepositionRequest| {
        reposition_element(p, req.slide_index, req.element_index, &req.position)
    })
}

pub fn find_and_replace_json(
    engine: &LayoutEngine,
    presentation_json: &str,
    request_json: &str,
) -> Result<String> {
    run_json(presentation_json, request_json, |p, req: FindReplaceRequest| {
        find_and_replace(engine, p, &req.replacements)
    })
}
