//! Placeholder tokens and their style annotations.
//!
//! A placeholder is a `[...]`, `{...}` or `{{...}}` token. Its content is split
//! on top-level commas: the first segment is the label, every further segment
//! is an annotation, either `key=value`, a style keyword (`Bold`) or a negated
//! keyword (`!Italic`):
//!
//! ```text
//! [Title, Fontsize=32pt, Bold, !Italic]  ->  {fontsize: "32pt", bold: "true", italic: "false"}
//! ```
//!
//! When any segment is not an annotation (`[$x,xxx]`, `[Smith, John]`) the commas
//! are taken as part of the label and the token carries no metadata.

use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::text::StyleOverrides;

/// Lower-cased annotation key to its verbatim value.
pub type AnnotationMap = IndexMap<String, String>;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[^}]+?\}\}|\{[^{}]+?\}|\[[^\]]+?\]").expect("placeholder pattern")
});
static ANNOTATION_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("annotation key pattern"));

const STYLE_KEYWORDS: &[&str] = &["bold", "italic", "underline", "strikethrough"];

/// A placeholder token found in text.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderToken {
    /// The raw token including delimiters, e.g. `[Title, Bold]`.
    pub raw: String,
    /// Byte range of the token in the scanned text.
    pub start: usize,
    pub end: usize,
    /// Parsed annotations (empty when the token has none).
    pub metadata: AnnotationMap,
}

impl PlaceholderToken {
    /// The token as it should be displayed: delimiters around the label only
    /// when it carries annotations, the raw token otherwise.
    pub fn display_text(&self) -> String {
        if self.metadata.is_empty() {
            return self.raw.clone();
        }
        let (open, inner, close) = split_delimiters(&self.raw);
        let label = split_top_level(inner)
            .into_iter()
            .next()
            .unwrap_or_default();
        format!("{}{}{}", open, label.trim(), close)
    }
}

/// Returns the placeholder tokens of `text` in order, with a metadata map per token.
///
/// Tokens without annotations are listed with an empty map; text without tokens
/// gives `([], {})`.
pub fn detect_placeholders_with_metadata(
    text: &str,
) -> (Vec<String>, IndexMap<String, AnnotationMap>) {
    let mut placeholders = Vec::new();
    let mut metadata = IndexMap::new();
    for token in scan_placeholders(text) {
        metadata.insert(token.raw.clone(), token.metadata.clone());
        placeholders.push(token.raw);
    }
    (placeholders, metadata)
}

/// Finds placeholder tokens with their positions. Markdown links and images
/// (`[text](url)`, `![alt](src)`) are not placeholders.
pub fn scan_placeholders(text: &str) -> Vec<PlaceholderToken> {
    TOKEN
        .find_iter(text)
        .filter(|m| !is_link_text(text, m.start(), m.end()))
        .map(|m| {
            let (_, inner, _) = split_delimiters(m.as_str());
            PlaceholderToken {
                raw: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                metadata: parse_annotations(inner),
            }
        })
        .collect()
}

/// Parses the annotation segments of a token's inner content.
pub fn parse_annotations(inner: &str) -> AnnotationMap {
    let segments = split_top_level(inner);
    let mut metadata = AnnotationMap::new();
    for segment in segments.iter().skip(1) {
        match parse_segment(segment.trim()) {
            Some((key, value)) => {
                // last one wins
                metadata.insert(key, value);
            }
            None => {
                debug!(
                    "[parse_annotations] '{}' is not an annotation, treating '{}' as a plain label",
                    segment, inner
                );
                return AnnotationMap::new();
            }
        }
    }
    metadata
}

/// Converts annotation metadata into style overrides. Unknown keys and
/// unparseable values are ignored.
pub fn annotation_overrides(metadata: &AnnotationMap) -> StyleOverrides {
    let mut overrides = StyleOverrides::default();
    for (key, value) in metadata {
        match key.as_str() {
            "fontsize" | "size" | "font-size" | "font_size" => {
                overrides.font_size_pt = parse_point_size(value);
            }
            "bold" => overrides.bold = parse_flag(value),
            "italic" => overrides.italic = parse_flag(value),
            "underline" => overrides.underline = parse_flag(value),
            "strikethrough" => overrides.strikethrough = parse_flag(value),
            "color" | "colour" => overrides.color = Some(value.trim().to_string()),
            "font" | "fontfamily" | "font-family" | "font_family" => {
                overrides.font_family = Some(value.trim().to_string());
            }
            other => debug!("[annotation_overrides] ignoring unknown key '{}'", other),
        }
    }
    overrides
}

fn parse_segment(segment: &str) -> Option<(String, String)> {
    if let Some((key, value)) = segment.split_once('=') {
        let key = key.trim();
        let value = value.trim();
        if ANNOTATION_KEY.is_match(key) && !value.is_empty() {
            return Some((key.to_lowercase(), value.to_string()));
        }
        return None;
    }
    let (negated, keyword) = match segment.strip_prefix('!') {
        Some(rest) => (true, rest.trim()),
        None => (false, segment),
    };
    let keyword = keyword.to_lowercase();
    if STYLE_KEYWORDS.contains(&keyword.as_str()) {
        let value = if negated { "false" } else { "true" };
        return Some((keyword, value.to_string()));
    }
    None
}

/// Splits on commas that are not nested inside brackets, braces, parentheses or quotes.
fn split_top_level(inner: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in inner.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') | (None, '[') | (None, '{') => depth += 1,
            (None, ')') | (None, ']') | (None, '}') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                segments.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    segments.push(current);
    segments
}

fn split_delimiters(raw: &str) -> (&str, &str, &str) {
    let width = if raw.starts_with("{{") && raw.ends_with("}}") && raw.len() >= 4 {
        2
    } else {
        1
    };
    (
        &raw[..width],
        &raw[width..raw.len() - width],
        &raw[raw.len() - width..],
    )
}

fn is_link_text(text: &str, start: usize, end: usize) -> bool {
    text[start..].starts_with('[') && text[end..].starts_with('(')
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// `"32pt"`, `"32 pt"` or `"32"` to 32.0.
fn parse_point_size(value: &str) -> Option<f64> {
    let lowered = value.trim().to_lowercase();
    let number = lowered.strip_suffix("pt").unwrap_or(&lowered).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|size| size.is_finite() && *size > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_placeholder_has_empty_metadata() {
        let (placeholders, metadata) = detect_placeholders_with_metadata("[Company Name]");
        assert_eq!(placeholders, vec!["[Company Name]"]);
        assert_eq!(metadata.len(), 1);
        assert!(metadata["[Company Name]"].is_empty());
    }

    #[test]
    fn test_full_annotation_set() {
        let token = "[Title, Fontsize=32pt, Bold, !Italic, Color=#003366]";
        let (placeholders, metadata) = detect_placeholders_with_metadata(token);
        assert_eq!(placeholders, vec![token]);
        let meta = &metadata[token];
        assert_eq!(meta["fontsize"], "32pt");
        assert_eq!(meta["bold"], "true");
        assert_eq!(meta["italic"], "false");
        assert_eq!(meta["color"], "#003366");
        assert_eq!(meta.len(), 4);
    }

    #[test]
    fn test_last_annotation_wins() {
        let (_, metadata) = detect_placeholders_with_metadata("[Title, Bold, !Bold]");
        assert_eq!(metadata["[Title, Bold, !Bold]"]["bold"], "false");
    }

    #[test]
    fn test_no_tokens() {
        let (placeholders, metadata) = detect_placeholders_with_metadata("Plain text");
        assert!(placeholders.is_empty());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_comma_inside_value_is_not_an_annotation() {
        let (placeholders, metadata) = detect_placeholders_with_metadata("[$x,xxx]");
        assert_eq!(placeholders, vec!["[$x,xxx]"]);
        assert!(metadata["[$x,xxx]"].is_empty());

        let (_, metadata) = detect_placeholders_with_metadata("[Smith, John]");
        assert!(metadata["[Smith, John]"].is_empty());
    }

    #[test]
    fn test_all_delimiter_forms_and_adjacent_tokens() {
        let (placeholders, _) =
            detect_placeholders_with_metadata("Dear {{first_name}}, {team} [A][B]");
        assert_eq!(placeholders, vec!["{{first_name}}", "{team}", "[A]", "[B]"]);
    }

    #[test]
    fn test_nested_brackets_still_report_a_token() {
        let (placeholders, _) = detect_placeholders_with_metadata("[[Name]]");
        assert!(!placeholders.is_empty());
    }

    #[test]
    fn test_keys_and_keywords_are_case_insensitive() {
        let (_, metadata) = detect_placeholders_with_metadata("{{Name, BOLD, fontSIZE=12PT}}");
        let meta = &metadata["{{Name, BOLD, fontSIZE=12PT}}"];
        assert_eq!(meta["bold"], "true");
        assert_eq!(meta["fontsize"], "12PT");
    }

    #[test]
    fn test_markdown_links_are_not_placeholders() {
        let (placeholders, _) =
            detect_placeholders_with_metadata("See [the docs](https://example.com) and [Owner]");
        assert_eq!(placeholders, vec!["[Owner]"]);
    }

    #[test]
    fn test_display_text_drops_annotations() {
        let tokens = scan_placeholders("Hi [Title, Bold] and {{x, Italic}} and [$x,xxx]");
        let shown: Vec<String> = tokens.iter().map(|t| t.display_text()).collect();
        assert_eq!(shown, vec!["[Title]", "{{x}}", "[$x,xxx]"]);
    }

    #[test]
    fn test_overrides_from_metadata() {
        let (_, metadata) = detect_placeholders_with_metadata(
            "[T, Fontsize=32pt, Bold, !Italic, Color=#003366, Font=Calibri]",
        );
        let overrides = annotation_overrides(metadata.values().next().unwrap());
        assert_eq!(overrides.font_size_pt, Some(32.0));
        assert_eq!(overrides.bold, Some(true));
        assert_eq!(overrides.italic, Some(false));
        assert_eq!(overrides.color.as_deref(), Some("#003366"));
        assert_eq!(overrides.font_family.as_deref(), Some("Calibri"));
        assert_eq!(overrides.underline, None);
    }
}
