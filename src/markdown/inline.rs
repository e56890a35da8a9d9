//! Inline markdown to styled runs.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::models::text::{RunStyle, StyledRun};

static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\\([*_~`\\])",                   // 1: escaped marker
        r"|\*\*\*([^\n]+?)\*\*\*",         // 2: bold + italic
        r"|\*\*([^\n]+?)\*\*",             // 3: bold
        r"|__([^\n]+?)__",                 // 4: underline
        r"|~~([^\n]+?)~~",                 // 5: strikethrough
        r"|\*([^*\s](?:[^*\n]*?[^*\s])?)\*", // 6: italic
        r"|`([^`\n]+)`",                   // 7: inline code
    ))
    .expect("inline markdown pattern")
});

/// Converts inline markdown into runs styled on top of `base`.
///
/// Emphasis markers may nest (`**bold *and italic* text**`); code spans are taken
/// literally and rendered in `mono_family`. Adjacent runs with equal style are merged.
pub fn markdown_to_runs(text: &str, base: &RunStyle, mono_family: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    append_runs(text, base, mono_family, &mut runs);
    runs
}

/// Text with all inline markers removed.
pub fn strip_inline_markdown(text: &str) -> String {
    let base = RunStyle::plain("", 0.0);
    markdown_to_runs(text, &base, "")
        .into_iter()
        .map(|r| r.text)
        .collect()
}

fn append_runs(text: &str, base: &RunStyle, mono_family: &str, runs: &mut Vec<StyledRun>) {
    let mut last = 0;
    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(runs, &text[last..whole.start()], base);
        append_token(&caps, base, mono_family, runs);
        last = whole.end();
    }
    push_text(runs, &text[last..], base);
}

fn append_token(
    caps: &Captures<'_>,
    base: &RunStyle,
    mono_family: &str,
    runs: &mut Vec<StyledRun>,
) {
    if let Some(escaped) = caps.get(1) {
        push_text(runs, escaped.as_str(), base);
    } else if let Some(inner) = caps.get(2) {
        let style = RunStyle {
            bold: true,
            italic: true,
            ..base.clone()
        };
        append_runs(inner.as_str(), &style, mono_family, runs);
    } else if let Some(inner) = caps.get(3) {
        let style = RunStyle {
            bold: true,
            ..base.clone()
        };
        append_runs(inner.as_str(), &style, mono_family, runs);
    } else if let Some(inner) = caps.get(4) {
        let style = RunStyle {
            underline: true,
            ..base.clone()
        };
        append_runs(inner.as_str(), &style, mono_family, runs);
    } else if let Some(inner) = caps.get(5) {
        let style = RunStyle {
            strikethrough: true,
            ..base.clone()
        };
        append_runs(inner.as_str(), &style, mono_family, runs);
    } else if let Some(inner) = caps.get(6) {
        let style = RunStyle {
            italic: true,
            ..base.clone()
        };
        append_runs(inner.as_str(), &style, mono_family, runs);
    } else if let Some(code) = caps.get(7) {
        let style = RunStyle {
            font_family: mono_family.to_string(),
            font_file: None,
            ..base.clone()
        };
        push_text(runs, code.as_str(), &style);
    }
}

fn push_text(runs: &mut Vec<StyledRun>, text: &str, style: &RunStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.style == *style {
            last.text.push_str(text);
            return;
        }
    }
    runs.push(StyledRun::new(text, style.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RunStyle {
        RunStyle::plain("DejaVu Sans", 18.0)
    }

    #[test]
    fn test_plain_text_is_one_run() {
        let runs = markdown_to_runs("Plain text", &base(), "DejaVu Sans Mono");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Plain text");
        assert!(!runs[0].style.bold);
    }

    #[test]
    fn test_mixed_inline_styles() {
        let runs = markdown_to_runs(
            "Use **bold**, *italic*, __under__, ~~old~~ and `code`",
            &base(),
            "DejaVu Sans Mono",
        );
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Use ", "bold", ", ", "italic", ", ", "under", ", ", "old", " and ", "code"]
        );
        assert!(runs[1].style.bold);
        assert!(runs[3].style.italic);
        assert!(runs[5].style.underline);
        assert!(runs[7].style.strikethrough);
        assert_eq!(runs[9].style.font_family, "DejaVu Sans Mono");
    }

    #[test]
    fn test_nested_emphasis() {
        let runs = markdown_to_runs("**bold *both* end**", &base(), "mono");
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "bold ");
        assert!(runs[0].style.bold && !runs[0].style.italic);
        assert_eq!(runs[1].text, "both");
        assert!(runs[1].style.bold && runs[1].style.italic);
        assert_eq!(runs[2].text, " end");
        assert!(runs[2].style.bold && !runs[2].style.italic);

        let runs = markdown_to_runs("***loud***", &base(), "mono");
        assert_eq!(runs.len(), 1);
        assert!(runs[0].style.bold && runs[0].style.italic);
    }

    #[test]
    fn test_escaped_markers_stay_literal() {
        let runs = markdown_to_runs(r"5 \* 3 \*\*not bold\*\*", &base(), "mono");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "5 * 3 **not bold**");
    }

    #[test]
    fn test_strip_inline_markdown() {
        assert_eq!(strip_inline_markdown("**Q3** *results* `x`"), "Q3 results x");
        assert_eq!(strip_inline_markdown(""), "");
    }
}
