//! Structural sniffing of markdown lines and fragments.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::elements::ContentKind;

static INLINE_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\*\*[^\n]+?\*\*",      // bold
        r"__[^\n]+?__",          // underline
        r"~~[^\n]+?~~",          // strikethrough
        r"`[^`\n]+`",            // inline code
        r"\*[^*\s](?:[^*\n]*?)\*", // italic
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("inline marker pattern"))
    .collect()
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{0,3}(#{1,6})(?:\s+(.*?))?\s*#*\s*$").expect("heading pattern")
});
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+•]\s+(.*)$").expect("bullet pattern"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d{1,9})[.)]\s+(.*)$").expect("numbered pattern"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}>\s?(.*)$").expect("quote pattern"));
static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-{3,}:?\s*(?:\|\s*:?-{3,}:?\s*)*\|?\s*$").expect("separator pattern")
});
static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{0,3}(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").expect("rule pattern")
});
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*!\[([^\]]*)\]\(([^)\s]+)\)\s*$").expect("image pattern"));

/// True when `text` carries inline markdown styling or an embedded line break.
pub fn has_markdown_formatting(text: &str) -> bool {
    if text.contains('\n') {
        return true;
    }
    INLINE_MARKERS.iter().any(|re| re.is_match(text))
}

/// `(level, heading text)` for an ATX heading line.
pub fn heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2).map_or("", |m| m.as_str());
    Some((level, text))
}

/// `(nesting level, item text)` for a bullet line.
pub fn bullet_item(line: &str) -> Option<(u8, &str)> {
    if is_horizontal_rule(line) {
        return None;
    }
    let caps = BULLET.captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    Some((indent_level(indent), caps.get(2).map_or("", |m| m.as_str())))
}

/// `(number, nesting level, item text)` for an ordered list line.
pub fn numbered_item(line: &str) -> Option<(u32, u8, &str)> {
    let caps = NUMBERED.captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let number = caps.get(2)?.as_str().parse::<u32>().ok()?;
    Some((number, indent_level(indent), caps.get(3).map_or("", |m| m.as_str())))
}

/// Quoted text of a `>` line.
pub fn quote_line(line: &str) -> Option<&str> {
    QUOTE.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

pub fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// A `|---|:---:|` style separator row. Requires a pipe so a bare `---` stays a rule.
pub fn is_table_separator(line: &str) -> bool {
    line.contains('|') && TABLE_SEPARATOR.is_match(line)
}

pub fn is_horizontal_rule(line: &str) -> bool {
    HORIZONTAL_RULE.is_match(line)
}

/// Opening or closing code fence.
pub fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// `(alt text, source)` for a line holding only an image reference.
pub fn image_ref(line: &str) -> Option<(&str, &str)> {
    let caps = IMAGE.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Two spaces (or one tab) per nesting level, capped at 8 levels.
fn indent_level(indent: &str) -> u8 {
    let width: usize = indent.chars().map(|c| if c == '\t' { 4 } else { 1 }).sum();
    (width / 2).min(8) as u8
}

/// Classifies a content fragment by its strongest structural signal.
///
/// Table syntax anywhere wins, then the first non-blank line decides: fence,
/// heading, standalone image, bullet, numbered item, quote, else paragraph.
pub fn classify_fragment(content: &str) -> ContentKind {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some(first) = lines.first() else {
        return ContentKind::Paragraph;
    };
    if lines.iter().any(|l| is_table_separator(l)) || lines.iter().all(|l| is_table_row(l)) {
        return ContentKind::Table;
    }
    if is_fence(first) {
        return ContentKind::CodeBlock;
    }
    if let Some((level, _)) = heading(first) {
        return ContentKind::Heading { level };
    }
    if lines.len() == 1 && image_ref(first).is_some() {
        return ContentKind::Image;
    }
    if bullet_item(first).is_some() {
        return ContentKind::BulletList;
    }
    if numbered_item(first).is_some() {
        return ContentKind::NumberedList;
    }
    if quote_line(first).is_some() {
        return ContentKind::Blockquote;
    }
    ContentKind::Paragraph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_inline_formatting() {
        assert!(has_markdown_formatting("**Bold text**"));
        assert!(has_markdown_formatting("some *italic* word"));
        assert!(has_markdown_formatting("run `cargo doc`"));
        assert!(has_markdown_formatting("~~gone~~"));
        assert!(has_markdown_formatting("__underlined__"));
        assert!(has_markdown_formatting("line one\nline two"));
    }

    #[test]
    fn test_plain_text_has_no_formatting() {
        assert!(!has_markdown_formatting("Plain text"));
        assert!(!has_markdown_formatting(""));
        assert!(!has_markdown_formatting("2 * 3 * 4 = 24"));
        assert!(!has_markdown_formatting("snake_case_name"));
    }

    #[test]
    fn test_heading_beats_inline_bold() {
        assert_eq!(
            classify_fragment("## **Revenue** overview"),
            ContentKind::Heading { level: 2 }
        );
        assert_eq!(heading("### Title ###"), Some((3, "Title")));
        assert_eq!(heading("#hashtag"), None);
    }

    #[test]
    fn test_classifies_lists_quotes_and_tables() {
        assert_eq!(classify_fragment("- a\n- b"), ContentKind::BulletList);
        assert_eq!(classify_fragment("• item"), ContentKind::BulletList);
        assert_eq!(classify_fragment("1. one\n2) two"), ContentKind::NumberedList);
        assert_eq!(classify_fragment("> wise words"), ContentKind::Blockquote);
        assert_eq!(
            classify_fragment("| a | b |\n|---|---|\n| 1 | 2 |"),
            ContentKind::Table
        );
        assert_eq!(classify_fragment("```\nfn main() {}\n```"), ContentKind::CodeBlock);
        assert_eq!(classify_fragment("![chart](q3.png)"), ContentKind::Image);
        assert_eq!(classify_fragment("Just words."), ContentKind::Paragraph);
        assert_eq!(classify_fragment(""), ContentKind::Paragraph);
    }

    #[test]
    fn test_bold_line_is_not_a_bullet() {
        assert_eq!(bullet_item("**Bold** start"), None);
        assert_eq!(bullet_item("---"), None);
        assert_eq!(bullet_item("  - nested"), Some((1, "nested")));
        assert_eq!(numbered_item("12. twelfth"), Some((12, 0, "twelfth")));
    }

    #[test]
    fn test_rules_and_separators() {
        assert!(is_horizontal_rule("---"));
        assert!(is_horizontal_rule("* * *"));
        assert!(!is_table_separator("---"));
        assert!(is_table_separator("|:---|---:|"));
        assert!(is_table_row("| a | b |"));
        assert!(!is_table_row("a | b"));
    }
}
