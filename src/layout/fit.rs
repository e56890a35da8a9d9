//! Best-fit font sizing with approximate text measurement.
//!
//! Glyph advances are approximated by an average character width, lines are
//! wrapped greedily on whitespace, and a size "fits" when the wrapped line
//! stack is no taller than the box. The search walks down from the ceiling in
//! fixed steps, so the result is deterministic and never below the floor.

use super::constants::*;

/// Largest font size (pt) not above `max_font_size` that keeps `text` inside a
/// `width_inches` x `height_inches` box, clamped to a 10pt floor.
///
/// `is_bullets` reserves room for bullet indentation and extra per-line spacing,
/// so it never returns more than the plain-text size for the same input.
pub fn calculate_best_fit_font_size(
    text: &str,
    width_inches: f64,
    height_inches: f64,
    max_font_size: f64,
    is_bullets: bool,
) -> f64 {
    best_fit_font_size_with_floor(
        text,
        width_inches,
        height_inches,
        max_font_size,
        MIN_FONT_SIZE_PT,
        is_bullets,
    )
}

/// [`calculate_best_fit_font_size`] with a caller-chosen floor. A ceiling below
/// the floor is returned unchanged.
///
/// Non-finite inputs yield the floor. The search starts at most
/// [`MAX_FIT_STEPS`] steps above the floor, so huge ceilings stay cheap.
pub fn best_fit_font_size_with_floor(
    text: &str,
    width_inches: f64,
    height_inches: f64,
    max_font_size: f64,
    min_font_size: f64,
    is_bullets: bool,
) -> f64 {
    let floor = if min_font_size.is_finite() {
        min_font_size
    } else {
        MIN_FONT_SIZE_PT
    };
    if ![width_inches, height_inches, max_font_size, min_font_size]
        .iter()
        .all(|v| v.is_finite())
    {
        return floor;
    }
    if text.trim().is_empty() || max_font_size <= floor {
        return max_font_size;
    }

    let top = max_font_size.min(floor + MAX_FIT_STEPS as f64 * FONT_SIZE_STEP_PT);
    let steps = ((top - floor) / FONT_SIZE_STEP_PT).ceil() as u32;
    (0..steps)
        .map(|i| top - f64::from(i) * FONT_SIZE_STEP_PT)
        .find(|&size| text_fits(text, width_inches, height_inches, size, is_bullets))
        .unwrap_or(floor)
}

/// Whether `text` at `font_size` fits the box.
pub fn text_fits(
    text: &str,
    width_inches: f64,
    height_inches: f64,
    font_size: f64,
    is_bullets: bool,
) -> bool {
    let usable_height = height_inches * PT_PER_INCH - 2.0 * BOX_INSET_Y_PT;
    if usable_height <= 0.0 {
        return false;
    }
    match wrapped_line_count(text, width_inches, font_size, is_bullets) {
        Some(lines) => lines as f64 * line_height_pt(font_size, is_bullets) <= usable_height,
        None => false,
    }
}

/// Height in inches `text` needs at `font_size` in a box `width_inches` wide,
/// insets included. Used to size stacked blocks before fitting.
pub fn estimate_text_height(
    text: &str,
    width_inches: f64,
    font_size: f64,
    is_bullets: bool,
) -> f64 {
    let lines = wrapped_line_count(text, width_inches, font_size, is_bullets)
        .unwrap_or_else(|| text.split('\n').count().max(1));
    (lines as f64 * line_height_pt(font_size, is_bullets) + 2.0 * BOX_INSET_Y_PT) / PT_PER_INCH
}

fn line_height_pt(font_size: f64, is_bullets: bool) -> f64 {
    if is_bullets {
        font_size * (LINE_HEIGHT_EM + BULLET_LINE_EXTRA_EM)
    } else {
        font_size * LINE_HEIGHT_EM
    }
}

/// Number of lines after greedy wrapping, or `None` when not even one character
/// fits on a line.
fn wrapped_line_count(
    text: &str,
    width_inches: f64,
    font_size: f64,
    is_bullets: bool,
) -> Option<usize> {
    let mut usable_width = width_inches * PT_PER_INCH - 2.0 * BOX_INSET_X_PT;
    if is_bullets {
        usable_width -= font_size * BULLET_INDENT_EM;
    }
    let chars_per_line = (usable_width / (font_size * AVG_CHAR_WIDTH_EM)).floor();
    if chars_per_line.is_nan() || chars_per_line < 1.0 {
        return None;
    }
    let chars_per_line = chars_per_line as usize;
    Some(
        text.split('\n')
            .map(|paragraph| paragraph_line_count(paragraph, chars_per_line))
            .sum(),
    )
}

fn paragraph_line_count(paragraph: &str, chars_per_line: usize) -> usize {
    let mut lines = 1;
    let mut current = 0;
    for word in paragraph.split_whitespace() {
        let len = word.chars().count();
        let needed = if current == 0 { len } else { current + 1 + len };
        if needed <= chars_per_line {
            current = needed;
            continue;
        }
        if current > 0 {
            lines += 1;
        }
        // words longer than a line are broken across lines
        lines += (len - 1) / chars_per_line;
        current = (len - 1) % chars_per_line + 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
                         tempor incididunt ut labore et dolore magna aliqua.";

    #[test]
    fn test_empty_text_returns_ceiling() {
        assert_eq!(calculate_best_fit_font_size("", 4.0, 1.0, 20.0, false), 20.0);
        assert_eq!(calculate_best_fit_font_size("   ", 4.0, 1.0, 20.0, true), 20.0);
    }

    #[test]
    fn test_short_text_in_large_box_keeps_ceiling() {
        for text in ["Hello", "Quarterly results", "Q3"] {
            assert_eq!(calculate_best_fit_font_size(text, 8.0, 2.0, 24.0, false), 24.0);
            assert_eq!(calculate_best_fit_font_size(text, 12.0, 6.0, 24.0, true), 24.0);
        }
    }

    #[test]
    fn test_longer_text_never_gets_bigger() {
        let mut previous = f64::MAX;
        for repeat in [1, 2, 4, 8, 16, 32] {
            let text = vec![LOREM; repeat].join(" ");
            let size = calculate_best_fit_font_size(&text, 6.0, 2.0, 32.0, false);
            assert!(size <= previous, "repeat {} grew to {}", repeat, size);
            previous = size;
        }
    }

    #[test]
    fn test_result_stays_between_floor_and_ceiling() {
        let huge = vec![LOREM; 500].join("\n");
        let size = calculate_best_fit_font_size(&huge, 2.0, 0.5, 28.0, false);
        assert_eq!(size, MIN_FONT_SIZE_PT);
        let size = calculate_best_fit_font_size(LOREM, 5.0, 1.0, 28.0, false);
        assert!((MIN_FONT_SIZE_PT..=28.0).contains(&size));
    }

    #[test]
    fn test_tiny_box_clamps_to_floor() {
        assert_eq!(
            calculate_best_fit_font_size("Some words here", 0.1, 0.1, 24.0, false),
            MIN_FONT_SIZE_PT
        );
    }

    #[test]
    fn test_bullets_never_exceed_plain_size() {
        let items = "First point about revenue\nSecond point about costs\nThird point \
                     about the outlook for next year\nFourth point";
        for (w, h) in [(4.0, 1.5), (6.0, 2.0), (10.0, 5.0), (3.0, 0.8)] {
            let plain = calculate_best_fit_font_size(items, w, h, 24.0, false);
            let bullets = calculate_best_fit_font_size(items, w, h, 24.0, true);
            assert!(bullets <= plain, "{}x{}: {} > {}", w, h, bullets, plain);
        }
    }

    #[test]
    fn test_is_deterministic() {
        let a = calculate_best_fit_font_size(LOREM, 4.0, 1.2, 22.0, true);
        let b = calculate_best_fit_font_size(LOREM, 4.0, 1.2, 22.0, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_inputs_return_floor() {
        assert_eq!(
            calculate_best_fit_font_size("hello", 4.0, 1.0, f64::INFINITY, false),
            MIN_FONT_SIZE_PT
        );
        assert_eq!(
            calculate_best_fit_font_size("hello", f64::NAN, 1.0, 24.0, false),
            MIN_FONT_SIZE_PT
        );
        assert_eq!(
            calculate_best_fit_font_size("hello", 4.0, f64::INFINITY, 24.0, true),
            MIN_FONT_SIZE_PT
        );
        assert_eq!(
            best_fit_font_size_with_floor("hello", 4.0, 1.0, 24.0, f64::NAN, false),
            MIN_FONT_SIZE_PT
        );
    }

    #[test]
    fn test_huge_ceiling_terminates_within_bounds() {
        for ceiling in [1e17, 1e300, 5000.0] {
            let size = calculate_best_fit_font_size("hello", 4.0, 1.0, ceiling, false);
            assert!((MIN_FONT_SIZE_PT..=ceiling).contains(&size), "{} -> {}", ceiling, size);
        }
        // a box big enough for the capped start size keeps it
        let top = MIN_FONT_SIZE_PT + MAX_FIT_STEPS as f64 * FONT_SIZE_STEP_PT;
        assert_eq!(calculate_best_fit_font_size("a", 1000.0, 1000.0, 1e17, false), top);
    }

    #[test]
    fn test_unmeasurable_width_does_not_panic() {
        assert!(!text_fits("hello world", f64::NAN, 1.0, 12.0, false));
        let height = estimate_text_height("one\ntwo", f64::NAN, 12.0, false);
        assert!(height > 0.0);
    }

    #[test]
    fn test_long_words_wrap_across_lines() {
        assert_eq!(paragraph_line_count("abcdefghij", 4), 3);
        assert_eq!(paragraph_line_count("ab cd ef", 5), 2);
        assert_eq!(paragraph_line_count("", 5), 1);
    }

    #[test]
    fn test_estimate_grows_with_lines() {
        let one = estimate_text_height("one line", 6.0, 18.0, false);
        let three = estimate_text_height("one\ntwo\nthree", 6.0, 18.0, false);
        assert!(three > one);
    }
}
