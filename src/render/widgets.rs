//! Text-mode building blocks: boxes, bars, heatmaps and width-aware padding.
//!
//! Widths are measured in terminal columns, with CJK and full-width
//! characters counted as two and control characters as zero.

use unicode_width::UnicodeWidthChar;

/// Unicode block characters for different intensities.
const BLOCKS: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Convert a value in [0, max_val] to a block character.
pub fn intensity_to_block(value: f32, max_val: f32) -> char {
    if max_val == 0.0 {
        return BLOCKS[0];
    }
    let normalized = (value / max_val).clamp(0.0, 1.0);
    let idx = (normalized * (BLOCKS.len() - 1) as f32) as usize;
    BLOCKS[idx.min(BLOCKS.len() - 1)]
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Terminal column width of `s`.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Right-pad `s` with spaces to `width` columns.
pub fn pad(s: &str, width: usize) -> String {
    let w = display_width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

/// Center `s` within `width` columns.
pub fn center(s: &str, width: usize) -> String {
    let w = display_width(s);
    let total = width.saturating_sub(w);
    let left = total / 2;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(total - left))
}

/// Hard-wrap text to `width` columns, keeping explicit newlines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        let mut used = 0;
        for c in line.chars() {
            let w = char_width(c);
            if used + w > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += w;
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Create a box around text, wrapping long lines.
pub fn box_text(text: &str, title: &str, width: usize) -> String {
    let width = width.max(8);
    let content_width = width - 4;

    let mut result = Vec::new();

    // Top border with optional title
    if title.is_empty() {
        result.push(format!("┌{}┐", "─".repeat(width - 2)));
    } else {
        let title_part = format!(" {title} ");
        let remaining = (width - 2).saturating_sub(display_width(&title_part));
        let left = remaining.min(2);
        let right = remaining - left;
        result.push(format!(
            "┌{}{}{}┐",
            "─".repeat(left),
            title_part,
            "─".repeat(right)
        ));
    }

    for line in wrap(text, content_width) {
        result.push(format!("│ {} │", pad(&line, content_width)));
    }

    result.push(format!("└{}┘", "─".repeat(width - 2)));
    result.join("\n")
}

/// Generate probability distribution bars, highest first.
///
/// # Arguments
///
/// * `items` - (label, probability) pairs
/// * `max_width` - bar width for probability 1.0
pub fn probability_bars(items: &[(&str, f32)], max_width: usize) -> String {
    let mut items: Vec<(&str, f32)> = items.to_vec();
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let label_width = items
        .iter()
        .map(|(l, _)| display_width(l))
        .max()
        .unwrap_or(0);

    items
        .iter()
        .map(|(label, prob)| {
            let bar_len = (prob.clamp(0.0, 1.0) * max_width as f32).round() as usize;
            format!(
                "{} │{} {:>3.0}%",
                pad(label, label_width),
                pad(&"█".repeat(bar_len), max_width),
                prob * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Segmented progress bar: `total` segments, the first `filled` lit.
pub fn segment_bar(filled: usize, total: usize, segment_width: usize) -> String {
    (0..total)
        .map(|i| {
            let ch = if i < filled { "█" } else { "░" };
            ch.repeat(segment_width)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// ASCII heatmap of a square weight matrix with labelled rows and columns.
pub fn heatmap(weights: &[Vec<f32>], labels: &[&str], label_width: usize) -> String {
    let mut lines = Vec::new();

    let mut header = " ".repeat(label_width + 2);
    for label in labels {
        let short: String = label.chars().take(3).collect();
        header.push_str(&format!(" {} ", pad(&short, 3)));
    }
    lines.push(header.trim_end().to_string());

    for (i, row_label) in labels.iter().enumerate() {
        let mut row = format!("{}  ", pad(row_label, label_width));
        for j in 0..labels.len() {
            let val = weights.get(i).and_then(|r| r.get(j)).copied().unwrap_or(0.0);
            let block = intensity_to_block(val, 1.0);
            row.push_str(&format!(" {block}{block}{block}"));
        }
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_counts_cjk_double() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("模块"), 4);
        assert_eq!(display_width("Transformer 模块"), 16);
        assert_eq!(display_width("ＡＢ"), 4);
    }

    #[test]
    fn test_display_width_narrow_symbols_and_marks() {
        assert_eq!(display_width("● ● ●"), 5);
        assert_eq!(display_width("“fox”"), 5);
        assert_eq!(display_width("e\u{301}"), 1);
    }

    #[test]
    fn test_wrap_respects_width_and_newlines() {
        let lines = wrap("abcdef\ngh", 4);
        assert_eq!(lines, vec!["abcd", "ef", "gh"]);

        let cjk = wrap("一二三", 4);
        assert_eq!(cjk, vec!["一二", "三"]);
    }

    #[test]
    fn test_box_text_lines_have_equal_width() {
        let boxed = box_text("hello 世界, a longer line that wraps", "Title", 20);
        let widths: Vec<usize> = boxed.lines().map(display_width).collect();
        assert!(widths.iter().all(|w| *w == 20), "{widths:?}");
    }

    #[test]
    fn test_probability_bars_sorted() {
        let bars = probability_bars(&[("b", 0.2), ("a", 0.8)], 10);
        let lines: Vec<&str> = bars.lines().collect();
        assert!(lines[0].starts_with('a'));
        assert!(lines[0].contains("80%"));
        assert!(lines[1].starts_with('b'));
    }

    #[test]
    fn test_segment_bar() {
        assert_eq!(segment_bar(2, 3, 2), "██ ██ ░░");
    }

    #[test]
    fn test_intensity_to_block() {
        assert_eq!(intensity_to_block(0.0, 1.0), ' ');
        assert_eq!(intensity_to_block(1.0, 1.0), '█');
        assert_eq!(intensity_to_block(5.0, 0.0), ' ');
    }
}
