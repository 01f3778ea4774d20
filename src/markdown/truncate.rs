//! Line-based truncation with a deterministic marker line.

/// Result of truncating a block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    /// The (possibly shortened) text.
    pub text: String,
    /// Number of lines in `text`.
    pub line_count: usize,
    /// Whether lines were removed.
    pub truncated: bool,
}

/// Counts `\n`-separated lines; the empty string has zero lines.
#[must_use]
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}

/// The marker appended after `omitted` lines were cut. The wording is
/// fixed, even for a single line, so downstream tooling can match it.
#[must_use]
pub fn truncation_marker(omitted: usize) -> String {
    format!("*...({omitted} more lines)*")
}

/// Keeps at most `max_lines` lines of `text`.
///
/// When lines are dropped, the kept lines are right-trimmed and a single
/// marker line naming the number of omitted lines is appended, so the
/// result never exceeds `max_lines + 1` lines.
#[must_use]
pub fn truncate_lines(text: &str, max_lines: usize) -> Truncated {
    let total = line_count(text);
    if total <= max_lines {
        return Truncated { text: text.to_string(), line_count: total, truncated: false };
    }

    let kept: Vec<&str> = text.split('\n').take(max_lines).collect();
    let kept = kept.join("\n");
    let kept = kept.trim_end();
    let marker = truncation_marker(total - max_lines);
    let text = if kept.is_empty() { marker } else { format!("{kept}\n{marker}") };
    let line_count = line_count(&text);
    Truncated { text, line_count, truncated: true }
}
