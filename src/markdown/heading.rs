//! ATX heading recognition and fence-aware line scanning.

/// A heading line: its rank (number of `#` markers) and its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    /// Heading rank, 1 through 6.
    pub rank: usize,
    /// Heading text with markers and closing hashes removed.
    pub text: &'a str,
}

/// One physical line of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// The raw line, without its line terminator.
    pub text: &'a str,
    /// The heading on this line, if it is one and not inside a code fence.
    pub heading: Option<Heading<'a>>,
    /// Whether the line opens, closes, or sits inside a code fence.
    pub fenced: bool,
}

/// Parses a single line as an ATX heading.
///
/// Accepts up to three spaces of indentation, one to six `#` markers, and
/// requires whitespace (or end of line) after the markers.
#[must_use]
pub fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let rank = trimmed.bytes().take_while(|&b| b == b'#').count();
    if rank == 0 || rank > 6 {
        return None;
    }
    let rest = &trimmed[rank..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some(Heading { rank, text: strip_closing_sequence(rest.trim()) })
}

/// Removes an optional closing `###` sequence (`## Title ##`).
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() || without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

/// Scans a document line by line, tagging headings outside of code fences.
#[must_use]
pub fn scan_lines(document: &str) -> Vec<ScannedLine<'_>> {
    let mut fence: Option<char> = None;
    document
        .lines()
        .enumerate()
        .map(|(idx, text)| {
            let number = idx + 1;
            if let Some(marker) = fence_marker(text) {
                match fence {
                    None => fence = Some(marker),
                    Some(open) if open == marker => fence = None,
                    Some(_) => {}
                }
                return ScannedLine { number, text, heading: None, fenced: true };
            }
            let fenced = fence.is_some();
            let heading = if fenced { None } else { parse_heading(text) };
            ScannedLine { number, text, heading, fenced }
        })
        .collect()
}

fn fence_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}
