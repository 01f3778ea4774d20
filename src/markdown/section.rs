//! Heading-delimited section extraction.
//!
//! A section is the text after a heading of a given rank, up to the next
//! heading of the same or higher rank (fewer `#`), or the end of the
//! document. Headings are matched against an ordered list of candidate
//! names; the first candidate that matches any heading wins, and for that
//! candidate the first matching heading in the document wins.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::heading::scan_lines;
use super::truncate::{line_count, truncate_lines};

/// `2.`, `2.1`, `3)`, `4:` or a bare number followed by whitespace.
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d+)*(?:[.):]\s*|\s+)").expect("numeric prefix pattern is valid")
});

/// The result of one extraction.
///
/// An empty `text` with `line_count == 0` means "not found", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    /// Logical name of the section (e.g. `overview`).
    pub name: String,
    /// Name of the document the section came from.
    pub source: String,
    /// Text of the heading that matched, when one did.
    pub heading: Option<String>,
    /// Extracted (and possibly truncated) text.
    pub text: String,
    /// Number of lines in `text`.
    pub line_count: usize,
    /// Whether `text` was cut and carries a marker line.
    pub truncated: bool,
}

impl ExtractedSection {
    /// An empty result for a section that was not found.
    #[must_use]
    pub fn not_found(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            heading: None,
            text: String::new(),
            line_count: 0,
            truncated: false,
        }
    }

    /// Returns `true` if a heading matched.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.heading.is_some()
    }

    /// Returns `true` if there is no text to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An untruncated section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    /// Text of the matching heading.
    pub heading: String,
    /// Body with leading and trailing blank lines removed.
    pub body: String,
}

/// Parameters for one extraction.
#[derive(Debug, Clone, Copy)]
pub struct SectionQuery<'a> {
    /// Logical name recorded on the result.
    pub name: &'a str,
    /// Heading names to look for, in priority order.
    pub candidates: &'a [String],
    /// Heading rank to match (2 for `##`).
    pub rank: usize,
    /// Maximum number of body lines to keep.
    pub max_lines: usize,
}

/// Finds the first section whose heading matches a candidate.
///
/// Candidates are tried in order; the first one matching any heading of
/// `rank` wins, and that candidate's first matching heading is used.
#[must_use]
pub fn find_section<S: AsRef<str>>(
    document: &str,
    candidates: &[S],
    rank: usize,
) -> Option<RawSection> {
    let lines = scan_lines(document);
    let start = candidates.iter().find_map(|candidate| {
        lines.iter().position(|line| {
            line.heading
                .is_some_and(|h| h.rank == rank && heading_matches(h.text, candidate.as_ref()))
        })
    })?;

    let heading = lines[start].heading.map(|h| h.text.to_string()).unwrap_or_default();
    let body: Vec<&str> = lines[start + 1..]
        .iter()
        .take_while(|line| !line.heading.is_some_and(|h| h.rank <= rank))
        .map(|line| line.text)
        .collect();

    Some(RawSection { heading, body: trim_blank_lines(&body) })
}

/// Extracts and truncates a section described by `query`.
#[must_use]
pub fn extract(document: &str, source: &str, query: &SectionQuery<'_>) -> ExtractedSection {
    let Some(raw) = find_section(document, query.candidates, query.rank) else {
        debug!(source, section = query.name, "section not found");
        return ExtractedSection::not_found(query.name, source);
    };

    let cut = truncate_lines(&raw.body, query.max_lines);
    debug!(
        source,
        section = query.name,
        heading = %raw.heading,
        lines = line_count(&raw.body),
        truncated = cut.truncated,
        "section extracted"
    );
    ExtractedSection {
        name: query.name.to_string(),
        source: source.to_string(),
        heading: Some(raw.heading),
        text: cut.text,
        line_count: cut.line_count,
        truncated: cut.truncated,
    }
}

/// Extracts a rank-2 section, naming the result after the first candidate.
#[must_use]
pub fn extract_section(
    document: &str,
    source: &str,
    candidates: &[&str],
    max_lines: usize,
) -> ExtractedSection {
    let candidates: Vec<String> = candidates.iter().map(ToString::to_string).collect();
    let name = candidates.first().cloned().unwrap_or_default();
    let query = SectionQuery { name: &name, candidates: &candidates, rank: 2, max_lines };
    extract(document, source, &query)
}

/// Compares heading text to a candidate name.
///
/// Strips a numeric prefix and leading emphasis, then requires a
/// case-insensitive prefix match that ends on a word boundary.
fn heading_matches(text: &str, candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }

    let label = NUMERIC_PREFIX.find(text).map_or(text, |m| &text[m.end()..]);
    let label = label.trim_start_matches(['*', '_', ' ']);

    let mut rest = label.chars();
    for want in candidate.chars() {
        match rest.next() {
            Some(have) if have.to_lowercase().eq(want.to_lowercase()) => {}
            _ => return false,
        }
    }
    !rest.next().is_some_and(char::is_alphanumeric)
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n").trim_end().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
# Plan

## 1. Architecture Overview

Modular design.

### Target State
Three layers.

## 2. Technical Approach
Use Rust.

## Architecture Notes
Second.
";

    #[test]
    fn extracts_numbered_heading() {
        let section = extract_section(PLAN, "plan.md", &["Architecture Overview"], 50);
        assert_eq!(section.heading.as_deref(), Some("1. Architecture Overview"));
        assert_eq!(section.text, "Modular design.\n\n### Target State\nThree layers.");
        assert_eq!(section.line_count, 4);
        assert!(!section.truncated);
        assert_eq!(section.source, "plan.md");
    }

    #[test]
    fn match_is_case_insensitive_prefix() {
        let section = extract_section(PLAN, "plan.md", &["technical"], 50);
        assert_eq!(section.text, "Use Rust.");
    }

    #[test]
    fn prefix_must_end_on_word_boundary() {
        let doc = "## Architectures\nplural\n## Architecture:\nsingular";
        let section = extract_section(doc, "plan.md", &["Architecture"], 50);
        assert_eq!(section.text, "singular");
    }

    #[test]
    fn first_candidate_wins_over_document_order() {
        let section =
            extract_section(PLAN, "plan.md", &["Technical Approach", "Architecture"], 50);
        assert_eq!(section.text, "Use Rust.");
    }

    #[test]
    fn first_occurrence_wins_for_one_candidate() {
        let section = extract_section(PLAN, "plan.md", &["Architecture"], 50);
        assert!(section.text.starts_with("Modular design."));
    }

    #[test]
    fn stops_at_higher_rank_heading() {
        let doc = "## Overview\nbody\n# Top\nafter";
        assert_eq!(extract_section(doc, "spec.md", &["Overview"], 10).text, "body");
    }

    #[test]
    fn lower_rank_target_stops_at_rank_two() {
        let raw = find_section(PLAN, &["Target State"], 3).unwrap();
        assert_eq!(raw.body, "Three layers.");
    }

    #[test]
    fn missing_section_is_empty_not_error() {
        let section = extract_section(PLAN, "plan.md", &["Data Model"], 10);
        assert!(!section.is_found());
        assert!(section.is_empty());
        assert_eq!(section.line_count, 0);
        assert_eq!(section.source, "plan.md");
        assert_eq!(section.name, "Data Model");
    }

    #[test]
    fn truncates_long_sections() {
        let body = (1..=10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let doc = format!("## Models\n{body}\n");
        let section = extract_section(&doc, "data-model.md", &["Models"], 3);
        assert!(section.truncated);
        assert_eq!(section.line_count, 4);
        assert!(section.text.ends_with("*...(7 more lines)*"));
    }

    #[test]
    fn heading_in_code_fence_does_not_end_section() {
        let doc = "## Overview\n```\n## not a heading\n```\nend\n## Next\n";
        let section = extract_section(doc, "spec.md", &["Overview"], 10);
        assert_eq!(section.text, "```\n## not a heading\n```\nend");
    }

    #[test]
    fn tolerates_garbage_input() {
        for doc in ["", "##", "## \u{fffd}\u{fffd}\0\0", "#####\n\n##"] {
            let section = extract_section(doc, "x.md", &["Overview"], 5);
            assert!(section.is_empty());
        }
    }

    #[test]
    fn empty_heading_body_is_found_but_empty() {
        let section = extract_section("## Overview\n## Next\n", "spec.md", &["Overview"], 5);
        assert!(section.is_found());
        assert!(section.is_empty());
    }

    #[test]
    fn emphasis_around_heading_text_is_ignored() {
        let section = extract_section("## **Overview** ✨\nhello", "spec.md", &["overview"], 5);
        assert_eq!(section.text, "hello");
    }
}
