//! Per-line recognizers for the metadata inside a task block.
//!
//! Each line of a block is classified on its own, so a malformed line only
//! affects the field it would have set.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// `- **Label:** value`, `- **Label**: value`, or the same without a bullet.
static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+]\s+)?\*\*([^*:]+):?\*\*:?\s*(.*)$").expect("field pattern is valid")
});

/// `- [ ] text` or `- [x] text`, at any indentation.
static CHECKBOX_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-*+]\s+\[([ xX])\]\s*(.*)$").expect("checkbox pattern is valid")
});

/// Metadata labels recognized inside a task block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    /// `Priority` (required).
    Priority,
    /// `Estimate` (required).
    Estimate,
    /// `Dependencies` / `Depends On`.
    Dependencies,
    /// `File` / `Files`.
    File,
    /// `FR`: functional requirement references.
    Fr,
    /// `NFR`: non-functional requirement references.
    Nfr,
    /// `Acceptance Criteria`: introduces the checkbox list.
    AcceptanceCriteria,
}

impl FieldLabel {
    /// Maps label text to a known field, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "priority" => Some(Self::Priority),
            "estimate" => Some(Self::Estimate),
            "dependencies" | "depends on" | "dependency" => Some(Self::Dependencies),
            "file" | "files" => Some(Self::File),
            "fr" | "frs" => Some(Self::Fr),
            "nfr" | "nfrs" => Some(Self::Nfr),
            "acceptance criteria" => Some(Self::AcceptanceCriteria),
            _ => None,
        }
    }

    /// Canonical label name used in warnings.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::Estimate => "Estimate",
            Self::Dependencies => "Dependencies",
            Self::File => "File",
            Self::Fr => "FR",
            Self::Nfr => "NFR",
            Self::AcceptanceCriteria => "Acceptance Criteria",
        }
    }
}

/// State of one labeled field after scanning a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// The label never appeared.
    #[default]
    Absent,
    /// The label appeared with nothing after it.
    Blank,
    /// The label appeared with a value.
    Present(String),
}

impl FieldValue {
    fn from_raw(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() {
            Self::Blank
        } else {
            Self::Present(value.to_string())
        }
    }

    /// The value when present.
    #[must_use]
    pub fn as_present(&self) -> Option<&str> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Blank => None,
        }
    }

    /// Collapses blank and absent into `None`.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Blank => None,
        }
    }

    /// Returns `true` unless the label never appeared.
    #[must_use]
    pub fn was_seen(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Classification of one line inside a task block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLine {
    /// A recognized labeled field.
    Field {
        /// Which field.
        label: FieldLabel,
        /// Its value (`Blank` if nothing followed the label).
        value: FieldValue,
    },
    /// A checkbox list item.
    Checkbox {
        /// Whether the box is checked.
        checked: bool,
        /// Item text.
        text: String,
    },
    /// Anything else, including labels outside the vocabulary.
    Other,
}

/// Classifies a single line of a task block.
#[must_use]
pub fn classify_line(line: &str) -> BlockLine {
    if let Some(caps) = CHECKBOX_LINE.captures(line) {
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();
        if text.is_empty() {
            return BlockLine::Other;
        }
        let checked = caps.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case("x"));
        return BlockLine::Checkbox { checked, text: text.to_string() };
    }

    let Some(caps) = FIELD_LINE.captures(line) else {
        return BlockLine::Other;
    };
    let Some(label) = caps.get(1).and_then(|m| FieldLabel::from_label(m.as_str())) else {
        return BlockLine::Other;
    };
    let mut raw = caps.get(2).map_or("", |m| m.as_str()).trim();
    if label == FieldLabel::File {
        raw = raw.trim_matches('`').trim();
    }
    BlockLine::Field { label, value: FieldValue::from_raw(raw) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(label: FieldLabel, value: &str) -> BlockLine {
        BlockLine::Field { label, value: FieldValue::Present(value.to_string()) }
    }

    #[test]
    fn recognizes_bulleted_fields() {
        assert_eq!(classify_line("- **Priority:** Must"), field(FieldLabel::Priority, "Must"));
        assert_eq!(classify_line("  - **Estimate:** 5 min "), field(FieldLabel::Estimate, "5 min"));
        assert_eq!(
            classify_line("* **Depends On**: T001"),
            field(FieldLabel::Dependencies, "T001")
        );
    }

    #[test]
    fn recognizes_unbulleted_fields() {
        assert_eq!(classify_line("**FR:** FR-001"), field(FieldLabel::Fr, "FR-001"));
        assert_eq!(classify_line("**nfr:** NFR-002"), field(FieldLabel::Nfr, "NFR-002"));
    }

    #[test]
    fn strips_backticks_from_file() {
        assert_eq!(
            classify_line("- **File:** `src/main.rs`"),
            field(FieldLabel::File, "src/main.rs")
        );
    }

    #[test]
    fn blank_value_is_distinct_from_absent() {
        assert_eq!(
            classify_line("- **Priority:**"),
            BlockLine::Field { label: FieldLabel::Priority, value: FieldValue::Blank }
        );
        assert!(FieldValue::Blank.was_seen());
        assert!(!FieldValue::Absent.was_seen());
        assert_eq!(FieldValue::Blank.into_option(), None);
    }

    #[test]
    fn acceptance_label_has_blank_value() {
        assert_eq!(
            classify_line("- **Acceptance Criteria:**"),
            BlockLine::Field { label: FieldLabel::AcceptanceCriteria, value: FieldValue::Blank }
        );
    }

    #[test]
    fn unknown_labels_are_other() {
        assert_eq!(classify_line("- **Notes:** something"), BlockLine::Other);
        assert_eq!(classify_line("plain prose"), BlockLine::Other);
    }

    #[test]
    fn recognizes_checkboxes() {
        assert_eq!(
            classify_line("  - [ ] Create src/"),
            BlockLine::Checkbox { checked: false, text: "Create src/".into() }
        );
        assert_eq!(
            classify_line("- [X] Done thing"),
            BlockLine::Checkbox { checked: true, text: "Done thing".into() }
        );
        assert_eq!(classify_line("- [ ]"), BlockLine::Other);
        assert_eq!(classify_line("[x] no bullet"), BlockLine::Other);
    }
}
