//! Task priority levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `MoSCoW` priority, ordered so that `Must` is the greatest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Will not be done in this iteration.
    Wont,
    /// Nice to have.
    Could,
    /// Important but not blocking.
    #[default]
    Should,
    /// Required.
    Must,
}

impl Priority {
    /// The level used when priority text is missing or unrecognized.
    pub const DEFAULT: Self = Self::Should;

    /// Parses the first word of a priority value, case-insensitively.
    ///
    /// Returns `None` for anything that is not one of the four levels.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let word: String = text
            .trim()
            .chars()
            .take_while(|c| c.is_alphabetic() || matches!(c, '\'' | '’'))
            .flat_map(char::to_lowercase)
            .filter(|c| !matches!(c, '\'' | '’'))
            .collect();
        match word.as_str() {
            "must" => Some(Self::Must),
            "should" => Some(Self::Should),
            "could" => Some(Self::Could),
            "wont" => Some(Self::Wont),
            _ => None,
        }
    }

    /// Tracker label for this level.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Must => "priority:high",
            Self::Should => "priority:medium",
            Self::Could => "priority:low",
            Self::Wont => "priority:wont",
        }
    }

    /// Display name as written in task documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Must => "Must",
            Self::Should => "Should",
            Self::Could => "Could",
            Self::Wont => "Won't",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_levels() {
        assert_eq!(Priority::parse("Must"), Some(Priority::Must));
        assert_eq!(Priority::parse("should"), Some(Priority::Should));
        assert_eq!(Priority::parse("COULD"), Some(Priority::Could));
        assert_eq!(Priority::parse("Won't"), Some(Priority::Wont));
        assert_eq!(Priority::parse("won’t"), Some(Priority::Wont));
        assert_eq!(Priority::parse("wont"), Some(Priority::Wont));
    }

    #[test]
    fn takes_first_word_only() {
        assert_eq!(Priority::parse("Must (blocking)"), Some(Priority::Must));
    }

    #[test]
    fn rejects_unknown_text() {
        assert_eq!(Priority::parse("P1"), None);
        assert_eq!(Priority::parse(""), None);
        assert_eq!(Priority::parse("mustard"), None);
    }

    #[test]
    fn must_is_highest() {
        assert!(Priority::Must > Priority::Should);
        assert!(Priority::Should > Priority::Could);
        assert!(Priority::Could > Priority::Wont);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Priority::Must.label(), "priority:high");
        assert_eq!(Priority::Should.label(), "priority:medium");
        assert_eq!(Priority::Could.label(), "priority:low");
        assert_eq!(Priority::Wont.label(), "priority:wont");
    }
}
