//! Output of parsing one task document.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::Task;

/// A recoverable anomaly found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line the warning refers to; 0 for document-level warnings.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl ParseWarning {
    /// Creates a warning for the given line.
    #[must_use]
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self { line, message: message.into() }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            f.write_str(&self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

/// Tasks, phases and warnings from one task document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Declared spec name, or the document name given to the parser.
    pub spec_name: String,
    /// Tasks in document order.
    pub tasks: Vec<Task>,
    /// Distinct phase headings in document order.
    pub phases: Vec<String>,
    /// Non-fatal parse warnings.
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    /// Number of tasks that are complete.
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_complete()).count()
    }

    /// Number of tasks that are not complete.
    #[must_use]
    pub fn incomplete_count(&self) -> usize {
        self.tasks.len() - self.complete_count()
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks assigned to the named phase, in document order.
    pub fn tasks_in_phase<'a>(&'a self, phase: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.phase == phase)
    }
}
