//! The `Task` record and its derived labels.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::priority::Priority;

/// Phase given to tasks that appear before any phase heading.
pub const UNASSIGNED_PHASE: &str = "Unassigned";

/// Dependency text meaning "no dependencies".
pub const NO_DEPENDENCIES: &str = "None";

/// Title decoration marking a task as done.
pub const DONE_GLYPH: char = '✅';

static TASK_ID_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z]\d+\b").expect("task id pattern is valid"));

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

/// One checkbox item under a task's acceptance criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    /// Criterion text without the checkbox.
    pub text: String,
    /// Whether the box was checked (`[x]`).
    pub checked: bool,
}

/// One unit of planned work parsed from a task document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Short identifier, unique within its document (e.g. `T001`).
    pub id: String,
    /// Title with any done glyph removed.
    pub title: String,
    /// Priority level.
    pub priority: Priority,
    /// Free-text estimate (e.g. `5 min`); empty when missing.
    pub estimate: String,
    /// Free-text dependency list, or [`NO_DEPENDENCIES`].
    pub dependencies: String,
    /// File path(s) the task touches.
    pub file_path: Option<String>,
    /// Functional requirement references.
    pub fr_refs: Option<String>,
    /// Non-functional requirement references.
    pub nfr_refs: Option<String>,
    /// Name of the phase the task belongs to.
    pub phase: String,
    /// Name of the spec the task document belongs to.
    pub spec_name: String,
    /// Acceptance criteria in document order.
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    /// Whether the heading carried the done glyph.
    pub marked_done: bool,
}

impl Task {
    /// Creates a task with empty metadata in the unassigned phase.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: Priority::DEFAULT,
            estimate: String::new(),
            dependencies: NO_DEPENDENCIES.to_string(),
            file_path: None,
            fr_refs: None,
            nfr_refs: None,
            phase: UNASSIGNED_PHASE.to_string(),
            spec_name: String::new(),
            acceptance_criteria: Vec::new(),
            marked_done: false,
        }
    }

    /// A task is complete when its title carries the done glyph, or when it
    /// has at least one acceptance criterion and all of them are checked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.marked_done
            || (!self.acceptance_criteria.is_empty()
                && self.acceptance_criteria.iter().all(|c| c.checked))
    }

    /// Issue title: `[T001] Title`.
    #[must_use]
    pub fn full_title(&self) -> String {
        format!("[{}] {}", self.id, self.title)
    }

    /// Priority label, e.g. `priority:high`.
    #[must_use]
    pub fn priority_label(&self) -> &'static str {
        self.priority.label()
    }

    /// `phase-N` from the first number in the phase name.
    #[must_use]
    pub fn phase_label(&self) -> Option<String> {
        FIRST_NUMBER.find(&self.phase).map(|m| format!("phase-{}", m.as_str()))
    }

    /// `spec:<name>`.
    #[must_use]
    pub fn spec_label(&self) -> String {
        format!("spec:{}", self.spec_name)
    }

    /// Task identifiers mentioned in the dependency text.
    #[must_use]
    pub fn dependency_ids(&self) -> Vec<String> {
        if self.dependencies.trim().eq_ignore_ascii_case(NO_DEPENDENCIES) {
            return Vec::new();
        }
        TASK_ID_REF.find_iter(&self.dependencies).map(|m| m.as_str().to_string()).collect()
    }

    /// File paths, split on commas.
    #[must_use]
    pub fn file_paths(&self) -> Vec<String> {
        self.file_path
            .iter()
            .flat_map(|files| files.split(','))
            .map(|f| f.trim().trim_matches('`').trim())
            .filter(|f| !f.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}
