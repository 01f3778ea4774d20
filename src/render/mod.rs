//! Issue rendering: turns parsed tasks and spec context into issue drafts.
//!
//! Renderers are pure functions; nothing here touches the tracker.

pub mod feature_issue;
pub mod task_issue;

pub use feature_issue::{feature_issue, feature_labels, feature_title};
pub use task_issue::{task_issue, task_labels};

pub use crate::ports::IssueDraft;

/// Assignee that hands an issue to the Copilot coding agent.
pub const COPILOT_ASSIGNEE: &str = "copilot";

/// Closing line of every rendered issue body.
pub const FOOTER: &str =
    "---\n*Generated by [speckit-to-issue](https://github.com/speckit/speckit-to-issue)*";

/// Label present on every issue this tool creates.
pub const BASE_LABEL: &str = "speckit";

/// Joins non-empty sections with a blank line between them.
pub(crate) fn join_sections(sections: Vec<String>) -> String {
    sections.into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join("\n\n")
}

/// Checkbox list, one line per item.
pub(crate) fn checkbox_list<'a>(items: impl IntoIterator<Item = &'a str>, checked: bool) -> String {
    let mark = if checked { 'x' } else { ' ' };
    items.into_iter().map(|item| format!("- [{mark}] {item}")).collect::<Vec<_>>().join("\n")
}
