//! Match parsed tasks against issues already in the tracker, plan what to
//! create, and report sync status.
//!
//! Idempotent: re-running does not create duplicates. Task issues are
//! matched by the `[ID]` title prefix; feature issues by their title slug.

pub mod plan;
pub mod status;

use std::collections::BTreeSet;

use tracing::warn;

pub use plan::{
    execute_plan, format_summary, plan_feature_issue, plan_task_issues, CreateResult,
    CreateSummary, PlanOptions, PlannedIssue, TaskResult,
};
pub use status::{format_report, status_report, SyncReport, SyncState, TaskSyncStatus};

use crate::config::LabelPalette;
use crate::ports::{ExistingIssue, IssueTracker};
use crate::render::feature_issue::FEATURE_PREFIX;
use crate::render::{feature_labels, feature_title, task_labels};
use crate::tasks::Task;

/// Finds the issue whose title starts with `[ID]`.
#[must_use]
pub fn find_existing_issue<'a>(
    task_id: &str,
    issues: &'a [ExistingIssue],
) -> Option<&'a ExistingIssue> {
    let prefix = format!("[{task_id}]");
    issues.iter().find(|issue| issue.title.starts_with(&prefix))
}

/// Finds the feature issue for a spec.
///
/// A feature issue title starts with `Feature: `. Its slug (lowercased,
/// spaces as dashes) must contain the full spec name or equal the slug of
/// the title this tool would render.
#[must_use]
pub fn find_feature_issue<'a>(
    spec_name: &str,
    issues: &'a [ExistingIssue],
) -> Option<&'a ExistingIssue> {
    let spec = spec_name.to_lowercase();
    let rendered = slug(&feature_title(spec_name)[FEATURE_PREFIX.len()..]);
    issues.iter().find(|issue| {
        issue.title.strip_prefix(FEATURE_PREFIX).is_some_and(|rest| {
            let existing = slug(rest);
            (!spec.is_empty() && existing.contains(&spec)) || existing == rendered
        })
    })
}

fn slug(title: &str) -> String {
    title.trim().to_lowercase().replace(' ', "-")
}

/// Every label a run will attach, sorted.
#[must_use]
pub fn required_labels(spec_name: &str, tasks: &[Task], granular: bool) -> BTreeSet<String> {
    if granular {
        tasks.iter().flat_map(task_labels).collect()
    } else {
        feature_labels(spec_name, tasks).into_iter().collect()
    }
}

/// Creates or refreshes each label with its palette color.
///
/// Failures are logged and skipped; returns the labels that failed.
pub fn ensure_labels<'a>(
    tracker: &dyn IssueTracker,
    labels: impl IntoIterator<Item = &'a String>,
    palette: &LabelPalette,
    repo: Option<&str>,
) -> Vec<String> {
    let mut failed = Vec::new();
    for label in labels {
        if let Err(e) = tracker.ensure_label(label, palette.color_for(label), repo) {
            warn!(label = %label, error = %e, "could not ensure label");
            failed.push(label.clone());
        }
    }
    failed
}
