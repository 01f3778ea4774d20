//! Planning and executing issue creation.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{find_existing_issue, find_feature_issue};
use crate::ports::{ExistingIssue, IssueDraft, IssueTracker};
use crate::tasks::Task;

/// Switches that change what gets planned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Plan nothing for complete tasks.
    pub skip_complete: bool,
    /// Ignore existing issues and plan a creation for every task.
    pub force: bool,
}

/// What a run will do for one task (or for the feature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedIssue {
    /// A new issue will be created.
    Create,
    /// A matching issue already exists.
    SkipExists {
        /// Existing issue number.
        number: u64,
        /// Existing issue URL.
        url: String,
    },
    /// The task is complete and complete tasks are skipped.
    SkipComplete,
}

impl PlannedIssue {
    fn skip_exists(issue: &ExistingIssue) -> Self {
        Self::SkipExists { number: issue.number, url: issue.url.clone() }
    }
}

/// Outcome for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateResult {
    /// Issue created (or would be, in a dry run).
    Created,
    /// A matching issue already existed.
    SkippedExists,
    /// The task was complete.
    SkippedComplete,
    /// The tracker refused the issue.
    Failed,
}

/// Outcome for one task, with the issue URL or error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task identifier.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// What happened.
    pub result: CreateResult,
    /// URL of the created or existing issue.
    pub issue_url: Option<String>,
    /// Tracker error text for failures.
    pub error: Option<String>,
}

/// Totals for a granular run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSummary {
    /// Tasks considered.
    pub total: usize,
    /// Issues created.
    pub created: usize,
    /// Tasks skipped because an issue existed.
    pub skipped_exists: usize,
    /// Tasks skipped because they were complete.
    pub skipped_complete: usize,
    /// Creations that failed.
    pub failed: usize,
    /// Per-task outcomes in task order.
    pub results: Vec<TaskResult>,
}

impl CreateSummary {
    fn push(
        &mut self,
        task: &Task,
        result: CreateResult,
        url: Option<String>,
        error: Option<String>,
    ) {
        match result {
            CreateResult::Created => self.created += 1,
            CreateResult::SkippedExists => self.skipped_exists += 1,
            CreateResult::SkippedComplete => self.skipped_complete += 1,
            CreateResult::Failed => self.failed += 1,
        }
        self.results.push(TaskResult {
            task_id: task.id.clone(),
            title: task.title.clone(),
            result,
            issue_url: url,
            error,
        });
    }
}

/// Plans one entry per task, in task order.
///
/// Complete tasks are skipped first (when asked), then tasks with an
/// existing issue (unless forced).
#[must_use]
pub fn plan_task_issues(
    tasks: &[Task],
    existing: &[ExistingIssue],
    options: PlanOptions,
) -> Vec<PlannedIssue> {
    tasks
        .iter()
        .map(|task| {
            if options.skip_complete && task.is_complete() {
                return PlannedIssue::SkipComplete;
            }
            if !options.force {
                if let Some(issue) = find_existing_issue(&task.id, existing) {
                    return PlannedIssue::skip_exists(issue);
                }
            }
            PlannedIssue::Create
        })
        .collect()
}

/// Plans the single feature issue for a spec.
#[must_use]
pub fn plan_feature_issue(
    spec_name: &str,
    existing: &[ExistingIssue],
    force: bool,
) -> PlannedIssue {
    if force {
        return PlannedIssue::Create;
    }
    find_feature_issue(spec_name, existing).map_or(PlannedIssue::Create, PlannedIssue::skip_exists)
}

/// Carries out a task plan.
///
/// `plan` pairs with `tasks` by position, as produced by
/// [`plan_task_issues`]. `render` builds the draft for each task to
/// create. A dry run counts creations without calling the tracker.
/// Creation failures are recorded and the run continues.
pub fn execute_plan<F>(
    tracker: &dyn IssueTracker,
    tasks: &[Task],
    plan: &[PlannedIssue],
    render: F,
    repo: Option<&str>,
    dry_run: bool,
) -> CreateSummary
where
    F: Fn(&Task) -> IssueDraft,
{
    let mut summary = CreateSummary { total: tasks.len(), ..CreateSummary::default() };

    for (task, planned) in tasks.iter().zip(plan) {
        match planned {
            PlannedIssue::SkipComplete => {
                summary.push(task, CreateResult::SkippedComplete, None, None);
            }
            PlannedIssue::SkipExists { url, .. } => {
                summary.push(task, CreateResult::SkippedExists, Some(url.clone()), None);
            }
            PlannedIssue::Create if dry_run => {
                summary.push(task, CreateResult::Created, None, None);
            }
            PlannedIssue::Create => match tracker.create_issue(&render(task), repo) {
                Ok(url) => {
                    info!(task = %task.id, url = %url, "created issue");
                    summary.push(task, CreateResult::Created, Some(url), None);
                }
                Err(e) => {
                    warn!(task = %task.id, error = %e, "issue creation failed");
                    summary.push(task, CreateResult::Failed, None, Some(e.to_string()));
                }
            },
        }
    }
    summary
}

/// Formats per-task outcomes and totals as a human-readable report.
#[must_use]
pub fn format_summary(summary: &CreateSummary, dry_run: bool) -> String {
    if summary.results.is_empty() {
        return "No tasks to create.".to_string();
    }

    let mut out = String::new();
    for result in &summary.results {
        let head = format!("[{}] {}", result.task_id, result.title);
        let _ = match result.result {
            CreateResult::Created if dry_run => writeln!(out, "  CREATE {head} (would create)"),
            CreateResult::Created => {
                writeln!(out, "  CREATE {head} {}", result.issue_url.as_deref().unwrap_or_default())
            }
            CreateResult::SkippedExists => writeln!(
                out,
                "  EXISTS {head} {}",
                result.issue_url.as_deref().unwrap_or_default()
            ),
            CreateResult::SkippedComplete => writeln!(out, "  DONE   {head} (complete)"),
            CreateResult::Failed => writeln!(
                out,
                "  FAILED {head} ({})",
                result.error.as_deref().unwrap_or("unknown error")
            ),
        };
    }
    let _ = write!(
        out,
        "\nCreated: {}  Skipped (exists): {}  Skipped (complete): {}  Failed: {}",
        summary.created, summary.skipped_exists, summary.skipped_complete, summary.failed
    );
    out
}
