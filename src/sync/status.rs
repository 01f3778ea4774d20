//! Per-task sync status against the tracker.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use super::find_existing_issue;
use crate::ports::ExistingIssue;
use crate::tasks::Task;

/// Width the title column is cut to.
const TITLE_WIDTH: usize = 40;

/// How a task relates to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// An open issue exists.
    Synced,
    /// No issue exists.
    Missing,
    /// The issue exists and is closed.
    Closed,
    /// The task itself is complete.
    Complete,
}

impl SyncState {
    /// Short column label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "Synced",
            Self::Missing => "Missing",
            Self::Closed => "Closed",
            Self::Complete => "Done",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSyncStatus {
    /// Task identifier.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// Derived state.
    pub state: SyncState,
    /// Matching issue number.
    pub issue_number: Option<u64>,
    /// Matching issue URL.
    pub issue_url: Option<String>,
}

/// Status of every task in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Tasks in the document.
    pub total_tasks: usize,
    /// Tasks with an open issue.
    pub synced: usize,
    /// Tasks without an issue.
    pub missing: usize,
    /// Tasks whose issue is closed.
    pub closed: usize,
    /// Complete tasks.
    pub complete: usize,
    /// One entry per task, in task order.
    pub statuses: Vec<TaskSyncStatus>,
}

/// Derives each task's state. A complete task is `Complete` whatever the
/// tracker says; otherwise the matching issue decides.
#[must_use]
pub fn status_report(tasks: &[Task], existing: &[ExistingIssue]) -> SyncReport {
    let mut report = SyncReport { total_tasks: tasks.len(), ..SyncReport::default() };
    for task in tasks {
        let issue = find_existing_issue(&task.id, existing);
        let state = match issue {
            _ if task.is_complete() => SyncState::Complete,
            None => SyncState::Missing,
            Some(issue) if issue.is_closed() => SyncState::Closed,
            Some(_) => SyncState::Synced,
        };
        match state {
            SyncState::Synced => report.synced += 1,
            SyncState::Missing => report.missing += 1,
            SyncState::Closed => report.closed += 1,
            SyncState::Complete => report.complete += 1,
        }
        report.statuses.push(TaskSyncStatus {
            task_id: task.id.clone(),
            title: task.title.clone(),
            state,
            issue_number: issue.map(|i| i.number),
            issue_url: issue.map(|i| i.url.clone()),
        });
    }
    report
}

/// Formats the report as a table followed by totals.
#[must_use]
pub fn format_report(report: &SyncReport, repo: &str) -> String {
    let mut out = format!("Sync status: {repo}\n\n");
    let _ = writeln!(out, "{:<8} {:<40} {:<8} Issue", "Task", "Title", "Status");
    for status in &report.statuses {
        let title: String = status.title.chars().take(TITLE_WIDTH).collect();
        let issue = status.issue_number.map(|n| format!("#{n}")).unwrap_or_default();
        let state = status.state.as_str();
        let _ = writeln!(out, "{:<8} {title:<40} {state:<8} {issue}", status.task_id);
    }
    let _ = write!(
        out,
        "\nSynced: {}  Missing: {}  Closed: {}  Complete: {}  Total: {}",
        report.synced, report.missing, report.closed, report.complete, report.total_tasks
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, id: &str, state: &str) -> ExistingIssue {
        ExistingIssue {
            number,
            title: format!("[{id}] something"),
            state: state.into(),
            url: format!("https://github.com/owner/repo/issues/{number}"),
        }
    }

    #[test]
    fn states_follow_task_then_issue() {
        let tasks = vec![
            Task { marked_done: true, ..Task::new("T001", "done") },
            Task::new("T002", "open issue"),
            Task::new("T003", "closed issue"),
            Task::new("T004", "no issue"),
        ];
        let issues =
            vec![issue(1, "T001", "OPEN"), issue(2, "T002", "OPEN"), issue(3, "T003", "CLOSED")];
        let report = status_report(&tasks, &issues);

        let states: Vec<SyncState> = report.statuses.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![SyncState::Complete, SyncState::Synced, SyncState::Closed, SyncState::Missing]
        );
        assert_eq!((report.synced, report.missing, report.closed, report.complete), (1, 1, 1, 1));
        assert_eq!(report.total_tasks, 4);
        assert_eq!(report.statuses[0].issue_number, Some(1));
        assert_eq!(report.statuses[3].issue_url, None);
    }

    #[test]
    fn format_report_lists_each_task() {
        let report = status_report(&[Task::new("T001", "Setup")], &[issue(4, "T001", "OPEN")]);
        let text = format_report(&report, "owner/repo");
        assert!(text.starts_with("Sync status: owner/repo\n\n"));
        assert!(text.contains("T001     Setup"));
        assert!(text.contains("Synced   #4"));
        assert!(text.ends_with("Synced: 1  Missing: 0  Closed: 0  Complete: 0  Total: 1"));
    }
}
