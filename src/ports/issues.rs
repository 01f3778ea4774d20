//! Issue tracker port for creating and listing issues.

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// An issue that already exists in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingIssue {
    /// Tracker-assigned issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// State as reported by the tracker (`OPEN`, `CLOSED`).
    #[serde(default = "default_state")]
    pub state: String,
    /// Web URL of the issue.
    #[serde(default)]
    pub url: String,
}

fn default_state() -> String {
    "OPEN".to_string()
}

impl ExistingIssue {
    /// Returns `true` if the tracker reports the issue as closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.eq_ignore_ascii_case("closed")
    }
}

/// An issue ready to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDraft {
    /// Issue title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Labels to attach.
    pub labels: Vec<String>,
    /// Assignee login; `copilot` requests the coding agent.
    pub assignee: Option<String>,
    /// Milestone name.
    pub milestone: Option<String>,
}

/// Manages issues in an external tracker.
///
/// Abstracting issue tracking allows deterministic replay and testing
/// without touching a real issue tracker API.
pub trait IssueTracker: Send + Sync {
    /// Returns `true` if the tracker CLI is installed and runs.
    fn is_available(&self) -> bool;

    /// Checks that the tracker CLI is logged in.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotAuthenticated`] when it is not.
    fn check_authenticated(&self) -> Result<(), TrackerError>;

    /// Returns the current repository as `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Repository`] outside a repository with a remote.
    fn current_repo(&self) -> Result<String, TrackerError>;

    /// Lists all issues (open and closed) in `repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker is rate limited or cannot be run.
    fn list_issues(&self, repo: Option<&str>) -> Result<Vec<ExistingIssue>, TrackerError>;

    /// Creates an issue and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be created.
    fn create_issue(&self, draft: &IssueDraft, repo: Option<&str>) -> Result<String, TrackerError>;

    /// Creates or updates a label with the given color.
    ///
    /// # Errors
    ///
    /// Returns an error if the label cannot be written.
    fn ensure_label(&self, name: &str, color: &str, repo: Option<&str>) -> Result<(), TrackerError>;
}
