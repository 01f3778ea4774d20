//! Recording adapter for the `IssueTracker` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_typed_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::TrackerError;
use crate::ports::{ExistingIssue, IssueDraft, IssueTracker};

/// Records issue tracker interactions while delegating to an inner implementation.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueTracker {
    /// Creates a new recording issue tracker wrapping the given implementation.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct NoInput {}

#[derive(Serialize)]
struct RepoInput<'a> {
    repo: Option<&'a str>,
}

#[derive(Serialize)]
struct CreateIssueInput<'a> {
    draft: &'a IssueDraft,
    repo: Option<&'a str>,
}

#[derive(Serialize)]
struct LabelInput<'a> {
    name: &'a str,
    color: &'a str,
    repo: Option<&'a str>,
}

impl IssueTracker for RecordingIssueTracker {
    fn is_available(&self) -> bool {
        let result = self.inner.is_available();
        record_interaction(&self.recorder, "issues", "is_available", &NoInput {}, &result);
        result
    }

    fn check_authenticated(&self) -> Result<(), TrackerError> {
        let result = self.inner.check_authenticated();
        record_typed_result(&self.recorder, "issues", "check_authenticated", &NoInput {}, &result);
        result
    }

    fn current_repo(&self) -> Result<String, TrackerError> {
        let result = self.inner.current_repo();
        record_typed_result(&self.recorder, "issues", "current_repo", &NoInput {}, &result);
        result
    }

    fn list_issues(&self, repo: Option<&str>) -> Result<Vec<ExistingIssue>, TrackerError> {
        let result = self.inner.list_issues(repo);
        record_typed_result(&self.recorder, "issues", "list_issues", &RepoInput { repo }, &result);
        result
    }

    fn create_issue(&self, draft: &IssueDraft, repo: Option<&str>) -> Result<String, TrackerError> {
        let result = self.inner.create_issue(draft, repo);
        let input = CreateIssueInput { draft, repo };
        record_typed_result(&self.recorder, "issues", "create_issue", &input, &result);
        result
    }

    fn ensure_label(
        &self,
        name: &str,
        color: &str,
        repo: Option<&str>,
    ) -> Result<(), TrackerError> {
        let result = self.inner.ensure_label(name, color, repo);
        let input = LabelInput { name, color, repo };
        record_typed_result(&self.recorder, "issues", "ensure_label", &input, &result);
        result
    }
}
