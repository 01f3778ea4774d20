//! Replaying adapter for the `IssueTracker` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{next_output, replay_typed_result, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::TrackerError;
use crate::ports::{ExistingIssue, IssueDraft, IssueTracker};

/// Serves recorded issue tracker results from a cassette.
pub struct ReplayingIssueTracker {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingIssueTracker {
    /// Create a replaying issue tracker backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying issue tracker with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn replay<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        input: &serde_json::Value,
    ) -> Result<T, TrackerError> {
        let output = next_output(self.replayer.as_ref(), "issues", method, input);
        replay_typed_result(output, &format!("issues::{method}"))
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn is_available(&self) -> bool {
        let output = next_output(self.replayer.as_ref(), "issues", "is_available", &json!({}));
        replay_value(output, "issues::is_available")
    }

    fn check_authenticated(&self) -> Result<(), TrackerError> {
        self.replay("check_authenticated", &json!({}))
    }

    fn current_repo(&self) -> Result<String, TrackerError> {
        self.replay("current_repo", &json!({}))
    }

    fn list_issues(&self, repo: Option<&str>) -> Result<Vec<ExistingIssue>, TrackerError> {
        self.replay("list_issues", &json!({ "repo": repo }))
    }

    fn create_issue(&self, draft: &IssueDraft, repo: Option<&str>) -> Result<String, TrackerError> {
        self.replay("create_issue", &json!({ "draft": draft, "repo": repo }))
    }

    fn ensure_label(
        &self,
        name: &str,
        color: &str,
        repo: Option<&str>,
    ) -> Result<(), TrackerError> {
        self.replay("ensure_label", &json!({ "name": name, "color": color, "repo": repo }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::replayer;

    #[test]
    fn replays_tracker_calls_with_typed_errors() {
        let tracker = ReplayingIssueTracker::new(replayer(vec![
            ("issues", "is_available", json!(true)),
            ("issues", "check_authenticated", json!({"Ok": null})),
            (
                "issues",
                "list_issues",
                json!({"Ok": [{"number": 1, "title": "[T001] a", "state": "OPEN", "url": "u"}]}),
            ),
            ("issues", "create_issue", json!({"Err": "RateLimited"})),
        ]));
        assert!(tracker.is_available());
        assert_eq!(tracker.check_authenticated(), Ok(()));
        assert_eq!(tracker.list_issues(None).unwrap()[0].number, 1);
        assert_eq!(
            tracker.create_issue(&IssueDraft::default(), None),
            Err(TrackerError::RateLimited)
        );
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_cassette_panics() {
        let tracker = ReplayingIssueTracker::new(replayer(vec![]));
        let _ = tracker.current_repo();
    }
}
