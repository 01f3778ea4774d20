//! Live adapter for the `IssueTracker` port, driving the GitHub CLI.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::error::TrackerError;
use crate::ports::{ExistingIssue, IssueDraft, IssueTracker, ShellExecutor, ShellOutput};
use crate::render::COPILOT_ASSIGNEE;

const GH: &str = "gh";

/// Upper bound on issues fetched when looking for duplicates.
const LIST_LIMIT: u32 = 1000;

const NO_REPOSITORY: &str =
    "Could not determine repository. Make sure you're in a git repository with a GitHub remote.";

/// Bot account that `gh api` assigns when Copilot is requested.
const COPILOT_BOT: &str = "copilot-swe-agent[bot]";

static ISSUE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/issues/(\d+)$").expect("issue number pattern is valid"));

static URL_REPO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/]+/[^/]+)/issues").expect("repo pattern is valid"));

/// Issue tracker backed by `gh`.
///
/// Every call goes through the [`ShellExecutor`] port so tests can script
/// the CLI's responses.
pub struct GhIssueTracker {
    shell: Box<dyn ShellExecutor>,
}

impl GhIssueTracker {
    /// Creates a tracker that runs `gh` through `shell`.
    #[must_use]
    pub fn new(shell: Box<dyn ShellExecutor>) -> Self {
        Self { shell }
    }

    fn gh(&self, args: Vec<String>) -> Result<ShellOutput, TrackerError> {
        self.shell.run(GH, &args).map_err(|e| {
            debug!(error = %e, "could not spawn gh");
            TrackerError::NotInstalled
        })
    }

    /// Assigns the Copilot coding agent through the REST API.
    ///
    /// `gh issue create --assignee` cannot assign the bot account.
    fn assign_copilot(&self, issue_url: &str, repo: Option<&str>) -> bool {
        let Some(number) = ISSUE_NUMBER.captures(issue_url).map(|c| c[1].to_string()) else {
            return false;
        };
        let repo = match repo {
            Some(repo) => repo.to_string(),
            None => match URL_REPO.captures(issue_url) {
                Some(caps) => caps[1].to_string(),
                None => return false,
            },
        };
        let endpoint = format!("/repos/{repo}/issues/{number}/assignees");
        let assignees = format!("assignees[]={COPILOT_BOT}");
        let args = strings(&[
            "api",
            "--method",
            "POST",
            "-H",
            "Accept: application/vnd.github+json",
            "-H",
            "X-GitHub-Api-Version: 2022-11-28",
            endpoint.as_str(),
            "-f",
            assignees.as_str(),
        ]);
        self.gh(args).is_ok_and(|out| out.success())
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

fn push_repo(args: &mut Vec<String>, repo: Option<&str>) {
    if let Some(repo) = repo {
        args.extend(["--repo".to_string(), repo.to_string()]);
    }
}

impl IssueTracker for GhIssueTracker {
    fn is_available(&self) -> bool {
        self.shell.run(GH, &strings(&["--version"])).is_ok_and(|out| out.success())
    }

    fn check_authenticated(&self) -> Result<(), TrackerError> {
        let out = self.gh(strings(&["auth", "status"]))?;
        if out.success() {
            Ok(())
        } else {
            Err(TrackerError::NotAuthenticated)
        }
    }

    fn current_repo(&self) -> Result<String, TrackerError> {
        let out =
            self.gh(strings(&["repo", "view", "--json", "nameWithOwner", "-q", ".nameWithOwner"]))?;
        let repo = out.stdout.trim();
        if !out.success() || repo.is_empty() {
            return Err(TrackerError::Repository(NO_REPOSITORY.into()));
        }
        Ok(repo.to_string())
    }

    fn list_issues(&self, repo: Option<&str>) -> Result<Vec<ExistingIssue>, TrackerError> {
        let mut args = strings(&["issue", "list", "--json", "number,title,state,url", "--limit"]);
        args.push(LIST_LIMIT.to_string());
        args.extend(strings(&["--state", "all"]));
        push_repo(&mut args, repo);

        let out = self.gh(args)?;
        if !out.success() {
            if out.stderr.to_lowercase().contains("rate limit") {
                return Err(TrackerError::RateLimited);
            }
            warn!(stderr = %out.stderr.trim(), "gh issue list failed; treating as no issues");
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&out.stdout).unwrap_or_else(|e| {
            warn!(error = %e, "unparseable gh issue list output; treating as no issues");
            Vec::new()
        }))
    }

    fn create_issue(&self, draft: &IssueDraft, repo: Option<&str>) -> Result<String, TrackerError> {
        let to_copilot = draft.assignee.as_deref() == Some(COPILOT_ASSIGNEE);

        let mut args =
            strings(&["issue", "create", "--title", &draft.title, "--body", &draft.body]);
        for label in &draft.labels {
            args.extend(["--label".to_string(), label.clone()]);
        }
        if let Some(assignee) = draft.assignee.as_ref().filter(|_| !to_copilot) {
            args.extend(["--assignee".to_string(), assignee.clone()]);
        }
        if let Some(milestone) = &draft.milestone {
            args.extend(["--milestone".to_string(), milestone.clone()]);
        }
        push_repo(&mut args, repo);

        let out = self.gh(args)?;
        if !out.success() {
            let stderr = out.stderr.to_lowercase();
            if stderr.contains("rate limit") {
                return Err(TrackerError::RateLimited);
            }
            if stderr.contains("not found") || stderr.contains("could not resolve") {
                return Err(TrackerError::Repository(format!(
                    "Repository not found: {}",
                    repo.unwrap_or("(current)")
                )));
            }
            return Err(TrackerError::Creation(out.stderr.trim().to_string()));
        }

        let url = out.stdout.trim().to_string();
        if to_copilot && !url.is_empty() && !self.assign_copilot(&url, repo) {
            warn!(url = %url, "could not assign issue to Copilot");
        }
        Ok(url)
    }

    fn ensure_label(
        &self,
        name: &str,
        color: &str,
        repo: Option<&str>,
    ) -> Result<(), TrackerError> {
        let mut args = strings(&["label", "create", name, "--color", color, "--force"]);
        push_repo(&mut args, repo);
        let out = self.gh(args)?;
        if out.success() {
            Ok(())
        } else {
            Err(TrackerError::Command(out.stderr.trim().to_string()))
        }
    }
}
