//! In-memory port fakes shared by unit tests.

#![allow(missing_docs)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ExistingIssue, FileSystem, IssueDraft, IssueTracker, ShellExecutor, ShellOutput};
use crate::error::TrackerError;

/// Filesystem backed by a map of paths to bytes.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    unreadable: Mutex<HashSet<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl AsRef<Path>, contents: impl AsRef<str>) {
        self.insert_bytes(path, contents.as_ref().as_bytes());
    }

    pub fn insert_bytes(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        self.files.lock().unwrap().insert(path.as_ref().to_path_buf(), contents.as_ref().to_vec());
    }

    /// A path that exists but fails to read.
    pub fn insert_unreadable(&self, path: impl AsRef<Path>) {
        self.unreadable.lock().unwrap().insert(path.as_ref().to_path_buf());
    }
}

impl FileSystem for MemFs {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        if self.unreadable.lock().unwrap().contains(path) {
            return Err(format!("Permission denied: {}", path.display()).into());
        }
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.unreadable.lock().unwrap().contains(path)
    }
}

/// Shell that serves queued responses and records every invocation.
#[derive(Default)]
pub struct ScriptedShell {
    responses: Mutex<VecDeque<Result<ShellOutput, String>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, stdout: &str) -> &Self {
        self.push_exit(0, stdout, "")
    }

    pub fn push_exit(&self, exit_code: i32, stdout: &str, stderr: &str) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(ShellOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }));
        self
    }

    pub fn push_spawn_error(&self, message: &str) -> &Self {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    /// Every invocation as `[program, args...]`.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl ShellExecutor for ScriptedShell {
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(call);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(message.into()),
            None => panic!("ScriptedShell: no response queued for {program} {args:?}"),
        }
    }
}

/// Tracker holding issues in memory.
#[derive(Default)]
pub struct FakeTracker {
    pub existing: Vec<ExistingIssue>,
    /// Titles whose creation fails.
    pub failing_titles: HashSet<String>,
    pub created: Mutex<Vec<IssueDraft>>,
    pub labels: Mutex<Vec<(String, String)>>,
}

impl FakeTracker {
    pub fn with_existing(existing: Vec<ExistingIssue>) -> Self {
        Self { existing, ..Self::default() }
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.created.lock().unwrap().iter().map(|d| d.title.clone()).collect()
    }
}

impl IssueTracker for FakeTracker {
    fn is_available(&self) -> bool {
        true
    }

    fn check_authenticated(&self) -> Result<(), TrackerError> {
        Ok(())
    }

    fn current_repo(&self) -> Result<String, TrackerError> {
        Ok("owner/repo".to_string())
    }

    fn list_issues(&self, _repo: Option<&str>) -> Result<Vec<ExistingIssue>, TrackerError> {
        Ok(self.existing.clone())
    }

    fn create_issue(
        &self,
        draft: &IssueDraft,
        _repo: Option<&str>,
    ) -> Result<String, TrackerError> {
        if self.failing_titles.contains(&draft.title) {
            return Err(TrackerError::Creation("scripted failure".into()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(draft.clone());
        Ok(format!("https://github.com/owner/repo/issues/{}", 100 + created.len()))
    }

    fn ensure_label(
        &self,
        name: &str,
        color: &str,
        _repo: Option<&str>,
    ) -> Result<(), TrackerError> {
        self.labels.lock().unwrap().push((name.to_string(), color.to_string()));
        Ok(())
    }
}

/// Lets a test keep a handle on a tracker it hands to a context.
impl<T: IssueTracker> IssueTracker for std::sync::Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn check_authenticated(&self) -> Result<(), TrackerError> {
        (**self).check_authenticated()
    }

    fn current_repo(&self) -> Result<String, TrackerError> {
        (**self).current_repo()
    }

    fn list_issues(&self, repo: Option<&str>) -> Result<Vec<ExistingIssue>, TrackerError> {
        (**self).list_issues(repo)
    }

    fn create_issue(&self, draft: &IssueDraft, repo: Option<&str>) -> Result<String, TrackerError> {
        (**self).create_issue(draft, repo)
    }

    fn ensure_label(
        &self,
        name: &str,
        color: &str,
        repo: Option<&str>,
    ) -> Result<(), TrackerError> {
        (**self).ensure_label(name, color, repo)
    }
}
