//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{GhIssueTracker, LiveFileSystem, LiveShellExecutor};
use crate::adapters::recording::{
    RecordingFileSystem, RecordingIssueTracker, RecordingShellExecutor,
};
use crate::adapters::replaying::{
    ReplayingFileSystem, ReplayingIssueTracker, ReplayingShellExecutor,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::ports::filesystem::FileSystem;
use crate::ports::issues::IssueTracker;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Filesystem for reading task and companion documents.
    pub fs: Box<dyn FileSystem>,
    /// Issue tracker for listing and creating issues.
    pub issues: Box<dyn IssueTracker>,
}

impl ServiceContext {
    /// Creates a live context: real disk I/O and the `gh` CLI.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            issues: Box::new(GhIssueTracker::new(Box::new(LiveShellExecutor))),
        }
    }

    /// Creates a context from arbitrary port implementations.
    #[must_use]
    pub fn with_ports(fs: Box<dyn FileSystem>, issues: Box<dyn IssueTracker>) -> Self {
        Self { fs, issues }
    }

    /// Creates a recording context over live adapters.
    ///
    /// Filesystem calls, tracker calls and the raw `gh` invocations beneath
    /// them each go to their own cassette in `dir`. Drop the context before
    /// calling [`RecordingSession::finish`]. This is the developer-only
    /// mechanism behind the `SPECKIT_ISSUE_RECORD` env var.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(dir: impl AsRef<Path>) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::at(dir.as_ref())?;

        let shell =
            RecordingShellExecutor::new(Box::new(LiveShellExecutor), Arc::clone(&session.shell));
        let tracker = GhIssueTracker::new(Box::new(shell));
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.fs),
            )),
            issues: Box::new(RecordingIssueTracker::new(
                Box::new(tracker),
                Arc::clone(&session.issues),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// All ports are served by a single cassette; each port/method pair
    /// is dispatched to its own interaction stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayer = Arc::new(Mutex::new(CassetteConfig::load_monolithic(path)?));
        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(Arc::clone(&replayer))),
            issues: Box::new(ReplayingIssueTracker::new(replayer)),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// With no `issues` cassette but a `shell` one, the live `gh` adapter
    /// runs against the recorded command output. Ports with neither use an
    /// adapter that panics with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        let fs: Box<dyn FileSystem> = match replayers.fs {
            Some(r) => Box::new(ReplayingFileSystem::new(r)),
            None => Box::new(ReplayingFileSystem::unconfigured()),
        };
        let issues: Box<dyn IssueTracker> = match (replayers.issues, replayers.shell) {
            (Some(r), _) => Box::new(ReplayingIssueTracker::new(r)),
            (None, Some(shell)) => {
                Box::new(GhIssueTracker::new(Box::new(ReplayingShellExecutor::new(shell))))
            }
            (None, None) => Box::new(ReplayingIssueTracker::unconfigured()),
        };
        Ok(Self { fs, issues })
    }
}
