//! Command dispatch and handlers.

pub mod create;
pub mod show;
pub mod status;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::ports::IssueTracker;
use crate::tasks::{parse_tasks_file, ParseResult};

/// Env var naming a directory to record port interactions into.
pub const RECORD_ENV: &str = "SPECKIT_ISSUE_RECORD";

/// What a command has to say: the report for stdout and warnings for stderr.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Report text.
    pub text: String,
    /// Warnings, printed before the report.
    pub warnings: Vec<String>,
}

impl CommandOutput {
    fn print(&self) {
        for warning in &self.warnings {
            eprintln!("Warning: {warning}");
        }
        println!("{}", self.text);
    }
}

/// Dispatch a parsed command line to its handler.
///
/// When `SPECKIT_ISSUE_RECORD` is set to a directory path, all port
/// interactions are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if the configuration cannot be loaded or the
/// selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let (ctx, session) = if let Ok(path) = env::var(RECORD_ENV) {
        let (ctx, session) = ServiceContext::recording_at(PathBuf::from(path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(cli, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result.map(|output| output.print())
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the configuration cannot be loaded or the
/// command fails.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<CommandOutput, String> {
    let config =
        AppConfig::resolve(ctx.fs.as_ref(), cli.config.as_deref()).map_err(|e| e.to_string())?;
    match &cli.command {
        Command::Create(args) => create::run_with_context(ctx, args, &config, cli.verbose),
        Command::Status { tasks_file, repo } => {
            status::run_with_context(ctx, tasks_file, repo.as_deref())
        }
        Command::Show { tasks_file, context, format } => {
            show::run_with_context(ctx, tasks_file, *context, *format, &config)
        }
    }
}

/// Checks the tracker is installed and logged in, then resolves the target
/// repository.
fn preflight(tracker: &dyn IssueTracker, repo: Option<&str>) -> Result<String, String> {
    if !tracker.is_available() {
        return Err(crate::error::TrackerError::NotInstalled.to_string());
    }
    tracker.check_authenticated().map_err(|e| e.to_string())?;
    match repo {
        Some(repo) => Ok(repo.to_string()),
        None => tracker.current_repo().map_err(|e| e.to_string()),
    }
}

/// Parses the tasks file, rejecting one that holds no tasks.
fn parse_nonempty(ctx: &ServiceContext, tasks_file: &Path) -> Result<ParseResult, String> {
    let parsed = parse_tasks_file(ctx.fs.as_ref(), tasks_file).map_err(|e| e.to_string())?;
    if parsed.tasks.is_empty() {
        return Err(format!("No tasks found in {}", tasks_file.display()));
    }
    Ok(parsed)
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::ServiceContext;
    use crate::ports::testing::{FakeTracker, MemFs};

    pub const TASKS: &str = "/repo/specs/001-demo/tasks.md";

    pub const TASKS_MD: &str = "\
# Tasks

## Phase 1: Setup

### T001: Create crate

**Priority**: Must
**Estimate**: 5 min
**File**: `Cargo.toml`

- [x] manifest exists
- [x] builds

### T002: Add parser

**Priority**: Should
**Estimate**: 30 min
**Dependencies**: T001

- [ ] parses headings

## Phase 2: Polish

### T003: Write docs

**Priority**: Could
**Estimate**: 10 min
";

    pub const SPEC_MD: &str = "\
# Demo

## Overview

A demo feature.

## Success Criteria

Everything parses.
";

    pub fn fs() -> MemFs {
        let fs = MemFs::new();
        fs.insert(TASKS, TASKS_MD);
        fs.insert("/repo/specs/001-demo/spec.md", SPEC_MD);
        fs
    }

    pub fn ctx(tracker: FakeTracker) -> ServiceContext {
        ServiceContext::with_ports(Box::new(fs()), Box::new(tracker))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::test_support::{ctx, TASKS};
    use super::*;
    use crate::ports::testing::FakeTracker;

    #[test]
    fn dispatch_routes_show() {
        let cli = Cli::parse_from(["speckit-issue", "show", TASKS]);
        let output = dispatch_with_context(&cli, &ctx(FakeTracker::default())).unwrap();
        assert!(output.text.contains("T001"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["speckit-issue", "--config", "/nope.yaml", "show", TASKS]);
        let err = dispatch_with_context(&cli, &ctx(FakeTracker::default())).unwrap_err();
        assert!(err.starts_with("Failed to read config /nope.yaml"));
    }

    #[test]
    fn preflight_prefers_explicit_repo() {
        let tracker = FakeTracker::default();
        assert_eq!(preflight(&tracker, Some("a/b")).unwrap(), "a/b");
        assert_eq!(preflight(&tracker, None).unwrap(), "owner/repo");
    }

    #[test]
    fn empty_task_document_is_rejected() {
        let fs = super::test_support::fs();
        fs.insert("/repo/specs/empty/tasks.md", "# Tasks\n\nNothing yet.\n");
        let ctx = ServiceContext::with_ports(Box::new(fs), Box::new(FakeTracker::default()));
        let err = parse_nonempty(&ctx, Path::new("/repo/specs/empty/tasks.md")).unwrap_err();
        assert_eq!(err, "No tasks found in /repo/specs/empty/tasks.md");
    }
}
