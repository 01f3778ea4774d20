//! `speckit-issue status` command.

use std::path::Path;

use super::{parse_nonempty, preflight, CommandOutput};
use crate::context::ServiceContext;
use crate::sync::{format_report, status_report};

/// Execute the `status` command against the given context.
///
/// Lists every task with its tracker state: synced, missing, closed, or
/// complete in the task document.
///
/// # Errors
///
/// Returns an error string if the tracker is unusable, the tasks file
/// cannot be read, or the issue listing fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    tasks_file: &Path,
    repo: Option<&str>,
) -> Result<CommandOutput, String> {
    let repo = preflight(ctx.issues.as_ref(), repo)?;
    let parsed = parse_nonempty(ctx, tasks_file)?;
    let existing = ctx.issues.list_issues(Some(repo.as_str())).map_err(|e| e.to_string())?;
    let report = status_report(&parsed.tasks, &existing);

    Ok(CommandOutput {
        text: format_report(&report, &repo).trim_end().to_string(),
        warnings: parsed.warnings.iter().map(ToString::to_string).collect(),
    })
}
