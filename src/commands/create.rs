//! `speckit-issue create` command.

use std::fmt::Write;

use tracing::{debug, info};

use super::{parse_nonempty, preflight, CommandOutput};
use crate::cli::CreateArgs;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::ports::ExistingIssue;
use crate::render::{feature_issue, task_issue, COPILOT_ASSIGNEE};
use crate::spec_context::{assemble, SpecContext};
use crate::sync::{
    ensure_labels, execute_plan, format_summary, plan_feature_issue, plan_task_issues,
    required_labels, PlanOptions, PlannedIssue,
};
use crate::tasks::{ParseResult, Task};

/// Execute the `create` command against the given context.
///
/// Without `--granular` one feature issue holds every task; with it each
/// task gets its own issue. Failures creating individual task issues are
/// reported in the summary and do not fail the command.
///
/// # Errors
///
/// Returns an error string if the tracker is unusable, the tasks file
/// cannot be read, or the feature issue cannot be created.
pub fn run_with_context(
    ctx: &ServiceContext,
    args: &CreateArgs,
    config: &AppConfig,
    verbose: bool,
) -> Result<CommandOutput, String> {
    let mut output = CommandOutput::default();
    if args.skip_complete && !args.granular {
        output.warnings.push("--skip-complete only applies with --granular".to_string());
    }

    let context = if args.no_context {
        None
    } else {
        let context = assemble(ctx.fs.as_ref(), &args.tasks_file, &config.context);
        output.warnings.extend(context.warnings.iter().cloned());
        Some(context).filter(|c| !c.is_empty())
    };

    let repo = if args.dry_run {
        args.repo.clone()
    } else {
        Some(preflight(ctx.issues.as_ref(), args.repo.as_deref())?)
    };

    let parsed = parse_nonempty(ctx, &args.tasks_file)?;
    output.warnings.extend(parsed.warnings.iter().map(ToString::to_string));

    let mut out = String::new();
    let _ = writeln!(out, "Parsing: {}", args.tasks_file.display());
    let _ = writeln!(
        out,
        "Found {} tasks ({} complete, {} incomplete)",
        parsed.tasks.len(),
        parsed.complete_count(),
        parsed.incomplete_count()
    );
    if verbose {
        describe_context(&mut out, context.as_ref());
    }

    let existing = if args.dry_run || args.force {
        Vec::new()
    } else {
        ctx.issues.list_issues(repo.as_deref()).map_err(|e| e.to_string())?
    };
    debug!(count = existing.len(), "existing issues");

    if !args.dry_run {
        let labels = required_labels(&parsed.spec_name, &parsed.tasks, args.granular);
        for label in ensure_labels(ctx.issues.as_ref(), &labels, &config.labels, repo.as_deref()) {
            output.warnings.push(format!("Could not create label '{label}'"));
        }
    }

    out.push('\n');
    if args.dry_run {
        out.push_str("Dry run - no issues will be created\n\n");
    } else {
        let _ = writeln!(out, "Creating issues in {}\n", repo.as_deref().unwrap_or_default());
    }

    let (context, repo) = (context.as_ref(), repo.as_deref());
    if args.granular {
        create_task_issues(ctx, args, &parsed, context, &existing, repo, &mut out);
    } else {
        create_feature_issue(ctx, args, &parsed, context, &existing, repo, &mut out)?;
    }

    output.text = out.trim_end().to_string();
    Ok(output)
}

fn describe_context(out: &mut String, context: Option<&SpecContext>) {
    match context {
        Some(context) => {
            let _ = writeln!(
                out,
                "Spec context: {} ({} lines)",
                context.files_found.join(", "),
                context.total_lines()
            );
        }
        None => out.push_str("Spec context: none\n"),
    }
}

fn create_feature_issue(
    ctx: &ServiceContext,
    args: &CreateArgs,
    parsed: &ParseResult,
    context: Option<&SpecContext>,
    existing: &[ExistingIssue],
    repo: Option<&str>,
    out: &mut String,
) -> Result<(), String> {
    if let PlannedIssue::SkipExists { number, url } =
        plan_feature_issue(&parsed.spec_name, existing, args.force)
    {
        let _ = writeln!(out, "Feature issue already exists: #{number}");
        let _ = writeln!(out, "  {url}");
        return Ok(());
    }

    let mut draft = feature_issue(&parsed.spec_name, context, &parsed.tasks, args.assign_copilot);
    draft.milestone.clone_from(&args.milestone);

    if args.dry_run {
        let _ = writeln!(out, "Would create: {}", draft.title);
        let _ = writeln!(out, "  Tasks: {}", parsed.tasks.len());
        let _ = writeln!(out, "  Labels: {}", draft.labels.join(", "));
        if draft.assignee.as_deref() == Some(COPILOT_ASSIGNEE) {
            let _ = writeln!(out, "  Assignee: {COPILOT_ASSIGNEE}");
        }
    } else {
        let url = ctx
            .issues
            .create_issue(&draft, repo)
            .map_err(|e| format!("Failed to create feature issue: {e}"))?;
        info!(url = %url, "created feature issue");
        let _ = writeln!(out, "Created: {}", draft.title);
        let _ = writeln!(out, "  {url}");
    }

    let _ = writeln!(
        out,
        "\nFeature issue: {}  Tasks included: {}  Phases: {}",
        if args.dry_run { "1 (dry run)" } else { "1" },
        parsed.tasks.len(),
        parsed.phases.len()
    );
    Ok(())
}

fn create_task_issues(
    ctx: &ServiceContext,
    args: &CreateArgs,
    parsed: &ParseResult,
    context: Option<&SpecContext>,
    existing: &[ExistingIssue],
    repo: Option<&str>,
    out: &mut String,
) {
    let options = PlanOptions { skip_complete: args.skip_complete, force: args.force };
    let plan = plan_task_issues(&parsed.tasks, existing, options);
    let render = |task: &Task| {
        let mut draft = task_issue(task, context, args.assign_copilot);
        draft.milestone.clone_from(&args.milestone);
        draft
    };
    let summary =
        execute_plan(ctx.issues.as_ref(), &parsed.tasks, &plan, render, repo, args.dry_run);
    out.push_str(&format_summary(&summary, args.dry_run));
}
