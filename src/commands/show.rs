//! `speckit-issue show` command.

use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use super::CommandOutput;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::spec_context::{assemble, SpecContext};
use crate::tasks::{parse_tasks_file, ParseResult};

/// Everything `show --format yaml` prints.
#[derive(Debug, Serialize)]
struct ShowReport<'a> {
    tasks_file: &'a Path,
    #[serde(flatten)]
    parsed: &'a ParseResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a SpecContext>,
}

/// Execute the `show` command against the given context.
///
/// Parses the task document (and optionally assembles its spec context)
/// and prints the result. Never contacts the tracker.
///
/// # Errors
///
/// Returns an error string if the tasks file cannot be read or the YAML
/// output cannot be produced.
pub fn run_with_context(
    ctx: &ServiceContext,
    tasks_file: &Path,
    with_context: bool,
    format: OutputFormat,
    config: &AppConfig,
) -> Result<CommandOutput, String> {
    let parsed = parse_tasks_file(ctx.fs.as_ref(), tasks_file).map_err(|e| e.to_string())?;
    let context = with_context.then(|| assemble(ctx.fs.as_ref(), tasks_file, &config.context));

    let text = match format {
        OutputFormat::Yaml => {
            let report = ShowReport { tasks_file, parsed: &parsed, context: context.as_ref() };
            serde_yaml::to_string(&report).map_err(|e| format!("Failed to serialize output: {e}"))?
        }
        OutputFormat::Text => {
            let mut out = format_tasks(&parsed);
            if let Some(context) = &context {
                out.push('\n');
                out.push_str(&format_context(context));
            }
            out
        }
    };

    // YAML output carries its warnings inline.
    let warnings = match format {
        OutputFormat::Yaml => Vec::new(),
        OutputFormat::Text => parsed
            .warnings
            .iter()
            .map(ToString::to_string)
            .chain(context.iter().flat_map(|c| c.warnings.iter().cloned()))
            .collect(),
    };

    Ok(CommandOutput { text: text.trim_end().to_string(), warnings })
}

/// Spec name, counts, then each phase with its tasks.
fn format_tasks(parsed: &ParseResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Spec: {}", parsed.spec_name);
    let _ = writeln!(
        out,
        "Tasks: {} ({} complete, {} incomplete)",
        parsed.tasks.len(),
        parsed.complete_count(),
        parsed.incomplete_count()
    );

    let mut phases: Vec<&str> = parsed.phases.iter().map(String::as_str).collect();
    for task in &parsed.tasks {
        if !phases.contains(&task.phase.as_str()) {
            phases.push(&task.phase);
        }
    }

    for phase in phases {
        let _ = writeln!(out, "\n{phase}");
        for task in parsed.tasks_in_phase(phase) {
            let mark = if task.is_complete() { "x" } else { " " };
            let priority = task.priority.as_str();
            let _ = write!(out, "  [{mark}] {:<6} {priority:<8} {}", task.id, task.title);
            let deps = task.dependency_ids();
            if !deps.is_empty() {
                let _ = write!(out, " (after {})", deps.join(", "));
            }
            out.push('\n');
        }
    }
    out
}

fn format_context(context: &SpecContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Context: {}", context.spec_folder.display());
    let list = |names: &[String]| if names.is_empty() { "-".to_string() } else { names.join(", ") };
    let _ = writeln!(out, "  Found: {}", list(&context.files_found));
    let _ = writeln!(out, "  Missing: {}", list(&context.files_missing));
    if context.is_empty() {
        out.push_str("  (no context extracted)\n");
    }
    for (field, text) in context.populated() {
        let truncated = if context.truncated_fields.contains(&field) { ", truncated" } else { "" };
        let lines = text.lines().count();
        let _ = writeln!(out, "\n### {} ({lines} lines{truncated})", field.title());
        let _ = writeln!(out, "{text}");
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::test_support::{ctx, fs, TASKS};
    use crate::ports::testing::FakeTracker;

    fn show(with_context: bool, format: OutputFormat) -> CommandOutput {
        let ctx = ctx(FakeTracker::default());
        run_with_context(&ctx, Path::new(TASKS), with_context, format, &AppConfig::default())
            .unwrap()
    }

    #[test]
    fn text_lists_tasks_by_phase() {
        let output = show(false, OutputFormat::Text);
        assert_eq!(
            output.text,
            "\
Spec: 001-demo
Tasks: 3 (1 complete, 2 incomplete)

Phase 1: Setup
  [x] T001   Must     Create crate
  [ ] T002   Should   Add parser (after T001)

Phase 2: Polish
  [ ] T003   Could    Write docs"
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn text_with_context_lists_files_and_fields() {
        let output = show(true, OutputFormat::Text);
        assert!(output.text.contains("Context: /repo/specs/001-demo"));
        assert!(output.text.contains("  Found: spec.md"));
        assert!(output.text.contains("Missing: plan.md"));
        assert!(output.text.contains("A demo feature."));
    }

    #[test]
    fn yaml_is_parseable() {
        let output = show(true, OutputFormat::Yaml);
        let value: serde_yaml::Value = serde_yaml::from_str(&output.text).unwrap();
        assert_eq!(value["spec_name"].as_str(), Some("001-demo"));
        assert_eq!(value["tasks"].as_sequence().map(Vec::len), Some(3));
        assert!(value["context"].is_mapping());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn yaml_omits_context_unless_asked() {
        let output = show(false, OutputFormat::Yaml);
        let value: serde_yaml::Value = serde_yaml::from_str(&output.text).unwrap();
        assert!(value.get("context").is_none());
    }

    #[test]
    fn parse_warnings_go_to_stderr() {
        let fs = fs();
        fs.insert(
            "/repo/specs/002-odd/tasks.md",
            "### T001: A\n**Priority**: Must\n**Estimate**: 1h\n### T001: B\n",
        );
        let ctx = ServiceContext::with_ports(Box::new(fs), Box::new(FakeTracker::default()));
        let output = run_with_context(
            &ctx,
            Path::new("/repo/specs/002-odd/tasks.md"),
            false,
            OutputFormat::Text,
            &AppConfig::default(),
        )
        .unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].starts_with("line 4: duplicate task id T001"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let ctx = ctx(FakeTracker::default());
        let err = run_with_context(
            &ctx,
            Path::new("/repo/none.md"),
            false,
            OutputFormat::Text,
            &AppConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, "Tasks file not found: /repo/none.md");
    }
}
