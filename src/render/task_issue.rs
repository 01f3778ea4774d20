//! One issue per task, in a standard or a Copilot-oriented layout.

use std::fmt::Write;

use super::{checkbox_list, join_sections, IssueDraft, BASE_LABEL, COPILOT_ASSIGNEE, FOOTER};
use crate::spec_context::SpecContext;
use crate::tasks::Task;

/// Label marking a per-task issue.
pub const TASK_LABEL: &str = "task";

const NO_CRITERIA: &str = "_No acceptance criteria defined._";

const TASK_INSTRUCTIONS: &str = "## Instructions for Copilot

1. **Stay in scope** - Implement only what this task describes
2. **Meet every acceptance criterion** - Each box above should be checkable when you are done
3. **Follow existing patterns** - Match the code style and patterns in the repository
4. **Test your changes** - Add appropriate tests if applicable";

/// Renders the issue for a single task.
///
/// `context` is only used when it carries at least one primary field.
#[must_use]
pub fn task_issue(task: &Task, context: Option<&SpecContext>, copilot: bool) -> IssueDraft {
    let context = context.filter(|c| !c.is_empty());
    let body = if copilot { copilot_body(task, context) } else { standard_body(task, context) };
    IssueDraft {
        title: task.full_title(),
        body,
        labels: task_labels(task),
        assignee: copilot.then(|| COPILOT_ASSIGNEE.to_string()),
        milestone: None,
    }
}

/// `task`, `speckit`, the priority label, the phase label when the phase is
/// numbered, and the spec label.
#[must_use]
pub fn task_labels(task: &Task) -> Vec<String> {
    let mut labels =
        vec![TASK_LABEL.to_string(), BASE_LABEL.to_string(), task.priority_label().to_string()];
    labels.extend(task.phase_label());
    labels.push(task.spec_label());
    labels
}

fn standard_body(task: &Task, context: Option<&SpecContext>) -> String {
    let mut sections = vec![format!("## Task: {}", task.id), metadata_table(task)];
    sections.push(format!("## Description\n\n{}", task.title));
    sections.push(criteria_section(task));
    if let Some(ctx) = context {
        sections.push(context_section(ctx));
    }
    sections.push(FOOTER.to_string());
    join_sections(sections)
}

fn copilot_body(task: &Task, context: Option<&SpecContext>) -> String {
    let mut sections = vec![format!("## Objective\n\n{}", task.title)];

    let mut ctx_section = String::from("## Context\n");
    let _ = write!(ctx_section, "\n- **Task:** {}", task.id);
    let _ = write!(ctx_section, "\n- **Spec:** `{}`", task.spec_name);
    let _ = write!(ctx_section, "\n- **Phase:** {}", task.phase);
    let _ = write!(ctx_section, "\n- **Priority:** {}", task.priority);
    if !task.dependency_ids().is_empty() {
        let _ = write!(ctx_section, "\n- **Depends on:** {}", task.dependency_ids().join(", "));
    }
    if let Some(ctx) = context {
        for (heading, text) in context_parts(ctx) {
            let _ = write!(ctx_section, "\n\n### {heading}\n\n{text}");
        }
    }
    sections.push(ctx_section);

    sections.push(criteria_section(task));

    let files = task.file_paths();
    if !files.is_empty() {
        let list: Vec<String> = files.iter().map(|f| format!("- `{f}`")).collect();
        sections.push(format!("## Files to Modify\n\n{}", list.join("\n")));
    }

    sections.push(TASK_INSTRUCTIONS.to_string());
    sections.push(FOOTER.to_string());
    join_sections(sections)
}

fn metadata_table(task: &Task) -> String {
    let mut rows = vec![
        ("Spec", format!("`{}`", task.spec_name)),
        ("Phase", task.phase.clone()),
        ("Priority", task.priority.to_string()),
        ("Estimate", Some(task.estimate.clone()).filter(|e| !e.is_empty()).unwrap_or("-".into())),
        ("Dependencies", task.dependencies.clone()),
    ];
    if let Some(file) = &task.file_path {
        rows.push(("File", format!("`{file}`")));
    }
    if let Some(fr) = &task.fr_refs {
        rows.push(("FR", fr.clone()));
    }
    if let Some(nfr) = &task.nfr_refs {
        rows.push(("NFR", nfr.clone()));
    }

    let mut table = String::from("| Field | Value |\n|-------|-------|");
    for (name, value) in rows {
        let _ = write!(table, "\n| {name} | {} |", value.replace('|', "\\|"));
    }
    table
}

fn criteria_section(task: &Task) -> String {
    if task.acceptance_criteria.is_empty() {
        return format!("## Acceptance Criteria\n\n{NO_CRITERIA}");
    }
    let items = task.acceptance_criteria.iter().map(|c| c.text.as_str());
    format!("## Acceptance Criteria\n\n{}", checkbox_list(items, false))
}

/// Overview, then the architecture overview or, failing that, the
/// technical approach.
fn context_parts(ctx: &SpecContext) -> Vec<(&'static str, &str)> {
    let mut parts = Vec::new();
    if !ctx.overview.is_empty() {
        parts.push(("Feature Overview", ctx.overview.as_str()));
    }
    if !ctx.architecture_overview.is_empty() {
        parts.push(("Architecture", ctx.architecture_overview.as_str()));
    } else if !ctx.technical_approach.is_empty() {
        parts.push(("Technical Approach", ctx.technical_approach.as_str()));
    }
    parts
}

fn context_section(ctx: &SpecContext) -> String {
    let mut section = String::from("## Context");
    for (heading, text) in context_parts(ctx) {
        let _ = write!(section, "\n\n### {heading}\n\n{text}");
    }
    section
}
