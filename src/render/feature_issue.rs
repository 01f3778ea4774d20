//! A single issue covering a whole feature: overview, architecture and
//! every task grouped by phase.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{join_sections, IssueDraft, BASE_LABEL, COPILOT_ASSIGNEE, FOOTER};
use crate::spec_context::SpecContext;
use crate::tasks::{Priority, Task};

/// Title prefix of every feature issue.
pub const FEATURE_PREFIX: &str = "Feature: ";

/// Label marking a feature issue.
pub const FEATURE_LABEL: &str = "feature";

/// Sort rank for phases without a number.
const UNNUMBERED_PHASE_RANK: u64 = 999;

const FEATURE_INSTRUCTIONS: &str = "## Instructions for Copilot

Implement this feature by completing the tasks in order by phase.

1. **Work through phases sequentially** - Complete all tasks in Phase 1 before moving to Phase 2
2. **Check off tasks** - Mark each task complete as you finish it
3. **Follow existing patterns** - Match the code style and patterns in the repository
4. **Test your changes** - Add appropriate tests if applicable
5. **Single PR** - Create one pull request with all changes when complete

Use the architecture section above for guidance on structure and key decisions.";

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+-").expect("leading number pattern is valid"));

static PHASE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Phase (\d+)").expect("phase number pattern is valid"));

/// Renders the feature issue for a spec.
#[must_use]
pub fn feature_issue(
    spec_name: &str,
    context: Option<&SpecContext>,
    tasks: &[Task],
    copilot: bool,
) -> IssueDraft {
    let mut sections = vec![overview_section(spec_name, context)];
    sections.push(context.map(architecture_section).unwrap_or_default());
    sections.push(tasks_section(tasks));
    sections.push(files_section(tasks));
    if copilot {
        sections.push(FEATURE_INSTRUCTIONS.to_string());
    }
    sections.push(FOOTER.to_string());

    IssueDraft {
        title: feature_title(spec_name),
        body: join_sections(sections),
        labels: feature_labels(spec_name, tasks),
        assignee: copilot.then(|| COPILOT_ASSIGNEE.to_string()),
        milestone: None,
    }
}

/// `003-help-faq-page` becomes `Feature: Help Faq Page`.
#[must_use]
pub fn feature_title(spec_name: &str) -> String {
    let name = LEADING_NUMBER.replace(spec_name, "").replace('-', " ");
    format!("{FEATURE_PREFIX}{}", title_case(&name))
}

/// `feature`, `speckit`, the spec label, and the label of the highest
/// of Must, Should or Could present among the tasks.
#[must_use]
pub fn feature_labels(spec_name: &str, tasks: &[Task]) -> Vec<String> {
    let mut labels = vec![FEATURE_LABEL.to_string(), BASE_LABEL.to_string()];
    if !spec_name.is_empty() {
        labels.push(format!("spec:{spec_name}"));
    }
    let top = [Priority::Must, Priority::Should, Priority::Could]
        .into_iter()
        .find(|p| tasks.iter().any(|t| t.priority == *p));
    labels.extend(top.map(|p| p.label().to_string()));
    labels
}

/// Uppercases the first letter of every run of letters and lowercases
/// the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

fn overview_section(spec_name: &str, context: Option<&SpecContext>) -> String {
    let mut lines = vec!["## Overview".to_string(), String::new()];
    match context.filter(|c| !c.overview.is_empty()) {
        Some(ctx) => lines.push(ctx.overview.clone()),
        None => lines.push(format!("Implementation of the {spec_name} feature.")),
    }
    if let Some(ctx) = context.filter(|c| !c.success_criteria.is_empty()) {
        lines.extend(["".into(), "### Success Criteria".into(), "".into()]);
        lines.push(ctx.success_criteria.clone());
    }
    lines.join("\n")
}

/// Target state and key decisions; the architecture overview only stands
/// in when there is no target state.
fn architecture_section(ctx: &SpecContext) -> String {
    if ctx.architecture_overview.is_empty()
        && ctx.target_state.is_empty()
        && ctx.key_decisions.is_empty()
    {
        return String::new();
    }

    let mut lines = vec!["## Architecture".to_string()];
    if !ctx.target_state.is_empty() {
        lines.extend(["".into(), "### Target State".into(), "".into()]);
        lines.push(ctx.target_state.clone());
    }
    if !ctx.key_decisions.is_empty() {
        lines.extend(["".into(), "### Key Decisions".into(), "".into()]);
        lines.push(ctx.key_decisions.clone());
    }
    if !ctx.architecture_overview.is_empty() && ctx.target_state.is_empty() {
        lines.push(String::new());
        lines.push(ctx.architecture_overview.clone());
    }
    lines.join("\n")
}

fn phase_sort_key(phase: &str) -> (u64, &str) {
    let number = PHASE_NUMBER
        .captures(phase)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(UNNUMBERED_PHASE_RANK);
    (number, phase)
}

fn tasks_section(tasks: &[Task]) -> String {
    let mut by_phase: HashMap<&str, Vec<&Task>> = HashMap::new();
    for task in tasks {
        by_phase.entry(task.phase.as_str()).or_default().push(task);
    }
    let mut phases: Vec<&str> = by_phase.keys().copied().collect();
    phases.sort_by_key(|p| phase_sort_key(p));

    let mut lines = vec!["## Implementation Tasks".to_string()];
    for phase in phases {
        lines.extend([String::new(), format!("### {phase}"), String::new()]);
        for task in &by_phase[phase] {
            let checkbox = if task.is_complete() { 'x' } else { ' ' };
            let estimate = if task.estimate.is_empty() {
                String::new()
            } else {
                format!(" ({})", task.estimate)
            };
            lines.push(format!("- [{checkbox}] **{}**: {}{estimate}", task.id, task.title));
            for criterion in &task.acceptance_criteria {
                lines.push(format!("  - {}", criterion.text));
            }
            if let Some(file) = &task.file_path {
                lines.push(format!("  - 📁 `{file}`"));
            }
        }
    }
    lines.join("\n")
}

fn files_section(tasks: &[Task]) -> String {
    let files: BTreeSet<String> = tasks.iter().flat_map(Task::file_paths).collect();
    if files.is_empty() {
        return String::new();
    }
    let mut lines = vec!["## Files to Modify".to_string(), String::new()];
    lines.extend(files.iter().map(|f| format!("- `{f}`")));
    lines.join("\n")
}
