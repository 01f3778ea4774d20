//! Task Block Parser.
//!
//! A line-oriented scanner over a task document. Phase headings (`## Phase
//! N: label`) set the current phase; task headings (`### T001: title`) open
//! a block that runs until the next heading of rank 3 or higher. Each line
//! inside a block goes through the field recognizers in [`super::fields`],
//! so one bad line only costs the field it would have set.
//!
//! Parsing never fails on content. Anything odd becomes a [`ParseWarning`].

use std::collections::HashMap;
use std::path::{Component, Path};

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{debug, warn};

use super::fields::{classify_line, BlockLine, FieldLabel, FieldValue};
use super::priority::Priority;
use super::result::{ParseResult, ParseWarning};
use super::task::{AcceptanceCriterion, Task, DONE_GLYPH, NO_DEPENDENCIES, UNASSIGNED_PHASE};
use crate::error::TaskFileError;
use crate::markdown::scan_lines;
use crate::ports::FileSystem;

/// Rank of phase headings.
const PHASE_RANK: usize = 2;

/// Rank of task headings.
const TASK_RANK: usize = 3;

static PHASE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Phase\s+\d+\s*:").expect("phase pattern is valid"));

static TASK_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]\d+)\s*:\s*(.*)$").expect("task heading pattern is valid")
});

static TASK_ID_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]\d+\b").expect("task id prefix pattern is valid"));

static SPEC_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:>\s*)?\*\*Spec:?\*\*:?\s*(.*)$")
        .expect("spec declaration pattern is valid")
});

/// Parses a task document.
///
/// `document_name` becomes the spec name unless the document declares one
/// with a `**Spec:**` line before its first phase or task heading.
#[must_use]
pub fn parse_tasks(text: &str, document_name: &str) -> ParseResult {
    let mut parser = Parser::new();
    for line in scan_lines(text) {
        match line.heading {
            Some(heading) => parser.heading(line.number, heading.rank, heading.text),
            // Code samples never carry fields or criteria.
            None if line.fenced => {}
            None => parser.body_line(line.number, line.text),
        }
    }
    parser.finish(document_name)
}

/// Reads and parses the primary task document through the filesystem port.
///
/// Invalid UTF-8 is replaced rather than rejected; a line-0 warning records
/// that it happened.
///
/// # Errors
///
/// Returns [`TaskFileError::NotFound`] if the file does not exist and
/// [`TaskFileError::Unreadable`] if it exists but cannot be read.
pub fn parse_tasks_file(fs: &dyn FileSystem, path: &Path) -> Result<ParseResult, TaskFileError> {
    if !fs.exists(path) {
        return Err(TaskFileError::NotFound(path.to_path_buf()));
    }
    let bytes = fs.read_bytes(path).map_err(|e| TaskFileError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let mut result = parse_tasks(&text, &spec_name_from_path(path));
    if std::str::from_utf8(&bytes).is_err() {
        warn!(path = %path.display(), "invalid UTF-8 replaced in task document");
        result.warnings.insert(0, ParseWarning::new(0, "invalid UTF-8 replaced"));
    }
    debug!(
        path = %path.display(),
        tasks = result.tasks.len(),
        phases = result.phases.len(),
        warnings = result.warnings.len(),
        "parsed task document"
    );
    Ok(result)
}

/// Derives a spec name from a task document path.
///
/// `specs/001-feature/tasks.md` gives `001-feature`; otherwise the parent
/// directory name is used.
#[must_use]
pub fn spec_name_from_path(path: &Path) -> String {
    let parts: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    // Only directories count; the last component is the file itself.
    let dirs = &parts[..parts.len().saturating_sub(1)];
    if let Some(name) = dirs.iter().position(|part| *part == "specs").and_then(|i| dirs.get(i + 1))
    {
        return (*name).to_string();
    }
    path.parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

struct Parser {
    phase: String,
    phases: Vec<String>,
    declared_spec: Option<String>,
    seen_structure: bool,
    block: Option<TaskBlock>,
    first_seen: HashMap<String, usize>,
    tasks: Vec<Task>,
    warnings: Vec<ParseWarning>,
}

impl Parser {
    fn new() -> Self {
        Self {
            phase: UNASSIGNED_PHASE.to_string(),
            phases: Vec::new(),
            declared_spec: None,
            seen_structure: false,
            block: None,
            first_seen: HashMap::new(),
            tasks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, line: usize, message: String) {
        warn!(line, "{message}");
        self.warnings.push(ParseWarning::new(line, message));
    }

    fn heading(&mut self, number: usize, rank: usize, text: &str) {
        if rank <= TASK_RANK {
            self.close_block();
        }
        if rank == PHASE_RANK {
            self.seen_structure = true;
            if PHASE_HEADING.is_match(text) {
                let name = text.trim().to_string();
                if !self.phases.contains(&name) {
                    self.phases.push(name.clone());
                }
                self.phase = name;
            }
        } else if rank == TASK_RANK {
            self.seen_structure = true;
            self.task_heading(number, text);
        }
    }

    fn task_heading(&mut self, number: usize, text: &str) {
        let marked_done = text.contains(DONE_GLYPH);
        let cleaned = text.replace(DONE_GLYPH, "");
        let cleaned = cleaned.trim();

        let Some(caps) = TASK_HEADING.captures(cleaned) else {
            if TASK_ID_PREFIX.is_match(cleaned) {
                self.warn(number, format!("skipped malformed task heading `{}`", text.trim()));
            }
            return;
        };
        let id = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();

        if title.is_empty() {
            self.warn(number, format!("skipped task heading without title `{}`", text.trim()));
            return;
        }
        if let Some(first) = self.first_seen.get(&id).copied() {
            self.warn(
                number,
                format!("duplicate task id {id} (first defined on line {first}); block skipped"),
            );
            return;
        }

        self.first_seen.insert(id.clone(), number);
        self.block = Some(TaskBlock::new(number, id, title, marked_done, self.phase.clone()));
    }

    fn body_line(&mut self, number: usize, text: &str) {
        if let Some(block) = self.block.as_mut() {
            if let Some(message) = block.absorb(text) {
                self.warn(number, message);
            }
            return;
        }
        if self.seen_structure || self.declared_spec.is_some() {
            return;
        }
        if let Some(caps) = SPEC_DECLARATION.captures(text) {
            let name = caps.get(1).map_or("", |m| m.as_str()).trim().trim_matches('`').trim();
            if !name.is_empty() {
                self.declared_spec = Some(name.to_string());
            }
        }
    }

    fn close_block(&mut self) {
        if let Some(block) = self.block.take() {
            let (task, warnings) = block.finish();
            for (line, message) in warnings {
                self.warn(line, message);
            }
            self.tasks.push(task);
        }
    }

    fn finish(mut self, document_name: &str) -> ParseResult {
        self.close_block();
        let spec_name = self.declared_spec.unwrap_or_else(|| document_name.to_string());
        for task in &mut self.tasks {
            task.spec_name.clone_from(&spec_name);
        }
        ParseResult { spec_name, tasks: self.tasks, phases: self.phases, warnings: self.warnings }
    }
}

/// Fields collected for one task heading.
struct TaskBlock {
    line: usize,
    id: String,
    title: String,
    marked_done: bool,
    phase: String,
    priority: FieldValue,
    estimate: FieldValue,
    dependencies: FieldValue,
    file: FieldValue,
    fr: FieldValue,
    nfr: FieldValue,
    criteria: Vec<AcceptanceCriterion>,
}

impl TaskBlock {
    fn new(line: usize, id: String, title: String, marked_done: bool, phase: String) -> Self {
        Self {
            line,
            id,
            title,
            marked_done,
            phase,
            priority: FieldValue::Absent,
            estimate: FieldValue::Absent,
            dependencies: FieldValue::Absent,
            file: FieldValue::Absent,
            fr: FieldValue::Absent,
            nfr: FieldValue::Absent,
            criteria: Vec::new(),
        }
    }

    fn slot(&mut self, label: FieldLabel) -> Option<&mut FieldValue> {
        match label {
            FieldLabel::Priority => Some(&mut self.priority),
            FieldLabel::Estimate => Some(&mut self.estimate),
            FieldLabel::Dependencies => Some(&mut self.dependencies),
            FieldLabel::File => Some(&mut self.file),
            FieldLabel::Fr => Some(&mut self.fr),
            FieldLabel::Nfr => Some(&mut self.nfr),
            FieldLabel::AcceptanceCriteria => None,
        }
    }

    /// Takes one body line; returns a warning message for a repeated label.
    fn absorb(&mut self, text: &str) -> Option<String> {
        match classify_line(text) {
            BlockLine::Field { label, value } => {
                let id = self.id.clone();
                let slot = self.slot(label)?;
                if slot.was_seen() {
                    return Some(format!("{id}: duplicate {} field ignored", label.name()));
                }
                *slot = value;
                None
            }
            BlockLine::Checkbox { checked, text } => {
                self.criteria.push(AcceptanceCriterion { text, checked });
                None
            }
            BlockLine::Other => None,
        }
    }

    fn finish(self) -> (Task, Vec<(usize, String)>) {
        let mut warnings = Vec::new();
        let id = self.id;
        let line = self.line;
        let mut required = |label: FieldLabel, value: FieldValue| -> Option<String> {
            match value {
                FieldValue::Absent => {
                    warnings.push((line, format!("{id}: missing required field {}", label.name())));
                    None
                }
                FieldValue::Blank => {
                    warnings.push((line, format!("{id}: empty value for field {}", label.name())));
                    None
                }
                FieldValue::Present(value) => Some(value),
            }
        };

        let priority_text = required(FieldLabel::Priority, self.priority);
        let estimate = required(FieldLabel::Estimate, self.estimate).unwrap_or_default();

        let priority = match priority_text {
            Some(text) => Priority::parse(&text).unwrap_or_else(|| {
                warnings.push((
                    line,
                    format!("{id}: unrecognized priority `{text}`, using {}", Priority::DEFAULT),
                ));
                Priority::DEFAULT
            }),
            None => Priority::DEFAULT,
        };

        let task = Task {
            title: self.title,
            priority,
            estimate,
            dependencies: self
                .dependencies
                .into_option()
                .unwrap_or_else(|| NO_DEPENDENCIES.to_string()),
            file_path: self.file.into_option(),
            fr_refs: self.fr.into_option(),
            nfr_refs: self.nfr.into_option(),
            phase: self.phase,
            acceptance_criteria: self.criteria,
            marked_done: self.marked_done,
            ..Task::new(id, String::new())
        };
        (task, warnings)
    }
}
