//! Context Assembler.
//!
//! Runs the configured extraction jobs over each companion file, truncates
//! each field to its own ceiling, then trims fields in `trim_order` until
//! the total fits the context ceiling. Nothing here returns an error: an
//! unreadable or non-UTF-8 file empties only its own fields and leaves a
//! warning.
//!
//! The trim pass always re-truncates from the untruncated section body, so
//! running it on the same input gives byte-identical output and markers
//! never stack.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use super::discovery::discover;
use super::{ContextField, SpecContext};
use crate::config::{ContextConfig, ExtractionJob};
use crate::markdown::{find_section, line_count, truncate_lines};
use crate::ports::FileSystem;

/// Untruncated text for one field and its per-field ceiling.
struct FieldSource {
    body: String,
    max_lines: usize,
}

/// Builds the spec context for a task document.
#[must_use]
pub fn assemble(fs: &dyn FileSystem, task_document: &Path, config: &ContextConfig) -> SpecContext {
    let names: Vec<&str> = config.file_names().collect();
    let discovery = discover(fs, task_document, &names);

    let mut ctx = SpecContext {
        spec_folder: discovery.folder.clone(),
        files_found: discovery.found(),
        files_missing: discovery.missing(),
        ..SpecContext::default()
    };

    let mut sources: BTreeMap<ContextField, FieldSource> = BTreeMap::new();
    for document in &config.documents {
        let Some(path) = discovery.path(&document.file) else {
            continue;
        };
        let bytes = match fs.read_bytes(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                push_warning(&mut ctx, format!("{}: failed to read: {e}", document.file));
                continue;
            }
        };
        let Ok(text) = std::str::from_utf8(&bytes) else {
            push_warning(&mut ctx, format!("{}: invalid UTF-8", document.file));
            continue;
        };

        for job in &document.jobs {
            if sources.contains_key(&job.field) {
                debug!(file = %document.file, field = %job.field, "field already filled");
                continue;
            }
            if let Some(body) = run_job(text, job) {
                debug!(
                    file = %document.file,
                    field = %job.field,
                    lines = line_count(&body),
                    "section extracted"
                );
                sources.insert(job.field, FieldSource { body, max_lines: job.max_lines });
            } else {
                debug!(file = %document.file, field = %job.field, "section not found");
            }
        }
    }

    for (field, source) in &sources {
        let cut = truncate_lines(&source.body, source.max_lines);
        *ctx.field_mut(*field) = cut.text;
    }
    enforce_ceiling(&mut ctx, &sources, config);

    ctx.truncated_fields =
        ContextField::ALL.into_iter().filter(|f| is_truncated(&ctx, &sources, *f)).collect();
    ctx
}

/// Runs one job; returns the untruncated section body if it has content.
fn run_job(text: &str, job: &ExtractionJob) -> Option<String> {
    let (rank, section) = job
        .ranks
        .iter()
        .find_map(|&rank| find_section(text, &job.candidates, rank).map(|s| (rank, s)))?;

    let body = job
        .subsection
        .as_ref()
        .and_then(|name| find_section(&section.body, std::slice::from_ref(name), rank + 1))
        .map(|sub| sub.body)
        .filter(|body| !body.is_empty())
        .unwrap_or(section.body);

    (!body.is_empty()).then_some(body)
}

/// Second pass: shrink or drop fields in trim order until the total fits.
fn enforce_ceiling(
    ctx: &mut SpecContext,
    sources: &BTreeMap<ContextField, FieldSource>,
    config: &ContextConfig,
) {
    let ceiling = config.total_line_ceiling;
    let mut total = ctx.total_lines();
    if total <= ceiling {
        return;
    }
    debug!(total, ceiling, "context over ceiling, trimming");

    // Fields left out of the configured order are trimmed last.
    let order = config
        .trim_order
        .iter()
        .copied()
        .chain(ContextField::ALL.into_iter().filter(|f| !config.trim_order.contains(f)));

    for field in order {
        if total <= ceiling {
            break;
        }
        let Some(source) = sources.get(&field) else {
            continue;
        };
        let current = line_count(ctx.field(field));
        if current == 0 {
            continue;
        }
        let target = current.saturating_sub(total - ceiling);
        if target >= 2 {
            let cut = truncate_lines(&source.body, target - 1);
            debug!(%field, from = current, to = cut.line_count, "field trimmed");
            total = total - current + cut.line_count;
            *ctx.field_mut(field) = cut.text;
        } else {
            ctx.field_mut(field).clear();
            total -= current;
            push_warning(ctx, format!("{field}: dropped to fit context ceiling"));
        }
    }
}

fn is_truncated(
    ctx: &SpecContext,
    sources: &BTreeMap<ContextField, FieldSource>,
    field: ContextField,
) -> bool {
    let text = ctx.field(field);
    !text.is_empty() && sources.get(&field).is_some_and(|s| s.body != text)
}

fn push_warning(ctx: &mut SpecContext, message: String) {
    warn!("{message}");
    ctx.warnings.push(message);
}
