//! Spec context: a bounded summary of the companion documents that sit
//! next to a task document.

pub mod assembler;
pub mod discovery;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use assembler::assemble;
pub use discovery::{discover, DiscoveredFile, Discovery};

pub use crate::config::ContextField;
use crate::markdown::line_count;

/// Assembled context across all companion documents.
///
/// Built once per run by [`assemble`]; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecContext {
    /// Folder the companion files were looked up in.
    pub spec_folder: PathBuf,
    /// Feature overview.
    pub overview: String,
    /// Success criteria.
    pub success_criteria: String,
    /// Architecture overview.
    pub architecture_overview: String,
    /// Target-state description.
    pub target_state: String,
    /// Technical approach.
    pub technical_approach: String,
    /// Key decisions.
    pub key_decisions: String,
    /// Data-model excerpt.
    pub data_model: String,
    /// Companion files that exist, in configured order.
    pub files_found: Vec<String>,
    /// Companion files that do not exist, in configured order.
    pub files_missing: Vec<String>,
    /// Fields whose text ends in a truncation marker.
    pub truncated_fields: Vec<ContextField>,
    /// Extraction warnings, each prefixed with a file or field name.
    pub warnings: Vec<String>,
}

impl SpecContext {
    /// Text of one field; empty if it was not populated.
    #[must_use]
    pub fn field(&self, field: ContextField) -> &str {
        match field {
            ContextField::Overview => &self.overview,
            ContextField::SuccessCriteria => &self.success_criteria,
            ContextField::ArchitectureOverview => &self.architecture_overview,
            ContextField::TargetState => &self.target_state,
            ContextField::TechnicalApproach => &self.technical_approach,
            ContextField::KeyDecisions => &self.key_decisions,
            ContextField::DataModel => &self.data_model,
        }
    }

    pub(crate) fn field_mut(&mut self, field: ContextField) -> &mut String {
        match field {
            ContextField::Overview => &mut self.overview,
            ContextField::SuccessCriteria => &mut self.success_criteria,
            ContextField::ArchitectureOverview => &mut self.architecture_overview,
            ContextField::TargetState => &mut self.target_state,
            ContextField::TechnicalApproach => &mut self.technical_approach,
            ContextField::KeyDecisions => &mut self.key_decisions,
            ContextField::DataModel => &mut self.data_model,
        }
    }

    /// Returns `true` if the field has text.
    #[must_use]
    pub fn has(&self, field: ContextField) -> bool {
        !self.field(field).is_empty()
    }

    /// `true` iff none of the primary fields (overview, architecture
    /// overview, technical approach, data model) has content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !ContextField::PRIMARY.iter().any(|f| self.has(*f))
    }

    /// Total lines across all populated fields.
    #[must_use]
    pub fn total_lines(&self) -> usize {
        ContextField::ALL.iter().map(|f| line_count(self.field(*f))).sum()
    }

    /// Populated fields in presentation order.
    pub fn populated(&self) -> impl Iterator<Item = (ContextField, &str)> {
        ContextField::ALL.into_iter().map(|f| (f, self.field(f))).filter(|(_, t)| !t.is_empty())
    }
}
