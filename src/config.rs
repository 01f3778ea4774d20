//! Configuration: extraction job tables, the context ceiling and label colors.
//!
//! Every table the assembler and the label step use is plain data here, so
//! callers and tests can swap in their own without touching global state.
//! A YAML file may override any part; missing keys keep their defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ports::FileSystem;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "SPECKIT_ISSUE_CONFIG";

/// The named prose fields of a spec context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    /// Feature overview from `spec.md`.
    Overview,
    /// Success criteria from `spec.md`.
    SuccessCriteria,
    /// Architecture overview from `plan.md`.
    ArchitectureOverview,
    /// Target-state description from `plan.md`.
    TargetState,
    /// Technical approach from `plan.md`.
    TechnicalApproach,
    /// Key decisions from `research.md`.
    KeyDecisions,
    /// Data-model excerpt from `data-model.md`.
    DataModel,
}

impl ContextField {
    /// All fields in presentation order.
    pub const ALL: [Self; 7] = [
        Self::Overview,
        Self::SuccessCriteria,
        Self::ArchitectureOverview,
        Self::TargetState,
        Self::TechnicalApproach,
        Self::KeyDecisions,
        Self::DataModel,
    ];

    /// Fields whose presence decides whether a context counts as empty.
    pub const PRIMARY: [Self; 4] =
        [Self::Overview, Self::ArchitectureOverview, Self::TechnicalApproach, Self::DataModel];

    /// Snake-case key, as used in config files and warnings.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::SuccessCriteria => "success_criteria",
            Self::ArchitectureOverview => "architecture_overview",
            Self::TargetState => "target_state",
            Self::TechnicalApproach => "technical_approach",
            Self::KeyDecisions => "key_decisions",
            Self::DataModel => "data_model",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::SuccessCriteria => "Success Criteria",
            Self::ArchitectureOverview => "Architecture Overview",
            Self::TargetState => "Target State",
            Self::TechnicalApproach => "Technical Approach",
            Self::KeyDecisions => "Key Decisions",
            Self::DataModel => "Data Model",
        }
    }

    /// Returns `true` for the four primary fields.
    #[must_use]
    pub fn is_primary(self) -> bool {
        Self::PRIMARY.contains(&self)
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One section to pull out of a companion document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionJob {
    /// Field the section fills.
    pub field: ContextField,
    /// Heading names to try, in order.
    pub candidates: Vec<String>,
    /// Heading ranks to try, in order.
    #[serde(default = "default_ranks")]
    pub ranks: Vec<usize>,
    /// Sub-heading (one rank deeper) to narrow the section to, when present.
    #[serde(default)]
    pub subsection: Option<String>,
    /// Per-field line ceiling.
    pub max_lines: usize,
}

fn default_ranks() -> Vec<usize> {
    vec![2]
}

impl ExtractionJob {
    fn new(field: ContextField, candidates: &[&str], ranks: &[usize], max_lines: usize) -> Self {
        Self {
            field,
            candidates: candidates.iter().map(ToString::to_string).collect(),
            ranks: ranks.to_vec(),
            subsection: None,
            max_lines,
        }
    }

    fn with_subsection(mut self, name: &str) -> Self {
        self.subsection = Some(name.to_string());
        self
    }
}

/// The jobs run against one companion file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentJobs {
    /// File name, resolved next to the task document.
    pub file: String,
    /// Jobs in the order they run.
    pub jobs: Vec<ExtractionJob>,
}

/// Settings for the Context Assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Maximum total lines across all populated fields.
    pub total_line_ceiling: usize,
    /// Companion files and their jobs, in discovery order.
    pub documents: Vec<DocumentJobs>,
    /// Fields trimmed first when the total ceiling is exceeded.
    pub trim_order: Vec<ContextField>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        use ContextField as F;
        Self {
            total_line_ceiling: 200,
            documents: vec![
                DocumentJobs {
                    file: "spec.md".into(),
                    jobs: vec![
                        ExtractionJob::new(F::Overview, &["Feature Overview", "Overview"], &[2], 30)
                            .with_subsection("Description"),
                        ExtractionJob::new(F::SuccessCriteria, &["Success Criteria"], &[3, 2], 15),
                    ],
                },
                DocumentJobs {
                    file: "plan.md".into(),
                    jobs: vec![
                        ExtractionJob::new(
                            F::ArchitectureOverview,
                            &["Architecture Overview", "Architecture"],
                            &[2],
                            40,
                        ),
                        ExtractionJob::new(F::TargetState, &["Target State"], &[3, 2], 30),
                        ExtractionJob::new(F::TechnicalApproach, &["Technical Approach"], &[2], 30),
                    ],
                },
                DocumentJobs {
                    file: "research.md".into(),
                    jobs: vec![ExtractionJob::new(
                        F::KeyDecisions,
                        &["Summary of Decisions", "Key Decisions", "Decisions"],
                        &[2],
                        30,
                    )],
                },
                DocumentJobs {
                    file: "data-model.md".into(),
                    jobs: vec![ExtractionJob::new(
                        F::DataModel,
                        &["Core Models", "Models"],
                        &[2],
                        50,
                    )],
                },
            ],
            trim_order: vec![
                F::DataModel,
                F::KeyDecisions,
                F::SuccessCriteria,
                F::TargetState,
                F::TechnicalApproach,
                F::ArchitectureOverview,
                F::Overview,
            ],
        }
    }
}

impl ContextConfig {
    /// Companion file names in configured order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.file.as_str())
    }
}

/// Colors for labels created on the tracker.
///
/// Keys are either full label names (`task`) or prefixes ending in `:` or
/// `-` (`spec:`, `phase-`). Exact names win over prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPalette {
    /// Label name or prefix to six-digit hex color (no `#`).
    pub colors: BTreeMap<String, String>,
    /// Color for labels with no entry.
    pub fallback: String,
}

impl Default for LabelPalette {
    fn default() -> Self {
        let colors = [
            ("task", "0075ca"),
            ("feature", "a2eeef"),
            ("speckit", "7057ff"),
            ("priority:high", "d73a4a"),
            ("priority:medium", "fbca04"),
            ("priority:low", "0e8a16"),
            ("priority:wont", "cfd3d7"),
            ("phase-", "1d76db"),
            ("spec:", "5319e7"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { colors, fallback: "ededed".into() }
    }
}

impl LabelPalette {
    /// Color for a label: exact entry, else longest matching prefix entry,
    /// else the fallback.
    #[must_use]
    pub fn color_for(&self, label: &str) -> &str {
        if let Some(color) = self.colors.get(label) {
            return color;
        }
        self.colors
            .iter()
            .filter(|(key, _)| key.ends_with([':', '-']) && label.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map_or(self.fallback.as_str(), |(_, color)| color.as_str())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Context assembly settings.
    pub context: ContextConfig,
    /// Label colors.
    pub labels: LabelPalette,
}

impl AppConfig {
    /// Loads a YAML config file through the filesystem port.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid config YAML.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs.read_bytes(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
    }

    /// Loads the explicit path, else the [`CONFIG_ENV`] path, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be loaded.
    pub fn resolve(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load(fs, &path),
            None => Ok(Self::default()),
        }
    }
}
