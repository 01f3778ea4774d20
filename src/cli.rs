//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for `speckit-issue`.
#[derive(Debug, Parser)]
#[command(
    name = "speckit-issue",
    version,
    about = "Turn spec-kit tasks.md files into GitHub issues"
)]
pub struct Cli {
    /// YAML config file; falls back to `$SPECKIT_ISSUE_CONFIG`, then defaults.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show detailed output and debug logs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create issues from a tasks.md file.
    ///
    /// By default one feature issue holds every task. Use --granular for one
    /// issue per task.
    Create(CreateArgs),

    /// Show sync status between tasks and tracker issues.
    Status {
        /// Path to tasks.md.
        tasks_file: PathBuf,

        /// Target repository (owner/repo).
        #[arg(short, long)]
        repo: Option<String>,
    },

    /// Print what a tasks.md file parses to, without contacting the tracker.
    Show {
        /// Path to tasks.md.
        tasks_file: PathBuf,

        /// Also assemble and print the spec context.
        #[arg(long)]
        context: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Flags for `create`.
#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// Path to tasks.md.
    pub tasks_file: PathBuf,

    /// Preview without creating issues.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Create one issue per task instead of a single feature issue.
    #[arg(short, long)]
    pub granular: bool,

    /// Skip tasks marked complete (only with --granular).
    #[arg(short, long)]
    pub skip_complete: bool,

    /// Format issues for the Copilot coding agent and assign them to it.
    #[arg(short = 'c', long)]
    pub assign_copilot: bool,

    /// Do not inject spec context into issues.
    #[arg(long)]
    pub no_context: bool,

    /// Create issues even if matching ones exist.
    #[arg(short, long)]
    pub force: bool,

    /// Target repository (owner/repo).
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Milestone to assign issues to.
    #[arg(short, long)]
    pub milestone: Option<String>,
}

/// How `show` prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    #[default]
    Text,
    /// YAML document.
    Yaml,
}
