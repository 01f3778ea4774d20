//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (filesystem, shell, issue tracker).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod issues;
pub mod shell;

#[cfg(test)]
pub mod testing;

pub use filesystem::FileSystem;
pub use issues::{ExistingIssue, IssueDraft, IssueTracker};
pub use shell::{ShellExecutor, ShellOutput};
