//! Typed errors for the primary task document, configuration and the issue
//! tracker.
//!
//! Everything else (missing companion files, odd task blocks, unknown
//! priorities) is a warning carried alongside a valid result.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The primary task document could not be obtained.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum TaskFileError {
    /// The path does not exist.
    #[error("Tasks file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path exists but reading it failed.
    #[error("Failed to read tasks file {}: {message}", .path.display())]
    Unreadable {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },
}

/// A named configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {message}", .path.display())]
    Read {
        /// Config path.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },

    /// The file is not valid configuration YAML.
    #[error("Failed to parse config {}: {message}", .path.display())]
    Parse {
        /// Config path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Failures reported by the issue tracker.
///
/// Serializable so recorded sessions keep the variant, not just the text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TrackerError {
    /// The tracker CLI is not installed.
    #[error("GitHub CLI (gh) is not installed. Install from https://cli.github.com")]
    NotInstalled,

    /// The tracker CLI is not logged in.
    #[error("Not logged in to GitHub. Run 'gh auth login' to authenticate.")]
    NotAuthenticated,

    /// The repository could not be determined or accessed.
    #[error("Repository error: {0}")]
    Repository(String),

    /// The tracker's API rate limit was hit.
    #[error("GitHub API rate limit exceeded. Wait a few minutes.")]
    RateLimited,

    /// An issue could not be created.
    #[error("Failed to create issue: {0}")]
    Creation(String),

    /// The tracker command could not be run.
    #[error("Tracker command failed: {0}")]
    Command(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_file_errors_name_the_path() {
        let err = TaskFileError::NotFound(PathBuf::from("specs/x/tasks.md"));
        assert_eq!(err.to_string(), "Tasks file not found: specs/x/tasks.md");

        let err = TaskFileError::Unreadable {
            path: PathBuf::from("tasks.md"),
            message: "permission denied".into(),
        };
        assert_eq!(err.to_string(), "Failed to read tasks file tasks.md: permission denied");
    }

    #[test]
    fn tracker_error_round_trips_through_json() {
        let err = TrackerError::Creation("boom".into());
        let value = serde_json::to_value(&err).unwrap();
        let back: TrackerError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }
}
