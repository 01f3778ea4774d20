//! Live adapters for real external interactions.

pub mod filesystem;
pub mod issues;
pub mod shell;

pub use filesystem::LiveFileSystem;
pub use issues::GhIssueTracker;
pub use shell::LiveShellExecutor;
