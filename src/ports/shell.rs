//! Shell executor port for running external commands.

use serde::{Deserialize, Serialize};

/// The output of a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` if the process exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external programs.
///
/// Arguments are passed as a vector, never through a shell, so titles and
/// bodies with quotes or newlines reach the program unchanged.
pub trait ShellExecutor: Send + Sync {
    /// Runs `program` with `args` and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned (for example, it is
    /// not installed). A non-zero exit is reported through `exit_code`.
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>>;
}
