//! Replaying adapter for the `ShellExecutor` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Serves recorded command results from a cassette.
pub struct ReplayingShellExecutor {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingShellExecutor {
    /// Create a replaying shell executor backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying shell executor with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        let input = serde_json::json!({ "program": program, "args": args });
        let output = next_output(self.replayer.as_ref(), "shell", "run", &input);
        replay_result(output)
    }
}
