//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod issues;
pub mod shell;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use filesystem::ReplayingFileSystem;
pub use issues::ReplayingIssueTracker;
pub use shell::ReplayingShellExecutor;

use crate::cassette::replayer::CassetteReplayer;

/// Take the next recorded output for `port::method`, checking the call's
/// input against the recording.
///
/// Mirror of `recording::record_interaction`.
///
/// # Panics
///
/// Panics if no cassette was configured for the port, or the cassette
/// cannot serve this call.
pub(crate) fn next_output<I: Serialize>(
    replayer: Option<&Arc<Mutex<CassetteReplayer>>>,
    port: &str,
    method: &str,
    input: &I,
) -> serde_json::Value {
    let replayer = replayer.unwrap_or_else(|| {
        panic!("{port} port not configured in CassetteConfig: no cassette loaded for {port}")
    });
    let input = serde_json::to_value(input).expect("failed to serialize replay input");
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    match guard.next_interaction(port, method, &input) {
        Ok(interaction) => interaction.output,
        Err(e) => panic!("{e}"),
    }
}

/// Decode a plain recorded value.
///
/// # Panics
///
/// Panics if the recorded value does not have the expected shape.
pub(crate) fn replay_value<T: DeserializeOwned>(output: serde_json::Value, context: &str) -> T {
    serde_json::from_value(output)
        .unwrap_or_else(|e| panic!("{context}: recorded output has the wrong shape: {e}"))
}

/// Decode `{"Ok": v}` / `{"Err": "message"}`.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| format!("failed to decode recorded value: {e}").into())
}

/// Decode a serialized `Result<T, E>`, keeping the error variant.
///
/// Mirror of `recording::record_typed_result`.
///
/// # Panics
///
/// Panics if the recorded value is not a serialized `Result<T, E>`.
pub(crate) fn replay_typed_result<T, E>(output: serde_json::Value, context: &str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    replay_value(output, context)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    /// Builds a shared replayer from `(port, method, output)` triples.
    pub fn replayer(
        calls: Vec<(&str, &str, serde_json::Value)>,
    ) -> Arc<Mutex<CassetteReplayer>> {
        let interactions = calls
            .into_iter()
            .enumerate()
            .map(|(seq, (port, method, output))| Interaction {
                seq: seq as u64,
                port: port.into(),
                method: method.into(),
                input: serde_json::Value::Null,
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        Arc::new(Mutex::new(CassetteReplayer::new(&cassette)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use serde_json::json;

    #[test]
    fn replay_result_reads_both_arms() {
        let ok: Result<String, _> = replay_result(json!({"Ok": "x"}));
        assert_eq!(ok.unwrap(), "x");
        let err: Result<String, _> = replay_result(json!({"Err": "boom"}));
        assert_eq!(err.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn replay_typed_result_keeps_variant() {
        let result: Result<String, TrackerError> =
            replay_typed_result(json!({"Err": {"Repository": "gone"}}), "issues::current_repo");
        assert_eq!(result, Err(TrackerError::Repository("gone".into())));
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unconfigured_port_panics() {
        let _ = next_output(None, "issues", "list_issues", &serde_json::json!({}));
    }
}
