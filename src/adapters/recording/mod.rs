//! Recording adapters that capture interactions to cassettes.

pub mod filesystem;
pub mod issues;
pub mod shell;

use std::sync::{Arc, Mutex};

use serde::Serialize;

pub use filesystem::RecordingFileSystem;
pub use issues::RecordingIssueTracker;
pub use shell::RecordingShellExecutor;

use crate::cassette::recorder::CassetteRecorder;

/// Record an interaction with a simple (non-Result) return value.
///
/// Mirror of `replaying::next_output` - records input/output instead of reading.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");
    write(recorder, port, method, input_json, output_json);
}

/// Record a `Result<T, E>` whose error only survives as text.
///
/// Mirror of `replaying::replay_result`:
/// - `Ok(v)` is serialized as `{"Ok": v}`
/// - `Err(e)` is serialized as `{"Err": e.to_string()}`
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize Ok value");
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };
    write(recorder, port, method, input_json, output_json);
}

/// Record a `Result<T, E>` with a serializable error, keeping the variant.
///
/// Mirror of `replaying::replay_typed_result`. `Result` itself serializes
/// as `{"Ok": v}` or `{"Err": e}`.
pub(crate) fn record_typed_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(result).expect("failed to serialize recording result");
    write(recorder, port, method, input_json, output_json);
}

fn write(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input, output);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use serde_json::json;

    fn recorder() -> (tempfile::TempDir, Arc<Mutex<CassetteRecorder>>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.cassette.yaml");
        (dir, Arc::new(Mutex::new(CassetteRecorder::new(path, "t", "abc"))))
    }

    #[test]
    fn text_errors_lose_their_type() {
        let (_dir, rec) = recorder();
        let result: Result<u8, String> = Err("boom".into());
        record_result(&rec, "fs", "read_bytes", &json!({}), &result);
        record_result(&rec, "fs", "read_bytes", &json!({}), &Ok::<u8, String>(3));
        let rec = Arc::try_unwrap(rec).unwrap().into_inner().unwrap();
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn typed_errors_keep_their_variant() {
        let result: Result<String, TrackerError> = Err(TrackerError::RateLimited);
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"Err": "RateLimited"}));
        let ok: Result<String, TrackerError> = Ok("o/r".into());
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"Ok": "o/r"}));

        let (_dir, rec) = recorder();
        record_typed_result(&rec, "issues", "current_repo", &json!({}), &result);
        assert!(!rec.lock().unwrap().is_empty());
    }
}
