//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{next_output, replay_result, replay_value};
use crate::cassette::format::RecordedBytes;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Serves recorded filesystem results from a cassette.
pub struct ReplayingFileSystem {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingFileSystem {
    /// Create a replaying filesystem backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying filesystem with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

fn path_input(path: &Path) -> serde_json::Value {
    serde_json::json!({ "path": path.display().to_string() })
}

impl FileSystem for ReplayingFileSystem {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(self.replayer.as_ref(), "fs", "read_bytes", &path_input(path));
        replay_result::<RecordedBytes>(output).map(RecordedBytes::into_bytes)
    }

    fn exists(&self, path: &Path) -> bool {
        let output = next_output(self.replayer.as_ref(), "fs", "exists", &path_input(path));
        replay_value(output, "fs::exists")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::replayer;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn replays_text_and_raw_reads() {
        let fs = ReplayingFileSystem::new(replayer(vec![
            ("fs", "read_bytes", json!({"Ok": "file contents"})),
            ("fs", "read_bytes", json!({"Ok": [104, 255]})),
        ]));
        assert_eq!(fs.read_bytes(Path::new("/a")).unwrap(), b"file contents");
        assert_eq!(fs.read_bytes(Path::new("/b")).unwrap(), vec![104, 255]);
    }

    #[test]
    fn replays_read_error() {
        let fs = ReplayingFileSystem::new(replayer(vec![(
            "fs",
            "read_bytes",
            json!({"Err": "file not found"}),
        )]));
        let err = fs.read_bytes(Path::new("/missing")).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn replays_exists() {
        let fs = ReplayingFileSystem::new(replayer(vec![("fs", "exists", json!(true))]));
        assert!(fs.exists(Path::new("/tmp/test.txt")));
    }

    #[test]
    #[should_panic(expected = "Cassette mismatch at seq 0")]
    fn read_of_another_path_panics() {
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "fs".into(),
                method: "read_bytes".into(),
                input: json!({"path": "/specs/001/tasks.md"}),
                output: json!({"Ok": "# Tasks"}),
            }],
        };
        let fs = ReplayingFileSystem::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));
        let _ = fs.read_bytes(Path::new("/specs/002/tasks.md"));
    }

    #[test]
    #[should_panic(expected = "fs port not configured")]
    fn unconfigured_panics() {
        let _ = ReplayingFileSystem::unconfigured().exists(Path::new("/x"));
    }
}
