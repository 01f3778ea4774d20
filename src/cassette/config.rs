//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::format::Cassette;
use super::replayer::CassetteReplayer;
use super::session::cassette_path;

/// Replayer shared by the adapters it serves.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Per-port cassette file paths. Ports without a cassette panic if called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the filesystem port cassette file.
    pub fs: Option<PathBuf>,
    /// Path to the raw `gh` invocation cassette file.
    pub shell: Option<PathBuf>,
    /// Path to the issue tracker port cassette file.
    pub issues: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
#[derive(Default)]
pub struct PortReplayers {
    /// Replayer for the filesystem port.
    pub fs: Option<SharedReplayer>,
    /// Replayer for the shell port.
    pub shell: Option<SharedReplayer>,
    /// Replayer for the issue tracker port.
    pub issues: Option<SharedReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points at every cassette a recording session left in `dir`; ports
    /// whose file does not exist stay unconfigured.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let existing = |port: &str| Some(cassette_path(dir, port)).filter(|p| p.exists());
        Self { fs: existing("fs"), shell: existing("shell"), issues: existing("issues") }
    }

    /// Load a cassette file and create a single replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_monolithic(path: &Path) -> Result<CassetteReplayer, String> {
        Cassette::load(path).map(|cassette| CassetteReplayer::new(&cassette))
    }

    fn load_shared(path: &Path) -> Result<SharedReplayer, String> {
        Self::load_monolithic(path).map(|r| Arc::new(Mutex::new(r)))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            fs: self.fs.as_deref().map(Self::load_shared).transpose()?,
            shell: self.shell.as_deref().map(Self::load_shared).transpose()?,
            issues: self.issues.as_deref().map(Self::load_shared).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        cassette.save(path).unwrap();
    }

    fn exists_call(path: &str, found: bool) -> Interaction {
        Interaction {
            seq: 0,
            port: "fs".into(),
            method: "exists".into(),
            input: json!({ "path": path }),
            output: json!(found),
        }
    }

    #[test]
    fn load_monolithic_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.cassette.yaml");
        write_cassette(
            &path,
            vec![
                exists_call("/a/tasks.md", true),
                Interaction {
                    seq: 1,
                    port: "issues".into(),
                    method: "current_repo".into(),
                    input: json!({}),
                    output: json!({"Ok": "o/r"}),
                },
            ],
        );

        let mut replayer = CassetteConfig::load_monolithic(&path).unwrap();
        let exists = replayer.next_interaction("fs", "exists", &json!({"path": "/a/tasks.md"}));
        assert_eq!(exists.unwrap().output, json!(true));
        let repo = replayer.next_interaction("issues", "current_repo", &json!({}));
        assert_eq!(repo.unwrap().output, json!({"Ok": "o/r"}));
    }

    #[test]
    fn unreadable_cassette_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.cassette.yaml");
        std::fs::write(&path, "interactions: [").unwrap();
        let err = CassetteConfig::load_monolithic(&path).err().unwrap();
        assert!(err.starts_with("Failed to parse cassette file"));

        let absent = dir.path().join("absent.yaml");
        let missing = CassetteConfig::load_monolithic(&absent).err().unwrap();
        assert!(missing.starts_with("Failed to read cassette file"));
    }

    #[test]
    fn session_dir_picks_up_existing_cassettes() {
        let dir = tempfile::tempdir().unwrap();
        write_cassette(&cassette_path(dir.path(), "fs"), vec![exists_call("/a", false)]);

        let config = CassetteConfig::from_session_dir(dir.path());
        assert!(config.fs.is_some());
        assert!(config.shell.is_none());
        assert!(config.issues.is_none());

        let replayers = config.load_all().unwrap();
        let fs = replayers.fs.unwrap();
        let exists = fs.lock().unwrap().next_interaction("fs", "exists", &json!({"path": "/a"}));
        assert_eq!(exists.unwrap().output, json!(false));
        assert!(replayers.issues.is_none());
    }

    #[test]
    fn load_all_with_no_cassettes() {
        let replayers = CassetteConfig::panic_on_unspecified().load_all().unwrap();
        assert!(replayers.fs.is_none());
        assert!(replayers.shell.is_none());
        assert!(replayers.issues.is_none());
    }
}
