//! Spec File Discovery: companion files next to a task document.
//!
//! Only existence is checked. A missing file is a normal outcome.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ports::FileSystem;

/// One expected companion file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// File name as configured (e.g. `plan.md`).
    pub name: String,
    /// Resolved path, when the file exists.
    pub path: Option<PathBuf>,
}

/// Discovery result in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Directory of the task document.
    pub folder: PathBuf,
    /// One entry per expected name.
    pub files: Vec<DiscoveredFile>,
}

impl Discovery {
    /// Names of files that exist.
    #[must_use]
    pub fn found(&self) -> Vec<String> {
        self.files.iter().filter(|f| f.path.is_some()).map(|f| f.name.clone()).collect()
    }

    /// Names of files that do not exist.
    #[must_use]
    pub fn missing(&self) -> Vec<String> {
        self.files.iter().filter(|f| f.path.is_none()).map(|f| f.name.clone()).collect()
    }

    /// Resolved path for `name`, if it exists.
    #[must_use]
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.files.iter().find(|f| f.name == name).and_then(|f| f.path.as_deref())
    }
}

/// Looks for each of `names` in the task document's directory.
#[must_use]
pub fn discover<S: AsRef<str>>(
    fs: &dyn FileSystem,
    task_document: &Path,
    names: &[S],
) -> Discovery {
    let folder = task_document.parent().map(Path::to_path_buf).unwrap_or_default();
    let files = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let candidate = folder.join(name);
            let path = fs.exists(&candidate).then_some(candidate);
            debug!(file = name, found = path.is_some(), "companion file");
            DiscoveredFile { name: name.to_string(), path }
        })
        .collect();
    Discovery { folder, files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::testing::MemFs;

    #[test]
    fn reports_found_and_missing_in_order() {
        let fs = MemFs::new();
        fs.insert("specs/001/plan.md", "# Plan");
        fs.insert("specs/001/data-model.md", "# Models");

        let names = ["spec.md", "plan.md", "research.md", "data-model.md"];
        let found = discover(&fs, Path::new("specs/001/tasks.md"), &names);

        assert_eq!(found.folder, PathBuf::from("specs/001"));
        assert_eq!(found.found(), vec!["plan.md", "data-model.md"]);
        assert_eq!(found.missing(), vec!["spec.md", "research.md"]);
        assert_eq!(found.path("plan.md"), Some(Path::new("specs/001/plan.md")));
        assert_eq!(found.path("spec.md"), None);
    }

    #[test]
    fn bare_file_name_resolves_in_current_directory() {
        let fs = MemFs::new();
        fs.insert("spec.md", "x");
        let found = discover(&fs, Path::new("tasks.md"), &["spec.md"]);
        assert_eq!(found.path("spec.md"), Some(Path::new("spec.md")));
    }

    #[test]
    fn nothing_found_is_not_an_error() {
        let fs = MemFs::new();
        let found = discover(&fs, Path::new("/nowhere/tasks.md"), &["spec.md", "plan.md"]);
        assert!(found.found().is_empty());
        assert_eq!(found.missing().len(), 2);
    }
}
