//! Scratch NeuroBlueprint project trees for integration tests.
//!
//! `ProjectFixture` builds a temp directory holding `<local_path>` and
//! lets a test grow `sub-*/ses-*/<datatype>` folders without hand-rolling
//! `std::fs::create_dir_all` calls at every call site (the teacher's
//! `SampleFiles` plays the analogous role for session-log fixtures).

use nb_config::ConfigFields;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Owns a temp directory for the duration of a test; dropping it removes
/// the tree. `local_path()` is the project root (`<tempdir>/<name>`), not
/// the tempdir itself, matching how `Configs::local_path` is defined.
pub struct ProjectFixture {
    _root: TempDir,
    local_path: PathBuf,
    project_name: String,
}

impl ProjectFixture {
    /// Create a bare project directory on disk, with no config and no
    /// `rawdata`/`derivatives` folders yet.
    pub fn new(project_name: &str) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let local_path = root.path().join(project_name);
        std::fs::create_dir_all(&local_path).expect("create local_path");
        Self {
            _root: root,
            local_path,
            project_name: project_name.to_string(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Create `<local_path>/<top_level_folder>/<sub>/<ses>/<datatype>` for
    /// every combination in the cross-product, returning the created
    /// datatype directories.
    pub fn make_folders(
        &self,
        top_level_folder: &str,
        subs: &[&str],
        sessions: &[&str],
        datatypes: &[&str],
    ) -> Vec<PathBuf> {
        let root = self.local_path.join(top_level_folder);
        let mut created = Vec::new();
        for sub in subs {
            for ses in sessions {
                for datatype in datatypes {
                    let dir = root.join(sub).join(ses).join(datatype);
                    std::fs::create_dir_all(&dir).expect("create datatype dir");
                    created.push(dir);
                }
            }
        }
        created
    }

    /// Create a bare subject-level folder (no sessions), used for
    /// subject-level-datatype fixtures (e.g. `anat` directly under `sub-001`).
    pub fn make_subject_datatype(&self, top_level_folder: &str, sub: &str, datatype: &str) -> PathBuf {
        let dir = self.local_path.join(top_level_folder).join(sub).join(datatype);
        std::fs::create_dir_all(&dir).expect("create subject-level datatype dir");
        dir
    }

    /// Drop an empty placeholder file under an existing directory, useful
    /// for transfer-planner tests that need at least one file to diff.
    pub fn touch(&self, relative: &Path) -> PathBuf {
        let path = self.local_path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, b"").expect("write placeholder file");
        path
    }

    /// Point `DATASHUTTLE_HOME` at a fresh temp directory and call
    /// `make_config_file` for this fixture's project, local-only by
    /// default. The returned guard must be held for as long as config
    /// operations under `DATASHUTTLE_HOME` are exercised; dropping it
    /// leaves the env var set (tests that need isolation should pair this
    /// with their own `HOME_LOCK`-style serialisation, mirroring the
    /// pattern in `nb-config`'s own tests).
    pub fn with_local_config(&self, fields: ConfigFields) -> nb_config::Result<nb_types::Configs> {
        nb_config::make_config_file(&self.project_name, self.local_path.clone(), fields)
    }
}

/// Redirects `DATASHUTTLE_HOME` to a scratch directory for the duration
/// of the closure, restoring the previous value (or unsetting it) on
/// return. Centralises the `with_temp_home` pattern duplicated across
/// `nb-config`'s and `nb-sdk`'s own unit tests so integration tests in
/// `nb-cli` don't have to reimplement it.
pub fn with_datashuttle_home<T>(f: impl FnOnce(&Path) -> T) -> T {
    let home = tempfile::tempdir().expect("tempdir");
    let previous = std::env::var_os("DATASHUTTLE_HOME");
    std::env::set_var("DATASHUTTLE_HOME", home.path());
    let result = f(home.path());
    match previous {
        Some(value) => std::env::set_var("DATASHUTTLE_HOME", value),
        None => std::env::remove_var("DATASHUTTLE_HOME"),
    }
    result
}
