use nb_testing::ProjectFixture;
use std::path::Path;
use tempfile::TempDir;

/// A `neuroshuttle` binary invocation pinned to a scratch project tree
/// and an isolated `DATASHUTTLE_HOME`, so CLI integration tests never
/// touch the invoking user's real `~/.datashuttle`.
pub struct TestFixture {
    project: ProjectFixture,
    home: TempDir,
}

impl TestFixture {
    pub fn new(project_name: &str) -> Self {
        Self {
            project: ProjectFixture::new(project_name),
            home: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn local_path(&self) -> &Path {
        self.project.local_path()
    }

    pub fn project_name(&self) -> &str {
        self.project.project_name()
    }

    pub fn make_folders(
        &self,
        top_level_folder: &str,
        subs: &[&str],
        sessions: &[&str],
        datatypes: &[&str],
    ) -> Vec<std::path::PathBuf> {
        self.project
            .make_folders(top_level_folder, subs, sessions, datatypes)
    }

    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = nb_testing::process::neuroshuttle_cmd(self.home.path());
        cmd.arg("--project").arg(self.project_name());
        cmd
    }

    /// Run `make-config --local-path <local_path>` so the project exists
    /// under this fixture's isolated `DATASHUTTLE_HOME`.
    pub fn make_config(&self) {
        self.command()
            .arg("make-config")
            .arg("--local-path")
            .arg(self.local_path())
            .assert()
            .success();
    }
}
