//! Path resolution for the persisted state layout described in spec §6:
//! `~/.datashuttle/<project_name>/` (configs, credentials, rclone state)
//! and `<local_path>/.datashuttle/` (per-project logs).

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Expand a leading `~/` to the user's home directory. Paths that are
/// already absolute, or that use any other `~user` form, pass through
/// unchanged — datashuttle configs never use `~user` forms.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Resolve the user-scoped datashuttle directory root: `~/.datashuttle`.
/// Priority mirrors the teacher's `resolve_workspace_path`: an explicit
/// override (env var), else the platform home directory.
pub fn datashuttle_home() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("DATASHUTTLE_HOME") {
        return Ok(expand_tilde(&env_path));
    }
    dirs::home_dir()
        .map(|home| home.join(".datashuttle"))
        .ok_or_else(|| Error::Config("could not determine home directory".to_string()))
}

/// `~/.datashuttle/<project_name>/` — holds `config.yaml`,
/// `persistent_settings.yaml`, `hostkeys`, the SSH private key,
/// `credentials/`, and `rclone/`.
pub fn project_state_dir(project_name: &str) -> Result<PathBuf> {
    Ok(datashuttle_home()?.join(project_name))
}

pub fn config_file_path(project_name: &str) -> Result<PathBuf> {
    Ok(project_state_dir(project_name)?.join("config.yaml"))
}

pub fn persistent_settings_path(project_name: &str) -> Result<PathBuf> {
    Ok(project_state_dir(project_name)?.join("persistent_settings.yaml"))
}

pub fn hostkeys_path(project_name: &str) -> Result<PathBuf> {
    Ok(project_state_dir(project_name)?.join("hostkeys"))
}

pub fn ssh_key_path(project_name: &str) -> Result<PathBuf> {
    Ok(project_state_dir(project_name)?.join(format!("{project_name}_ssh_key")))
}

pub fn rclone_state_path(project_name: &str) -> Result<PathBuf> {
    Ok(project_state_dir(project_name)?.join("rclone_ps_state.yaml"))
}

pub fn rclone_config_dir(project_name: &str) -> Result<PathBuf> {
    Ok(project_state_dir(project_name)?.join("rclone"))
}

/// `<local_path>/.datashuttle/` — the per-project metadata directory
/// holding logs and, on disk next to the project itself, run history.
pub fn local_metadata_dir(local_path: &Path) -> PathBuf {
    local_path.join(".datashuttle")
}

pub fn logs_dir(local_path: &Path) -> PathBuf {
    local_metadata_dir(local_path).join("logs")
}

/// `local_path`/`central_path` are suffixed by the project name if they do
/// not already end in it.
pub fn ensure_project_suffix(path: &Path, project_name: &str) -> PathBuf {
    if path
        .file_name()
        .map(|name| name == project_name)
        .unwrap_or(false)
    {
        path.to_path_buf()
    } else {
        path.join(project_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_project_suffix_appends_when_missing() {
        let path = Path::new("/data/projects");
        assert_eq!(
            ensure_project_suffix(path, "my_project"),
            PathBuf::from("/data/projects/my_project")
        );
    }

    #[test]
    fn ensure_project_suffix_is_idempotent() {
        let path = Path::new("/data/projects/my_project");
        assert_eq!(
            ensure_project_suffix(path, "my_project"),
            PathBuf::from("/data/projects/my_project")
        );
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde("/already/absolute"), PathBuf::from("/already/absolute"));
    }
}
