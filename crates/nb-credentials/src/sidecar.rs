//! `rclone_ps_state.yaml` — a small sidecar recording, per connection
//! method, whether that method's backend config is currently encrypted.
//! Grounded in the source's `RCloneConfigs.load_rclone_config_is_encrypted`
//! / `set_rclone_config_encryption_state`: the whole file is rewritten on
//! every change rather than cached only in memory, so a concurrently
//! running process (e.g. a TUI) reading the file after this one writes it
//! never observes a stale value.

use crate::error::Result;
use nb_core::path;
use nb_types::ConnectionMethod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionState {
    #[serde(default)]
    pub ssh: bool,
    #[serde(default)]
    pub gdrive: bool,
    #[serde(default)]
    pub aws: bool,
}

impl Default for EncryptionState {
    fn default() -> Self {
        EncryptionState {
            ssh: false,
            gdrive: false,
            aws: false,
        }
    }
}

impl EncryptionState {
    fn get(&self, method: ConnectionMethod) -> bool {
        match method {
            ConnectionMethod::Ssh => self.ssh,
            ConnectionMethod::Gdrive => self.gdrive,
            ConnectionMethod::Aws => self.aws,
            ConnectionMethod::LocalFilesystem => false,
        }
    }

    fn set(&mut self, method: ConnectionMethod, value: bool) {
        match method {
            ConnectionMethod::Ssh => self.ssh = value,
            ConnectionMethod::Gdrive => self.gdrive = value,
            ConnectionMethod::Aws => self.aws = value,
            ConnectionMethod::LocalFilesystem => {}
        }
    }
}

/// Load the sidecar for `project_name`, creating it with all-`false`
/// defaults if it does not exist yet.
pub fn load(project_name: &str) -> Result<EncryptionState> {
    let state_path = path::rclone_state_path(project_name)?;
    if !state_path.exists() {
        let state = EncryptionState::default();
        save(project_name, &state)?;
        return Ok(state);
    }
    let content = std::fs::read_to_string(&state_path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn save(project_name: &str, state: &EncryptionState) -> Result<()> {
    let state_path = path::rclone_state_path(project_name)?;
    if let Some(parent) = state_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(state)?;
    std::fs::write(&state_path, yaml)?;
    Ok(())
}

pub fn is_encrypted(project_name: &str, method: ConnectionMethod) -> Result<bool> {
    Ok(load(project_name)?.get(method))
}

/// Rewrite the whole sidecar with `method`'s flag set to `value`.
pub fn set_encrypted(project_name: &str, method: ConnectionMethod, value: bool) -> Result<()> {
    let mut state = load(project_name)?;
    state.set(method, value);
    save(project_name, &state)
}
