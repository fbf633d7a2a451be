//! Typed Configs record and PersistentSettings.
//! A closed sum/record type, not a dynamic dict — the
//! "Dynamic dict of configs → typed record" re-architecture recipe
//! applied uniformly across the whole crate, not just here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMethod {
    LocalFilesystem,
    Ssh,
    Aws,
    Gdrive,
}

impl ConnectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionMethod::LocalFilesystem => "local_filesystem",
            ConnectionMethod::Ssh => "ssh",
            ConnectionMethod::Aws => "aws",
            ConnectionMethod::Gdrive => "gdrive",
        }
    }
}

/// The closed set of AWS S3 bucket regions datashuttle recognises
/// (`datashuttle/configs/aws_regions.py` in the original implementation).
pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "eu-south-1",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-east-1",
    "sa-east-1",
    "il-central-1",
    "me-south-1",
    "af-south-1",
    "cn-north-1",
    "cn-northwest-1",
    "us-gov-east-1",
    "us-gov-west-1",
];

pub fn is_known_aws_region(region: &str) -> bool {
    AWS_REGIONS.contains(&region)
}

/// The Configs record. Cross-field validation lives in
/// `nb-config`, which owns the load/save/update lifecycle; this type only
/// carries the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configs {
    pub local_path: PathBuf,
    #[serde(default)]
    pub central_path: Option<PathBuf>,
    #[serde(default)]
    pub connection_method: Option<ConnectionMethod>,
    #[serde(default)]
    pub central_host_id: Option<String>,
    #[serde(default)]
    pub central_host_username: Option<String>,
    #[serde(default)]
    pub aws_access_key_id: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub gdrive_client_id: Option<String>,
    #[serde(default)]
    pub gdrive_root_folder_id: Option<String>,
}

impl Configs {
    /// A project whose configs lack both `central_path` and
    /// `connection_method`; transfer operations are forbidden on it.
    pub fn is_local_only(&self) -> bool {
        self.central_path.is_none() && self.connection_method.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopLevelFolder {
    Rawdata,
    Derivatives,
}

impl TopLevelFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            TopLevelFolder::Rawdata => "rawdata",
            TopLevelFolder::Derivatives => "derivatives",
        }
    }
}

impl Default for TopLevelFolder {
    fn default() -> Self {
        TopLevelFolder::Rawdata
    }
}

/// A name template: a pair of regexps with an on/off flag. Tag
/// tokens appearing in `sub`/`ses` are expanded to their regex-fragment
/// equivalent before matching (`nb-validate` does the expansion).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameTemplates {
    #[serde(default)]
    pub on: bool,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub ses: Option<String>,
}

/// TUI preference state — a subrecord of PersistentSettings. Its
/// exact fields are UI concerns the core only carries forward verbatim;
/// anything not modelled here round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TuiSettings {
    #[serde(default)]
    pub show_transfer_progress: bool,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(flatten)]
    pub extra: std::collections::BTreeMap<String, serde_yaml::Value>,
}

/// Small user-preference record persisted next to Configs.
/// Forward-compatible with missing keys: `PersistentSettings::load`
/// (in `nb-config`) fills any absent field from [`PersistentSettings::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentSettings {
    #[serde(default)]
    pub top_level_folder: TopLevelFolder,
    #[serde(default)]
    pub tui: TuiSettings,
    #[serde(default)]
    pub name_templates: NameTemplates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_only_project_has_no_central_fields() {
        let cfg = Configs {
            local_path: PathBuf::from("/data/myproject"),
            central_path: None,
            connection_method: None,
            central_host_id: None,
            central_host_username: None,
            aws_access_key_id: None,
            aws_region: None,
            gdrive_client_id: None,
            gdrive_root_folder_id: None,
        };
        assert!(cfg.is_local_only());
    }

    #[test]
    fn known_region_check() {
        assert!(is_known_aws_region("eu-west-2"));
        assert!(!is_known_aws_region("mars-central-1"));
    }

    #[test]
    fn persistent_settings_default_is_rawdata() {
        let settings = PersistentSettings::default();
        assert_eq!(settings.top_level_folder, TopLevelFolder::Rawdata);
    }
}
