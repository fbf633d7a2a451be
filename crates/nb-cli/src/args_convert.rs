//! Conversions from the clap-facing arg enums in [`crate::args`] to the
//! SDK's own types, kept in one place so `commands.rs` stays a thin
//! dispatcher.

use crate::args::{ConnectionMethodArg, DisplayModeArg, OverwriteArg, TopLevelFolderArg};
use nb_sdk::{ConnectionMethod, DisplayMode, OverwritePolicy, TopLevelFolder};

impl From<TopLevelFolderArg> for TopLevelFolder {
    fn from(value: TopLevelFolderArg) -> Self {
        match value {
            TopLevelFolderArg::Rawdata => TopLevelFolder::Rawdata,
            TopLevelFolderArg::Derivatives => TopLevelFolder::Derivatives,
        }
    }
}

impl From<ConnectionMethodArg> for ConnectionMethod {
    fn from(value: ConnectionMethodArg) -> Self {
        match value {
            ConnectionMethodArg::LocalFilesystem => ConnectionMethod::LocalFilesystem,
            ConnectionMethodArg::Ssh => ConnectionMethod::Ssh,
            ConnectionMethodArg::Aws => ConnectionMethod::Aws,
            ConnectionMethodArg::Gdrive => ConnectionMethod::Gdrive,
        }
    }
}

impl From<DisplayModeArg> for DisplayMode {
    fn from(value: DisplayModeArg) -> Self {
        match value {
            DisplayModeArg::Error => DisplayMode::Error,
            DisplayModeArg::Warn => DisplayMode::Warn,
            DisplayModeArg::Print => DisplayMode::Print,
        }
    }
}

impl From<OverwriteArg> for OverwritePolicy {
    fn from(value: OverwriteArg) -> Self {
        match value {
            OverwriteArg::Never => OverwritePolicy::Never,
            OverwriteArg::Always => OverwritePolicy::Always,
            OverwriteArg::IfSourceNewer => OverwritePolicy::IfSourceNewer,
        }
    }
}
