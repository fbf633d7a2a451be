//! clap argument surface, kept deliberately thin — one `Commands` variant per
//! `nb-sdk::Project` method, no flag does any work itself).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neuroshuttle", version, about = "NeuroBlueprint-aware project naming, validation, and selective transfer")]
pub struct Cli {
    /// Project name; resolves `~/.datashuttle/<project>/config.yaml`.
    #[arg(long, global = true)]
    pub project: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TopLevelFolderArg {
    Rawdata,
    Derivatives,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ConnectionMethodArg {
    LocalFilesystem,
    Ssh,
    Aws,
    Gdrive,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DisplayModeArg {
    Error,
    Warn,
    Print,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OverwriteArg {
    Never,
    Always,
    IfSourceNewer,
}

#[derive(clap::Args)]
pub struct TransferArgs {
    #[arg(long, value_enum, default_value = "rawdata")]
    pub top_level_folder: TopLevelFolderArg,

    /// Subject selector tokens (repeatable): literal names, or sentinels
    /// `all`/`all_sub`/`all_non_sub`.
    #[arg(long = "sub", value_delimiter = ',', default_value = "all")]
    pub sub_names: Vec<String>,

    #[arg(long = "ses", value_delimiter = ',', default_value = "all")]
    pub ses_names: Vec<String>,

    #[arg(long = "datatype", value_delimiter = ',', default_value = "all")]
    pub datatypes: Vec<String>,

    #[arg(long, value_enum, default_value = "never")]
    pub overwrite: OverwriteArg,

    #[arg(long)]
    pub dry_run: bool,

    #[arg(long)]
    pub progress: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// `make_config_file` — create this project's config exactly once.
    MakeConfig {
        #[arg(long)]
        local_path: PathBuf,
        #[arg(long)]
        central_path: Option<PathBuf>,
        #[arg(long, value_enum)]
        connection_method: Option<ConnectionMethodArg>,
        #[arg(long)]
        central_host_id: Option<String>,
        #[arg(long)]
        central_host_username: Option<String>,
        #[arg(long)]
        aws_access_key_id: Option<String>,
        #[arg(long)]
        aws_region: Option<String>,
        #[arg(long)]
        gdrive_root_folder_id: Option<String>,
    },

    /// `update_config_file` — copy-validate-swap a field patch.
    UpdateConfig {
        #[arg(long)]
        central_path: Option<PathBuf>,
        #[arg(long, value_enum)]
        connection_method: Option<ConnectionMethodArg>,
        #[arg(long)]
        central_host_id: Option<String>,
        #[arg(long)]
        central_host_username: Option<String>,
        #[arg(long)]
        aws_access_key_id: Option<String>,
        #[arg(long)]
        aws_region: Option<String>,
        #[arg(long)]
        gdrive_root_folder_id: Option<String>,
    },

    /// `create_folders` — create the sub×ses×datatype cross-product.
    CreateFolders {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
        #[arg(long = "sub", value_delimiter = ',')]
        sub_names: Vec<String>,
        #[arg(long = "ses", value_delimiter = ',')]
        ses_names: Vec<String>,
        #[arg(long = "datatype", value_delimiter = ',')]
        datatypes: Vec<String>,
    },

    /// `validate_project` — full static + project-wide ruleset.
    Validate {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
        #[arg(long, value_enum, default_value = "warn")]
        mode: DisplayModeArg,
        #[arg(long)]
        include_central: bool,
    },

    /// `quick_validate_project` — local-only, warn-mode sanity check.
    QuickValidate {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
    },

    /// `upload_custom`/`download_custom` — selector-driven transfer.
    Upload(TransferArgs),
    Download(TransferArgs),

    /// `upload_rawdata`/`download_rawdata`/`..._derivatives`/`..._entire_project`.
    UploadRawdata,
    DownloadRawdata,
    UploadDerivatives,
    DownloadDerivatives,
    UploadEntireProject,
    DownloadEntireProject,

    /// `upload_specific_folder_or_file`/`download_specific_folder_or_file`.
    UploadPath {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
        path: PathBuf,
    },
    DownloadPath {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
        path: PathBuf,
    },

    /// `setup_ssh_connection` — generate a keypair, verify the host key,
    /// install the public key on the remote.
    SetupSsh {
        #[arg(long, default_value = "ssh-keygen")]
        ssh_keygen_binary: String,
        #[arg(long, default_value = "ssh-copy-id")]
        ssh_copy_id_binary: String,
        #[arg(long, default_value = "ssh-keyscan")]
        ssh_keyscan_binary: String,
        /// Accept the remote's host key on first connect (the one-time
        /// interactive `y` prompt).
        #[arg(long)]
        accept_host_key: bool,
    },

    /// `setup_aws_connection`.
    SetupAws {
        #[arg(long, default_value = "rclone")]
        rclone_binary: String,
        #[arg(long)]
        encrypt: bool,
    },

    /// `setup_gdrive_connection` — waits for the browser-driven OAuth
    /// flow to finish, polling `--oauth-marker-file` for the authorized
    /// root folder id it is expected to contain once the flow completes.
    SetupGdrive {
        #[arg(long, default_value = "rclone")]
        rclone_binary: String,
        #[arg(long)]
        oauth_marker_file: PathBuf,
        #[arg(long, default_value_t = 2)]
        poll_interval_secs: u64,
    },

    /// `get_next_sub`.
    NextSub {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
    },

    /// `get_next_ses`.
    NextSes {
        #[arg(long, value_enum, default_value = "rawdata")]
        top_level_folder: TopLevelFolderArg,
        #[arg(long)]
        sub: String,
    },
}
