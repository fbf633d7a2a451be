//! Transfer planner: composes the external transfer
//! binary's argument vector from a direction, a top-level folder, an
//! include-list and an option set. Grounded on
//! `original_source/datashuttle/utils/rclone.py`'s `handle_rclone_arguments`/
//! `rclone_args`, reshaped into a typed option record instead of a
//! dynamic dict.

use crate::resolver::ResolvedInclude;
use nb_types::TopLevelFolder;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    Never,
    Always,
    IfSourceNewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Normal,
    Verbose,
    VeryVerbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub overwrite: OverwritePolicy,
    pub dry_run: bool,
    pub show_progress: bool,
    pub verbosity: Verbosity,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            overwrite: OverwritePolicy::Never,
            dry_run: false,
            show_progress: false,
            verbosity: Verbosity::Normal,
        }
    }
}

/// A composed invocation, ready to hand to [`crate::invoke::run_transfer`]
/// or to a test harness that only wants to inspect the argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub args: Vec<String>,
}

/// Compose the `copy` argv for one upload/download.
pub fn plan_copy(
    direction: Direction,
    local_root: &Path,
    remote_name: &str,
    central_root: &Path,
    top_level_folder: TopLevelFolder,
    includes: &[ResolvedInclude],
    options: &TransferOptions,
) -> TransferPlan {
    let mut args = vec!["copy".to_string(), "--create-empty-src-dirs".to_string()];

    match options.verbosity {
        Verbosity::Normal => {}
        Verbosity::Verbose => args.push("-v".to_string()),
        Verbosity::VeryVerbose => args.push("-vv".to_string()),
    }

    match options.overwrite {
        OverwritePolicy::Never => args.push("--ignore-existing".to_string()),
        OverwritePolicy::IfSourceNewer => args.push("--update".to_string()),
        OverwritePolicy::Always => {}
    }

    if options.show_progress {
        args.push("--progress".to_string());
    }
    if options.dry_run {
        args.push("--dry-run".to_string());
    }

    for include in includes {
        args.push("--include".to_string());
        args.push(include.as_include_pattern());
    }

    let local_side = local_root
        .join(top_level_folder.as_str())
        .to_string_lossy()
        .into_owned();
    let central_side = format!(
        "{}:{}",
        remote_name,
        central_root.join(top_level_folder.as_str()).to_string_lossy()
    );

    match direction {
        Direction::Upload => {
            args.push(local_side);
            args.push(central_side);
        }
        Direction::Download => {
            args.push(central_side);
            args.push(local_side);
        }
    }

    TransferPlan { args }
}

/// Compose the `check --combined -` argv used for the diff report.
pub fn plan_check(
    local_root: &Path,
    remote_name: &str,
    central_root: &Path,
    top_level_folder: TopLevelFolder,
) -> TransferPlan {
    let local_side = local_root
        .join(top_level_folder.as_str())
        .to_string_lossy()
        .into_owned();
    let central_side = format!(
        "{}:{}",
        remote_name,
        central_root.join(top_level_folder.as_str()).to_string_lossy()
    );
    TransferPlan {
        args: vec![
            "check".to_string(),
            local_side,
            central_side,
            "--combined".to_string(),
            "-".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn include(path: &str) -> ResolvedInclude {
        ResolvedInclude {
            relative_path: PathBuf::from(path),
            is_dir: true,
        }
    }

    #[test]
    fn upload_puts_local_first() {
        let plan = plan_copy(
            Direction::Upload,
            Path::new("/data/myproject"),
            "ds_ssh_myproject",
            Path::new("/mnt/central/myproject"),
            TopLevelFolder::Rawdata,
            &[include("sub-001")],
            &TransferOptions::default(),
        );
        assert_eq!(plan.args[0], "copy");
        assert!(plan.args.contains(&"--ignore-existing".to_string()));
        let local_pos = plan
            .args
            .iter()
            .position(|a| a == "/data/myproject/rawdata")
            .unwrap();
        let central_pos = plan
            .args
            .iter()
            .position(|a| a.starts_with("ds_ssh_myproject:"))
            .unwrap();
        assert!(local_pos < central_pos);
    }

    #[test]
    fn download_puts_central_first() {
        let plan = plan_copy(
            Direction::Download,
            Path::new("/data/myproject"),
            "ds_ssh_myproject",
            Path::new("/mnt/central/myproject"),
            TopLevelFolder::Rawdata,
            &[],
            &TransferOptions::default(),
        );
        let local_pos = plan
            .args
            .iter()
            .position(|a| a == "/data/myproject/rawdata")
            .unwrap();
        let central_pos = plan
            .args
            .iter()
            .position(|a| a.starts_with("ds_ssh_myproject:"))
            .unwrap();
        assert!(central_pos < local_pos);
    }

    #[test]
    fn always_overwrite_adds_no_flag() {
        let options = TransferOptions {
            overwrite: OverwritePolicy::Always,
            ..Default::default()
        };
        let plan = plan_copy(
            Direction::Upload,
            Path::new("/data"),
            "remote",
            Path::new("/central"),
            TopLevelFolder::Rawdata,
            &[],
            &options,
        );
        assert!(!plan.args.contains(&"--ignore-existing".to_string()));
        assert!(!plan.args.contains(&"--update".to_string()));
    }
}
