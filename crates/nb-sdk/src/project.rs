//! [`Project`]: the SDK's facade over a single project's configs, name
//! validation, and selective transfer (spec §6's "CLI surface" entry
//! points). Mirrors the teacher's `Client` — one façade type methods hang
//! off of, composing the lower crates rather than reimplementing any of
//! their logic.

use crate::cancellable;
use crate::error::{Error, Result};
use crate::logging;
use crate::precondition;
use chrono::Utc;
use nb_config::ConfigFields;
use nb_credentials::hostkey::PresentedHostKey;
use nb_transfer::{Direction, OverwritePolicy, ResolvedInclude, TransferOptions, Verbosity};
use nb_types::{ConnectionMethod, Configs, Name, TopLevelFolder};
use nb_validate::{DisplayMode, Issue, NameEntry, TreeScope};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn timestamp_now() -> String {
    Utc::now().format("%Y%m%dT%H%M%S").to_string()
}

/// A loaded or newly created project: its name and its current [`Configs`].
/// `Configs` is re-read from disk by [`Project::load`]/after
/// [`Project::update_config_file`] rather than cached indefinitely, since
/// spec §5 forbids concurrent callers mutating the on-disk record for the
/// same project but says nothing about this process being the only reader.
pub struct Project {
    project_name: String,
    configs: Configs,
}

impl Project {
    /// `make_config_file`: creates the on-disk config exactly
    /// once.
    pub fn create(project_name: &str, local_path: PathBuf, fields: ConfigFields) -> Result<Self> {
        let configs = nb_config::make_config_file(project_name, local_path, fields)?;
        Ok(Self {
            project_name: project_name.to_string(),
            configs,
        })
    }

    pub fn load(project_name: &str) -> Result<Self> {
        let configs = nb_config::load(project_name)?;
        Ok(Self {
            project_name: project_name.to_string(),
            configs,
        })
    }

    pub fn configs(&self) -> &Configs {
        &self.configs
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// `update_config_file`: copy-validate-swap.
    pub fn update_config_file(&mut self, fields: ConfigFields) -> Result<()> {
        self.configs = nb_config::update_config_file(&self.project_name, fields)?;
        Ok(())
    }

    // ---- folder creation -------------------------------------------------

    /// `create_folders`. Formats and validates every subject,
    /// session and datatype name against the existing project before
    /// touching disk, then creates the full cross-product of
    /// `sub × ses × datatype` directories.
    pub fn create_folders(
        &self,
        top_level_folder: TopLevelFolder,
        sub_names: &[String],
        ses_names: &[String],
        datatypes: &[String],
    ) -> Result<Vec<PathBuf>> {
        let clock = Utc::now().naive_utc();
        let subs = nb_types::format_names(sub_names, "sub", &clock)?;
        let sessions = nb_types::format_names(ses_names, "ses", &clock)?;

        let existing_subs: Vec<NameEntry> = nb_core::tree::list_subjects(
            &self.configs.local_path,
            top_level_folder,
        )
        .into_iter()
        .map(|entry| NameEntry::new(entry.name.to_basename()).at(entry.path))
        .collect();

        let new_sub_entries: Vec<NameEntry> =
            subs.iter().map(|s| NameEntry::new(s.clone())).collect();
        let issues = nb_validate::validate_new_names(&new_sub_entries, &existing_subs, None);
        if let Some(first) = issues.into_iter().next() {
            return Err(Error::Validation(vec![first]));
        }

        let root = self.configs.local_path.join(top_level_folder.as_str());
        let mut created = Vec::new();
        for sub in &subs {
            for ses in &sessions {
                for datatype in datatypes {
                    let dir = root.join(sub).join(ses).join(datatype);
                    std::fs::create_dir_all(&dir)?;
                    created.push(dir);
                }
            }
        }
        Ok(created)
    }

    // ---- validation --------------------------------------------------

    fn gather_tree_scope(
        &self,
        top_level_folder: TopLevelFolder,
        include_central: bool,
    ) -> Result<TreeScope> {
        let project_folder_name = self
            .configs
            .local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let local_names: Vec<NameEntry> = local_and_session_names(
            &self.configs.local_path,
            top_level_folder,
        );

        let central_names = if include_central {
            self.gather_central_names(top_level_folder)?
        } else {
            Vec::new()
        };

        Ok(TreeScope {
            project_folder_name,
            top_level_folder_name: top_level_folder.as_str().to_string(),
            local_names,
            central_names,
            datatype_folder_names: Vec::new(),
        })
    }

    fn gather_central_names(&self, top_level_folder: TopLevelFolder) -> Result<Vec<NameEntry>> {
        let Some(method) = self.configs.connection_method else {
            return Ok(Vec::new());
        };
        let Some(backend) = nb_backends::central_backend(&self.project_name, method) else {
            return Ok(Vec::new());
        };
        let central_path = self
            .configs
            .central_path
            .clone()
            .unwrap_or_else(|| self.configs.local_path.clone());
        let root = central_path.join(top_level_folder.as_str());
        let mut entries = Vec::new();
        collect_central_names(backend.as_ref(), &root, &PathBuf::new(), &mut entries)?;
        Ok(entries)
    }

    /// `validate_project`: full rule set over the
    /// requested display mode. `DisplayMode::Error` raises at the first
    /// issue; `Warn`/`Print` return the full batch.
    pub fn validate_project(
        &self,
        top_level_folder: TopLevelFolder,
        mode: DisplayMode,
        include_central: bool,
    ) -> Result<Vec<Issue>> {
        let scope = self.gather_tree_scope(top_level_folder, include_central)?;
        let templates = None;
        let issues = nb_validate::validate_project(&scope, templates, false);
        if mode == DisplayMode::Error {
            if let Some(first) = issues.into_iter().next() {
                return Err(Error::Validation(vec![first]));
            }
            return Ok(Vec::new());
        }
        Ok(issues)
    }

    /// `quick_validate_project`: local-only, warn-mode
    /// validation used for a fast sanity check before a transfer starts.
    pub fn quick_validate_project(&self, top_level_folder: TopLevelFolder) -> Result<Vec<Issue>> {
        self.validate_project(top_level_folder, DisplayMode::Warn, false)
    }

    // ---- transfer ------------------------------------------------------

    fn remote_name(&self) -> Option<String> {
        self.configs
            .connection_method
            .map(|m| nb_backends::rclone_remote_name(&self.project_name, m))
    }

    fn source_for(&self, direction: Direction) -> Result<(Box<dyn nb_backends::ListingBackend>, PathBuf)> {
        match direction {
            Direction::Upload => Ok((nb_backends::local_backend(), self.configs.local_path.clone())),
            Direction::Download => {
                let method = self.configs.connection_method.ok_or_else(|| {
                    Error::Precondition("no connection_method configured".to_string())
                })?;
                let backend = nb_backends::central_backend(&self.project_name, method)
                    .unwrap_or_else(nb_backends::local_backend);
                let root = self
                    .configs
                    .central_path
                    .clone()
                    .unwrap_or_else(|| self.configs.local_path.clone());
                Ok((backend, root))
            }
        }
    }

    /// `upload_custom`/`download_custom`: resolve the
    /// selector against whichever side of the transfer is the source, then
    /// plan and run the copy. An empty resolved include-list never invokes
    /// the transfer binary (spec §8's "Empty selector" scenario).
    pub fn transfer_custom(
        &self,
        direction: Direction,
        top_level_folder: TopLevelFolder,
        sub_selector: &[String],
        ses_selector: &[String],
        datatype_selector: &[String],
        options: &TransferOptions,
    ) -> Result<String> {
        precondition::require_not_local_only(&self.configs)?;

        let _sink = logging::open(
            &self.configs.local_path,
            match direction {
                Direction::Upload => "upload_custom",
                Direction::Download => "download_custom",
            },
            &timestamp_now(),
        )?;

        let (source_backend, source_root_base) = self.source_for(direction)?;
        let source_root = source_root_base.join(top_level_folder.as_str());
        let clock = Utc::now().naive_utc();
        let includes = nb_transfer::resolver::resolve_selector(
            source_backend.as_ref(),
            &source_root,
            sub_selector,
            ses_selector,
            datatype_selector,
            &clock,
        )?;

        if includes.is_empty() {
            tracing::info!("selector matched nothing; skipping transfer invocation");
            return Ok("0 files transferred (empty selector)".to_string());
        }

        self.run_copy(direction, top_level_folder, &includes, options)
    }

    fn run_copy(
        &self,
        direction: Direction,
        top_level_folder: TopLevelFolder,
        includes: &[ResolvedInclude],
        options: &TransferOptions,
    ) -> Result<String> {
        let remote_name = self.remote_name().ok_or_else(|| {
            Error::Precondition("no connection_method configured".to_string())
        })?;
        let central_root = self
            .configs
            .central_path
            .clone()
            .unwrap_or_else(|| self.configs.local_path.clone());

        let method = self.configs.connection_method.unwrap();
        let _password_guard = nb_credentials::as_command(&self.project_name, method)?;

        let plan = nb_transfer::plan_copy(
            direction,
            &self.configs.local_path,
            &remote_name,
            &central_root,
            top_level_folder,
            includes,
            options,
        );
        tracing::info!(args = ?plan.args, "running transfer plan");
        Ok(nb_transfer::run_transfer(&plan)?)
    }

    pub fn upload_rawdata(&self, options: &TransferOptions) -> Result<String> {
        self.transfer_custom(
            Direction::Upload,
            TopLevelFolder::Rawdata,
            &["all".to_string()],
            &["all".to_string()],
            &["all".to_string()],
            options,
        )
    }

    pub fn download_rawdata(&self, options: &TransferOptions) -> Result<String> {
        self.transfer_custom(
            Direction::Download,
            TopLevelFolder::Rawdata,
            &["all".to_string()],
            &["all".to_string()],
            &["all".to_string()],
            options,
        )
    }

    pub fn upload_derivatives(&self, options: &TransferOptions) -> Result<String> {
        self.transfer_custom(
            Direction::Upload,
            TopLevelFolder::Derivatives,
            &["all".to_string()],
            &["all".to_string()],
            &["all".to_string()],
            options,
        )
    }

    pub fn download_derivatives(&self, options: &TransferOptions) -> Result<String> {
        self.transfer_custom(
            Direction::Download,
            TopLevelFolder::Derivatives,
            &["all".to_string()],
            &["all".to_string()],
            &["all".to_string()],
            options,
        )
    }

    pub fn upload_entire_project(&self, options: &TransferOptions) -> Result<Vec<String>> {
        Ok(vec![
            self.upload_rawdata(options)?,
            self.upload_derivatives(options)?,
        ])
    }

    pub fn download_entire_project(&self, options: &TransferOptions) -> Result<Vec<String>> {
        Ok(vec![
            self.download_rawdata(options)?,
            self.download_derivatives(options)?,
        ])
    }

    /// `upload_specific_folder_or_file`/`download_specific_folder_or_file`
    ///: transfer exactly one path relative to the top-level
    /// folder, bypassing selector resolution entirely.
    pub fn transfer_specific_folder_or_file(
        &self,
        direction: Direction,
        top_level_folder: TopLevelFolder,
        relative_path: &Path,
        options: &TransferOptions,
    ) -> Result<String> {
        precondition::require_not_local_only(&self.configs)?;

        let _sink = logging::open(
            &self.configs.local_path,
            match direction {
                Direction::Upload => "upload_specific_folder_or_file",
                Direction::Download => "download_specific_folder_or_file",
            },
            &timestamp_now(),
        )?;

        let (source_backend, source_root_base) = self.source_for(direction)?;
        let source_root = source_root_base.join(top_level_folder.as_str());
        let full_path = source_root.join(relative_path);
        let is_dir = source_backend.exists(&full_path).unwrap_or(false)
            && full_path.extension().is_none();

        let include = ResolvedInclude {
            relative_path: relative_path.to_path_buf(),
            is_dir,
        };
        self.run_copy(direction, top_level_folder, &[include], options)
    }

    // ---- connection setup -----------------------------------------------

    /// `setup_ssh_connection`: generates an SSH key pair,
    /// verifies (or accepts) the remote's host key, and installs the
    /// public key on the remote. `accept_unknown_host` models the
    /// one-time interactive `y`/`n` prompt — the SDK never reads stdin
    /// itself.
    pub fn setup_ssh_connection(
        &self,
        ssh_keygen_binary: &str,
        ssh_copy_id_binary: &str,
        ssh_keyscan_binary: &str,
        accept_unknown_host: bool,
    ) -> Result<()> {
        precondition::require_connection_method(&self.configs, ConnectionMethod::Ssh)?;
        let host = self.configs.central_host_id.clone().ok_or_else(|| {
            Error::Precondition("central_host_id not set".to_string())
        })?;
        let username = self.configs.central_host_username.clone().ok_or_else(|| {
            Error::Precondition("central_host_username not set".to_string())
        })?;

        let hostkeys_path = nb_core::path::hostkeys_path(&self.project_name)?;
        let presented: PresentedHostKey =
            nb_credentials::hostkey::fetch_host_key(&host, ssh_keyscan_binary)?;

        if nb_credentials::hostkey::is_host_known(&hostkeys_path, &host)? {
            nb_credentials::hostkey::verify_strict(&hostkeys_path, &presented)?;
        } else if accept_unknown_host {
            nb_credentials::hostkey::accept_host_key(&hostkeys_path, &presented)?;
        } else {
            return Err(Error::Precondition(format!(
                "host key for {host} was not accepted"
            )));
        }

        let ssh_key_path = nb_core::path::ssh_key_path(&self.project_name)?;
        nb_credentials::sshkey::generate_key_pair(&ssh_key_path, ssh_keygen_binary)?;
        nb_credentials::sshkey::install_public_key_on_remote(
            &host,
            &username,
            &ssh_key_path,
            ssh_copy_id_binary,
        )?;
        Ok(())
    }

    /// `setup_aws_connection`: creates the rclone remote for
    /// the project's S3 bucket and optionally encrypts its config file.
    pub fn setup_aws_connection(&self, rclone_binary: &str, encrypt: bool) -> Result<()> {
        precondition::require_connection_method(&self.configs, ConnectionMethod::Aws)?;
        let access_key_id = self.configs.aws_access_key_id.clone().ok_or_else(|| {
            Error::Precondition("aws_access_key_id not set".to_string())
        })?;
        let region = self.configs.aws_region.clone().ok_or_else(|| {
            Error::Precondition("aws_region not set".to_string())
        })?;

        let remote_name = nb_backends::rclone_remote_name(&self.project_name, ConnectionMethod::Aws);
        let status = Command::new(rclone_binary)
            .args([
                "config",
                "create",
                &remote_name,
                "s3",
                "access_key_id",
                &access_key_id,
                "region",
                &region,
            ])
            .status()?;
        if !status.success() {
            return Err(Error::Precondition(format!(
                "{rclone_binary} config create exited with {status}"
            )));
        }

        if encrypt {
            nb_credentials::set(&self.project_name, ConnectionMethod::Aws)?;
        }
        Ok(())
    }

    /// `setup_gdrive_connection` (spec §4.7, §5, §9's "Async OAuth wait"):
    /// waits for the browser-driven OAuth flow to complete, polled via
    /// `poll_authorized_root_folder_id`, and then creates the rclone
    /// remote. Cancellable at any point before `poll` first returns
    /// `Some`.
    pub async fn setup_gdrive_connection<F>(
        &self,
        rclone_binary: &str,
        cancel: Arc<AtomicBool>,
        poll_interval: std::time::Duration,
        poll_authorized_root_folder_id: F,
    ) -> Result<()>
    where
        F: FnMut() -> Option<String>,
    {
        precondition::require_connection_method(&self.configs, ConnectionMethod::Gdrive)?;

        let root_folder_id = cancellable::wait_for_gdrive_oauth(
            cancel,
            poll_interval,
            poll_authorized_root_folder_id,
        )
        .await
        .ok_or_else(|| Error::Precondition("Google Drive OAuth wait was cancelled".to_string()))?;

        let remote_name =
            nb_backends::rclone_remote_name(&self.project_name, ConnectionMethod::Gdrive);
        let status = Command::new(rclone_binary)
            .args(["config", "create", &remote_name, "drive", "root_folder_id", &root_folder_id])
            .status()?;
        if !status.success() {
            return Err(Error::Precondition(format!(
                "{rclone_binary} config create exited with {status}"
            )));
        }
        Ok(())
    }

    // ---- next sub/ses ----------------------------------------------------

    /// `get_next_sub`: the next unused subject integer, zero-padded
    /// to the project's existing width (or 3 digits if no subject exists yet).
    pub fn get_next_sub(&self, top_level_folder: TopLevelFolder) -> String {
        let existing = nb_core::tree::list_subjects(&self.configs.local_path, top_level_folder);
        next_name(&existing.iter().map(|e| &e.name).collect::<Vec<_>>(), "sub")
    }

    /// `get_next_ses`: the next unused session integer within
    /// one subject, following the same width convention as `get_next_sub`.
    pub fn get_next_ses(&self, top_level_folder: TopLevelFolder, sub_name: &str) -> String {
        let sub_dir = self
            .configs
            .local_path
            .join(top_level_folder.as_str())
            .join(sub_name);
        let existing = nb_core::tree::list_sessions(&sub_dir);
        next_name(&existing.iter().map(|e| &e.name).collect::<Vec<_>>(), "ses")
    }
}

fn next_name(existing: &[&Name], prefix: &str) -> String {
    let default_width = 3;
    let (max_integer, width) = existing
        .iter()
        .map(|name| (name.integer_part(), name.integer_width()))
        .max_by_key(|(integer, _)| *integer)
        .map(|(integer, width)| (integer + 1, width))
        .unwrap_or((1, default_width));
    format!("{prefix}-{:0width$}", max_integer, width = width)
}

fn local_and_session_names(local_path: &Path, top_level_folder: TopLevelFolder) -> Vec<NameEntry> {
    let mut entries = Vec::new();
    for subject in nb_core::tree::list_subjects(local_path, top_level_folder) {
        entries.push(NameEntry::new(subject.name.to_basename()).at(subject.path.clone()));
        for session in nb_core::tree::list_sessions(&subject.path) {
            entries.push(NameEntry::new(session.name.to_basename()).at(session.path));
        }
    }
    entries
}

fn collect_central_names(
    backend: &dyn nb_backends::ListingBackend,
    dir: &Path,
    relative: &Path,
    out: &mut Vec<NameEntry>,
) -> Result<()> {
    let entries = match backend.list(dir) {
        Ok(entries) => entries,
        Err(nb_backends::Error::NotFound(_)) => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    for entry in entries {
        if !entry.is_dir {
            continue;
        }
        let basename = entry.relative_path.to_string_lossy().into_owned();
        if Name::parse(&basename).is_ok() {
            out.push(NameEntry::new(basename.clone()).at(relative.join(&basename)));
            if basename.starts_with("sub-") {
                collect_central_names(backend, &dir.join(&basename), &relative.join(&basename), out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static HOME_LOCK: Mutex<()> = Mutex::new(());

    fn with_temp_home<T>(f: impl FnOnce(&Path) -> T) -> T {
        let _guard = HOME_LOCK.lock().unwrap();
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("DATASHUTTLE_HOME", home.path());
        let result = f(home.path());
        std::env::remove_var("DATASHUTTLE_HOME");
        result
    }

    #[test]
    fn create_then_create_folders_then_validate_is_clean() {
        with_temp_home(|_home| {
            let project_dir = tempfile::tempdir().unwrap();
            let local_path = project_dir.path().join("myproject");
            std::fs::create_dir_all(&local_path).unwrap();

            let project = Project::create(
                "myproject",
                local_path.clone(),
                ConfigFields::default(),
            )
            .unwrap();

            let created = project
                .create_folders(
                    TopLevelFolder::Rawdata,
                    &["sub-001".to_string(), "sub-002".to_string()],
                    &["ses-001".to_string()],
                    &["ephys".to_string(), "behav".to_string()],
                )
                .unwrap();
            assert_eq!(created.len(), 4);
            for dir in &created {
                assert!(dir.is_dir());
            }

            let issues = project
                .validate_project(TopLevelFolder::Rawdata, DisplayMode::Warn, false)
                .unwrap();
            assert!(issues.is_empty());
        });
    }

    #[test]
    fn create_folders_rejects_duplicate_integer_with_different_tail() {
        with_temp_home(|_home| {
            let project_dir = tempfile::tempdir().unwrap();
            let local_path = project_dir.path().join("myproject");
            std::fs::create_dir_all(&local_path).unwrap();
            let project =
                Project::create("myproject", local_path.clone(), ConfigFields::default()).unwrap();

            project
                .create_folders(
                    TopLevelFolder::Rawdata,
                    &["sub-001_id-123".to_string()],
                    &["ses-001".to_string()],
                    &["ephys".to_string()],
                )
                .unwrap();

            let err = project
                .create_folders(
                    TopLevelFolder::Rawdata,
                    &["sub-001_id-125".to_string()],
                    &["ses-001".to_string()],
                    &["ephys".to_string()],
                )
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        });
    }

    #[test]
    fn get_next_sub_defaults_to_three_digit_width_when_empty() {
        with_temp_home(|_home| {
            let project_dir = tempfile::tempdir().unwrap();
            let local_path = project_dir.path().join("myproject");
            std::fs::create_dir_all(&local_path).unwrap();
            let project =
                Project::create("myproject", local_path, ConfigFields::default()).unwrap();
            assert_eq!(project.get_next_sub(TopLevelFolder::Rawdata), "sub-001");
        });
    }

    #[test]
    fn get_next_sub_continues_existing_width() {
        with_temp_home(|_home| {
            let project_dir = tempfile::tempdir().unwrap();
            let local_path = project_dir.path().join("myproject");
            std::fs::create_dir_all(local_path.join("rawdata/sub-007")).unwrap();
            let project =
                Project::create("myproject", local_path, ConfigFields::default()).unwrap();
            assert_eq!(project.get_next_sub(TopLevelFolder::Rawdata), "sub-008");
        });
    }

    #[test]
    fn transfer_on_local_only_project_is_rejected() {
        with_temp_home(|_home| {
            let project_dir = tempfile::tempdir().unwrap();
            let local_path = project_dir.path().join("myproject");
            std::fs::create_dir_all(&local_path).unwrap();
            let project =
                Project::create("myproject", local_path, ConfigFields::default()).unwrap();

            let err = project
                .upload_rawdata(&TransferOptions::default())
                .unwrap_err();
            assert!(matches!(err, Error::Precondition(_)));
        });
    }
}
