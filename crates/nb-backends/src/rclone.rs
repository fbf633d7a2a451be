//! Listing backend for the remote connection methods (SSH/SFTP, S3,
//! Google Drive). All three shell out to the same external transfer
//! binary (named `rclone` on the `$PATH`, grounded on
//! `original_source/datashuttle/utils/rclone.py`'s `call_rclone`) against
//! a pre-created named remote — `setup_rclone_config_for_*` in the
//! original decides what goes in that remote; this module only lists,
//! checks existence and deletes through it.

use crate::error::{Error, Result};
use crate::traits::{ListingBackend, RemoteEntry};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// One record from `rclone lsjson`'s output array.
#[derive(Debug, Deserialize)]
struct LsJsonEntry {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "IsDir")]
    is_dir: bool,
    #[serde(rename = "ModTime")]
    mod_time: Option<String>,
}

/// A listing backend fronting one named rclone remote (e.g.
/// `central_for_myproject`, per
/// `original_source/datashuttle/configs/rclone_configs.py`'s naming
/// convention). `upload`/`download` argv composition for the actual
/// transfer lives in `nb-transfer`; this type only answers listing
/// questions the validator and resolver need.
pub struct RcloneBackend {
    id: &'static str,
    remote_name: String,
    binary: PathBuf,
}

impl RcloneBackend {
    pub fn new(id: &'static str, remote_name: impl Into<String>) -> Self {
        Self {
            id,
            remote_name: remote_name.into(),
            binary: PathBuf::from("rclone"),
        }
    }

    /// Override the binary path, e.g. in tests that stub it out.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    fn remote_path(&self, path: &Path) -> String {
        format!("{}:{}", self.remote_name, path.to_string_lossy())
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        self.binary
            .to_str()
            .ok_or_else(|| Error::BackendError("non-utf8 rclone binary path".to_string()))?;
        Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|err| classify_spawn_error(self.id, err))
    }
}

/// Exit-code/stderr classification shared with `nb-transfer`'s transfer
/// invoker: distinguishes auth failures and network errors
/// from other non-zero exits so callers can decide whether retrying or
/// re-prompting for credentials makes sense.
pub fn classify_output(id: &str, output: &Output) -> Result<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
    if stderr.contains("permission denied")
        || stderr.contains("authentication")
        || stderr.contains("auth failed")
        || stderr.contains("403")
    {
        return Err(Error::AuthFailed(format!("{id}: {stderr}")));
    }
    if stderr.contains("network")
        || stderr.contains("timeout")
        || stderr.contains("connection refused")
        || stderr.contains("could not resolve host")
        || stderr.contains("no route to host")
    {
        return Err(Error::NetworkError(format!("{id}: {stderr}")));
    }
    if stderr.contains("directory not found") || stderr.contains("object not found") {
        return Err(Error::NotFound(format!("{id}: {stderr}")));
    }
    Err(Error::BackendError(format!("{id}: {stderr}")))
}

fn classify_spawn_error(id: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::BackendError(format!(
            "{id}: transfer binary not found on PATH ({err})"
        ))
    } else {
        Error::Io(err)
    }
}

impl ListingBackend for RcloneBackend {
    fn id(&self) -> &'static str {
        self.id
    }

    fn list(&self, dir: &Path) -> Result<Vec<RemoteEntry>> {
        let remote = self.remote_path(dir);
        let output = self.run(&["lsjson", &remote])?;
        let stdout = classify_output(self.id, &output)?;
        let raw: Vec<LsJsonEntry> = serde_json::from_str(&stdout)
            .map_err(|err| Error::BackendError(format!("{}: malformed lsjson: {err}", self.id)))?;
        let mut entries: Vec<RemoteEntry> = raw
            .into_iter()
            .map(|entry| RemoteEntry {
                relative_path: PathBuf::from(entry.path),
                is_dir: entry.is_dir,
                modified: entry
                    .mod_time
                    .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
                    .map(|t| t.with_timezone(&Utc)),
            })
            .collect();
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let remote = self.remote_path(path);
        let output = self.run(&["lsjson", &remote])?;
        match classify_output(self.id, &output) {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let remote = self.remote_path(path);
        let output = self.run(&["purge", &remote])?;
        classify_output(self.id, &output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_output_detects_auth_failure() {
        let output = Output {
            status: fake_exit_status(1),
            stdout: Vec::new(),
            stderr: b"Fatal error: authentication failed".to_vec(),
        };
        let err = classify_output("ssh", &output).unwrap_err();
        assert!(matches!(err, Error::AuthFailed(_)));
    }

    #[test]
    fn classify_output_detects_network_error() {
        let output = Output {
            status: fake_exit_status(1),
            stdout: Vec::new(),
            stderr: b"dial tcp: connection refused".to_vec(),
        };
        let err = classify_output("ssh", &output).unwrap_err();
        assert!(matches!(err, Error::NetworkError(_)));
    }

    #[test]
    fn classify_output_defaults_to_backend_error() {
        let output = Output {
            status: fake_exit_status(1),
            stdout: Vec::new(),
            stderr: b"some other failure".to_vec(),
        };
        let err = classify_output("ssh", &output).unwrap_err();
        assert!(matches!(err, Error::BackendError(_)));
    }

    #[cfg(unix)]
    fn fake_exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(not(unix))]
    fn fake_exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}
