//! SSH host-key lifecycle: one-time interactive accept,
//! persisted to a known-hosts file scoped to the project, then strict
//! checking thereafter. The source drives this over a live `paramiko`
//! session (`verify_ssh_remote_host`/`connect_client` in
//! `datashuttle/utils/ssh.py`); this crate instead shells out to
//! `ssh-keyscan`, matching the rest of the backend layer's pattern of
//! invoking an external binary rather than embedding a protocol client
//! (`nb-backends::rclone`).

use crate::error::{Error, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Command;

/// A host key as presented by the remote, before the caller has decided
/// whether to trust it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedHostKey {
    pub host: String,
    pub key_type: String,
    pub key_line: String,
}

/// Query the remote's host key via `ssh-keyscan`. Returns the first key
/// line found; the remote may offer several key types, but datashuttle
/// only ever needs one to fingerprint the host for the user.
pub fn fetch_host_key(host: &str, ssh_keyscan_binary: &str) -> Result<PresentedHostKey> {
    let output = Command::new(ssh_keyscan_binary)
        .arg("-t")
        .arg("rsa")
        .arg(host)
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let key_line = stdout
        .lines()
        .find(|line| !line.trim_start().starts_with('#') && !line.trim().is_empty())
        .ok_or_else(|| {
            Error::HostKeyRejected(format!("no host key returned for {host}"))
        })?
        .to_string();

    let key_type = key_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("ssh-rsa")
        .to_string();

    Ok(PresentedHostKey {
        host: host.to_string(),
        key_type,
        key_line,
    })
}

/// True if `hostkeys_path` already has an entry for `host` — i.e. strict
/// checking can proceed without prompting.
pub fn is_host_known(hostkeys_path: &Path, host: &str) -> Result<bool> {
    if !hostkeys_path.exists() {
        return Ok(false);
    }
    let file = std::fs::File::open(hostkeys_path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.split_whitespace().next() == Some(host) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Persist an accepted host key to the project's known-hosts file.
/// Appends rather than rewrites — the known-hosts file is append-only
/// during setup and read-only thereafter.
pub fn accept_host_key(hostkeys_path: &Path, presented: &PresentedHostKey) -> Result<()> {
    if let Some(parent) = hostkeys_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(hostkeys_path)?;
    writeln!(file, "{}", presented.key_line)?;
    Ok(())
}

/// Strict check for a connection that should already have gone through
/// `accept_host_key`: refuses rather than prompting if the host is
/// unknown or the key on file no longer matches what was accepted.
pub fn verify_strict(hostkeys_path: &Path, presented: &PresentedHostKey) -> Result<()> {
    if !hostkeys_path.exists() {
        return Err(Error::HostKeyRejected(format!(
            "no known host key on file for {}; run connection setup first",
            presented.host
        )));
    }
    let file = std::fs::File::open(hostkeys_path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.split_whitespace().next() == Some(presented.host.as_str()) {
            if line == presented.key_line {
                return Ok(());
            }
            return Err(Error::HostKeyRejected(format!(
                "host key for {} does not match the cached key; possible man-in-the-middle",
                presented.host
            )));
        }
    }
    Err(Error::HostKeyRejected(format!(
        "no known host key on file for {}; run connection setup first",
        presented.host
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key(host: &str) -> PresentedHostKey {
        PresentedHostKey {
            host: host.to_string(),
            key_type: "ssh-rsa".to_string(),
            key_line: format!("{host} ssh-rsa AAAAB3NzaC1yc2EAAAADAQABfakefakefake"),
        }
    }

    #[test]
    fn unknown_host_is_not_known() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostkeys");
        assert!(!is_host_known(&path, "example.org").unwrap());
    }

    #[test]
    fn accept_then_strict_check_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostkeys");
        let key = sample_key("example.org");
        accept_host_key(&path, &key).unwrap();
        assert!(is_host_known(&path, "example.org").unwrap());
        verify_strict(&path, &key).unwrap();
    }

    #[test]
    fn strict_check_without_prior_accept_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostkeys");
        let key = sample_key("example.org");
        let err = verify_strict(&path, &key).unwrap_err();
        assert!(matches!(err, Error::HostKeyRejected(_)));
    }

    #[test]
    fn strict_check_rejects_changed_key() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostkeys");
        let original = sample_key("example.org");
        accept_host_key(&path, &original).unwrap();

        let mut changed = original.clone();
        changed.key_line = "example.org ssh-rsa AAAAdifferentdifferentdifferent".to_string();
        let err = verify_strict(&path, &changed).unwrap_err();
        assert!(matches!(err, Error::HostKeyRejected(_)));
    }

    #[test]
    fn accept_is_append_only_across_multiple_hosts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostkeys");
        accept_host_key(&path, &sample_key("a.example.org")).unwrap();
        accept_host_key(&path, &sample_key("b.example.org")).unwrap();
        assert!(is_host_known(&path, "a.example.org").unwrap());
        assert!(is_host_known(&path, "b.example.org").unwrap());
    }
}
