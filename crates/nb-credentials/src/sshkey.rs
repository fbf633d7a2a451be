//! SSH key-pair lifecycle (spec §4.7, SPEC_FULL.md §3.2): generate a
//! private/public key pair under the project's state directory, then
//! install the public half on the remote's `~/.ssh/authorized_keys` so
//! later transfers can authenticate without a password.
//!
//! The source (`generate_and_write_ssh_key`/`setup_ssh_key` in
//! `datashuttle/utils/ssh.py`) generates the key pair in-process with
//! `paramiko.RSAKey.generate(4096)`, then opens its own SSH session to
//! append the public key remotely. Key generation and the one
//! interactive, password-authenticated remote command both shell out
//! here instead, matching the rest of this crate's backend layer
//! (`nb-backends::rclone`) and this one's own `hostkey` module, which
//! call an external binary rather than embed a protocol client.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;

pub const KEY_BITS: u32 = 4096;

pub fn public_key_path(private_key_path: &Path) -> std::path::PathBuf {
    let mut path = private_key_path.to_path_buf();
    let mut file_name = path.file_name().unwrap_or_default().to_os_string();
    file_name.push(".pub");
    path.set_file_name(file_name);
    path
}

/// Generate a 4096-bit RSA key pair at `private_key_path` (and its
/// `.pub` sibling) with no passphrase — the private key's confidentiality
/// comes from filesystem permissions in the user-scoped datashuttle
/// directory, not an interactive unlock on every transfer.
pub fn generate_key_pair(private_key_path: &Path, ssh_keygen_binary: &str) -> Result<()> {
    if let Some(parent) = private_key_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if private_key_path.exists() {
        std::fs::remove_file(private_key_path)?;
    }
    let public_key_path = public_key_path(private_key_path);
    if public_key_path.exists() {
        std::fs::remove_file(&public_key_path)?;
    }

    let status = Command::new(ssh_keygen_binary)
        .arg("-t")
        .arg("rsa")
        .arg("-b")
        .arg(KEY_BITS.to_string())
        .arg("-f")
        .arg(private_key_path)
        .arg("-N")
        .arg("")
        .arg("-q")
        .status()?;

    if !status.success() {
        return Err(Error::HostKeyRejected(format!(
            "{ssh_keygen_binary} exited with {status}"
        )));
    }
    Ok(())
}

/// Install the public half of `private_key_path` on
/// `<username>@<host>:~/.ssh/authorized_keys`, authenticating with a
/// password the user is prompted for interactively by the child process
/// (stdio is inherited, never captured by this crate). Run once per
/// remote during connection setup; later transfers authenticate with the
/// key alone.
pub fn install_public_key_on_remote(
    host: &str,
    username: &str,
    private_key_path: &Path,
    ssh_copy_id_binary: &str,
) -> Result<()> {
    let public_key_path = public_key_path(private_key_path);
    let status = Command::new(ssh_copy_id_binary)
        .arg("-i")
        .arg(&public_key_path)
        .arg(format!("{username}@{host}"))
        .status()?;

    if !status.success() {
        return Err(Error::HostKeyRejected(format!(
            "could not install public key on {host}: {ssh_copy_id_binary} exited with {status}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_path_appends_pub_suffix() {
        let private = Path::new("/home/user/.datashuttle/myproject/myproject_ssh_key");
        assert_eq!(
            public_key_path(private),
            Path::new("/home/user/.datashuttle/myproject/myproject_ssh_key.pub")
        );
    }
}
