//! The credential manager's public surface: `set`,
//! `as_command`, `remove`, `is_encrypted`, one call per connection
//! method. Consulted before any remote-listing or transfer call that
//! touches a non-local backend.

use crate::error::Result;
use crate::{keychain, sidecar};
use nb_types::ConnectionMethod;

/// Generate a fresh passphrase, store it in the OS keychain, and record
/// the method as encrypted in the sidecar. Re-running `set` rotates the
/// passphrase; the caller is responsible for re-encrypting the backend
/// config file with the new value.
pub fn set(project_name: &str, method: ConnectionMethod) -> Result<String> {
    let passphrase = keychain::generate_and_store(project_name, method)?;
    sidecar::set_encrypted(project_name, method, true)?;
    Ok(passphrase)
}

/// A guard that installs `RCLONE_PASSWORD_COMMAND` for the lifetime of a
/// single transfer-binary invocation and restores the previous value (or
/// unsets the variable) when dropped. `RCLONE_PASSWORD_COMMAND`'s value is
/// a shell command which, when run, prints the stored passphrase to
/// stdout — the transfer binary is expected to read it that way rather
/// than receive the secret as a plain argument or in its own environment
/// permanently.
pub struct PasswordCommandGuard {
    previous: Option<String>,
}

impl Drop for PasswordCommandGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => std::env::set_var("RCLONE_PASSWORD_COMMAND", value),
            None => std::env::remove_var("RCLONE_PASSWORD_COMMAND"),
        }
    }
}

/// Install `RCLONE_PASSWORD_COMMAND` for `method` if it is encrypted;
/// returns `None` (no guard, no env var touched) if it is not. The
/// returned guard must be kept alive for the duration of the subprocess
/// call and then dropped to restore the prior environment.
pub fn as_command(
    project_name: &str,
    method: ConnectionMethod,
) -> Result<Option<PasswordCommandGuard>> {
    if !sidecar::is_encrypted(project_name, method)? {
        return Ok(None);
    }
    let entry_name = keychain::entry_name(project_name, method);
    let previous = std::env::var("RCLONE_PASSWORD_COMMAND").ok();
    let print_passphrase_command = format!(
        "{} credential-print --project {} --entry {}",
        env!("CARGO_PKG_NAME"),
        project_name,
        entry_name
    );
    std::env::set_var("RCLONE_PASSWORD_COMMAND", print_passphrase_command);
    Ok(Some(PasswordCommandGuard { previous }))
}

/// Clear the keychain entry and mark the method as not encrypted. Does
/// not delete the backend config file itself — only its credential.
pub fn remove(project_name: &str, method: ConnectionMethod) -> Result<()> {
    keychain::remove(project_name, method)?;
    sidecar::set_encrypted(project_name, method, false)
}

pub fn is_encrypted(project_name: &str, method: ConnectionMethod) -> Result<bool> {
    sidecar::is_encrypted(project_name, method)
}
