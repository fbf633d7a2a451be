//! Passphrase generation and OS-keychain storage.
//!
//! The source exports a `PSCredential` XML file on Windows, shells out to
//! `pass` on Linux, and uses the Keychain API directly on macOS — three
//! platform-specific codepaths for the same "store a secret under a
//! stable name" operation. The `keyring` crate collapses those into one
//! call site backed by the Credential Manager / Secret Service / Keychain
//! respectively, so that codepath is not reproduced here.

use crate::error::Result;
use nb_types::ConnectionMethod;
use rand::Rng;

const PASSPHRASE_LEN: usize = 40;
const PASSPHRASE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const KEYCHAIN_SERVICE: &str = "neuroshuttle";

/// `central_<project_name>_<connection_method>`, matching the rclone
/// remote/config naming convention (spec §9 / SPEC_FULL.md §3.2).
pub fn entry_name(project_name: &str, method: ConnectionMethod) -> String {
    format!("central_{project_name}_{}", method.as_str())
}

fn generate_passphrase() -> String {
    let mut rng = rand::thread_rng();
    (0..PASSPHRASE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..PASSPHRASE_ALPHABET.len());
            PASSPHRASE_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a fresh random passphrase and store it under `entry_name`,
/// returning the passphrase so the caller can use it to encrypt the
/// backend config file immediately.
pub fn generate_and_store(project_name: &str, method: ConnectionMethod) -> Result<String> {
    let passphrase = generate_passphrase();
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &entry_name(project_name, method))?;
    entry.set_password(&passphrase)?;
    Ok(passphrase)
}

pub fn fetch(project_name: &str, method: ConnectionMethod) -> Result<String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &entry_name(project_name, method))?;
    Ok(entry.get_password()?)
}

/// Remove the passphrase from the keychain. Missing entries are treated
/// as already-removed rather than an error, so `remove(method)` is safe
/// to call on a connection method that was never encrypted.
pub fn remove(project_name: &str, method: ConnectionMethod) -> Result<()> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &entry_name(project_name, method))?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_name_matches_rclone_remote_convention() {
        assert_eq!(
            entry_name("myproject", ConnectionMethod::Ssh),
            "central_myproject_ssh"
        );
    }

    #[test]
    fn generated_passphrases_are_forty_chars_and_differ() {
        let a = generate_passphrase();
        let b = generate_passphrase();
        assert_eq!(a.len(), PASSPHRASE_LEN);
        assert_eq!(b.len(), PASSPHRASE_LEN);
        assert_ne!(a, b);
    }
}
