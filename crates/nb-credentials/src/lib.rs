//! Credential manager: per-connection-method credential
//! storage, OS-keychain-backed encryption of the backend config file, and
//! SSH host-key / key-pair lifecycle. Consulted before any remote-listing
//! or transfer call that touches a non-local backend.

pub mod error;
pub mod hostkey;
pub mod keychain;
pub mod manager;
pub mod sidecar;
pub mod sshkey;

pub use error::{Error, Result};
pub use manager::{as_command, is_encrypted, remove, set, PasswordCommandGuard};
