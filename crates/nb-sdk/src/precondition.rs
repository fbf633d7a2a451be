//! Precondition functions (spec §9: "decorator-based access checks
//! (`@check_configs_set`, `@requires_ssh_configs`, `@check_is_not_local_project`)
//! → precondition functions"). Each public `Project` method that needs one
//! of these calls it first and propagates a typed [`crate::Error::Precondition`]
//! rather than failing deep inside a lower-layer call with a less specific
//! error.

use crate::error::{Error, Result};
use nb_types::{ConnectionMethod, Configs};

/// Refuses a transfer/listing operation on a project that has no central
/// storage configured at all (spec's "Local-only project" glossary entry).
pub fn require_not_local_only(configs: &Configs) -> Result<()> {
    if configs.is_local_only() {
        return Err(Error::Precondition(
            "project has no central_path/connection_method configured; transfer operations are unavailable on a local-only project".to_string(),
        ));
    }
    Ok(())
}

/// Refuses an operation specific to one connection method (e.g.
/// `setup_ssh_connection` called on a project configured for `aws`).
pub fn require_connection_method(configs: &Configs, expected: ConnectionMethod) -> Result<()> {
    match configs.connection_method {
        Some(method) if method == expected => Ok(()),
        Some(other) => Err(Error::Precondition(format!(
            "project is configured for connection method '{}', not '{}'",
            other.as_str(),
            expected.as_str()
        ))),
        None => Err(Error::Precondition(
            "project has no connection_method configured".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn local_only_configs() -> Configs {
        Configs {
            local_path: PathBuf::from("/data/myproject"),
            central_path: None,
            connection_method: None,
            central_host_id: None,
            central_host_username: None,
            aws_access_key_id: None,
            aws_region: None,
            gdrive_client_id: None,
            gdrive_root_folder_id: None,
        }
    }

    #[test]
    fn not_local_only_rejects_local_only_project() {
        assert!(require_not_local_only(&local_only_configs()).is_err());
    }

    #[test]
    fn connection_method_mismatch_is_rejected() {
        let mut configs = local_only_configs();
        configs.connection_method = Some(ConnectionMethod::Aws);
        configs.central_path = Some(PathBuf::from("/mnt/central"));
        let err = require_connection_method(&configs, ConnectionMethod::Ssh).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn connection_method_match_succeeds() {
        let mut configs = local_only_configs();
        configs.connection_method = Some(ConnectionMethod::Ssh);
        configs.central_path = Some(PathBuf::from("/mnt/central"));
        assert!(require_connection_method(&configs, ConnectionMethod::Ssh).is_ok());
    }
}
