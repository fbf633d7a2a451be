//! Cross-field validation rules. A single field's own shape
//! (e.g. "is this a known AWS region") is checked as the value is set;
//! this module checks relationships *between* fields, which is why it
//! needs the whole [`Configs`] record rather than one field at a time.

use crate::error::{Error, Result};
use nb_types::{is_known_aws_region, ConnectionMethod, Configs};

fn require_non_empty(field: &str, value: Option<&String>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(Error::ConfigIncompatible {
            detail: format!("'{field}' must be set and non-empty for this connection method"),
        }),
    }
}

/// Run every cross-field rule against `configs`. Returns
/// the first violated rule as an error; callers that want the full set
/// of problems should call this after fixing each one in turn (matching
/// the original's fail-fast `check_dict_values_raise_on_fail`).
pub fn validate_cross_field(configs: &Configs) -> Result<()> {
    if !configs.local_path.is_absolute() {
        return Err(Error::BadConfigField {
            field: "local_path".to_string(),
            detail: "must be an absolute path".to_string(),
        });
    }

    match (&configs.central_path, &configs.connection_method) {
        (None, None) => {} // local-only project
        (Some(_), Some(_)) => {}
        _ => {
            return Err(Error::ConfigIncompatible {
                detail: "'central_path' and 'connection_method' must either both be set, or both be absent (local-only project)".to_string(),
            });
        }
    }

    let Some(central_path) = &configs.central_path else {
        return Ok(());
    };
    if central_path.to_string_lossy().starts_with('~') {
        return Err(Error::BadConfigField {
            field: "central_path".to_string(),
            detail: "must not use '~'; pass an absolute path".to_string(),
        });
    }

    let Some(method) = configs.connection_method else {
        return Ok(());
    };

    match method {
        ConnectionMethod::LocalFilesystem => {
            if !central_path.is_absolute() {
                return Err(Error::BadConfigField {
                    field: "central_path".to_string(),
                    detail: "must be absolute when connection_method is local_filesystem"
                        .to_string(),
                });
            }
        }
        ConnectionMethod::Ssh => {
            require_non_empty("central_host_id", configs.central_host_id.as_ref())?;
            require_non_empty(
                "central_host_username",
                configs.central_host_username.as_ref(),
            )?;
        }
        ConnectionMethod::Aws => {
            require_non_empty("aws_access_key_id", configs.aws_access_key_id.as_ref())?;
            require_non_empty("aws_region", configs.aws_region.as_ref())?;
            if let Some(region) = &configs.aws_region {
                if !is_known_aws_region(region) {
                    return Err(Error::BadConfigField {
                        field: "aws_region".to_string(),
                        detail: format!("'{region}' is not a recognised AWS region"),
                    });
                }
            }
        }
        ConnectionMethod::Gdrive => {
            require_non_empty("gdrive_root_folder_id", configs.gdrive_root_folder_id.as_ref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base() -> Configs {
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
    fn local_only_project_is_valid() {
        assert!(validate_cross_field(&base()).is_ok());
    }

    #[test]
    fn central_path_without_connection_method_is_incompatible() {
        let mut cfg = base();
        cfg.central_path = Some(PathBuf::from("/mnt/central/myproject"));
        let err = validate_cross_field(&cfg).unwrap_err();
        assert!(matches!(err, Error::ConfigIncompatible { .. }));
    }

    #[test]
    fn ssh_requires_host_fields() {
        let mut cfg = base();
        cfg.central_path = Some(PathBuf::from("/mnt/central/myproject"));
        cfg.connection_method = Some(ConnectionMethod::Ssh);
        let err = validate_cross_field(&cfg).unwrap_err();
        assert!(matches!(err, Error::ConfigIncompatible { .. }));

        cfg.central_host_id = Some("host.example.org".to_string());
        cfg.central_host_username = Some("alice".to_string());
        assert!(validate_cross_field(&cfg).is_ok());
    }

    #[test]
    fn aws_rejects_unknown_region() {
        let mut cfg = base();
        cfg.central_path = Some(PathBuf::from("/mnt/central/myproject"));
        cfg.connection_method = Some(ConnectionMethod::Aws);
        cfg.aws_access_key_id = Some("AKIA...".to_string());
        cfg.aws_region = Some("mars-central-1".to_string());
        let err = validate_cross_field(&cfg).unwrap_err();
        assert!(matches!(err, Error::BadConfigField { .. }));
    }

    #[test]
    fn central_path_rejects_tilde() {
        let mut cfg = base();
        cfg.central_path = Some(PathBuf::from("~/central/myproject"));
        cfg.connection_method = Some(ConnectionMethod::LocalFilesystem);
        let err = validate_cross_field(&cfg).unwrap_err();
        assert!(matches!(err, Error::BadConfigField { .. }));
    }
}
