use crate::local::LocalBackend;
use crate::rclone::RcloneBackend;
use crate::traits::ListingBackend;
use nb_types::ConnectionMethod;

/// Canonical rclone remote name for a project's central storage,
/// grounded on `original_source/datashuttle/configs/rclone_configs.py`:
/// `ds_<connection_method>_<project_name>`.
pub fn rclone_remote_name(project_name: &str, connection_method: ConnectionMethod) -> String {
    format!("ds_{}_{}", connection_method.as_str(), project_name)
}

/// Build the backend for a project's central storage from its configured
/// [`ConnectionMethod`]. Returns `None` for `LocalFilesystem`, since a
/// local-only project's "central" is just another local path and
/// [`LocalBackend`] already covers it without a remote name.
pub fn central_backend(
    project_name: &str,
    connection_method: ConnectionMethod,
) -> Option<Box<dyn ListingBackend>> {
    match connection_method {
        ConnectionMethod::LocalFilesystem => None,
        ConnectionMethod::Ssh => Some(Box::new(RcloneBackend::new(
            "ssh",
            rclone_remote_name(project_name, connection_method),
        ))),
        ConnectionMethod::Aws => Some(Box::new(RcloneBackend::new(
            "aws",
            rclone_remote_name(project_name, connection_method),
        ))),
        ConnectionMethod::Gdrive => Some(Box::new(RcloneBackend::new(
            "gdrive",
            rclone_remote_name(project_name, connection_method),
        ))),
    }
}

/// The local side of every transfer, regardless of central connection
/// method (spec §3: `local_path` is always a local filesystem path).
pub fn local_backend() -> Box<dyn ListingBackend> {
    Box::new(LocalBackend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_name_is_stable_and_namespaced() {
        assert_eq!(
            rclone_remote_name("myproject", ConnectionMethod::Ssh),
            "ds_ssh_myproject"
        );
    }

    #[test]
    fn local_filesystem_has_no_central_backend() {
        assert!(central_backend("myproject", ConnectionMethod::LocalFilesystem).is_none());
    }

    #[test]
    fn remote_methods_produce_a_backend() {
        assert!(central_backend("myproject", ConnectionMethod::Aws).is_some());
    }
}
