use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// One entry returned by [`ListingBackend::list`]: a path relative to the
/// directory that was listed, plus enough metadata for the transfer
/// planner's `if_source_newer` overwrite policy and for the
/// validator's duplicate/zero-padding checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub relative_path: PathBuf,
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
}

/// Uniform view over a place data can live: the local filesystem, or a
/// remote reachable through the external transfer binary (SSH/SFTP, S3,
/// Google Drive). `nb-validate` and `nb-transfer` only ever see this
/// trait, never a concrete backend — mirrors the teacher's
/// discovery/parser/mapper split collapsed to the one seam this domain
/// actually needs.
pub trait ListingBackend: Send + Sync {
    /// Human-readable identifier for logs and error messages.
    fn id(&self) -> &'static str;

    /// Non-recursive listing of `dir`'s immediate children.
    fn list(&self, dir: &Path) -> Result<Vec<RemoteEntry>>;

    /// Whether `path` exists on this backend (file or directory).
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Remove `path`. Directories are removed recursively. Used only by
    /// credential/setup flows that need to clean up a failed partial
    /// configuration — never by the transfer planner itself.
    fn delete(&self, path: &Path) -> Result<()>;
}
