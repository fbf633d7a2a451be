use crate::error::{Error, Result};
use crate::traits::{ListingBackend, RemoteEntry};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Listing backend over the local filesystem. Used as the `local_path`
/// side of every transfer regardless of `connection_method`, and as the
/// sole backend for a `local_filesystem`-only project.
pub struct LocalBackend;

impl ListingBackend for LocalBackend {
    fn id(&self) -> &'static str {
        "local_filesystem"
    }

    fn list(&self, dir: &Path) -> Result<Vec<RemoteEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
            entries.push(RemoteEntry {
                relative_path: entry.file_name().into(),
                is_dir: metadata.is_dir(),
                modified,
            });
        }
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(path.exists())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        if path.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn list_sorts_entries_by_name() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), b"x").unwrap();
        fs::write(tmp.path().join("a.txt"), b"x").unwrap();

        let backend = LocalBackend;
        let entries = backend.list(tmp.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].relative_path < entries[1].relative_path);
    }

    #[test]
    fn exists_reports_false_for_missing_path() {
        let backend = LocalBackend;
        assert!(!backend.exists(Path::new("/does/not/exist")).unwrap());
    }

    #[test]
    fn delete_missing_path_is_not_found() {
        let backend = LocalBackend;
        let err = backend.delete(Path::new("/does/not/exist")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
