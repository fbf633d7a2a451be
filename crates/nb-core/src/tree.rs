//! Enumeration of the on-disk project tree: `rawdata`/`derivatives` ->
//! `sub-*` -> `ses-*` -> datatype folders. This module only
//! reads the *local* tree — `nb-backends` wraps the same shape for remote
//! listing backends so `nb-validate` and `nb-transfer` can treat both
//! uniformly.

use nb_types::{Name, TopLevelFolder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One `sub-`/`ses-` folder found directly under its parent, already
/// parsed into a [`Name`]. Entries whose basename fails to parse are
/// omitted here — `nb-validate` re-parses raw basenames itself so it can
/// report the parse error against the offending path.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub name: Name,
}

/// The immediate subdirectories of `dir`, sorted by filename for
/// deterministic iteration order. Does not recurse; callers walk level by
/// level so each level can apply its own selector.
pub fn immediate_subdirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

/// All `sub-*` folders directly under `<local_path>/<top_level_folder>/`.
/// Folders whose basename does not parse as a valid subject name are
/// silently skipped — they are not part of the NeuroBlueprint tree at all
/// (e.g. `.datashuttle`, stray files mistaken for directories never reach
/// here since they're filtered by [`immediate_subdirs`]).
pub fn list_subjects(local_path: &Path, top_level_folder: TopLevelFolder) -> Vec<TreeEntry> {
    let root = local_path.join(top_level_folder.as_str());
    let Ok(subdirs) = immediate_subdirs(&root) else {
        return Vec::new();
    };
    subdirs
        .into_iter()
        .filter_map(|path| {
            let basename = path.file_name()?.to_str()?;
            Name::parse(basename).ok().map(|name| TreeEntry { path, name })
        })
        .collect()
}

/// All `ses-*` folders directly under one subject's directory.
pub fn list_sessions(sub_dir: &Path) -> Vec<TreeEntry> {
    let Ok(subdirs) = immediate_subdirs(sub_dir) else {
        return Vec::new();
    };
    subdirs
        .into_iter()
        .filter_map(|path| {
            let basename = path.file_name()?.to_str()?;
            Name::parse(basename).ok().map(|name| TreeEntry { path, name })
        })
        .collect()
}

/// Known datatype-folder names found directly under one session (or, for
/// `anat`, directly under one subject). Unlike subjects/sessions this is
/// not a [`Name`]-parsed entry — datatype folders are bare keyword names,
/// not key-value basenames.
pub fn list_datatype_folders(parent_dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(subdirs) = immediate_subdirs(parent_dir) else {
        return Vec::new();
    };
    subdirs
        .into_iter()
        .filter_map(|path| {
            let basename = path.file_name()?.to_str()?.to_string();
            if nb_types::datatype::is_known_datatype(&basename) {
                Some((basename, path))
            } else {
                None
            }
        })
        .collect()
}

/// Every file under `dir`, recursively, as paths relative to `dir`. Used
/// by the local listing backend (`nb-backends`) to build the same
/// `RelativeFile` shape a remote `rclone lsjson` would produce.
pub fn walk_files_relative(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .ok()
                .map(|relative| relative.to_path_buf())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn list_subjects_skips_unparsable_folders() {
        let tmp = tempdir().unwrap();
        let rawdata = tmp.path().join("rawdata");
        fs::create_dir_all(rawdata.join("sub-001")).unwrap();
        fs::create_dir_all(rawdata.join("not_a_subject")).unwrap();

        let subjects = list_subjects(tmp.path(), TopLevelFolder::Rawdata);
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name.prefix_value(), "001");
    }

    #[test]
    fn list_datatype_folders_filters_to_known_names() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("ephys")).unwrap();
        fs::create_dir_all(tmp.path().join("scratch")).unwrap();

        let datatypes = list_datatype_folders(tmp.path());
        assert_eq!(datatypes.len(), 1);
        assert_eq!(datatypes[0].0, "ephys");
    }

    #[test]
    fn walk_files_relative_strips_dir_prefix() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/b/file.bin"), b"x").unwrap();

        let files = walk_files_relative(tmp.path());
        assert_eq!(files, vec![PathBuf::from("a/b/file.bin")]);
    }
}
