//! Selector→Include resolver: turns
//! `(sub_selector, ses_selector, datatype_selector)` into a deterministic
//! list of include-patterns for the transfer planner.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use nb_backends::{ListingBackend, RemoteEntry};
use nb_types::{
    contains_wildcard, datatype, extract_range_predicate, format_names, normalize_selector,
    Name, SelectorLevel, SelectorToken, WILDCARD_TAG,
};
use std::path::{Path, PathBuf};

/// One resolved include target, relative to the root being transferred.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedInclude {
    pub relative_path: PathBuf,
    pub is_dir: bool,
}

impl ResolvedInclude {
    /// Render as an rclone `--include` pattern: directories get a
    /// `/**` suffix so their full contents are pulled
    /// in; files are included verbatim.
    pub fn as_include_pattern(&self) -> String {
        let path = self.relative_path.to_string_lossy().replace('\\', "/");
        if self.is_dir {
            format!("{path}/**")
        } else {
            path
        }
    }
}

fn list_or_empty(backend: &dyn ListingBackend, dir: &Path) -> Result<Vec<RemoteEntry>> {
    match backend.list(dir) {
        Ok(entries) => Ok(entries),
        Err(nb_backends::Error::NotFound(_)) => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Turn a wildcard/range-predicate-bearing candidate into the concrete
/// basenames it matches against `entries`. A plain literal with no
/// deferred tag resolves to itself.
fn resolve_deferred_candidate(candidate: &str, entries: &[RemoteEntry]) -> Result<Vec<String>> {
    if let Some(predicate) = extract_range_predicate(candidate)? {
        let pattern = format!("^{}$", regex::escape(&predicate.template).replace(
            &regex::escape(WILDCARD_TAG),
            ".*",
        ));
        let re = regex::Regex::new(&pattern)
            .map_err(|err| Error::BadSelector(format!("invalid wildcard pattern: {err}")))?;
        let mut matches = Vec::new();
        for entry in entries {
            let basename = entry.relative_path.to_string_lossy().to_string();
            if !re.is_match(&basename) {
                continue;
            }
            let Ok(name) = Name::parse(&basename) else {
                continue;
            };
            if let Some(value) = name.get(predicate.key) {
                if value.as_str() >= predicate.start.as_str()
                    && value.as_str() <= predicate.end.as_str()
                {
                    matches.push(basename);
                }
            }
        }
        return Ok(matches);
    }

    if contains_wildcard(candidate) {
        let pattern = format!(
            "^{}$",
            regex::escape(candidate).replace(&regex::escape(WILDCARD_TAG), ".*")
        );
        let re = regex::Regex::new(&pattern)
            .map_err(|err| Error::BadSelector(format!("invalid wildcard pattern: {err}")))?;
        let matches = entries
            .iter()
            .map(|entry| entry.relative_path.to_string_lossy().to_string())
            .filter(|basename| re.is_match(basename))
            .collect();
        return Ok(matches);
    }

    if entries
        .iter()
        .any(|entry| entry.relative_path.to_string_lossy() == candidate)
    {
        Ok(vec![candidate.to_string()])
    } else {
        Ok(Vec::new())
    }
}

/// Resolve a sub/ses-level selector against the entries one directory
/// listing produced. Returns the concrete basenames selected, and
/// whether a "non-of-level" group (everything not matching the prefix)
/// should also be included.
fn resolve_level_group(
    entries: &[RemoteEntry],
    tokens: &[SelectorToken],
    prefix: &str,
    clock: &NaiveDateTime,
) -> Result<(Vec<String>, bool)> {
    let mut concrete = Vec::new();
    let mut include_non = false;
    let mut seen = std::collections::HashSet::new();

    for token in tokens {
        match token {
            SelectorToken::All => {
                for entry in entries {
                    let basename = entry.relative_path.to_string_lossy().to_string();
                    if basename.starts_with(&format!("{prefix}-")) && seen.insert(basename.clone())
                    {
                        concrete.push(basename);
                    }
                }
                include_non = true;
            }
            SelectorToken::AllOfLevel => {
                for entry in entries {
                    let basename = entry.relative_path.to_string_lossy().to_string();
                    if basename.starts_with(&format!("{prefix}-")) && seen.insert(basename.clone())
                    {
                        concrete.push(basename);
                    }
                }
            }
            SelectorToken::AllNonOfLevel => {
                include_non = true;
            }
            SelectorToken::Literal(raw) => {
                for candidate in format_names(std::slice::from_ref(raw), prefix, clock)? {
                    for resolved in resolve_deferred_candidate(&candidate, entries)? {
                        if seen.insert(resolved.clone()) {
                            concrete.push(resolved);
                        }
                    }
                }
            }
        }
    }

    Ok((concrete, include_non))
}

/// Resolve the datatype-level selector. `all`/`all_datatype` enumerate
/// the canonical datatype table regardless of what is actually present
/// on disk; `all_non_datatype` and literal lists are
/// resolved against the session's actual directory listing.
fn resolve_datatype_group(
    entries: &[RemoteEntry],
    tokens: &[SelectorToken],
) -> (Vec<String>, bool) {
    let mut concrete = Vec::new();
    let mut include_non = false;
    let mut seen = std::collections::HashSet::new();

    for token in tokens {
        match token {
            SelectorToken::All | SelectorToken::AllOfLevel => {
                for name in datatype::datatype_names() {
                    if seen.insert(name.to_string()) {
                        concrete.push(name.to_string());
                    }
                }
                if matches!(token, SelectorToken::All) {
                    include_non = true;
                }
            }
            SelectorToken::AllNonOfLevel => {
                include_non = true;
            }
            SelectorToken::Literal(raw) => {
                if seen.insert(raw.clone()) {
                    concrete.push(raw.clone());
                }
            }
        }
    }

    (concrete, include_non)
}

/// Whether a datatype selector asks for `anat` at all, directly or via a
/// blanket sentinel — used to decide whether the subject-level fallback
/// (`anat` exists at both subject and session level; prefer
/// session-level when both do) is worth checking.
fn datatype_selector_wants_anat(tokens: &[SelectorToken]) -> bool {
    tokens.iter().any(|token| match token {
        SelectorToken::All | SelectorToken::AllOfLevel => true,
        SelectorToken::Literal(raw) => raw == "anat" || raw == "histology",
        SelectorToken::AllNonOfLevel => false,
    })
}

fn push_non_group(
    includes: &mut Vec<ResolvedInclude>,
    entries: &[RemoteEntry],
    base: &Path,
    excluded_prefix: Option<&str>,
    excluded_names: Option<&std::collections::HashSet<&str>>,
) {
    for entry in entries {
        let basename = entry.relative_path.to_string_lossy().to_string();
        if let Some(prefix) = excluded_prefix {
            if basename.starts_with(&format!("{prefix}-")) {
                continue;
            }
        }
        if let Some(names) = excluded_names {
            if names.contains(basename.as_str()) {
                continue;
            }
        }
        includes.push(ResolvedInclude {
            relative_path: base.join(&entry.relative_path),
            is_dir: entry.is_dir,
        });
    }
}

/// Resolve `(sub_selector, ses_selector, datatype_selector)` against
/// `source_root` (the `rawdata`/`derivatives` directory on whichever
/// side of the transfer is the source) into a deterministic include list.
pub fn resolve_selector(
    backend: &dyn ListingBackend,
    source_root: &Path,
    sub_selector: &[String],
    ses_selector: &[String],
    datatype_selector: &[String],
    clock: &NaiveDateTime,
) -> Result<Vec<ResolvedInclude>> {
    let sub_tokens = normalize_selector(sub_selector, SelectorLevel::Sub)?;
    let ses_tokens = normalize_selector(ses_selector, SelectorLevel::Ses)?;
    let datatype_tokens = normalize_selector(datatype_selector, SelectorLevel::Datatype)?;

    let sub_entries = list_or_empty(backend, source_root)?;
    let (subs, non_sub) = resolve_level_group(&sub_entries, &sub_tokens, "sub", clock)?;

    let mut includes = Vec::new();
    if non_sub {
        push_non_group(&mut includes, &sub_entries, Path::new(""), Some("sub"), None);
    }

    for sub_name in &subs {
        let sub_dir = source_root.join(sub_name);
        let ses_entries = list_or_empty(backend, &sub_dir)?;
        let (sessions, non_ses) = resolve_level_group(&ses_entries, &ses_tokens, "ses", clock)?;

        if non_ses {
            push_non_group(
                &mut includes,
                &ses_entries,
                Path::new(sub_name),
                Some("ses"),
                None,
            );
        }

        let mut anat_found_at_session_level = false;
        for ses_name in &sessions {
            let ses_dir = sub_dir.join(ses_name);
            let datatype_entries = list_or_empty(backend, &ses_dir)?;
            let (datatypes, non_datatype) = resolve_datatype_group(&datatype_entries, &datatype_tokens);

            let base = PathBuf::from(sub_name).join(ses_name);
            for dt in &datatypes {
                if dt == "anat" {
                    anat_found_at_session_level = true;
                }
                includes.push(ResolvedInclude {
                    relative_path: base.join(dt),
                    is_dir: true,
                });
            }
            if non_datatype {
                let known: std::collections::HashSet<&str> = datatype::datatype_names().collect();
                push_non_group(&mut includes, &datatype_entries, &base, None, Some(&known));
            }
        }

        // `anat` is the one datatype fixed at both subject and session
        // level. Fall back to a subject-level
        // `anat`/`histology` folder only when no session under this
        // subject carried one.
        if datatype_selector_wants_anat(&datatype_tokens) && !anat_found_at_session_level {
            let has_subject_anat = ses_entries.iter().any(|entry| {
                entry.is_dir
                    && matches!(
                        entry.relative_path.to_string_lossy().as_ref(),
                        "anat" | "histology"
                    )
            });
            if has_subject_anat {
                includes.push(ResolvedInclude {
                    relative_path: PathBuf::from(sub_name).join("anat"),
                    is_dir: true,
                });
            }
        }
    }

    includes.sort();
    includes.dedup();
    Ok(includes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nb_backends::Error as BackendError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeBackend {
        listings: Mutex<HashMap<PathBuf, Vec<RemoteEntry>>>,
    }

    impl FakeBackend {
        fn new(listings: HashMap<PathBuf, Vec<RemoteEntry>>) -> Self {
            Self {
                listings: Mutex::new(listings),
            }
        }

        fn dir(names: &[(&str, bool)]) -> Vec<RemoteEntry> {
            names
                .iter()
                .map(|(name, is_dir)| RemoteEntry {
                    relative_path: PathBuf::from(name),
                    is_dir: *is_dir,
                    modified: None,
                })
                .collect()
        }
    }

    impl ListingBackend for FakeBackend {
        fn id(&self) -> &'static str {
            "fake"
        }

        fn list(&self, dir: &Path) -> nb_backends::Result<Vec<RemoteEntry>> {
            self.listings
                .lock()
                .unwrap()
                .get(dir)
                .cloned()
                .ok_or_else(|| BackendError::NotFound(dir.display().to_string()))
        }

        fn exists(&self, path: &Path) -> nb_backends::Result<bool> {
            Ok(self.listings.lock().unwrap().contains_key(path))
        }

        fn delete(&self, _path: &Path) -> nb_backends::Result<()> {
            Ok(())
        }
    }

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn literal_selectors_resolve_deterministically() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata"),
            FakeBackend::dir(&[("sub-001", true), ("sub-002", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001"),
            FakeBackend::dir(&[("ses-001", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001/ses-001"),
            FakeBackend::dir(&[("ephys", true)]),
        );
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["sub-001".to_string()],
            &["ses-001".to_string()],
            &["ephys".to_string()],
            &clock(),
        )
        .unwrap();

        assert_eq!(includes.len(), 1);
        assert_eq!(
            includes[0].relative_path,
            PathBuf::from("sub-001/ses-001/ephys")
        );
        assert_eq!(includes[0].as_include_pattern(), "sub-001/ses-001/ephys/**");
    }

    #[test]
    fn all_datatype_enumerates_canonical_set_regardless_of_listing() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata"),
            FakeBackend::dir(&[("sub-001", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001"),
            FakeBackend::dir(&[("ses-001", true)]),
        );
        listings.insert(PathBuf::from("rawdata/sub-001/ses-001"), Vec::new());
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["sub-001".to_string()],
            &["ses-001".to_string()],
            &["all_datatype".to_string()],
            &clock(),
        )
        .unwrap();

        assert_eq!(includes.len(), nb_types::DATATYPES.len());
    }

    #[test]
    fn results_are_sorted_ascending_by_path() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata"),
            FakeBackend::dir(&[("sub-002", true), ("sub-001", true)]),
        );
        listings.insert(PathBuf::from("rawdata/sub-001"), Vec::new());
        listings.insert(PathBuf::from("rawdata/sub-002"), Vec::new());
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["all_sub".to_string()],
            &["all_non_ses".to_string()],
            &["all_datatype".to_string()],
            &clock(),
        )
        .unwrap();

        let paths: Vec<_> = includes.iter().map(|e| e.relative_path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    /// Of four sessions dated 2024-03-01/03-15/04-01/04-15, the selector
    /// `ses-@*@_20240315@DATETO@20240401` must transfer exactly
    /// `ses-002`/`ses-003`. Snapshotted with `insta`
    /// since the include-list's exact shape, not just its length, is the
    /// property under test.
    #[test]
    fn date_range_selector_matches_inclusive_bounds() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata/sub-001"),
            FakeBackend::dir(&[
                ("ses-001_date-20240301", true),
                ("ses-002_date-20240315", true),
                ("ses-003_date-20240401", true),
                ("ses-004_date-20240415", true),
            ]),
        );
        for ses in [
            "ses-001_date-20240301",
            "ses-002_date-20240315",
            "ses-003_date-20240401",
            "ses-004_date-20240415",
        ] {
            listings.insert(
                PathBuf::from(format!("rawdata/sub-001/{ses}")),
                FakeBackend::dir(&[("ephys", true)]),
            );
        }
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["sub-001".to_string()],
            &["ses-@*@_20240315@DATETO@20240401".to_string()],
            &["ephys".to_string()],
            &clock(),
        )
        .unwrap();

        let paths: Vec<String> = includes
            .iter()
            .map(|include| include.relative_path.to_string_lossy().into_owned())
            .collect();
        insta::assert_debug_snapshot!(paths, @r#"
        [
            "sub-001/ses-002_date-20240315/ephys",
            "sub-001/ses-003_date-20240401/ephys",
        ]
        "#);
    }

    /// `anat` is fixed at both subject and session level. When a session
    /// already has its own `anat` folder, the subject-level one (if any)
    /// is not also pulled in as a duplicate include.
    #[test]
    fn anat_prefers_session_level_when_both_exist() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata"),
            FakeBackend::dir(&[("sub-001", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001"),
            FakeBackend::dir(&[("ses-001", true), ("anat", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001/ses-001"),
            FakeBackend::dir(&[("anat", true)]),
        );
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["sub-001".to_string()],
            &["ses-001".to_string()],
            &["anat".to_string()],
            &clock(),
        )
        .unwrap();

        let paths: Vec<PathBuf> = includes.iter().map(|i| i.relative_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("sub-001/ses-001/anat")]);
    }

    /// When no session under the subject carries its own `anat` folder,
    /// the subject-level one is used instead.
    #[test]
    fn anat_falls_back_to_subject_level_when_absent_from_sessions() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata"),
            FakeBackend::dir(&[("sub-001", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001"),
            FakeBackend::dir(&[("ses-001", true), ("anat", true)]),
        );
        listings.insert(
            PathBuf::from("rawdata/sub-001/ses-001"),
            FakeBackend::dir(&[("ephys", true)]),
        );
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["sub-001".to_string()],
            &["ses-001".to_string()],
            &["anat".to_string()],
            &clock(),
        )
        .unwrap();

        let paths: Vec<PathBuf> = includes.iter().map(|i| i.relative_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("sub-001/anat")]);
    }

    /// A literal subject that does not exist in the source listing
    /// resolves to no includes at all, rather than being trusted at
    /// face value.
    #[test]
    fn nonexistent_literal_subject_resolves_to_empty() {
        let mut listings = HashMap::new();
        listings.insert(
            PathBuf::from("rawdata"),
            FakeBackend::dir(&[("sub-001", true)]),
        );
        let backend = FakeBackend::new(listings);

        let includes = resolve_selector(
            &backend,
            Path::new("rawdata"),
            &["sub-999".to_string()],
            &["all".to_string()],
            &["all_datatype".to_string()],
            &clock(),
        )
        .unwrap();

        assert!(includes.is_empty());
    }
}
