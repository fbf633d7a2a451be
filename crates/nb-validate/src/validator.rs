//! The static ruleset, applied in the fixed order the spec
//! prescribes so an early rule's error on a name short-circuits the
//! later rules it would otherwise subsume on that same name.

use crate::issue::Issue;
use crate::templates::expand_template_tags;
use nb_types::{Code, Error as NameError, Name, NameTemplates};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

/// One discovered `sub-*`/`ses-*` basename plus where it was found, for
/// issue attribution. `path` is `None` for names supplied only as
/// prospective strings (the name-against-project check, spec §4.2).
#[derive(Debug, Clone)]
pub struct NameEntry {
    pub basename: String,
    pub path: Option<PathBuf>,
}

impl NameEntry {
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Everything the validator needs about one checked tree: the folder
/// names present locally, and — when the check includes central storage
/// — the names present there too (spec §4.2 rule 5's "local only, or
/// local ∪ central").
#[derive(Debug, Clone, Default)]
pub struct TreeScope {
    pub project_folder_name: String,
    pub top_level_folder_name: String,
    pub local_names: Vec<NameEntry>,
    pub central_names: Vec<NameEntry>,
    /// Datatype-level folder basenames (not key-value names — bare
    /// keywords like `ephys`), only meaningful in strict mode (rule 4).
    pub datatype_folder_names: Vec<NameEntry>,
}

fn name_error_to_issue(basename: &str, path: Option<PathBuf>, err: NameError) -> Issue {
    let issue = Issue::new(err.code(), err.to_string());
    match path {
        Some(p) => issue.at(p),
        None => issue.at(PathBuf::from(basename)),
    }
}

/// Rule 1: the project folder's own name matches `^[A-Za-z0-9_-]+$`.
pub fn check_project_name(project_folder_name: &str) -> Option<Issue> {
    let valid = !project_folder_name.is_empty()
        && project_folder_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        None
    } else {
        Some(Issue::new(
            Code::ProjectName,
            format!("'{project_folder_name}' is not a valid project folder name"),
        ))
    }
}

/// Rule 2: the top-level folder is `rawdata` or `derivatives`.
pub fn check_top_level_folder(top_level_folder_name: &str) -> Option<Issue> {
    if top_level_folder_name == "rawdata" || top_level_folder_name == "derivatives" {
        None
    } else {
        Some(Issue::new(
            Code::TopLevelFolder,
            format!("'{top_level_folder_name}' is not 'rawdata' or 'derivatives'"),
        ))
    }
}

/// Rule 3: parse every entry's basename. Returns the successfully parsed
/// names (for rules 5-7) alongside issues for the ones that failed.
pub fn parse_names(entries: &[NameEntry]) -> (Vec<(NameEntry, Name)>, Vec<Issue>) {
    let mut parsed = Vec::new();
    let mut issues = Vec::new();
    for entry in entries {
        match Name::parse(&entry.basename) {
            Ok(name) => parsed.push((entry.clone(), name)),
            Err(err) => issues.push(name_error_to_issue(
                &entry.basename,
                entry.path.clone(),
                err,
            )),
        }
    }
    (parsed, issues)
}

/// Rule 4 (strict mode only): datatype folders must be a known datatype
/// keyword.
pub fn check_datatype_folders(entries: &[NameEntry], strict_mode: bool) -> Vec<Issue> {
    if !strict_mode {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| !nb_types::datatype::is_known_datatype(&entry.basename))
        .map(|entry| {
            let issue = Issue::new(
                Code::Datatype,
                format!("'{}' is not a recognised datatype", entry.basename),
            );
            match &entry.path {
                Some(p) => issue.at(p.clone()),
                None => issue.at(PathBuf::from(&entry.basename)),
            }
        })
        .collect()
}

/// Rule 5: every name sharing a prefix (`sub`/`ses`) must use the same
/// decimal width for its integer part, across the combined scope the
/// caller passed in (local only, or local ∪ central).
pub fn check_zero_padding(parsed: &[(NameEntry, Name)]) -> Vec<Issue> {
    let mut widths_by_prefix: HashMap<&str, Vec<(usize, &NameEntry)>> = HashMap::new();
    for (entry, name) in parsed {
        widths_by_prefix
            .entry(name.prefix())
            .or_default()
            .push((name.integer_width(), entry));
    }

    let mut issues = Vec::new();
    for (prefix, widths) in widths_by_prefix {
        let canonical = widths[0].0;
        if widths.iter().any(|(w, _)| *w != canonical) {
            let offending: Vec<&str> = widths
                .iter()
                .map(|(_, entry)| entry.basename.as_str())
                .collect();
            issues.push(Issue::new(
                Code::ValueLength,
                format!(
                    "inconsistent zero-padding for prefix '{prefix}' across: {}",
                    offending.join(", ")
                ),
            ));
        }
    }
    issues
}

/// The subject a `ses-*` entry's integer part is scoped to for rule 6
/// (spec §3: session integer parts are unique "within one subject", not
/// project-wide). Derived from `path`'s parent directory, which is the
/// owning `sub-*` folder for both the local-tree and central-listing
/// entry shapes. `None` when the entry carries no path (a prospective
/// name with no tree context) or its parent isn't a `sub-*` folder;
/// such entries fall back to the unscoped bucket, matching prior
/// behaviour for inputs with no subject context at all.
fn session_subject_scope(entry: &NameEntry) -> Option<String> {
    let parent = entry.path.as_deref()?.parent()?;
    let sub_name = parent.file_name()?.to_str()?;
    sub_name.starts_with("sub-").then(|| sub_name.to_string())
}

/// Rule 6: two names with the same prefix and integer part, but
/// different key-value tails, are a duplicate-name violation.
/// `sub-*` integer parts are compared project-wide; `ses-*` integer
/// parts are compared only within the same subject.
pub fn check_duplicate_names(parsed: &[(NameEntry, Name)]) -> Vec<Issue> {
    let mut by_prefix_and_integer: HashMap<(&str, u64, Option<String>), Vec<&(NameEntry, Name)>> =
        HashMap::new();
    for item @ (entry, name) in parsed {
        let scope = if name.prefix() == "ses" {
            session_subject_scope(entry)
        } else {
            None
        };
        by_prefix_and_integer
            .entry((name.prefix(), name.integer_part(), scope))
            .or_default()
            .push(item);
    }

    let mut issues = Vec::new();
    for ((prefix, integer, _scope), group) in by_prefix_and_integer {
        if group.len() < 2 {
            continue;
        }
        let first_basename = &group[0].0.basename;
        let all_identical = group
            .iter()
            .all(|(entry, _)| entry.basename == *first_basename);
        if !all_identical {
            let names: Vec<&str> = group.iter().map(|(e, _)| e.basename.as_str()).collect();
            issues.push(Issue::new(
                Code::DuplicateName,
                format!(
                    "duplicate integer part {integer} for prefix '{prefix}' across names with differing tails: {}",
                    names.join(", ")
                ),
            ));
        }
    }
    issues
}

/// Rule 7: if a template is `on`, the relevant names must match its
/// (tag-expanded) regex.
pub fn check_templates(
    parsed: &[(NameEntry, Name)],
    templates: &NameTemplates,
) -> Vec<Issue> {
    if !templates.on {
        return Vec::new();
    }
    let mut issues = Vec::new();
    for (entry, name) in parsed {
        let pattern = match name.prefix() {
            "sub" => templates.sub.as_deref(),
            "ses" => templates.ses.as_deref(),
            _ => None,
        };
        let Some(pattern) = pattern else { continue };
        let expanded = expand_template_tags(pattern);
        let Ok(re) = Regex::new(&format!("^{expanded}$")) else {
            continue;
        };
        if !re.is_match(&entry.basename) {
            let issue = Issue::new(
                Code::Template,
                format!("'{}' does not match template '{}'", entry.basename, pattern),
            );
            issues.push(match &entry.path {
                Some(p) => issue.at(p.clone()),
                None => issue.at(PathBuf::from(&entry.basename)),
            });
        }
    }
    issues
}

/// Full validation of a project tree: rules 1-7 in the spec's fixed
/// order, each applied to the combined local ∪ central scope for rules
/// that care about project-wide consistency.
pub fn validate_project(
    scope: &TreeScope,
    templates: Option<&NameTemplates>,
    strict_mode: bool,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(issue) = check_project_name(&scope.project_folder_name) {
        issues.push(issue);
    }
    if let Some(issue) = check_top_level_folder(&scope.top_level_folder_name) {
        issues.push(issue);
    }

    let mut combined: Vec<NameEntry> = scope.local_names.clone();
    combined.extend(scope.central_names.clone());

    let (parsed, parse_issues) = parse_names(&combined);
    issues.extend(parse_issues);

    issues.extend(check_datatype_folders(&scope.datatype_folder_names, strict_mode));
    issues.extend(check_zero_padding(&parsed));
    issues.extend(check_duplicate_names(&parsed));
    if let Some(templates) = templates {
        issues.extend(check_templates(&parsed, templates));
    }

    issues
}

/// The restricted name-against-project check: given
/// prospective new names and the existing project, run only rules 3, 5,
/// 6, 7, and report only issues attributable to the *new* names —
/// existing malformed names never shadow a new-name issue. If the
/// existing project already has inconsistent zero-padding, width cannot
/// be reasoned about for the new names; a single diagnostic is returned
/// asking the caller to fix the existing project first.
pub fn validate_new_names(
    new_names: &[NameEntry],
    existing: &[NameEntry],
    templates: Option<&NameTemplates>,
) -> Vec<Issue> {
    let (new_parsed, new_parse_issues) = parse_names(new_names);
    let mut issues = new_parse_issues;

    let (existing_parsed, _existing_parse_issues) = parse_names(existing);

    let existing_widths_consistent = check_zero_padding(&existing_parsed).is_empty();
    if !existing_widths_consistent {
        issues.push(Issue::new(
            Code::ValueLength,
            "existing project has inconsistent zero-padding; fix it before adding new names"
                .to_string(),
        ));
    } else {
        let mut combined = existing_parsed.clone();
        combined.extend(new_parsed.iter().cloned());
        let new_basenames: std::collections::HashSet<&str> =
            new_names.iter().map(|e| e.basename.as_str()).collect();
        for issue in check_zero_padding(&combined) {
            if new_basenames
                .iter()
                .any(|basename| issue.message.contains(basename))
            {
                issues.push(issue);
            }
        }
    }

    let mut combined = existing_parsed.clone();
    combined.extend(new_parsed.iter().cloned());
    let new_basenames: std::collections::HashSet<&str> =
        new_names.iter().map(|e| e.basename.as_str()).collect();
    for issue in check_duplicate_names(&combined) {
        if new_basenames
            .iter()
            .any(|basename| issue.message.contains(basename))
        {
            issues.push(issue);
        }
    }

    if let Some(templates) = templates {
        issues.extend(check_templates(&new_parsed, templates));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(basename: &str) -> NameEntry {
        NameEntry::new(basename)
    }

    #[test]
    fn project_name_rejects_spaces() {
        assert!(check_project_name("my project").is_some());
        assert!(check_project_name("my_project-2").is_none());
    }

    #[test]
    fn top_level_folder_rejects_unknown_name() {
        assert!(check_top_level_folder("scratch").is_some());
        assert!(check_top_level_folder("derivatives").is_none());
    }

    #[test]
    fn zero_padding_flags_inconsistent_width() {
        let entries = vec![entry("sub-001"), entry("sub-02")];
        let (parsed, _) = parse_names(&entries);
        let issues = check_zero_padding(&parsed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Code::ValueLength);
    }

    #[test]
    fn duplicate_names_flags_differing_tails_same_integer() {
        let entries = vec![entry("sub-001_id-123"), entry("sub-001_id-125")];
        let (parsed, _) = parse_names(&entries);
        let issues = check_duplicate_names(&parsed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Code::DuplicateName);
    }

    #[test]
    fn duplicate_names_allows_identical_repeats() {
        let entries = vec![entry("sub-001"), entry("sub-001")];
        let (parsed, _) = parse_names(&entries);
        assert!(check_duplicate_names(&parsed).is_empty());
    }

    #[test]
    fn duplicate_ses_check_is_scoped_per_subject() {
        // sub-001/ses-001_date-20240101 and sub-002/ses-001_date-20240115
        // are both valid: "session 1" under two different subjects, on
        // different dates. Neither subject has two sessions sharing
        // integer part 1, so this must not raise DUPLICATE_NAME.
        let entries = vec![
            entry("ses-001_date-20240101").at(PathBuf::from("rawdata/sub-001/ses-001_date-20240101")),
            entry("ses-001_date-20240115").at(PathBuf::from("rawdata/sub-002/ses-001_date-20240115")),
        ];
        let (parsed, _) = parse_names(&entries);
        assert!(check_duplicate_names(&parsed).is_empty());
    }

    #[test]
    fn duplicate_ses_same_subject_differing_tails_is_flagged() {
        let entries = vec![
            entry("ses-001_date-20240101").at(PathBuf::from("rawdata/sub-001/ses-001_date-20240101")),
            entry("ses-001_date-20240115").at(PathBuf::from("rawdata/sub-001/ses-001_date-20240115")),
        ];
        let (parsed, _) = parse_names(&entries);
        let issues = check_duplicate_names(&parsed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Code::DuplicateName);
    }

    #[test]
    fn template_rejects_non_matching_name() {
        let templates = NameTemplates {
            on: true,
            sub: Some(r"sub-\d\d_id-\d.?".to_string()),
            ses: None,
        };
        let entries = vec![entry("sub-02_id-a1")];
        let (parsed, _) = parse_names(&entries);
        let issues = check_templates(&parsed, &templates);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Code::Template);
    }

    #[test]
    fn template_accepts_matching_name() {
        let templates = NameTemplates {
            on: true,
            sub: Some(r"sub-\d\d_id-\d.?".to_string()),
            ses: None,
        };
        let entries = vec![entry("sub-02_id-1a")];
        let (parsed, _) = parse_names(&entries);
        assert!(check_templates(&parsed, &templates).is_empty());
    }

    #[test]
    fn new_names_duplicate_against_existing_is_attributed_to_new_name() {
        let existing = vec![entry("sub-001_id-123")];
        let new_names = vec![entry("sub-001_id-125")];
        let issues = validate_new_names(&new_names, &existing, None);
        assert!(issues.iter().any(|i| i.kind == Code::DuplicateName));
    }

    #[test]
    fn inconsistent_existing_padding_yields_single_diagnostic() {
        let existing = vec![entry("sub-001"), entry("sub-02")];
        let new_names = vec![entry("sub-003")];
        let issues = validate_new_names(&new_names, &existing, None);
        assert!(issues
            .iter()
            .any(|i| i.kind == Code::ValueLength && i.message.contains("existing project")));
    }
}
