//! Assertions tailored to neuroshuttle's validator/resolver output, so
//! integration tests read as intent ("exactly one VALUE_LENGTH issue")
//! rather than manual `Vec` indexing.

use anyhow::{bail, Result};
use nb_types::Code;
use nb_validate::Issue;

/// Assert `issues` contains exactly one issue of `kind`, returning it for
/// further inspection (e.g. checking its `path`).
pub fn assert_single_issue_of_kind(issues: &[Issue], kind: Code) -> Result<&Issue> {
    let matching: Vec<&Issue> = issues.iter().filter(|issue| issue.kind == kind).collect();
    match matching.as_slice() {
        [single] => Ok(single),
        [] => bail!("expected one {kind} issue, found none in {issues:?}"),
        many => bail!("expected exactly one {kind} issue, found {} in {issues:?}", many.len()),
    }
}

/// Assert `issues` contains no issue of `kind`.
pub fn assert_no_issue_of_kind(issues: &[Issue], kind: Code) -> Result<()> {
    if issues.iter().any(|issue| issue.kind == kind) {
        bail!("expected no {kind} issues, found some in {issues:?}");
    }
    Ok(())
}

/// Assert an include-list resolved by the selector resolver names exactly
/// the given relative paths (order-sensitive — the resolver guarantees
/// determinism, so tests should hold it to a fixed order too).
pub fn assert_include_paths(resolved: &[nb_transfer::ResolvedInclude], expected: &[&str]) -> Result<()> {
    let actual: Vec<String> = resolved
        .iter()
        .map(|include| include.relative_path.to_string_lossy().into_owned())
        .collect();
    let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        bail!("expected include-list {expected:?}, got {actual:?}");
    }
    Ok(())
}
