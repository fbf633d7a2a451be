//! Selector tokens: a selector list is either literal
//! names (with or without prefix) or one of the closed sentinel tokens.
//! This module only models the token vocabulary and its normalisation
//! rules; expansion against a tree/listing is `nb-transfer`'s job.

use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorLevel {
    Sub,
    Ses,
    Datatype,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorToken {
    Literal(String),
    All,
    AllOfLevel,
    AllNonOfLevel,
}

impl fmt::Display for SelectorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorToken::Literal(s) => write!(f, "{s}"),
            SelectorToken::All => write!(f, "all"),
            SelectorToken::AllOfLevel => write!(f, "all_of_level"),
            SelectorToken::AllNonOfLevel => write!(f, "all_non_of_level"),
        }
    }
}

fn sentinel_name(level: SelectorLevel, all_of: bool) -> &'static str {
    match (level, all_of) {
        (SelectorLevel::Sub, true) => "all_sub",
        (SelectorLevel::Sub, false) => "all_non_sub",
        (SelectorLevel::Ses, true) => "all_ses",
        (SelectorLevel::Ses, false) => "all_non_ses",
        // `all_ses_level_non_data_type` is accepted as a parse-time alias
        // (original_source/datashuttle/configs/canonical_directories.py)
        // but this crate always emits/Displays the canonical spelling.
        (SelectorLevel::Datatype, true) => "all_datatype",
        (SelectorLevel::Datatype, false) => "all_non_datatype",
    }
}

/// Parse one raw selector-list entry for `level`.
pub fn parse_token(raw: &str, level: SelectorLevel) -> SelectorToken {
    if raw == "all" {
        return SelectorToken::All;
    }
    if raw == sentinel_name(level, true) {
        return SelectorToken::AllOfLevel;
    }
    if raw == sentinel_name(level, false)
        || (level == SelectorLevel::Datatype && raw == "all_ses_level_non_data_type")
    {
        return SelectorToken::AllNonOfLevel;
    }
    SelectorToken::Literal(raw.to_string())
}

/// Normalise a raw selector list into tokens, enforcing the mixing rule:
/// `all` may only appear together with the matching `all_non_*`, never
/// alongside specific
/// literal names or the bare `all_of_level` sentinel.
pub fn normalize_selector(raw: &[String], level: SelectorLevel) -> Result<Vec<SelectorToken>> {
    let tokens: Vec<SelectorToken> = raw.iter().map(|r| parse_token(r, level)).collect();

    let has_all = tokens.iter().any(|t| matches!(t, SelectorToken::All));
    let has_all_of_level = tokens
        .iter()
        .any(|t| matches!(t, SelectorToken::AllOfLevel));
    let has_literal = tokens.iter().any(|t| matches!(t, SelectorToken::Literal(_)));

    if has_all && (has_all_of_level || has_literal) {
        return Err(Error::BadValue {
            basename: raw.join(","),
            detail: format!(
                "'all' may only be combined with '{}', not with specific names or '{}'",
                sentinel_name(level, false),
                sentinel_name(level, true)
            ),
        });
    }
    if has_all_of_level && (tokens.len() > 1) {
        return Err(Error::BadValue {
            basename: raw.join(","),
            detail: format!(
                "'{}' must be the sole selector entry",
                sentinel_name(level, true)
            ),
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_alone_is_accepted() {
        let tokens = normalize_selector(&["all".to_string()], SelectorLevel::Sub).unwrap();
        assert_eq!(tokens, vec![SelectorToken::All]);
    }

    #[test]
    fn all_with_matching_non_sentinel_is_accepted() {
        let raw = vec!["all".to_string(), "all_non_sub".to_string()];
        let tokens = normalize_selector(&raw, SelectorLevel::Sub).unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn all_with_literal_is_rejected() {
        let raw = vec!["all".to_string(), "sub-001".to_string()];
        assert!(normalize_selector(&raw, SelectorLevel::Sub).is_err());
    }

    #[test]
    fn legacy_datatype_alias_normalises_to_canonical() {
        let tokens = normalize_selector(
            &["all_ses_level_non_data_type".to_string()],
            SelectorLevel::Datatype,
        )
        .unwrap();
        assert_eq!(tokens, vec![SelectorToken::AllNonOfLevel]);
    }
}
