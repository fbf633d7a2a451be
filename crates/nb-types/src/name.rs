use crate::error::{Error, Result};
use std::fmt;

/// Reserved keys with a fixed-width value grammar.
pub const RESERVED_DATE: &str = "date";
pub const RESERVED_TIME: &str = "time";
pub const RESERVED_DATETIME: &str = "datetime";

/// A folder basename decomposed into an ordered sequence of key-value
/// pairs. The first pair is always the `sub`/`ses` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pairs: Vec<(String, String)>,
}

impl Name {
    /// Parse a folder basename into a `Name`, enforcing every invariant:
    /// exactly one prefix pair at position 0, no reserved key
    /// twice, an integer-leading prefix value, and the full-basename
    /// grammar `^(sub|ses)-[A-Za-z0-9]+(?:_[a-z][a-z0-9]*-[A-Za-z0-9]+)*$`.
    pub fn parse(basename: &str) -> Result<Name> {
        if basename.is_empty() || basename.contains(' ') || basename.contains("__") {
            return Err(Error::SpecialChar {
                basename: basename.to_string(),
                detail: "contains a space or a double underscore".to_string(),
            });
        }
        if basename.starts_with('_') || basename.ends_with('_') {
            return Err(Error::SpecialChar {
                basename: basename.to_string(),
                detail: "leading or trailing underscore".to_string(),
            });
        }

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut seen_keys: std::collections::HashSet<String> = std::collections::HashSet::new();

        for (index, part) in basename.split('_').enumerate() {
            let Some(dash) = part.find('-') else {
                if index == 0 {
                    return Err(Error::MissingPrefix {
                        basename: basename.to_string(),
                    });
                }
                return Err(Error::SpecialChar {
                    basename: basename.to_string(),
                    detail: format!("'{part}' is not a key-value pair"),
                });
            };
            let (key, value) = (&part[..dash], &part[dash + 1..]);

            if index == 0 {
                if key != "sub" && key != "ses" {
                    return Err(Error::MissingPrefix {
                        basename: basename.to_string(),
                    });
                }
            } else if !is_lower_alphanumeric_key(key) {
                return Err(Error::SpecialChar {
                    basename: basename.to_string(),
                    detail: format!("key '{key}' must be lowercase alphanumeric, starting with a letter"),
                });
            }

            if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(Error::SpecialChar {
                    basename: basename.to_string(),
                    detail: format!("value '{value}' must be non-empty alphanumeric"),
                });
            }

            if !seen_keys.insert(key.to_string()) {
                return Err(Error::DuplicateKey {
                    basename: basename.to_string(),
                    key: key.to_string(),
                });
            }

            validate_reserved_value(basename, key, value)?;

            pairs.push((key.to_string(), value.to_string()));
        }

        let leading_digits = leading_digit_run(&pairs[0].1);
        if leading_digits.is_empty() {
            return Err(Error::BadValue {
                basename: basename.to_string(),
                detail: format!(
                    "prefix value '{}' has no leading integer part",
                    pairs[0].1
                ),
            });
        }

        Ok(Name { pairs })
    }

    pub fn prefix(&self) -> &str {
        &self.pairs[0].0
    }

    pub fn prefix_value(&self) -> &str {
        &self.pairs[0].1
    }

    /// Leading run of digits in the prefix value, parsed as a non-negative
    /// integer. Used for range expansion and zero-padding checks.
    pub fn integer_part(&self) -> u64 {
        leading_digit_run(self.prefix_value())
            .parse()
            .expect("leading_digit_run is validated at parse time")
    }

    /// Decimal width of the prefix value's integer part, i.e. the number
    /// of digits used — this is what the zero-padding consistency rule
    /// compares across a project.
    pub fn integer_width(&self) -> usize {
        leading_digit_run(self.prefix_value()).len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Render the canonicalised basename: `prefix-value[_key-value]*`.
    pub fn to_basename(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}-{v}"))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_basename())
    }
}

fn is_lower_alphanumeric_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

fn leading_digit_run(value: &str) -> &str {
    let end = value
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    &value[..end]
}

fn validate_reserved_value(basename: &str, key: &str, value: &str) -> Result<()> {
    let (expected_len, label) = match key {
        RESERVED_DATE => (8, "date-YYYYMMDD"),
        RESERVED_TIME => (6, "time-HHMMSS"),
        RESERVED_DATETIME => (15, "datetime-YYYYMMDDTHHMMSS"),
        _ => return Ok(()),
    };
    if key == RESERVED_DATETIME {
        let valid = value.len() == 15
            && value[..8].chars().all(|c| c.is_ascii_digit())
            && value.as_bytes()[8] == b'T'
            && value[9..].chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(Error::BadValue {
                basename: basename.to_string(),
                detail: format!("'{key}-{value}' does not match {label}"),
            });
        }
        return Ok(());
    }
    if value.len() != expected_len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::BadValue {
            basename: basename.to_string(),
            detail: format!("'{key}-{value}' does not match {label}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_subject() {
        let name = Name::parse("sub-001").unwrap();
        assert_eq!(name.prefix(), "sub");
        assert_eq!(name.prefix_value(), "001");
        assert_eq!(name.integer_part(), 1);
        assert_eq!(name.integer_width(), 3);
    }

    #[test]
    fn parses_multi_key_session() {
        let name = Name::parse("ses-002_date-20240315_ephys-recorded").unwrap();
        assert_eq!(name.get("date"), Some("20240315"));
        assert_eq!(name.get("ephys"), Some("recorded"));
        assert_eq!(name.to_basename(), "ses-002_date-20240315_ephys-recorded");
    }

    #[test]
    fn rejects_missing_prefix() {
        let err = Name::parse("subject-001").unwrap_err();
        assert!(matches!(err, Error::MissingPrefix { .. }));
    }

    #[test]
    fn rejects_non_integer_value() {
        let err = Name::parse("sub-abc").unwrap_err();
        assert!(matches!(err, Error::BadValue { .. }));
    }

    #[test]
    fn rejects_double_underscore() {
        let err = Name::parse("sub-001__ses-001").unwrap_err();
        assert!(matches!(err, Error::SpecialChar { .. }));
    }

    #[test]
    fn rejects_duplicate_key() {
        let err = Name::parse("sub-001_date-20240101_date-20240102").unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }

    #[test]
    fn rejects_malformed_date_value() {
        let err = Name::parse("sub-001_date-2024").unwrap_err();
        assert!(matches!(err, Error::BadValue { .. }));
    }

    #[test]
    fn round_trips_through_display() {
        let name = Name::parse("sub-010_id-abc12").unwrap();
        assert_eq!(name.to_string(), "sub-010_id-abc12");
    }
}
