//! Tag expansion: `@DATE@`, `@TIME@`, `@DATETIME@`, `@TO@`,
//! `@DATETO@`/`@TIMETO@`/`@DATETIMETO@` range predicates, and the `@*@`
//! wildcard. Point tags (`@DATE@`/`@TIME@`/`@DATETIME@`/`@TO@`) are fully
//! expanded here into concrete basenames because they need only the
//! caller-supplied clock. Range-predicate and wildcard tags are left in
//! the name string — resolving them needs a directory listing, which is
//! the Selector→Include resolver's job (`nb-transfer`), not the
//! formatter's. The formatter does validate their *syntax* eagerly so a
//! malformed bound is reported at format time rather than silently
//! deferred to resolution.

use crate::error::{Error, Result};
use crate::name::Name;
use chrono::NaiveDateTime;

/// A range predicate embedded in an otherwise literal/wildcarded name,
/// constraining the value of `date`/`time`/`datetime` to `[start, end]`
/// by lexicographic (fixed-width) comparison. Produced by
/// [`extract_range_predicate`] for the Selector→Include resolver to use
/// against a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePredicate {
    pub key: &'static str,
    pub start: String,
    pub end: String,
    /// The literal template with the range tag and its bounds stripped
    /// out, `@*@` left in place for the caller to glob-match separately.
    pub template: String,
}

const DATE_TAG: &str = "@DATE@";
const TIME_TAG: &str = "@TIME@";
const DATETIME_TAG: &str = "@DATETIME@";
const TO_TAG: &str = "@TO@";
const DATETO_TAG: &str = "@DATETO@";
const TIMETO_TAG: &str = "@TIMETO@";
const DATETIMETO_TAG: &str = "@DATETIMETO@";
pub const WILDCARD_TAG: &str = "@*@";

/// Expand `@DATE@`/`@TIME@`/`@DATETIME@` point tags against `clock`.
/// `@DATETIME@` is recognised before `@DATE@`/`@TIME@` so that a name
/// using the combined tag is not partially matched by the point tags.
fn expand_point_tags(raw: &str, clock: &NaiveDateTime) -> Result<String> {
    let date = clock.format("%Y%m%d").to_string();
    let time = clock.format("%H%M%S").to_string();

    let mut out = raw.to_string();
    if out.contains(DATETIME_TAG) {
        if out.contains(DATE_TAG) || out.contains(TIME_TAG) {
            return Err(Error::DuplicateKey {
                basename: raw.to_string(),
                key: "datetime".to_string(),
            });
        }
        out = replace_tag_with_underscores(&out, DATETIME_TAG, &format!("date-{date}_time-{time}"));
    }
    if out.contains(DATE_TAG) {
        if out.contains("date-") && !out.contains(&format!("date-{date}")) {
            return Err(Error::DuplicateKey {
                basename: raw.to_string(),
                key: "date".to_string(),
            });
        }
        out = replace_tag_with_underscores(&out, DATE_TAG, &format!("date-{date}"));
    }
    if out.contains(TIME_TAG) {
        if out.contains("time-") && !out.contains(&format!("time-{time}")) {
            return Err(Error::DuplicateKey {
                basename: raw.to_string(),
                key: "time".to_string(),
            });
        }
        out = replace_tag_with_underscores(&out, TIME_TAG, &format!("time-{time}"));
    }
    Ok(out)
}

/// Replace a bare `@TAG@` occurrence, inserting a leading underscore when
/// the character before the tag is not already `_` and the tag is not at
/// the start of the string, so the result conforms to the key-value
/// grammar.
fn replace_tag_with_underscores(raw: &str, tag: &str, replacement: &str) -> String {
    match raw.find(tag) {
        Some(pos) => {
            let needs_underscore = pos > 0 && !raw[..pos].ends_with('_');
            let mut out = String::with_capacity(raw.len());
            out.push_str(&raw[..pos]);
            if needs_underscore {
                out.push('_');
            }
            out.push_str(replacement);
            out.push_str(&raw[pos + tag.len()..]);
            out
        }
        None => raw.to_string(),
    }
}

/// Expand one `<prefix>-<A>@TO@<B>[<suffix>]` range tag into the inclusive
/// list `[A..B]`, preserving the decimal width of `A`. Returns `raw`
/// unchanged (as a single-element vec) if it
/// contains no `@TO@` tag.
fn expand_to_range(raw: &str) -> Result<Vec<String>> {
    let Some(tag_pos) = raw.find(TO_TAG) else {
        return Ok(vec![raw.to_string()]);
    };

    // Find the start of the numeric value immediately before the tag: the
    // run back from tag_pos of alphanumeric characters up to the last '-'.
    let before = &raw[..tag_pos];
    let dash = before.rfind('-').ok_or_else(|| Error::BadValue {
        basename: raw.to_string(),
        detail: format!("'{TO_TAG}' must follow a '<key>-<value>' pair"),
    })?;
    let head = &raw[..=dash]; // includes trailing '-'
    let start_str = &before[dash + 1..];

    let after = &raw[tag_pos + TO_TAG.len()..];
    let end_end = after
        .find('_')
        .unwrap_or(after.len());
    let (end_str, suffix) = split_leading_digits(&after[..end_end]);
    let tail = &after[end_end..];

    if start_str.is_empty() || !start_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::BadValue {
            basename: raw.to_string(),
            detail: format!("'{TO_TAG}' start bound '{start_str}' is not an integer"),
        });
    }
    if end_str.is_empty() || !end_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::BadValue {
            basename: raw.to_string(),
            detail: format!("'{TO_TAG}' end bound '{end_str}' is not an integer"),
        });
    }

    let width = start_str.len();
    let start: u64 = start_str.parse().expect("validated digits");
    let end: u64 = end_str.parse().expect("validated digits");
    if start > end {
        return Err(Error::BadValue {
            basename: raw.to_string(),
            detail: format!("'{TO_TAG}' range start {start} is greater than end {end}"),
        });
    }

    let mut out = Vec::with_capacity((end - start + 1) as usize);
    for n in start..=end {
        out.push(format!("{head}{n:0width$}{suffix}{tail}"));
    }
    Ok(out)
}

fn split_leading_digits(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Validate (but do not resolve) a `@DATETO@`/`@TIMETO@`/`@DATETIMETO@`
/// range predicate's syntax: `<start>TAG<end>`, the tag appearing once,
/// with `start` taken as the digit run immediately preceding the tag and
/// `end` as the digit run immediately following it. A malformed bound
/// (e.g. `2024030@DATETO@20240401`) raises `BadValue` naming the tag,
/// rather than the source's undocumented `Invalid`.
pub fn extract_range_predicate(raw: &str) -> Result<Option<RangePredicate>> {
    for (tag, key, width) in [
        (DATETIMETO_TAG, "datetime", 15usize),
        (DATETO_TAG, "date", 8),
        (TIMETO_TAG, "time", 6),
    ] {
        let Some(tag_pos) = raw.find(tag) else {
            continue;
        };
        let before = &raw[..tag_pos];
        let digit_start = before.len()
            - before
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .count();
        let start = &before[digit_start..];
        let prefix = &before[..digit_start];

        let after = &raw[tag_pos + tag.len()..];
        let end_len = after
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        let end = &after[..end_len];
        let tail = &after[end_len..];

        let bound_ok = |b: &str| {
            if key == "datetime" {
                b.len() == width
                    && b[..8].chars().all(|c| c.is_ascii_digit())
                    && b.as_bytes().get(8) == Some(&b'T')
                    && b[9..].chars().all(|c| c.is_ascii_digit())
            } else {
                b.len() == width && b.chars().all(|c| c.is_ascii_digit())
            }
        };
        if !bound_ok(start) || !bound_ok(end) {
            return Err(Error::BadValue {
                basename: raw.to_string(),
                detail: format!("'{tag}' bounds '{start}'/'{end}' must each be {width} characters"),
            });
        }
        if start > end {
            return Err(Error::BadValue {
                basename: raw.to_string(),
                detail: format!("'{tag}' start '{start}' is after end '{end}'"),
            });
        }

        let template = format!("{prefix}{WILDCARD_TAG}{tail}");
        return Ok(Some(RangePredicate {
            key: match key {
                "date" => "date",
                "time" => "time",
                _ => "datetime",
            },
            start: start.to_string(),
            end: end.to_string(),
            template,
        }));
    }
    Ok(None)
}

pub fn contains_wildcard(raw: &str) -> bool {
    raw.contains(WILDCARD_TAG)
}

/// Ensure `raw` begins with a `sub-`/`ses-` prefix matching `prefix`,
/// prepending one if the input carries none at all.
fn ensure_prefix(raw: &str, prefix: &str) -> String {
    if raw.starts_with("sub-") || raw.starts_with("ses-") {
        raw.to_string()
    } else {
        format!("{prefix}-{raw}")
    }
}

/// `NameFormatter::format_names`: take raw user strings, with
/// or without the prefix, ensure the prefix, expand all tags, deduplicate
/// while preserving first-seen order, and return canonical basenames.
pub fn format_names(inputs: &[String], prefix: &str, clock: &NaiveDateTime) -> Result<Vec<String>> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for raw in inputs {
        let prefixed = ensure_prefix(raw, prefix);
        let point_expanded = expand_point_tags(&prefixed, clock)?;
        let range_expanded = expand_to_range(&point_expanded)?;

        for candidate in range_expanded {
            // A name still carrying a range-predicate or wildcard tag is
            // left as-is (validated syntactically, not parsed against the
            // concrete-name grammar) for the resolver to expand later.
            let has_deferred_tag = extract_range_predicate(&candidate)?.is_some()
                || contains_wildcard(&candidate);
            let canonical = if has_deferred_tag {
                candidate
            } else {
                Name::parse(&candidate)?.to_basename()
            };
            if seen.insert(canonical.clone()) {
                out.push(canonical);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap()
    }

    #[test]
    fn expands_date_tag() {
        let names = format_names(&["sub-001_@DATE@".to_string()], "sub", &clock()).unwrap();
        assert_eq!(names, vec!["sub-001_date-20240315".to_string()]);
    }

    #[test]
    fn expands_datetime_tag() {
        let names = format_names(&["sub-001_@DATETIME@".to_string()], "sub", &clock()).unwrap();
        assert_eq!(
            names,
            vec!["sub-001_date-20240315_time-133000".to_string()]
        );
    }

    #[test]
    fn range_preserves_start_width() {
        let names = format_names(&["sub-001@TO@003".to_string()], "sub", &clock()).unwrap();
        assert_eq!(
            names,
            vec![
                "sub-001".to_string(),
                "sub-002".to_string(),
                "sub-003".to_string()
            ]
        );
    }

    #[test]
    fn range_without_padding() {
        let names = format_names(&["sub-1@TO@3".to_string()], "sub", &clock()).unwrap();
        assert_eq!(
            names,
            vec!["sub-1".to_string(), "sub-2".to_string(), "sub-3".to_string()]
        );
    }

    #[test]
    fn range_start_after_end_is_bad_value() {
        let err = format_names(&["sub-003@TO@001".to_string()], "sub", &clock()).unwrap_err();
        assert!(matches!(err, Error::BadValue { .. }));
    }

    #[test]
    fn dedups_preserving_first_seen_order() {
        let names = format_names(
            &["sub-001".to_string(), "001".to_string(), "sub-002".to_string()],
            "sub",
            &clock(),
        )
        .unwrap();
        assert_eq!(names, vec!["sub-001".to_string(), "sub-002".to_string()]);
    }

    #[test]
    fn tag_idempotence_on_already_expanded_name() {
        let once = format_names(&["sub-001_@DATE@".to_string()], "sub", &clock()).unwrap();
        let twice = format_names(&[once[0].clone()], "sub", &clock()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn dateto_malformed_bound_is_bad_value() {
        let err = extract_range_predicate("ses-@*@_2024030@DATETO@20240401").unwrap_err();
        assert!(matches!(err, Error::BadValue { .. }));
    }

    #[test]
    fn dateto_well_formed_extracts_predicate() {
        let pred = extract_range_predicate("ses-@*@_20240315@DATETO@20240401")
            .unwrap()
            .unwrap();
        assert_eq!(pred.key, "date");
        assert_eq!(pred.start, "20240315");
        assert_eq!(pred.end, "20240401");
    }
}
