//! Transfer invocation: runs a composed [`crate::plan::TransferPlan`]
//! through the external transfer binary, and parses its `check
//! --combined -` diff output. Exit-code/stderr
//! classification mirrors `nb_backends::rclone::classify_output`, but
//! additionally distinguishes `PartialTransfer` — a zero exit status
//! whose stderr nonetheless reports skipped files.

use crate::error::{Error, Result};
use crate::plan::TransferPlan;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// One bucket of `rclone check --combined -` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub same: Vec<PathBuf>,
    pub different: Vec<PathBuf>,
    pub local_only: Vec<PathBuf>,
    pub central_only: Vec<PathBuf>,
    pub error: Vec<PathBuf>,
}

/// Parse `rclone check --combined -` output: each line is `<symbol> <path>`
/// where symbol is one of `=`/`*`/`+`/`-`/`!`. An unrecognised prefix is a
/// fatal parse error, not a silently-dropped line.
pub fn parse_diff(output: &str) -> Result<DiffReport> {
    let mut report = DiffReport::default();
    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        let mut chars = line.chars();
        let symbol = chars.next().ok_or_else(|| Error::DiffParse(line.to_string()))?;
        let separator = chars.next();
        if separator != Some(' ') {
            return Err(Error::DiffParse(format!(
                "expected a space as the second character in '{line}'"
            )));
        }
        let path = PathBuf::from(&line[2..]);
        match symbol {
            '=' => report.same.push(path),
            '*' => report.different.push(path),
            '+' => report.local_only.push(path),
            '-' => report.central_only.push(path),
            '!' => report.error.push(path),
            other => {
                return Err(Error::DiffParse(format!(
                    "unrecognised check symbol '{other}' in '{line}'"
                )))
            }
        }
    }
    Ok(report)
}

fn binary_name() -> &'static str {
    "rclone"
}

fn run(plan: &TransferPlan) -> Result<Output> {
    Command::new(binary_name())
        .args(&plan.args)
        .stdin(Stdio::null())
        .output()
        .map_err(Error::from)
}

/// Classify a completed process: the binary's
/// exit code and stderr are surfaced verbatim via the `Error` payload,
/// bucketed into `AuthFailed`/`NetworkError`/`PartialTransfer`/`Fatal`.
/// `PartialTransfer` is the one case that is reported without being an
/// error the caller must propagate — it comes back as `Ok` with the
/// stderr text, reported but not escalated.
pub fn classify_transfer_result(output: &Output) -> Result<String> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        if stderr.to_lowercase().contains("errors:") || stderr.to_lowercase().contains("failed to copy") {
            return Err(Error::PartialTransfer(stderr));
        }
        return Ok(stdout);
    }

    let lower = stderr.to_lowercase();
    if lower.contains("permission denied") || lower.contains("authentication") {
        return Err(nb_backends::Error::AuthFailed(stderr).into());
    }
    if lower.contains("network") || lower.contains("connection refused") || lower.contains("timeout") {
        return Err(nb_backends::Error::NetworkError(stderr).into());
    }
    Err(Error::Fatal(stderr))
}

/// Run the `copy` plan and report the classified outcome. The process is
/// never retried: a single invocation, its result classified
/// once.
pub fn run_transfer(plan: &TransferPlan) -> Result<String> {
    let output = run(plan)?;
    classify_transfer_result(&output)
}

/// Run the `check --combined -` plan and parse its diff.
pub fn run_diff(plan: &TransferPlan) -> Result<DiffReport> {
    let output = run(plan)?;
    let stdout = classify_transfer_result(&output)?;
    parse_diff(&stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_bucket() {
        let output = "= same/file\n* different/file\n+ local/file\n- central/file\n";
        let report = parse_diff(output).unwrap();
        assert_eq!(report.same, vec![PathBuf::from("same/file")]);
        assert_eq!(report.different, vec![PathBuf::from("different/file")]);
        assert_eq!(report.local_only, vec![PathBuf::from("local/file")]);
        assert_eq!(report.central_only, vec![PathBuf::from("central/file")]);
    }

    #[test]
    fn unknown_symbol_is_fatal_parse_error() {
        let err = parse_diff("? mystery/file\n").unwrap_err();
        assert!(matches!(err, Error::DiffParse(_)));
    }

    #[test]
    fn missing_separator_space_is_parse_error() {
        let err = parse_diff("=mystery/file\n").unwrap_err();
        assert!(matches!(err, Error::DiffParse(_)));
    }
}
