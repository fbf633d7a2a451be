use nb_types::Code;
use std::fmt;
use std::path::PathBuf;

/// One validator finding. `kind` reuses the same closed
/// [`Code`] taxonomy the name parser raises, so a `BAD_VALUE` from a
/// malformed tag and a `BAD_VALUE` from the validator's static ruleset
/// render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: Code,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl Issue {
    pub fn new(kind: Code, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {} ({})", self.kind, self.message, path.display()),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// How collected issues are surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Stop and return at the first issue.
    Error,
    /// Collect every issue, return them all.
    Warn,
    /// Collect every issue and also render them (the SDK's job; this
    /// crate only distinguishes the mode so callers know whether to
    /// short-circuit).
    Print,
}
