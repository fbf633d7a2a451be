use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type for selector resolution, transfer planning and invocation.
#[derive(Debug)]
pub enum Error {
    /// A selector failed to normalise (bad mixing, malformed tag, ...).
    BadSelector(String),
    /// The listing backend raised an error while the resolver was
    /// walking the source tree.
    Backend(nb_backends::Error),
    /// The external transfer binary could not be spawned or its output
    /// could not be parsed.
    Io(std::io::Error),
    /// `rclone check --combined -` emitted a line with an unrecognised
    /// prefix symbol.
    DiffParse(String),
    /// The transfer binary's own classification of a non-zero exit
    /// that wasn't auth/network related.
    Fatal(String),
    /// Some files failed to transfer but the process returned 0.
    PartialTransfer(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadSelector(msg) => write!(f, "bad selector: {msg}"),
            Error::Backend(err) => write!(f, "backend error: {err}"),
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::DiffParse(msg) => write!(f, "could not parse diff output: {msg}"),
            Error::Fatal(msg) => write!(f, "transfer failed: {msg}"),
            Error::PartialTransfer(msg) => write!(f, "transfer partially failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Backend(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nb_backends::Error> for Error {
    fn from(err: nb_backends::Error) -> Self {
        Error::Backend(err)
    }
}

impl From<nb_types::Error> for Error {
    fn from(err: nb_types::Error) -> Self {
        Error::BadSelector(err.to_string())
    }
}
