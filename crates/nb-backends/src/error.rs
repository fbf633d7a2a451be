use std::fmt;

/// Result type for nb-backends operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every [`crate::traits::ListingBackend`]
/// implementation: local filesystem errors collapse
/// straight to `Io`; the remote backends, which shell out to the
/// external transfer binary, classify its exit status into the other
/// three variants so callers can react uniformly regardless of which
/// backend raised them.
#[derive(Debug)]
pub enum Error {
    /// The requested path does not exist on this backend.
    NotFound(String),
    /// The backend rejected credentials or could not authenticate.
    AuthFailed(String),
    /// A connectivity failure (DNS, timeout, connection refused, ...).
    NetworkError(String),
    /// The backend process exited non-zero for a reason that isn't auth
    /// or network related (e.g. malformed remote config).
    BackendError(String),
    /// IO operation against the local filesystem failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(path) => write!(f, "not found: {path}"),
            Error::AuthFailed(msg) => write!(f, "authentication failed: {msg}"),
            Error::NetworkError(msg) => write!(f, "network error: {msg}"),
            Error::BackendError(msg) => write!(f, "backend error: {msg}"),
            Error::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(err.to_string()),
            _ => Error::Io(err),
        }
    }
}
