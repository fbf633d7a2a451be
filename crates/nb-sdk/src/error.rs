use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The SDK's own error type: every lower-layer crate's error wraps in
/// here rather than being re-exported directly, so a caller matching on
/// `nb_sdk::Error` never has to know which internal crate raised it.
#[derive(Debug)]
pub enum Error {
    /// A precondition function rejected the call before any lower-layer
    /// operation ran (spec §9's "decorator checks → precondition
    /// functions" recipe).
    Precondition(String),
    Config(nb_config::Error),
    Credentials(nb_credentials::Error),
    Transfer(nb_transfer::Error),
    Backend(nb_backends::Error),
    Name(nb_types::Error),
    Core(nb_core::Error),
    /// Validation produced issues; the caller asked for `DisplayMode::Error`
    /// so the SDK raises at the first one instead of returning the batch.
    Validation(Vec<nb_validate::Issue>),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Precondition(msg) => write!(f, "precondition failed: {msg}"),
            Error::Config(err) => write!(f, "{err}"),
            Error::Credentials(err) => write!(f, "{err}"),
            Error::Transfer(err) => write!(f, "{err}"),
            Error::Backend(err) => write!(f, "{err}"),
            Error::Name(err) => write!(f, "{err}"),
            Error::Core(err) => write!(f, "{err}"),
            Error::Validation(issues) => {
                write!(f, "validation failed with {} issue(s):", issues.len())?;
                for issue in issues {
                    write!(f, "\n  {issue}")?;
                }
                Ok(())
            }
            Error::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Credentials(err) => Some(err),
            Error::Transfer(err) => Some(err),
            Error::Backend(err) => Some(err),
            Error::Name(err) => Some(err),
            Error::Core(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<nb_config::Error> for Error {
    fn from(err: nb_config::Error) -> Self {
        Error::Config(err)
    }
}

impl From<nb_credentials::Error> for Error {
    fn from(err: nb_credentials::Error) -> Self {
        Error::Credentials(err)
    }
}

impl From<nb_transfer::Error> for Error {
    fn from(err: nb_transfer::Error) -> Self {
        Error::Transfer(err)
    }
}

impl From<nb_backends::Error> for Error {
    fn from(err: nb_backends::Error) -> Self {
        Error::Backend(err)
    }
}

impl From<nb_types::Error> for Error {
    fn from(err: nb_types::Error) -> Self {
        Error::Name(err)
    }
}

impl From<nb_core::Error> for Error {
    fn from(err: nb_core::Error) -> Self {
        Error::Core(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
