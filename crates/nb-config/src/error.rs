use nb_types::Code;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the Configs/PersistentSettings lifecycle.
/// Cross-field validation failures carry the stable [`Code`] so a
/// caller rendering an error message gets the same `"{CODE}: {message}"`
/// shape as a name-validation error.
#[derive(Debug)]
pub enum Error {
    /// `make_config_file` called on a project that already has one.
    ConfigAlreadyExists { project_name: String },
    /// `load`/`update_config_file` called before a config exists.
    ConfigMissing { project_name: String },
    /// A single field failed its own-shape check (not absolute, wrong
    /// enum variant, unknown AWS region, ...).
    BadConfigField { field: String, detail: String },
    /// A cross-field rule was violated.
    ConfigIncompatible { detail: String },
    /// IO or (de)serialisation failure reading/writing the on-disk
    /// record.
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Core(nb_core::Error),
}

impl Error {
    pub fn code(&self) -> Code {
        match self {
            Error::ConfigAlreadyExists { .. } => Code::ConfigDuplicate,
            Error::ConfigMissing { .. } => Code::ConfigMissing,
            Error::BadConfigField { .. } => Code::BadConfigField,
            Error::ConfigIncompatible { .. } => Code::ConfigIncompatible,
            Error::Io(_) | Error::Yaml(_) | Error::Core(_) => Code::BadConfigField,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigAlreadyExists { project_name } => write!(
                f,
                "{}: a config file already exists for project '{project_name}'",
                self.code()
            ),
            Error::ConfigMissing { project_name } => write!(
                f,
                "{}: no config file found for project '{project_name}'; run make_config_file first",
                self.code()
            ),
            Error::BadConfigField { field, detail } => {
                write!(f, "{}: '{field}': {detail}", self.code())
            }
            Error::ConfigIncompatible { detail } => write!(f, "{}: {detail}", self.code()),
            Error::Io(err) => write!(f, "{}: {err}", self.code()),
            Error::Yaml(err) => write!(f, "{}: {err}", self.code()),
            Error::Core(err) => write!(f, "{}: {err}", self.code()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Yaml(err) => Some(err),
            Error::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl From<nb_core::Error> for Error {
    fn from(err: nb_core::Error) -> Self {
        Error::Core(err)
    }
}
