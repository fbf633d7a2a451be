use std::fmt;
use std::path::PathBuf;

/// Result type for nb-types operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The stable code strings shared by the parser, the formatter and the
/// validator so a single taxonomy is rendered
/// consistently no matter which layer raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    MissingPrefix,
    BadValue,
    SpecialChar,
    DuplicateKey,
    BadName,
    Datatype,
    DuplicateName,
    ValueLength,
    Template,
    ProjectName,
    TopLevelFolder,
    ConfigMissing,
    ConfigDuplicate,
    BadConfigField,
    ConfigIncompatible,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::MissingPrefix => "MISSING_PREFIX",
            Code::BadValue => "BAD_VALUE",
            Code::SpecialChar => "SPECIAL_CHAR",
            Code::DuplicateKey => "DUPLICATE_KEY",
            Code::BadName => "BAD_NAME",
            Code::Datatype => "DATATYPE",
            Code::DuplicateName => "DUPLICATE_NAME",
            Code::ValueLength => "VALUE_LENGTH",
            Code::Template => "TEMPLATE",
            Code::ProjectName => "PROJECT_NAME",
            Code::TopLevelFolder => "TOP_LEVEL_FOLDER",
            Code::ConfigMissing => "ConfigMissing",
            Code::ConfigDuplicate => "ConfigDuplicate",
            Code::BadConfigField => "BadConfigField",
            Code::ConfigIncompatible => "ConfigIncompatible",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for nb-types operations: parsing a basename, expanding tags,
/// and validating a Configs record's own field shape (cross-field rules
/// live one layer up, in nb-config, since they need the full record).
#[derive(Debug)]
pub enum Error {
    /// A basename does not start with `sub-`/`ses-`.
    MissingPrefix { basename: String },
    /// The prefix value (or a tag range bound) is not a non-negative
    /// integer-leading token, or a reserved key's value has the wrong shape.
    BadValue { basename: String, detail: String },
    /// The basename contains characters outside the key-value grammar.
    SpecialChar { basename: String, detail: String },
    /// A reserved key (or a tag and its point equivalent) appears twice.
    DuplicateKey { basename: String, key: String },
    /// IO failure while resolving a path-bearing field.
    Io(std::io::Error),
}

impl Error {
    pub fn code(&self) -> Code {
        match self {
            Error::MissingPrefix { .. } => Code::MissingPrefix,
            Error::BadValue { .. } => Code::BadValue,
            Error::SpecialChar { .. } => Code::SpecialChar,
            Error::DuplicateKey { .. } => Code::DuplicateKey,
            Error::Io(_) => Code::BadConfigField,
        }
    }

    /// The offending path, when this error is attributable to one on disk.
    /// Name-level errors carry only a basename, not a full path; callers
    /// that know the parent directory attach it when re-wrapping.
    pub fn offending_path(&self) -> Option<PathBuf> {
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingPrefix { basename } => write!(
                f,
                "{}: '{}' does not start with 'sub-' or 'ses-'",
                self.code(),
                basename
            ),
            Error::BadValue { basename, detail } => {
                write!(f, "{}: '{}': {}", self.code(), basename, detail)
            }
            Error::SpecialChar { basename, detail } => {
                write!(f, "{}: '{}': {}", self.code(), basename, detail)
            }
            Error::DuplicateKey { basename, key } => write!(
                f,
                "{}: '{}' uses key '{}' more than once",
                self.code(),
                basename,
                key
            ),
            Error::Io(err) => write!(f, "{}: {}", self.code(), err),
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
        Error::Io(err)
    }
}
