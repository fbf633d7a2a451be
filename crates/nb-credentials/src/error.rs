use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The keychain backend rejected a get/set/delete call.
    Keyring(keyring::Error),
    /// The user rejected an unrecognised SSH host key, or a previously
    /// accepted host key no longer matches what the host presents.
    HostKeyRejected(String),
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Core(nb_core::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Keyring(err) => write!(f, "keychain error: {err}"),
            Error::HostKeyRejected(msg) => write!(f, "HostKeyRejected: {msg}"),
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Yaml(err) => write!(f, "YAML error: {err}"),
            Error::Core(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Keyring(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Yaml(err) => Some(err),
            Error::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<keyring::Error> for Error {
    fn from(err: keyring::Error) -> Self {
        Error::Keyring(err)
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
