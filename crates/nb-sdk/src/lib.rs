//! The public library facade: every CLI-surface entry point —
//! `make_config_file`, `create_folders`, `upload_custom`/
//! `download_custom`, `validate_project`, `setup_ssh_connection`,
//! `get_next_sub`, … — hangs off [`Project`], which composes
//! `nb-types`/`nb-core`/`nb-validate`/`nb-transfer`/`nb-backends`/
//! `nb-credentials`/`nb-config` rather than reimplementing any of their
//! logic.

pub mod cancellable;
pub mod error;
pub mod logging;
pub mod precondition;
pub mod project;

pub use cancellable::CancellableTransfer;
pub use error::{Error, Result};
pub use logging::LogSink;
pub use project::Project;

pub use nb_config::ConfigFields;
pub use nb_transfer::{Direction, OverwritePolicy, TransferOptions, Verbosity};
pub use nb_types::{ConnectionMethod, TopLevelFolder};
pub use nb_validate::{DisplayMode, Issue};
