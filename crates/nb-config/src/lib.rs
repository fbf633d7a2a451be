//! Configs and PersistentSettings load/save/update lifecycle. Owns the
//! on-disk `config.yaml`/`persistent_settings.yaml` shape
//! under `~/.datashuttle/<project_name>/` (path resolution lives in
//! `nb-core`); cross-field validation lives in its own module so
//! `nb-sdk` can run it standalone ahead of a write when it wants to
//! surface an error before touching disk at all.

pub mod configs;
pub mod error;
pub mod settings;
pub mod validate;

pub use configs::{load, make_config_file, update_config_file, ConfigFields};
pub use error::{Error, Result};
pub use validate::validate_cross_field;
