//! Path resolution for the persisted `.datashuttle` state layout, and
//! read-only enumeration of a local project tree. Consumed by
//! `nb-validate` (static checks) and `nb-backends` (local listing).

pub mod error;
pub mod path;
pub mod tree;

pub use error::{Error, Result};
