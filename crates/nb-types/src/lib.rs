//! Name grammar, tag expansion, the typed Configs/PersistentSettings
//! record shapes, the canonical datatype table, and selector tokens —
//! the shared vocabulary every other neuroshuttle crate builds on.

pub mod config;
pub mod datatype;
pub mod error;
pub mod name;
pub mod selector;
pub mod tags;

pub use config::{ConnectionMethod, Configs, NameTemplates, PersistentSettings, TopLevelFolder, TuiSettings};
pub use datatype::{Datatype, DatatypeClass, DatatypeLevel, DATATYPES};
pub use error::{Code, Error, Result};
pub use name::Name;
pub use selector::{normalize_selector, SelectorLevel, SelectorToken};
pub use tags::{contains_wildcard, extract_range_predicate, format_names, RangePredicate, WILDCARD_TAG};
