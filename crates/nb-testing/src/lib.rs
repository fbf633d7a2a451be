//! Testing infrastructure shared by the neuroshuttle workspace's
//! integration tests.
//!
//! - `fixtures`: scratch project trees (`sub-*/ses-*/<datatype>`) and
//!   `DATASHUTTLE_HOME` isolation.
//! - `assertions`: issue-kind and include-list assertions tailored to
//!   the validator/resolver's output shapes.
//! - `process`: a pre-wired `neuroshuttle` CLI command for `assert_cmd`
//!   tests.

pub mod assertions;
pub mod fixtures;
pub mod process;

pub use fixtures::{with_datashuttle_home, ProjectFixture};
