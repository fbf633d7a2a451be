//! The static NeuroBlueprint ruleset and the name-against-project check
//!. This crate is filesystem-agnostic: callers in `nb-sdk`
//! gather folder names from `nb-core` (local) and `nb-backends`
//! (central) and hand them in as a [`validator::TreeScope`].

pub mod issue;
pub mod templates;
pub mod validator;

pub use issue::{DisplayMode, Issue};
pub use templates::expand_template_tags;
pub use validator::{
    check_datatype_folders, check_duplicate_names, check_project_name, check_templates,
    check_top_level_folder, check_zero_padding, parse_names, validate_new_names,
    validate_project, NameEntry, TreeScope,
};
