//! Thin CLI binary over `nb-sdk`. Every subcommand maps onto exactly one
//! [`nb_sdk::Project`] method; this crate owns argument parsing and
//! human-readable rendering only.

mod args;
mod args_convert;
mod commands;
mod output;

pub use args::Cli;
pub use commands::run;
