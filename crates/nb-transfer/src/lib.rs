//! Selector→Include resolution and transfer planning/invocation.
//! Depends on `nb-backends` for the listing capability the
//! resolver needs but never spawns a transfer itself except through
//! [`invoke::run_transfer`]/[`invoke::run_diff`].

pub mod error;
pub mod invoke;
pub mod plan;
pub mod resolver;

pub use error::{Error, Result};
pub use invoke::{parse_diff, run_diff, run_transfer, DiffReport};
pub use plan::{plan_check, plan_copy, Direction, OverwritePolicy, TransferOptions, TransferPlan, Verbosity};
pub use resolver::{resolve_selector, ResolvedInclude};
