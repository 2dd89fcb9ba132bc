//! Validation for rfpflow stage outputs
//!
//! Two distinct layers live here, and they are never mixed:
//!
//! - The **structural** layer: [`CriteriaTable`] holds the per-stage
//!   required-field lists and checks them against the typed output slots.
//!   It is pure, static configuration and never judges semantic quality.
//! - The **quality** layer: implementations of the
//!   [`StageValidator`](rfpflow_stage_api::StageValidator) contract.
//!   [`CommandValidator`] delegates the verdict to an external reviewer
//!   process; [`AutoApprove`] accepts everything (structural checks still
//!   apply upstream in the supervisor).

mod auto;
mod command;
mod criteria;

#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub use auto::AutoApprove;
pub use command::CommandValidator;
pub use criteria::CriteriaTable;
