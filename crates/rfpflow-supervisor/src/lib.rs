//! Supervisor for the rfpflow pipeline
//!
//! The supervisor is the routing core: on every call it combines the
//! structural criteria check with the external validator's quality verdict,
//! applies the revision and rejection policies, and emits a fresh
//! [`RoutingDecision`] naming the next stage.
//!
//! # Routing policy
//!
//! - **Bootstrap**: nothing executed yet → first stage of the sequence.
//! - **Structural incompleteness** is always a local defect: it routes back
//!   to the same stage as a revision without ever consulting the quality
//!   validator, and never escalates to rejection.
//! - **`Valid`** advances along the sequence; past the last stage the run
//!   is complete.
//! - **`NeedsRevision`** retries the same stage, bounded by the revision
//!   cap; at the cap the supervisor forces acceptance and advances. This is
//!   the core termination guarantee: no stage can loop forever.
//! - **`Rejected`** reroutes per the rejection map (resetting the target's
//!   revision counter); with no map entry it degrades to a bounded in-place
//!   retry tagged as rejected.
//! - A validator that itself fails is treated as `NeedsRevision`; the
//!   supervisor fails open toward forward progress.

mod decision;
mod supervisor;

pub use decision::RoutingDecision;
pub use supervisor::Supervisor;
