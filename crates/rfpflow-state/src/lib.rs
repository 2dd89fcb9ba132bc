//! Workflow state for the rfpflow pipeline
//!
//! This crate holds the single mutable record threaded through a run: the
//! source documents, one typed output slot per stage, an append-only
//! diagnostics list, and the routing cursors. It also provides the
//! `RevisionTracker` value object the supervisor uses to bound retry loops.
//!
//! Stage processors receive `&mut WorkflowState` and must only write their
//! own output slot and/or append diagnostics; the revision tracker is never
//! part of the state, so no processor can touch supervisor bookkeeping.

mod document;
mod outputs;
mod revision;
mod state;

pub use document::SourceDocument;
pub use outputs::{
    ArchitectureRecord, DiagramSpec, DiagramsRecord, EffortEstimate, FinalReviewRecord,
    Milestone, PlanRecord, RequirementsRecord, ReviewFinding, Severity, StageOutputs,
    SystemComponent, TechnicalReviewRecord, TechnologyChoice,
};
pub use revision::RevisionTracker;
pub use state::WorkflowState;
