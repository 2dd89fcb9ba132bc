use serde::{Deserialize, Serialize};

use rfpflow_utils::types::{NextStage, Verdict};

/// A routing decision, produced fresh on every supervisor call.
///
/// Decisions are never persisted by the supervisor; the engine keeps them
/// in the run report as an audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// The stage to execute next, or `Complete`.
    pub next: NextStage,
    /// Verdict that produced this decision. Forced acceptances report
    /// `Valid`; the force is recorded in `reason`.
    pub verdict: Verdict,
    /// Human-readable explanation referencing the assessed stage.
    pub reason: String,
    /// Corrections the routed-to stage should apply, if any.
    pub required_corrections: Vec<String>,
    /// Routing confidence in [0, 1]. Diagnostic only; control flow never
    /// branches on it.
    pub confidence: f64,
}

impl RoutingDecision {
    /// Whether this decision ends the run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.next, NextStage::Complete)
    }
}
