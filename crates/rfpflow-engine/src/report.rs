use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rfpflow_state::WorkflowState;
use rfpflow_supervisor::RoutingDecision;
use rfpflow_utils::types::StageId;

/// How a run ended.
///
/// `IterationCapped` is the only non-success terminal state the engine can
/// reach; everything else recovers into diagnostics and keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every stage was accepted and the supervisor reported completion.
    Complete,
    /// The outermost safety net tripped before completion.
    IterationCapped,
}

impl RunOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::IterationCapped => "iteration_capped",
        }
    }

    /// Whether the run finished all stages.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Terminal result of one engine run.
///
/// Always carries the full terminal state, on success and at the iteration
/// cap alike, so callers can recover partial results alongside any
/// accumulated diagnostics.
#[derive(Debug)]
pub struct RunReport {
    /// The terminal workflow state.
    pub state: WorkflowState,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Number of stage invocations performed.
    pub iterations: u32,
    /// Every routing decision made, in order (the audit trail).
    pub decisions: Vec<RoutingDecision>,
    /// When the report was produced.
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    #[must_use]
    pub fn new(
        state: WorkflowState,
        outcome: RunOutcome,
        iterations: u32,
        decisions: Vec<RoutingDecision>,
    ) -> Self {
        Self {
            state,
            outcome,
            iterations,
            decisions,
            finished_at: Utc::now(),
        }
    }

    /// Condensed, serializable view of the run for logs and status output.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let stages_total = StageId::all().len();
        RunSummary {
            run_id: self.state.run_id.clone(),
            outcome: self.outcome,
            iterations: self.iterations,
            error_count: self.state.errors.len(),
            stages_populated: self.state.outputs.populated_count(),
            stages_total,
            last_stage: self.state.last_stage,
            finished_at: self.finished_at,
        }
    }
}

/// Condensed run result, emitted at the end of every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub outcome: RunOutcome,
    pub iterations: u32,
    pub error_count: usize,
    /// Populated output slots out of `stages_total`.
    pub stages_populated: usize,
    pub stages_total: usize,
    pub last_stage: Option<StageId>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfpflow_state::SourceDocument;

    #[test]
    fn summary_counts_populated_slots() {
        let mut state =
            WorkflowState::new("run-report", vec![SourceDocument::new("a.txt", "text")]);
        state.outputs.plan = Some(rfpflow_state::PlanRecord::default());
        state.record_error("one diagnostic");

        let report = RunReport::new(state, RunOutcome::IterationCapped, 7, vec![]);
        let summary = report.summary();
        assert_eq!(summary.outcome, RunOutcome::IterationCapped);
        assert_eq!(summary.iterations, 7);
        assert_eq!(summary.stages_populated, 1);
        assert_eq!(summary.stages_total, 6);
        assert_eq!(summary.error_count, 1);
        assert!(!summary.outcome.is_success());
    }
}
