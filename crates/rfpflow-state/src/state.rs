use chrono::{DateTime, Utc};
use rfpflow_utils::types::StageId;
use serde::{Deserialize, Serialize};

use crate::document::SourceDocument;
use crate::outputs::StageOutputs;

/// The single mutable record threaded through a pipeline run.
///
/// One state object belongs to exactly one run and one thread at a time.
/// Stage processors receive it mutably but are contract-bound to only write
/// their own output slot and/or append to `errors`; the supervisor and
/// engine own the cursors.
///
/// # Lifecycle
///
/// Created once per run with empty slots, threaded through every stage and
/// supervisor call, and handed back to the caller at termination (success,
/// iteration cap, or otherwise) so partial results are always recoverable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Identifier for this run, used in logs and diagnostics.
    pub run_id: String,
    /// Raw input documents (opaque to the orchestration core).
    pub documents: Vec<SourceDocument>,
    /// One optional output slot per stage.
    pub outputs: StageOutputs,
    /// Ordered, append-only diagnostics; never cleared mid-run.
    pub errors: Vec<String>,
    /// Human-readable label of where the pipeline currently is.
    pub current_step: String,
    /// The stage most recently executed, if any.
    pub last_stage: Option<StageId>,
    /// When the state was created.
    pub started_at: DateTime<Utc>,
}

impl WorkflowState {
    /// Create a fresh state for one run over the given documents.
    #[must_use]
    pub fn new(run_id: impl Into<String>, documents: Vec<SourceDocument>) -> Self {
        Self {
            run_id: run_id.into(),
            documents,
            outputs: StageOutputs::default(),
            errors: Vec::new(),
            current_step: "workflow_start".to_string(),
            last_stage: None,
            started_at: Utc::now(),
        }
    }

    /// Append a diagnostic. Diagnostics are ordered and never removed.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record that `stage` just executed and derive the step label.
    pub fn mark_executed(&mut self, stage: StageId) {
        self.last_stage = Some(stage);
        self.current_step = format!("awaiting_validation:{stage}");
    }

    /// Whether any diagnostics were recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Concatenated text of all input documents, used by stages that scan
    /// the source material.
    #[must_use]
    pub fn combined_input(&self) -> String {
        self.documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> WorkflowState {
        WorkflowState::new(
            "run-test",
            vec![SourceDocument::new("rfp.txt", "Build an inventory system")],
        )
    }

    #[test]
    fn new_state_starts_with_empty_slots_and_no_cursor() {
        let state = sample_state();
        assert_eq!(state.outputs.populated_count(), 0);
        assert!(state.last_stage.is_none());
        assert_eq!(state.current_step, "workflow_start");
        assert!(!state.has_errors());
    }

    #[test]
    fn mark_executed_updates_both_cursors() {
        let mut state = sample_state();
        state.mark_executed(StageId::Planning);
        assert_eq!(state.last_stage, Some(StageId::Planning));
        assert_eq!(state.current_step, "awaiting_validation:planning");
    }

    #[test]
    fn errors_are_append_only_in_order() {
        let mut state = sample_state();
        state.record_error("first");
        state.record_error("second");
        assert_eq!(state.errors, vec!["first", "second"]);
    }

    #[test]
    fn combined_input_joins_documents() {
        let mut state = sample_state();
        state
            .documents
            .push(SourceDocument::new("annex.txt", "Integration with SAP"));
        let combined = state.combined_input();
        assert!(combined.contains("inventory system"));
        assert!(combined.contains("SAP"));
    }
}
