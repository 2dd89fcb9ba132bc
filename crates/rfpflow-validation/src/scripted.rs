//! Scripted validator for deterministic orchestration tests.
//!
//! Gated behind the `test-utils` feature so production builds never carry
//! it. The fake plays back a programmed sequence of assessments and records
//! which stages it was asked about.

use std::collections::VecDeque;
use std::sync::Mutex;

use rfpflow_stage_api::{Assessment, StageValidator};
use rfpflow_state::WorkflowState;
use rfpflow_utils::error::ValidatorError;
use rfpflow_utils::types::StageId;

/// Validator that returns a programmed sequence of assessments, then a
/// default once the script runs dry.
#[derive(Debug)]
pub struct ScriptedValidator {
    script: Mutex<VecDeque<Assessment>>,
    exhausted: Assessment,
    calls: Mutex<Vec<StageId>>,
}

impl ScriptedValidator {
    /// Play back `script` in order, then answer `Valid` forever.
    #[must_use]
    pub fn new(script: Vec<Assessment>) -> Self {
        Self::with_exhausted(script, Assessment::valid("scripted default"))
    }

    /// Play back `script` in order, then answer `exhausted` forever.
    #[must_use]
    pub fn with_exhausted(script: Vec<Assessment>, exhausted: Assessment) -> Self {
        Self {
            script: Mutex::new(script.into()),
            exhausted,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Stages this validator has been asked to assess, in order.
    #[must_use]
    pub fn assessed_stages(&self) -> Vec<StageId> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl StageValidator for ScriptedValidator {
    fn assess(
        &self,
        _state: &WorkflowState,
        stage: StageId,
    ) -> Result<Assessment, ValidatorError> {
        self.calls.lock().expect("calls lock poisoned").push(stage);
        let next = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.exhausted.clone());
        Ok(next)
    }
}

/// Validator whose assessment itself always fails.
///
/// Exercises the supervisor's fail-open path: a broken validator must
/// degrade to `NeedsRevision`, never wedge the run.
#[derive(Debug, Clone, Default)]
pub struct ErroringValidator {
    pub message: String,
}

impl ErroringValidator {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl StageValidator for ErroringValidator {
    fn assess(
        &self,
        _state: &WorkflowState,
        _stage: StageId,
    ) -> Result<Assessment, ValidatorError> {
        Err(ValidatorError::Other(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfpflow_state::SourceDocument;
    use rfpflow_utils::types::Verdict;

    fn state() -> WorkflowState {
        WorkflowState::new("run-scripted", vec![SourceDocument::new("a", "b")])
    }

    #[test]
    fn plays_back_script_then_default() {
        let validator = ScriptedValidator::new(vec![
            Assessment::needs_revision("thin", vec![]),
            Assessment::rejected("rework", vec![]),
        ]);
        let state = state();
        assert_eq!(
            validator.assess(&state, StageId::Planning).unwrap().verdict,
            Verdict::NeedsRevision
        );
        assert_eq!(
            validator.assess(&state, StageId::Planning).unwrap().verdict,
            Verdict::Rejected
        );
        assert_eq!(
            validator.assess(&state, StageId::Planning).unwrap().verdict,
            Verdict::Valid
        );
        assert_eq!(
            validator.assessed_stages(),
            vec![StageId::Planning, StageId::Planning, StageId::Planning]
        );
    }

    #[test]
    fn erroring_validator_always_errors() {
        let validator = ErroringValidator::new("reviewer offline");
        let err = validator.assess(&state(), StageId::Planning).unwrap_err();
        assert!(err.to_string().contains("reviewer offline"));
    }
}
