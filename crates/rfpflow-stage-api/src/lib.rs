//! Stage and validator contracts for the rfpflow pipeline
//!
//! This crate defines the two seams between the orchestration core and its
//! external collaborators: the [`StageProcessor`] that performs one stage's
//! work, and the [`StageValidator`] that judges a finished stage's quality.
//!
//! # Purpose
//!
//! Keeping the contracts in their own crate lets the supervisor, engine,
//! and stage implementations depend on a shared minimal surface without
//! circular dependencies.

use serde::{Deserialize, Serialize};

use rfpflow_state::WorkflowState;
use rfpflow_utils::error::ValidatorError;
use rfpflow_utils::types::{StageId, Verdict};

/// Quality assessment of a stage's output, as produced by a validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Three-valued quality verdict.
    pub verdict: Verdict,
    /// Free-text explanation of the verdict.
    pub reason: String,
    /// Concrete corrections the stage should apply, if any.
    #[serde(default)]
    pub corrections: Vec<String>,
}

impl Assessment {
    /// Shorthand for a passing assessment.
    #[must_use]
    pub fn valid(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Valid,
            reason: reason.into(),
            corrections: Vec::new(),
        }
    }

    /// Shorthand for a revision request with corrections.
    #[must_use]
    pub fn needs_revision(reason: impl Into<String>, corrections: Vec<String>) -> Self {
        Self {
            verdict: Verdict::NeedsRevision,
            reason: reason.into(),
            corrections,
        }
    }

    /// Shorthand for a rejection with corrections.
    #[must_use]
    pub fn rejected(reason: impl Into<String>, corrections: Vec<String>) -> Self {
        Self {
            verdict: Verdict::Rejected,
            reason: reason.into(),
            corrections,
        }
    }
}

/// Core trait implemented by every pipeline stage.
///
/// A processor reads prior stage outputs from the state, performs its work,
/// and either populates its own output slot or returns an error. Contract:
///
/// - It may only write the output slot matching [`id()`](Self::id) and/or
///   append to `state.errors`.
/// - It must not touch other stages' slots or any routing bookkeeping.
/// - A returned error is recoverable: the engine records a diagnostic and
///   keeps the run alive, so processors should return errors rather than
///   panic.
///
/// A processor may block internally (subprocess, file I/O); timeout policy,
/// if any, is its own responsibility and invisible to the supervisor.
pub trait StageProcessor {
    /// The stage whose slot this processor owns.
    fn id(&self) -> StageId;

    /// Perform the stage's work against the shared state.
    ///
    /// # Errors
    /// Any failure performing the stage's work. The engine converts the
    /// error into a diagnostic on the state and continues the run.
    fn run(&self, state: &mut WorkflowState) -> anyhow::Result<()>;
}

/// Quality judgment over a finished stage's output.
///
/// Implementations must be read-only over the state and deterministic
/// enough to make forward progress under the revision cap. The supervisor
/// treats an `Err` as `NeedsRevision` (fail-open toward forward progress,
/// never fail-closed into an unrecoverable state) and records a diagnostic.
pub trait StageValidator {
    /// Assess the output of `stage` as currently present in `state`.
    ///
    /// # Errors
    /// Returns a [`ValidatorError`] if the assessment itself failed (e.g.
    /// the external reviewer process could not be reached).
    fn assess(&self, state: &WorkflowState, stage: StageId)
    -> Result<Assessment, ValidatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_shorthands_set_the_verdict() {
        assert_eq!(Assessment::valid("ok").verdict, Verdict::Valid);
        assert_eq!(
            Assessment::needs_revision("thin", vec!["expand".into()]).verdict,
            Verdict::NeedsRevision
        );
        let rejected = Assessment::rejected("rework", vec!["redesign".into()]);
        assert_eq!(rejected.verdict, Verdict::Rejected);
        assert_eq!(rejected.corrections, vec!["redesign".to_string()]);
    }

    #[test]
    fn corrections_default_when_absent_from_wire_form() {
        let parsed: Assessment =
            serde_json::from_str(r#"{"verdict":"valid","reason":"fine"}"#).unwrap();
        assert!(parsed.corrections.is_empty());
    }
}
