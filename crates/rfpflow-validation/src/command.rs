//! External reviewer invocation.
//!
//! The quality verdict comes from a configured reviewer command: in
//! production an LLM-backed CLI, in tests a small script. The contract is
//! a JSON review request on stdin and a JSON verdict on stdout:
//!
//! ```text
//! stdin:  {"run_id": "...", "stage": "planning", "outputs": {...}, "error_count": 0}
//! stdout: {"verdict": "needs_revision", "reason": "...", "corrections": ["..."]}
//! ```
//!
//! Every failure mode (spawn, non-zero exit, unparseable output) surfaces
//! as a [`ValidatorError`]; the supervisor fails open to `NeedsRevision`.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::debug;

use rfpflow_stage_api::{Assessment, StageValidator};
use rfpflow_state::{StageOutputs, WorkflowState};
use rfpflow_utils::error::ValidatorError;
use rfpflow_utils::types::StageId;

/// Review request shipped to the external reviewer on stdin.
#[derive(Debug, Serialize)]
struct ReviewRequest<'a> {
    run_id: &'a str,
    stage: StageId,
    outputs: &'a StageOutputs,
    error_count: usize,
}

/// Quality validator backed by an external reviewer process.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    program: String,
    args: Vec<String>,
}

impl CommandValidator {
    /// Create a validator that invokes `program` with `args` per assessment.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn invoke(&self, request: &ReviewRequest<'_>) -> Result<Assessment, ValidatorError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ValidatorError::Other(format!("request serialization: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ValidatorError::Spawn)?;

        // stdin is dropped after the write so the reviewer sees EOF. A
        // write failure is not fatal here: a reviewer that exits before
        // consuming its input is reported through its exit status below.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(&payload);
        }

        let output = child.wait_with_output().map_err(ValidatorError::Spawn)?;
        if !output.status.success() {
            return Err(ValidatorError::NonZeroExit {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(program = %self.program, response = %stdout.trim(), "Reviewer verdict received");
        serde_json::from_str::<Assessment>(stdout.trim())
            .map_err(|e| ValidatorError::MalformedVerdict(format!("{e}: {}", stdout.trim())))
    }
}

impl StageValidator for CommandValidator {
    fn assess(
        &self,
        state: &WorkflowState,
        stage: StageId,
    ) -> Result<Assessment, ValidatorError> {
        let request = ReviewRequest {
            run_id: &state.run_id,
            stage,
            outputs: &state.outputs,
            error_count: state.errors.len(),
        };
        self.invoke(&request)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use rfpflow_state::SourceDocument;
    use rfpflow_utils::types::Verdict;

    fn state() -> WorkflowState {
        WorkflowState::new("run-cmd", vec![SourceDocument::new("rfp.txt", "text")])
    }

    fn sh(script: &str) -> CommandValidator {
        CommandValidator::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn parses_a_well_formed_verdict() {
        let validator = sh(
            r#"cat > /dev/null; echo '{"verdict":"needs_revision","reason":"plan too thin","corrections":["add milestones"]}'"#,
        );
        let assessment = validator.assess(&state(), StageId::Planning).unwrap();
        assert_eq!(assessment.verdict, Verdict::NeedsRevision);
        assert_eq!(assessment.reason, "plan too thin");
        assert_eq!(assessment.corrections, vec!["add milestones".to_string()]);
    }

    #[test]
    fn reviewer_sees_the_stage_under_review() {
        // Echo the request back as the reason to prove stdin plumbing.
        let validator = sh(
            r#"input=$(cat); printf '{"verdict":"valid","reason":"%s"}' "$(echo "$input" | grep -o 'technical_validation' | head -1)""#,
        );
        let assessment = validator
            .assess(&state(), StageId::TechnicalValidation)
            .unwrap();
        assert_eq!(assessment.reason, "technical_validation");
    }

    #[test]
    fn non_zero_exit_is_a_validator_error() {
        let validator = sh("cat > /dev/null; echo 'reviewer unavailable' >&2; exit 3");
        let err = validator.assess(&state(), StageId::Planning).unwrap_err();
        match err {
            ValidatorError::NonZeroExit { status, stderr } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "reviewer unavailable");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[test]
    fn malformed_output_is_a_validator_error() {
        let validator = sh("cat > /dev/null; echo 'LGTM'");
        let err = validator.assess(&state(), StageId::Planning).unwrap_err();
        assert!(matches!(err, ValidatorError::MalformedVerdict(_)));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let validator = CommandValidator::new("/nonexistent/reviewer", vec![]);
        let err = validator.assess(&state(), StageId::Planning).unwrap_err();
        assert!(matches!(err, ValidatorError::Spawn(_)));
    }
}
