use thiserror::Error;

/// Library-level error type for rfpflow operations.
///
/// `RfpFlowError` is the primary error type returned by rfpflow library
/// operations that can fail before a run starts (configuration loading,
/// engine wiring). Once a run is in flight the engine never returns an
/// error: stage and validator failures are recovered internally and
/// surfaced as diagnostics on the terminal `WorkflowState`.
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or builder errors |
/// | `Wiring` | Engine construction errors (missing processors) |
/// | `Io` | Filesystem errors while loading inputs or config |
#[derive(Error, Debug)]
pub enum RfpFlowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine wiring error: {0}")]
    Wiring(#[from] WiringError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Unknown stage name '{name}' (expected one of: {expected})")]
    UnknownStage { name: String, expected: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Stage sequence must be non-empty and free of duplicates")]
    InvalidSequence,

    #[error("Unknown criteria field '{field}' for stage {stage}")]
    UnknownCriteriaField { stage: String, field: String },
}

/// Engine construction errors.
///
/// Wiring is validated once, up front, so that `Engine::run` itself can be
/// infallible: every stage reachable from the sequence or the rejection map
/// must have a registered processor.
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("No stage processor registered for {stage}")]
    MissingProcessor { stage: String },

    #[error("Rejection map targets {target}, which is not a registered stage")]
    UnknownRerouteTarget { target: String },
}

/// External validator failures.
///
/// These never abort a run: the supervisor treats a failed validator as
/// `NeedsRevision` (fail-open toward forward progress) and records the
/// failure as a diagnostic.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Reviewer command failed to start: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Reviewer command exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },

    #[error("Reviewer produced unparseable verdict: {0}")]
    MalformedVerdict(String),

    #[error("Validator failure: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_umbrella() {
        let err: RfpFlowError = ConfigError::InvalidSequence.into();
        assert!(matches!(err, RfpFlowError::Config(_)));
    }

    #[test]
    fn wiring_error_names_the_stage() {
        let err = WiringError::MissingProcessor {
            stage: "planning".to_string(),
        };
        assert!(err.to_string().contains("planning"));
    }
}
