//! Stable facade for building and running proposal pipelines.

use chrono::Utc;

use rfpflow_config::PipelineConfig;
use rfpflow_engine::{Engine, RunReport, StageRegistry};
use rfpflow_stage_api::StageValidator;
use rfpflow_state::{SourceDocument, WorkflowState};
use rfpflow_supervisor::Supervisor;
use rfpflow_utils::error::RfpFlowError;
use rfpflow_validation::{AutoApprove, CommandValidator, CriteriaTable};

/// The assembled pipeline: default stages wired to a supervisor and engine
/// per a [`PipelineConfig`].
///
/// This is the primary embedding API. For custom stage sets or validators,
/// assemble [`Supervisor`], [`StageRegistry`], and [`Engine`] directly.
pub struct ProposalPipeline {
    engine: Engine,
}

impl std::fmt::Debug for ProposalPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalPipeline").finish_non_exhaustive()
    }
}

impl ProposalPipeline {
    /// Build a pipeline from configuration, using the six default stages
    /// and the configured reviewer (or structural-only validation when no
    /// reviewer is configured).
    ///
    /// # Errors
    /// Returns an [`RfpFlowError`] for invalid criteria overrides or
    /// incomplete stage wiring.
    pub fn from_config(config: PipelineConfig) -> Result<Self, RfpFlowError> {
        let validator: Box<dyn StageValidator> = match &config.reviewer {
            Some(reviewer) => Box::new(CommandValidator::new(
                reviewer.command.clone(),
                reviewer.args.clone(),
            )),
            None => Box::new(AutoApprove),
        };
        Self::with_validator(config, validator)
    }

    /// Build a pipeline from configuration with an explicit quality
    /// validator, ignoring any `[reviewer]` section. This is how embedders
    /// inject their own LLM-backed (or scripted) validator.
    ///
    /// # Errors
    /// Returns an [`RfpFlowError`] for invalid criteria overrides or
    /// incomplete stage wiring.
    pub fn with_validator(
        config: PipelineConfig,
        validator: Box<dyn StageValidator>,
    ) -> Result<Self, RfpFlowError> {
        let criteria = CriteriaTable::with_overrides(config.criteria_overrides)?;
        let supervisor = Supervisor::new(
            config.sequence,
            criteria,
            config.rejection_map,
            validator,
            config.max_revisions,
        );

        let mut registry = StageRegistry::new();
        for processor in rfpflow_stages::default_processors() {
            registry.register(processor);
        }

        let engine = Engine::new(supervisor, registry, config.max_iterations)?;
        Ok(Self { engine })
    }

    /// Run the pipeline over a fresh state for `documents`.
    ///
    /// Never fails: the report carries the terminal state, the outcome, and
    /// the routing-decision trail.
    pub fn process(&mut self, documents: Vec<SourceDocument>) -> RunReport {
        let run_id = format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S%3fZ"));
        self.process_state(WorkflowState::new(run_id, documents))
    }

    /// Run the pipeline over a caller-constructed state (e.g. a fixed
    /// `run_id` for reproducible logs).
    pub fn process_state(&mut self, state: WorkflowState) -> RunReport {
        self.engine.run(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_a_pipeline() {
        let pipeline = ProposalPipeline::from_config(PipelineConfig::default());
        assert!(pipeline.is_ok());
    }

    #[test]
    fn invalid_criteria_override_fails_at_build_time() {
        let config = PipelineConfig::builder()
            .criteria(
                rfpflow_utils::types::StageId::Planning,
                vec!["burndown".to_string()],
            )
            .build()
            .unwrap();
        let err = ProposalPipeline::from_config(config).unwrap_err();
        assert!(matches!(err, RfpFlowError::Config(_)));
    }
}
