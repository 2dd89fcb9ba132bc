//! Planning and estimation from requirements and architecture.
//!
//! Table-driven: base person-weeks per module family, an integration
//! multiplier, and fixed delivery overhead. Numbers come from the
//! historical-averages table the proposal team maintains.

use anyhow::{Context, Result};

use rfpflow_stage_api::StageProcessor;
use rfpflow_state::{EffortEstimate, Milestone, PlanRecord, WorkflowState};
use rfpflow_utils::types::StageId;

/// Base effort per module family, in person-weeks at moderate complexity.
const MODULE_BASE_WEEKS: &[(&str, u32)] = &[
    ("user_management", 3),
    ("payments", 5),
    ("billing", 5),
    ("reporting", 4),
    ("inventory_management", 4),
    ("order_management", 4),
    ("product_catalog", 3),
    ("customer_management", 3),
    ("notifications", 2),
    ("search", 3),
];

/// Effort for a module with no table entry.
const DEFAULT_MODULE_WEEKS: u32 = 4;

/// Fixed project-management and hardening overhead, in person-weeks.
const DELIVERY_OVERHEAD_WEEKS: u32 = 4;

/// Additional effort per external integration, in person-weeks.
const INTEGRATION_WEEKS: u32 = 2;

/// Assumed parallel delivery capacity, in workstreams.
const WORKSTREAMS: u32 = 2;

const MIN_TIMELINE_WEEKS: u32 = 8;

/// Implementation of the planning stage.
///
/// Produces a [`PlanRecord`]: per-module estimates, total effort, timeline,
/// and the standard milestone ladder.
#[derive(Debug, Clone)]
pub struct PlanningStage;

impl PlanningStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn module_weeks(module: &str) -> u32 {
        MODULE_BASE_WEEKS
            .iter()
            .find(|(name, _)| *name == module)
            .map_or(DEFAULT_MODULE_WEEKS, |(_, weeks)| *weeks)
    }

    fn milestones(timeline_weeks: u32) -> Vec<Milestone> {
        vec![
            Milestone {
                name: "kickoff".to_string(),
                week: 0,
            },
            Milestone {
                name: "design sign-off".to_string(),
                week: 2,
            },
            Milestone {
                name: "mvp delivery".to_string(),
                week: timeline_weeks / 2,
            },
            Milestone {
                name: "user acceptance testing".to_string(),
                week: timeline_weeks.saturating_sub(2),
            },
            Milestone {
                name: "go-live".to_string(),
                week: timeline_weeks,
            },
        ]
    }
}

impl StageProcessor for PlanningStage {
    fn id(&self) -> StageId {
        StageId::Planning
    }

    fn run(&self, state: &mut WorkflowState) -> Result<()> {
        let requirements = state
            .outputs
            .requirements
            .clone()
            .context("planning requires the requirement extraction output")?;
        // The architecture is consumed only as a gate: estimating an
        // undesigned system produces numbers nobody should sign.
        state
            .outputs
            .architecture
            .as_ref()
            .context("planning requires the architecture design output")?;

        let per_module: Vec<(String, u32)> = requirements
            .functional_modules
            .iter()
            .map(|module| (module.clone(), Self::module_weeks(module)))
            .collect();
        let module_total: u32 = per_module.iter().map(|(_, weeks)| weeks).sum();
        let integration_total =
            INTEGRATION_WEEKS * u32::try_from(requirements.integrations.len()).unwrap_or(0);
        let total_person_weeks = module_total + integration_total + DELIVERY_OVERHEAD_WEEKS;

        let timeline_weeks =
            MIN_TIMELINE_WEEKS.max(total_person_weeks.div_ceil(WORKSTREAMS) + 2);

        state.outputs.plan = Some(PlanRecord {
            methodology: "Scrum".to_string(),
            sprint_length_days: 14,
            milestones: Self::milestones(timeline_weeks),
            estimate: EffortEstimate {
                per_module,
                total_person_weeks,
            },
            timeline_weeks,
        });
        Ok(())
    }
}

impl Default for PlanningStage {
    fn default() -> Self {
        Self::new()
    }
}
