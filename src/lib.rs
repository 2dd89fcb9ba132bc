//! rfpflow - Supervised proposal-generation pipeline with bounded revision loops
//!
//! rfpflow drives a set of source documents through six specialized content
//! stages under a supervising router. Every stage's output is checked
//! structurally and judged by an injected quality validator; revision loops
//! are bounded per stage, rejections reroute upstream, and an outer
//! iteration cap guarantees every run terminates with a usable state.
//!
//! # Quick Start
//!
//! ```rust
//! use rfpflow::{PipelineConfig, ProposalPipeline, SourceDocument};
//!
//! let config = PipelineConfig::default();
//! let mut pipeline = ProposalPipeline::from_config(config)?;
//!
//! let report = pipeline.process(vec![SourceDocument::new(
//!     "rfp.txt",
//!     "Project: Atlas\nClient: Northwind\nObjective: reduce stock-outs.\n\
//!      The solution must provide inventory tracking and reporting.",
//! )]);
//!
//! assert!(report.outcome.is_success());
//! println!("{} iterations, {} slots", report.iterations, report.summary().stages_populated);
//! # Ok::<(), rfpflow::RfpFlowError>(())
//! ```
//!
//! # Architecture
//!
//! - [`WorkflowState`]: the single mutable record threaded through a run.
//! - [`Supervisor`]: the routing core (structural criteria, quality
//!   verdicts, bounded revision, rejection rerouting).
//! - [`Engine`]: the sequential driver loop with the iteration cap.
//! - [`StageProcessor`] / [`StageValidator`]: the two contracts external
//!   collaborators implement.
//! - [`PipelineConfig`]: caps, sequence, rejection map, criteria, and the
//!   optional external reviewer; TOML file or builder.
//!
//! # Stable Public API
//!
//! The types re-exported at the crate root are the supported surface.
//! Internal crate modules remain reachable for white-box tests but are not
//! covered by semver guarantees.

// ============================================================================
// Stable Public API
// ============================================================================

/// Stage identifiers for the proposal workflow.
///
/// See [`StageId`] for the default order and serialization details.
pub use rfpflow_utils::types::StageId;

/// Three-valued quality verdict: `Valid`, `NeedsRevision`, `Rejected`.
pub use rfpflow_utils::types::Verdict;

/// Routing target: a concrete stage or workflow completion.
pub use rfpflow_utils::types::NextStage;

/// Ordered stage execution plan.
pub use rfpflow_utils::types::StageSequence;

/// Reroute targets for rejected stages.
pub use rfpflow_utils::types::RejectionMap;

/// Library-level error type for configuration and wiring failures.
///
/// Once a run is in flight the engine never returns an error; failures are
/// recovered into diagnostics on the terminal [`WorkflowState`].
pub use rfpflow_utils::error::RfpFlowError;

/// The single mutable record threaded through a run.
pub use rfpflow_state::WorkflowState;

/// One raw input document.
pub use rfpflow_state::SourceDocument;

/// Typed per-stage output records.
pub use rfpflow_state::{
    ArchitectureRecord, DiagramSpec, DiagramsRecord, EffortEstimate, FinalReviewRecord,
    Milestone, PlanRecord, RequirementsRecord, ReviewFinding, Severity, StageOutputs,
    SystemComponent, TechnicalReviewRecord, TechnologyChoice,
};

/// Contracts implemented by stages and quality validators.
pub use rfpflow_stage_api::{Assessment, StageProcessor, StageValidator};

/// Structural required-field criteria.
pub use rfpflow_validation::CriteriaTable;

/// Quality validators: external reviewer subprocess and the accept-all
/// fallback.
pub use rfpflow_validation::{AutoApprove, CommandValidator};

/// The routing core and its decisions.
pub use rfpflow_supervisor::{RoutingDecision, Supervisor};

/// The driver loop and run results.
pub use rfpflow_engine::{Engine, RunOutcome, RunReport, RunSummary, StageRegistry};

/// Configuration for pipelines: caps, sequence, rejection map, criteria,
/// reviewer. TOML file or builder.
pub use rfpflow_config::{ConfigBuilder, PipelineConfig, ReviewerConfig};

/// The six default stage processors.
pub use rfpflow_stages::{
    ArchitectureDesignStage, DiagramGenerationStage, FinalReviewStage, PlanningStage,
    RequirementExtractionStage, TechnicalValidationStage, default_processors,
};

mod pipeline;
pub use pipeline::ProposalPipeline;

/// Initialize structured logging for embedding applications.
pub use rfpflow_utils::logging::init_tracing;

/// Returns the rfpflow crate version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// Internal modules - accessible but not stable
// ============================================================================

#[doc(hidden)]
pub use rfpflow_config as config;
#[doc(hidden)]
pub use rfpflow_engine as engine;
#[doc(hidden)]
pub use rfpflow_stage_api as stage_api;
#[doc(hidden)]
pub use rfpflow_stages as stages;
#[doc(hidden)]
pub use rfpflow_state as state;
#[doc(hidden)]
pub use rfpflow_supervisor as supervisor;
#[doc(hidden)]
pub use rfpflow_utils as utils;
#[doc(hidden)]
pub use rfpflow_validation as validation;
