//! Engine for executing rfpflow pipelines
//!
//! The engine is the outer driver loop: it repeatedly asks the supervisor
//! for the next stage, invokes the matching stage processor, and stops on
//! completion or at the iteration cap.
//!
//! # Guarantees
//!
//! - **The run loop never returns an error.** Wiring is validated once at
//!   construction; after that, every failure mode (stage panic-free errors,
//!   validator failures) is recovered into diagnostics on the state. The
//!   caller always receives a terminal [`WorkflowState`] inside a
//!   [`RunReport`], enabling partial-result recovery.
//! - **A stage processor error is not fatal.** The error is appended to the
//!   state's diagnostics, the stage is still marked as executed (so the
//!   supervisor can route away from it), and the run continues.
//! - **The iteration cap is the outermost safety net**, independent of the
//!   supervisor's per-stage revision caps.
//!
//! Execution is strictly sequential: exactly one stage runs at a time, and
//! the state is never accessed concurrently within a run. Distinct runs on
//! distinct states may execute on separate threads.

mod registry;
mod report;

pub use registry::StageRegistry;
pub use report::{RunOutcome, RunReport, RunSummary};

use std::time::Instant;

use tracing::info;

use rfpflow_state::WorkflowState;
use rfpflow_supervisor::Supervisor;
use rfpflow_utils::error::WiringError;
use rfpflow_utils::logging::{log_stage_complete, log_stage_failure, log_stage_start, stage_span};
use rfpflow_utils::types::Verdict;

/// Default cap on total stage invocations per run.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// The pipeline driver.
pub struct Engine {
    supervisor: Supervisor,
    registry: StageRegistry,
    max_iterations: u32,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Wire a supervisor to a set of stage processors.
    ///
    /// Validates up front that a processor is registered for every stage in
    /// the supervisor's sequence and for every rejection reroute target, so
    /// that [`run`](Self::run) itself cannot fail.
    ///
    /// # Errors
    /// Returns a [`WiringError`] naming the first unregistered stage.
    pub fn new(
        supervisor: Supervisor,
        registry: StageRegistry,
        max_iterations: u32,
    ) -> Result<Self, WiringError> {
        for stage in supervisor.sequence().iter() {
            if !registry.contains(stage) {
                return Err(WiringError::MissingProcessor {
                    stage: stage.as_str().to_string(),
                });
            }
        }
        for (_, target) in supervisor.rejection_map().iter() {
            if !registry.contains(target) {
                return Err(WiringError::UnknownRerouteTarget {
                    target: target.as_str().to_string(),
                });
            }
        }
        Ok(Self {
            supervisor,
            registry,
            max_iterations,
        })
    }

    /// Drive `state` to termination.
    ///
    /// Returns the terminal state with the outcome, iteration count, and
    /// the full routing-decision trail. Never returns an error.
    pub fn run(&mut self, mut state: WorkflowState) -> RunReport {
        self.supervisor.reset_revisions();
        let mut decisions = Vec::new();
        let mut iteration: u32 = 0;

        let outcome = loop {
            let decision = self.supervisor.route_next(&state);

            if decision.is_complete() {
                decisions.push(decision);
                break RunOutcome::Complete;
            }
            if decision.verdict == Verdict::Rejected {
                state.record_error(format!("output rejected by supervisor: {}", decision.reason));
            }

            // Wiring validation guarantees the processor exists.
            let stage = decision
                .next
                .stage()
                .expect("non-complete decision names a stage");
            decisions.push(decision);

            let span = stage_span(&state.run_id, stage.as_str());
            let _guard = span.enter();
            log_stage_start(&state.run_id, stage.as_str(), iteration);
            let started = Instant::now();

            match self.registry.get(stage).run(&mut state) {
                Ok(()) => {
                    log_stage_complete(
                        &state.run_id,
                        stage.as_str(),
                        started.elapsed().as_millis(),
                    );
                }
                Err(err) => {
                    // Recoverable at the orchestration level: record and
                    // keep going; the supervisor routes away next call.
                    state.record_error(format!("{stage} stage failed: {err:#}"));
                    log_stage_failure(&state.run_id, stage.as_str(), &format!("{err:#}"));
                }
            }
            state.mark_executed(stage);

            iteration += 1;
            if iteration >= self.max_iterations {
                state.record_error(format!(
                    "run terminated: iteration cap ({}) reached",
                    self.max_iterations
                ));
                break RunOutcome::IterationCapped;
            }
        };

        state.current_step = outcome.as_str().to_string();
        let report = RunReport::new(state, outcome, iteration, decisions);
        info!(
            run_id = %report.state.run_id,
            outcome = %report.outcome.as_str(),
            iterations = report.iterations,
            errors = report.state.errors.len(),
            "Run finished"
        );
        report
    }
}
