use tracing::{info, warn};

use rfpflow_stage_api::{Assessment, StageValidator};
use rfpflow_state::{RevisionTracker, WorkflowState};
use rfpflow_utils::types::{NextStage, RejectionMap, StageId, StageSequence, Verdict};
use rfpflow_validation::CriteriaTable;

use crate::decision::RoutingDecision;

/// Confidence reported when routing follows the default sequence.
const CONFIDENCE_SEQUENCE: f64 = 0.95;
/// Confidence reported for rejection reroutes (the map is explicit policy).
const CONFIDENCE_REROUTE: f64 = 0.9;
/// Confidence reported for in-place revision retries.
const CONFIDENCE_REVISION: f64 = 0.7;
/// Confidence reported when a stage is force-accepted at the revision cap.
const CONFIDENCE_FORCED: f64 = 0.6;

/// The routing core of the pipeline.
///
/// Owns the stage sequence, the structural criteria, the rejection map,
/// the injected quality validator, and the per-run revision counters. See
/// the crate docs for the routing policy.
pub struct Supervisor {
    sequence: StageSequence,
    criteria: CriteriaTable,
    rejection_map: RejectionMap,
    validator: Box<dyn StageValidator>,
    max_revisions: u32,
    revisions: RevisionTracker,
}

impl Supervisor {
    /// Create a supervisor over the given routing configuration.
    #[must_use]
    pub fn new(
        sequence: StageSequence,
        criteria: CriteriaTable,
        rejection_map: RejectionMap,
        validator: Box<dyn StageValidator>,
        max_revisions: u32,
    ) -> Self {
        Self {
            sequence,
            criteria,
            rejection_map,
            validator,
            max_revisions,
            revisions: RevisionTracker::new(),
        }
    }

    /// The configured stage order.
    #[must_use]
    pub fn sequence(&self) -> &StageSequence {
        &self.sequence
    }

    /// The configured rejection reroutes.
    #[must_use]
    pub fn rejection_map(&self) -> &RejectionMap {
        &self.rejection_map
    }

    /// Revisions recorded for `stage` in the current run.
    #[must_use]
    pub fn revision_count(&self, stage: StageId) -> u32 {
        self.revisions.count(stage)
    }

    /// Forget all revision counters. Called by the engine at run start so a
    /// reused supervisor never carries counters across runs.
    pub fn reset_revisions(&mut self) {
        self.revisions.clear();
    }

    /// Analyze the state and decide the next stage to execute.
    ///
    /// Produces a fresh decision on every call. For a fixed state and fixed
    /// revision counters the decision is deterministic (modulo the injected
    /// validator's own behavior).
    pub fn route_next(&mut self, state: &WorkflowState) -> RoutingDecision {
        // Bootstrap: nothing to validate yet.
        let Some(last) = state.last_stage else {
            let first = self.sequence.first();
            let decision = RoutingDecision {
                next: NextStage::Stage(first),
                verdict: Verdict::Valid,
                reason: format!("workflow start: routing to {first}"),
                required_corrections: vec![],
                confidence: CONFIDENCE_SEQUENCE,
            };
            info!(run_id = %state.run_id, next = %decision.next, "Supervisor routing decision");
            return decision;
        };

        // Structural check first. Missing required fields are a local
        // defect of the stage that just ran: retry in place, bounded, and
        // never consult the quality validator.
        let missing = self.criteria.missing_fields(state, last);
        if !missing.is_empty() {
            let reason = format!(
                "{last} output structurally incomplete: missing {}",
                missing.join(", ")
            );
            let corrections = missing
                .iter()
                .map(|field| format!("populate required field '{field}'"))
                .collect();
            let decision = self.bounded_retry(state, last, Verdict::NeedsRevision, reason, corrections);
            info!(run_id = %state.run_id, next = %decision.next, "Supervisor routing decision");
            return decision;
        }

        // Structurally complete: consult the quality validator. A failed
        // validator degrades to NeedsRevision (fail-open), never wedges.
        let assessment = match self.validator.assess(state, last) {
            Ok(assessment) => assessment,
            Err(err) => {
                warn!(run_id = %state.run_id, stage = %last, error = %err,
                    "Validator failed; treating as needs_revision");
                Assessment::needs_revision(
                    format!("validator failure for {last} (treated as needs_revision): {err}"),
                    vec![],
                )
            }
        };

        let decision = match assessment.verdict {
            Verdict::Valid => self.advance(state, last, &assessment),
            Verdict::NeedsRevision => self.bounded_retry(
                state,
                last,
                Verdict::NeedsRevision,
                format!("{last} needs revision: {}", assessment.reason),
                assessment.corrections,
            ),
            Verdict::Rejected => self.handle_rejection(state, last, &assessment),
        };
        info!(
            run_id = %state.run_id,
            next = %decision.next,
            verdict = %decision.verdict,
            reason = %decision.reason,
            "Supervisor routing decision"
        );
        decision
    }

    /// Advance past an accepted stage along the sequence.
    fn advance(&self, state: &WorkflowState, last: StageId, assessment: &Assessment) -> RoutingDecision {
        let (next, confidence) = self.successor_of(state, last);
        let reason = match next {
            NextStage::Complete => {
                format!("{last} accepted ({}); all stages complete", assessment.reason)
            }
            NextStage::Stage(stage) => format!(
                "{last} accepted ({}); proceeding to {stage}",
                assessment.reason
            ),
        };
        RoutingDecision {
            next,
            verdict: Verdict::Valid,
            reason,
            required_corrections: vec![],
            confidence,
        }
    }

    /// Bounded in-place retry shared by structural incompleteness,
    /// `NeedsRevision` verdicts, and unmapped rejections. At the cap the
    /// stage is force-accepted and the pipeline advances.
    fn bounded_retry(
        &mut self,
        state: &WorkflowState,
        stage: StageId,
        verdict: Verdict,
        reason: String,
        corrections: Vec<String>,
    ) -> RoutingDecision {
        let attempts = self.revisions.count(stage);
        if attempts >= self.max_revisions {
            let (next, _) = self.successor_of(state, stage);
            warn!(
                run_id = %state.run_id,
                stage = %stage,
                attempts,
                "Revision cap reached; forcing acceptance and moving on"
            );
            return RoutingDecision {
                next,
                verdict: Verdict::Valid,
                reason: format!(
                    "revision cap ({}) reached for {stage}; forcing acceptance and advancing",
                    self.max_revisions
                ),
                required_corrections: vec![],
                confidence: CONFIDENCE_FORCED,
            };
        }

        let attempt = self.revisions.record(stage);
        RoutingDecision {
            next: NextStage::Stage(stage),
            verdict,
            reason: format!("{reason} (attempt {attempt}/{})", self.max_revisions),
            required_corrections: corrections,
            confidence: CONFIDENCE_REVISION,
        }
    }

    /// Apply the rejection map. A mapped rejection reroutes with a fresh
    /// counter for the target; an unmapped one is a bounded in-place retry
    /// tagged as rejected, so it cannot bypass the revision cap.
    fn handle_rejection(
        &mut self,
        state: &WorkflowState,
        rejected: StageId,
        assessment: &Assessment,
    ) -> RoutingDecision {
        match self.rejection_map.target(rejected) {
            Some(target) => {
                // The target is being redone from a different entry point;
                // stale counters must not force-accept its fresh work.
                self.revisions.reset(target);
                warn!(
                    run_id = %state.run_id,
                    rejected = %rejected,
                    target = %target,
                    "Output rejected; rerouting for rework"
                );
                RoutingDecision {
                    next: NextStage::Stage(target),
                    verdict: Verdict::Rejected,
                    reason: format!(
                        "{rejected} rejected ({}); rerouting to {target} for rework",
                        assessment.reason
                    ),
                    required_corrections: assessment.corrections.clone(),
                    confidence: CONFIDENCE_REROUTE,
                }
            }
            None => self.bounded_retry(
                state,
                rejected,
                Verdict::Rejected,
                format!("{rejected} rejected ({}); retrying in place", assessment.reason),
                assessment.corrections.clone(),
            ),
        }
    }

    /// Sequence successor of `stage`. When `stage` is not a member of the
    /// configured sequence (a custom reroute target), falls back to the
    /// first stage in sequence order whose output slot is unpopulated, so
    /// routing stays well-defined even after a non-default reroute.
    fn successor_of(&self, state: &WorkflowState, stage: StageId) -> (NextStage, f64) {
        if let Some(next) = self.sequence.successor(stage) {
            return (next, CONFIDENCE_SEQUENCE);
        }
        let next = self
            .sequence
            .iter()
            .find(|candidate| !state.outputs.is_populated(*candidate))
            .map_or(NextStage::Complete, NextStage::Stage);
        (next, CONFIDENCE_REVISION)
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("sequence", &self.sequence)
            .field("rejection_map", &self.rejection_map)
            .field("max_revisions", &self.max_revisions)
            .field("revisions", &self.revisions)
            .finish_non_exhaustive()
    }
}
