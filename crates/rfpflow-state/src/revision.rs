use rfpflow_utils::types::StageId;
use std::collections::HashMap;

/// Per-stage revision counters, owned by the supervisor.
///
/// The tracker is deliberately not part of [`WorkflowState`](crate::WorkflowState):
/// stage processors can neither read nor corrupt supervisor bookkeeping.
/// Counters only ever move forward within a stage's revision loop; a
/// rejection reroute resets the target's counter because the target is
/// being redone from a different entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionTracker {
    counts: HashMap<StageId, u32>,
}

impl RevisionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Revisions recorded so far for `stage` (0 if never revised).
    #[must_use]
    pub fn count(&self, stage: StageId) -> u32 {
        self.counts.get(&stage).copied().unwrap_or(0)
    }

    /// Record one more revision of `stage` and return the new count.
    pub fn record(&mut self, stage: StageId) -> u32 {
        let count = self.counts.entry(stage).or_insert(0);
        *count += 1;
        *count
    }

    /// Reset `stage`'s counter to zero.
    pub fn reset(&mut self, stage: StageId) {
        self.counts.remove(&stage);
    }

    /// Forget all counters (between runs).
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_start_at_zero_and_increment() {
        let mut tracker = RevisionTracker::new();
        assert_eq!(tracker.count(StageId::Planning), 0);
        assert_eq!(tracker.record(StageId::Planning), 1);
        assert_eq!(tracker.record(StageId::Planning), 2);
        assert_eq!(tracker.count(StageId::Planning), 2);
        // Other stages are untouched.
        assert_eq!(tracker.count(StageId::FinalReview), 0);
    }

    #[test]
    fn reset_clears_a_single_stage() {
        let mut tracker = RevisionTracker::new();
        tracker.record(StageId::Planning);
        tracker.record(StageId::FinalReview);
        tracker.reset(StageId::Planning);
        assert_eq!(tracker.count(StageId::Planning), 0);
        assert_eq!(tracker.count(StageId::FinalReview), 1);
    }
}
