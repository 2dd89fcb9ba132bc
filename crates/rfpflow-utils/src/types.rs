use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stage identifiers for the proposal generation workflow.
///
/// `StageId` names the six content stages of the default pipeline. Stages
/// execute strictly one at a time, in the order given by a [`StageSequence`].
///
/// # Stage Order
///
/// The default sequence progresses through stages in this order:
///
/// ```text
/// RequirementExtraction → ArchitectureDesign → DiagramGeneration
///     → Planning → TechnicalValidation → FinalReview
/// ```
///
/// # Example
///
/// ```rust
/// use rfpflow_utils::types::StageId;
///
/// let stage = StageId::ArchitectureDesign;
/// assert_eq!(stage.as_str(), "architecture_design");
///
/// // StageId is Copy, so it can be used multiple times
/// let stage2 = stage;
/// assert_eq!(stage, stage2);
/// ```
///
/// # Serialization
///
/// `StageId` serializes to its snake_case string representation
/// (e.g., `"requirement_extraction"`, `"final_review"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StageId {
    /// Requirement extraction: distills source documents into structured requirements.
    RequirementExtraction,
    /// Architecture design: selects a technology stack and system components.
    ArchitectureDesign,
    /// Diagram generation: derives system and deployment diagram specs.
    DiagramGeneration,
    /// Planning: produces a project plan with effort estimates and milestones.
    Planning,
    /// Technical validation: reviews the design for security and feasibility.
    TechnicalValidation,
    /// Final review: scores completeness and executive readiness of the proposal.
    FinalReview,
}

impl StageId {
    /// Returns the canonical snake_case name of the stage.
    ///
    /// This is the name used in configuration files, routing reasons,
    /// and diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequirementExtraction => "requirement_extraction",
            Self::ArchitectureDesign => "architecture_design",
            Self::DiagramGeneration => "diagram_generation",
            Self::Planning => "planning",
            Self::TechnicalValidation => "technical_validation",
            Self::FinalReview => "final_review",
        }
    }

    /// Parse a stage name as it appears in configuration files.
    ///
    /// Returns `None` for unknown names; configuration loading turns that
    /// into a [`ConfigError`](crate::error::ConfigError).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "requirement_extraction" => Some(Self::RequirementExtraction),
            "architecture_design" => Some(Self::ArchitectureDesign),
            "diagram_generation" => Some(Self::DiagramGeneration),
            "planning" => Some(Self::Planning),
            "technical_validation" => Some(Self::TechnicalValidation),
            "final_review" => Some(Self::FinalReview),
            _ => None,
        }
    }

    /// All stages, in default pipeline order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::RequirementExtraction,
            Self::ArchitectureDesign,
            Self::DiagramGeneration,
            Self::Planning,
            Self::TechnicalValidation,
            Self::FinalReview,
        ]
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality verdict for a stage's output.
///
/// Produced by the external validator (or synthesized by the supervisor for
/// structural failures and forced acceptances). The three values map onto
/// three routing behaviors: advance, retry in place, reroute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Output meets quality standards; advance to the next stage.
    Valid,
    /// Output has correctable issues; retry the same stage (bounded).
    NeedsRevision,
    /// Output has major flaws; reroute per the rejection map.
    Rejected,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::NeedsRevision => "needs_revision",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing target produced by the supervisor: either a concrete stage or
/// workflow completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStage {
    /// Execute the named stage next.
    Stage(StageId),
    /// All stages accepted; the run is complete.
    Complete,
}

impl NextStage {
    /// Returns the stage to execute, or `None` when the run is complete.
    #[must_use]
    pub const fn stage(&self) -> Option<StageId> {
        match self {
            Self::Stage(id) => Some(*id),
            Self::Complete => None,
        }
    }
}

impl std::fmt::Display for NextStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stage(id) => f.write_str(id.as_str()),
            Self::Complete => f.write_str("complete"),
        }
    }
}

/// Ordered, fixed list defining the default linear order of stages.
///
/// The sequence is the sole source of truth for "what comes after stage X"
/// on the non-error path. It is plain configuration and may differ from the
/// default (e.g. a shortened pipeline for smoke runs), but it must not be
/// empty or contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSequence(Vec<StageId>);

impl StageSequence {
    /// Create a sequence from an explicit stage order.
    ///
    /// Returns `None` if `stages` is empty or contains a duplicate.
    #[must_use]
    pub fn new(stages: Vec<StageId>) -> Option<Self> {
        if stages.is_empty() {
            return None;
        }
        let mut seen = std::collections::HashSet::new();
        if !stages.iter().all(|s| seen.insert(*s)) {
            return None;
        }
        Some(Self(stages))
    }

    /// The default six-stage pipeline order.
    #[must_use]
    pub fn standard() -> Self {
        Self(StageId::all().to_vec())
    }

    /// First stage of the sequence (the bootstrap target).
    #[must_use]
    pub fn first(&self) -> StageId {
        self.0[0]
    }

    /// Position of `stage` in the sequence, if it is a member.
    #[must_use]
    pub fn position(&self, stage: StageId) -> Option<usize> {
        self.0.iter().position(|s| *s == stage)
    }

    /// The stage after `stage` on the happy path, or `Complete` if `stage`
    /// is last. Returns `None` when `stage` is not in the sequence at all.
    #[must_use]
    pub fn successor(&self, stage: StageId) -> Option<NextStage> {
        let idx = self.position(stage)?;
        Some(match self.0.get(idx + 1) {
            Some(next) => NextStage::Stage(*next),
            None => NextStage::Complete,
        })
    }

    /// Iterate the stages in order.
    pub fn iter(&self) -> impl Iterator<Item = StageId> + '_ {
        self.0.iter().copied()
    }

    /// Number of stages in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StageSequence {
    fn default() -> Self {
        Self::standard()
    }
}

/// Mapping from a stage to the stage to reroute to when its output is
/// `Rejected`. Absent an entry, rejection retries the same stage in place.
///
/// The default map carries one non-default entry: a technical-validation
/// rejection reroutes back to architecture design, since a downstream
/// reviewer's rejection usually means upstream redesign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionMap(HashMap<StageId, StageId>);

impl RejectionMap {
    /// An empty map: every rejection retries in place.
    #[must_use]
    pub fn identity() -> Self {
        Self(HashMap::new())
    }

    /// The default routing policy recovered from the proposal pipeline.
    #[must_use]
    pub fn standard() -> Self {
        let mut map = HashMap::new();
        map.insert(StageId::TechnicalValidation, StageId::ArchitectureDesign);
        Self(map)
    }

    /// Add or replace a reroute entry.
    pub fn set(&mut self, rejected: StageId, target: StageId) {
        self.0.insert(rejected, target);
    }

    /// Reroute target for a rejected stage, if one is configured.
    #[must_use]
    pub fn target(&self, rejected: StageId) -> Option<StageId> {
        self.0.get(&rejected).copied()
    }

    /// Iterate configured (rejected, target) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (StageId, StageId)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_id_round_trips_through_parse() {
        for stage in StageId::all() {
            assert_eq!(StageId::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(StageId::parse("cto"), None);
    }

    #[test]
    fn stage_id_serializes_to_snake_case() {
        let json = serde_json::to_string(&StageId::FinalReview).unwrap();
        assert_eq!(json, r#""final_review""#);
    }

    #[test]
    fn sequence_successor_walks_in_order() {
        let seq = StageSequence::standard();
        assert_eq!(
            seq.successor(StageId::RequirementExtraction),
            Some(NextStage::Stage(StageId::ArchitectureDesign))
        );
        assert_eq!(
            seq.successor(StageId::FinalReview),
            Some(NextStage::Complete)
        );
    }

    #[test]
    fn sequence_rejects_duplicates_and_empty() {
        assert!(StageSequence::new(vec![]).is_none());
        assert!(
            StageSequence::new(vec![StageId::Planning, StageId::Planning]).is_none()
        );
    }

    #[test]
    fn custom_sequence_successor_outside_membership_is_none() {
        let seq = StageSequence::new(vec![
            StageId::RequirementExtraction,
            StageId::ArchitectureDesign,
        ])
        .unwrap();
        assert_eq!(seq.successor(StageId::FinalReview), None);
    }

    #[test]
    fn rejection_map_defaults_to_self_retry() {
        let map = RejectionMap::standard();
        assert_eq!(
            map.target(StageId::TechnicalValidation),
            Some(StageId::ArchitectureDesign)
        );
        assert_eq!(map.target(StageId::Planning), None);
    }
}
