//! Typed per-stage output records.
//!
//! Each stage owns exactly one slot in [`StageOutputs`]. The records are
//! strongly typed so the structural validation criteria become explicit
//! field checks instead of runtime dictionary probes.

use rfpflow_utils::types::StageId;
use serde::{Deserialize, Serialize};

/// Output of the requirement-extraction stage: the structured distillation
/// of the raw source documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementsRecord {
    /// Project title, when one could be identified.
    pub project_title: Option<String>,
    /// Client organization name, when one could be identified.
    pub client_organization: Option<String>,
    /// Stated business goals.
    pub business_goals: Vec<String>,
    /// Functional modules the solution must provide.
    pub functional_modules: Vec<String>,
    /// External systems to integrate with.
    pub integrations: Vec<String>,
    /// Technology, budget, or delivery constraints.
    pub constraints: Vec<String>,
    /// Short excerpt of the source material the extraction is based on.
    pub source_excerpt: String,
}

/// One technology selection with its rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyChoice {
    /// Architectural layer the choice applies to (e.g. "backend", "datastore").
    pub layer: String,
    /// Selected technology.
    pub choice: String,
    /// Why this technology fits the requirements.
    pub rationale: String,
}

/// One system component of the proposed architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemComponent {
    pub name: String,
    pub responsibility: String,
}

/// Output of the architecture-design stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureRecord {
    /// Prose overview of the proposed solution shape.
    pub summary: String,
    /// Selected technology stack.
    pub technology_stack: Vec<TechnologyChoice>,
    /// Major system components and their responsibilities.
    pub system_components: Vec<SystemComponent>,
}

/// A renderable diagram specification: nodes plus directed edges.
///
/// Rendering (Mermaid, Graphviz, image export) is out of scope; the spec is
/// the hand-off format to whatever renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramSpec {
    pub title: String,
    pub nodes: Vec<String>,
    /// Directed edges as (from, to) pairs.
    pub edges: Vec<(String, String)>,
}

/// Output of the diagram-generation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramsRecord {
    pub diagrams: Vec<DiagramSpec>,
}

/// A dated delivery milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    /// Week offset from project start.
    pub week: u32,
}

/// Aggregate effort estimate for the proposal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffortEstimate {
    /// Estimated effort per functional module, in person-weeks.
    pub per_module: Vec<(String, u32)>,
    /// Total effort in person-weeks, including overhead.
    pub total_person_weeks: u32,
}

/// Output of the planning stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub methodology: String,
    pub sprint_length_days: u32,
    pub milestones: Vec<Milestone>,
    pub estimate: EffortEstimate,
    /// End-to-end delivery timeline in weeks.
    pub timeline_weeks: u32,
}

/// Severity of a technical-review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Blocker,
}

/// One finding from the technical-validation checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFinding {
    /// Checklist area the finding belongs to (e.g. "authentication").
    pub area: String,
    pub detail: String,
    pub severity: Severity,
}

/// Output of the technical-validation stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReviewRecord {
    /// Security and feasibility findings, including passing checks.
    pub security_findings: Vec<ReviewFinding>,
    /// Concerns that should be addressed before delivery.
    pub concerns: Vec<String>,
    /// Whether the reviewer approves the architecture.
    pub approved: bool,
}

/// Output of the final-review stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalReviewRecord {
    /// Completeness of the assembled proposal, 0–100.
    pub completeness_score: u32,
    /// Executive-tone score of the written material, 0–100.
    pub tone_score: u32,
    /// Executive summary of the proposal.
    pub executive_summary: String,
    /// Whether the proposal is approved for delivery.
    pub approved: bool,
}

/// One optional output slot per stage.
///
/// Slots start empty and are populated as stages are accepted. A stage may
/// overwrite its own slot while it is being revised; once the supervisor
/// has advanced past a stage, nothing writes that slot again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageOutputs {
    pub requirements: Option<RequirementsRecord>,
    pub architecture: Option<ArchitectureRecord>,
    pub diagrams: Option<DiagramsRecord>,
    pub plan: Option<PlanRecord>,
    pub technical_review: Option<TechnicalReviewRecord>,
    pub final_review: Option<FinalReviewRecord>,
}

impl StageOutputs {
    /// Whether the slot owned by `stage` has been populated.
    #[must_use]
    pub fn is_populated(&self, stage: StageId) -> bool {
        match stage {
            StageId::RequirementExtraction => self.requirements.is_some(),
            StageId::ArchitectureDesign => self.architecture.is_some(),
            StageId::DiagramGeneration => self.diagrams.is_some(),
            StageId::Planning => self.plan.is_some(),
            StageId::TechnicalValidation => self.technical_review.is_some(),
            StageId::FinalReview => self.final_review.is_some(),
        }
    }

    /// Number of populated slots.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        StageId::all()
            .iter()
            .filter(|stage| self.is_populated(**stage))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_empty() {
        let outputs = StageOutputs::default();
        for stage in StageId::all() {
            assert!(!outputs.is_populated(stage));
        }
        assert_eq!(outputs.populated_count(), 0);
    }

    #[test]
    fn populated_slot_is_visible_through_its_stage_id() {
        let outputs = StageOutputs {
            plan: Some(PlanRecord::default()),
            ..StageOutputs::default()
        };
        assert!(outputs.is_populated(StageId::Planning));
        assert!(!outputs.is_populated(StageId::FinalReview));
        assert_eq!(outputs.populated_count(), 1);
    }

    #[test]
    fn records_serialize_with_snake_case_fields() {
        let record = TechnicalReviewRecord {
            security_findings: vec![ReviewFinding {
                area: "authentication".to_string(),
                detail: "MFA coverage confirmed".to_string(),
                severity: Severity::Info,
            }],
            concerns: vec![],
            approved: true,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("security_findings"));
        assert!(json.contains(r#""severity":"info""#));
    }
}
