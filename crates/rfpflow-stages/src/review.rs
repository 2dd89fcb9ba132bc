//! Final review: completeness and executive-tone scoring.
//!
//! Scores are deterministic functions of the assembled state. The
//! executive summary is assembled from upstream outputs; a rejected or
//! low-scoring proposal is still written out so the quality validator and
//! the caller can see exactly what fell short.

use anyhow::{Context, Result};

use rfpflow_stage_api::StageProcessor;
use rfpflow_state::{FinalReviewRecord, WorkflowState};
use rfpflow_utils::types::StageId;

/// Words that read as confident, delivery-ready language.
const CONFIDENT_WORDS: &[&str] = &["proven", "scalable", "secure", "robust", "established"];

/// Words that undermine an executive read.
const HEDGING_WORDS: &[&str] = &["maybe", "possibly", "unclear", "tbd", "unknown"];

/// Minimum completeness for approval, 0–100.
const APPROVAL_THRESHOLD: u32 = 80;

/// Implementation of the final-review stage.
#[derive(Debug, Clone)]
pub struct FinalReviewStage;

impl FinalReviewStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Fraction of upstream slots populated, as a 0–100 score.
    fn completeness(state: &WorkflowState) -> u32 {
        let upstream = [
            state.outputs.requirements.is_some(),
            state.outputs.architecture.is_some(),
            state.outputs.diagrams.is_some(),
            state.outputs.plan.is_some(),
            state.outputs.technical_review.is_some(),
        ];
        let populated = upstream.iter().filter(|p| **p).count() as u32;
        populated * 100 / upstream.len() as u32
    }

    fn tone(text: &str) -> u32 {
        let lower = text.to_lowercase();
        let confident = CONFIDENT_WORDS
            .iter()
            .filter(|word| lower.contains(*word))
            .count() as u32;
        let hedging = HEDGING_WORDS
            .iter()
            .filter(|word| lower.contains(*word))
            .count() as u32;
        (70 + confident * 6).saturating_sub(hedging * 10).min(100)
    }

    fn executive_summary(state: &WorkflowState) -> String {
        let requirements = state.outputs.requirements.as_ref();
        let title = requirements
            .and_then(|r| r.project_title.as_deref())
            .unwrap_or("the proposed engagement");
        let client = requirements
            .and_then(|r| r.client_organization.as_deref())
            .unwrap_or("the client");
        let scope = requirements.map_or(0, |r| r.functional_modules.len());

        let mut summary = format!(
            "This proposal covers {title} for {client}: {scope} functional module(s) on a \
             proven, scalable service architecture."
        );
        if let Some(plan) = state.outputs.plan.as_ref() {
            summary.push_str(&format!(
                " Delivery runs {} weeks at an estimated {} person-weeks.",
                plan.timeline_weeks, plan.estimate.total_person_weeks
            ));
        }
        if let Some(review) = state.outputs.technical_review.as_ref() {
            if review.approved {
                summary.push_str(" The architecture passed technical validation.");
            } else {
                summary.push_str(&format!(
                    " Technical validation raised {} open concern(s).",
                    review.concerns.len()
                ));
            }
        }
        summary
    }
}

impl StageProcessor for FinalReviewStage {
    fn id(&self) -> StageId {
        StageId::FinalReview
    }

    fn run(&self, state: &mut WorkflowState) -> Result<()> {
        // Final review needs something to review; everything else degrades
        // to a lower completeness score rather than an error.
        state
            .outputs
            .requirements
            .as_ref()
            .context("final review requires the requirement extraction output")?;

        let completeness_score = Self::completeness(state);
        let executive_summary = Self::executive_summary(state);
        let tone_score = Self::tone(&executive_summary);
        let technically_approved = state
            .outputs
            .technical_review
            .as_ref()
            .is_some_and(|review| review.approved);
        let approved = completeness_score >= APPROVAL_THRESHOLD && technically_approved;

        state.outputs.final_review = Some(FinalReviewRecord {
            completeness_score,
            tone_score,
            executive_summary,
            approved,
        });
        Ok(())
    }
}

impl Default for FinalReviewStage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfpflow_state::{
        ArchitectureRecord, DiagramSpec, DiagramsRecord, EffortEstimate, Milestone, PlanRecord,
        RequirementsRecord, ReviewFinding, Severity, SourceDocument, SystemComponent,
        TechnicalReviewRecord, TechnologyChoice,
    };

    fn full_state() -> WorkflowState {
        let mut state =
            WorkflowState::new("run-review", vec![SourceDocument::new("rfp.txt", "text")]);
        state.outputs.requirements = Some(RequirementsRecord {
            project_title: Some("Atlas Modernization".to_string()),
            client_organization: Some("Northwind Traders".to_string()),
            functional_modules: vec!["billing".to_string(), "reporting".to_string()],
            business_goals: vec!["modernize".to_string()],
            source_excerpt: "excerpt".to_string(),
            ..RequirementsRecord::default()
        });
        state.outputs.architecture = Some(ArchitectureRecord {
            summary: "gateway plus services".to_string(),
            technology_stack: vec![TechnologyChoice {
                layer: "datastore".to_string(),
                choice: "PostgreSQL".to_string(),
                rationale: "integrity".to_string(),
            }],
            system_components: vec![SystemComponent {
                name: "api-gateway".to_string(),
                responsibility: "routing".to_string(),
            }],
        });
        state.outputs.diagrams = Some(DiagramsRecord {
            diagrams: vec![DiagramSpec::default()],
        });
        state.outputs.plan = Some(PlanRecord {
            methodology: "Scrum".to_string(),
            sprint_length_days: 14,
            milestones: vec![Milestone {
                name: "kickoff".to_string(),
                week: 0,
            }],
            estimate: EffortEstimate {
                per_module: vec![("billing".to_string(), 5)],
                total_person_weeks: 13,
            },
            timeline_weeks: 10,
        });
        state.outputs.technical_review = Some(TechnicalReviewRecord {
            security_findings: vec![ReviewFinding {
                area: "authentication".to_string(),
                detail: "identity layer present".to_string(),
                severity: Severity::Info,
            }],
            concerns: vec![],
            approved: true,
        });
        state
    }

    #[test]
    fn complete_state_is_approved_with_full_completeness() {
        let mut state = full_state();
        FinalReviewStage::new().run(&mut state).unwrap();

        let review = state.outputs.final_review.as_ref().unwrap();
        assert_eq!(review.completeness_score, 100);
        assert!(review.approved);
        assert!(review.executive_summary.contains("Atlas Modernization"));
        assert!(review.executive_summary.contains("10 weeks"));
        assert!(review.tone_score >= 70);
    }

    #[test]
    fn missing_upstream_slots_lower_completeness_and_block_approval() {
        let mut state = full_state();
        state.outputs.diagrams = None;
        state.outputs.plan = None;
        FinalReviewStage::new().run(&mut state).unwrap();

        let review = state.outputs.final_review.as_ref().unwrap();
        assert_eq!(review.completeness_score, 60);
        assert!(!review.approved);
    }

    #[test]
    fn unapproved_technical_review_blocks_approval() {
        let mut state = full_state();
        state.outputs.technical_review = Some(TechnicalReviewRecord {
            security_findings: vec![ReviewFinding {
                area: "data_protection".to_string(),
                detail: "no datastore selected".to_string(),
                severity: Severity::Blocker,
            }],
            concerns: vec!["data_protection: no datastore selected".to_string()],
            approved: false,
        });
        FinalReviewStage::new().run(&mut state).unwrap();

        let review = state.outputs.final_review.as_ref().unwrap();
        assert_eq!(review.completeness_score, 100);
        assert!(!review.approved);
        assert!(review.executive_summary.contains("1 open concern(s)"));
    }

    #[test]
    fn missing_requirements_is_an_error() {
        let mut state =
            WorkflowState::new("run-review", vec![SourceDocument::new("rfp.txt", "text")]);
        let err = FinalReviewStage::new().run(&mut state).unwrap_err();
        assert!(err.to_string().contains("requirement extraction output"));
    }
}
