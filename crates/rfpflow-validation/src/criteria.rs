use std::collections::HashMap;

use rfpflow_state::WorkflowState;
use rfpflow_utils::error::ConfigError;
use rfpflow_utils::types::StageId;

/// Per-stage lists of output fields that must be populated for the stage to
/// count as structurally complete.
///
/// The table is supplied as configuration, not computed; the default lists
/// match what the six shipped stages always produce, so the happy path is
/// never structurally incomplete. Presence tests are purely structural
/// (slot populated, list non-empty, string non-blank); semantic quality is
/// the quality validator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaTable {
    required: HashMap<StageId, Vec<String>>,
}

/// Field universe for each stage. Criteria overrides are validated against
/// these names so a typo in a config file fails loading instead of silently
/// passing every check.
fn known_fields(stage: StageId) -> &'static [&'static str] {
    match stage {
        StageId::RequirementExtraction => &[
            "project_title",
            "client_organization",
            "business_goals",
            "functional_modules",
            "integrations",
            "constraints",
            "source_excerpt",
        ],
        StageId::ArchitectureDesign => &["summary", "technology_stack", "system_components"],
        StageId::DiagramGeneration => &["diagrams"],
        StageId::Planning => &["methodology", "milestones", "estimate", "timeline"],
        StageId::TechnicalValidation => &["security_findings", "concerns", "approval"],
        StageId::FinalReview => &["executive_summary", "scores", "approval"],
    }
}

fn default_required(stage: StageId) -> &'static [&'static str] {
    match stage {
        StageId::RequirementExtraction => {
            &["functional_modules", "business_goals", "source_excerpt"]
        }
        StageId::ArchitectureDesign => &["summary", "technology_stack", "system_components"],
        StageId::DiagramGeneration => &["diagrams"],
        StageId::Planning => &["milestones", "estimate", "timeline"],
        StageId::TechnicalValidation => &["security_findings", "approval"],
        StageId::FinalReview => &["executive_summary", "approval"],
    }
}

fn non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Presence test for one named field of one stage's output slot.
///
/// An unpopulated slot fails every field of that stage.
fn field_is_present(state: &WorkflowState, stage: StageId, field: &str) -> bool {
    let outputs = &state.outputs;
    match stage {
        StageId::RequirementExtraction => {
            let Some(record) = outputs.requirements.as_ref() else {
                return false;
            };
            match field {
                "project_title" => record.project_title.as_deref().is_some_and(non_blank),
                "client_organization" => {
                    record.client_organization.as_deref().is_some_and(non_blank)
                }
                "business_goals" => !record.business_goals.is_empty(),
                "functional_modules" => !record.functional_modules.is_empty(),
                "integrations" => !record.integrations.is_empty(),
                "constraints" => !record.constraints.is_empty(),
                "source_excerpt" => non_blank(&record.source_excerpt),
                _ => false,
            }
        }
        StageId::ArchitectureDesign => {
            let Some(record) = outputs.architecture.as_ref() else {
                return false;
            };
            match field {
                "summary" => non_blank(&record.summary),
                "technology_stack" => !record.technology_stack.is_empty(),
                "system_components" => !record.system_components.is_empty(),
                _ => false,
            }
        }
        StageId::DiagramGeneration => {
            let Some(record) = outputs.diagrams.as_ref() else {
                return false;
            };
            match field {
                "diagrams" => !record.diagrams.is_empty(),
                _ => false,
            }
        }
        StageId::Planning => {
            let Some(record) = outputs.plan.as_ref() else {
                return false;
            };
            match field {
                "methodology" => non_blank(&record.methodology),
                "milestones" => !record.milestones.is_empty(),
                "estimate" => record.estimate.total_person_weeks > 0,
                "timeline" => record.timeline_weeks > 0,
                _ => false,
            }
        }
        StageId::TechnicalValidation => {
            let Some(record) = outputs.technical_review.as_ref() else {
                return false;
            };
            match field {
                "security_findings" => !record.security_findings.is_empty(),
                "concerns" => !record.concerns.is_empty(),
                // Approval is a populated review record; whether it approves
                // is a quality question, not a structural one.
                "approval" => true,
                _ => false,
            }
        }
        StageId::FinalReview => {
            let Some(record) = outputs.final_review.as_ref() else {
                return false;
            };
            match field {
                "executive_summary" => non_blank(&record.executive_summary),
                "scores" => record.completeness_score <= 100 && record.tone_score <= 100,
                "approval" => true,
                _ => false,
            }
        }
    }
}

impl CriteriaTable {
    /// The default criteria recovered from the proposal pipeline.
    #[must_use]
    pub fn standard() -> Self {
        let required = StageId::all()
            .iter()
            .map(|stage| {
                (
                    *stage,
                    default_required(*stage)
                        .iter()
                        .map(|s| (*s).to_string())
                        .collect(),
                )
            })
            .collect();
        Self { required }
    }

    /// Build a table with per-stage overrides on top of the defaults.
    ///
    /// Stages absent from `overrides` keep their default list. An empty
    /// override list is allowed and makes the stage structurally complete
    /// as soon as its slot is populated.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownCriteriaField`] for a field name that
    /// does not exist on the stage's output record.
    pub fn with_overrides(
        overrides: HashMap<StageId, Vec<String>>,
    ) -> Result<Self, ConfigError> {
        let mut table = Self::standard();
        for (stage, fields) in overrides {
            for field in &fields {
                if !known_fields(stage).contains(&field.as_str()) {
                    return Err(ConfigError::UnknownCriteriaField {
                        stage: stage.as_str().to_string(),
                        field: field.clone(),
                    });
                }
            }
            table.required.insert(stage, fields);
        }
        Ok(table)
    }

    /// Required field names for `stage`.
    #[must_use]
    pub fn required_fields(&self, stage: StageId) -> &[String] {
        self.required
            .get(&stage)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of required fields missing from `stage`'s output slot.
    ///
    /// Empty result means structurally complete. Purely structural, no side
    /// effects: an unpopulated slot reports every required field missing.
    #[must_use]
    pub fn missing_fields(&self, state: &WorkflowState, stage: StageId) -> Vec<String> {
        self.required_fields(stage)
            .iter()
            .filter(|field| !field_is_present(state, stage, field))
            .cloned()
            .collect()
    }
}

impl Default for CriteriaTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfpflow_state::{
        ArchitectureRecord, RequirementsRecord, SourceDocument, SystemComponent,
        TechnologyChoice,
    };

    fn state() -> WorkflowState {
        WorkflowState::new("run-criteria", vec![SourceDocument::new("rfp.txt", "text")])
    }

    #[test]
    fn unpopulated_slot_reports_every_required_field() {
        let table = CriteriaTable::standard();
        let missing = table.missing_fields(&state(), StageId::ArchitectureDesign);
        assert_eq!(
            missing,
            vec!["summary", "technology_stack", "system_components"]
        );
    }

    #[test]
    fn complete_record_reports_nothing_missing() {
        let table = CriteriaTable::standard();
        let mut state = state();
        state.outputs.architecture = Some(ArchitectureRecord {
            summary: "Three-tier web platform".to_string(),
            technology_stack: vec![TechnologyChoice {
                layer: "backend".to_string(),
                choice: "Rust".to_string(),
                rationale: "services with strict latency budgets".to_string(),
            }],
            system_components: vec![SystemComponent {
                name: "api-gateway".to_string(),
                responsibility: "request routing".to_string(),
            }],
        });
        assert!(
            table
                .missing_fields(&state, StageId::ArchitectureDesign)
                .is_empty()
        );
    }

    #[test]
    fn partially_filled_record_reports_only_the_gaps() {
        let table = CriteriaTable::standard();
        let mut state = state();
        state.outputs.requirements = Some(RequirementsRecord {
            functional_modules: vec!["inventory".to_string()],
            source_excerpt: "Build an inventory system".to_string(),
            ..RequirementsRecord::default()
        });
        let missing = table.missing_fields(&state, StageId::RequirementExtraction);
        assert_eq!(missing, vec!["business_goals"]);
    }

    #[test]
    fn overrides_replace_the_default_list() {
        let mut overrides = HashMap::new();
        overrides.insert(
            StageId::RequirementExtraction,
            vec!["functional_modules".to_string()],
        );
        let table = CriteriaTable::with_overrides(overrides).unwrap();
        assert_eq!(
            table.required_fields(StageId::RequirementExtraction),
            &["functional_modules".to_string()]
        );
        // Untouched stages keep the defaults.
        assert_eq!(
            table.required_fields(StageId::DiagramGeneration),
            &["diagrams".to_string()]
        );
    }

    #[test]
    fn unknown_override_field_is_a_config_error() {
        let mut overrides = HashMap::new();
        overrides.insert(StageId::Planning, vec!["burndown".to_string()]);
        let err = CriteriaTable::with_overrides(overrides).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCriteriaField { .. }));
    }
}
