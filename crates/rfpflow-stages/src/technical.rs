//! Technical validation of the proposed architecture.
//!
//! A fixed security and feasibility checklist over the architecture and
//! the extracted constraints. Findings at `Blocker` severity withhold
//! approval; whether that becomes a rejection is the quality validator's
//! call, not this stage's.

use anyhow::{Context, Result};

use rfpflow_stage_api::StageProcessor;
use rfpflow_state::{
    ArchitectureRecord, RequirementsRecord, ReviewFinding, Severity, TechnicalReviewRecord,
    WorkflowState,
};
use rfpflow_utils::types::StageId;

/// Implementation of the technical-validation stage.
#[derive(Debug, Clone)]
pub struct TechnicalValidationStage;

impl TechnicalValidationStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn has_layer(architecture: &ArchitectureRecord, layer: &str) -> bool {
        architecture.technology_stack.iter().any(|t| t.layer == layer)
    }

    fn compliance_required(requirements: &RequirementsRecord) -> bool {
        requirements.constraints.iter().any(|c| {
            let lower = c.to_lowercase();
            lower.contains("gdpr") || lower.contains("hipaa") || lower.contains("compliance")
        })
    }

    fn checklist(
        requirements: &RequirementsRecord,
        architecture: &ArchitectureRecord,
    ) -> Vec<ReviewFinding> {
        let mut findings = Vec::new();

        if Self::has_layer(architecture, "identity") {
            findings.push(ReviewFinding {
                area: "authentication".to_string(),
                detail: "dedicated identity layer present".to_string(),
                severity: Severity::Info,
            });
        } else if Self::compliance_required(requirements) {
            findings.push(ReviewFinding {
                area: "authentication".to_string(),
                detail: "compliance constraints present but no identity layer in the stack"
                    .to_string(),
                severity: Severity::Blocker,
            });
        } else {
            findings.push(ReviewFinding {
                area: "authentication".to_string(),
                detail: "no dedicated identity layer; gateway-level auth assumed".to_string(),
                severity: Severity::Warning,
            });
        }

        if Self::has_layer(architecture, "datastore") {
            findings.push(ReviewFinding {
                area: "data_protection".to_string(),
                detail: "relational datastore selected; enable encryption at rest".to_string(),
                severity: Severity::Info,
            });
        } else {
            findings.push(ReviewFinding {
                area: "data_protection".to_string(),
                detail: "no datastore selected".to_string(),
                severity: Severity::Blocker,
            });
        }

        findings.push(ReviewFinding {
            area: "input_validation".to_string(),
            detail: "validate at the gateway and per service; reject unknown fields".to_string(),
            severity: Severity::Info,
        });

        if Self::has_layer(architecture, "deployment") {
            findings.push(ReviewFinding {
                area: "infrastructure".to_string(),
                detail: "containerized deployment; network policies required between services"
                    .to_string(),
                severity: Severity::Info,
            });
        } else {
            findings.push(ReviewFinding {
                area: "infrastructure".to_string(),
                detail: "deployment approach undefined".to_string(),
                severity: Severity::Warning,
            });
        }

        if architecture.system_components.len() > 12 {
            findings.push(ReviewFinding {
                area: "feasibility".to_string(),
                detail: format!(
                    "{} components for one delivery team; consider consolidation",
                    architecture.system_components.len()
                ),
                severity: Severity::Warning,
            });
        }

        findings
    }
}

impl StageProcessor for TechnicalValidationStage {
    fn id(&self) -> StageId {
        StageId::TechnicalValidation
    }

    fn run(&self, state: &mut WorkflowState) -> Result<()> {
        let requirements = state
            .outputs
            .requirements
            .clone()
            .context("technical validation requires the requirement extraction output")?;
        let architecture = state
            .outputs
            .architecture
            .clone()
            .context("technical validation requires the architecture design output")?;

        let security_findings = Self::checklist(&requirements, &architecture);
        let concerns: Vec<String> = security_findings
            .iter()
            .filter(|f| f.severity > Severity::Info)
            .map(|f| format!("{}: {}", f.area, f.detail))
            .collect();
        let approved = security_findings
            .iter()
            .all(|f| f.severity < Severity::Blocker);

        state.outputs.technical_review = Some(TechnicalReviewRecord {
            security_findings,
            concerns,
            approved,
        });
        Ok(())
    }
}

impl Default for TechnicalValidationStage {
    fn default() -> Self {
        Self::new()
    }
}
