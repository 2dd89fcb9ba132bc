//! Architecture design from extracted requirements.
//!
//! Technology selection is a static catalog keyed by the functional
//! modules and constraints found upstream; component decomposition is one
//! service per module plus the shared platform pieces.

use anyhow::{Context, Result};

use rfpflow_stage_api::StageProcessor;
use rfpflow_state::{
    ArchitectureRecord, RequirementsRecord, SystemComponent, TechnologyChoice, WorkflowState,
};
use rfpflow_utils::types::StageId;

/// Implementation of the architecture-design stage.
///
/// Reads the requirements record and produces an [`ArchitectureRecord`]
/// with a technology stack, component decomposition, and prose summary.
#[derive(Debug, Clone)]
pub struct ArchitectureDesignStage;

impl ArchitectureDesignStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn select_stack(requirements: &RequirementsRecord) -> Vec<TechnologyChoice> {
        let mut stack = vec![
            TechnologyChoice {
                layer: "backend".to_string(),
                choice: "Node.js".to_string(),
                rationale: "fast API development with a mature ecosystem".to_string(),
            },
            TechnologyChoice {
                layer: "datastore".to_string(),
                choice: "PostgreSQL".to_string(),
                rationale: "relational integrity for transactional modules".to_string(),
            },
            TechnologyChoice {
                layer: "deployment".to_string(),
                choice: "Docker + Kubernetes".to_string(),
                rationale: "reproducible builds and horizontal scaling".to_string(),
            },
            TechnologyChoice {
                layer: "frontend".to_string(),
                choice: "React".to_string(),
                rationale: "component-based UI for dashboards and forms".to_string(),
            },
        ];

        if requirements.functional_modules.iter().any(|m| m == "reporting") {
            stack.push(TechnologyChoice {
                layer: "cache".to_string(),
                choice: "Redis".to_string(),
                rationale: "low-latency aggregation for reporting views".to_string(),
            });
        }

        let needs_identity = requirements
            .functional_modules
            .iter()
            .any(|m| m == "user_management")
            || requirements
                .integrations
                .iter()
                .any(|i| i == "sso" || i == "ldap" || i == "oauth")
            || requirements
                .constraints
                .iter()
                .any(|c| c.to_lowercase().contains("gdpr") || c.to_lowercase().contains("hipaa"));
        if needs_identity {
            stack.push(TechnologyChoice {
                layer: "identity".to_string(),
                choice: "Keycloak".to_string(),
                rationale: "centralized authentication with SSO and audit trails".to_string(),
            });
        }

        stack
    }

    fn decompose(requirements: &RequirementsRecord) -> Vec<SystemComponent> {
        let mut components = vec![SystemComponent {
            name: "api-gateway".to_string(),
            responsibility: "request routing, authentication enforcement, rate limiting"
                .to_string(),
        }];
        for module in &requirements.functional_modules {
            components.push(SystemComponent {
                name: format!("{}-service", module.replace('_', "-")),
                responsibility: format!("owns the {} domain", module.replace('_', " ")),
            });
        }
        for integration in &requirements.integrations {
            components.push(SystemComponent {
                name: format!("{integration}-connector"),
                responsibility: format!("outbound integration with {integration}"),
            });
        }
        components
    }

    fn summarize(requirements: &RequirementsRecord, components: &[SystemComponent]) -> String {
        let subject = requirements
            .project_title
            .as_deref()
            .unwrap_or("the requested system");
        let client = requirements
            .client_organization
            .as_deref()
            .unwrap_or("the client");
        format!(
            "Proposed architecture for {subject} ({client}): {} services behind an API gateway, \
             covering {} functional modules with {} external integration(s).",
            components.len().saturating_sub(1),
            requirements.functional_modules.len(),
            requirements.integrations.len(),
        )
    }
}

impl StageProcessor for ArchitectureDesignStage {
    fn id(&self) -> StageId {
        StageId::ArchitectureDesign
    }

    fn run(&self, state: &mut WorkflowState) -> Result<()> {
        let requirements = state
            .outputs
            .requirements
            .clone()
            .context("architecture design requires the requirement extraction output")?;

        let technology_stack = Self::select_stack(&requirements);
        let system_components = Self::decompose(&requirements);
        let summary = Self::summarize(&requirements, &system_components);

        state.outputs.architecture = Some(ArchitectureRecord {
            summary,
            technology_stack,
            system_components,
        });
        Ok(())
    }
}

impl Default for ArchitectureDesignStage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfpflow_state::SourceDocument;

    fn state_with_requirements(record: RequirementsRecord) -> WorkflowState {
        let mut state =
            WorkflowState::new("run-arch", vec![SourceDocument::new("rfp.txt", "text")]);
        state.outputs.requirements = Some(record);
        state
    }

    #[test]
    fn missing_requirements_is_an_error() {
        let mut state =
            WorkflowState::new("run-arch", vec![SourceDocument::new("rfp.txt", "text")]);
        let err = ArchitectureDesignStage::new().run(&mut state).unwrap_err();
        assert!(err.to_string().contains("requirement extraction output"));
        assert!(state.outputs.architecture.is_none());
    }

    #[test]
    fn one_service_per_module_plus_gateway_and_connectors() {
        let mut state = state_with_requirements(RequirementsRecord {
            functional_modules: vec!["inventory_management".to_string(), "billing".to_string()],
            integrations: vec!["sap".to_string()],
            business_goals: vec!["modernize".to_string()],
            source_excerpt: "excerpt".to_string(),
            ..RequirementsRecord::default()
        });
        ArchitectureDesignStage::new().run(&mut state).unwrap();

        let record = state.outputs.architecture.as_ref().unwrap();
        let names: Vec<&str> = record
            .system_components
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "api-gateway",
                "inventory-management-service",
                "billing-service",
                "sap-connector"
            ]
        );
        assert!(record.summary.contains("2 functional modules"));
    }

    #[test]
    fn compliance_constraint_pulls_in_an_identity_layer() {
        let mut state = state_with_requirements(RequirementsRecord {
            functional_modules: vec!["core_platform".to_string()],
            constraints: vec!["Must comply with GDPR".to_string()],
            business_goals: vec!["modernize".to_string()],
            source_excerpt: "excerpt".to_string(),
            ..RequirementsRecord::default()
        });
        ArchitectureDesignStage::new().run(&mut state).unwrap();

        let record = state.outputs.architecture.as_ref().unwrap();
        assert!(
            record
                .technology_stack
                .iter()
                .any(|t| t.layer == "identity")
        );
    }

    #[test]
    fn reporting_module_adds_a_cache_layer() {
        let mut state = state_with_requirements(RequirementsRecord {
            functional_modules: vec!["reporting".to_string()],
            business_goals: vec!["insight".to_string()],
            source_excerpt: "excerpt".to_string(),
            ..RequirementsRecord::default()
        });
        ArchitectureDesignStage::new().run(&mut state).unwrap();

        let record = state.outputs.architecture.as_ref().unwrap();
        assert!(record.technology_stack.iter().any(|t| t.choice == "Redis"));
    }
}
