//! Diagram spec derivation from the architecture record.
//!
//! Produces renderer-agnostic node/edge specs; actually drawing them is a
//! presentation concern outside the pipeline.

use anyhow::{Context, Result};

use rfpflow_stage_api::StageProcessor;
use rfpflow_state::{ArchitectureRecord, DiagramSpec, DiagramsRecord, WorkflowState};
use rfpflow_utils::types::StageId;

/// Implementation of the diagram-generation stage.
///
/// Derives two views from the architecture: a system-context diagram
/// (gateway in front of every service, services over the datastore) and a
/// fixed-shape deployment view.
#[derive(Debug, Clone)]
pub struct DiagramGenerationStage;

impl DiagramGenerationStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn system_context(architecture: &ArchitectureRecord) -> DiagramSpec {
        let mut nodes: Vec<String> = architecture
            .system_components
            .iter()
            .map(|c| c.name.clone())
            .collect();
        nodes.push("database".to_string());

        let mut edges = Vec::new();
        for component in &architecture.system_components {
            if component.name == "api-gateway" {
                continue;
            }
            edges.push(("api-gateway".to_string(), component.name.clone()));
            if component.name.ends_with("-service") {
                edges.push((component.name.clone(), "database".to_string()));
            }
        }
        DiagramSpec {
            title: "system context".to_string(),
            nodes,
            edges,
        }
    }

    fn deployment_view() -> DiagramSpec {
        DiagramSpec {
            title: "deployment view".to_string(),
            nodes: vec![
                "load-balancer".to_string(),
                "app-cluster".to_string(),
                "database-primary".to_string(),
                "database-replica".to_string(),
            ],
            edges: vec![
                ("load-balancer".to_string(), "app-cluster".to_string()),
                ("app-cluster".to_string(), "database-primary".to_string()),
                ("database-primary".to_string(), "database-replica".to_string()),
            ],
        }
    }
}

impl StageProcessor for DiagramGenerationStage {
    fn id(&self) -> StageId {
        StageId::DiagramGeneration
    }

    fn run(&self, state: &mut WorkflowState) -> Result<()> {
        let architecture = state
            .outputs
            .architecture
            .clone()
            .context("diagram generation requires the architecture design output")?;

        state.outputs.diagrams = Some(DiagramsRecord {
            diagrams: vec![Self::system_context(&architecture), Self::deployment_view()],
        });
        Ok(())
    }
}

impl Default for DiagramGenerationStage {
    fn default() -> Self {
        Self::new()
    }
}
