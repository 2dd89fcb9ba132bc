//! Default stage processors for the rfpflow pipeline
//!
//! These six processors implement the deterministic spine of the proposal
//! pipeline: keyword extraction, a technology-stack catalog, derived
//! diagram specs, table-driven estimation, a security checklist, and
//! completeness/tone scoring. Each writes exactly its own output slot and
//! nothing else; all routing behavior lives in the supervisor.
//!
//! Content sophistication is deliberately modest; the orchestration is the
//! product, and richer generation can replace any single stage by
//! registering a different [`StageProcessor`](rfpflow_stage_api::StageProcessor)
//! for its slot.

mod architecture;
mod diagrams;
mod extraction;
mod planning;
mod review;
mod technical;

pub use architecture::ArchitectureDesignStage;
pub use diagrams::DiagramGenerationStage;
pub use extraction::RequirementExtractionStage;
pub use planning::PlanningStage;
pub use review::FinalReviewStage;
pub use technical::TechnicalValidationStage;

use rfpflow_stage_api::StageProcessor;

/// All six default processors, one per stage.
#[must_use]
pub fn default_processors() -> Vec<Box<dyn StageProcessor>> {
    vec![
        Box::new(RequirementExtractionStage::new()),
        Box::new(ArchitectureDesignStage::new()),
        Box::new(DiagramGenerationStage::new()),
        Box::new(PlanningStage::new()),
        Box::new(TechnicalValidationStage::new()),
        Box::new(FinalReviewStage::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfpflow_utils::types::StageId;

    #[test]
    fn default_processors_cover_every_stage_exactly_once() {
        let processors = default_processors();
        let mut ids: Vec<StageId> = processors.iter().map(|p| p.id()).collect();
        ids.sort_by_key(StageId::as_str);
        let mut expected: Vec<StageId> = StageId::all().to_vec();
        expected.sort_by_key(StageId::as_str);
        assert_eq!(ids, expected);
    }
}
