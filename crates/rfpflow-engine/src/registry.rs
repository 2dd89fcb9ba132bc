use std::collections::HashMap;

use rfpflow_stage_api::StageProcessor;
use rfpflow_utils::types::StageId;

/// Stage processors keyed by the stage whose slot they own.
///
/// Registration is keyed by [`StageProcessor::id`], so a processor can
/// never be wired under the wrong stage. Registering a second processor for
/// the same stage replaces the first (latest wins), which is how embedders
/// swap a default stage for a custom one.
#[derive(Default)]
pub struct StageRegistry {
    processors: HashMap<StageId, Box<dyn StageProcessor>>,
}

impl StageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor under its own stage id.
    pub fn register(&mut self, processor: Box<dyn StageProcessor>) {
        self.processors.insert(processor.id(), processor);
    }

    /// Whether a processor is registered for `stage`.
    #[must_use]
    pub fn contains(&self, stage: StageId) -> bool {
        self.processors.contains_key(&stage)
    }

    /// The processor for `stage`.
    ///
    /// # Panics
    /// Panics if no processor is registered; the engine validates coverage
    /// at construction, so this is unreachable from `Engine::run`.
    #[must_use]
    pub fn get(&self, stage: StageId) -> &dyn StageProcessor {
        self.processors
            .get(&stage)
            .map(Box::as_ref)
            .unwrap_or_else(|| panic!("no processor registered for {stage}"))
    }

    /// Number of registered processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stages: Vec<_> = self.processors.keys().map(StageId::as_str).collect();
        stages.sort_unstable();
        f.debug_struct("StageRegistry")
            .field("stages", &stages)
            .finish()
    }
}
