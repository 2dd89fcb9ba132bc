//! Configuration management for rfpflow
//!
//! This crate provides the pipeline's tunable surface: the per-stage
//! revision cap, the total iteration cap, the stage sequence, the rejection
//! map, structural-criteria overrides, and the optional external reviewer
//! command. All of these are plain values, not behaviors, and may be
//! hot-swapped between runs.
//!
//! Configuration comes from a TOML file or the [`ConfigBuilder`]:
//!
//! ```toml
//! [limits]
//! max_revisions = 2
//! max_iterations = 50
//!
//! [pipeline]
//! sequence = [
//!     "requirement_extraction",
//!     "architecture_design",
//!     "diagram_generation",
//!     "planning",
//!     "technical_validation",
//!     "final_review",
//! ]
//!
//! [rejection]
//! technical_validation = "architecture_design"
//!
//! [criteria]
//! planning = ["milestones", "timeline"]
//!
//! [reviewer]
//! command = "proposal-reviewer"
//! args = ["--format", "json"]
//! ```

mod config;

pub use config::{ConfigBuilder, PipelineConfig, ReviewerConfig};
