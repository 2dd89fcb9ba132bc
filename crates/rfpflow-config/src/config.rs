use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use strum::VariantNames;

use rfpflow_utils::error::ConfigError;
use rfpflow_utils::types::{RejectionMap, StageId, StageSequence};

/// Default per-stage revision cap.
pub const DEFAULT_MAX_REVISIONS: u32 = 2;
/// Default total iteration cap per run.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// External reviewer configuration.
///
/// When present, the pipeline judges stage quality by piping a state
/// summary to this command; when absent, runs degrade to structural-only
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewerConfig {
    /// Program to invoke for each assessment.
    pub command: String,
    /// Arguments passed on every invocation.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Validated pipeline configuration.
///
/// Constructed via [`PipelineConfig::default`], [`PipelineConfig::load`],
/// [`PipelineConfig::from_toml_str`], or [`PipelineConfig::builder`]; all
/// paths validate stage names, caps, and criteria fields so a bad config
/// fails at load time, never mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Per-stage bound on revision retries before forced acceptance.
    pub max_revisions: u32,
    /// Total bound on stage invocations per run.
    pub max_iterations: u32,
    /// The stage execution order.
    pub sequence: StageSequence,
    /// Reroute targets for rejected stages.
    pub rejection_map: RejectionMap,
    /// Per-stage overrides of the structural required-field lists.
    pub criteria_overrides: HashMap<StageId, Vec<String>>,
    /// External reviewer, if any.
    pub reviewer: Option<ReviewerConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_revisions: DEFAULT_MAX_REVISIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sequence: StageSequence::standard(),
            rejection_map: RejectionMap::standard(),
            criteria_overrides: HashMap::new(),
            reviewer: None,
        }
    }
}

/// Raw deserialization target for the TOML file. Everything is optional;
/// validation happens when the raw form is folded onto the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    limits: RawLimits,
    #[serde(default)]
    pipeline: RawPipeline,
    #[serde(default)]
    rejection: HashMap<String, String>,
    #[serde(default)]
    criteria: HashMap<String, Vec<String>>,
    reviewer: Option<ReviewerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLimits {
    max_revisions: Option<u32>,
    max_iterations: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPipeline {
    sequence: Option<Vec<String>>,
}

fn parse_stage(name: &str) -> Result<StageId, ConfigError> {
    StageId::parse(name).ok_or_else(|| ConfigError::UnknownStage {
        name: name.to_string(),
        expected: StageId::VARIANTS.join(", "),
    })
}

impl PipelineConfig {
    /// Start a programmatic configuration.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for syntax errors, unknown stage names,
    /// or invalid caps.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| ConfigError::InvalidFile(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotFound`] if `path` does not exist, plus
    /// everything [`from_toml_str`](Self::from_toml_str) can return.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(max_revisions) = raw.limits.max_revisions {
            builder = builder.max_revisions(max_revisions);
        }
        if let Some(max_iterations) = raw.limits.max_iterations {
            builder = builder.max_iterations(max_iterations);
        }
        if let Some(names) = raw.pipeline.sequence {
            let stages = names
                .iter()
                .map(|name| parse_stage(name))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.sequence_stages(stages);
        }
        for (rejected, target) in &raw.rejection {
            builder = builder.reroute(parse_stage(rejected)?, parse_stage(target)?);
        }
        for (stage, fields) in raw.criteria {
            builder = builder.criteria(parse_stage(&stage)?, fields);
        }
        if let Some(reviewer) = raw.reviewer {
            builder = builder.reviewer(reviewer.command, reviewer.args);
        }

        builder.build()
    }
}

/// Builder for programmatic configuration.
///
/// Useful for embedding rfpflow where deterministic behavior independent of
/// the user's environment is required.
///
/// # Example
///
/// ```rust
/// use rfpflow_config::PipelineConfig;
/// use rfpflow_utils::types::StageId;
///
/// let config = PipelineConfig::builder()
///     .max_revisions(1)
///     .max_iterations(20)
///     .reroute(StageId::FinalReview, StageId::ArchitectureDesign)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.max_revisions, 1);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    max_revisions: Option<u32>,
    max_iterations: Option<u32>,
    sequence: Option<Vec<StageId>>,
    reroutes: Vec<(StageId, StageId)>,
    criteria: HashMap<StageId, Vec<String>>,
    reviewer: Option<ReviewerConfig>,
}

impl ConfigBuilder {
    /// Per-stage revision cap before forced acceptance.
    #[must_use]
    pub fn max_revisions(mut self, value: u32) -> Self {
        self.max_revisions = Some(value);
        self
    }

    /// Total iteration cap per run.
    #[must_use]
    pub fn max_iterations(mut self, value: u32) -> Self {
        self.max_iterations = Some(value);
        self
    }

    /// Replace the default stage order.
    #[must_use]
    pub fn sequence_stages(mut self, stages: Vec<StageId>) -> Self {
        self.sequence = Some(stages);
        self
    }

    /// Add a rejection reroute.
    #[must_use]
    pub fn reroute(mut self, rejected: StageId, target: StageId) -> Self {
        self.reroutes.push((rejected, target));
        self
    }

    /// Override the structural required-field list for one stage.
    #[must_use]
    pub fn criteria(mut self, stage: StageId, fields: Vec<String>) -> Self {
        self.criteria.insert(stage, fields);
        self
    }

    /// Configure the external reviewer command.
    #[must_use]
    pub fn reviewer(mut self, command: impl Into<String>, args: Vec<String>) -> Self {
        self.reviewer = Some(ReviewerConfig {
            command: command.into(),
            args,
        });
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for a zero iteration cap, an empty or
    /// duplicated sequence, or a reviewer with a blank command. Rejection
    /// reroutes onto stages that exist but are outside the sequence are
    /// allowed; routing handles off-sequence stages by slot scanning.
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let defaults = PipelineConfig::default();

        let max_iterations = self.max_iterations.unwrap_or(defaults.max_iterations);
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_iterations".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let max_revisions = self.max_revisions.unwrap_or(defaults.max_revisions);

        let sequence = match self.sequence {
            Some(stages) => StageSequence::new(stages).ok_or(ConfigError::InvalidSequence)?,
            None => defaults.sequence,
        };

        let rejection_map = if self.reroutes.is_empty() {
            defaults.rejection_map
        } else {
            let mut map = RejectionMap::identity();
            for (rejected, target) in self.reroutes {
                map.set(rejected, target);
            }
            map
        };

        if let Some(reviewer) = &self.reviewer {
            if reviewer.command.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "reviewer.command".to_string(),
                    reason: "must not be blank".to_string(),
                });
            }
        }

        Ok(PipelineConfig {
            max_revisions,
            max_iterations,
            sequence,
            rejection_map,
            criteria_overrides: self.criteria,
            reviewer: self.reviewer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_revisions, 2);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.sequence, StageSequence::standard());
        assert_eq!(
            config.rejection_map.target(StageId::TechnicalValidation),
            Some(StageId::ArchitectureDesign)
        );
        assert!(config.reviewer.is_none());
    }

    #[test]
    fn full_toml_round_trip() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [limits]
            max_revisions = 1
            max_iterations = 24

            [pipeline]
            sequence = ["requirement_extraction", "architecture_design", "final_review"]

            [rejection]
            final_review = "architecture_design"

            [criteria]
            planning = ["milestones"]

            [reviewer]
            command = "proposal-reviewer"
            args = ["--format", "json"]
            "#,
        )
        .unwrap();

        assert_eq!(config.max_revisions, 1);
        assert_eq!(config.max_iterations, 24);
        assert_eq!(config.sequence.len(), 3);
        assert_eq!(
            config.rejection_map.target(StageId::FinalReview),
            Some(StageId::ArchitectureDesign)
        );
        assert_eq!(
            config.criteria_overrides.get(&StageId::Planning),
            Some(&vec!["milestones".to_string()])
        );
        let reviewer = config.reviewer.unwrap();
        assert_eq!(reviewer.command, "proposal-reviewer");
        assert_eq!(reviewer.args, vec!["--format", "json"]);
    }

    #[test]
    fn empty_toml_is_the_default_config() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn unknown_stage_name_lists_the_valid_names() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [rejection]
            cto = "architecture_design"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::UnknownStage { name, expected } => {
                assert_eq!(name, "cto");
                assert!(expected.contains("technical_validation"));
            }
            other => panic!("expected UnknownStage, got {other:?}"),
        }
    }

    #[test]
    fn zero_iteration_cap_is_rejected() {
        let err = PipelineConfig::builder().max_iterations(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn duplicate_sequence_is_rejected() {
        let err = PipelineConfig::builder()
            .sequence_stages(vec![StageId::Planning, StageId::Planning])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSequence));
    }

    #[test]
    fn unknown_section_is_an_invalid_file() {
        let err = PipelineConfig::from_toml_str("[unknown]\nkey = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile(_)));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = PipelineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_reads_a_file_from_disk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("rfpflow.toml");
        std::fs::write(&path, "[limits]\nmax_iterations = 9\n").unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.max_iterations, 9);
    }
}
