//! Requirement extraction from raw source documents.
//!
//! Keyword and line-pattern heuristics only; natural-language understanding
//! belongs to an upstream service and can replace this stage wholesale.

use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

use rfpflow_stage_api::StageProcessor;
use rfpflow_state::{RequirementsRecord, WorkflowState};
use rfpflow_utils::types::StageId;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:project(?:\s+title)?|rfp)\s*[:\-]\s*(\S.*)$").unwrap()
});

static CLIENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:client|organization|company|issued by)\s*[:\-]\s*(\S.*)$").unwrap()
});

/// Module keywords mapped to the functional module they indicate.
const MODULE_KEYWORDS: &[(&str, &str)] = &[
    ("inventory", "inventory_management"),
    ("warehouse", "inventory_management"),
    ("billing", "billing"),
    ("invoice", "billing"),
    ("payment", "payments"),
    ("checkout", "payments"),
    ("login", "user_management"),
    ("authentication", "user_management"),
    ("user management", "user_management"),
    ("report", "reporting"),
    ("analytics", "reporting"),
    ("dashboard", "reporting"),
    ("order", "order_management"),
    ("catalog", "product_catalog"),
    ("customer", "customer_management"),
    ("crm", "customer_management"),
    ("notification", "notifications"),
    ("search", "search"),
];

/// Integration keywords recognized in the source text.
const INTEGRATION_KEYWORDS: &[&str] = &[
    "sap", "salesforce", "stripe", "paypal", "sso", "ldap", "oauth", "erp", "sharepoint",
    "workday",
];

const GOAL_MARKERS: &[&str] = &["goal", "objective", "improve", "reduce", "increase", "modernize"];

const CONSTRAINT_MARKERS: &[&str] = &[
    "must ", "constraint", "budget", "deadline", "compliance", "gdpr", "hipaa", "on-premise",
    "on premise", "data residency",
];

const EXCERPT_MAX_CHARS: usize = 400;

/// Implementation of the requirement-extraction stage.
///
/// Distills the raw documents into a [`RequirementsRecord`]: title and
/// client when identifiable, plus goals, functional modules, integrations,
/// and constraints found by keyword scanning. Modules and goals fall back
/// to generic entries so the structural criteria of later stages always
/// have something to build on.
#[derive(Debug, Clone)]
pub struct RequirementExtractionStage;

impl RequirementExtractionStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn extract(&self, text: &str) -> RequirementsRecord {
        let lower = text.to_lowercase();

        let project_title = TITLE_RE
            .captures(text)
            .map(|caps| caps[1].trim().to_string());
        let client_organization = CLIENT_RE
            .captures(text)
            .map(|caps| caps[1].trim().to_string());

        let mut functional_modules: Vec<String> = Vec::new();
        for (keyword, module) in MODULE_KEYWORDS {
            if lower.contains(keyword) && !functional_modules.iter().any(|m| m == module) {
                functional_modules.push((*module).to_string());
            }
        }
        if functional_modules.is_empty() {
            functional_modules.push("core_platform".to_string());
        }

        let integrations: Vec<String> = INTEGRATION_KEYWORDS
            .iter()
            .filter(|keyword| lower.contains(*keyword))
            .map(|keyword| (*keyword).to_string())
            .collect();

        let mut business_goals: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| {
                let line_lower = line.to_lowercase();
                !line.is_empty() && GOAL_MARKERS.iter().any(|m| line_lower.contains(m))
            })
            .map(|line| line.trim_start_matches(['-', '*', ' ']).to_string())
            .collect();
        if business_goals.is_empty() {
            business_goals.push("deliver the requested system capabilities".to_string());
        }

        let constraints: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| {
                let line_lower = line.to_lowercase();
                !line.is_empty() && CONSTRAINT_MARKERS.iter().any(|m| line_lower.contains(m))
            })
            .map(|line| line.trim_start_matches(['-', '*', ' ']).to_string())
            .collect();

        let source_excerpt: String = text.chars().take(EXCERPT_MAX_CHARS).collect();

        RequirementsRecord {
            project_title,
            client_organization,
            business_goals,
            functional_modules,
            integrations,
            constraints,
            source_excerpt,
        }
    }
}

impl StageProcessor for RequirementExtractionStage {
    fn id(&self) -> StageId {
        StageId::RequirementExtraction
    }

    fn run(&self, state: &mut WorkflowState) -> Result<()> {
        let text = state.combined_input();
        if text.trim().is_empty() {
            bail!("no document content to extract requirements from");
        }
        state.outputs.requirements = Some(self.extract(&text));
        Ok(())
    }
}

impl Default for RequirementExtractionStage {
    fn default() -> Self {
        Self::new()
    }
}
