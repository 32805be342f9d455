//! The refactor-advice collaborator.
//!
//! An untrusted boundary: the provider's response is validated against a
//! closed schema and rejected explicitly on any mismatch, never consumed as
//! raw text.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vitruv_graphs::CodeStructure;

use crate::error::{AdviceError, Result, VitruvError};
use crate::llm::{LlmProvider, TokenUsage};

const ARCHITECT_PROMPT: &str = r#"You are an expert software architect specializing in refactoring legacy Python code.
Analyze the provided code structure and propose a modern, cleaner architecture.
Focus on SOLID principles, separation of concerns, and maintainable code.

Here is the high-level structure of a legacy Python script:
{code_structure}

Your output MUST be a single, valid JSON object with exactly these keys:
- "summary": a one-paragraph description of the proposed refactoring.
- "reasoning": a bullet-point list explaining why this refactoring is beneficial.
- "new_architecture_dot": the proposed architecture in Graphviz DOT format.
  Use a TB rankdir, rounded box nodes, and cluster related components.

Respond with the JSON object only, no surrounding prose.
"#;

/// A validated advice payload.
///
/// Exactly three fields are recognized; anything else in the response is a
/// contract violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefactorAdvice {
    pub summary: String,
    pub reasoning: Reasoning,
    pub new_architecture_dot: String,
}

/// Reasoning arrives as free text or an ordered list of points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reasoning {
    Text(String),
    Points(Vec<String>),
}

impl Reasoning {
    /// Normalize to a list of bullet points.
    pub fn points(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Points(points) => points.iter().map(String::as_str).collect(),
        }
    }
}

/// Asks the configured LLM for a refactoring proposal over a [`CodeStructure`].
#[derive(Debug)]
pub struct RefactorAdvisor {
    provider: Box<dyn LlmProvider>,
    temperature: f64,
}

impl RefactorAdvisor {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f64) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    /// Request advice for the given structure.
    pub async fn suggest(&self, structure: &CodeStructure) -> Result<(RefactorAdvice, TokenUsage)> {
        let structure_json = serde_json::to_string_pretty(structure)
            .map_err(|e| VitruvError::Advice(AdviceError::Parse(e.to_string())))?;
        let prompt = ARCHITECT_PROMPT.replace("{code_structure}", &structure_json);

        debug!(
            provider = self.provider.name(),
            model = self.provider.model_id(),
            "Requesting refactor advice"
        );
        let (raw, usage) = self.provider.call(&prompt, self.temperature).await?;
        let advice = parse_advice(&raw)?;
        Ok((advice, usage))
    }
}

/// Validate the collaborator's raw response against the advice schema.
///
/// Models often wrap JSON in Markdown fences; those are stripped first.
/// Everything else must match the schema exactly.
pub fn parse_advice(raw: &str) -> Result<RefactorAdvice> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        VitruvError::Advice(AdviceError::Contract {
            message: e.to_string(),
            raw: raw.to_string(),
        })
    })
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner
        .trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .map_or(trimmed, str::trim_end)
}

// ── Tests ───────────────────────────────────────────────────────────
