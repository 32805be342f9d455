use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Top-level Vitruv configuration, matching `vitruv.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitruvConfig {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub advice: AdviceSection,
}

/// Where and how diagram artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory receiving rendered diagrams.
    pub dir: PathBuf,
    /// Image format passed to Graphviz (`-T<format>`).
    pub format: String,
    /// Graphviz layout program to invoke.
    pub program: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: "png".to_string(),
            program: "dot".to_string(),
        }
    }
}

/// Refactor-advice collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceSection {
    /// Provider id: ollama, openai, custom.
    pub provider: String,
    /// Model name, e.g. "llama3" or "gpt-4o-mini".
    pub model: String,
    /// Override the provider's base URL (local Ollama, proxies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key for hosted providers.
    pub api_key_env: String,
    pub temperature: f64,
}

impl Default for AdviceSection {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama3".to_string(),
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
        }
    }
}

impl VitruvConfig {
    /// Load configuration from a TOML file. `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {e}", path.display())))?;
        let config = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }
}
