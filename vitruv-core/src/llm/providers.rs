// LLM provider implementations: local Ollama and OpenAI-compatible HTTP endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdviceError, VitruvError};

use super::{LlmProvider, TokenUsage};

// ── Ollama Provider ─────────────────────────────────────────────────

#[derive(Debug)]
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
}

fn ensure_crypto_provider() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

impl OllamaProvider {
    pub fn new(model: String) -> Self {
        ensure_crypto_provider();
        Self {
            client: Client::new(),
            model,
            base_url: "http://localhost:11434".to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

#[async_trait::async_trait]
#[allow(clippy::unnecessary_literal_bound)]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn call(
        &self,
        prompt: &str,
        temperature: f64,
    ) -> crate::error::Result<(String, TokenUsage)> {
        let url = format!("{}/api/generate", self.base_url);

        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions { temperature },
        };

        debug!(model = %self.model, "Calling Ollama API");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VitruvError::Advice(AdviceError::Network(e.to_string())))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(VitruvError::Advice(AdviceError::Api { status, body: text }));
        }

        let result: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| VitruvError::Advice(AdviceError::Parse(e.to_string())))?;

        Ok((
            result.response,
            TokenUsage {
                input_tokens: result.prompt_eval_count,
                output_tokens: result.eval_count,
            },
        ))
    }
}

// ── OpenAI-compatible Provider ──────────────────────────────────────

#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        ensure_crypto_provider();
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: "https://api.openai.com".to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: OpenAiUsage,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[async_trait::async_trait]
#[allow(clippy::unnecessary_literal_bound)]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn call(
        &self,
        prompt: &str,
        temperature: f64,
    ) -> crate::error::Result<(String, TokenUsage)> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = OpenAiRequest {
            model: self.model.clone(),
            max_tokens: 2048,
            temperature,
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!(model = %self.model, "Calling OpenAI API");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| VitruvError::Advice(AdviceError::Network(e.to_string())))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(VitruvError::Advice(AdviceError::Api { status, body: text }));
        }

        let result: OpenAiResponse = resp
            .json()
            .await
            .map_err(|e| VitruvError::Advice(AdviceError::Parse(e.to_string())))?;

        let text = result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok((
            text,
            TokenUsage {
                input_tokens: result.usage.prompt_tokens,
                output_tokens: result.usage.completion_tokens,
            },
        ))
    }
}

// ── Provider Factory ────────────────────────────────────────────────

/// Create an LLM provider from configuration.
pub fn create_provider(
    provider: &str,
    model: &str,
    base_url: Option<&str>,
    api_key: Option<&str>,
) -> crate::error::Result<Box<dyn LlmProvider>> {
    match provider {
        "ollama" => {
            let mut p = OllamaProvider::new(model.to_string());
            if let Some(url) = base_url {
                p = p.with_base_url(url.to_string());
            }
            Ok(Box::new(p))
        }
        "openai" | "custom" => {
            let key = api_key.ok_or_else(|| {
                VitruvError::Advice(AdviceError::Config(format!(
                    "provider '{provider}' requires an API key"
                )))
            })?;
            let mut p = OpenAiProvider::new(key.to_string(), model.to_string());
            if let Some(url) = base_url {
                p = p.with_base_url(url.to_string());
            }
            Ok(Box::new(p))
        }
        other => Err(VitruvError::Advice(AdviceError::Config(format!(
            "Unknown provider: {other}. Use: ollama, openai, custom"
        )))),
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_provider_factory() {
        let p = create_provider("ollama", "llama3", None, None).unwrap();
        assert_eq!(p.name(), "ollama");
        assert_eq!(p.model_id(), "llama3");

        let p = create_provider("openai", "gpt-4o-mini", None, Some("key")).unwrap();
        assert_eq!(p.name(), "openai");

        let p = create_provider(
            "custom",
            "local-model",
            Some("http://localhost:8080"),
            Some("key"),
        );
        assert!(p.is_ok());

        let p = create_provider("invalid", "model", None, None);
        assert!(p.is_err());
    }

    #[test]
    fn hosted_provider_requires_api_key() {
        let err = create_provider("openai", "gpt-4o-mini", None, None)
            .err()
            .expect("missing key should fail");
        assert!(err.to_string().contains("requires an API key"));
    }

    #[test]
    fn base_urls_are_normalized() {
        let p = OllamaProvider::new("llama3".to_string())
            .with_base_url("http://remote:11434/".to_string());
        assert_eq!(p.base_url, "http://remote:11434");
    }

    #[test]
    fn ollama_request_is_non_streaming() {
        let body = OllamaRequest {
            model: "llama3".to_string(),
            prompt: "hi".to_string(),
            stream: false,
            options: OllamaOptions { temperature: 0.2 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.2);
    }
}
