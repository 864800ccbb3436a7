use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::generator::{InsightGenerator, UploadPrompt};
use crate::prompt;

/// HTTP-based generator using an OpenAI-compatible chat completions API.
///
/// Returns the model's reply verbatim. Interpreting that text (JSON or not)
/// is the caller's job, so a model that ignores the format instructions
/// never fails here.
#[derive(Debug)]
pub struct HttpInsightGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl HttpInsightGenerator {
    /// Create a new HTTP generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GeneratorError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the chat completions request body for a prompt.
    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ]
        })
    }

    /// Pull the assistant text out of a chat completions response.
    fn extract_content(response_json: &serde_json::Value) -> Result<&str, GeneratorError> {
        response_json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                GeneratorError::ParseError(format!("unexpected response format: {response_json}"))
            })
    }

    async fn complete(&self, prompt: &str) -> Result<String, GeneratorError> {
        debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending generation request");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(self.config.timeout_seconds)
                } else {
                    GeneratorError::HttpError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "generation API returned error");
            return Err(GeneratorError::ApiError(format!("HTTP {status}: {body}")));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GeneratorError::ParseError(format!("failed to parse API response: {e}")))?;

        Ok(Self::extract_content(&response_json)?.to_string())
    }
}

#[async_trait]
impl InsightGenerator for HttpInsightGenerator {
    async fn generate_dashboard(&self, upload: &UploadPrompt) -> Result<String, GeneratorError> {
        self.complete(&prompt::dashboard_prompt(upload)).await
    }

    async fn suggest_article(&self, content: &str) -> Result<String, GeneratorError> {
        self.complete(&prompt::article_prompt(content)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> HttpInsightGenerator {
        HttpInsightGenerator::new(GeneratorConfig::new(
            "http://localhost:8080/v1/chat/completions",
            "gpt-4o-mini",
            "sk-test",
        ))
        .unwrap()
    }

    #[test]
    fn request_body_includes_model_and_prompt() {
        let body = generator().request_body("analyze this");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "analyze this");
        assert_eq!(body["max_tokens"], 2048);
    }

    #[test]
    fn extract_content_from_completion() {
        let response = json!({
            "choices": [{"message": {"content": "{\"summary\": \"ok\"}"}}]
        });
        let content = HttpInsightGenerator::extract_content(&response).unwrap();
        assert_eq!(content, "{\"summary\": \"ok\"}");
    }

    #[test]
    fn extract_content_rejects_missing_choices() {
        let response = json!({"error": "rate limited"});
        let result = HttpInsightGenerator::extract_content(&response);
        assert!(matches!(result, Err(GeneratorError::ParseError(_))));
    }

    #[test]
    fn extract_content_rejects_non_string_content() {
        let response = json!({"choices": [{"message": {"content": 42}}]});
        assert!(HttpInsightGenerator::extract_content(&response).is_err());
    }
}
