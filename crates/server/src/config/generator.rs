use serde::Deserialize;

/// Configuration for the insight generator behind uploads and article
/// suggestions.
///
/// When disabled, the server wires in a canned generator so the rest of
/// the pipeline stays usable without an API key.
#[derive(Debug, Deserialize)]
pub struct GeneratorServerConfig {
    /// Whether the HTTP generator is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// OpenAI-compatible API endpoint.
    #[serde(default = "default_generator_endpoint")]
    pub endpoint: String,
    /// Model to use.
    #[serde(default = "default_generator_model")]
    pub model: String,
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Temperature for sampling.
    pub temperature: Option<f64>,
    /// Maximum tokens in the response.
    pub max_tokens: Option<u32>,
}

impl Default for GeneratorServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_generator_endpoint(),
            model: default_generator_model(),
            api_key: String::new(),
            timeout_seconds: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_generator_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_owned()
}

fn default_generator_model() -> String {
    "gpt-4o-mini".to_owned()
}
