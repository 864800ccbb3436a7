use async_trait::async_trait;

use crate::error::GeneratorError;

/// Everything the generator needs to describe one uploaded file.
#[derive(Debug, Clone)]
pub struct UploadPrompt {
    /// Base64-encoded file content.
    pub encoded_content: String,
    /// Original file name, for context in the prompt.
    pub file_name: String,
    /// Declared MIME type of the file.
    pub file_type: String,
}

impl UploadPrompt {
    pub fn new(
        encoded_content: impl Into<String>,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            encoded_content: encoded_content.into(),
            file_name: file_name.into(),
            file_type: file_type.into(),
        }
    }
}

/// Trait for generating dashboard and article content from a model.
///
/// Both methods return the model's reply verbatim. No shape is enforced
/// here: a conversational model may answer with fenced JSON, bare JSON, or
/// prose, and callers that need structure parse the text themselves and
/// decide what a failed parse means for them.
#[async_trait]
pub trait InsightGenerator: Send + Sync + std::fmt::Debug {
    /// Produce dashboard material (summary, insights, charts, metrics) for
    /// an uploaded file.
    async fn generate_dashboard(&self, prompt: &UploadPrompt) -> Result<String, GeneratorError>;

    /// Produce article metadata suggestions (title, summary, tags) for a
    /// draft's content.
    async fn suggest_article(&self, content: &str) -> Result<String, GeneratorError>;
}
