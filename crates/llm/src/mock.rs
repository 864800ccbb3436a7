use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::GeneratorError;
use crate::generator::{InsightGenerator, UploadPrompt};

/// A mock generator that returns configurable canned responses.
///
/// Clones share the call counters, so a clone handed to the code under test
/// can be observed from the original. This is how tests assert that a code
/// path did (or did not) reach the model.
#[derive(Debug, Clone)]
pub struct MockInsightGenerator {
    dashboard_response: String,
    suggestion_response: String,
    dashboard_calls: Arc<AtomicUsize>,
    suggestion_calls: Arc<AtomicUsize>,
}

impl MockInsightGenerator {
    /// Create a mock that replies with well-formed JSON for both methods.
    pub fn new() -> Self {
        Self {
            dashboard_response: r#"{
                "summary": "Monthly sales with a steady upward trend.",
                "insights": ["Revenue grew 12% month over month."],
                "charts": [
                    {
                        "type": "bar",
                        "title": "Revenue by month",
                        "data": [{"name": "Jan", "value": 120}, {"name": "Feb", "value": 135}],
                        "config": {}
                    }
                ],
                "metrics": [{"name": "Total revenue", "value": "255", "change": "+12%"}]
            }"#
            .to_string(),
            suggestion_response: r#"{
                "title": "Shipping the Q3 Release",
                "summary": "What changed in Q3 and why it matters.",
                "tags": ["release", "engineering"],
                "metaDescription": "A tour of the Q3 release."
            }"#
            .to_string(),
            dashboard_calls: Arc::new(AtomicUsize::new(0)),
            suggestion_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the canned dashboard reply (need not be JSON).
    #[must_use]
    pub fn with_dashboard_response(mut self, response: impl Into<String>) -> Self {
        self.dashboard_response = response.into();
        self
    }

    /// Replace the canned suggestion reply (need not be JSON).
    #[must_use]
    pub fn with_suggestion_response(mut self, response: impl Into<String>) -> Self {
        self.suggestion_response = response.into();
        self
    }

    /// Number of `generate_dashboard` calls made so far.
    pub fn dashboard_calls(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }

    /// Number of `suggest_article` calls made so far.
    pub fn suggestion_calls(&self) -> usize {
        self.suggestion_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockInsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightGenerator for MockInsightGenerator {
    async fn generate_dashboard(&self, _upload: &UploadPrompt) -> Result<String, GeneratorError> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dashboard_response.clone())
    }

    async fn suggest_article(&self, _content: &str) -> Result<String, GeneratorError> {
        self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.suggestion_response.clone())
    }
}

/// A mock generator that always returns an error.
#[derive(Debug, Clone)]
pub struct FailingInsightGenerator {
    error_message: String,
}

impl FailingInsightGenerator {
    /// Create a failing generator with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
        }
    }
}

#[async_trait]
impl InsightGenerator for FailingInsightGenerator {
    async fn generate_dashboard(&self, _upload: &UploadPrompt) -> Result<String, GeneratorError> {
        Err(GeneratorError::ApiError(self.error_message.clone()))
    }

    async fn suggest_article(&self, _content: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::ApiError(self.error_message.clone()))
    }
}
