use std::sync::Arc;

use tracing::warn;

use glimpse_core::{ArticleSuggestion, parse_suggestion};
use glimpse_llm::InsightGenerator;

use crate::error::BlogError;

/// On-demand AI metadata suggestions for the article editor.
///
/// Unlike dashboard generation, an unparseable model reply is an error
/// here: there is nowhere sensible to store raw text, so the editor is
/// told the suggestion failed and keeps whatever the admin typed.
#[derive(Clone)]
pub struct SuggestionService {
    generator: Arc<dyn InsightGenerator>,
}

impl SuggestionService {
    pub fn new(generator: Arc<dyn InsightGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the model for title, summary, tags, and meta description for a
    /// draft's content.
    pub async fn suggest_metadata(&self, content: &str) -> Result<ArticleSuggestion, BlogError> {
        if content.trim().is_empty() {
            return Err(BlogError::EmptyDraft);
        }

        let raw = self.generator.suggest_article(content).await?;
        parse_suggestion(&raw).map_err(|e| {
            warn!(error = %e, "suggestion reply was not parseable");
            BlogError::Suggestion(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_llm::{FailingInsightGenerator, MockInsightGenerator};

    fn service(generator: MockInsightGenerator) -> SuggestionService {
        SuggestionService::new(Arc::new(generator))
    }

    #[tokio::test]
    async fn parses_well_formed_suggestion() {
        let svc = service(MockInsightGenerator::new());
        let suggestion = svc.suggest_metadata("We shipped the Q3 release.").await.unwrap();
        assert_eq!(suggestion.title, "Shipping the Q3 Release");
        assert_eq!(suggestion.tags.len(), 2);
        assert!(!suggestion.meta_description.is_empty());
    }

    #[tokio::test]
    async fn parses_fenced_suggestion() {
        let fenced = "```json\n{\"title\": \"T\", \"summary\": \"S\", \"tags\": [\"a\"], \"metaDescription\": \"M\"}\n```";
        let svc = service(MockInsightGenerator::new().with_suggestion_response(fenced));
        let suggestion = svc.suggest_metadata("draft").await.unwrap();
        assert_eq!(suggestion.title, "T");
    }

    #[tokio::test]
    async fn prose_reply_is_a_suggestion_error() {
        let svc = service(
            MockInsightGenerator::new().with_suggestion_response("Here are some ideas: ..."),
        );
        let err = svc.suggest_metadata("draft").await.unwrap_err();
        assert!(matches!(err, BlogError::Suggestion(_)));
    }

    #[tokio::test]
    async fn generator_failure_is_distinct_from_parse_failure() {
        let svc = SuggestionService::new(Arc::new(FailingInsightGenerator::new("offline")));
        let err = svc.suggest_metadata("draft").await.unwrap_err();
        assert!(matches!(err, BlogError::Generator(_)));
    }

    #[tokio::test]
    async fn empty_draft_is_rejected_without_a_model_call() {
        let generator = MockInsightGenerator::new();
        let svc = service(generator.clone());
        let err = svc.suggest_metadata("   ").await.unwrap_err();
        assert!(matches!(err, BlogError::EmptyDraft));
        assert_eq!(generator.suggestion_calls(), 0);
    }
}
