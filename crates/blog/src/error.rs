use thiserror::Error;

use glimpse_llm::GeneratorError;
use glimpse_state::StateError;

/// Errors from article management and suggestion.
#[derive(Debug, Error)]
pub enum BlogError {
    /// Reading or writing application state failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// No article exists with the given id.
    #[error("article not found: {0}")]
    NotFound(String),

    /// The suggestion call itself failed.
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The model replied, but not with parseable suggestion JSON. This is
    /// the one place an unparseable reply is surfaced as an error instead
    /// of being stored.
    #[error("suggestion could not be parsed: {0}")]
    Suggestion(String),

    /// A suggestion was requested for an empty draft.
    #[error("draft content is empty")]
    EmptyDraft,
}
