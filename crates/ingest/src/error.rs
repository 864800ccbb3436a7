use thiserror::Error;

use glimpse_llm::GeneratorError;
use glimpse_state::StateError;

/// Errors from the ingest pipeline's storage and generation steps.
///
/// Validation failures and exhausted quotas are not errors; they are
/// expected outcomes and carried on [`IngestOutcome`](crate::IngestOutcome)
/// directly.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading or writing application state failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// The generation call failed. An unparseable reply is not a failure;
    /// the pipeline stores it verbatim.
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),
}
