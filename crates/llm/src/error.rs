use thiserror::Error;

/// Errors that can occur while generating insights.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Response body did not have the expected completion shape.
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// API returned a non-success status.
    #[error("API error: {0}")]
    ApiError(String),

    /// Generator is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}
