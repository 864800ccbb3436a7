use thiserror::Error;

/// Errors from dashboard export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template compilation or evaluation failed.
    #[error("template error: {0}")]
    Template(String),

    /// The requested export format is not one this service produces.
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
}
