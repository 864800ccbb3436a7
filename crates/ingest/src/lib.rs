pub mod artifacts;
pub mod encode;
pub mod error;
pub mod intake;
pub mod metrics;
pub mod outcome;
pub mod pipeline;
pub mod quota;

pub use artifacts::ArtifactRepository;
pub use encode::{EncodedFile, encode_file};
pub use error::IngestError;
pub use intake::{
    ALLOWED_TYPES, INVALID_NAME_CHARS, IncomingFile, MAX_FILE_BYTES, RejectionReason, validate,
};
pub use metrics::{IngestMetrics, IngestMetricsSnapshot};
pub use outcome::IngestOutcome;
pub use pipeline::{DEFAULT_MAX_CONCURRENT, IngestPipeline};
pub use quota::{QuotaDecision, QuotaGate};
