use glimpse_core::{DashboardArtifact, UploadQuota};

use crate::error::IngestError;
use crate::intake::RejectionReason;

/// Result of ingesting one uploaded file.
///
/// A batch upload yields one outcome per file, in input order; one file
/// failing never aborts the others.
#[derive(Debug)]
pub enum IngestOutcome {
    /// The file was analyzed and a dashboard artifact persisted.
    Created { artifact: Box<DashboardArtifact> },

    /// The file failed intake validation. No quota was consumed and the
    /// generator was not called.
    Rejected {
        file_name: String,
        reason: RejectionReason,
    },

    /// The day's upload allowance is exhausted. The generator was not
    /// called.
    QuotaExceeded {
        file_name: String,
        quota: UploadQuota,
    },

    /// A downstream step failed after validation. The reserved quota slot
    /// was returned.
    Failed {
        file_name: String,
        error: IngestError,
    },
}

impl IngestOutcome {
    /// Name of the file this outcome is for.
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Created { artifact } => &artifact.file_name,
            Self::Rejected { file_name, .. }
            | Self::QuotaExceeded { file_name, .. }
            | Self::Failed { file_name, .. } => file_name,
        }
    }

    /// Whether the file produced an artifact.
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}
