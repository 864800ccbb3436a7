use bytes::Bytes;
use thiserror::Error;

/// Largest accepted upload: 2 MiB of raw file content.
pub const MAX_FILE_BYTES: usize = 2 * 1024 * 1024;

/// MIME types accepted for analysis.
pub const ALLOWED_TYPES: &[&str] = &[
    "text/csv",
    "application/pdf",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "application/json",
];

/// Characters that are never accepted in an uploaded file name.
pub const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// One uploaded file as received from the transport layer.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// File name as supplied by the client.
    pub name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file content.
    pub data: Bytes,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// Why an uploaded file was turned away before any processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// MIME type is not on the allow-list.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Zero-length file content.
    #[error("file is empty")]
    Empty,

    /// Raw content exceeds [`MAX_FILE_BYTES`].
    #[error("file is larger than the 2 MiB limit ({size} bytes)")]
    TooLarge { size: usize },

    /// File name is missing entirely.
    #[error("file name is empty")]
    MissingName,

    /// File name contains one of [`INVALID_NAME_CHARS`].
    #[error("file name contains invalid characters: {0}")]
    InvalidName(String),
}

/// Check an incoming file against the intake rules.
///
/// Declared MIME type first, then content, then name. A rejected file never
/// reaches the quota gate or the generator.
pub fn validate(file: &IncomingFile) -> Result<(), RejectionReason> {
    if !ALLOWED_TYPES.contains(&file.content_type.as_str()) {
        return Err(RejectionReason::UnsupportedType(file.content_type.clone()));
    }
    if file.data.is_empty() {
        return Err(RejectionReason::Empty);
    }
    if file.data.len() > MAX_FILE_BYTES {
        return Err(RejectionReason::TooLarge {
            size: file.data.len(),
        });
    }
    if file.name.trim().is_empty() {
        return Err(RejectionReason::MissingName);
    }
    if file.name.contains(INVALID_NAME_CHARS) {
        return Err(RejectionReason::InvalidName(file.name.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, data: &'static [u8]) -> IncomingFile {
        IncomingFile::new(name, content_type, Bytes::from_static(data))
    }

    #[test]
    fn accepts_every_allowed_type() {
        for content_type in ALLOWED_TYPES {
            let f = file("report.bin", content_type, b"data");
            assert!(validate(&f).is_ok(), "{content_type} should be accepted");
        }
    }

    #[test]
    fn rejects_disallowed_type() {
        let f = file("movie.mp4", "video/mp4", b"data");
        assert_eq!(
            validate(&f),
            Err(RejectionReason::UnsupportedType("video/mp4".into()))
        );
    }

    #[test]
    fn rejects_empty_file() {
        let f = file("empty.csv", "text/csv", b"");
        assert_eq!(validate(&f), Err(RejectionReason::Empty));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = IncomingFile::new("big.csv", "text/csv", Bytes::from(vec![b'x'; MAX_FILE_BYTES]));
        assert!(validate(&at_limit).is_ok());

        let over = IncomingFile::new(
            "bigger.csv",
            "text/csv",
            Bytes::from(vec![b'x'; MAX_FILE_BYTES + 1]),
        );
        assert_eq!(
            validate(&over),
            Err(RejectionReason::TooLarge {
                size: MAX_FILE_BYTES + 1
            })
        );
    }

    #[test]
    fn rejects_blank_name() {
        let f = file("   ", "text/csv", b"data");
        assert_eq!(validate(&f), Err(RejectionReason::MissingName));
    }

    #[test]
    fn rejects_each_invalid_name_character() {
        for c in INVALID_NAME_CHARS {
            let name = format!("report{c}.csv");
            let f = IncomingFile::new(&name, "text/csv", Bytes::from_static(b"data"));
            assert_eq!(
                validate(&f),
                Err(RejectionReason::InvalidName(name.clone())),
                "{c:?} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_ordinary_names() {
        for name in ["sales_q3.csv", "report (final).pdf", "übersicht.xlsx", "2026-01 summary.txt"] {
            let f = IncomingFile::new(name, "text/plain", Bytes::from_static(b"data"));
            assert!(validate(&f).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn type_check_runs_before_content_checks() {
        let f = file("x.csv", "image/png", b"");
        assert!(matches!(
            validate(&f),
            Err(RejectionReason::UnsupportedType(_))
        ));
    }
}
