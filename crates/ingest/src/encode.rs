use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// A file body prepared for storage and prompt embedding.
#[derive(Debug, Clone)]
pub struct EncodedFile {
    /// Standard base64 (padded) of the raw bytes.
    pub content: String,
    /// Lowercase hex SHA-256 of the raw bytes.
    pub checksum_sha256: String,
    /// Raw size in bytes, measured before encoding.
    pub size_bytes: u64,
}

/// Encode a file body in one pass.
///
/// The whole body is held in memory; the intake size cap keeps that bounded.
#[must_use]
pub fn encode_file(data: &[u8]) -> EncodedFile {
    EncodedFile {
        content: STANDARD.encode(data),
        checksum_sha256: hex::encode(Sha256::digest(data)),
        size_bytes: data.len() as u64,
    }
}
