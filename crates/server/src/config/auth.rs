use serde::Deserialize;

/// Authentication configuration.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// Static bearer tokens the server accepts.
    #[serde(default)]
    pub tokens: Vec<AuthTokenConfig>,
}

/// A principal that authenticates via a static bearer token.
#[derive(Debug, Deserialize)]
pub struct AuthTokenConfig {
    /// SHA-256 hash of the raw token, lowercase hex.
    pub token_hash: String,
    /// Stable user identifier; dashboards and quotas are scoped to it.
    pub id: String,
    /// Contact address, informational only.
    #[serde(default)]
    pub email: String,
    /// Role: `"admin"` or `"member"`.
    pub role: String,
}
