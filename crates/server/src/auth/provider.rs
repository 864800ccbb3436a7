use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use glimpse_core::OwnerId;

use super::role::Role;
use crate::config::AuthTokenConfig;

/// The principal resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: OwnerId,
    pub email: String,
    pub role: Role,
}

/// Resolves raw bearer tokens to principals.
///
/// The server ships a static, config-backed implementation; tests swap in
/// whatever answers "whose token is this".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Return the principal the token belongs to, or `None` if unknown.
    async fn authenticate(&self, token: &str) -> Option<AuthenticatedUser>;
}

/// Hash a raw bearer token to the lookup format (lowercase hex SHA-256).
pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
struct TokenEntry {
    token_hash: String,
    user: AuthenticatedUser,
}

/// Token table built once at startup from `[[auth.tokens]]` entries.
///
/// The config stores pre-computed SHA-256 hashes of the raw tokens, never
/// the tokens themselves.
#[derive(Debug)]
pub struct StaticTokenProvider {
    entries: Vec<TokenEntry>,
}

impl StaticTokenProvider {
    /// Build the provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry carries a role the server does not know.
    pub fn from_config(tokens: &[AuthTokenConfig]) -> Result<Self, String> {
        let mut entries = Vec::with_capacity(tokens.len());
        for t in tokens {
            let role = Role::from_str_loose(&t.role)
                .ok_or_else(|| format!("invalid role '{}' for token '{}'", t.role, t.id))?;
            entries.push(TokenEntry {
                token_hash: t.token_hash.to_lowercase(),
                user: AuthenticatedUser {
                    id: OwnerId::new(t.id.clone()),
                    email: t.email.clone(),
                    role,
                },
            });
        }
        Ok(Self { entries })
    }

    /// Number of configured tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (every request will be rejected).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn authenticate(&self, token: &str) -> Option<AuthenticatedUser> {
        let candidate = hash_token(token);
        // Constant-time compare, and the scan always covers the whole table.
        let mut matched: Option<&AuthenticatedUser> = None;
        for entry in &self.entries {
            if bool::from(entry.token_hash.as_bytes().ct_eq(candidate.as_bytes())) {
                matched = Some(&entry.user);
            }
        }
        matched.cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_config(id: &str, raw_token: &str, role: &str) -> AuthTokenConfig {
        AuthTokenConfig {
            token_hash: hash_token(raw_token),
            id: id.to_string(),
            email: format!("{id}@example.com"),
            role: role.to_string(),
        }
    }

    #[test]
    fn invalid_role_is_rejected_at_build_time() {
        let tokens = vec![token_config("u1", "secret", "superuser")];
        let err = StaticTokenProvider::from_config(&tokens).unwrap_err();
        assert!(err.contains("invalid role"));
        assert!(err.contains("superuser"));
    }

    #[tokio::test]
    async fn known_token_resolves_to_its_principal() {
        let tokens = vec![
            token_config("admin-1", "admin-secret", "admin"),
            token_config("member-1", "member-secret", "member"),
        ];
        let provider = StaticTokenProvider::from_config(&tokens).unwrap();

        let user = provider.authenticate("member-secret").await.unwrap();
        assert_eq!(user.id.as_str(), "member-1");
        assert_eq!(user.role, Role::Member);
        assert!(!user.role.is_admin());

        let admin = provider.authenticate("admin-secret").await.unwrap();
        assert!(admin.role.is_admin());
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let tokens = vec![token_config("u1", "secret", "member")];
        let provider = StaticTokenProvider::from_config(&tokens).unwrap();

        assert!(provider.authenticate("wrong").await.is_none());
        assert!(provider.authenticate("").await.is_none());
    }

    #[test]
    fn hash_token_is_lowercase_hex() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
