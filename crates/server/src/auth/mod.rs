pub mod middleware;
pub mod provider;
pub mod role;

pub use middleware::{require_admin, require_user};
pub use provider::{AuthenticatedUser, IdentityProvider, StaticTokenProvider, hash_token};
pub use role::Role;
