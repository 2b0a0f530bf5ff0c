use async_trait::async_trait;

use super::{AuthError, AuthenticatedUser, SocialPayload};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// A provider strategy that turns a client-supplied token into an identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify the payload against the provider's trust root.
    async fn verify(&self, payload: &SocialPayload) -> Result<AuthenticatedUser>;
}
