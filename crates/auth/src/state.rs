//! Application state for auth.

use std::sync::Arc;

use jjmgmt_core::auth::{IdentityVerifier, Provider};

use crate::config::{AuthConfig, SessionConfig};
use crate::error::AuthError;
use crate::jwks::JwksCache;
use crate::providers::{AppleVerifier, GoogleVerifier};
use crate::sessions::{SessionIssuer, SessionVerifier};

/// Shared state for auth handlers.
///
/// Nothing in here is mutable per request apart from the key-set cache, so
/// clones are cheap and can be handed to every handler.
#[derive(Clone)]
pub struct AuthState {
    google: Arc<dyn IdentityVerifier>,
    apple: Arc<dyn IdentityVerifier>,
    pub issuer: Arc<SessionIssuer>,
    pub sessions: Arc<SessionVerifier>,
}

impl AuthState {
    /// Creates the state with the real Google and Apple verifiers.
    ///
    /// Both verifiers share one HTTP client and one key-set cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let keys = JwksCache::new(http.clone(), config.jwks_cache_ttl)
            .with_cooldown(config.jwks_refresh_cooldown);

        let google = GoogleVerifier::new(config.google.clone(), http, keys.clone());
        let apple = AppleVerifier::new(config.apple.clone(), keys);

        Ok(Self::with_verifiers(
            Arc::new(google),
            Arc::new(apple),
            &config.session,
        ))
    }

    /// Creates the state around the given verifiers.
    pub fn with_verifiers(
        google: Arc<dyn IdentityVerifier>,
        apple: Arc<dyn IdentityVerifier>,
        session: &SessionConfig,
    ) -> Self {
        Self {
            google,
            apple,
            issuer: Arc::new(SessionIssuer::new(session)),
            sessions: Arc::new(SessionVerifier::new(session)),
        }
    }

    /// Gets the verifier for the given provider.
    pub fn verifier(&self, provider: Provider) -> &dyn IdentityVerifier {
        match provider {
            Provider::Google => self.google.as_ref(),
            Provider::Apple => self.apple.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jjmgmt_core::auth::SocialPayload;

    #[tokio::test]
    async fn test_apple_route_uses_apple_verifier() {
        let state = AuthState::new(&AuthConfig::default()).unwrap();
        let payload = SocialPayload::with_id_token("sample-id-token");

        // Only the Apple verifier requires an audience before verifying.
        let err = state
            .verifier(Provider::Apple)
            .verify(&payload)
            .await
            .unwrap_err();
        assert!(err.is_config());
    }
}
