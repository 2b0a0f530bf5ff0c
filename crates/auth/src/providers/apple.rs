//! Sign in with Apple verification.
//!
//! Apple only hands native and web clients an identity token, so there is no
//! access-token path. The token's audience is the Services ID (web) or the
//! app's bundle ID (native), and either may be configured.

use async_trait::async_trait;
use jjmgmt_core::auth::{
    AuthError, AuthenticatedUser, IdentityVerifier, Provider, Result, SocialPayload,
};

use crate::config::AppleConfig;
use crate::id_token::{verify_id_token, IdTokenRequirements};
use crate::jwks::JwksCache;

/// Apple identity verifier.
pub struct AppleVerifier {
    config: AppleConfig,
    audiences: Vec<String>,
    keys: JwksCache,
}

impl AppleVerifier {
    pub fn new(config: AppleConfig, keys: JwksCache) -> Self {
        Self {
            audiences: config.audiences(),
            config,
            keys,
        }
    }
}

#[async_trait]
impl IdentityVerifier for AppleVerifier {
    async fn verify(&self, payload: &SocialPayload) -> Result<AuthenticatedUser> {
        if self.audiences.is_empty() {
            return Err(AuthError::config(
                "Set APPLE_SERVICE_ID or APPLE_BUNDLE_ID to verify Apple identity tokens",
            ));
        }

        let id_token = payload
            .id_token()
            .ok_or_else(|| AuthError::validation("Apple idToken is required"))?;

        let issuers = [self.config.issuer.clone()];
        let claims = verify_id_token(
            id_token,
            &self.keys,
            &IdTokenRequirements {
                keys_url: &self.config.keys_url,
                issuers: &issuers,
                audiences: &self.audiences,
            },
        )
        .await?;

        let user = claims.into_user(Provider::Apple, "Apple idToken is missing subject")?;

        // Apple only shares the user's name with the client, never in the token.
        Ok(AuthenticatedUser { name: None, ..user })
    }
}
