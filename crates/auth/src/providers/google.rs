//! Google sign-in verification.
//!
//! Mobile clients hand over either an ID token (verified locally against
//! Google's published keys) or an OAuth access token (exchanged for a profile
//! at Google's userinfo endpoint).

use async_trait::async_trait;
use jjmgmt_core::auth::{
    AuthError, AuthenticatedUser, IdentityVerifier, Provider, Result, SocialPayload,
};

use crate::config::GoogleConfig;
use crate::id_token::{verify_id_token, IdTokenRequirements, ProviderClaims};
use crate::jwks::JwksCache;

/// Google identity verifier.
pub struct GoogleVerifier {
    config: GoogleConfig,
    http_client: reqwest::Client,
    keys: JwksCache,
}

impl GoogleVerifier {
    pub fn new(config: GoogleConfig, http_client: reqwest::Client, keys: JwksCache) -> Self {
        Self {
            config,
            http_client,
            keys,
        }
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<AuthenticatedUser> {
        if self.config.client_ids.is_empty() {
            return Err(AuthError::config(
                "GOOGLE_CLIENT_ID is required to verify Google idToken",
            ));
        }

        let claims = verify_id_token(
            id_token,
            &self.keys,
            &IdTokenRequirements {
                keys_url: &self.config.certs_url,
                issuers: &self.config.issuers,
                audiences: &self.config.client_ids,
            },
        )
        .await?;

        claims.into_user(Provider::Google, "Google idToken is missing subject")
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<AuthenticatedUser> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Google userinfo request failed");
                AuthError::validation("could not reach Google userinfo endpoint")
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::validation(format!(
                "Google accessToken rejected with status {}",
                status.as_u16()
            )));
        }

        let profile: ProviderClaims = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Google userinfo response is not valid JSON");
            AuthError::validation("Google userinfo response is malformed")
        })?;

        profile.into_user(Provider::Google, "Google userinfo response missing subject")
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, payload: &SocialPayload) -> Result<AuthenticatedUser> {
        if let Some(id_token) = payload.id_token() {
            return self.verify_id_token(id_token).await;
        }

        if let Some(access_token) = payload.access_token() {
            return self.fetch_userinfo(access_token).await;
        }

        Err(AuthError::validation("Google token is required"))
    }
}
