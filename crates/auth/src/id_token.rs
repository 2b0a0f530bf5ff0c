//! Verification of provider-issued ID tokens.

use jjmgmt_core::auth::{
    audience_matches, parse_boolean, AuthError, AuthenticatedUser, Provider, Result,
};
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use serde_json::Value;

use crate::jwks::JwksCache;

/// Trust settings for one provider's ID tokens.
pub(crate) struct IdTokenRequirements<'a> {
    pub keys_url: &'a str,
    pub issuers: &'a [String],
    pub audiences: &'a [String],
}

/// Identity claims as a provider sends them, either in an ID token or from a
/// userinfo endpoint. Values are kept raw because providers disagree on types.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProviderClaims {
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email_verified: Option<Value>,
    #[serde(default)]
    pub aud: Option<Value>,
}

impl ProviderClaims {
    /// Build an identity claim, failing when the subject is absent.
    pub fn into_user(
        self,
        provider: Provider,
        missing_subject: &str,
    ) -> Result<AuthenticatedUser> {
        let provider_user_id =
            string_claim(self.sub).ok_or_else(|| AuthError::validation(missing_subject))?;

        Ok(AuthenticatedUser {
            provider,
            provider_user_id,
            email: string_claim(self.email),
            name: string_claim(self.name),
            email_verified: self.email_verified.as_ref().and_then(parse_boolean),
        })
    }
}

fn string_claim(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Verify an RS256 ID token against the provider's published keys.
///
/// Checks signature, expiry, issuer and audience. Every failure, including a
/// key set that cannot be fetched, is a validation error.
pub(crate) async fn verify_id_token(
    token: &str,
    keys: &JwksCache,
    requirements: &IdTokenRequirements<'_>,
) -> Result<ProviderClaims> {
    let header = decode_header(token)
        .map_err(|e| AuthError::validation(format!("malformed id token: {e}")))?;

    if header.alg != Algorithm::RS256 {
        return Err(AuthError::validation(format!(
            "unsupported id token algorithm: {:?}",
            header.alg
        )));
    }

    let kid = header
        .kid
        .as_deref()
        .ok_or_else(|| AuthError::validation("id token has no key id"))?;

    let key = keys.decoding_key(requirements.keys_url, kid).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(requirements.issuers);
    validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    // Audience is matched below so a token may carry any accepted client id.
    validation.validate_aud = false;

    let claims = decode::<ProviderClaims>(token, &key, &validation)
        .map_err(|e| AuthError::validation(format!("id token rejected: {e}")))?
        .claims;

    let audience_ok = claims
        .aud
        .as_ref()
        .is_some_and(|aud| audience_matches(aud, requirements.audiences));
    if !audience_ok {
        return Err(AuthError::validation("id token audience mismatch"));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_idp::{id_token_claims, MockIdp, PRIMARY_KEY, SECONDARY_KEY};
    use serde_json::json;
    use std::time::Duration;

    const ISSUER: &str = "https://issuer.example";
    const AUDIENCE: &str = "com.example.app";

    async fn verify(idp: &MockIdp, token: &str) -> Result<ProviderClaims> {
        let cache = JwksCache::new(reqwest::Client::new(), Duration::from_secs(60));
        let jwks_url = idp.jwks_url();
        let issuers = vec![ISSUER.to_string()];
        let audiences = vec![AUDIENCE.to_string(), "com.example.web".to_string()];
        verify_id_token(
            token,
            &cache,
            &IdTokenRequirements {
                keys_url: &jwks_url,
                issuers: &issuers,
                audiences: &audiences,
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_accepts_valid_token() {
        let idp = MockIdp::start().await.unwrap();
        let token = PRIMARY_KEY
            .sign(&id_token_claims(ISSUER, AUDIENCE, "user-1"))
            .unwrap();

        let claims = verify(&idp, &token).await.unwrap();
        assert_eq!(claims.sub, Some(json!("user-1")));
    }

    #[tokio::test]
    async fn test_accepts_any_configured_audience() {
        let idp = MockIdp::start().await.unwrap();
        let token = PRIMARY_KEY
            .sign(&id_token_claims(ISSUER, "com.example.web", "user-1"))
            .unwrap();

        assert!(verify(&idp, &token).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_wrong_audience() {
        let idp = MockIdp::start().await.unwrap();
        let token = PRIMARY_KEY
            .sign(&id_token_claims(ISSUER, "someone.else", "user-1"))
            .unwrap();

        let err = verify(&idp, &token).await.err().unwrap();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_rejects_wrong_issuer() {
        let idp = MockIdp::start().await.unwrap();
        let token = PRIMARY_KEY
            .sign(&id_token_claims("https://evil.example", AUDIENCE, "user-1"))
            .unwrap();

        let err = verify(&idp, &token).await.err().unwrap();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_rejects_forged_signature() {
        let idp = MockIdp::start().await.unwrap();
        // Signed with an unpublished key but claiming the published kid.
        let token = SECONDARY_KEY
            .sign_as(PRIMARY_KEY.kid, &id_token_claims(ISSUER, AUDIENCE, "user-1"))
            .unwrap();

        let err = verify(&idp, &token).await.err().unwrap();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_rejects_expired_token() {
        let idp = MockIdp::start().await.unwrap();
        let mut claims = id_token_claims(ISSUER, AUDIENCE, "user-1");
        claims["exp"] = json!(chrono::Utc::now().timestamp() - 3600);
        let token = PRIMARY_KEY.sign(&claims).unwrap();

        let err = verify(&idp, &token).await.err().unwrap();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        let idp = MockIdp::start().await.unwrap();
        let err = verify(&idp, "not-a-jwt").await.err().unwrap();
        assert!(err.is_validation());
        assert_eq!(idp.jwks_requests(), 0);
    }

    #[test]
    fn test_into_user_requires_subject() {
        let claims = ProviderClaims {
            email: Some(json!("a@b.com")),
            ..ProviderClaims::default()
        };
        let err = claims
            .into_user(Provider::Google, "missing subject")
            .unwrap_err();
        assert_eq!(err, AuthError::validation("missing subject"));
    }

    #[test]
    fn test_into_user_ignores_non_string_values() {
        let claims = ProviderClaims {
            sub: Some(json!("user-1")),
            email: Some(json!(42)),
            name: Some(json!("Ada")),
            email_verified: Some(json!("true")),
            aud: None,
        };
        let user = claims.into_user(Provider::Apple, "missing subject").unwrap();
        assert_eq!(user.provider_user_id, "user-1");
        assert_eq!(user.email, None);
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.email_verified, Some(true));
    }
}
