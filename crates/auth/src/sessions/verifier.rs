use chrono::{DateTime, Utc};
use jjmgmt_core::auth::{is_session_expired, AuthError, Result, SessionClaims, SessionUser};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::config::SessionConfig;

/// Validates session tokens minted by [`SessionIssuer`](super::SessionIssuer).
///
/// Verification is pure: it reads no state and has no side effects, so the
/// same token gives the same answer until it expires.
pub struct SessionVerifier {
    key: Option<DecodingKey>,
}

impl SessionVerifier {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            key: config
                .secret
                .as_ref()
                .map(|secret| DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Verify a session token against the current time.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no signing secret is configured, and a
    /// validation error if the token is malformed, tampered with, or expired.
    pub fn verify(&self, token: &str) -> Result<SessionUser> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a session token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionUser> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| {
                AuthError::config("APP_JWT_SECRET is required to verify app sessions")
            })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);
        // Expiry is checked below against `now`, without leeway.
        validation.validate_exp = false;

        let claims = decode::<SessionClaims>(token, key, &validation)
            .map_err(|e| AuthError::validation(format!("invalid session token: {e}")))?
            .claims;

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AuthError::validation("session token has an invalid expiry"))?;

        if is_session_expired(expires_at, now) {
            return Err(AuthError::validation("session token expired"));
        }

        Ok(claims.into_session_user())
    }
}
