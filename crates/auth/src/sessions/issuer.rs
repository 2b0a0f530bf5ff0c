use chrono::{DateTime, Utc};
use jjmgmt_core::auth::{AuthError, AuthenticatedUser, Result, Role, SessionClaims};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::config::SessionConfig;

/// Mints session tokens for verified identities.
pub struct SessionIssuer {
    key: Option<EncodingKey>,
}

impl SessionIssuer {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            key: config
                .secret
                .as_ref()
                .map(|secret| EncodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Issue a session token valid from now.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no signing secret is configured.
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a session token as if the current time were `now`.
    pub fn issue_at(&self, user: &AuthenticatedUser, now: DateTime<Utc>) -> Result<String> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| AuthError::config("APP_JWT_SECRET is required to issue app sessions"))?;

        let claims = SessionClaims::new(user, Role::default(), now)?;

        encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AuthError::config(format!("failed to sign session token: {e}")))
    }
}
