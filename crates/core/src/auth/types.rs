use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{calculate_expiry, session_ttl, AuthError};

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Apple,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Apple => write!(f, "apple"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "apple" => Ok(Self::Apple),
            other => Err(AuthError::validation(format!(
                "unsupported provider: {other}"
            ))),
        }
    }
}

/// Tokens a client obtained from a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl SocialPayload {
    pub fn with_id_token(token: impl Into<String>) -> Self {
        Self {
            id_token: Some(token.into()),
            access_token: None,
        }
    }

    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self {
            id_token: None,
            access_token: Some(token.into()),
        }
    }

    /// The ID token, if one was sent and it is not empty.
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref().filter(|t| !t.is_empty())
    }

    /// The access token, if one was sent and it is not empty.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Identity claim attested by a provider.
///
/// `provider_user_id` is the provider's `sub` and the only stable key for a
/// user; verifiers never build this value without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub provider: Provider,
    pub provider_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

impl AuthenticatedUser {
    pub fn new(provider: Provider, provider_user_id: impl Into<String>) -> Self {
        Self {
            provider,
            provider_user_id: provider_user_id.into(),
            email: None,
            name: None,
            email_verified: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email_verified(mut self, verified: bool) -> Self {
        self.email_verified = Some(verified);
        self
    }
}

/// Application role carried by a session. Every new session gets the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
        }
    }
}

/// Identity reconstructed from a verified session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(flatten)]
    pub user: AuthenticatedUser,
    pub role: Role,
}

/// Claim set embedded in a session credential.
///
/// `iat` and `exp` are Unix timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub sub: String,
    pub provider: Provider,
    pub provider_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for a session issued at `issued_at`, expiring [`session_ttl`] later.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the expiry cannot be represented,
    /// which only happens when the issuing clock is wildly wrong.
    pub fn new(
        user: &AuthenticatedUser,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> super::Result<Self> {
        let expires_at = calculate_expiry(issued_at, session_ttl()).ok_or_else(|| {
            AuthError::config(format!("session expiry out of range for {issued_at}"))
        })?;

        Ok(Self {
            sub: user.provider_user_id.clone(),
            provider: user.provider,
            provider_user_id: user.provider_user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            email_verified: user.email_verified,
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    pub fn into_session_user(self) -> SessionUser {
        SessionUser {
            user: AuthenticatedUser {
                provider: self.provider,
                provider_user_id: self.provider_user_id,
                email: self.email,
                name: self.name,
                email_verified: self.email_verified,
            },
            role: self.role,
        }
    }
}
