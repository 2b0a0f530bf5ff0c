use thiserror::Error;

use super::SocialPayload;

/// Why a social payload was rejected before reaching a verifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("either idToken or accessToken is required")]
    MissingToken,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl PayloadError {
    /// Name of the offending field, if the error concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingToken => None,
            Self::EmptyField(field) => Some(field),
        }
    }
}

/// Validates the shape of a social sign-in payload.
///
/// At least one token must be present and every present token must be a
/// non-empty string. Whether a provider can use the token it was given is
/// decided by the verifier.
///
/// # Examples
///
/// ```
/// use jjmgmt_core::auth::{validate_social_payload, SocialPayload};
///
/// assert!(validate_social_payload(&SocialPayload::with_id_token("t")).is_ok());
/// assert!(validate_social_payload(&SocialPayload::default()).is_err());
/// ```
pub fn validate_social_payload(payload: &SocialPayload) -> Result<(), PayloadError> {
    if payload.id_token.as_deref() == Some("") {
        return Err(PayloadError::EmptyField("idToken"));
    }

    if payload.access_token.as_deref() == Some("") {
        return Err(PayloadError::EmptyField("accessToken"));
    }

    if payload.id_token.is_none() && payload.access_token.is_none() {
        return Err(PayloadError::MissingToken);
    }

    Ok(())
}
