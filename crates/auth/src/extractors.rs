//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jjmgmt_core::auth::{bearer_token, SessionUser};

use crate::error::AuthError;
use crate::AuthState;

/// Extractor for the user behind an `Authorization: Bearer` session token.
///
/// Rejects with 401 when the header is missing or the token does not verify.
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::MissingBearer)?;

        let user = auth_state.sessions.verify(token)?;

        Ok(CurrentUser(user))
    }
}
