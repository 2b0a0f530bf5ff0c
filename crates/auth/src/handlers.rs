//! HTTP handlers for auth routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use jjmgmt_core::auth::{
    validate_social_payload, AuthenticatedUser, Provider, SessionUser, SocialPayload,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::extractors::CurrentUser;
use crate::AuthState;

/// Successful sign-in: the app session token and the verified identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: SessionUser,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `POST /auth/social/{provider}` - Exchange a Google or Apple token for a session
/// - `GET /auth/me` - Get the user behind the bearer session token
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/social/{provider}", post(social_sign_in))
        .route("/auth/me", get(me))
}

async fn social_sign_in(
    State(state): State<AuthState>,
    Path(provider): Path<String>,
    payload: Result<Json<SocialPayload>, JsonRejection>,
) -> Result<Json<SignInResponse>, AuthError> {
    let provider = provider
        .parse::<Provider>()
        .map_err(|_| AuthError::UnknownProvider(provider))?;
    let Json(payload) = payload.map_err(invalid_body)?;
    sign_in(&state, provider, &payload).await.map(Json)
}

fn invalid_body(rejection: JsonRejection) -> AuthError {
    AuthError::InvalidPayload(rejection.body_text())
}

/// Verify a social payload with the provider's verifier and issue a session.
///
/// # Errors
///
/// Returns `InvalidPayload` if the payload carries no usable token, and the
/// verifier's or issuer's error otherwise. No token is issued on failure.
pub async fn sign_in(
    state: &AuthState,
    provider: Provider,
    payload: &SocialPayload,
) -> Result<SignInResponse, AuthError> {
    validate_social_payload(payload)?;

    let user = state.verifier(provider).verify(payload).await?;
    let token = state.issuer.issue(&user)?;

    tracing::info!(
        provider = %user.provider,
        provider_user_id = %user.provider_user_id,
        "Issued app session"
    );

    Ok(SignInResponse { token, user })
}

async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}
