use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jjmgmt_core::auth::PayloadError;
use serde_json::json;
use thiserror::Error;

/// Auth errors for the jjmgmt_auth crate.
///
/// This wraps the core `AuthError` and adds the failures that only exist at
/// the HTTP edge.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (configuration or validation)
    #[error(transparent)]
    Core(#[from] jjmgmt_core::auth::AuthError),

    /// Request body could not be parsed or failed shape validation
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Sign-in path names a provider that is not supported
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// No usable `Authorization: Bearer` header
    #[error("missing bearer token")]
    MissingBearer,

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl From<PayloadError> for AuthError {
    fn from(err: PayloadError) -> Self {
        AuthError::InvalidPayload(err.to_string())
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        use jjmgmt_core::auth::AuthError as CoreError;

        match self {
            AuthError::Core(CoreError::Validation(_)) | AuthError::MissingBearer => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Core(CoreError::Config(_)) | AuthError::Http(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AuthError::UnknownProvider(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use jjmgmt_core::auth::AuthError as CoreError;

        let status = self.status_code();
        let body = match &self {
            AuthError::Core(CoreError::Validation(reason)) => {
                tracing::info!(%reason, "Authentication rejected");
                json!({ "error": "Authentication failed" })
            }
            AuthError::MissingBearer => json!({ "error": "Missing bearer token" }),
            AuthError::UnknownProvider(_) => json!({ "error": "Unknown provider" }),
            AuthError::InvalidPayload(details) => {
                json!({ "error": "Invalid payload", "details": details })
            }
            AuthError::Core(CoreError::Config(_)) | AuthError::Http(_) => {
                tracing::error!("Auth error: {}", self);
                json!({ "error": "Server configuration error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
