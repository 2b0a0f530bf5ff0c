//! Social sign-in for jj-mgmt.
//!
//! This crate provides:
//! - Google and Apple token verification against the providers' published keys
//! - Stateless, HMAC-signed session tokens
//! - Axum routes and extractors for the sign-in flow

mod config;
mod error;
mod extractors;
mod handlers;
mod id_token;
mod jwks;
mod providers;
mod sessions;
mod state;

pub use config::{AppleConfig, AuthConfig, GoogleConfig, SessionConfig};
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use handlers::{auth_routes, sign_in, MeResponse, SignInResponse};
pub use jwks::JwksCache;
pub use providers::{AppleVerifier, GoogleVerifier};
pub use sessions::{SessionIssuer, SessionVerifier};
pub use state::AuthState;

#[cfg(any(test, feature = "mock"))]
pub mod mock_idp;
