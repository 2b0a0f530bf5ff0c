//! Mock IdP server for testing.
//!
//! Simulates the two provider endpoints the verifiers call:
//! - `GET /jwks` - the provider's published signing keys, or a plain-text
//!   body after [`MockIdp::serve_malformed_keys`]
//! - `GET /userinfo` - profile lookup by bearer access token

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use jjmgmt_core::auth::bearer_token;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

use super::keys::{MockKey, PRIMARY_KEY};

#[derive(Clone, Default)]
struct MockIdpState {
    keys: Arc<RwLock<Vec<Value>>>,
    profiles: Arc<RwLock<HashMap<String, Value>>>,
    jwks_requests: Arc<AtomicUsize>,
    malformed_keys: Arc<AtomicBool>,
}

/// Mock IdP server listening on an ephemeral local port.
pub struct MockIdp {
    addr: SocketAddr,
    state: MockIdpState,
}

impl MockIdp {
    /// Start the server in the background, publishing [`PRIMARY_KEY`].
    pub async fn start() -> Result<Self, std::io::Error> {
        let state = MockIdpState::default();
        state.keys.write().await.push(PRIMARY_KEY.jwk());

        let app = Router::new()
            .route("/jwks", get(jwks))
            .route("/userinfo", get(userinfo))
            .with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        tracing::debug!("Mock IdP server listening on http://{}", addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock IdP server stopped");
            }
        });

        Ok(Self { addr, state })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn jwks_url(&self) -> String {
        self.url("/jwks")
    }

    pub fn userinfo_url(&self) -> String {
        self.url("/userinfo")
    }

    /// Number of key-set requests served so far.
    pub fn jwks_requests(&self) -> usize {
        self.state.jwks_requests.load(Ordering::SeqCst)
    }

    /// Replace the published key set.
    pub async fn publish_keys(&self, keys: &[MockKey]) {
        *self.state.keys.write().await = keys.iter().map(MockKey::jwk).collect();
    }

    /// Make `/jwks` answer 200 with a body that is not a key set.
    pub fn serve_malformed_keys(&self) {
        self.state.malformed_keys.store(true, Ordering::SeqCst);
    }

    /// Make `/userinfo` answer `profile` for this access token.
    pub async fn register_access_token(&self, token: &str, profile: Value) {
        self.state
            .profiles
            .write()
            .await
            .insert(token.to_string(), profile);
    }
}

async fn jwks(State(state): State<MockIdpState>) -> Response {
    state.jwks_requests.fetch_add(1, Ordering::SeqCst);
    if state.malformed_keys.load(Ordering::SeqCst) {
        return ([(CONTENT_TYPE, "text/plain")], "not a key set").into_response();
    }

    let keys = state.keys.read().await.clone();
    Json(json!({ "keys": keys })).into_response()
}

async fn userinfo(State(state): State<MockIdpState>, headers: HeaderMap) -> Response {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);

    let profiles = state.profiles.read().await;
    match token.and_then(|t| profiles.get(t)) {
        Some(profile) => Json(profile.clone()).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_token" })),
        )
            .into_response(),
    }
}
