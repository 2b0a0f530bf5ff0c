//! Provider signing keys, fetched on demand and cached per key-set URL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jjmgmt_core::auth::{AuthError, Result};
use jsonwebtoken::{
    jwk::{Jwk, JwkSet},
    DecodingKey,
};
use tokio::sync::{Mutex, RwLock};

const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

struct CachedKeySet {
    keys: JwkSet,
    fetched_at: Instant,
}

enum Lookup {
    Found(Jwk),
    Unknown,
    Refresh,
}

/// Cache of provider JSON Web Key Sets.
///
/// A cached set is reused until it is older than the TTL. A `kid` missing from
/// the cached set triggers a fresh fetch, so key rotation at the provider is
/// picked up without waiting for the TTL. That refetch happens at most once
/// per cooldown, and only one fetch is in flight at a time, so tokens with
/// made-up `kid`s cannot drive traffic to the provider.
#[derive(Clone)]
pub struct JwksCache {
    http: reqwest::Client,
    ttl: Duration,
    cooldown: Duration,
    sets: Arc<RwLock<HashMap<String, CachedKeySet>>>,
    refresh: Arc<Mutex<()>>,
}

impl JwksCache {
    pub fn new(http: reqwest::Client, ttl: Duration) -> Self {
        Self {
            http,
            ttl,
            cooldown: DEFAULT_REFRESH_COOLDOWN,
            sets: Arc::new(RwLock::new(HashMap::new())),
            refresh: Arc::new(Mutex::new(())),
        }
    }

    /// Override how long an unknown `kid` is answered from the cached set.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Resolve the verification key for `kid` from the key set at `url`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the key set cannot be fetched or parsed,
    /// or if no key in the current set has the requested `kid`.
    pub async fn decoding_key(&self, url: &str, kid: &str) -> Result<DecodingKey> {
        match self.lookup(url, kid).await {
            Lookup::Found(jwk) => return to_decoding_key(&jwk),
            Lookup::Unknown => return Err(unknown_kid(url, kid)),
            Lookup::Refresh => {}
        }

        let _refresh = self.refresh.lock().await;

        // Another caller may have refreshed while we waited.
        match self.lookup(url, kid).await {
            Lookup::Found(jwk) => return to_decoding_key(&jwk),
            Lookup::Unknown => return Err(unknown_kid(url, kid)),
            Lookup::Refresh => {}
        }

        let keys = self.fetch(url).await?;
        let jwk = keys.find(kid).cloned();

        self.sets.write().await.insert(
            url.to_string(),
            CachedKeySet {
                keys,
                fetched_at: Instant::now(),
            },
        );

        match jwk {
            Some(jwk) => to_decoding_key(&jwk),
            None => Err(unknown_kid(url, kid)),
        }
    }

    async fn lookup(&self, url: &str, kid: &str) -> Lookup {
        let sets = self.sets.read().await;
        let Some(cached) = sets.get(url) else {
            return Lookup::Refresh;
        };

        let age = cached.fetched_at.elapsed();
        if age >= self.ttl {
            return Lookup::Refresh;
        }

        match cached.keys.find(kid) {
            Some(jwk) => Lookup::Found(jwk.clone()),
            None if age < self.cooldown => Lookup::Unknown,
            None => Lookup::Refresh,
        }
    }

    async fn fetch(&self, url: &str) -> Result<JwkSet> {
        tracing::debug!(%url, "Fetching provider signing keys");

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "Provider key set request failed");
            AuthError::validation("could not fetch provider signing keys")
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Provider key set request rejected");
            return Err(AuthError::validation(format!(
                "provider key set returned status {}",
                status.as_u16()
            )));
        }

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "Provider key set is malformed");
            AuthError::validation("provider key set is malformed")
        })
    }
}

fn unknown_kid(url: &str, kid: &str) -> AuthError {
    tracing::debug!(%url, %kid, "No provider key matches token kid");
    AuthError::validation(format!("no provider key with kid {kid}"))
}

fn to_decoding_key(jwk: &Jwk) -> Result<DecodingKey> {
    DecodingKey::from_jwk(jwk)
        .map_err(|e| AuthError::validation(format!("unusable provider key: {e}")))
}
