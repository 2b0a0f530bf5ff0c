use std::time::Duration;

/// Google's published signing keys for ID tokens.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
/// Google's OpenID userinfo endpoint, used for the access-token path.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
/// Both issuer spellings Google puts in ID tokens.
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
/// Apple's published signing keys for identity tokens.
pub const APPLE_KEYS_URL: &str = "https://appleid.apple.com/auth/keys";
pub const APPLE_ISSUER: &str = "https://appleid.apple.com";

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 60 * 60;
const DEFAULT_JWKS_REFRESH_COOLDOWN_SECS: u64 = 30;

/// Google verification settings.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Accepted `aud` values for ID tokens. Empty means ID tokens cannot be verified.
    pub client_ids: Vec<String>,
    pub certs_url: String,
    pub userinfo_url: String,
    pub issuers: Vec<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_ids: Vec::new(),
            certs_url: GOOGLE_CERTS_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            issuers: GOOGLE_ISSUERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Apple verification settings.
#[derive(Debug, Clone)]
pub struct AppleConfig {
    pub service_id: Option<String>,
    pub bundle_id: Option<String>,
    pub keys_url: String,
    pub issuer: String,
}

impl AppleConfig {
    /// Every configured identifier is an accepted audience.
    pub fn audiences(&self) -> Vec<String> {
        [&self.service_id, &self.bundle_id]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl Default for AppleConfig {
    fn default() -> Self {
        Self {
            service_id: None,
            bundle_id: None,
            keys_url: APPLE_KEYS_URL.to_string(),
            issuer: APPLE_ISSUER.to_string(),
        }
    }
}

/// Session signing settings. Session lifetime is fixed, not configured.
#[derive(Clone, Default)]
pub struct SessionConfig {
    pub secret: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub google: GoogleConfig,
    pub apple: AppleConfig,
    pub session: SessionConfig,
    /// Timeout for every outbound provider request.
    pub provider_timeout: Duration,
    /// Maximum age of a cached provider key set.
    pub jwks_cache_ttl: Duration,
    /// Minimum age of a cached key set before an unknown `kid` refetches it.
    pub jwks_refresh_cooldown: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            google: GoogleConfig::default(),
            apple: AppleConfig::default(),
            session: SessionConfig::default(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            jwks_cache_ttl: Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
            jwks_refresh_cooldown: Duration::from_secs(DEFAULT_JWKS_REFRESH_COOLDOWN_SECS),
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GOOGLE_CLIENT_ID`: Google OAuth client ID, or a comma-separated list of them
    /// - `APPLE_SERVICE_ID`: Apple Services ID (web sign-in)
    /// - `APPLE_BUNDLE_ID`: Apple bundle identifier (native sign-in)
    /// - `APP_JWT_SECRET`: Secret used to sign session tokens
    /// - `PROVIDER_TIMEOUT_SECS`: Timeout for provider HTTP calls (default: 10)
    /// - `JWKS_CACHE_TTL_SECS`: Maximum age of cached provider keys (default: 3600)
    /// - `JWKS_REFRESH_COOLDOWN_SECS`: Minimum gap between key-set refetches for
    ///   unknown key ids (default: 30)
    ///
    /// Missing identifiers and secrets are not an error here. The operation that
    /// needs them fails with a configuration error instead.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let seconds = |name: &str, default: u64| {
            var(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let client_ids = var("GOOGLE_CLIENT_ID")
            .map(|ids| {
                ids.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            google: GoogleConfig {
                client_ids,
                ..GoogleConfig::default()
            },
            apple: AppleConfig {
                service_id: var("APPLE_SERVICE_ID"),
                bundle_id: var("APPLE_BUNDLE_ID"),
                ..AppleConfig::default()
            },
            session: SessionConfig {
                secret: var("APP_JWT_SECRET"),
            },
            provider_timeout: Duration::from_secs(seconds(
                "PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            )),
            jwks_cache_ttl: Duration::from_secs(seconds(
                "JWKS_CACHE_TTL_SECS",
                DEFAULT_JWKS_CACHE_TTL_SECS,
            )),
            jwks_refresh_cooldown: Duration::from_secs(seconds(
                "JWKS_REFRESH_COOLDOWN_SECS",
                DEFAULT_JWKS_REFRESH_COOLDOWN_SECS,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AuthConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert!(config.google.client_ids.is_empty());
        assert_eq!(config.google.certs_url, GOOGLE_CERTS_URL);
        assert!(config.apple.audiences().is_empty());
        assert!(config.session.secret.is_none());
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.jwks_refresh_cooldown, Duration::from_secs(30));
    }

    #[test]
    fn test_google_client_ids_are_split_on_commas() {
        let config = config_from(&[("GOOGLE_CLIENT_ID", "ios.apps, web.apps,,")]);
        assert_eq!(config.google.client_ids, vec!["ios.apps", "web.apps"]);
    }

    #[test]
    fn test_apple_audiences_include_each_configured_id() {
        let config = config_from(&[
            ("APPLE_SERVICE_ID", "com.example.web"),
            ("APPLE_BUNDLE_ID", "com.example.app"),
        ]);
        assert_eq!(
            config.apple.audiences(),
            vec!["com.example.web", "com.example.app"]
        );

        let config = config_from(&[("APPLE_BUNDLE_ID", "com.example.app")]);
        assert_eq!(config.apple.audiences(), vec!["com.example.app"]);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = config_from(&[
            ("APP_JWT_SECRET", ""),
            ("APPLE_SERVICE_ID", "  "),
            ("GOOGLE_CLIENT_ID", ""),
        ]);
        assert!(config.session.secret.is_none());
        assert!(config.apple.audiences().is_empty());
        assert!(config.google.client_ids.is_empty());
    }

    #[test]
    fn test_numeric_overrides_and_fallbacks() {
        let config = config_from(&[
            ("PROVIDER_TIMEOUT_SECS", "3"),
            ("JWKS_CACHE_TTL_SECS", "not-a-number"),
            ("JWKS_REFRESH_COOLDOWN_SECS", "5"),
        ]);
        assert_eq!(config.provider_timeout, Duration::from_secs(3));
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.jwks_refresh_cooldown, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = config_from(&[("APP_JWT_SECRET", "super-secret")]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
