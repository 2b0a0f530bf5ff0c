use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Coerce a provider's `email_verified` claim into a boolean.
///
/// Apple sends either a JSON boolean or the strings `"true"` / `"false"`.
/// Any other representation is treated as unknown rather than an error.
pub fn parse_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Check whether a token's `aud` claim names any of the accepted audiences.
///
/// `aud` may be a single string or an array of strings.
pub fn audience_matches(aud: &Value, accepted: &[String]) -> bool {
    match aud {
        Value::String(s) => accepted.iter().any(|a| a == s),
        Value::Array(values) => values
            .iter()
            .filter_map(Value::as_str)
            .any(|s| accepted.iter().any(|a| a == s)),
        _ => false,
    }
}

/// Lifetime of every session, from issuance to expiry.
pub const SESSION_TTL_DAYS: i64 = 7;

/// [`SESSION_TTL_DAYS`] as a duration.
pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// Calculate session expiry from issuance time and TTL.
///
/// Returns `None` when the result falls outside the representable range.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    issued_at.checked_add_signed(ttl)
}

/// Check if a session has expired.
///
/// The expiry instant itself counts as expired.
pub fn is_session_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at <= now
}

/// Extract the credential from an `Authorization` header value.
///
/// The scheme match is case-insensitive. Returns `None` for other schemes or
/// an empty credential.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
