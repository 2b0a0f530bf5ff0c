mod error;
mod functions;
mod traits;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{
    audience_matches, bearer_token, calculate_expiry, is_session_expired, parse_boolean,
    session_ttl, SESSION_TTL_DAYS,
};
pub use traits::{IdentityVerifier, Result};
pub use types::{AuthenticatedUser, Provider, Role, SessionClaims, SessionUser, SocialPayload};
pub use validation::{validate_social_payload, PayloadError};
