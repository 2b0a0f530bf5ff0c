//! Stateless session credentials.
//!
//! A session is an HS256-signed token carrying the identity claim, a role and
//! its validity window. Nothing is stored server-side: a token is valid while
//! its signature checks out and it has not expired.

mod issuer;
mod verifier;

pub use issuer::SessionIssuer;
pub use verifier::SessionVerifier;
