//! Mock identity provider for testing.
//!
//! Provides a local key-set and userinfo server plus fixed RSA signing keys,
//! so provider verification can be exercised without Google or Apple.

mod keys;
mod server;

pub use keys::{id_token_claims, MockKey, PRIMARY_KEY, SECONDARY_KEY};
pub use server::MockIdp;
