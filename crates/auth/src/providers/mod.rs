//! Identity provider strategies.
//!
//! This module contains implementations of `IdentityVerifier` for:
//! - Google (ID token or access token)
//! - Apple (identity token only)

mod apple;
mod google;

pub use apple::AppleVerifier;
pub use google::GoogleVerifier;
