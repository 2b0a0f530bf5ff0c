//! Functional core for jj-mgmt.
//!
//! Pure types and functions with no I/O. The `auth` module holds the identity
//! and session model shared by the verifier strategies and the HTTP layer.

pub mod auth;
