pub mod health;
pub mod root;

/// Name reported by the service status endpoints.
pub const SERVICE_NAME: &str = "jj-mgmt-api";
