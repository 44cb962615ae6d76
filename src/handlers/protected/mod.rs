// handlers/protected/mod.rs - Protected handlers (token authentication required)
//
// Security Level: valid bearer token or `auth-token` cookie
// Route Prefix: /api/auth/me, /api/profile, /api/devices/*
// Middleware: `authenticate` attaches `AuthUser`, then `require_any_user` checks the role

pub mod auth;    // Current identity
pub mod devices; // Read-only device views

pub use auth::{me_get, profile_get};
pub use devices::{device_data_get, device_get, device_history_get, devices_get};
