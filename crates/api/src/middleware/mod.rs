//! Request extractors for authenticated handlers.
//!
//! - [`auth::AuthUser`] -- resolves the current user from the session cookie.

pub mod auth;
