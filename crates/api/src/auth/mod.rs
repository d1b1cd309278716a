//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- session and CSRF tokens, cookie parsing and rendering.
//! - [`csrf`] -- double-submit check on state-changing requests.

pub mod csrf;
pub mod password;
pub mod session;
