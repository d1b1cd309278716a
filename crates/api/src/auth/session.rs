//! Session and CSRF tokens and the cookies that carry them.
//!
//! Session tokens are opaque random strings handed to the browser in the
//! `sessionid` cookie; only their SHA-256 hex digest is stored. The CSRF
//! token is not secret from the page: it is echoed back in a header.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Cookie holding the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// Cookie holding the CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header a client echoes the CSRF token in.
pub const CSRF_HEADER: &str = "x-csrftoken";

const SESSION_TOKEN_LENGTH: usize = 48;
const CSRF_TOKEN_LENGTH: usize = 32;

/// CSRF cookie lifetime; it outlives any single session.
const CSRF_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365;

fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a new session token. Returns `(plaintext, sha256_hex)`.
pub fn generate_session_token() -> (String, String) {
    let token = random_token(SESSION_TOKEN_LENGTH);
    let hash = hash_session_token(&token);
    (token, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn generate_csrf_token() -> String {
    random_token(CSRF_TOKEN_LENGTH)
}

/// Find the value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// `Set-Cookie` value for the CSRF token. Readable by page scripts.
pub fn csrf_cookie(token: &str, secure: bool) -> String {
    let mut cookie =
        format!("{CSRF_COOKIE}={token}; Max-Age={CSRF_MAX_AGE_SECS}; Path=/; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
