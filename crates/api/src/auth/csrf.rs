//! Double-submit CSRF protection for cookie-authenticated requests.
//!
//! A state-changing request that carries a session cookie must echo the
//! `csrftoken` cookie in the `X-CSRFToken` header. Requests without a session
//! cookie cannot act as a user, so they pass through and fail (or succeed)
//! on their own terms.

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use inkwell_core::error::CoreError;

use crate::auth::session::{read_cookie, CSRF_COOKIE, CSRF_HEADER, SESSION_COOKIE};
use crate::error::AppError;

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Middleware rejecting unsafe requests whose CSRF header does not match
/// the CSRF cookie. Mount with [`axum::middleware::from_fn`].
pub async fn require_csrf(request: Request, next: Next) -> Result<Response, AppError> {
    let headers = request.headers();
    if is_safe(request.method()) || read_cookie(headers, SESSION_COOKIE).is_none() {
        return Ok(next.run(request).await);
    }

    let expected = read_cookie(headers, CSRF_COOKIE);
    let given = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
    let valid = matches!((expected.as_deref(), given), (Some(e), Some(g)) if e == g);
    if valid {
        return Ok(next.run(request).await);
    }

    tracing::debug!(method = %request.method(), uri = %request.uri(), "CSRF check failed");
    Err(AppError::Core(CoreError::Forbidden(
        "CSRF Failed: CSRF token missing or incorrect.".into(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unsafe_methods_are_checked() {
        assert!(is_safe(&Method::GET));
        assert!(is_safe(&Method::OPTIONS));
        assert!(!is_safe(&Method::POST));
        assert!(!is_safe(&Method::PATCH));
        assert!(!is_safe(&Method::DELETE));
    }
}
