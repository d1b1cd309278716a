//! Route definitions for the `/accounts` session endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`, each also served with a trailing slash.
///
/// ```text
/// GET    /csrf        -> csrf
/// POST   /register    -> register
/// POST   /login       -> login
/// POST   /logout      -> logout (requires session)
/// GET    /user        -> current_user (requires session)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/csrf", get(accounts::csrf))
        .route("/csrf/", get(accounts::csrf))
        .route("/register", post(accounts::register))
        .route("/register/", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/login/", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/logout/", post(accounts::logout))
        .route("/user", get(accounts::current_user))
        .route("/user/", get(accounts::current_user))
}
