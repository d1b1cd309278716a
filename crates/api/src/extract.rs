//! Request extractors that report failures through [`AppError`].

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use inkwell_core::types::EntityId;

use crate::error::AppError;

/// JSON body extractor whose rejections render as the standard 400 payload.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// The `{id}` path segment of an entity route.
///
/// A segment that is not a UUID cannot name any row, so it is a 404 rather
/// than a 400.
#[derive(Debug, Clone, Copy)]
pub struct EntityPath(pub EntityId);

impl<S> FromRequestParts<S> for EntityPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        raw.parse::<EntityId>()
            .map(EntityPath)
            .map_err(|_| AppError::not_found("Resource", raw))
    }
}
