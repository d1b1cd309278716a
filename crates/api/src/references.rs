//! Reference checks for write requests.
//!
//! A referenced id that does not exist and one that belongs to another user
//! fail identically, as a 400 on the field that named it.

use inkwell_core::ownership::EntityKind;
use inkwell_core::types::{EntityId, UserId};
use inkwell_db::ownership::invisible_ids;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};

/// Fail unless every id in `ids` names a row the user may reference.
pub async fn ensure_visible(
    conn: &mut PgConnection,
    kind: EntityKind,
    owner: UserId,
    field: &str,
    ids: &[EntityId],
) -> AppResult<()> {
    let hidden = invisible_ids(&mut *conn, kind, owner, ids).await?;
    match hidden.first() {
        None => Ok(()),
        Some(id) => {
            tracing::debug!(field, kind = kind.label(), %id, "rejected reference");
            Err(AppError::validation(format!(
                "{field}: Invalid pk \"{id}\" - object does not exist."
            )))
        }
    }
}

/// [`ensure_visible`] for an optional single reference.
pub async fn ensure_ref(
    conn: &mut PgConnection,
    kind: EntityKind,
    owner: UserId,
    field: &str,
    id: Option<EntityId>,
) -> AppResult<()> {
    match id {
        Some(id) => ensure_visible(conn, kind, owner, field, &[id]).await,
        None => Ok(()),
    }
}
