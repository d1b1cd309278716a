//! HTTP handlers, one module per resource.

pub mod accounts;
pub mod chapters;
pub mod character_arcs;
pub mod characters;
pub mod events;
pub mod ideas;
pub mod items;
pub mod lookups;
pub mod places;
pub mod projects;
pub mod relationships;
pub mod scenes;
pub mod stories;
pub mod users;

use inkwell_core::types::{EntityId, UserId};
use inkwell_core::validation::dedup_ids;
use inkwell_db::repositories::{Link, LinkRepo};
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::references::ensure_visible;

/// A many-to-many field from a write request, deduplicated.
pub(crate) struct LinkField {
    link: Link,
    field: &'static str,
    ids: Vec<EntityId>,
}

impl LinkField {
    /// Field of a create or replace body; absent means empty.
    pub(crate) fn full(link: Link, field: &'static str, ids: Option<&[EntityId]>) -> Self {
        Self {
            link,
            field,
            ids: dedup_ids(ids.unwrap_or_default()),
        }
    }

    /// Field of a partial update; `None` leaves the stored set alone and an
    /// explicit `null` clears it.
    pub(crate) fn partial(
        link: Link,
        field: &'static str,
        ids: &Option<Option<Vec<EntityId>>>,
    ) -> Option<Self> {
        ids.as_ref()
            .map(|ids| Self::full(link, field, ids.as_deref()))
    }
}

/// Fail on the first field naming a target the user cannot see.
pub(crate) async fn check_links(
    conn: &mut PgConnection,
    owner: UserId,
    fields: &[LinkField],
) -> AppResult<()> {
    for f in fields {
        ensure_visible(&mut *conn, f.link.target(), owner, f.field, &f.ids).await?;
    }
    Ok(())
}

/// Store every field's set against `left`.
pub(crate) async fn write_links(
    conn: &mut PgConnection,
    left: EntityId,
    fields: &[LinkField],
) -> AppResult<()> {
    for f in fields {
        LinkRepo::replace(&mut *conn, f.link, left, &f.ids).await?;
    }
    Ok(())
}
