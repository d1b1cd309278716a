//! SQL side of the ownership rules in [`inkwell_core::ownership`].
//!
//! Repositories splice [`visibility_clause`] into their `WHERE` so a request
//! only ever touches rows its user may see. Reference checks use
//! [`invisible_ids`]: an id that exists but belongs to someone else is
//! indistinguishable from one that does not exist.

use std::collections::HashSet;

use inkwell_core::ownership::{EntityKind, OwnershipRule};
use inkwell_core::types::{EntityId, UserId};
use sqlx::PgExecutor;

/// Backing table for each entity kind.
pub fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "projects",
        EntityKind::Story => "stories",
        EntityKind::Chapter => "chapters",
        EntityKind::Character => "characters",
        EntityKind::CharacterArc => "character_arcs",
        EntityKind::CharacterRelationship => "character_relationships",
        EntityKind::Race => "races",
        EntityKind::CharacterTrait => "character_traits",
        EntityKind::Place => "places",
        EntityKind::Item => "items",
        EntityKind::Scene => "scenes",
        EntityKind::Event => "events",
        EntityKind::Idea => "ideas",
    }
}

/// Boolean SQL expression restricting `alias` to rows visible to the user
/// bound at `owner_param` (e.g. `"$1"`).
///
/// Global kinds yield `TRUE` and never reference the parameter.
pub fn visibility_clause(kind: EntityKind, alias: &str, owner_param: &str) -> String {
    match kind.rule() {
        OwnershipRule::Direct => format!("{alias}.author_id = {owner_param}"),
        OwnershipRule::ViaParent { parent, column } => {
            let parent_alias = format!("{alias}_p");
            format!(
                "{alias}.{column} IN (SELECT {parent_alias}.id FROM {} {parent_alias} WHERE {})",
                table_name(parent),
                visibility_clause(parent, &parent_alias, owner_param)
            )
        }
        OwnershipRule::Global => "TRUE".to_string(),
    }
}

/// Return the subset of `ids` the user may reference, in input order.
///
/// Ids absent from the result either do not exist or are not visible.
pub async fn visible_ids<'e>(
    executor: impl PgExecutor<'e>,
    kind: EntityKind,
    owner: UserId,
    ids: &[EntityId],
) -> Result<Vec<EntityId>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let table = table_name(kind);
    let found: Vec<EntityId> = match kind.rule() {
        OwnershipRule::Global => {
            let query = format!("SELECT t.id FROM {table} t WHERE t.id = ANY($1)");
            sqlx::query_scalar(&query).bind(ids).fetch_all(executor).await?
        }
        _ => {
            let query = format!(
                "SELECT t.id FROM {table} t WHERE t.id = ANY($2) AND {}",
                visibility_clause(kind, "t", "$1")
            );
            sqlx::query_scalar(&query)
                .bind(owner)
                .bind(ids)
                .fetch_all(executor)
                .await?
        }
    };
    let found: HashSet<EntityId> = found.into_iter().collect();
    Ok(ids.iter().copied().filter(|id| found.contains(id)).collect())
}

/// Return the ids in `ids` that the user may NOT reference, in input order.
pub async fn invisible_ids<'e>(
    executor: impl PgExecutor<'e>,
    kind: EntityKind,
    owner: UserId,
    ids: &[EntityId],
) -> Result<Vec<EntityId>, sqlx::Error> {
    let visible: HashSet<EntityId> = visible_ids(executor, kind, owner, ids)
        .await?
        .into_iter()
        .collect();
    Ok(ids.iter().copied().filter(|id| !visible.contains(id)).collect())
}
