//! Repository for the many-to-many link tables.
//!
//! Every link table has the same shape: a `(left, right)` primary key plus a
//! `position` column recording the order the ids were supplied in. Writes
//! replace the whole set; reads return only targets the requesting user can
//! see, so a link to another user's row never leaks through a projection.

use std::collections::HashMap;

use inkwell_core::ownership::EntityKind;
use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::ownership::{table_name, visibility_clause};

/// One many-to-many relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Item -> owning characters.
    ItemOwners,
    EventCharacters,
    EventItems,
    SceneCharacters,
    SceneItems,
    SceneShownEvents,
    SceneToldEvents,
    StoryEvents,
    /// Chapter -> included scenes.
    ChapterScenes,
}

impl Link {
    /// `(table, left column, right column)`.
    fn columns(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Link::ItemOwners => ("item_owners", "item_id", "character_id"),
            Link::EventCharacters => ("event_characters", "event_id", "character_id"),
            Link::EventItems => ("event_items", "event_id", "item_id"),
            Link::SceneCharacters => ("scene_characters", "scene_id", "character_id"),
            Link::SceneItems => ("scene_items", "scene_id", "item_id"),
            Link::SceneShownEvents => ("scene_shown_events", "scene_id", "event_id"),
            Link::SceneToldEvents => ("scene_told_events", "scene_id", "event_id"),
            Link::StoryEvents => ("story_events", "story_id", "event_id"),
            Link::ChapterScenes => ("chapter_scenes", "chapter_id", "scene_id"),
        }
    }

    /// Entity kind on the right-hand side.
    pub fn target(self) -> EntityKind {
        match self {
            Link::ItemOwners | Link::EventCharacters | Link::SceneCharacters => {
                EntityKind::Character
            }
            Link::EventItems | Link::SceneItems => EntityKind::Item,
            Link::SceneShownEvents | Link::SceneToldEvents | Link::StoryEvents => {
                EntityKind::Event
            }
            Link::ChapterScenes => EntityKind::Scene,
        }
    }
}

/// Provides set-replace and batch-load operations over link tables.
pub struct LinkRepo;

impl LinkRepo {
    /// Replace the targets linked from `left` with `rights`, keeping their
    /// order. Callers dedup and check visibility first.
    pub async fn replace(
        conn: &mut PgConnection,
        link: Link,
        left: EntityId,
        rights: &[EntityId],
    ) -> Result<(), sqlx::Error> {
        let (table, left_col, right_col) = link.columns();

        sqlx::query(&format!("DELETE FROM {table} WHERE {left_col} = $1"))
            .bind(left)
            .execute(&mut *conn)
            .await?;

        if rights.is_empty() {
            return Ok(());
        }

        let query = format!(
            "INSERT INTO {table} ({left_col}, {right_col}, position)
             SELECT $1, u.right_id, u.ord::INTEGER
             FROM UNNEST($2::UUID[]) WITH ORDINALITY AS u(right_id, ord)"
        );
        sqlx::query(&query)
            .bind(left)
            .bind(rights)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Load the visible targets for each id in `lefts`, in stored order.
    ///
    /// Lefts with no visible targets are absent from the map.
    pub async fn load(
        pool: &PgPool,
        link: Link,
        owner: UserId,
        lefts: &[EntityId],
    ) -> Result<HashMap<EntityId, Vec<EntityId>>, sqlx::Error> {
        if lefts.is_empty() {
            return Ok(HashMap::new());
        }
        let (table, left_col, right_col) = link.columns();
        let target = link.target();
        let query = format!(
            "SELECT l.{left_col}, l.{right_col}
             FROM {table} l
             JOIN {target_table} t ON t.id = l.{right_col}
             WHERE l.{left_col} = ANY($2) AND {visible}
             ORDER BY l.{left_col}, l.position",
            target_table = table_name(target),
            visible = visibility_clause(target, "t", "$1"),
        );
        let rows: Vec<(EntityId, EntityId)> = sqlx::query_as(&query)
            .bind(owner)
            .bind(lefts)
            .fetch_all(pool)
            .await?;

        let mut out: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
        for (left, right) in rows {
            out.entry(left).or_default().push(right);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[Link] = &[
        Link::ItemOwners,
        Link::EventCharacters,
        Link::EventItems,
        Link::SceneCharacters,
        Link::SceneItems,
        Link::SceneShownEvents,
        Link::SceneToldEvents,
        Link::StoryEvents,
        Link::ChapterScenes,
    ];

    #[test]
    fn right_column_matches_target_table() {
        for link in ALL {
            let (_, _, right_col) = link.columns();
            let table = table_name(link.target());
            assert!(
                table.starts_with(right_col.trim_end_matches("_id")),
                "{link:?}: {right_col} vs {table}"
            );
        }
    }

    #[test]
    fn link_tables_are_distinct() {
        let tables: std::collections::HashSet<_> = ALL.iter().map(|l| l.columns().0).collect();
        assert_eq!(tables.len(), ALL.len());
    }
}
