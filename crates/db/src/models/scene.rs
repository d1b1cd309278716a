//! Scene entity model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A scene row from the `scenes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Scene {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub short_description: String,
    pub place_id: Option<EntityId>,
    pub external_conflict: String,
    pub interpersonal_conflict: String,
    pub internal_conflict: String,
    pub time_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a scene.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScene {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1))]
    pub short_description: Option<String>,
    pub place: Option<EntityId>,
    pub external_conflict: Option<String>,
    pub interpersonal_conflict: Option<String>,
    pub internal_conflict: Option<String>,
    pub time_order: Option<i32>,
    pub characters: Option<Vec<EntityId>>,
    pub items: Option<Vec<EntityId>>,
    pub shown_events: Option<Vec<EntityId>>,
    pub told_events: Option<Vec<EntityId>>,
}

/// DTO for updating an existing scene. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScene {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1))]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub place: Option<Option<EntityId>>,
    pub external_conflict: Option<String>,
    pub interpersonal_conflict: Option<String>,
    pub internal_conflict: Option<String>,
    pub time_order: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub characters: Option<Option<Vec<EntityId>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub items: Option<Option<Vec<EntityId>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub shown_events: Option<Option<Vec<EntityId>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub told_events: Option<Option<Vec<EntityId>>>,
}
