//! Event entity model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub description: String,
    pub time_order: i32,
    pub place_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing an event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    pub time_order: Option<i32>,
    pub place: Option<EntityId>,
    pub characters: Option<Vec<EntityId>>,
    pub items: Option<Vec<EntityId>>,
}

/// DTO for updating an existing event. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEvent {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub time_order: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub place: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub characters: Option<Option<Vec<EntityId>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub items: Option<Option<Vec<EntityId>>>,
}
