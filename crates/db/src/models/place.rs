//! Place entity model and DTOs. Places nest through `parent_id`.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A place row from the `places` table.
#[derive(Debug, Clone, FromRow)]
pub struct Place {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub name: String,
    pub parent_id: Option<EntityId>,
    pub adjectives: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a place.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlace {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1, max = 255))]
    pub name: Option<String>,
    pub parent: Option<EntityId>,
    pub adjectives: Option<String>,
}

/// DTO for updating an existing place. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePlace {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<EntityId>>,
    pub adjectives: Option<String>,
}
