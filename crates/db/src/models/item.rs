//! Item entity model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// An item row from the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub name: String,
    pub origin: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing an item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItem {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1, max = 255))]
    pub name: Option<String>,
    pub origin: Option<String>,
    /// Character ids that own the item.
    pub owners: Option<Vec<EntityId>>,
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateItem {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub owners: Option<Option<Vec<EntityId>>>,
}
