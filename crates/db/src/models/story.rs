//! Story entity model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A story row from the `stories` table.
#[derive(Debug, Clone, FromRow)]
pub struct Story {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub title: String,
    pub promise: String,
    pub plot: String,
    pub emotional_matter: String,
    pub universal_truth: String,
    pub logline: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a story.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStory {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1, max = 255))]
    pub title: Option<String>,
    pub promise: Option<String>,
    pub plot: Option<String>,
    pub emotional_matter: Option<String>,
    pub universal_truth: Option<String>,
    pub logline: Option<String>,
    /// Event ids linked to the story.
    pub events: Option<Vec<EntityId>>,
}

/// DTO for updating an existing story. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStory {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub promise: Option<String>,
    pub plot: Option<String>,
    pub emotional_matter: Option<String>,
    pub universal_truth: Option<String>,
    pub logline: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub events: Option<Option<Vec<EntityId>>>,
}
