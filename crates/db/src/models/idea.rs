//! Idea entity model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use inkwell_core::validation::validate_idea_type_code;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// An idea row from the `ideas` table.
#[derive(Debug, Clone, FromRow)]
pub struct Idea {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub content: String,
    pub idea_type: String,
    pub tags: Vec<String>,
    /// Free-form ids of other entities; never dereferenced.
    pub linked_elements: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing an idea.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIdea {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1))]
    pub content: Option<String>,
    /// Defaults to `CONCEPT`.
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_idea_type_code"))]
    pub idea_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub linked_elements: Option<Vec<String>>,
}

/// DTO for updating an existing idea. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateIdea {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_idea_type_code"))]
    pub idea_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub linked_elements: Option<Option<Vec<String>>>,
}
