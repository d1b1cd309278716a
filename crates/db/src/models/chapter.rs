//! Chapter entity model and DTOs.
//!
//! Chapters carry no author: they are visible through their story only.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A chapter row from the `chapters` table.
#[derive(Debug, Clone, FromRow)]
pub struct Chapter {
    pub id: EntityId,
    pub story_id: EntityId,
    pub title: String,
    pub content: String,
    /// Position within the story; not unique, ties keep insertion order.
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a chapter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChapter {
    #[validate(required)]
    pub story: Option<EntityId>,
    #[validate(required, length(min = 1, max = 255))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
    /// Scene ids included in the chapter.
    pub included_scenes: Option<Vec<EntityId>>,
}

/// DTO for updating an existing chapter. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateChapter {
    pub story: Option<EntityId>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub included_scenes: Option<Option<Vec<EntityId>>>,
}
