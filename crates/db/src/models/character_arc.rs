//! Character arc model and DTOs.

use inkwell_core::types::{EntityId, Timestamp, UserId};
use inkwell_core::validation::validate_arc_type_code;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `character_arcs` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterArc {
    pub id: EntityId,
    pub character_id: EntityId,
    pub author_id: UserId,
    pub description: String,
    pub arc_type: String,
    pub start_trait: String,
    pub end_trait: String,
    pub change_trigger: String,
    pub created_at: Timestamp,
}

/// DTO for creating or replacing an arc.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacterArc {
    #[validate(required)]
    pub character: Option<EntityId>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    /// Defaults to `POSITIVE`.
    #[validate(custom(function = "validate_arc_type_code"))]
    pub arc_type: Option<String>,
    pub start_trait: Option<String>,
    pub end_trait: Option<String>,
    pub change_trigger: Option<String>,
}

/// DTO for updating an existing arc. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCharacterArc {
    pub character: Option<EntityId>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_arc_type_code"))]
    pub arc_type: Option<String>,
    pub start_trait: Option<String>,
    pub end_trait: Option<String>,
    pub change_trigger: Option<String>,
}
