//! Character entity model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp, UserId};
use inkwell_core::validation::validate_gender_code;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A character row from the `characters` table.
#[derive(Debug, Clone, FromRow)]
pub struct Character {
    pub id: EntityId,
    pub author_id: UserId,
    pub project_id: Option<EntityId>,
    pub name: String,
    pub surname: String,
    pub nickname: String,
    /// `MALE`, `FEMALE` or blank.
    pub gender: String,
    pub race_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacter {
    pub project: Option<EntityId>,
    #[validate(required, length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub surname: Option<String>,
    #[validate(length(max = 255))]
    pub nickname: Option<String>,
    #[validate(custom(function = "validate_gender_code"))]
    pub gender: Option<String>,
    pub race: Option<EntityId>,
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<EntityId>>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub surname: Option<String>,
    #[validate(length(max = 255))]
    pub nickname: Option<String>,
    #[validate(custom(function = "validate_gender_code"))]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub race: Option<Option<EntityId>>,
}
