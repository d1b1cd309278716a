//! Character relationship model and DTOs.

use inkwell_core::patch::double_option;
use inkwell_core::types::{EntityId, Timestamp};
use inkwell_core::validation::validate_relationship_type_codes;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A directed edge from the `character_relationships` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRelationship {
    pub id: EntityId,
    pub from_character_id: EntityId,
    pub to_character_id: EntityId,
    /// Ordered relationship codes; duplicates are kept.
    pub types: Vec<String>,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating or replacing a relationship.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacterRelationship {
    #[validate(required)]
    pub from_character: Option<EntityId>,
    #[validate(required)]
    pub to_character: Option<EntityId>,
    #[validate(custom(function = "validate_relationship_type_codes"))]
    pub types: Option<Vec<String>>,
    pub description: Option<String>,
}

/// DTO for updating an existing relationship. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCharacterRelationship {
    pub from_character: Option<EntityId>,
    pub to_character: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub types: Option<Option<Vec<String>>>,
    pub description: Option<String>,
}

impl UpdateCharacterRelationship {
    /// Check the element codes of a supplied `types` list.
    ///
    /// The nested option hides the list from the validator derive.
    pub fn validate_types(&self) -> Result<(), inkwell_core::error::CoreError> {
        match &self.types {
            Some(Some(types)) => inkwell_core::codes::parse_relationship_types(types).map(|_| ()),
            _ => Ok(()),
        }
    }
}
