//! Shared reference data: races and character traits.
//!
//! Both tables have the same shape, so one model and one repository serve
//! them, keyed by [`LookupTable`].

use inkwell_core::ownership::EntityKind;
use inkwell_core::types::{EntityId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Which lookup table a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    Races,
    CharacterTraits,
}

impl LookupTable {
    pub fn table(self) -> &'static str {
        match self {
            LookupTable::Races => "races",
            LookupTable::CharacterTraits => "character_traits",
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            LookupTable::Races => EntityKind::Race,
            LookupTable::CharacterTraits => EntityKind::CharacterTrait,
        }
    }
}

/// A row from `races` or `character_traits`.
#[derive(Debug, Clone, FromRow)]
pub struct LookupEntry {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLookupEntry {
    #[validate(required, length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLookupEntry {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}
