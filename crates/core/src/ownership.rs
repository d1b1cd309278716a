//! Per-entity ownership rules.
//!
//! The current user is never ambient: every repository call receives the
//! owner explicitly, and the rule below decides how that owner narrows the
//! rows a request can see or mutate.

/// How an entity's visibility derives from the requesting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipRule {
    /// The row carries its own `author_id`; visible when it equals the user.
    Direct,
    /// Visible when the row referenced by `column` is visible under the
    /// parent's own rule. The row has no author of its own.
    ViaParent {
        parent: EntityKind,
        column: &'static str,
    },
    /// Shared reference data, visible to every authenticated user.
    Global,
}

/// Every entity type exposed through the REST surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Story,
    Chapter,
    Character,
    CharacterArc,
    CharacterRelationship,
    Race,
    CharacterTrait,
    Place,
    Item,
    Scene,
    Event,
    Idea,
}

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::Project,
        EntityKind::Story,
        EntityKind::Chapter,
        EntityKind::Character,
        EntityKind::CharacterArc,
        EntityKind::CharacterRelationship,
        EntityKind::Race,
        EntityKind::CharacterTrait,
        EntityKind::Place,
        EntityKind::Item,
        EntityKind::Scene,
        EntityKind::Event,
        EntityKind::Idea,
    ];

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Project => "Project",
            EntityKind::Story => "Story",
            EntityKind::Chapter => "Chapter",
            EntityKind::Character => "Character",
            EntityKind::CharacterArc => "CharacterArc",
            EntityKind::CharacterRelationship => "CharacterRelationship",
            EntityKind::Race => "Race",
            EntityKind::CharacterTrait => "CharacterTrait",
            EntityKind::Place => "Place",
            EntityKind::Item => "Item",
            EntityKind::Scene => "Scene",
            EntityKind::Event => "Event",
            EntityKind::Idea => "Idea",
        }
    }

    /// URL collection segment under `/api`.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Story => "stories",
            EntityKind::Chapter => "chapters",
            EntityKind::Character => "characters",
            EntityKind::CharacterArc => "character-arcs",
            EntityKind::CharacterRelationship => "character-relationships",
            EntityKind::Race => "races",
            EntityKind::CharacterTrait => "character-traits",
            EntityKind::Place => "places",
            EntityKind::Item => "items",
            EntityKind::Scene => "scenes",
            EntityKind::Event => "events",
            EntityKind::Idea => "ideas",
        }
    }

    pub fn rule(self) -> OwnershipRule {
        match self {
            EntityKind::Chapter => OwnershipRule::ViaParent {
                parent: EntityKind::Story,
                column: "story_id",
            },
            EntityKind::CharacterRelationship => OwnershipRule::ViaParent {
                parent: EntityKind::Character,
                column: "from_character_id",
            },
            EntityKind::Race | EntityKind::CharacterTrait => OwnershipRule::Global,
            _ => OwnershipRule::Direct,
        }
    }

    /// Whether the server stamps `author_id` from the session on create.
    pub fn stamps_author(self) -> bool {
        self.rule() == OwnershipRule::Direct
    }

    /// Whether the entity may be filed under a project.
    ///
    /// Arcs hang off a character, and projects do not nest.
    pub fn accepts_project(self) -> bool {
        self.stamps_author() && !matches!(self, EntityKind::Project | EntityKind::CharacterArc)
    }
}
