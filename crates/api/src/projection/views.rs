//! Response shapes.
//!
//! Parents are referenced by bare id (`story`, `parent`, `character`);
//! container-side collections are inlined. Enum columns are already stored
//! as their codes, so they pass through as strings.

use inkwell_core::types::{EntityId, Timestamp};
use inkwell_db::models::chapter::Chapter;
use inkwell_db::models::character_arc::CharacterArc;
use inkwell_db::models::idea::Idea;
use inkwell_db::models::lookup::LookupEntry;
use inkwell_db::models::project::Project;
use inkwell_db::models::relationship::CharacterRelationship;
use inkwell_db::models::user::UserInfo;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: EntityId,
    pub author: UserInfo,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectView {
    pub fn new(project: Project, author: &UserInfo) -> Self {
        Self {
            id: project.id,
            author: author.clone(),
            name: project.name,
            description: project.description,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Race or character trait.
#[derive(Debug, Clone, Serialize)]
pub struct LookupView {
    pub id: EntityId,
    pub name: String,
    pub description: String,
}

impl From<LookupEntry> for LookupView {
    fn from(entry: LookupEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            description: entry.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterArcView {
    pub id: EntityId,
    pub character: EntityId,
    pub author: UserInfo,
    pub description: String,
    pub arc_type: String,
    pub start_trait: String,
    pub end_trait: String,
    pub change_trigger: String,
}

impl CharacterArcView {
    pub fn new(arc: CharacterArc, author: &UserInfo) -> Self {
        Self {
            id: arc.id,
            character: arc.character_id,
            author: author.clone(),
            description: arc.description,
            arc_type: arc.arc_type,
            start_trait: arc.start_trait,
            end_trait: arc.end_trait,
            change_trigger: arc.change_trigger,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipView {
    pub id: EntityId,
    pub from_character: EntityId,
    pub to_character: EntityId,
    pub types: Vec<String>,
    pub description: String,
}

impl From<CharacterRelationship> for RelationshipView {
    fn from(rel: CharacterRelationship) -> Self {
        Self {
            id: rel.id,
            from_character: rel.from_character_id,
            to_character: rel.to_character_id,
            types: rel.types,
            description: rel.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub name: String,
    pub surname: String,
    pub nickname: String,
    pub gender: String,
    pub race: Option<LookupView>,
    pub arcs: Vec<CharacterArcView>,
    pub relationships_from: Vec<RelationshipView>,
    pub relationships_to: Vec<RelationshipView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A place with its direct children inlined, recursively.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub name: String,
    pub parent: Option<EntityId>,
    pub places: Vec<PlaceView>,
    pub adjectives: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub name: String,
    pub origin: String,
    pub owners: Vec<CharacterView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub description: String,
    pub time_order: i32,
    pub characters: Vec<CharacterView>,
    pub items: Vec<ItemView>,
    pub place: Option<PlaceView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub short_description: String,
    pub characters: Vec<CharacterView>,
    pub place: Option<PlaceView>,
    pub items: Vec<ItemView>,
    pub shown_events: Vec<EventView>,
    pub told_events: Vec<EventView>,
    pub external_conflict: String,
    pub interpersonal_conflict: String,
    pub internal_conflict: String,
    pub time_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    pub id: EntityId,
    pub story: EntityId,
    pub order: i32,
    pub title: String,
    pub content: String,
    pub included_scenes: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChapterView {
    pub fn new(chapter: Chapter, included_scenes: Vec<EntityId>) -> Self {
        Self {
            id: chapter.id,
            story: chapter.story_id,
            order: chapter.sort_order,
            title: chapter.title,
            content: chapter.content,
            included_scenes,
            created_at: chapter.created_at,
            updated_at: chapter.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub title: String,
    pub promise: String,
    pub plot: String,
    pub emotional_matter: String,
    pub universal_truth: String,
    pub logline: String,
    /// Ascending `order`, ties in creation order.
    pub chapters: Vec<ChapterView>,
    pub events: Vec<EventView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdeaView {
    pub id: EntityId,
    pub author: UserInfo,
    pub project: Option<EntityId>,
    pub content: String,
    #[serde(rename = "type")]
    pub idea_type: String,
    pub tags: Vec<String>,
    pub linked_elements: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IdeaView {
    pub fn new(idea: Idea, author: &UserInfo) -> Self {
        Self {
            id: idea.id,
            author: author.clone(),
            project: idea.project_id,
            content: idea.content,
            idea_type: idea.idea_type,
            tags: idea.tags,
            linked_elements: idea.linked_elements,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}
