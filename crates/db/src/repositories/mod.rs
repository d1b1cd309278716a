//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Reads and deletes take `&PgPool`; writes that are followed by link
//! updates take `&mut PgConnection` so the caller can run them inside one
//! transaction. Owned data is always scoped by an explicit `owner`.

pub mod chapter_repo;
pub mod character_arc_repo;
pub mod character_repo;
pub mod event_repo;
pub mod idea_repo;
pub mod item_repo;
pub mod link_repo;
pub mod lookup_repo;
pub mod place_repo;
pub mod project_repo;
pub mod relationship_repo;
pub mod scene_repo;
pub mod session_repo;
pub mod story_repo;
pub mod user_repo;

pub use chapter_repo::ChapterRepo;
pub use character_arc_repo::CharacterArcRepo;
pub use character_repo::CharacterRepo;
pub use event_repo::EventRepo;
pub use idea_repo::IdeaRepo;
pub use item_repo::ItemRepo;
pub use link_repo::{Link, LinkRepo};
pub use lookup_repo::LookupRepo;
pub use place_repo::PlaceRepo;
pub use project_repo::ProjectRepo;
pub use relationship_repo::RelationshipRepo;
pub use scene_repo::SceneRepo;
pub use session_repo::SessionRepo;
pub use story_repo::StoryRepo;
pub use user_repo::UserRepo;
