//! Nested projection of stored rows into response payloads.
//!
//! A [`Projector`] is bound to one request's user. Every method takes a batch
//! of rows and loads each kind of related data in one query per relation,
//! so a list endpoint costs the same number of round trips as a single
//! fetch. Linked rows the user cannot see, or that were deleted, are dropped
//! from the expanded collections.

pub mod views;

use std::collections::{HashMap, HashSet};

use inkwell_core::place_tree::PlaceForest;
use inkwell_core::types::{EntityId, UserId};
use inkwell_db::models::chapter::Chapter;
use inkwell_db::models::character::Character;
use inkwell_db::models::event::Event;
use inkwell_db::models::item::Item;
use inkwell_db::models::lookup::LookupTable;
use inkwell_db::models::place::Place;
use inkwell_db::models::scene::Scene;
use inkwell_db::models::story::Story;
use inkwell_db::models::user::UserInfo;
use inkwell_db::repositories::{
    ChapterRepo, CharacterArcRepo, CharacterRepo, EventRepo, ItemRepo, Link, LinkRepo,
    LookupRepo, PlaceRepo, RelationshipRepo,
};
use inkwell_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

pub use views::*;

type Links = HashMap<EntityId, Vec<EntityId>>;

/// Every distinct right-hand id across a link map.
fn targets(links: &Links) -> Vec<EntityId> {
    let set: HashSet<EntityId> = links.values().flatten().copied().collect();
    set.into_iter().collect()
}

/// The views linked from `left`, in stored link order.
fn pick<T: Clone>(links: &Links, left: EntityId, views: &HashMap<EntityId, T>) -> Vec<T> {
    links
        .get(&left)
        .map(|rights| rights.iter().filter_map(|id| views.get(id).cloned()).collect())
        .unwrap_or_default()
}

/// Unwrap the single view projected from a one-row batch.
pub fn single<T>(mut views: Vec<T>, entity: &'static str, id: EntityId) -> AppResult<T> {
    views.pop().ok_or_else(|| AppError::not_found(entity, id))
}

/// Builds response views for one authenticated user.
pub struct Projector<'a> {
    pool: &'a DbPool,
    owner: UserId,
    author: &'a UserInfo,
}

impl<'a> Projector<'a> {
    pub fn new(pool: &'a DbPool, auth: &'a AuthUser) -> Self {
        Self {
            pool,
            owner: auth.user_id,
            author: &auth.info,
        }
    }

    pub fn project(&self, project: inkwell_db::models::project::Project) -> ProjectView {
        ProjectView::new(project, self.author)
    }

    pub fn arc(&self, arc: inkwell_db::models::character_arc::CharacterArc) -> CharacterArcView {
        CharacterArcView::new(arc, self.author)
    }

    pub fn idea(&self, idea: inkwell_db::models::idea::Idea) -> IdeaView {
        IdeaView::new(idea, self.author)
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    /// Characters with race, arcs and both directions of relationships.
    pub async fn characters(&self, rows: Vec<Character>) -> AppResult<Vec<CharacterView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|c| c.id).collect();
        let race_ids: Vec<EntityId> = rows
            .iter()
            .filter_map(|c| c.race_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let races: HashMap<EntityId, LookupView> =
            LookupRepo::list_by_ids(self.pool, LookupTable::Races, &race_ids)
                .await?
                .into_iter()
                .map(|r| (r.id, LookupView::from(r)))
                .collect();

        let mut arcs: HashMap<EntityId, Vec<CharacterArcView>> = HashMap::new();
        for arc in CharacterArcRepo::list_for_characters(self.pool, self.owner, &ids).await? {
            arcs.entry(arc.character_id).or_default().push(self.arc(arc));
        }

        let mut from: HashMap<EntityId, Vec<RelationshipView>> = HashMap::new();
        let mut to: HashMap<EntityId, Vec<RelationshipView>> = HashMap::new();
        for rel in RelationshipRepo::list_touching(self.pool, self.owner, &ids).await? {
            let view = RelationshipView::from(rel);
            from.entry(view.from_character).or_default().push(view.clone());
            to.entry(view.to_character).or_default().push(view);
        }

        Ok(rows
            .into_iter()
            .map(|c| CharacterView {
                id: c.id,
                author: self.author.clone(),
                project: c.project_id,
                race: c.race_id.and_then(|r| races.get(&r).cloned()),
                arcs: arcs.remove(&c.id).unwrap_or_default(),
                relationships_from: from.remove(&c.id).unwrap_or_default(),
                relationships_to: to.remove(&c.id).unwrap_or_default(),
                name: c.name,
                surname: c.surname,
                nickname: c.nickname,
                gender: c.gender,
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn characters_by_id(&self, ids: &[EntityId]) -> AppResult<HashMap<EntityId, CharacterView>> {
        let rows = CharacterRepo::list_by_ids(self.pool, self.owner, ids).await?;
        Ok(self
            .characters(rows)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Places
    // -----------------------------------------------------------------------

    /// Places with their subtrees inlined under `places`.
    pub async fn places(&self, rows: Vec<Place>) -> AppResult<Vec<PlaceView>> {
        let ids: Vec<EntityId> = rows.iter().map(|p| p.id).collect();
        let mut views = self.places_by_id(&ids).await?;
        Ok(ids.iter().filter_map(|id| views.remove(id)).collect())
    }

    async fn places_by_id(&self, ids: &[EntityId]) -> AppResult<HashMap<EntityId, PlaceView>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        // Subtrees can reach any of the owner's places, so load them all once.
        let all = PlaceRepo::list(self.pool, self.owner).await?;
        let forest = PlaceForest::new(all.iter().map(|p| (p.id, p.parent_id)));
        let rows: HashMap<EntityId, &Place> = all.iter().map(|p| (p.id, p)).collect();

        let mut build = |id: EntityId, places: Vec<PlaceView>| {
            rows.get(&id).map(|p| PlaceView {
                id: p.id,
                author: self.author.clone(),
                project: p.project_id,
                name: p.name.clone(),
                parent: p.parent_id,
                places,
                adjectives: p.adjectives.clone(),
                created_at: p.created_at,
                updated_at: p.updated_at,
            })
        };

        Ok(ids
            .iter()
            .filter_map(|id| forest.render(*id, &mut build).map(|v| (*id, v)))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// Items with their owning characters inlined.
    pub async fn items(&self, rows: Vec<Item>) -> AppResult<Vec<ItemView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|i| i.id).collect();
        let owners = LinkRepo::load(self.pool, Link::ItemOwners, self.owner, &ids).await?;
        let characters = self.characters_by_id(&targets(&owners)).await?;

        Ok(rows
            .into_iter()
            .map(|i| ItemView {
                id: i.id,
                author: self.author.clone(),
                project: i.project_id,
                owners: pick(&owners, i.id, &characters),
                name: i.name,
                origin: i.origin,
                created_at: i.created_at,
                updated_at: i.updated_at,
            })
            .collect())
    }

    async fn items_by_id(&self, ids: &[EntityId]) -> AppResult<HashMap<EntityId, ItemView>> {
        let rows = ItemRepo::list_by_ids(self.pool, self.owner, ids).await?;
        Ok(self.items(rows).await?.into_iter().map(|v| (v.id, v)).collect())
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Events with characters, items and place inlined.
    pub async fn events(&self, rows: Vec<Event>) -> AppResult<Vec<EventView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|e| e.id).collect();
        let place_ids: Vec<EntityId> = rows.iter().filter_map(|e| e.place_id).collect();

        let character_links =
            LinkRepo::load(self.pool, Link::EventCharacters, self.owner, &ids).await?;
        let item_links = LinkRepo::load(self.pool, Link::EventItems, self.owner, &ids).await?;

        let characters = self.characters_by_id(&targets(&character_links)).await?;
        let items = self.items_by_id(&targets(&item_links)).await?;
        let places = self.places_by_id(&place_ids).await?;

        Ok(rows
            .into_iter()
            .map(|e| EventView {
                id: e.id,
                author: self.author.clone(),
                project: e.project_id,
                time_order: e.time_order,
                characters: pick(&character_links, e.id, &characters),
                items: pick(&item_links, e.id, &items),
                place: e.place_id.and_then(|p| places.get(&p).cloned()),
                description: e.description,
                created_at: e.created_at,
                updated_at: e.updated_at,
            })
            .collect())
    }

    async fn events_by_id(&self, ids: &[EntityId]) -> AppResult<HashMap<EntityId, EventView>> {
        let rows = EventRepo::list_by_ids(self.pool, self.owner, ids).await?;
        Ok(self.events(rows).await?.into_iter().map(|v| (v.id, v)).collect())
    }

    // -----------------------------------------------------------------------
    // Scenes
    // -----------------------------------------------------------------------

    /// Scenes with characters, place, items and shown/told events inlined.
    pub async fn scenes(&self, rows: Vec<Scene>) -> AppResult<Vec<SceneView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|s| s.id).collect();
        let place_ids: Vec<EntityId> = rows.iter().filter_map(|s| s.place_id).collect();

        let character_links =
            LinkRepo::load(self.pool, Link::SceneCharacters, self.owner, &ids).await?;
        let item_links = LinkRepo::load(self.pool, Link::SceneItems, self.owner, &ids).await?;
        let shown_links =
            LinkRepo::load(self.pool, Link::SceneShownEvents, self.owner, &ids).await?;
        let told_links = LinkRepo::load(self.pool, Link::SceneToldEvents, self.owner, &ids).await?;

        let mut event_ids = targets(&shown_links);
        event_ids.extend(targets(&told_links));

        let characters = self.characters_by_id(&targets(&character_links)).await?;
        let items = self.items_by_id(&targets(&item_links)).await?;
        let events = self.events_by_id(&event_ids).await?;
        let places = self.places_by_id(&place_ids).await?;

        Ok(rows
            .into_iter()
            .map(|s| SceneView {
                id: s.id,
                author: self.author.clone(),
                project: s.project_id,
                characters: pick(&character_links, s.id, &characters),
                place: s.place_id.and_then(|p| places.get(&p).cloned()),
                items: pick(&item_links, s.id, &items),
                shown_events: pick(&shown_links, s.id, &events),
                told_events: pick(&told_links, s.id, &events),
                short_description: s.short_description,
                external_conflict: s.external_conflict,
                interpersonal_conflict: s.interpersonal_conflict,
                internal_conflict: s.internal_conflict,
                time_order: s.time_order,
                created_at: s.created_at,
                updated_at: s.updated_at,
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Stories and chapters
    // -----------------------------------------------------------------------

    /// Chapters with their included scenes as bare ids.
    pub async fn chapters(&self, rows: Vec<Chapter>) -> AppResult<Vec<ChapterView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|c| c.id).collect();
        let mut scenes = LinkRepo::load(self.pool, Link::ChapterScenes, self.owner, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|c| {
                let included = scenes.remove(&c.id).unwrap_or_default();
                ChapterView::new(c, included)
            })
            .collect())
    }

    /// Stories with chapters (in reading order) and events inlined.
    pub async fn stories(&self, rows: Vec<Story>) -> AppResult<Vec<StoryView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|s| s.id).collect();

        let chapter_rows = ChapterRepo::list_for_stories(self.pool, &ids).await?;
        let mut chapters: HashMap<EntityId, Vec<ChapterView>> = HashMap::new();
        for view in self.chapters(chapter_rows).await? {
            chapters.entry(view.story).or_default().push(view);
        }

        let event_links = LinkRepo::load(self.pool, Link::StoryEvents, self.owner, &ids).await?;
        let events = self.events_by_id(&targets(&event_links)).await?;

        Ok(rows
            .into_iter()
            .map(|s| StoryView {
                id: s.id,
                author: self.author.clone(),
                project: s.project_id,
                chapters: chapters.remove(&s.id).unwrap_or_default(),
                events: pick(&event_links, s.id, &events),
                title: s.title,
                promise: s.promise,
                plot: s.plot,
                emotional_matter: s.emotional_matter,
                universal_truth: s.universal_truth,
                logline: s.logline,
                created_at: s.created_at,
                updated_at: s.updated_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn pick_keeps_link_order_and_skips_missing() {
        let left = Uuid::new_v4();
        let (a, b, gone) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let links: Links = HashMap::from([(left, vec![b, gone, a])]);
        let views = HashMap::from([(a, "a"), (b, "b")]);

        assert_eq!(pick(&links, left, &views), vec!["b", "a"]);
        assert!(pick(&links, Uuid::new_v4(), &views).is_empty());
    }

    #[test]
    fn targets_are_distinct() {
        let (x, y) = (Uuid::new_v4(), Uuid::new_v4());
        let links: Links = HashMap::from([(Uuid::new_v4(), vec![x, y]), (Uuid::new_v4(), vec![x])]);
        let mut got = targets(&links);
        got.sort();
        let mut want = vec![x, y];
        want.sort();
        assert_eq!(got, want);
    }
}
