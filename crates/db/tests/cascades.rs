//! Delete cascades enforced by the schema.

use inkwell_core::types::UserId;
use inkwell_db::models::chapter::CreateChapter;
use inkwell_db::models::character::CreateCharacter;
use inkwell_db::models::event::CreateEvent;
use inkwell_db::models::item::CreateItem;
use inkwell_db::models::lookup::{CreateLookupEntry, LookupTable};
use inkwell_db::models::place::CreatePlace;
use inkwell_db::models::project::CreateProject;
use inkwell_db::models::story::CreateStory;
use inkwell_db::models::user::CreateUser;
use inkwell_db::repositories::{
    ChapterRepo, CharacterRepo, EventRepo, ItemRepo, Link, LinkRepo, LookupRepo, PlaceRepo,
    ProjectRepo, StoryRepo, UserRepo,
};
use sqlx::PgPool;

async fn new_user(pool: &PgPool, name: &str) -> UserId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_place(name: &str, parent: Option<uuid::Uuid>) -> CreatePlace {
    CreatePlace {
        project: None,
        name: Some(name.to_string()),
        parent,
        adjectives: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_story_delete_removes_chapters(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let mut conn = pool.acquire().await.unwrap();

    let story = StoryRepo::create(
        &mut conn,
        alice,
        &CreateStory {
            project: None,
            title: Some("Saga".to_string()),
            promise: None,
            plot: None,
            emotional_matter: None,
            universal_truth: None,
            logline: None,
            events: None,
        },
    )
    .await
    .unwrap();
    let chapter = ChapterRepo::create(
        &mut conn,
        &CreateChapter {
            story: Some(story.id),
            title: Some("One".to_string()),
            content: None,
            order: Some(3),
            included_scenes: None,
        },
    )
    .await
    .unwrap();

    assert!(StoryRepo::delete(&pool, alice, story.id).await.unwrap());
    assert!(ChapterRepo::find_by_id(&pool, alice, chapter.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_delete_removes_filed_entities(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let mut conn = pool.acquire().await.unwrap();

    let project = ProjectRepo::create(
        &pool,
        alice,
        &CreateProject {
            name: Some("World".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();
    let mut input = new_place("Harbor", None);
    input.project = Some(project.id);
    let place = PlaceRepo::create(&mut conn, alice, &input).await.unwrap();

    assert!(ProjectRepo::delete(&pool, alice, project.id).await.unwrap());
    assert!(PlaceRepo::find_by_id(&pool, alice, place.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_place_delete_cascades_children_and_clears_events(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let mut conn = pool.acquire().await.unwrap();

    let city = PlaceRepo::create(&mut conn, alice, &new_place("City", None))
        .await
        .unwrap();
    let tavern = PlaceRepo::create(&mut conn, alice, &new_place("Tavern", Some(city.id)))
        .await
        .unwrap();
    let event = EventRepo::create(
        &mut conn,
        alice,
        &CreateEvent {
            project: None,
            description: Some("Brawl".to_string()),
            time_order: None,
            place: Some(tavern.id),
            characters: None,
            items: None,
        },
    )
    .await
    .unwrap();

    let edges = PlaceRepo::edges(&pool, alice).await.unwrap();
    assert!(edges.contains(&(tavern.id, Some(city.id))));

    assert!(PlaceRepo::delete(&pool, alice, city.id).await.unwrap());
    assert!(PlaceRepo::find_by_id(&pool, alice, tavern.id)
        .await
        .unwrap()
        .is_none());
    let event = EventRepo::find_by_id(&pool, alice, event.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.place_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_delete_keeps_items_and_drops_links(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let mut conn = pool.acquire().await.unwrap();

    let race = LookupRepo::create(
        &pool,
        LookupTable::Races,
        &CreateLookupEntry {
            name: Some("Elf".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();
    let hero = CharacterRepo::create(
        &mut conn,
        alice,
        &CreateCharacter {
            project: None,
            name: Some("Hero".to_string()),
            surname: None,
            nickname: None,
            gender: Some("MALE".to_string()),
            race: Some(race.id),
        },
    )
    .await
    .unwrap();
    let sword = ItemRepo::create(
        &mut conn,
        alice,
        &CreateItem {
            project: None,
            name: Some("Sword".to_string()),
            origin: None,
            owners: None,
        },
    )
    .await
    .unwrap();
    LinkRepo::replace(&mut conn, Link::ItemOwners, sword.id, &[hero.id])
        .await
        .unwrap();

    // Deleting the race only clears the reference.
    assert!(LookupRepo::delete(&pool, LookupTable::Races, race.id)
        .await
        .unwrap());
    let hero_after = CharacterRepo::find_by_id(&pool, alice, hero.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hero_after.race_id, None);

    assert!(CharacterRepo::delete(&pool, alice, hero.id).await.unwrap());
    assert!(ItemRepo::find_by_id(&pool, alice, sword.id)
        .await
        .unwrap()
        .is_some());
    let owners = LinkRepo::load(&pool, Link::ItemOwners, alice, &[sword.id])
        .await
        .unwrap();
    assert!(owners.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_delete_cascades_everything(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let mut conn = pool.acquire().await.unwrap();
    PlaceRepo::create(&mut conn, alice, &new_place("Home", None))
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(alice)
        .execute(&pool)
        .await
        .unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM places")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
