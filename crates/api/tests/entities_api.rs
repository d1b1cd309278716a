//! HTTP-level tests for entity payloads: nested projection, write semantics
//! and cascades.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create, delete_auth, get_auth, patch_json_auth, post_json_auth,
    post_raw_auth, put_json_auth, register_and_login, Session,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn fetch(pool: &PgPool, session: &Session, plural: &str, id: &Value) -> Value {
    let uri = format!("/api/{plural}/{}", id.as_str().unwrap());
    let response = get_auth(build_test_app(pool.clone()), &uri, session).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_json(response).await
}

fn member(plural: &str, id: &Value) -> String {
    format!("/api/{plural}/{}/", id.as_str().unwrap())
}

// ---------------------------------------------------------------------------
// Stories and chapters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn story_chapters_come_back_in_order(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let story = create(&pool, &ada, "stories", json!({ "title": "Tale" })).await;

    create(&pool, &ada, "chapters", json!({ "story": story["id"], "title": "Second", "order": 2 })).await;
    create(&pool, &ada, "chapters", json!({ "story": story["id"], "title": "First", "order": 1 })).await;
    create(&pool, &ada, "chapters", json!({ "story": story["id"], "title": "Also first", "order": 1 })).await;

    let story = fetch(&pool, &ada, "stories", &story["id"]).await;
    let titles: Vec<&str> = story["chapters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["First", "Also first", "Second"]);
    assert_eq!(story["chapters"][0]["story"], story["id"]);
    assert!(story["chapters"][0].get("author").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn chapter_requires_story_and_title(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/chapters",
        json!({ "title": "Orphan" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_story_removes_its_chapters(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let story = create(&pool, &ada, "stories", json!({ "title": "Tale" })).await;
    let chapter = create(&pool, &ada, "chapters", json!({ "story": story["id"], "title": "One" })).await;

    let response = delete_auth(build_test_app(pool.clone()), &member("stories", &story["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool.clone()), &member("chapters", &chapter["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(build_test_app(pool.clone()), "/api/chapters", &ada).await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn story_events_and_included_scenes_are_linked(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let event = create(&pool, &ada, "events", json!({ "description": "Battle" })).await;
    let scene = create(&pool, &ada, "scenes", json!({ "short_description": "Dawn" })).await;

    let story = create(&pool, &ada, "stories", json!({ "title": "Tale", "events": [event["id"]] })).await;
    assert_eq!(story["events"][0]["description"], "Battle");

    let chapter = create(
        &pool,
        &ada,
        "chapters",
        json!({ "story": story["id"], "title": "One", "included_scenes": [scene["id"], scene["id"]] }),
    )
    .await;
    assert_eq!(chapter["included_scenes"], json!([scene["id"]]));
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn character_inlines_race_arcs_and_relationships(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let race = create(&pool, &ada, "races", json!({ "name": "Elf", "description": "Tall" })).await;
    let hero = create(
        &pool,
        &ada,
        "characters",
        json!({ "name": "Hero", "gender": "FEMALE", "race": race["id"] }),
    )
    .await;
    let rival = create(&pool, &ada, "characters", json!({ "name": "Rival" })).await;

    let arc = create(
        &pool,
        &ada,
        "character-arcs",
        json!({ "character": hero["id"], "description": "Learns trust" }),
    )
    .await;
    assert_eq!(arc["arc_type"], "POSITIVE");
    assert_eq!(arc["character"], hero["id"]);

    let rel = create(
        &pool,
        &ada,
        "character-relationships",
        json!({
            "from_character": hero["id"],
            "to_character": rival["id"],
            "types": ["ENEMY", "FAMILY", "ENEMY"],
        }),
    )
    .await;
    assert_eq!(rel["types"], json!(["ENEMY", "FAMILY", "ENEMY"]));

    let hero = fetch(&pool, &ada, "characters", &hero["id"]).await;
    assert_eq!(hero["gender"], "FEMALE");
    assert_eq!(hero["race"]["name"], "Elf");
    assert_eq!(hero["race"]["description"], "Tall");
    assert_eq!(hero["arcs"][0]["description"], "Learns trust");
    assert_eq!(hero["relationships_from"][0]["to_character"], rival["id"]);
    assert!(hero["relationships_to"].as_array().unwrap().is_empty());

    let rival = fetch(&pool, &ada, "characters", &rival["id"]).await;
    assert!(rival["race"].is_null());
    assert_eq!(rival["relationships_to"][0]["from_character"], hero["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn enum_fields_reject_unknown_codes(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let hero = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;

    let cases = [
        ("characters", json!({ "name": "X", "gender": "OTHER" })),
        ("character-arcs", json!({ "character": hero["id"], "description": "d", "arc_type": "SIDEWAYS" })),
        (
            "character-relationships",
            json!({ "from_character": hero["id"], "to_character": hero["id"], "types": ["RIVAL"] }),
        ),
        ("ideas", json!({ "content": "c", "type": "NOPE" })),
    ];
    for (plural, body) in cases {
        let response =
            post_json_auth(build_test_app(pool.clone()), &format!("/api/{plural}"), body, &ada).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{plural}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_race_clears_it_from_characters(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let race = create(&pool, &ada, "races", json!({ "name": "Orc" })).await;
    let character = create(&pool, &ada, "characters", json!({ "name": "Grom", "race": race["id"] })).await;

    let response = delete_auth(build_test_app(pool.clone()), &member("races", &race["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let character = fetch(&pool, &ada, "characters", &character["id"]).await;
    assert!(character["race"].is_null());
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn place_inlines_its_children(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let parent = create(&pool, &ada, "places", json!({ "name": "Parent" })).await;
    let child = create(&pool, &ada, "places", json!({ "name": "Child", "parent": parent["id"] })).await;
    let grandchild =
        create(&pool, &ada, "places", json!({ "name": "Grandchild", "parent": child["id"] })).await;

    let parent = fetch(&pool, &ada, "places", &parent["id"]).await;
    assert_eq!(parent["places"].as_array().unwrap().len(), 1);
    assert_eq!(parent["places"][0]["name"], "Child");
    assert_eq!(parent["places"][0]["places"][0]["name"], "Grandchild");

    let child = fetch(&pool, &ada, "places", &child["id"]).await;
    assert_eq!(child["parent"], parent["id"]);

    let grandchild = fetch(&pool, &ada, "places", &grandchild["id"]).await;
    assert_eq!(grandchild["places"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn place_parent_cycles_are_rejected(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let a = create(&pool, &ada, "places", json!({ "name": "A" })).await;
    let b = create(&pool, &ada, "places", json!({ "name": "B", "parent": a["id"] })).await;

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        &member("places", &a["id"]),
        json!({ "parent": b["id"] }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        &member("places", &a["id"]),
        json!({ "parent": a["id"] }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let a = fetch(&pool, &ada, "places", &a["id"]).await;
    assert!(a["parent"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_place_removes_children_and_unsets_event_places(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let parent = create(&pool, &ada, "places", json!({ "name": "Parent" })).await;
    let child = create(&pool, &ada, "places", json!({ "name": "Child", "parent": parent["id"] })).await;
    let event = create(&pool, &ada, "events", json!({ "description": "Feast", "place": child["id"] })).await;
    assert_eq!(event["place"]["name"], "Child");

    let response = delete_auth(build_test_app(pool.clone()), &member("places", &parent["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool.clone()), &member("places", &child["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let event = fetch(&pool, &ada, "events", &event["id"]).await;
    assert!(event["place"].is_null());
}

// ---------------------------------------------------------------------------
// Items, events, scenes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn many_to_many_targets_are_inlined(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let hero = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;
    let keep = create(&pool, &ada, "places", json!({ "name": "Keep" })).await;
    let sword = create(&pool, &ada, "items", json!({ "name": "Sword", "owners": [hero["id"]] })).await;
    assert_eq!(sword["owners"][0]["name"], "Hero");

    let battle = create(
        &pool,
        &ada,
        "events",
        json!({ "description": "Battle", "characters": [hero["id"]], "items": [sword["id"]] }),
    )
    .await;
    assert_eq!(battle["items"][0]["owners"][0]["name"], "Hero");

    let scene = create(
        &pool,
        &ada,
        "scenes",
        json!({
            "short_description": "Aftermath",
            "place": keep["id"],
            "characters": [hero["id"]],
            "items": [sword["id"]],
            "shown_events": [battle["id"]],
            "told_events": [],
            "time_order": 3,
        }),
    )
    .await;
    assert_eq!(scene["place"]["name"], "Keep");
    assert_eq!(scene["characters"][0]["name"], "Hero");
    assert_eq!(scene["items"][0]["name"], "Sword");
    assert_eq!(scene["shown_events"][0]["description"], "Battle");
    assert_eq!(scene["told_events"], json!([]));
    assert_eq!(scene["time_order"], 3);
    assert_eq!(scene["external_conflict"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_character_keeps_their_items(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let hero = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;
    let sword = create(&pool, &ada, "items", json!({ "name": "Sword", "owners": [hero["id"]] })).await;

    let response = delete_auth(build_test_app(pool.clone()), &member("characters", &hero["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let sword = fetch(&pool, &ada, "items", &sword["id"]).await;
    assert_eq!(sword["owners"], json!([]));
}

// ---------------------------------------------------------------------------
// PUT / PATCH semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_changes_only_supplied_fields(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let hero = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;
    let keep = create(&pool, &ada, "places", json!({ "name": "Keep" })).await;
    let event = create(
        &pool,
        &ada,
        "events",
        json!({ "description": "Siege", "time_order": 4, "place": keep["id"], "characters": [hero["id"]] }),
    )
    .await;
    let uri = member("events", &event["id"]);

    let response =
        patch_json_auth(build_test_app(pool.clone()), &uri, json!({ "description": "Long siege" }), &ada).await;
    assert_eq!(response.status(), StatusCode::OK);
    let event = body_json(response).await;
    assert_eq!(event["description"], "Long siege");
    assert_eq!(event["time_order"], 4);
    assert_eq!(event["place"]["name"], "Keep");
    assert_eq!(event["characters"][0]["name"], "Hero");

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "place": null, "characters": [] }),
        &ada,
    )
    .await;
    let event = body_json(response).await;
    assert!(event["place"].is_null());
    assert_eq!(event["characters"], json!([]));
    assert_eq!(event["description"], "Long siege");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_resets_omitted_fields(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let hero = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;
    let item = create(
        &pool,
        &ada,
        "items",
        json!({ "name": "Sword", "origin": "Forge", "owners": [hero["id"]] }),
    )
    .await;
    let uri = member("items", &item["id"]);

    let response = put_json_auth(build_test_app(pool.clone()), &uri, json!({ "name": "Blade" }), &ada).await;
    assert_eq!(response.status(), StatusCode::OK);
    let item = body_json(response).await;
    assert_eq!(item["name"], "Blade");
    assert_eq!(item["origin"], "");
    assert_eq!(item["owners"], json!([]));

    let response = put_json_auth(build_test_app(pool.clone()), &uri, json!({ "origin": "x" }), &ada).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_relationship_types_are_validated(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let a = create(&pool, &ada, "characters", json!({ "name": "A" })).await;
    let b = create(&pool, &ada, "characters", json!({ "name": "B" })).await;
    let rel = create(
        &pool,
        &ada,
        "character-relationships",
        json!({ "from_character": a["id"], "to_character": b["id"] }),
    )
    .await;
    assert_eq!(rel["types"], json!([]));
    let uri = member("character-relationships", &rel["id"]);

    let response =
        patch_json_auth(build_test_app(pool.clone()), &uri, json!({ "types": ["SPOUSE"] }), &ada).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        patch_json_auth(build_test_app(pool.clone()), &uri, json!({ "types": ["MENTOR"] }), &ada).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["types"], json!(["MENTOR"]));
}

// ---------------------------------------------------------------------------
// Ideas
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn idea_lists_round_trip_in_order(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let idea = create(
        &pool,
        &ada,
        "ideas",
        json!({ "content": "Twist", "tags": ["a", "b"], "linked_elements": ["u1"] }),
    )
    .await;
    assert_eq!(idea["type"], "CONCEPT");

    let idea = fetch(&pool, &ada, "ideas", &idea["id"]).await;
    assert_eq!(idea["tags"], json!(["a", "b"]));
    assert_eq!(idea["linked_elements"], json!(["u1"]));

    let bare = create(&pool, &ada, "ideas", json!({ "content": "Bare" })).await;
    assert_eq!(bare["tags"], json!([]));
    assert_eq!(bare["linked_elements"], json!([]));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_scopes_entities_and_cascades(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let project = create(&pool, &ada, "projects", json!({ "name": "Saga" })).await;
    assert_eq!(project["description"], "");

    let story = create(&pool, &ada, "stories", json!({ "title": "Tale", "project": project["id"] })).await;
    assert_eq!(story["project"], project["id"]);

    let response = delete_auth(build_test_app(pool.clone()), &member("projects", &project["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool.clone()), &member("stories", &story["id"]), &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_uuid_id_is_not_found(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;

    let response = get_auth(build_test_app(pool.clone()), "/api/stories/not-a-uuid", &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(build_test_app(pool.clone()), "/api/places/42/", &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_bad_request(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;

    let response =
        post_raw_auth(build_test_app(pool.clone()), "/api/stories", "{\"title\": ", &ada).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/characters",
        json!({ "name": "Hero", "race": "not-a-uuid" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
