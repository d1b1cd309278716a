//! Per-user isolation: every list, fetch and write is scoped to the session's
//! user, and other users' rows look exactly like missing ones.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create, delete_auth, get_auth, patch_json_auth, post_json_auth,
    put_json_auth, register_and_login,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_only_returns_own_rows(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    create(&pool, &ada, "characters", json!({ "name": "X" })).await;
    create(&pool, &bob, "characters", json!({ "name": "X" })).await;

    let response = get_auth(build_test_app(pool.clone()), "/api/characters/", &ada).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["author"]["username"], "ada");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_users_rows_are_not_found(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    let cases = [
        ("projects", json!({ "name": "Saga" })),
        ("stories", json!({ "title": "Tale" })),
        ("characters", json!({ "name": "Hero" })),
        ("places", json!({ "name": "Keep" })),
        ("items", json!({ "name": "Sword" })),
        ("events", json!({ "description": "Battle" })),
        ("scenes", json!({ "short_description": "Dawn" })),
        ("ideas", json!({ "content": "What if" })),
    ];

    for (plural, body) in cases {
        let created = create(&pool, &ada, plural, body.clone()).await;
        let uri = format!("/api/{plural}/{}/", created["id"].as_str().unwrap());

        let response = get_auth(build_test_app(pool.clone()), &uri, &bob).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {plural}");

        let response = put_json_auth(build_test_app(pool.clone()), &uri, body.clone(), &bob).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "PUT {plural}");

        let response = patch_json_auth(build_test_app(pool.clone()), &uri, json!({}), &bob).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "PATCH {plural}");

        let response = delete_auth(build_test_app(pool.clone()), &uri, &bob).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "DELETE {plural}");

        // Still there for its owner.
        let response = get_auth(build_test_app(pool.clone()), &uri, &ada).await;
        assert_eq!(response.status(), StatusCode::OK, "owner GET {plural}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn chapters_follow_their_story(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    let story = create(&pool, &ada, "stories", json!({ "title": "Tale" })).await;
    let chapter = create(
        &pool,
        &ada,
        "chapters",
        json!({ "story": story["id"], "title": "One" }),
    )
    .await;
    let uri = format!("/api/chapters/{}", chapter["id"].as_str().unwrap());

    let response = get_auth(build_test_app(pool.clone()), &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(build_test_app(pool.clone()), "/api/chapters", &bob).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    // Bob cannot file a chapter under Ada's story either.
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/chapters",
        json!({ "story": story["id"], "title": "Intruder" }),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().starts_with("story: Invalid pk"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn references_to_other_users_rows_fail_like_missing_ones(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    let ada_place = create(&pool, &ada, "places", json!({ "name": "Keep" })).await;
    let ada_character = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;
    let ada_project = create(&pool, &ada, "projects", json!({ "name": "Saga" })).await;

    let foreign = [
        ("events", json!({ "description": "Siege", "place": ada_place["id"] }), "place"),
        ("items", json!({ "name": "Ring", "owners": [ada_character["id"]] }), "owners"),
        ("stories", json!({ "title": "Tale", "project": ada_project["id"] }), "project"),
        (
            "character-arcs",
            json!({ "character": ada_character["id"], "description": "Grows" }),
            "character",
        ),
    ];
    let missing = [
        (
            "events",
            json!({ "description": "Siege", "place": "00000000-0000-0000-0000-000000000000" }),
            "place",
        ),
    ];

    for (plural, body, field) in foreign.into_iter().chain(missing) {
        let response =
            post_json_auth(build_test_app(pool.clone()), &format!("/api/{plural}"), body, &bob)
                .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{plural}.{field}");
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with(&format!("{field}: Invalid pk")),
            "unexpected message for {plural}.{field}: {}",
            json["error"]
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn relationships_need_both_endpoints_visible(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    let hero = create(&pool, &ada, "characters", json!({ "name": "Hero" })).await;
    let rival = create(&pool, &bob, "characters", json!({ "name": "Rival" })).await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/character-relationships",
        json!({ "from_character": hero["id"], "to_character": rival["id"], "types": ["ENEMY"] }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("to_character: Invalid pk"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_supplied_author_is_ignored(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    let story = create(
        &pool,
        &ada,
        "stories",
        json!({ "title": "Tale", "author": bob.user_id }),
    )
    .await;
    assert_eq!(story["author"]["id"], ada.user_id);

    let response = get_auth(build_test_app(pool.clone()), "/api/stories", &bob).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lookup_tables_are_shared(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    let bob = register_and_login(&pool, "bob").await;

    let elf = create(&pool, &ada, "races", json!({ "name": "Elf" })).await;
    create(&pool, &ada, "character-traits", json!({ "name": "Brave" })).await;

    let response = get_auth(build_test_app(pool.clone()), "/api/races", &bob).await;
    let races = body_json(response).await;
    assert_eq!(races.as_array().unwrap().len(), 1);
    assert_eq!(races[0]["name"], "Elf");

    // Bob may use Ada's race on his own character.
    let character = create(&pool, &bob, "characters", json!({ "name": "Legolas", "race": elf["id"] })).await;
    assert_eq!(character["race"]["name"], "Elf");

    let response = get_auth(build_test_app(pool.clone()), "/api/character-traits/", &bob).await;
    assert_eq!(body_json(response).await[0]["name"], "Brave");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entity_routes_require_a_session(pool: PgPool) {
    for plural in [
        "projects",
        "stories",
        "chapters",
        "characters",
        "character-arcs",
        "character-relationships",
        "races",
        "character-traits",
        "places",
        "items",
        "scenes",
        "events",
        "ideas",
        "users",
    ] {
        let response = common::get(build_test_app(pool.clone()), &format!("/api/{plural}/")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{plural}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_directory_lists_accounts(pool: PgPool) {
    let ada = register_and_login(&pool, "ada").await;
    register_and_login(&pool, "bob").await;

    let response = get_auth(build_test_app(pool.clone()), "/api/users", &ada).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/users/{}/", ada.user_id),
        &ada,
    )
    .await;
    assert_eq!(body_json(response).await["username"], "ada");

    let response = get_auth(build_test_app(pool), "/api/users/999999", &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
