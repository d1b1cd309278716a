pub mod accounts;
pub mod health;

use axum::routing::{get, MethodRouter};
use axum::Router;

use crate::handlers::lookups::{CharacterTraits, Races};
use crate::handlers::{
    chapters, character_arcs, characters, events, ideas, items, lookups, places, projects,
    relationships, scenes, stories, users,
};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Every resource is served at both `/{plural}` and `/{plural}/`:
///
/// ```text
/// /users                                 list (read-only directory)
/// /users/{id}                            get
///
/// /projects                              list, create
/// /projects/{id}                         get, replace, update, delete
/// /stories                               list, create
/// /stories/{id}                          get, replace, update, delete
/// /chapters                              list, create
/// /chapters/{id}                         get, replace, update, delete
/// /characters                            list, create
/// /characters/{id}                       get, replace, update, delete
/// /character-arcs                        list, create
/// /character-arcs/{id}                   get, replace, update, delete
/// /character-relationships               list, create
/// /character-relationships/{id}          get, replace, update, delete
/// /races                                 list, create (shared)
/// /races/{id}                            get, replace, update, delete
/// /character-traits                      list, create (shared)
/// /character-traits/{id}                 get, replace, update, delete
/// /places                                list, create
/// /places/{id}                           get, replace, update, delete
/// /items                                 list, create
/// /items/{id}                            get, replace, update, delete
/// /scenes                                list, create
/// /scenes/{id}                           get, replace, update, delete
/// /events                                list, create
/// /events/{id}                           get, replace, update, delete
/// /ideas                                 list, create
/// /ideas/{id}                            get, replace, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    let router = Router::new();
    let router = resource(router, "/users", get(users::list), get(users::get_by_id));

    let router = resource(
        router,
        "/projects",
        get(projects::list).post(projects::create),
        get(projects::get_by_id)
            .put(projects::replace)
            .patch(projects::update)
            .delete(projects::delete),
    );
    let router = resource(
        router,
        "/stories",
        get(stories::list).post(stories::create),
        get(stories::get_by_id)
            .put(stories::replace)
            .patch(stories::update)
            .delete(stories::delete),
    );
    let router = resource(
        router,
        "/chapters",
        get(chapters::list).post(chapters::create),
        get(chapters::get_by_id)
            .put(chapters::replace)
            .patch(chapters::update)
            .delete(chapters::delete),
    );
    let router = resource(
        router,
        "/characters",
        get(characters::list).post(characters::create),
        get(characters::get_by_id)
            .put(characters::replace)
            .patch(characters::update)
            .delete(characters::delete),
    );
    let router = resource(
        router,
        "/character-arcs",
        get(character_arcs::list).post(character_arcs::create),
        get(character_arcs::get_by_id)
            .put(character_arcs::replace)
            .patch(character_arcs::update)
            .delete(character_arcs::delete),
    );
    let router = resource(
        router,
        "/character-relationships",
        get(relationships::list).post(relationships::create),
        get(relationships::get_by_id)
            .put(relationships::replace)
            .patch(relationships::update)
            .delete(relationships::delete),
    );
    let router = resource(
        router,
        "/races",
        get(lookups::list::<Races>).post(lookups::create::<Races>),
        get(lookups::get_by_id::<Races>)
            .put(lookups::replace::<Races>)
            .patch(lookups::update::<Races>)
            .delete(lookups::delete::<Races>),
    );
    let router = resource(
        router,
        "/character-traits",
        get(lookups::list::<CharacterTraits>).post(lookups::create::<CharacterTraits>),
        get(lookups::get_by_id::<CharacterTraits>)
            .put(lookups::replace::<CharacterTraits>)
            .patch(lookups::update::<CharacterTraits>)
            .delete(lookups::delete::<CharacterTraits>),
    );
    let router = resource(
        router,
        "/places",
        get(places::list).post(places::create),
        get(places::get_by_id)
            .put(places::replace)
            .patch(places::update)
            .delete(places::delete),
    );
    let router = resource(
        router,
        "/items",
        get(items::list).post(items::create),
        get(items::get_by_id)
            .put(items::replace)
            .patch(items::update)
            .delete(items::delete),
    );
    let router = resource(
        router,
        "/scenes",
        get(scenes::list).post(scenes::create),
        get(scenes::get_by_id)
            .put(scenes::replace)
            .patch(scenes::update)
            .delete(scenes::delete),
    );
    let router = resource(
        router,
        "/events",
        get(events::list).post(events::create),
        get(events::get_by_id)
            .put(events::replace)
            .patch(events::update)
            .delete(events::delete),
    );
    resource(
        router,
        "/ideas",
        get(ideas::list).post(ideas::create),
        get(ideas::get_by_id)
            .put(ideas::replace)
            .patch(ideas::update)
            .delete(ideas::delete),
    )
}

/// Mount a collection and its members at `base`, with and without the
/// trailing slash.
fn resource(
    router: Router<AppState>,
    base: &str,
    collection: MethodRouter<AppState>,
    member: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(base, collection.clone())
        .route(&format!("{base}/"), collection)
        .route(&format!("{base}/{{id}}"), member.clone())
        .route(&format!("{base}/{{id}}/"), member)
}
