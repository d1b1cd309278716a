//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO, used for `POST` and `PUT`
//! - A `Deserialize` update DTO (all `Option` fields) for `PATCH`
//!
//! Related rows are referenced by id under the same field name the response
//! uses for the expanded form (`race`, `owners`, ...). Unknown fields,
//! including a client-supplied `author`, are ignored by serde.

pub mod chapter;
pub mod character;
pub mod character_arc;
pub mod event;
pub mod idea;
pub mod item;
pub mod lookup;
pub mod place;
pub mod project;
pub mod relationship;
pub mod scene;
pub mod session;
pub mod story;
pub mod user;
