//! Domain building blocks shared by the database and API layers.
//!
//! Nothing in this crate performs I/O: it holds the id types, the error
//! taxonomy, the stored enum codes, the per-entity ownership rules and the
//! place-tree rules that keep recursive serialization finite.

pub mod codes;
pub mod error;
pub mod ownership;
pub mod patch;
pub mod place_tree;
pub mod types;
pub mod validation;
