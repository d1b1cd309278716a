//! Tree rules for self-referential places.
//!
//! Places form a forest through their optional `parent`. A place response
//! inlines its direct children recursively, so the forest must stay acyclic:
//! [`PlaceForest::check_parent`] rejects any parent assignment that would
//! close a loop, and [`PlaceForest::render`] still refuses to revisit a node
//! on the current path so rows written before the check cannot recurse
//! forever.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::types::EntityId;

/// Parent/child index over one user's places.
#[derive(Debug, Default)]
pub struct PlaceForest {
    parent: HashMap<EntityId, Option<EntityId>>,
    children: HashMap<EntityId, Vec<EntityId>>,
}

impl PlaceForest {
    /// Build the index from `(id, parent)` edges.
    ///
    /// Children keep the order in which their edges were supplied.
    pub fn new(edges: impl IntoIterator<Item = (EntityId, Option<EntityId>)>) -> Self {
        let mut forest = Self::default();
        for (id, parent) in edges {
            forest.parent.insert(id, parent);
            if let Some(parent) = parent {
                forest.children.entry(parent).or_default().push(id);
            }
        }
        forest
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.parent.contains_key(&id)
    }

    /// Direct children of `id`, empty for leaves and unknown ids.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first. Stops at a root or at the first
    /// repeated node.
    pub fn ancestors(&self, id: EntityId) -> Vec<EntityId> {
        let mut seen = HashSet::from([id]);
        let mut chain = Vec::new();
        let mut cursor = self.parent.get(&id).copied().flatten();
        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            chain.push(current);
            cursor = self.parent.get(&current).copied().flatten();
        }
        chain
    }

    /// Check that `place` (or a new place, when `None`) may hang under
    /// `parent`.
    ///
    /// Rejects a place that is its own parent and a parent that already
    /// descends from the place.
    pub fn check_parent(&self, place: Option<EntityId>, parent: EntityId) -> Result<(), CoreError> {
        let Some(place) = place else {
            return Ok(());
        };
        if place == parent {
            return Err(CoreError::Validation(
                "parent: a place cannot be its own parent".to_string(),
            ));
        }
        if self.ancestors(parent).contains(&place) {
            return Err(CoreError::Validation(
                "parent: assignment would create a cycle in the place hierarchy".to_string(),
            ));
        }
        Ok(())
    }

    /// Fold the subtree under `root` bottom-up.
    ///
    /// `build` receives each node id together with the already-built values
    /// of its children and returns `None` to drop the node (for example when
    /// its row is missing). A child already on the current path is skipped.
    pub fn render<T>(&self, root: EntityId, build: &mut impl FnMut(EntityId, Vec<T>) -> Option<T>) -> Option<T> {
        let mut path = HashSet::new();
        self.render_inner(root, build, &mut path)
    }

    fn render_inner<T>(
        &self,
        id: EntityId,
        build: &mut impl FnMut(EntityId, Vec<T>) -> Option<T>,
        path: &mut HashSet<EntityId>,
    ) -> Option<T> {
        path.insert(id);
        let children = self
            .children(id)
            .iter()
            .filter(|child| !path.contains(*child))
            .copied()
            .collect::<Vec<_>>();
        let built = children
            .into_iter()
            .filter_map(|child| self.render_inner(child, build, path))
            .collect();
        path.remove(&id);
        build(id, built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    #[derive(Debug, PartialEq)]
    struct Node {
        id: EntityId,
        places: Vec<Node>,
    }

    fn ids(n: usize) -> Vec<EntityId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn depth(node: &Node) -> usize {
        1 + node.places.iter().map(depth).max().unwrap_or(0)
    }

    #[test]
    fn render_inlines_direct_children_recursively() {
        let p = ids(4);
        let forest = PlaceForest::new([
            (p[0], None),
            (p[1], Some(p[0])),
            (p[2], Some(p[1])),
            (p[3], Some(p[0])),
        ]);

        let tree = forest
            .render(p[0], &mut |id, places| Some(Node { id, places }))
            .unwrap();

        assert_eq!(tree.places.len(), 2);
        assert_eq!(tree.places[0].id, p[1]);
        assert_eq!(tree.places[0].places[0].id, p[2]);
        assert_eq!(tree.places[1].id, p[3]);
        assert_eq!(depth(&tree), 3);
    }

    #[test]
    fn leaf_renders_with_no_children() {
        let p = ids(2);
        let forest = PlaceForest::new([(p[0], None), (p[1], Some(p[0]))]);
        let leaf = forest
            .render(p[1], &mut |id, places| Some(Node { id, places }))
            .unwrap();
        assert!(leaf.places.is_empty());
    }

    #[test]
    fn render_terminates_on_a_cycle() {
        let p = ids(2);
        let forest = PlaceForest::new([(p[0], Some(p[1])), (p[1], Some(p[0]))]);
        let tree = forest
            .render(p[0], &mut |id, places| Some(Node { id, places }))
            .unwrap();
        assert_eq!(depth(&tree), 2);
    }

    #[test]
    fn dropped_nodes_are_excluded() {
        let p = ids(3);
        let forest = PlaceForest::new([(p[0], None), (p[1], Some(p[0])), (p[2], Some(p[0]))]);
        let tree = forest
            .render(p[0], &mut |id, places| {
                (id != p[1]).then_some(Node { id, places })
            })
            .unwrap();
        assert_eq!(tree.places.len(), 1);
        assert_eq!(tree.places[0].id, p[2]);
    }

    #[test]
    fn self_parent_is_rejected() {
        let p = ids(1);
        let forest = PlaceForest::new([(p[0], None)]);
        assert_matches!(forest.check_parent(Some(p[0]), p[0]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn descendant_parent_is_rejected() {
        let p = ids(3);
        let forest = PlaceForest::new([(p[0], None), (p[1], Some(p[0])), (p[2], Some(p[1]))]);
        assert_matches!(forest.check_parent(Some(p[0]), p[2]), Err(CoreError::Validation(msg)) if msg.contains("cycle"));
        assert!(forest.check_parent(Some(p[2]), p[0]).is_ok());
    }

    #[test]
    fn new_place_may_take_any_parent() {
        let p = ids(1);
        let forest = PlaceForest::new([(p[0], None)]);
        assert!(forest.check_parent(None, p[0]).is_ok());
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let p = ids(3);
        let forest = PlaceForest::new([(p[0], None), (p[1], Some(p[0])), (p[2], Some(p[1]))]);
        assert_eq!(forest.ancestors(p[2]), vec![p[1], p[0]]);
        assert!(forest.ancestors(p[0]).is_empty());
    }
}
