//! Visit-ordered entity storage.
//!
//! CNF encoding is only reproducible if every walk over the netlist happens
//! in one fixed order: the solver variables a cell receives are determined
//! by when the encoder reaches it. [`EntityList`] enforces that contract
//! structurally. Entities can never be removed or reordered, an entity's
//! visit position at insertion *is* its identity, and the only iteration
//! offered replays insertion order. There is no unordered view to misuse.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// An identity assigned by an [`EntityList`]: a visit position.
///
/// Implementors are thin wrappers over the position; converting back and
/// forth must be the identity function.
pub trait EntityId: Copy {
    /// Wraps a visit position.
    fn from_index(index: usize) -> Self;

    /// Returns the visit position.
    fn index(self) -> usize;
}

/// An append-only list of netlist entities, addressed by visit position.
///
/// Insertion hands the new entity its own ID before it is stored, since
/// wires and cells carry their ID as a field. Serialized form is the bare
/// entity sequence; positions are implicit in the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityList<I: EntityId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: EntityId, T> Default for EntityList<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EntityId, T> EntityList<I, T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Inserts the entity produced by `build`, which receives the ID the
    /// entity will live under. Returns that ID.
    pub fn insert(&mut self, build: impl FnOnce(I) -> T) -> I {
        let id = I::from_index(self.items.len());
        self.items.push(build(id));
        id
    }

    /// Returns the entity at the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not issued by this list.
    pub fn get(&self, id: I) -> &T {
        self.items
            .get(id.index())
            .unwrap_or_else(|| panic!("no entity at visit position {}", id.index()))
    }

    /// Returns the entity at the given ID, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not issued by this list.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        let index = id.index();
        self.items
            .get_mut(index)
            .unwrap_or_else(|| panic!("no entity at visit position {index}"))
    }

    /// Returns the number of entities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list holds no entities.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Walks the entities in visit order.
    ///
    /// This is the order the encoder allocates solver variables in; it is
    /// identical on every run over the same netlist.
    pub fn visit(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_index(i), item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WireId;

    #[derive(Debug, PartialEq)]
    struct Named {
        id: WireId,
        label: &'static str,
    }

    #[test]
    fn insert_hands_the_entity_its_id() {
        let mut list: EntityList<WireId, Named> = EntityList::new();
        let a = list.insert(|id| Named { id, label: "a" });
        let b = list.insert(|id| Named { id, label: "b" });
        assert_eq!(list.get(a).id, a);
        assert_eq!(list.get(b).id, b);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut list: EntityList<WireId, Named> = EntityList::new();
        let a = list.insert(|id| Named { id, label: "before" });
        list.get_mut(a).label = "after";
        assert_eq!(list.get(a).label, "after");
    }

    #[test]
    fn visit_replays_insertion_order() {
        let mut list: EntityList<WireId, u32> = EntityList::new();
        list.insert(|_| 10);
        list.insert(|_| 20);
        list.insert(|_| 30);
        let walked: Vec<(usize, u32)> = list.visit().map(|(id, &v)| (id.index(), v)).collect();
        assert_eq!(walked, vec![(0, 10), (1, 20), (2, 30)]);
    }

    #[test]
    fn empty_list() {
        let list: EntityList<WireId, u32> = EntityList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.visit().count(), 0);
    }

    #[test]
    #[should_panic(expected = "no entity at visit position")]
    fn foreign_id_panics() {
        let list: EntityList<WireId, u32> = EntityList::new();
        list.get(WireId::from_index(0));
    }

    #[test]
    fn serializes_as_bare_sequence() {
        let mut list: EntityList<WireId, u32> = EntityList::new();
        list.insert(|_| 7);
        list.insert(|_| 9);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, "[7,9]");
        let restored: EntityList<WireId, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(*restored.get(WireId::from_index(1)), 9);
    }
}
