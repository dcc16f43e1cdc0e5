//! Identity types for netlist entities.
//!
//! Each ID wraps the visit position assigned by an
//! [`EntityList`](crate::store::EntityList). The `define_entity_id!` macro
//! generates them with two properties the induction engine depends on:
//!
//! - `Ord`/`PartialOrd` follow the visit position, so canonical bit pairs
//!   can be normalized (smaller bit first) before entering the encoder's
//!   per-step deduplication set, and so representative choice in the
//!   canonicalizer is deterministic;
//! - `Hash`/`Eq` let IDs key the driver maps and dedup sets directly.

use crate::store::EntityId;
use serde::{Deserialize, Serialize};

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Wraps a visit position; comparison and hashing follow that
        /// position, so values of this type are usable as deterministic
        /// sort and deduplication keys.
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a visit position.
            ///
            /// # Panics
            ///
            /// Panics if the position does not fit the packed representation.
            pub fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).expect("visit position exceeds u32"))
            }

            /// Returns the visit position.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl EntityId for $name {
            fn from_index(index: usize) -> Self {
                Self::from_index(index)
            }

            fn index(self) -> usize {
                Self::index(self)
            }
        }
    };
}

define_entity_id!(
    /// Identity of a module in the design.
    ModuleId
);

define_entity_id!(
    /// Identity of a wire within a module.
    WireId
);

define_entity_id!(
    /// Identity of a cell within a module.
    CellId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn index_roundtrip() {
        let id = ModuleId::from_index(42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn equality_follows_position() {
        let a = WireId::from_index(7);
        let b = WireId::from_index(7);
        let c = WireId::from_index(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ordering_follows_position() {
        assert!(WireId::from_index(1) < WireId::from_index(2));
        let mut pair = (CellId::from_index(5), CellId::from_index(3));
        if pair.1 < pair.0 {
            pair = (pair.1, pair.0);
        }
        assert_eq!(pair, (CellId::from_index(3), CellId::from_index(5)));
    }

    #[test]
    fn ids_key_dedup_sets() {
        let mut set = HashSet::new();
        set.insert(CellId::from_index(1));
        set.insert(CellId::from_index(2));
        set.insert(CellId::from_index(1));
        assert_eq!(set.len(), 2);
    }
}
