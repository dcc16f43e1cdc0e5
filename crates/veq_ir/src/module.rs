//! Module definitions — the unit the prover processes.
//!
//! A [`Module`] holds wires, cells, and the wire-to-wire alias connections
//! from which signal canonicalization is derived. Modules are processed
//! independently; the prover never follows hierarchy.

use crate::cell::{Cell, CellKind, Connection};
use crate::ids::{CellId, ModuleId, WireId};
use crate::sig::SigSpec;
use crate::store::EntityList;
use crate::wire::Wire;
use serde::{Deserialize, Serialize};
use veq_common::Ident;

/// A direct wire-to-wire connection, bit-for-bit.
///
/// `lhs` and `rhs` carry the same meaning as a continuous assignment
/// `lhs = rhs`: corresponding bits are aliases of one another. The
/// canonicalizer unions each bit pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alias {
    /// The aliased signal.
    pub lhs: SigSpec,
    /// The driving signal.
    pub rhs: SigSpec,
}

/// A single module of the design: wires, cells, and alias connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The unique ID of this module in the design.
    pub id: ModuleId,
    /// The module name.
    pub name: Ident,
    /// All wires in this module.
    pub wires: EntityList<WireId, Wire>,
    /// All cells, in visit order. The CNF encoder walks this order.
    pub cells: EntityList<CellId, Cell>,
    /// Direct wire-to-wire connections (the alias relation).
    pub aliases: Vec<Alias>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(id: ModuleId, name: Ident) -> Self {
        Self {
            id,
            name,
            wires: EntityList::new(),
            cells: EntityList::new(),
            aliases: Vec::new(),
        }
    }

    /// Adds a wire and returns its ID.
    pub fn add_wire(&mut self, name: Ident, width: u32) -> WireId {
        self.wires.insert(|id| Wire { id, name, width })
    }

    /// Adds a cell and returns its ID.
    pub fn add_cell(&mut self, name: Ident, kind: CellKind, connections: Vec<Connection>) -> CellId {
        self.cells.insert(|id| Cell {
            id,
            name,
            kind,
            connections,
        })
    }

    /// Records a direct wire-to-wire connection.
    ///
    /// # Panics
    ///
    /// Panics if the two sides have different widths.
    pub fn connect(&mut self, lhs: SigSpec, rhs: SigSpec) {
        assert_eq!(
            lhs.width(),
            rhs.width(),
            "alias connection width mismatch: {} vs {}",
            lhs.width(),
            rhs.width()
        );
        self.aliases.push(Alias { lhs, rhs });
    }

    /// Returns a spec covering all bits of the given wire.
    pub fn wire_sig(&self, wire: WireId) -> SigSpec {
        SigSpec::from_wire(wire, self.wires.get(wire).width)
    }

    /// Iterates over the equivalence-marker cells in visit order.
    pub fn equiv_markers(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .visit()
            .filter(|(_, c)| matches!(c.kind, CellKind::EquivMarker { .. }))
    }
}
