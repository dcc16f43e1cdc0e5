//! Cell definitions — the functional nodes of the netlist.
//!
//! A [`Cell`] is a typed function from input port assignments (plus
//! previous-step state for sequential cells) to output port assignments.
//! Cell functions are a closed set of tagged [`CellKind`] variants; there is
//! no string-based type dispatch anywhere downstream.

use crate::ids::CellId;
use crate::sig::SigSpec;
use serde::{Deserialize, Serialize};
use veq_common::{Ident, LogicVec};

/// The direction of data flow through a cell port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// The cell reads this port.
    Input,
    /// The cell drives this port.
    Output,
}

/// A connection between a cell port and a signal bit vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// The name of the port on the cell.
    pub port: Ident,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The signal bits connected to this port, LSB first.
    pub sig: SigSpec,
}

/// The kind of a cell, determining its function.
///
/// Port conventions: binary cells read `A` and `B` and drive `Y`; unary
/// cells read `A`; the multiplexer selects `A` (select low) or `B` (select
/// high) via the single-bit `S`. Sequential cells read `D` and drive `Q`
/// under a single implicit global clock. Arithmetic and comparator inputs
/// narrower than the cell width are sign- or zero-extended according to
/// `signed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    // --- Bitwise combinational ---
    /// Bitwise AND.
    And {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise OR.
    Or {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise XOR.
    Xor {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise XNOR.
    Xnor {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise NOT.
    Not {
        /// Operand width in bits.
        width: u32,
    },
    /// Two-input multiplexer with a single-bit select.
    Mux {
        /// Data width in bits.
        width: u32,
    },

    // --- Reductions ---
    /// AND-reduction of all input bits to one output bit.
    ReduceAnd {
        /// Input width in bits.
        width: u32,
    },
    /// OR-reduction of all input bits to one output bit.
    ReduceOr {
        /// Input width in bits.
        width: u32,
    },
    /// XOR-reduction (parity) of all input bits to one output bit.
    ReduceXor {
        /// Input width in bits.
        width: u32,
    },

    // --- Arithmetic ---
    /// Adder, truncating to `width`.
    Add {
        /// Result width in bits.
        width: u32,
        /// Whether narrower operands are sign-extended.
        signed: bool,
    },
    /// Subtractor, truncating to `width`.
    Sub {
        /// Result width in bits.
        width: u32,
        /// Whether narrower operands are sign-extended.
        signed: bool,
    },
    /// Multiplier, truncating to `width`.
    Mul {
        /// Result width in bits.
        width: u32,
        /// Whether narrower operands are sign-extended.
        signed: bool,
    },
    /// Logical left shift of `A` by the unsigned amount `B`.
    Shl {
        /// Result width in bits.
        width: u32,
        /// Whether a narrower `A` is sign-extended before shifting.
        signed: bool,
    },
    /// Right shift of `A` by the unsigned amount `B`; arithmetic when `signed`.
    Shr {
        /// Result width in bits.
        width: u32,
        /// Whether the shift replicates the sign bit.
        signed: bool,
    },
    /// Equality comparator, single-bit output.
    Eq {
        /// Comparison width in bits.
        width: u32,
        /// Whether narrower operands are sign-extended.
        signed: bool,
    },
    /// Inequality comparator, single-bit output.
    Ne {
        /// Comparison width in bits.
        width: u32,
        /// Whether narrower operands are sign-extended.
        signed: bool,
    },
    /// Less-than comparator, single-bit output.
    Lt {
        /// Comparison width in bits.
        width: u32,
        /// Whether the comparison is signed.
        signed: bool,
    },
    /// Less-or-equal comparator, single-bit output.
    Le {
        /// Comparison width in bits.
        width: u32,
        /// Whether the comparison is signed.
        signed: bool,
    },

    // --- Sequential state elements ---
    /// D flip-flop: `Q` at step i equals `D` at step i−1.
    Dff {
        /// Data width in bits.
        width: u32,
    },
    /// Level-sensitive latch. Not representable in the step encoding.
    Latch {
        /// Data width in bits.
        width: u32,
    },

    // --- Sources and markers ---
    /// Constant value source driving `Y`.
    Const {
        /// The constant value.
        value: LogicVec,
    },
    /// Equivalence marker: `Y` equals `A`, and the cell asserts `A ≡ B`
    /// across all reachable behavior. Proven iff `A` and `B` are
    /// syntactically the same signal.
    EquivMarker {
        /// Width of the compared vectors.
        width: u32,
    },
    /// A cell type with no model. Encoded outputs are left unconstrained.
    Unknown {
        /// The original type name, for diagnostics.
        type_name: Ident,
    },
}

impl CellKind {
    /// Returns `true` for state-holding cell kinds.
    pub fn is_sequential(&self) -> bool {
        matches!(self, CellKind::Dff { .. } | CellKind::Latch { .. })
    }
}

/// A cell in the netlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// The unique ID of this cell within its module.
    pub id: CellId,
    /// The cell instance name.
    pub name: Ident,
    /// The kind of cell.
    pub kind: CellKind,
    /// The port-to-signal connections.
    pub connections: Vec<Connection>,
}

impl Cell {
    /// Returns the signal connected to the named port, if any.
    pub fn port(&self, name: Ident) -> Option<&SigSpec> {
        self.connections
            .iter()
            .find(|c| c.port == name)
            .map(|c| &c.sig)
    }

    /// Replaces the signal connected to the named port.
    ///
    /// This is the only structural mutation the prover performs: committing
    /// a proof rewrites a marker's `B` port to alias its `A` port.
    ///
    /// # Panics
    ///
    /// Panics if the cell has no port with the given name.
    pub fn set_port(&mut self, name: Ident, sig: SigSpec) {
        let conn = self
            .connections
            .iter_mut()
            .find(|c| c.port == name)
            .unwrap_or_else(|| panic!("cell has no port {name:?}"));
        conn.sig = sig;
    }

    /// Iterates over input connections.
    pub fn inputs(&self) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(|c| c.direction == PortDirection::Input)
    }

    /// Iterates over output connections.
    pub fn outputs(&self) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(|c| c.direction == PortDirection::Output)
    }

    /// Returns `true` for state-holding cells.
    pub fn is_sequential(&self) -> bool {
        self.kind.is_sequential()
    }
}
