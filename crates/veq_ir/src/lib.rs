//! VeqIR — the gate-level netlist representation for the VEQ prover.
//!
//! This crate defines the core IR types including [`Design`], [`Module`],
//! [`Wire`], [`Cell`], and the bit-level signal references [`SigBit`] and
//! [`SigSpec`] that the induction engine operates on.

#![warn(missing_docs)]

pub mod cell;
pub mod design;
pub mod ids;
pub mod module;
pub mod ports;
pub mod sig;
pub mod store;
pub mod wire;

pub use cell::{Cell, CellKind, Connection, PortDirection};
pub use design::Design;
pub use ids::{CellId, ModuleId, WireId};
pub use module::{Alias, Module};
pub use ports::PortNames;
pub use sig::{SigBit, SigSpec};
pub use store::{EntityId, EntityList};
pub use wire::Wire;
