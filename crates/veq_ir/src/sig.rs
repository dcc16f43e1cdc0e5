//! Bit-level signal references.
//!
//! A [`SigBit`] is the atomic unit the prover reasons about: a single bit of
//! a wire, or a 4-state constant. A [`SigSpec`] is an ordered vector of bits
//! carried by a cell port or an alias connection.

use crate::ids::WireId;
use serde::{Deserialize, Serialize};
use veq_common::{Logic, LogicVec};

/// An atomic one-bit signal.
///
/// Two `SigBit`s are semantically identical iff their canonical forms are
/// equal. Equality is structural: all `Const(X)` bits compare equal, so a
/// marker comparing `x` against `x` is already syntactically discharged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SigBit {
    /// A single bit of a wire, identified by (wire, bit index).
    Bit {
        /// The wire this bit belongs to.
        wire: WireId,
        /// The bit index within the wire, 0 = least significant.
        index: u32,
    },
    /// A constant logic value.
    Const(Logic),
}

impl SigBit {
    /// Returns `true` if this bit is a constant.
    pub fn is_const(self) -> bool {
        matches!(self, SigBit::Const(_))
    }
}

/// An ordered vector of signal bits, least significant first.
///
/// This is the payload of every cell port and every alias connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SigSpec(Vec<SigBit>);

impl SigSpec {
    /// Creates an empty signal spec.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a spec covering all bits of a wire, LSB first.
    pub fn from_wire(wire: WireId, width: u32) -> Self {
        Self((0..width).map(|index| SigBit::Bit { wire, index }).collect())
    }

    /// Creates a spec from a constant value, LSB first.
    pub fn from_const(value: &LogicVec) -> Self {
        Self(value.iter().map(SigBit::Const).collect())
    }

    /// Creates a single-bit spec.
    pub fn from_bit(bit: SigBit) -> Self {
        Self(vec![bit])
    }

    /// Returns the number of bits.
    pub fn width(&self) -> u32 {
        self.0.len() as u32
    }

    /// Returns `true` if the spec has no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn bit(&self, index: u32) -> SigBit {
        self.0[index as usize]
    }

    /// Iterates over the bits, LSB first.
    pub fn bits(&self) -> impl Iterator<Item = SigBit> + '_ {
        self.0.iter().copied()
    }

    /// Appends a bit.
    pub fn push(&mut self, bit: SigBit) {
        self.0.push(bit);
    }

    /// Returns a sub-range of bits as a new spec.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn slice(&self, low: u32, width: u32) -> Self {
        Self(self.0[low as usize..(low + width) as usize].to_vec())
    }
}

impl FromIterator<SigBit> for SigSpec {
    fn from_iter<I: IntoIterator<Item = SigBit>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
