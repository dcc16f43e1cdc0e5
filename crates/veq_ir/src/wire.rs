//! Wire definitions — named bit bundles within a module.

use crate::ids::WireId;
use serde::{Deserialize, Serialize};
use veq_common::Ident;

/// A named bundle of signal bits within a module.
///
/// Wires carry no direction or storage semantics of their own; a wire bit is
/// sequential exactly when a sequential cell drives it. Individual bits are
/// addressed through [`SigBit`](crate::sig::SigBit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    /// The unique ID of this wire within its module.
    pub id: WireId,
    /// The wire name.
    pub name: Ident,
    /// The number of bits in this wire.
    pub width: u32,
}
