//! Interned identifiers for netlist names.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// An interned name: a module, wire, cell, or port identifier.
///
/// There is no public raw constructor. An `Ident` can only come out of an
/// [`Interner`], so every value in circulation resolves to the string it
/// was interned from, and the `NonZeroU32` niche keeps `Option<Ident>` the
/// size of a bare `Ident`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(NonZeroU32);

// SAFETY: keys are produced only through `try_from_usize`, which offsets
// the interner's dense index by one to fit the nonzero niche and rejects
// indices that would overflow. `into_usize` undoes the offset, so the
// round trip `lasso::Key` requires is exact.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0.get() as usize - 1
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(Ident)
    }
}

/// String interner for every name in a proof session.
///
/// Module names, wire names, cell names, and port names are interned so
/// the engine's hot paths compare and hash `u32`-sized keys instead of
/// strings. Interning goes through a shared reference, which is what lets
/// the netlist loader, the encoder, and the driver share one interner
/// without threading `&mut` through every constructor; [`ThreadedRodeo`]
/// is the lasso interner that offers that.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string, returning its [`Ident`]. If the string was already
    /// interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
