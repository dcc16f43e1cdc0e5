//! Signal canonicalization over wire aliases.
//!
//! A module's alias connections (`lhs = rhs`, bit-for-bit) partition signal
//! bits into groups that carry the same value. [`SigMap`] maps every bit to
//! one canonical representative of its group so that two bits are
//! semantically identical iff their canonical forms are equal.

use std::collections::HashMap;
use veq_ir::{Module, SigBit, SigSpec};

/// A union-find over signal bits, built once per module.
///
/// Representatives are chosen deterministically: constants always win a
/// union, and otherwise the driving (`rhs`) side of the alias wins, so a
/// chain `a = b; b = c` canonicalizes all three onto `c`. Bits that appear
/// in no alias are their own representatives.
pub struct SigMap {
    index: HashMap<SigBit, usize>,
    parent: Vec<usize>,
    bits: Vec<SigBit>,
}

impl SigMap {
    /// Builds the map in one linear sweep over the module's alias list.
    pub fn build(module: &Module) -> Self {
        let mut map = Self {
            index: HashMap::new(),
            parent: Vec::new(),
            bits: Vec::new(),
        };
        for alias in &module.aliases {
            for (l, r) in alias.lhs.bits().zip(alias.rhs.bits()) {
                map.union(l, r);
            }
        }
        map.flatten();
        map
    }

    fn slot(&mut self, bit: SigBit) -> usize {
        if let Some(&i) = self.index.get(&bit) {
            return i;
        }
        let i = self.parent.len();
        self.parent.push(i);
        self.bits.push(bit);
        self.index.insert(bit, i);
        i
    }

    fn root(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, lhs: SigBit, rhs: SigBit) {
        let li = self.slot(lhs);
        let ri = self.slot(rhs);
        let lr = self.root(li);
        let rr = self.root(ri);
        if lr == rr {
            return;
        }
        // Constants are always representatives; otherwise the driver side wins.
        let winner = if self.bits[lr].is_const() && !self.bits[rr].is_const() {
            lr
        } else {
            rr
        };
        let loser = lr + rr - winner;
        self.parent[loser] = winner;
    }

    /// Collapses every chain so that queries are a single lookup.
    fn flatten(&mut self) {
        for i in 0..self.parent.len() {
            self.parent[i] = self.root(i);
        }
    }

    /// Returns the canonical representative of a bit.
    pub fn canon(&self, bit: SigBit) -> SigBit {
        match self.index.get(&bit) {
            Some(&i) => self.bits[self.root(i)],
            None => bit,
        }
    }

    /// Canonicalizes every bit of a spec.
    pub fn canon_spec(&self, sig: &SigSpec) -> SigSpec {
        sig.bits().map(|b| self.canon(b)).collect()
    }

    /// Returns `true` if the two specs are canonically identical bit-for-bit.
    ///
    /// Specs of different widths are never equal; zero-width specs are.
    pub fn specs_equal(&self, a: &SigSpec, b: &SigSpec) -> bool {
        a.width() == b.width()
            && a.bits()
                .zip(b.bits())
                .all(|(x, y)| self.canon(x) == self.canon(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veq_common::{Interner, Logic};
    use veq_ir::ModuleId;

    fn empty_module(interner: &Interner) -> Module {
        Module::new(ModuleId::from_index(0), interner.get_or_intern("top"))
    }

    #[test]
    fn unaliased_bits_are_their_own_reps() {
        let interner = Interner::new();
        let mut m = empty_module(&interner);
        let a = m.add_wire(interner.get_or_intern("a"), 2);
        let map = SigMap::build(&m);
        let bit = SigBit::Bit { wire: a, index: 1 };
        assert_eq!(map.canon(bit), bit);
    }

    #[test]
    fn alias_chain_canonicalizes_to_driver() {
        let interner = Interner::new();
        let mut m = empty_module(&interner);
        let a = m.add_wire(interner.get_or_intern("a"), 1);
        let b = m.add_wire(interner.get_or_intern("b"), 1);
        let c = m.add_wire(interner.get_or_intern("c"), 1);
        m.connect(m.wire_sig(a), m.wire_sig(b));
        m.connect(m.wire_sig(b), m.wire_sig(c));
        let map = SigMap::build(&m);
        let rep = SigBit::Bit { wire: c, index: 0 };
        assert_eq!(map.canon(SigBit::Bit { wire: a, index: 0 }), rep);
        assert_eq!(map.canon(SigBit::Bit { wire: b, index: 0 }), rep);
        assert_eq!(map.canon(rep), rep);
    }

    #[test]
    fn constants_win_unions() {
        let interner = Interner::new();
        let mut m = empty_module(&interner);
        let a = m.add_wire(interner.get_or_intern("a"), 1);
        let b = m.add_wire(interner.get_or_intern("b"), 1);
        // a = 1, then b = a: everything canonicalizes onto the constant.
        m.connect(m.wire_sig(a), SigSpec::from_bit(SigBit::Const(Logic::One)));
        m.connect(m.wire_sig(b), m.wire_sig(a));
        let map = SigMap::build(&m);
        assert_eq!(
            map.canon(SigBit::Bit { wire: b, index: 0 }),
            SigBit::Const(Logic::One)
        );
    }

    #[test]
    fn per_bit_grouping() {
        let interner = Interner::new();
        let mut m = empty_module(&interner);
        let a = m.add_wire(interner.get_or_intern("a"), 2);
        let b = m.add_wire(interner.get_or_intern("b"), 2);
        m.connect(m.wire_sig(a), m.wire_sig(b));
        let map = SigMap::build(&m);
        assert_eq!(
            map.canon(SigBit::Bit { wire: a, index: 0 }),
            SigBit::Bit { wire: b, index: 0 }
        );
        assert_eq!(
            map.canon(SigBit::Bit { wire: a, index: 1 }),
            SigBit::Bit { wire: b, index: 1 }
        );
        // Different bit indices never merge.
        assert_ne!(
            map.canon(SigBit::Bit { wire: a, index: 0 }),
            map.canon(SigBit::Bit { wire: a, index: 1 })
        );
    }

    #[test]
    fn specs_equal_respects_canon() {
        let interner = Interner::new();
        let mut m = empty_module(&interner);
        let a = m.add_wire(interner.get_or_intern("a"), 2);
        let b = m.add_wire(interner.get_or_intern("b"), 2);
        m.connect(m.wire_sig(a), m.wire_sig(b));
        let map = SigMap::build(&m);
        assert!(map.specs_equal(&m.wire_sig(a), &m.wire_sig(b)));
        assert!(map.specs_equal(&SigSpec::new(), &SigSpec::new()));
        assert!(!map.specs_equal(&m.wire_sig(a), &m.wire_sig(a).slice(0, 1)));
    }

    #[test]
    fn diamond_aliases_converge() {
        let interner = Interner::new();
        let mut m = empty_module(&interner);
        let a = m.add_wire(interner.get_or_intern("a"), 1);
        let b = m.add_wire(interner.get_or_intern("b"), 1);
        let c = m.add_wire(interner.get_or_intern("c"), 1);
        m.connect(m.wire_sig(a), m.wire_sig(c));
        m.connect(m.wire_sig(b), m.wire_sig(c));
        let map = SigMap::build(&m);
        assert_eq!(
            map.canon(SigBit::Bit { wire: a, index: 0 }),
            map.canon(SigBit::Bit { wire: b, index: 0 })
        );
    }
}
