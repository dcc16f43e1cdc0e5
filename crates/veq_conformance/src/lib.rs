//! Conformance test helpers for the VEQ equivalence prover.
//!
//! Provides a small netlist builder and a run wrapper so integration tests
//! can construct circuits, invoke the induction driver, and assert on the
//! outcome and the emitted diagnostics.

#![warn(missing_docs)]

use veq_common::{Interner, Logic};
use veq_diagnostics::{Diagnostic, DiagnosticSink};
use veq_induct::{prove_equivalences, InductOptions, ProveStats};
use veq_ir::{
    CellId, CellKind, Connection, Design, Module, ModuleId, PortDirection, PortNames, SigBit,
    SigSpec, WireId,
};

/// A design under construction plus everything needed to run a proof on it.
pub struct TestBench {
    /// The interner shared by the whole bench.
    pub interner: Interner,
    /// The design being built.
    pub design: Design,
    /// The single module the builder methods target.
    pub module: ModuleId,
}

/// Result of one proof run on a bench.
pub struct RunResult {
    /// The driver's aggregate statistics.
    pub stats: ProveStats,
    /// Every diagnostic the run emitted.
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBench {
    /// Creates a bench with one empty module named `top`.
    pub fn new() -> Self {
        let interner = Interner::new();
        let mut design = Design::new();
        let module = design.add_module(interner.get_or_intern("top"));
        Self {
            interner,
            design,
            module,
        }
    }

    fn module_mut(&mut self) -> &mut Module {
        self.design.modules.get_mut(self.module)
    }

    /// Adds a wire and returns its full signal spec.
    pub fn wire(&mut self, name: &str, width: u32) -> SigSpec {
        let name = self.interner.get_or_intern(name);
        let id = self.module_mut().add_wire(name, width);
        self.design.modules.get(self.module).wire_sig(id)
    }

    /// Records an alias connection `lhs = rhs`.
    pub fn alias(&mut self, lhs: SigSpec, rhs: SigSpec) {
        self.module_mut().connect(lhs, rhs);
    }

    fn conn(&self, port: &str, direction: PortDirection, sig: SigSpec) -> Connection {
        Connection {
            port: self.interner.get_or_intern(port),
            direction,
            sig,
        }
    }

    /// Adds a two-input combinational cell driving `y`.
    pub fn gate(&mut self, name: &str, kind: CellKind, a: SigSpec, b: SigSpec, y: SigSpec) {
        let conns = vec![
            self.conn("A", PortDirection::Input, a),
            self.conn("B", PortDirection::Input, b),
            self.conn("Y", PortDirection::Output, y),
        ];
        let name = self.interner.get_or_intern(name);
        self.module_mut().add_cell(name, kind, conns);
    }

    /// Adds a flip-flop with data `d` and output `q`.
    pub fn dff(&mut self, name: &str, d: SigSpec, q: SigSpec) {
        let width = q.width();
        let conns = vec![
            self.conn("D", PortDirection::Input, d),
            self.conn("Q", PortDirection::Output, q),
        ];
        let name = self.interner.get_or_intern(name);
        self.module_mut().add_cell(name, CellKind::Dff { width }, conns);
    }

    /// Adds an equivalence marker asserting `a ≡ b` and returns its ID.
    pub fn marker(&mut self, name: &str, a: SigSpec, b: SigSpec, y: SigSpec) -> CellId {
        let width = a.width();
        let conns = vec![
            self.conn("A", PortDirection::Input, a),
            self.conn("B", PortDirection::Input, b),
            self.conn("Y", PortDirection::Output, y),
        ];
        let name = self.interner.get_or_intern(name);
        self.module_mut()
            .add_cell(name, CellKind::EquivMarker { width }, conns)
    }

    /// Adds an unmodellable black-box cell driving `y`.
    pub fn black_box(&mut self, name: &str, type_name: &str, y: SigSpec) {
        let type_name = self.interner.get_or_intern(type_name);
        let conns = vec![self.conn("Y", PortDirection::Output, y)];
        let name = self.interner.get_or_intern(name);
        self.module_mut()
            .add_cell(name, CellKind::Unknown { type_name }, conns);
    }

    /// Returns a single-bit constant spec.
    pub fn bit(value: Logic) -> SigSpec {
        SigSpec::from_bit(SigBit::Const(value))
    }

    /// Runs the induction driver over the whole design.
    pub fn run(&mut self, options: &InductOptions) -> RunResult {
        let sink = DiagnosticSink::new();
        let stats = prove_equivalences(&mut self.design, &self.interner, None, options, &sink)
            .expect("internal prover error");
        RunResult {
            stats,
            diagnostics: sink.take_all(),
        }
    }

    /// Runs with the given induction depth and otherwise default options.
    pub fn run_with_depth(&mut self, max_seq: u32) -> RunResult {
        self.run(&InductOptions {
            max_seq,
            ..InductOptions::default()
        })
    }

    /// Returns `true` if the marker's B port now aliases its A port.
    pub fn marker_rewritten(&self, id: CellId) -> bool {
        let ports = PortNames::new(&self.interner);
        let cell = self.design.modules.get(self.module).cells.get(id);
        cell.port(ports.a) == cell.port(ports.b)
    }

    /// Counts markers whose A and B ports are syntactically equal.
    pub fn proven_marker_count(&self) -> usize {
        let ports = PortNames::new(&self.interner);
        self.design
            .modules
            .get(self.module)
            .equiv_markers()
            .filter(|(_, c)| c.port(ports.a) == c.port(ports.b))
            .count()
    }
}

/// Shorthand for an AND gate kind of the given width.
pub fn and(width: u32) -> CellKind {
    CellKind::And { width }
}

/// Shorthand for an XOR gate kind of the given width.
pub fn xor(width: u32) -> CellKind {
    CellKind::Xor { width }
}

/// Splits a multi-bit spec into single-bit specs.
pub fn bits_of(sig: &SigSpec) -> Vec<SigSpec> {
    sig.bits().map(SigSpec::from_bit).collect()
}

/// Returns the first wire ID of a spec, for tests that need raw IDs.
pub fn first_wire(sig: &SigSpec) -> Option<WireId> {
    sig.bits().find_map(|b| match b {
        SigBit::Bit { wire, .. } => Some(wire),
        SigBit::Const(_) => None,
    })
}
