//! Temporal-induction equivalence proving.
//!
//! The engine discharges equivalence markers by SAT-based k-step induction:
//! the netlist is unrolled across successive time steps, "all markers agree
//! at step i" is encoded as one literal per step, and base-case plus
//! inductive-step queries against an incremental solver establish that the
//! marked pairs can never diverge once they have agreed for k steps (weak
//! equivalence — nothing is assumed about initial states). Proven markers
//! are committed by rewriting their `B` port to alias `A`.
//!
//! [`prove_equivalences`] is the entry point; it owns module iteration,
//! workset construction, and the commit of proofs. The per-module schedule
//! lives in the worker, the CNF encoding in [`Encoder`], and signal
//! canonicalization in [`SigMap`].

#![warn(missing_docs)]

mod canon;
mod encode;
mod loops;
mod worker;

pub use canon::SigMap;
pub use encode::Encoder;
pub use loops::combinational_cycles;

use veq_common::{Interner, VeqResult};
use veq_diagnostics::{Diagnostic, DiagnosticSink};
use veq_ir::{CellId, Design, Module, ModuleId, PortNames};
use veq_sat::{DpllSolver, SatSolver};
use worker::{InductWorker, WorkerOutcome};

/// Diagnostic codes emitted by the induction engine.
pub mod codes {
    use veq_diagnostics::{Category, DiagnosticCode};

    /// A cell the encoder cannot model; its outputs stay unconstrained.
    pub const UNMODELLABLE_CELL: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);
    /// A combinational cycle makes the module ineligible for induction.
    pub const COMBINATIONAL_CYCLE: DiagnosticCode = DiagnosticCode::new(Category::Warning, 202);
    /// The base case is unsatisfiable: the circuit inherently diverges.
    pub const INHERENTLY_DIVERGES: DiagnosticCode = DiagnosticCode::new(Category::Warning, 203);
    /// A module with no unproven markers was skipped.
    pub const NO_UNPROVEN_MARKERS: DiagnosticCode = DiagnosticCode::new(Category::Proof, 301);
    /// Per-step encoding progress (verbose mode).
    pub const STEP_PROGRESS: DiagnosticCode = DiagnosticCode::new(Category::Proof, 302);
    /// Induction schedule outcomes (verbose mode).
    pub const INDUCTION_STATUS: DiagnosticCode = DiagnosticCode::new(Category::Proof, 303);
}

/// Parameters of an induction run.
#[derive(Debug, Clone)]
pub struct InductOptions {
    /// Maximum induction depth k (the `-seq` parameter). Must be ≥ 1.
    pub max_seq: u32,
    /// Whether the per-marker fallback also binds the failed step's
    /// consistency conjunction. Off by default so no marker's proof leans
    /// on its own final-step agreement.
    pub fallback_keeps_failed_hypothesis: bool,
    /// Emit per-step progress notes.
    pub verbose: bool,
}

impl Default for InductOptions {
    fn default() -> Self {
        Self {
            max_seq: 4,
            fallback_keeps_failed_hypothesis: false,
            verbose: false,
        }
    }
}

/// Per-module results of a run.
#[derive(Debug, Clone)]
pub struct ModuleStats {
    /// The module this entry describes.
    pub module: ModuleId,
    /// The resolved module name.
    pub name: String,
    /// Unproven markers found at entry (workset plus trivially-provable).
    pub unproven_at_entry: usize,
    /// Markers proven and rewritten by this run.
    pub proven: usize,
    /// Whether the base case was unsatisfiable.
    pub diverged: bool,
}

/// Aggregate results of a run.
#[derive(Debug, Clone, Default)]
pub struct ProveStats {
    /// One entry per visited module, in design order.
    pub modules: Vec<ModuleStats>,
    /// Total markers proven and rewritten across all modules.
    pub proven_total: usize,
}

/// Proves equivalences across the design with the default DPLL backend.
///
/// `selection` restricts which modules participate; `None` means all.
pub fn prove_equivalences(
    design: &mut Design,
    interner: &Interner,
    selection: Option<&[ModuleId]>,
    options: &InductOptions,
    sink: &DiagnosticSink,
) -> VeqResult<ProveStats> {
    prove_equivalences_with(design, interner, selection, options, sink, DpllSolver::new)
}

/// Proves equivalences with a caller-supplied solver backend.
///
/// One fresh solver is created per module and discarded with the worker;
/// only the marker rewrites survive.
pub fn prove_equivalences_with<S, F>(
    design: &mut Design,
    interner: &Interner,
    selection: Option<&[ModuleId]>,
    options: &InductOptions,
    sink: &DiagnosticSink,
    mut new_solver: F,
) -> VeqResult<ProveStats>
where
    S: SatSolver,
    F: FnMut() -> S,
{
    let ports = PortNames::new(interner);
    let mut stats = ProveStats::default();
    let module_ids: Vec<ModuleId> = design.modules.visit().map(|(id, _)| id).collect();

    for id in module_ids {
        if let Some(sel) = selection {
            if !sel.contains(&id) {
                continue;
            }
        }

        // Classify markers against the module's alias structure.
        let (sigmap, trivial, workset, name) = {
            let module = design.modules.get(id);
            let name = interner.resolve(module.name).to_string();
            let sigmap = SigMap::build(module);
            let mut trivial = Vec::new();
            let mut workset = Vec::new();
            for (cell_id, cell) in module.equiv_markers() {
                let (Some(a), Some(b)) = (cell.port(ports.a), cell.port(ports.b)) else {
                    continue;
                };
                if a == b {
                    continue; // already proven syntactically
                }
                if sigmap.specs_equal(a, b) {
                    trivial.push(cell_id);
                } else {
                    workset.push(cell_id);
                }
            }
            (sigmap, trivial, workset, name)
        };

        let unproven_at_entry = trivial.len() + workset.len();
        if unproven_at_entry == 0 {
            sink.emit(Diagnostic::note(
                codes::NO_UNPROVEN_MARKERS,
                format!("module {name}: no unproven equivalence markers"),
            ));
            stats.modules.push(ModuleStats {
                module: id,
                name,
                unproven_at_entry: 0,
                proven: 0,
                diverged: false,
            });
            continue;
        }

        // Canonically-equal pairs are proven without touching a solver.
        let mut proven_here = 0usize;
        for &cell_id in &trivial {
            rewrite_marker(design.modules.get_mut(id), cell_id, &ports);
            proven_here += 1;
        }

        let mut diverged = false;
        if !workset.is_empty() {
            let to_rewrite = {
                let module = design.modules.get(id);
                let cycles = combinational_cycles(module, &sigmap);
                if !cycles.is_empty() {
                    sink.emit(Diagnostic::warning(
                        codes::COMBINATIONAL_CYCLE,
                        format!(
                            "module {name}: combinational cycle through {} cell(s); \
                             skipping induction",
                            cycles.iter().map(Vec::len).sum::<usize>()
                        ),
                    ));
                    Vec::new()
                } else {
                    let solver = new_solver();
                    let run = InductWorker::new(
                        solver, module, &sigmap, &workset, interner, options, sink,
                    )
                    .run()?;
                    match run {
                        WorkerOutcome::AllProven => workset.clone(),
                        WorkerOutcome::Partial(proven) => proven,
                        WorkerOutcome::Diverged => {
                            diverged = true;
                            Vec::new()
                        }
                    }
                }
            };
            for cell_id in to_rewrite {
                rewrite_marker(design.modules.get_mut(id), cell_id, &ports);
                proven_here += 1;
            }
        }

        stats.proven_total += proven_here;
        stats.modules.push(ModuleStats {
            module: id,
            name,
            unproven_at_entry,
            proven: proven_here,
            diverged,
        });
    }

    Ok(stats)
}

/// Commits a proof: the marker's `B` port becomes an alias of its `A` port.
fn rewrite_marker(module: &mut Module, cell_id: CellId, ports: &PortNames) {
    let cell = module.cells.get_mut(cell_id);
    let a = cell.port(ports.a).cloned().unwrap_or_default();
    cell.set_port(ports.b, a);
}
