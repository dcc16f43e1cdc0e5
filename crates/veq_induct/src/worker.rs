//! The per-module induction worker.
//!
//! A worker owns one solver and its CNF state for the duration of one
//! module's proof attempt. It unrolls the netlist step by step, binds the
//! inductive hypothesis chain, runs the base-case and inductive-step
//! queries, and falls back to per-marker proofs when the bound is
//! exhausted. The worker never mutates the module; it reports which markers
//! an UNSAT result justified, and the driver commits the rewrites.

use crate::canon::SigMap;
use crate::codes;
use crate::encode::Encoder;
use crate::InductOptions;
use std::collections::HashSet;
use veq_common::{Ident, InternalError, Interner, VeqResult};
use veq_diagnostics::{Diagnostic, DiagnosticSink};
use veq_ir::{CellId, CellKind, Module, PortNames};
use veq_sat::{Lit, SatResult, SatSolver};

/// How a module's induction run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkerOutcome {
    /// The inductive step held: every marker in the workset is proven.
    AllProven,
    /// The bound was exhausted; the listed markers were proven individually.
    Partial(Vec<CellId>),
    /// The base case was unsatisfiable; nothing is proven.
    Diverged,
}

pub(crate) struct InductWorker<'a, S: SatSolver> {
    encoder: Encoder<'a, S>,
    interner: &'a Interner,
    ports: PortNames,
    workset: &'a [CellId],
    opts: &'a InductOptions,
    sink: &'a DiagnosticSink,
    /// `consistent[i]` lives at index `i - 1`; each entry is defined once.
    consistent: Vec<Lit>,
    warned_types: HashSet<Ident>,
}

impl<'a, S: SatSolver> InductWorker<'a, S> {
    pub(crate) fn new(
        solver: S,
        module: &'a Module,
        sigmap: &'a SigMap,
        workset: &'a [CellId],
        interner: &'a Interner,
        opts: &'a InductOptions,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            encoder: Encoder::new(solver, module, sigmap, interner),
            interner,
            ports: PortNames::new(interner),
            workset,
            opts,
            sink,
            consistent: Vec::new(),
            warned_types: HashSet::new(),
        }
    }

    fn module_name(&self) -> &'a str {
        self.interner.resolve(self.encoder.module().name)
    }

    /// Encodes every cell of the module at `step` and defines
    /// `consistent[step]` as the conjunction of the step's A↔B literals.
    fn encode_step(&mut self, step: u32) -> VeqResult<()> {
        let expected = self.consistent.len() as u32 + 1;
        if step != expected {
            return Err(if step < expected {
                InternalError::ConsistencyRedefined { step }
            } else {
                InternalError::StepSkipped { step, expected }
            });
        }
        let module = self.encoder.module();
        for (_, cell) in module.cells.visit() {
            if !self.encoder.encode_cell(cell, step) {
                let key = match &cell.kind {
                    CellKind::Unknown { type_name } => *type_name,
                    _ => cell.name,
                };
                if self.warned_types.insert(key) {
                    self.sink.emit(Diagnostic::warning(
                        codes::UNMODELLABLE_CELL,
                        format!(
                            "module {}: no model for cell `{}`; treating its outputs as unconstrained",
                            self.module_name(),
                            self.interner.resolve(key)
                        ),
                    ));
                }
            }
        }
        let contributions = self.encoder.take_consistency();
        let lit = self.encoder.solver().and_lits(&contributions);
        self.consistent.push(lit);
        if self.opts.verbose {
            let vars = self.encoder.solver().num_variables();
            let clauses = self.encoder.solver().num_clauses();
            self.sink.emit(Diagnostic::note(
                codes::STEP_PROGRESS,
                format!(
                    "module {}: encoded step {step} ({vars} variables, {clauses} clauses)",
                    self.module_name()
                ),
            ));
        }
        Ok(())
    }

    /// Returns a literal that is true iff the marker's A and B vectors
    /// disagree in at least one bit at `step`.
    fn marker_mismatch(&mut self, cell_id: CellId, step: u32) -> Lit {
        let cell = self.encoder.module().cells.get(cell_id);
        let (Some(a_sig), Some(b_sig)) = (cell.port(self.ports.a), cell.port(self.ports.b)) else {
            return self.encoder.solver().false_lit();
        };
        let mut diffs = Vec::new();
        for (ab, bb) in a_sig.bits().zip(b_sig.bits()) {
            let la = self.encoder.lit_for(ab, step);
            let lb = self.encoder.lit_for(bb, step);
            if la == lb {
                continue;
            }
            let diff = self.encoder.solver().xor_lits(la, lb);
            diffs.push(diff);
        }
        self.encoder.solver().or_lits(&diffs)
    }

    /// Runs the induction schedule and returns the outcome.
    pub(crate) fn run(mut self) -> VeqResult<WorkerOutcome> {
        self.encode_step(1)?;
        let k = self.opts.max_seq;
        for i in 1..=k {
            // The inductive hypothesis chain is permanent for this run.
            let hypothesis = self.consistent[(i - 1) as usize];
            self.encoder.solver().bind(hypothesis);

            if self.encoder.solver().solve() == SatResult::Unsat {
                self.sink.emit(Diagnostic::warning(
                    codes::INHERENTLY_DIVERGES,
                    format!(
                        "module {}: base case unsatisfiable at step {i}; \
                         circuit inherently diverges under its equivalence constraints",
                        self.module_name()
                    ),
                ));
                return Ok(WorkerOutcome::Diverged);
            }

            self.encode_step(i + 1)?;
            let next = self.consistent[i as usize];
            if self.encoder.solver().solve_with(&[-next]) == SatResult::Unsat {
                if self.opts.verbose {
                    self.sink.emit(Diagnostic::note(
                        codes::INDUCTION_STATUS,
                        format!(
                            "module {}: induction holds at depth {i}, all {} markers proven",
                            self.module_name(),
                            self.workset.len()
                        ),
                    ));
                }
                return Ok(WorkerOutcome::AllProven);
            }
            if self.opts.verbose {
                self.sink.emit(Diagnostic::note(
                    codes::INDUCTION_STATUS,
                    format!(
                        "module {}: inductive step refuted at depth {i}",
                        self.module_name()
                    ),
                ));
            }
        }

        // Per-marker fallback at step k+1. The hypotheses for steps 1..k
        // stay bound; whether the failed step's conjunction joins them is
        // configurable (see ProveConfig::fallback_keeps_failed_hypothesis).
        if self.opts.fallback_keeps_failed_hypothesis {
            let last = self.consistent[k as usize];
            self.encoder.solver().bind(last);
        }
        let mut proven = Vec::new();
        for &cell_id in self.workset {
            let mismatch = self.marker_mismatch(cell_id, k + 1);
            if self.encoder.solver().solve_with(&[mismatch]) == SatResult::Unsat {
                proven.push(cell_id);
            }
        }
        Ok(WorkerOutcome::Partial(proven))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veq_ir::ModuleId;
    use veq_sat::DpllSolver;

    #[test]
    fn re_encoding_a_step_is_an_internal_error() {
        let interner = Interner::new();
        let module = Module::new(ModuleId::from_index(0), interner.get_or_intern("top"));
        let sigmap = SigMap::build(&module);
        let opts = InductOptions::default();
        let sink = DiagnosticSink::new();
        let workset: Vec<CellId> = Vec::new();
        let mut worker = InductWorker::new(
            DpllSolver::new(),
            &module,
            &sigmap,
            &workset,
            &interner,
            &opts,
            &sink,
        );
        worker.encode_step(1).unwrap();
        assert_eq!(
            worker.encode_step(1).unwrap_err(),
            InternalError::ConsistencyRedefined { step: 1 }
        );
        assert_eq!(
            worker.encode_step(3).unwrap_err(),
            InternalError::StepSkipped { step: 3, expected: 2 }
        );
        assert!(worker.encode_step(2).is_ok());
    }
}
