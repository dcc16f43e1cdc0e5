//! Incremental DPLL search with two watched literals.
//!
//! The clause database grows monotonically across solve calls; assignments
//! live only for the duration of one call, so assumptions are retracted for
//! free. Propagation visits only clauses watching the falsified literal and
//! moves watches lazily.

use crate::{Lit, SatResult, SatSolver};

struct Clause {
    literals: Vec<Lit>,
    /// Positions of the two watched literals (equal for unit clauses).
    watched: [usize; 2],
}

impl Clause {
    /// Finds a non-watched position whose literal is not currently false.
    fn find_replacement_watch(&self, assignments: &[Option<bool>]) -> Option<usize> {
        self.literals.iter().enumerate().position(|(idx, &lit)| {
            idx != self.watched[0]
                && idx != self.watched[1]
                && value_in(assignments, lit) != Some(false)
        })
    }
}

/// Per-call search state: assignments, trail, and decision levels.
struct SearchState {
    assignments: Vec<Option<bool>>,
    trail: Vec<usize>,
    trail_lim: Vec<usize>,
}

fn value_in(assignments: &[Option<bool>], lit: Lit) -> Option<bool> {
    assignments[lit.var()].map(|val| val == lit.is_positive())
}

/// A complete DPLL SAT solver with two watched literals.
///
/// Variable 1 is allocated at construction and bound to true, providing the
/// constant literals required by [`SatSolver`].
pub struct DpllSolver {
    clauses: Vec<Clause>,
    /// Clause indices watching each literal, indexed by `lit_index`.
    watch_lists: Vec<Vec<usize>>,
    num_vars: usize,
    has_empty_clause: bool,
}

/// Index of a literal into the watch lists.
fn lit_index(lit: Lit) -> usize {
    lit.var() * 2 + (!lit.is_positive()) as usize
}

impl DpllSolver {
    /// Creates a solver with the constant-true variable already bound.
    pub fn new() -> Self {
        let mut solver = Self {
            clauses: Vec::new(),
            watch_lists: Vec::new(),
            num_vars: 0,
            has_empty_clause: false,
        };
        let t = solver.new_var();
        solver.add_clause(&[t]);
        solver
    }

    fn assign(state: &mut SearchState, lit: Lit) -> bool {
        let var = lit.var();
        match state.assignments[var] {
            None => {
                state.assignments[var] = Some(lit.is_positive());
                state.trail.push(var);
                true
            }
            Some(p) => p == lit.is_positive(),
        }
    }

    fn undo_to_level(state: &mut SearchState, level: usize) {
        if level >= state.trail_lim.len() {
            return;
        }
        let pos = state.trail_lim[level];
        while state.trail.len() > pos {
            let var = state.trail.pop().unwrap();
            state.assignments[var] = None;
        }
        state.trail_lim.truncate(level);
    }

    /// Propagates the consequences of `satisfied_lit` becoming true.
    ///
    /// Returns `false` on conflict.
    fn propagate(&mut self, state: &mut SearchState, satisfied_lit: Lit) -> bool {
        let mut queue = vec![satisfied_lit];
        while let Some(lit) = queue.pop() {
            if !self.process_watch_list(state, lit, &mut queue) {
                return false;
            }
        }
        true
    }

    fn process_watch_list(
        &mut self,
        state: &mut SearchState,
        satisfied_lit: Lit,
        queue: &mut Vec<Lit>,
    ) -> bool {
        let falsified = -satisfied_lit;
        let falsified_idx = lit_index(falsified);
        let mut affected = std::mem::take(&mut self.watch_lists[falsified_idx]);
        let mut conflict = false;

        affected.retain(|&cid| {
            if conflict {
                return true;
            }
            let clause = &mut self.clauses[cid];
            if clause.literals[clause.watched[0]] == falsified {
                clause.watched.swap(0, 1);
            }
            let other = clause.literals[clause.watched[0]];
            if value_in(&state.assignments, other) == Some(true) {
                return true;
            }
            if let Some(j) = clause.find_replacement_watch(&state.assignments) {
                clause.watched[1] = j;
                let new_lit = clause.literals[j];
                self.watch_lists[lit_index(new_lit)].push(cid);
                return false;
            }
            // No replacement: the clause is unit on `other`, or conflicting.
            match value_in(&state.assignments, other) {
                Some(false) => {
                    conflict = true;
                }
                None => {
                    if Self::assign(state, other) {
                        queue.push(other);
                    } else {
                        conflict = true;
                    }
                }
                Some(true) => unreachable!("satisfied clause handled above"),
            }
            true
        });

        self.watch_lists[falsified_idx].extend(affected);
        !conflict
    }

    fn assert_and_propagate(&mut self, state: &mut SearchState, lit: Lit) -> bool {
        match value_in(&state.assignments, lit) {
            Some(true) => true,
            Some(false) => false,
            None => Self::assign(state, lit) && self.propagate(state, lit),
        }
    }

    /// Backtracks to the most recent decision with an untried polarity.
    ///
    /// Returns `false` when the search space is exhausted.
    fn backtrack(&mut self, state: &mut SearchState, stack: &mut Vec<(usize, bool)>) -> bool {
        while let Some((var, tried_both)) = stack.pop() {
            let level = stack.len();
            Self::undo_to_level(state, level);
            if tried_both {
                continue;
            }
            stack.push((var, true));
            state.trail_lim.push(state.trail.len());
            let lit = -Lit::from_dimacs(var as i32);
            if Self::assign(state, lit) && self.propagate(state, lit) {
                return true;
            }
        }
        false
    }
}

impl Default for DpllSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver for DpllSolver {
    fn new_var(&mut self) -> Lit {
        self.num_vars += 1;
        self.watch_lists.resize((self.num_vars + 1) * 2, Vec::new());
        Lit::from_dimacs(self.num_vars as i32)
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        if lits.is_empty() {
            self.has_empty_clause = true;
            return;
        }
        let mut literals: Vec<Lit> = Vec::with_capacity(lits.len());
        for &lit in lits {
            debug_assert!(lit.var() <= self.num_vars, "literal uses unallocated variable");
            if literals.contains(&-lit) {
                return; // tautology
            }
            if !literals.contains(&lit) {
                literals.push(lit);
            }
        }
        let cid = self.clauses.len();
        let watched = [0, 1.min(literals.len() - 1)];
        self.watch_lists[lit_index(literals[0])].push(cid);
        if literals.len() > 1 {
            self.watch_lists[lit_index(literals[1])].push(cid);
        }
        self.clauses.push(Clause { literals, watched });
    }

    fn solve_with(&mut self, assumptions: &[Lit]) -> SatResult {
        if self.has_empty_clause {
            return SatResult::Unsat;
        }
        let mut state = SearchState {
            assignments: vec![None; self.num_vars + 1],
            trail: Vec::new(),
            trail_lim: Vec::new(),
        };

        // Unit clauses first, then the call's assumptions.
        let units: Vec<Lit> = self
            .clauses
            .iter()
            .filter(|c| c.literals.len() == 1)
            .map(|c| c.literals[0])
            .collect();
        for lit in units {
            if !self.assert_and_propagate(&mut state, lit) {
                return SatResult::Unsat;
            }
        }
        for &lit in assumptions {
            if !self.assert_and_propagate(&mut state, lit) {
                return SatResult::Unsat;
            }
        }

        let mut stack: Vec<(usize, bool)> = Vec::new();
        loop {
            let unassigned = (1..=self.num_vars).find(|&v| state.assignments[v].is_none());
            let Some(var) = unassigned else {
                return SatResult::Sat;
            };
            stack.push((var, false));
            state.trail_lim.push(state.trail.len());
            let lit = Lit::from_dimacs(var as i32);
            let ok = Self::assign(&mut state, lit) && self.propagate(&mut state, lit);
            if !ok && !self.backtrack(&mut state, &mut stack) {
                return SatResult::Unsat;
            }
        }
    }

    fn true_lit(&self) -> Lit {
        Lit::from_dimacs(1)
    }

    fn num_variables(&self) -> usize {
        self.num_vars
    }

    fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
}
