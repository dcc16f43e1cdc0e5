//! Internal invariant errors of the induction engine.

/// The standard result type for operations that can only fail on a prover
/// bug.
///
/// Recoverable conditions of the input netlist (unmodellable cells, failed
/// proofs, divergent circuits) are reported as diagnostics and the
/// operation still returns `Ok`; an `Err` here means an encoding or
/// scheduling invariant was violated and the run must abort.
pub type VeqResult<T> = Result<T, InternalError>;

/// A violated internal invariant of the prover.
///
/// Each variant names the invariant it guards. These should never occur
/// during normal operation; if one does, the bug is in the prover, not in
/// the netlist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    /// A time step's consistency literal was about to be defined a second
    /// time. Each step of the unrolling is encoded exactly once per run,
    /// and its consistency conjunction is never redefined.
    #[error("consistency literal for step {step} already defined")]
    ConsistencyRedefined {
        /// The step whose literal already exists.
        step: u32,
    },

    /// Time steps must be encoded consecutively from step 1; the induction
    /// schedule never skips ahead.
    #[error("step {step} encoded out of order (expected step {expected})")]
    StepSkipped {
        /// The step that was requested.
        step: u32,
        /// The next step the encoding expected.
        expected: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redefinition_message_names_the_step() {
        let err = InternalError::ConsistencyRedefined { step: 3 };
        assert_eq!(
            format!("{err}"),
            "consistency literal for step 3 already defined"
        );
    }

    #[test]
    fn skipped_step_message_names_both_steps() {
        let err = InternalError::StepSkipped { step: 5, expected: 2 };
        assert_eq!(
            format!("{err}"),
            "step 5 encoded out of order (expected step 2)"
        );
    }

    #[test]
    fn variants_compare() {
        assert_eq!(
            InternalError::ConsistencyRedefined { step: 1 },
            InternalError::ConsistencyRedefined { step: 1 }
        );
        assert_ne!(
            InternalError::ConsistencyRedefined { step: 1 },
            InternalError::StepSkipped { step: 1, expected: 1 }
        );
    }
}
