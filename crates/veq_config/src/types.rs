//! Configuration types deserialized from `veq.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `veq.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct VeqConfig {
    /// Settings for the induction prover.
    #[serde(default)]
    pub prove: ProveConfig,
}

/// Settings for the induction prover.
#[derive(Debug, Deserialize)]
pub struct ProveConfig {
    /// Maximum induction depth (the `-seq` default). Must be ≥ 1.
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Whether the per-marker fallback pass keeps the failed step's full
    /// consistency conjunction assumed. The default (`false`) proves each
    /// marker under the hypotheses for steps 1..k only, so no marker's
    /// proof relies on its own final-step agreement.
    #[serde(default)]
    pub fallback_keeps_failed_hypothesis: bool,

    /// Whether to emit per-step progress notes.
    #[serde(default)]
    pub verbose: bool,
}

fn default_depth() -> u32 {
    4
}

impl Default for ProveConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            fallback_keeps_failed_hypothesis: false,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProveConfig::default();
        assert_eq!(config.depth, 4);
        assert!(!config.fallback_keeps_failed_hypothesis);
        assert!(!config.verbose);
    }
}
