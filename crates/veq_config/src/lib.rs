//! Configuration handling for the VEQ prover.
//!
//! Loads and validates `veq.toml` files controlling the induction engine's
//! defaults: induction depth and the fallback hypothesis switch. CLI flags
//! override anything set here.

#![warn(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{ProveConfig, VeqConfig};
