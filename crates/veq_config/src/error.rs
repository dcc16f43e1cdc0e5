//! Configuration error types.

/// Errors produced while loading or validating a `veq.toml` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("cannot parse configuration: {0}")]
    Parse(String),

    /// A configuration value is out of its valid range.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}
