//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VeqConfig;
use std::path::Path;

/// Loads and validates a `veq.toml` configuration file.
pub fn load_config(path: &Path) -> Result<VeqConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `veq.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<VeqConfig, ConfigError> {
    let config: VeqConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are in range.
fn validate_config(config: &VeqConfig) -> Result<(), ConfigError> {
    if config.prove.depth == 0 {
        return Err(ConfigError::InvalidValue(
            "prove.depth must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.prove.depth, 4);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[prove]
depth = 2
fallback_keeps_failed_hypothesis = true
verbose = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.prove.depth, 2);
        assert!(config.prove.fallback_keeps_failed_hypothesis);
        assert!(config.prove.verbose);
    }

    #[test]
    fn zero_depth_rejected() {
        let err = load_config_from_str("[prove]\ndepth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn garbage_rejected() {
        let err = load_config_from_str("prove = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
