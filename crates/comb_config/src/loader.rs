//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SimplifyConfig;
use std::path::Path;

/// The file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "comb.toml";

/// Loads and validates `<dir>/comb.toml`.
pub fn load_config(dir: &Path) -> Result<SimplifyConfig, ConfigError> {
    let content = std::fs::read_to_string(dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SimplifyConfig, ConfigError> {
    let config: SimplifyConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &SimplifyConfig) -> Result<(), ConfigError> {
    if !(1..=2).contains(&config.verify.min_variadic_arity) {
        return Err(ConfigError::ValidationError {
            key: "verify.min_variadic_arity".to_string(),
            reason: format!("must be 1 or 2, got {}", config.verify.min_variadic_arity),
        });
    }
    if config.driver.max_iterations == 0 {
        return Err(ConfigError::ValidationError {
            key: "driver.max_iterations".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
