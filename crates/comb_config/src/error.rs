//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `comb.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A value is outside its permitted range.
    #[error("invalid value for {key}: {reason}")]
    ValidationError {
        /// Dotted path of the offending key, e.g. `driver.max_iterations`.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}
