//! Parsing and validation of `comb.toml` simplification settings.
//!
//! This crate reads the configuration file that controls verification strictness
//! and which simplification passes run, producing a strongly-typed
//! [`SimplifyConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
