//! Configuration types deserialized from `comb.toml`.

use serde::Deserialize;

/// The top-level simplification configuration.
///
/// Every section is optional; a missing section takes its defaults, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimplifyConfig {
    /// Verifier strictness.
    #[serde(default)]
    pub verify: VerifyConfig,
    /// Constant folding settings.
    #[serde(default)]
    pub fold: FoldConfig,
    /// Canonicalization settings.
    #[serde(default)]
    pub canonicalize: CanonicalizeConfig,
    /// Pass driver settings.
    #[serde(default)]
    pub driver: DriverConfig,
}

/// The `[verify]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Fewest operands a variadic add/mul/and/or/xor may have (1 or 2).
    #[serde(default = "default_min_variadic_arity")]
    pub min_variadic_arity: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            min_variadic_arity: default_min_variadic_arity(),
        }
    }
}

/// The `[fold]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoldConfig {
    /// Whether the fold pass runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether variadic ops with only some constant operands are folded.
    #[serde(default = "default_true")]
    pub partial: bool,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            partial: true,
        }
    }
}

/// The `[canonicalize]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalizeConfig {
    /// Whether the canonicalize pass runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The `[driver]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Upper bound on pass-pipeline iterations before giving up on a fixpoint.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Whether common subexpression elimination runs.
    #[serde(default = "default_true")]
    pub cse: bool,
    /// Whether dead operations are erased.
    #[serde(default = "default_true")]
    pub dce: bool,
    /// Emit a note diagnostic for every applied rewrite.
    #[serde(default)]
    pub trace_rewrites: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            cse: true,
            dce: true,
            trace_rewrites: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_variadic_arity() -> usize {
    2
}

fn default_max_iterations() -> u32 {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SimplifyConfig::default();
        assert_eq!(config.verify.min_variadic_arity, 2);
        assert!(config.fold.enabled);
        assert!(config.fold.partial);
        assert!(config.canonicalize.enabled);
        assert_eq!(config.driver.max_iterations, 16);
        assert!(config.driver.cse);
        assert!(config.driver.dce);
        assert!(!config.driver.trace_rewrites);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: SimplifyConfig = toml::from_str("[fold]\npartial = false\n").unwrap();
        assert!(config.fold.enabled);
        assert!(!config.fold.partial);
        assert_eq!(config.driver, DriverConfig::default());
    }
}
