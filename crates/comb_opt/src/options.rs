//! Driver settings, usually derived from a `comb.toml`.

use comb_config::SimplifyConfig;
use comb_ir::{FoldOptions, VerifyOptions};

/// Which passes run and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Verifier settings used by [`verify_graph`](crate::verify_graph).
    pub verify: VerifyOptions,
    /// Folder settings.
    pub fold: FoldOptions,
    /// Run the fold pass.
    pub fold_enabled: bool,
    /// Run the canonicalize pass.
    pub canonicalize: bool,
    /// Run common subexpression elimination.
    pub cse: bool,
    /// Run dead operation elimination.
    pub dce: bool,
    /// Upper bound on pass-pipeline iterations.
    pub max_iterations: u32,
    /// Emit an `R`-coded note for every applied rewrite.
    pub trace_rewrites: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self::from(&SimplifyConfig::default())
    }
}

impl From<&SimplifyConfig> for SimplifyOptions {
    fn from(config: &SimplifyConfig) -> Self {
        Self {
            verify: VerifyOptions {
                min_variadic_arity: config.verify.min_variadic_arity,
            },
            fold: FoldOptions {
                partial: config.fold.partial,
            },
            fold_enabled: config.fold.enabled,
            canonicalize: config.canonicalize.enabled,
            cse: config.driver.cse,
            dce: config.driver.dce,
            max_iterations: config.driver.max_iterations,
            trace_rewrites: config.driver.trace_rewrites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comb_config::load_config_from_str;

    #[test]
    fn defaults_enable_everything() {
        let options = SimplifyOptions::default();
        assert!(options.fold_enabled && options.canonicalize && options.cse && options.dce);
        assert!(options.fold.partial);
        assert_eq!(options.verify.min_variadic_arity, 2);
        assert_eq!(options.max_iterations, 16);
        assert!(!options.trace_rewrites);
    }

    #[test]
    fn from_config_file() {
        let config = load_config_from_str(
            r#"
[verify]
min_variadic_arity = 1

[fold]
partial = false

[driver]
max_iterations = 3
dce = false
trace_rewrites = true
"#,
        )
        .unwrap();
        let options = SimplifyOptions::from(&config);
        assert_eq!(options.verify.min_variadic_arity, 1);
        assert!(!options.fold.partial);
        assert!(options.fold_enabled);
        assert_eq!(options.max_iterations, 3);
        assert!(!options.dce);
        assert!(options.cse);
        assert!(options.trace_rewrites);
    }
}
