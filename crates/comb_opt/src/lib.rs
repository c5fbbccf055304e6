//! Simplification passes for combinational bit-vector graphs.
//!
//! The core queries in `comb_ir` ([`fold`](comb_ir::fold) and
//! [`canonicalize`](comb_ir::canonicalize)) only describe rewrites. This
//! crate applies them to a [`Graph`](comb_ir::Graph), together with common
//! subexpression elimination and dead operation elimination, iterating until
//! nothing changes. Progress and declined rewrites are reported through a
//! [`DiagnosticSink`](comb_diagnostics::DiagnosticSink).

#![warn(missing_docs)]

pub mod canonicalize;
pub mod codes;
pub mod cse;
pub mod dce;
pub mod driver;
pub mod fold;
pub mod options;
pub mod pass;
pub mod verify;

pub use canonicalize::CanonicalizePass;
pub use cse::CsePass;
pub use dce::DcePass;
pub use driver::{passes, simplify, simplify_all, SimplifyStats};
pub use fold::FoldPass;
pub use options::SimplifyOptions;
pub use pass::{OptPass, PassContext};
pub use verify::verify_graph;
