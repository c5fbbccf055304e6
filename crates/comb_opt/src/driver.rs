//! Runs the enabled passes to a fixpoint.

use crate::canonicalize::CanonicalizePass;
use crate::cse::CsePass;
use crate::dce::DcePass;
use crate::fold::FoldPass;
use crate::options::SimplifyOptions;
use crate::pass::{OptPass, PassContext};
use comb_diagnostics::DiagnosticSink;
use comb_ir::{Graph, IrError};
use rayon::prelude::*;

/// What one call to [`simplify`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    /// Pipeline iterations run.
    pub iterations: u32,
    /// Whether the last iteration changed nothing.
    pub converged: bool,
    /// Rewrites applied across all passes.
    pub rewrites: usize,
    /// Live operations before simplification.
    pub ops_before: usize,
    /// Live operations after simplification.
    pub ops_after: usize,
}

/// The enabled passes, in pipeline order: fold, canonicalize, CSE, DCE.
pub fn passes(options: &SimplifyOptions) -> Vec<Box<dyn OptPass>> {
    let mut passes: Vec<Box<dyn OptPass>> = Vec::new();
    if options.fold_enabled {
        passes.push(Box::new(FoldPass));
    }
    if options.canonicalize {
        passes.push(Box::new(CanonicalizePass));
    }
    if options.cse {
        passes.push(Box::new(CsePass));
    }
    if options.dce {
        passes.push(Box::new(DcePass));
    }
    passes
}

/// Simplifies `graph` in place.
///
/// Runs the pipeline until an iteration changes nothing or
/// `max_iterations` is reached. Graph outputs keep their values for every
/// input assignment.
pub fn simplify(
    graph: &mut Graph,
    options: &SimplifyOptions,
    sink: &DiagnosticSink,
) -> Result<SimplifyStats, IrError> {
    let pipeline = passes(options);
    let ctx = PassContext::new(options, sink);
    let mut stats = SimplifyStats {
        ops_before: graph.live_op_count(),
        ..SimplifyStats::default()
    };

    while stats.iterations < options.max_iterations {
        stats.iterations += 1;
        let mut changed = false;
        for pass in &pipeline {
            changed |= pass.run(graph, &ctx)?;
        }
        if !changed {
            stats.converged = true;
            break;
        }
    }

    stats.rewrites = ctx.rewrites();
    stats.ops_after = graph.live_op_count();
    Ok(stats)
}

/// Simplifies independent graphs in parallel.
///
/// Results line up with `graphs`; one graph failing does not stop the others.
pub fn simplify_all(
    graphs: &mut [Graph],
    options: &SimplifyOptions,
    sink: &DiagnosticSink,
) -> Vec<Result<SimplifyStats, IrError>> {
    graphs
        .par_iter_mut()
        .map(|graph| simplify(graph, options, sink))
        .collect()
}
