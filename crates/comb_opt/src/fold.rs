//! Constant folding pass.
//!
//! Visits live operations in topological order so a folded operand is already
//! a constant by the time its users are examined.

use crate::codes;
use crate::pass::{OptPass, PassContext};
use comb_diagnostics::Diagnostic;
use comb_ir::{fold, FoldOutcome, Graph, IrError};

/// Replaces operations with what [`fold`] says they simplify to.
pub struct FoldPass;

impl OptPass for FoldPass {
    fn name(&self) -> &'static str {
        "fold"
    }

    fn run(&self, graph: &mut Graph, ctx: &PassContext<'_>) -> Result<bool, IrError> {
        let mut changed = false;
        for id in graph.topo_order()? {
            if !graph.is_live(id) {
                continue;
            }
            match fold(graph.op(id), &*graph, &ctx.options.fold) {
                FoldOutcome::Folded(replacement) => {
                    let message = format!("folded to {replacement}");
                    graph.replace_op(id, replacement)?;
                    ctx.record(codes::FOLDED, id, message);
                    changed = true;
                }
                FoldOutcome::Declined(err) if err.is_division_by_zero() => {
                    ctx.warn_once(
                        id,
                        Diagnostic::warning(codes::DIVISION_BY_ZERO, "division by constant zero")
                            .with_note(format!("{} is left unfolded", graph.op(id)))
                            .with_help("guard the divisor or select a value for the zero case"),
                    );
                }
                FoldOutcome::Declined(_) | FoldOutcome::Unchanged => {}
            }
        }
        Ok(changed)
    }
}
