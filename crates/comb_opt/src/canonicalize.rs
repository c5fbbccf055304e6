//! Canonicalization pass.

use crate::codes;
use crate::pass::{OptPass, PassContext};
use comb_ir::{canonicalize, Graph, IrError};

/// Rewrites commutative variadic operations into canonical operand order.
pub struct CanonicalizePass;

impl OptPass for CanonicalizePass {
    fn name(&self) -> &'static str {
        "canonicalize"
    }

    fn run(&self, graph: &mut Graph, ctx: &PassContext<'_>) -> Result<bool, IrError> {
        let mut changed = false;
        for id in graph.topo_order()? {
            if !graph.is_live(id) {
                continue;
            }
            if let Some(replacement) = canonicalize(graph.op(id), &*graph) {
                let message = format!("canonicalized to {replacement}");
                graph.replace_op(id, replacement)?;
                ctx.record(codes::CANONICALIZED, id, message);
                changed = true;
            }
        }
        Ok(changed)
    }
}
