//! Dead operation elimination pass.
//!
//! Marks every operation reachable from an output, then erases the rest,
//! users before producers so each erased operation has no remaining uses.

use crate::codes;
use crate::pass::{OptPass, PassContext};
use comb_ir::{Graph, IrError, OpId};
use std::collections::HashSet;

/// Erases operations that no output depends on.
pub struct DcePass;

impl OptPass for DcePass {
    fn name(&self) -> &'static str {
        "dce"
    }

    fn run(&self, graph: &mut Graph, ctx: &PassContext<'_>) -> Result<bool, IrError> {
        let mut reachable: HashSet<OpId> = HashSet::new();
        let mut worklist: Vec<OpId> = graph
            .outputs()
            .iter()
            .filter_map(|output| output.value.op())
            .collect();
        while let Some(id) = worklist.pop() {
            if reachable.insert(id) {
                worklist.extend(graph.op(id).operands().iter().filter_map(|v| v.op()));
            }
        }

        let mut changed = false;
        for id in graph.topo_order()?.into_iter().rev() {
            if reachable.contains(&id) {
                continue;
            }
            graph.erase(id)?;
            ctx.record(codes::ERASED, id, format!("erased unused {}", graph.op(id).kind()));
            changed = true;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SimplifyOptions;
    use comb_common::BitVector;
    use comb_diagnostics::DiagnosticSink;
    use comb_ir::{BitVectorType, OpKind};

    #[test]
    fn erases_unreachable_chain() {
        let mut g = Graph::new();
        let x = g.add_input("x", BitVectorType::new(8).unwrap());
        let c = g.constant(&BitVector::from_u64(3, 8).unwrap()).unwrap();
        let kept = g.variadic(OpKind::Xor, vec![x, c]).unwrap();
        let dead = g.variadic(OpKind::Mul, vec![x, c]).unwrap();
        let dead_user = g.reduce(OpKind::OrReduce, dead).unwrap();
        g.add_output("y", kept).unwrap();

        let options = SimplifyOptions {
            trace_rewrites: true,
            ..SimplifyOptions::default()
        };
        let sink = DiagnosticSink::new();
        let ctx = PassContext::new(&options, &sink);
        assert!(DcePass.run(&mut g, &ctx).unwrap());
        assert!(!g.is_live(dead.op().unwrap()));
        assert!(!g.is_live(dead_user.op().unwrap()));
        assert!(g.is_live(c.op().unwrap()));
        assert_eq!(g.live_op_count(), 2);
        assert!(sink.contains_code(codes::ERASED));
        assert!(!DcePass.run(&mut g, &ctx).unwrap());
    }

    #[test]
    fn graph_without_outputs_empties() {
        let mut g = Graph::new();
        let c = g.constant(&BitVector::from_bool(true)).unwrap();
        g.reduce(OpKind::XorReduce, c).unwrap();

        let options = SimplifyOptions::default();
        let sink = DiagnosticSink::new();
        let ctx = PassContext::new(&options, &sink);
        assert!(DcePass.run(&mut g, &ctx).unwrap());
        assert_eq!(g.live_op_count(), 0);
    }
}
