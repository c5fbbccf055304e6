//! Common subexpression elimination pass.
//!
//! Two live operations with the same kind, operands, attributes and result
//! type compute the same value; the later one is merged into the earlier.
//! Running after canonicalization catches operands written in different orders.

use crate::codes;
use crate::pass::{OptPass, PassContext};
use comb_ir::{Graph, IrError, OpId, Operation, RewriteSink, Value};
use std::collections::HashMap;

/// Merges structurally identical operations.
pub struct CsePass;

impl OptPass for CsePass {
    fn name(&self) -> &'static str {
        "cse"
    }

    fn run(&self, graph: &mut Graph, ctx: &PassContext<'_>) -> Result<bool, IrError> {
        let mut changed = false;
        let mut seen: HashMap<Operation, OpId> = HashMap::new();

        // Topological order means a duplicate's operands were already merged.
        for id in graph.topo_order()? {
            let op = graph.op(id);
            if let Some(&existing) = seen.get(op) {
                graph.replace_all_uses(Value::Op(id), Value::Op(existing))?;
                graph.erase(id)?;
                ctx.record(codes::MERGED, id, format!("merged into %{}", existing.as_raw()));
                changed = true;
            } else {
                seen.insert(op.clone(), id);
            }
        }
        Ok(changed)
    }
}
