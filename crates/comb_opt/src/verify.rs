//! Whole-graph verification reported through diagnostics.

use crate::codes;
use comb_diagnostics::{Diagnostic, DiagnosticSink};
use comb_ir::{verify, Graph, IrError, VerifyOptions};

/// Re-verifies every live operation and checks the graph is acyclic.
///
/// Each failure is emitted as an `E1xx` error at the offending operation.
/// Returns `true` if nothing was reported.
pub fn verify_graph(graph: &Graph, options: &VerifyOptions, sink: &DiagnosticSink) -> bool {
    let mut ok = true;
    for (id, op) in graph.live_ops() {
        if let Err(err) = verify(op, graph, options) {
            sink.emit(
                Diagnostic::error(codes::for_error(&err), err.to_string())
                    .at_op(id.as_raw())
                    .with_note(op.to_string()),
            );
            ok = false;
        }
    }
    if let Err(err @ IrError::CyclicGraph(id)) = graph.topo_order() {
        sink.emit(Diagnostic::error(codes::MALFORMED, err.to_string()).at_op(id.as_raw()));
        ok = false;
    }
    ok
}
