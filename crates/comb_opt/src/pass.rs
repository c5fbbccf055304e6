//! The pass trait and the state shared by passes during one simplification.

use crate::options::SimplifyOptions;
use comb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use comb_ir::{Graph, IrError, OpId};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// One rewriting pass over a graph.
///
/// A pass returns `true` if it changed the graph, which tells the driver that
/// another iteration may find more to do.
pub trait OptPass {
    /// A short name for the pass.
    fn name(&self) -> &'static str;

    /// Runs the pass once over every live operation.
    fn run(&self, graph: &mut Graph, ctx: &PassContext<'_>) -> Result<bool, IrError>;
}

/// Per-graph state handed to every pass.
pub struct PassContext<'a> {
    /// The driver settings.
    pub options: &'a SimplifyOptions,
    /// Where diagnostics go.
    pub sink: &'a DiagnosticSink,
    rewrites: Cell<usize>,
    warned: RefCell<HashSet<OpId>>,
}

impl<'a> PassContext<'a> {
    /// Creates a context for one graph.
    pub fn new(options: &'a SimplifyOptions, sink: &'a DiagnosticSink) -> Self {
        Self {
            options,
            sink,
            rewrites: Cell::new(0),
            warned: RefCell::new(HashSet::new()),
        }
    }

    /// Counts an applied rewrite, tracing it when enabled.
    pub fn record(&self, code: DiagnosticCode, op: OpId, message: impl Into<String>) {
        self.rewrites.set(self.rewrites.get() + 1);
        if self.options.trace_rewrites {
            self.sink.emit(Diagnostic::note(code, message).at_op(op.as_raw()));
        }
    }

    /// Emits a warning about `op` unless one was already emitted for it.
    pub fn warn_once(&self, op: OpId, diag: Diagnostic) {
        if self.warned.borrow_mut().insert(op) {
            self.sink.emit(diag.at_op(op.as_raw()));
        }
    }

    /// Rewrites applied so far.
    pub fn rewrites(&self) -> usize {
        self.rewrites.get()
    }
}
