//! A reference container for combinational graphs.
//!
//! [`Graph`] owns operations in an [`Arena`], keeps a use list per value, and
//! implements [`ValueResolver`] and [`RewriteSink`] so the folder and
//! canonicalizer can run against it. Replaced operations are marked dead
//! rather than removed, which keeps every handle stable.

use crate::arena::Arena;
use crate::builder::OpBuilder;
use crate::error::IrError;
use crate::ids::{InputId, OpId, Value};
use crate::op::{Attrs, OpKind, Operation};
use crate::resolve::{RewriteSink, ValueResolver};
use crate::rewrite::{Operand, Replacement};
use crate::types::BitVectorType;
use crate::verify::{verify, VerifyOptions};
use comb_common::{BitVector, Ident, Interner};
use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// A named external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    /// Interned name.
    pub name: Ident,
    /// Declared type.
    pub ty: BitVectorType,
}

/// A named graph output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    /// Interned name.
    pub name: Ident,
    /// The value driving the output.
    pub value: Value,
}

/// One place a value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Use {
    /// Operand `index` of operation `op`.
    Operand {
        /// The reading operation.
        op: OpId,
        /// Position in its operand list.
        index: usize,
    },
    /// Output number `n`.
    Output(usize),
}

/// A combinational graph: inputs, operations and outputs.
#[derive(Debug)]
pub struct Graph {
    ops: Arena<OpId, Operation>,
    live: Vec<bool>,
    inputs: Arena<InputId, Input>,
    outputs: Vec<Output>,
    uses: HashMap<Value, Vec<Use>>,
    names: Interner,
    options: VerifyOptions,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph with default verifier options.
    pub fn new() -> Self {
        Self::with_options(VerifyOptions::default())
    }

    /// Creates an empty graph whose operations are verified with `options`.
    pub fn with_options(options: VerifyOptions) -> Self {
        Self {
            ops: Arena::new(),
            live: Vec::new(),
            inputs: Arena::new(),
            outputs: Vec::new(),
            uses: HashMap::new(),
            names: Interner::new(),
            options,
        }
    }

    /// The verifier options every operation is built with.
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Declares an external input.
    pub fn add_input(&mut self, name: &str, ty: BitVectorType) -> Value {
        let name = self.names.get_or_intern(name);
        Value::Input(self.inputs.alloc(Input { name, ty }))
    }

    /// Declares an output driven by `value`.
    pub fn add_output(&mut self, name: &str, value: Value) -> Result<(), IrError> {
        self.check_live(value)?;
        let index = self.outputs.len();
        let name = self.names.get_or_intern(name);
        self.outputs.push(Output { name, value });
        self.uses.entry(value).or_default().push(Use::Output(index));
        Ok(())
    }

    /// Builds, verifies and inserts an operation, returning its result.
    pub fn build(
        &mut self,
        kind: OpKind,
        operands: Vec<Value>,
        attrs: Attrs,
        result_ty: Option<BitVectorType>,
    ) -> Result<Value, IrError> {
        let op = OpBuilder::with_options(&*self, self.options)
            .build(kind, operands, attrs, result_ty)?;
        self.insert(op)
    }

    /// Inserts an operation built elsewhere.
    ///
    /// The operation is verified again against this graph, so one built
    /// against another resolver cannot enter with mismatched operand types.
    pub fn insert(&mut self, op: Operation) -> Result<Value, IrError> {
        verify(&op, &*self, &self.options)?;
        let id = self.ops.next_id();
        for (index, &operand) in op.operands().iter().enumerate() {
            self.uses
                .entry(operand)
                .or_default()
                .push(Use::Operand { op: id, index });
        }
        self.ops.alloc(op);
        self.live.push(true);
        Ok(Value::Op(id))
    }

    /// Inserts a constant.
    pub fn constant(&mut self, value: &BitVector) -> Result<Value, IrError> {
        let op = OpBuilder::with_options(&*self, self.options).constant(value)?;
        self.insert(op)
    }

    /// Inserts an add/mul/and/or/xor.
    pub fn variadic(&mut self, kind: OpKind, operands: Vec<Value>) -> Result<Value, IrError> {
        self.build(kind, operands, Attrs::None, None)
    }

    /// Inserts a sub/div/mod.
    pub fn binary(&mut self, kind: OpKind, lhs: Value, rhs: Value) -> Result<Value, IrError> {
        self.build(kind, vec![lhs, rhs], Attrs::None, None)
    }

    /// Inserts a reduction.
    pub fn reduce(&mut self, kind: OpKind, input: Value) -> Result<Value, IrError> {
        self.build(kind, vec![input], Attrs::None, None)
    }

    /// Inserts a concatenation; the first operand is the most significant.
    pub fn concat(&mut self, operands: Vec<Value>) -> Result<Value, IrError> {
        self.build(OpKind::Concat, operands, Attrs::None, None)
    }

    /// Inserts an extract of `width` bits starting at `low_bit`.
    pub fn extract(&mut self, input: Value, low_bit: u32, width: u32) -> Result<Value, IrError> {
        let op = OpBuilder::with_options(&*self, self.options).extract(input, low_bit, width)?;
        self.insert(op)
    }

    /// Inserts a sign or zero extension to `width` bits.
    pub fn extend(&mut self, kind: OpKind, input: Value, width: u32) -> Result<Value, IrError> {
        let op = OpBuilder::with_options(&*self, self.options).extend(kind, input, width)?;
        self.insert(op)
    }

    /// Turns a replacement into a value in this graph, building any pending
    /// constants and operations. New operations are verified as usual.
    pub fn materialize(&mut self, replacement: Replacement) -> Result<Value, IrError> {
        match replacement {
            Replacement::Value(value) => {
                self.check_live(value)?;
                Ok(value)
            }
            Replacement::Constant(value) => self.constant(&value),
            Replacement::Op(shape) => {
                let mut operands = Vec::with_capacity(shape.operands.len());
                for operand in shape.operands {
                    operands.push(match operand {
                        Operand::Value(value) => value,
                        Operand::Constant(value) => self.constant(&value)?,
                    });
                }
                self.build(shape.kind, operands, shape.attrs, Some(shape.result_ty))
            }
        }
    }

    /// Replaces operation `id` with `replacement`: materializes it, moves every
    /// use over, and erases `id`. Returns the value now standing in for `id`.
    pub fn replace_op(&mut self, id: OpId, replacement: Replacement) -> Result<Value, IrError> {
        let old = Value::Op(id);
        self.check_live(old)?;
        let new = self.materialize(replacement)?;
        if new != old {
            self.replace_all_uses(old, new)?;
            self.erase(id)?;
        }
        Ok(new)
    }

    /// Erases an operation with no remaining uses.
    pub fn erase(&mut self, id: OpId) -> Result<(), IrError> {
        let value = Value::Op(id);
        self.check_live(value)?;
        if !self.uses(value).is_empty() {
            return Err(IrError::OperationInUse(id));
        }
        for (index, &operand) in self.ops[id].operands().iter().enumerate() {
            if let Some(list) = self.uses.get_mut(&operand) {
                list.retain(|u| *u != Use::Operand { op: id, index });
            }
        }
        self.uses.remove(&value);
        self.live[id.as_raw() as usize] = false;
        Ok(())
    }

    /// Returns `true` if `id` names an operation that has not been erased.
    pub fn is_live(&self, id: OpId) -> bool {
        self.live.get(id.as_raw() as usize).copied().unwrap_or(false)
    }

    /// The operation for a handle, live or not.
    ///
    /// # Panics
    ///
    /// Panics if the handle was never allocated by this graph.
    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id]
    }

    /// Iterates over live operations in allocation order.
    pub fn live_ops(&self) -> impl Iterator<Item = (OpId, &Operation)> {
        self.ops.iter().filter(|(id, _)| self.is_live(*id))
    }

    /// Number of live operations.
    pub fn live_op_count(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }

    /// Every place `value` is read.
    pub fn uses(&self, value: Value) -> &[Use] {
        self.uses.get(&value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declared inputs.
    pub fn inputs(&self) -> impl Iterator<Item = (InputId, &Input)> {
        self.inputs.iter()
    }

    /// The declared outputs, in order.
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The name of an interned identifier.
    pub fn name(&self, ident: Ident) -> &str {
        self.names.resolve(ident)
    }

    /// Live operations ordered so every operation follows its operands.
    ///
    /// Among operations that are ready at the same time the lowest id comes
    /// first, so allocation order is kept whenever it is already topological.
    pub fn topo_order(&self) -> Result<Vec<OpId>, IrError> {
        let mut deps: DiGraphMap<OpId, ()> = DiGraphMap::new();
        for (id, op) in self.live_ops() {
            deps.add_node(id);
            for producer in op.operands().iter().filter_map(|v| v.op()) {
                deps.add_edge(producer, id, ());
            }
        }

        let mut pending: HashMap<OpId, usize> = deps
            .nodes()
            .map(|id| (id, deps.neighbors_directed(id, Direction::Incoming).count()))
            .collect();
        let mut ready: BinaryHeap<Reverse<OpId>> = pending
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();
        let mut order = Vec::with_capacity(pending.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            for user in deps.neighbors_directed(id, Direction::Outgoing) {
                if let Some(count) = pending.get_mut(&user) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(Reverse(user));
                    }
                }
            }
        }

        let stuck = pending
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(id, _)| id)
            .min();
        match stuck {
            Some(id) => Err(IrError::CyclicGraph(id)),
            None => Ok(order),
        }
    }

    fn check_live(&self, value: Value) -> Result<(), IrError> {
        let known = match value {
            Value::Input(id) => self.inputs.contains(id),
            Value::Op(id) => self.is_live(id),
        };
        if known {
            Ok(())
        } else {
            Err(IrError::UnknownValue(value))
        }
    }
}

impl ValueResolver for Graph {
    fn value_type(&self, value: Value) -> Option<BitVectorType> {
        match value {
            Value::Input(id) => self.inputs.try_get(id).map(|input| input.ty),
            Value::Op(_) => self.defining_op(value).map(Operation::result_type),
        }
    }

    fn defining_op(&self, value: Value) -> Option<&Operation> {
        let id = value.op()?;
        self.is_live(id).then(|| &self.ops[id])
    }
}

impl RewriteSink for Graph {
    fn replace_all_uses(&mut self, from: Value, to: Value) -> Result<usize, IrError> {
        if from == to {
            return Ok(0);
        }
        let from_ty = self.value_type(from).ok_or(IrError::UnknownValue(from))?;
        let to_ty = self.value_type(to).ok_or(IrError::UnknownValue(to))?;
        if from_ty != to_ty {
            return Err(IrError::ReplacementTypeMismatch { from, to });
        }

        let moved = self.uses.remove(&from).unwrap_or_default();
        for u in &moved {
            match *u {
                Use::Operand { op, index } => self.ops[op].set_operand(index, to),
                Use::Output(n) => self.outputs[n].value = to,
            }
        }
        let count = moved.len();
        self.uses.entry(to).or_default().extend(moved);
        Ok(count)
    }
}
