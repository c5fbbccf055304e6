//! Concrete evaluation of operations and whole graphs.
//!
//! The folder uses [`evaluate_op`] for operations whose operands are all
//! constant; [`evaluate`] runs a graph on an input assignment, which is how
//! tests check that rewrites preserve meaning.

use crate::catalog::Arity;
use crate::error::IrError;
use crate::graph::Graph;
use crate::ids::{InputId, OpId, Value};
use crate::op::{OpKind, Operation};
use comb_common::BitVector;
use std::collections::HashMap;

/// Computes the result of `op` given concrete operand values.
///
/// `args` must line up with `op.operands()`. Division or remainder by zero
/// fails with `BitVector(DivisionByZero)`.
pub fn evaluate_op(op: &Operation, args: &[BitVector]) -> Result<BitVector, IrError> {
    let kind = op.kind();
    let width = op.result_type().width();
    let arity = |expected| IrError::ArityError {
        kind,
        expected,
        found: args.len(),
    };
    let value = match kind {
        OpKind::Constant => op
            .constant_value()
            .ok_or(IrError::AttributeMismatch { kind })?,
        OpKind::Add | OpKind::Mul | OpKind::And | OpKind::Or | OpKind::Xor => {
            let algebra = kind
                .algebra()
                .ok_or(IrError::AttributeMismatch { kind })?;
            algebra
                .combine_all(args)?
                .ok_or_else(|| arity(Arity::AtLeast(1)))?
        }
        OpKind::Sub | OpKind::Div | OpKind::Mod => {
            let [lhs, rhs] = args else {
                return Err(arity(Arity::Exactly(2)));
            };
            match kind {
                OpKind::Sub => lhs.sub(rhs)?,
                OpKind::Div => lhs.udiv(rhs)?,
                _ => lhs.urem(rhs)?,
            }
        }
        OpKind::AndReduce | OpKind::OrReduce | OpKind::XorReduce => {
            let [input] = args else {
                return Err(arity(Arity::Exactly(1)));
            };
            match kind {
                OpKind::AndReduce => input.reduce_and(),
                OpKind::OrReduce => input.reduce_or(),
                _ => input.reduce_xor(),
            }
        }
        OpKind::Concat => {
            let (first, rest) = args
                .split_first()
                .ok_or_else(|| arity(Arity::AtLeast(1)))?;
            rest.iter().fold(first.clone(), |acc, low| acc.concat(low))
        }
        OpKind::Extract => {
            let [input] = args else {
                return Err(arity(Arity::Exactly(1)));
            };
            input.extract(op.low_bit().unwrap_or(0), width)?
        }
        OpKind::SignExtend | OpKind::ZeroExtend => {
            let [input] = args else {
                return Err(arity(Arity::Exactly(1)));
            };
            if kind == OpKind::SignExtend {
                input.sext(width)?
            } else {
                input.zext(width)?
            }
        }
    };
    Ok(value)
}

/// Evaluates every output of `graph` under the given input assignment.
///
/// Outputs are returned in declaration order. An input missing from `env`
/// fails with `UnknownValue`. A division by zero fails only the outputs that
/// depend on it; the first such failure is returned.
pub fn evaluate(
    graph: &Graph,
    env: &HashMap<InputId, BitVector>,
) -> Result<Vec<BitVector>, IrError> {
    let mut results: HashMap<OpId, Result<BitVector, IrError>> = HashMap::new();
    for id in graph.topo_order()? {
        let op = graph.op(id);
        let args = op
            .operands()
            .iter()
            .map(|&v| lookup(v, env, &results))
            .collect::<Result<Vec<_>, _>>();
        let result = args.and_then(|args| evaluate_op(op, &args));
        results.insert(id, result);
    }
    graph
        .outputs()
        .iter()
        .map(|output| lookup(output.value, env, &results))
        .collect()
}

fn lookup(
    value: Value,
    env: &HashMap<InputId, BitVector>,
    results: &HashMap<OpId, Result<BitVector, IrError>>,
) -> Result<BitVector, IrError> {
    match value {
        Value::Input(id) => env.get(&id).cloned().ok_or(IrError::UnknownValue(value)),
        Value::Op(id) => results
            .get(&id)
            .cloned()
            .unwrap_or(Err(IrError::UnknownValue(value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BitVectorType;

    fn bv(value: u64, width: u32) -> BitVector {
        BitVector::from_u64(value, width).unwrap()
    }

    fn ty(width: u32) -> BitVectorType {
        BitVectorType::new(width).unwrap()
    }

    #[test]
    fn evaluates_graph_outputs() {
        let mut g = Graph::new();
        let a = g.add_input("a", ty(8));
        let b = g.add_input("b", ty(8));
        let sum = g.variadic(OpKind::Add, vec![a, b]).unwrap();
        let low = g.extract(sum, 0, 4).unwrap();
        let wide = g.extend(OpKind::ZeroExtend, low, 8).unwrap();
        g.add_output("sum", sum).unwrap();
        g.add_output("low", wide).unwrap();

        let env = HashMap::from([
            (a.input().unwrap(), bv(0xf0, 8)),
            (b.input().unwrap(), bv(0x1f, 8)),
        ]);
        let out = evaluate(&g, &env).unwrap();
        assert_eq!(out, vec![bv(0x0f, 8), bv(0x0f, 8)]);
    }

    #[test]
    fn concat_puts_first_operand_high() {
        let mut g = Graph::new();
        let hi = g.constant(&bv(0b10, 2)).unwrap();
        let lo = g.constant(&bv(0b01, 2)).unwrap();
        let cat = g.concat(vec![hi, lo]).unwrap();
        g.add_output("y", cat).unwrap();
        assert_eq!(evaluate(&g, &HashMap::new()).unwrap(), vec![bv(0b1001, 4)]);
    }

    #[test]
    fn division_by_zero_fails_dependent_output() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(4));
        let zero = g.constant(&bv(0, 4)).unwrap();
        let q = g.binary(OpKind::Div, x, zero).unwrap();
        g.add_output("x", x).unwrap();
        g.add_output("q", q).unwrap();
        let env = HashMap::from([(x.input().unwrap(), bv(7, 4))]);
        assert!(evaluate(&g, &env).unwrap_err().is_division_by_zero());
    }

    #[test]
    fn missing_input() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(4));
        g.add_output("x", x).unwrap();
        assert_eq!(
            evaluate(&g, &HashMap::new()).unwrap_err(),
            IrError::UnknownValue(x)
        );
    }
}
