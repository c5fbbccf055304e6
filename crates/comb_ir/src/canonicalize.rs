//! Canonical operand order for commutative variadic operations.
//!
//! The canonical form of `add`/`mul`/`and`/`or`/`xor` is: non-constant
//! operands sorted by [`Value`] order (duplicates removed for idempotent
//! kinds), followed by at most one constant. Structurally equal expressions
//! then share one spelling, which is what CSE relies on.

use crate::ids::Value;
use crate::op::Operation;
use crate::resolve::ValueResolver;
use crate::rewrite::{OpShape, Operand, Replacement};

/// Returns the canonical rewrite of `op`, or `None` if it is already canonical
/// or its kind has no canonical form.
///
/// Applying the replacement and canonicalizing the result again yields `None`.
pub fn canonicalize<R: ValueResolver + ?Sized>(
    op: &Operation,
    resolver: &R,
) -> Option<Replacement> {
    let algebra = op.kind().algebra()?;
    if !algebra.commutative {
        return None;
    }

    let mut values: Vec<Value> = Vec::with_capacity(op.operands().len());
    let mut constants: Vec<(Value, _)> = Vec::new();
    for &operand in op.operands() {
        match resolver.constant_value(operand) {
            Some(c) => constants.push((operand, c)),
            None => values.push(operand),
        }
    }

    values.sort();
    if algebra.idempotent {
        values.dedup();
    }

    let tail: Vec<Operand> = if constants.len() >= 2 {
        let merged = algebra
            .combine_all(constants.iter().map(|(_, c)| c))
            .ok()??;
        vec![Operand::Constant(merged)]
    } else {
        constants.iter().map(|&(v, _)| Operand::Value(v)).collect()
    };

    let canonical: Vec<Operand> = values.into_iter().map(Operand::Value).chain(tail).collect();
    let unchanged = canonical.len() == op.operands().len()
        && canonical
            .iter()
            .zip(op.operands())
            .all(|(new, &old)| new.as_value() == Some(old));
    if unchanged {
        return None;
    }

    Some(match canonical.as_slice() {
        [Operand::Value(v)] => Replacement::Value(*v),
        [Operand::Constant(c)] => Replacement::Constant(c.clone()),
        _ => Replacement::Op(OpShape::new(op.kind(), canonical, op.result_type())),
    })
}
