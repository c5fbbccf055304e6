//! Constant folding and local simplification.
//!
//! [`fold`] inspects one verified operation and, through the resolver, the
//! constants feeding it. It never edits anything: a successful fold is a
//! [`Replacement`] of the same type for the container to apply.

use crate::catalog::Algebra;
use crate::error::IrError;
use crate::eval::evaluate_op;
use crate::ids::Value;
use crate::op::{Attrs, OpKind, Operation};
use crate::resolve::ValueResolver;
use crate::rewrite::{OpShape, Operand, Replacement};
use comb_common::BitVector;

/// Folder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldOptions {
    /// Simplify variadic operations when only some operands are constant.
    pub partial: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self { partial: true }
    }
}

/// The result of attempting to fold one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldOutcome {
    /// The operation can be replaced.
    Folded(Replacement),
    /// No rule applies.
    Unchanged,
    /// A rule applied but evaluation failed, e.g. division by a constant zero.
    /// The operation must stay as it is.
    Declined(IrError),
}

impl FoldOutcome {
    /// The replacement, if the fold succeeded.
    pub fn into_replacement(self) -> Option<Replacement> {
        match self {
            FoldOutcome::Folded(replacement) => Some(replacement),
            FoldOutcome::Unchanged | FoldOutcome::Declined(_) => None,
        }
    }
}

impl From<Result<BitVector, IrError>> for FoldOutcome {
    fn from(result: Result<BitVector, IrError>) -> Self {
        match result {
            Ok(value) => FoldOutcome::Folded(Replacement::Constant(value)),
            Err(err) => FoldOutcome::Declined(err),
        }
    }
}

/// Folds with default options, discarding the reason for a declined fold.
pub fn try_fold<R: ValueResolver + ?Sized>(op: &Operation, resolver: &R) -> Option<Replacement> {
    fold(op, resolver, &FoldOptions::default()).into_replacement()
}

/// Attempts to simplify `op` given what the resolver knows about its operands.
pub fn fold<R: ValueResolver + ?Sized>(
    op: &Operation,
    resolver: &R,
    options: &FoldOptions,
) -> FoldOutcome {
    let operands = op.operands();
    let constants: Vec<Option<BitVector>> = operands
        .iter()
        .map(|&v| resolver.constant_value(v))
        .collect();
    let all_constant = constants.iter().all(Option::is_some);

    match op.kind() {
        OpKind::Constant => FoldOutcome::Unchanged,

        OpKind::Add | OpKind::Mul | OpKind::And | OpKind::Or | OpKind::Xor => {
            match op.kind().algebra() {
                Some(algebra) => fold_variadic(op, &algebra, &constants, options),
                None => FoldOutcome::Unchanged,
            }
        }

        OpKind::Sub => {
            if all_constant {
                return evaluate_constant(op, &constants);
            }
            match (operands, constants.as_slice()) {
                ([lhs, _], [_, Some(rhs)]) if rhs.is_zero() => {
                    FoldOutcome::Folded(Replacement::Value(*lhs))
                }
                ([lhs, rhs], _) if lhs == rhs => zero_of(op),
                _ => FoldOutcome::Unchanged,
            }
        }

        OpKind::Div | OpKind::Mod => {
            let divisor = constants.get(1).and_then(Option::as_ref);
            if divisor.is_some_and(BitVector::is_zero) {
                return FoldOutcome::Declined(comb_common::BitVecError::DivisionByZero.into());
            }
            if all_constant {
                return evaluate_constant(op, &constants);
            }
            match (op.kind(), operands, divisor) {
                (OpKind::Div, [lhs, _], Some(d)) if d.is_one() => {
                    FoldOutcome::Folded(Replacement::Value(*lhs))
                }
                (OpKind::Mod, _, Some(d)) if d.is_one() => zero_of(op),
                _ => FoldOutcome::Unchanged,
            }
        }

        OpKind::AndReduce | OpKind::OrReduce | OpKind::XorReduce => {
            if all_constant {
                return evaluate_constant(op, &constants);
            }
            match operands {
                [input] if resolver.value_type(*input).map(|t| t.width()) == Some(1) => {
                    FoldOutcome::Folded(Replacement::Value(*input))
                }
                _ => FoldOutcome::Unchanged,
            }
        }

        OpKind::Concat => {
            if let [single] = operands {
                return FoldOutcome::Folded(Replacement::Value(*single));
            }
            if all_constant {
                return evaluate_constant(op, &constants);
            }
            FoldOutcome::Unchanged
        }

        OpKind::Extract => {
            if all_constant {
                return evaluate_constant(op, &constants);
            }
            fold_extract(op, resolver)
        }

        OpKind::SignExtend | OpKind::ZeroExtend => {
            if all_constant {
                return evaluate_constant(op, &constants);
            }
            FoldOutcome::Unchanged
        }
    }
}

fn evaluate_constant(op: &Operation, constants: &[Option<BitVector>]) -> FoldOutcome {
    let args: Vec<BitVector> = constants.iter().flatten().cloned().collect();
    evaluate_op(op, &args).into()
}

fn zero_of(op: &Operation) -> FoldOutcome {
    BitVector::zero(op.result_type().width())
        .map_err(IrError::from)
        .into()
}

/// The generic rule set shared by add, mul, and, or and xor.
fn fold_variadic(
    op: &Operation,
    algebra: &Algebra,
    constants: &[Option<BitVector>],
    options: &FoldOptions,
) -> FoldOutcome {
    if let [single] = op.operands() {
        return FoldOutcome::Folded(Replacement::Value(*single));
    }

    let mut known = Vec::new();
    let mut rest = Vec::new();
    for (&value, constant) in op.operands().iter().zip(constants) {
        match constant {
            Some(c) => known.push(c.clone()),
            None => rest.push(value),
        }
    }

    let merged = match algebra.combine_all(&known) {
        Ok(Some(merged)) => merged,
        Ok(None) => return FoldOutcome::Unchanged,
        Err(err) => return FoldOutcome::Declined(err.into()),
    };
    if rest.is_empty() {
        return FoldOutcome::Folded(Replacement::Constant(merged));
    }
    if !options.partial {
        return FoldOutcome::Unchanged;
    }

    if algebra.absorbing.is_some_and(|e| e.matches(&merged)) {
        return FoldOutcome::Folded(Replacement::Constant(merged));
    }
    if algebra.identity.matches(&merged) {
        return match rest.as_slice() {
            [only] => FoldOutcome::Folded(Replacement::Value(*only)),
            _ => FoldOutcome::Folded(Replacement::Op(rebuild(op, rest, None))),
        };
    }
    if known.len() >= 2 {
        return FoldOutcome::Folded(Replacement::Op(rebuild(op, rest, Some(merged))));
    }
    FoldOutcome::Unchanged
}

fn rebuild(op: &Operation, rest: Vec<Value>, constant: Option<BitVector>) -> OpShape {
    let operands = rest
        .into_iter()
        .map(Operand::Value)
        .chain(constant.map(Operand::Constant))
        .collect();
    OpShape::new(op.kind(), operands, op.result_type())
}

fn fold_extract<R: ValueResolver + ?Sized>(op: &Operation, resolver: &R) -> FoldOutcome {
    let (Some(low_bit), [input]) = (op.low_bit(), op.operands()) else {
        return FoldOutcome::Unchanged;
    };
    let width = op.result_type().width();

    if low_bit == 0 && resolver.value_type(*input).map(|t| t.width()) == Some(width) {
        return FoldOutcome::Folded(Replacement::Value(*input));
    }

    // extract(extract(x, a), b) == extract(x, a + b)
    if let Some(inner) = resolver.defining_op(*input) {
        if let (OpKind::Extract, Some(inner_low), [source]) =
            (inner.kind(), inner.low_bit(), inner.operands())
        {
            if let Some(low_bit) = inner_low.checked_add(low_bit) {
                return FoldOutcome::Folded(Replacement::Op(OpShape {
                    kind: OpKind::Extract,
                    operands: vec![Operand::Value(*source)],
                    attrs: Attrs::Extract { low_bit },
                    result_ty: op.result_type(),
                }));
            }
        }
    }
    FoldOutcome::Unchanged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::types::BitVectorType;
    use comb_common::BitVecError;

    fn bv(value: u64, width: u32) -> BitVector {
        BitVector::from_u64(value, width).unwrap()
    }

    fn ty(width: u32) -> BitVectorType {
        BitVectorType::new(width).unwrap()
    }

    fn fold_value(g: &Graph, v: Value) -> FoldOutcome {
        fold(g.op(v.op().unwrap()), g, &FoldOptions::default())
    }

    fn folded(replacement: Replacement) -> FoldOutcome {
        FoldOutcome::Folded(replacement)
    }

    #[test]
    fn constant_never_folds() {
        let mut g = Graph::new();
        let c = g.constant(&bv(42, 8)).unwrap();
        assert_eq!(fold_value(&g, c), FoldOutcome::Unchanged);
        assert_eq!(try_fold(g.op(c.op().unwrap()), &g), None);
    }

    #[test]
    fn adds_constants() {
        let mut g = Graph::new();
        let a = g.constant(&bv(3, 8)).unwrap();
        let b = g.constant(&bv(5, 8)).unwrap();
        let sum = g.variadic(OpKind::Add, vec![a, b]).unwrap();
        assert_eq!(fold_value(&g, sum), folded(Replacement::Constant(bv(8, 8))));
    }

    #[test]
    fn variadic_wraps() {
        let mut g = Graph::new();
        let a = g.constant(&bv(200, 8)).unwrap();
        let b = g.constant(&bv(100, 8)).unwrap();
        let product = g.variadic(OpKind::Mul, vec![a, b, b]).unwrap();
        let expected = (200u64 * 100 * 100) % 256;
        assert_eq!(
            fold_value(&g, product),
            folded(Replacement::Constant(bv(expected, 8)))
        );
    }

    #[test]
    fn absorbing_constant_wins() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(8));
        let zero = g.constant(&bv(0, 8)).unwrap();
        let and = g.variadic(OpKind::And, vec![x, zero]).unwrap();
        assert_eq!(fold_value(&g, and), folded(Replacement::Constant(bv(0, 8))));
        let ones = g.constant(&bv(0xff, 8)).unwrap();
        let or = g.variadic(OpKind::Or, vec![ones, x]).unwrap();
        assert_eq!(fold_value(&g, or), folded(Replacement::Constant(bv(0xff, 8))));
    }

    #[test]
    fn identity_constant_drops_out() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(8));
        let y = g.add_input("y", ty(8));
        let zero = g.constant(&bv(0, 8)).unwrap();
        let one = g.constant(&bv(1, 8)).unwrap();
        let add = g.variadic(OpKind::Add, vec![x, zero]).unwrap();
        assert_eq!(fold_value(&g, add), folded(Replacement::Value(x)));

        let mul = g.variadic(OpKind::Mul, vec![x, one, y]).unwrap();
        let expected = OpShape::new(
            OpKind::Mul,
            vec![Operand::Value(x), Operand::Value(y)],
            ty(8),
        );
        assert_eq!(fold_value(&g, mul), folded(Replacement::Op(expected)));
    }

    #[test]
    fn merges_several_constants() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(8));
        let a = g.constant(&bv(3, 8)).unwrap();
        let b = g.constant(&bv(4, 8)).unwrap();
        let xor = g.variadic(OpKind::Xor, vec![a, x, b]).unwrap();
        let expected = OpShape::new(
            OpKind::Xor,
            vec![Operand::Value(x), Operand::Constant(bv(7, 8))],
            ty(8),
        );
        assert_eq!(fold_value(&g, xor), folded(Replacement::Op(expected)));
    }

    #[test]
    fn single_plain_constant_is_left_alone() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(8));
        let c = g.constant(&bv(9, 8)).unwrap();
        let add = g.variadic(OpKind::Add, vec![x, c]).unwrap();
        assert_eq!(fold_value(&g, add), FoldOutcome::Unchanged);
    }

    #[test]
    fn partial_folding_can_be_disabled() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(8));
        let zero = g.constant(&bv(0, 8)).unwrap();
        let add = g.variadic(OpKind::Add, vec![x, zero]).unwrap();
        let strict = FoldOptions { partial: false };
        assert_eq!(
            fold(g.op(add.op().unwrap()), &g, &strict),
            FoldOutcome::Unchanged
        );
    }

    #[test]
    fn subtraction_rules() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(4));
        let zero = g.constant(&bv(0, 4)).unwrap();
        let three = g.constant(&bv(3, 4)).unwrap();
        let five = g.constant(&bv(5, 4)).unwrap();
        let minus_zero = g.binary(OpKind::Sub, x, zero).unwrap();
        let self_sub = g.binary(OpKind::Sub, x, x).unwrap();
        let wrap = g.binary(OpKind::Sub, three, five).unwrap();
        assert_eq!(fold_value(&g, minus_zero), folded(Replacement::Value(x)));
        assert_eq!(fold_value(&g, self_sub), folded(Replacement::Constant(bv(0, 4))));
        assert_eq!(fold_value(&g, wrap), folded(Replacement::Constant(bv(14, 4))));
    }

    #[test]
    fn division_by_zero_is_declined() {
        let mut g = Graph::new();
        let seven = g.constant(&bv(7, 4)).unwrap();
        let zero = g.constant(&bv(0, 4)).unwrap();
        let x = g.add_input("x", ty(4));
        for kind in [OpKind::Div, OpKind::Mod] {
            for lhs in [seven, x] {
                let op = g.binary(kind, lhs, zero).unwrap();
                assert_eq!(
                    fold_value(&g, op),
                    FoldOutcome::Declined(IrError::BitVector(BitVecError::DivisionByZero))
                );
                assert_eq!(try_fold(g.op(op.op().unwrap()), &g), None);
            }
        }
    }

    #[test]
    fn division_rules() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(4));
        let one = g.constant(&bv(1, 4)).unwrap();
        let seven = g.constant(&bv(7, 4)).unwrap();
        let two = g.constant(&bv(2, 4)).unwrap();
        let div_one = g.binary(OpKind::Div, x, one).unwrap();
        let mod_one = g.binary(OpKind::Mod, x, one).unwrap();
        let q = g.binary(OpKind::Div, seven, two).unwrap();
        let r = g.binary(OpKind::Mod, seven, two).unwrap();
        assert_eq!(fold_value(&g, div_one), folded(Replacement::Value(x)));
        assert_eq!(fold_value(&g, mod_one), folded(Replacement::Constant(bv(0, 4))));
        assert_eq!(fold_value(&g, q), folded(Replacement::Constant(bv(3, 4))));
        assert_eq!(fold_value(&g, r), folded(Replacement::Constant(bv(1, 4))));
    }

    #[test]
    fn reductions() {
        let mut g = Graph::new();
        let c = g.constant(&bv(0b0111, 4)).unwrap();
        let bit = g.add_input("b", ty(1));
        let wide = g.add_input("w", ty(4));
        let parity = g.reduce(OpKind::XorReduce, c).unwrap();
        let all = g.reduce(OpKind::AndReduce, c).unwrap();
        let trivial = g.reduce(OpKind::OrReduce, bit).unwrap();
        let opaque = g.reduce(OpKind::OrReduce, wide).unwrap();
        assert_eq!(fold_value(&g, parity), folded(Replacement::Constant(bv(1, 1))));
        assert_eq!(fold_value(&g, all), folded(Replacement::Constant(bv(0, 1))));
        assert_eq!(fold_value(&g, trivial), folded(Replacement::Value(bit)));
        assert_eq!(fold_value(&g, opaque), FoldOutcome::Unchanged);
    }

    #[test]
    fn concat_rules() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(4));
        let hi = g.constant(&bv(0xa, 4)).unwrap();
        let lo = g.constant(&bv(0x5, 4)).unwrap();
        let single = g.concat(vec![x]).unwrap();
        let both = g.concat(vec![hi, lo]).unwrap();
        let mixed = g.concat(vec![hi, x]).unwrap();
        assert_eq!(fold_value(&g, single), folded(Replacement::Value(x)));
        assert_eq!(fold_value(&g, both), folded(Replacement::Constant(bv(0xa5, 8))));
        assert_eq!(fold_value(&g, mixed), FoldOutcome::Unchanged);
    }

    #[test]
    fn extract_rules() {
        let mut g = Graph::new();
        let x = g.add_input("x", ty(16));
        let c = g.constant(&bv(0b1011_0100, 8)).unwrap();
        let bits = g.extract(c, 2, 4).unwrap();
        let whole = g.extract(x, 0, 16).unwrap();
        let outer = g.extract(x, 4, 8).unwrap();
        let nested = g.extract(outer, 3, 2).unwrap();
        assert_eq!(fold_value(&g, bits), folded(Replacement::Constant(bv(0b1101, 4))));
        assert_eq!(fold_value(&g, whole), folded(Replacement::Value(x)));
        let expected = OpShape {
            kind: OpKind::Extract,
            operands: vec![Operand::Value(x)],
            attrs: Attrs::Extract { low_bit: 7 },
            result_ty: ty(2),
        };
        assert_eq!(fold_value(&g, nested), folded(Replacement::Op(expected)));
        assert_eq!(fold_value(&g, outer), FoldOutcome::Unchanged);
    }

    #[test]
    fn extensions() {
        let mut g = Graph::new();
        let c = g.constant(&bv(0b1010, 4)).unwrap();
        let z = g.extend(OpKind::ZeroExtend, c, 8).unwrap();
        let s = g.extend(OpKind::SignExtend, c, 8).unwrap();
        assert_eq!(fold_value(&g, z), folded(Replacement::Constant(bv(0b0000_1010, 8))));
        assert_eq!(fold_value(&g, s), folded(Replacement::Constant(bv(0b1111_1010, 8))));
    }

    #[test]
    fn single_operand_variadic_folds_to_operand() {
        let mut g = Graph::with_options(crate::verify::VerifyOptions {
            min_variadic_arity: 1,
        });
        let x = g.add_input("x", ty(8));
        let and = g.variadic(OpKind::And, vec![x]).unwrap();
        assert_eq!(fold_value(&g, and), folded(Replacement::Value(x)));
    }
}
