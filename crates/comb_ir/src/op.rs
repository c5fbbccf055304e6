//! Operation kinds, attributes, and the verified [`Operation`] node.

use crate::ids::Value;
use crate::types::BitVectorType;
use comb_common::BitVector;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of combinational operation kinds.
///
/// Verifier, folder, canonicalizer and evaluator each dispatch on this enum
/// with an exhaustive `match`, so adding a kind fails to compile until every
/// one of them handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// A constant bit pattern carried in the attributes.
    Constant,
    /// Variadic wrapping addition.
    Add,
    /// Binary wrapping subtraction.
    Sub,
    /// Variadic wrapping multiplication.
    Mul,
    /// Binary unsigned division.
    Div,
    /// Binary unsigned remainder.
    Mod,
    /// Variadic bitwise AND.
    And,
    /// Variadic bitwise OR.
    Or,
    /// Variadic bitwise XOR.
    Xor,
    /// AND of all bits of the operand.
    AndReduce,
    /// OR of all bits of the operand.
    OrReduce,
    /// XOR of all bits of the operand.
    XorReduce,
    /// Concatenation; the first operand supplies the most significant bits.
    Concat,
    /// A contiguous bit range of the operand, starting at `low_bit`.
    Extract,
    /// Widening that replicates the operand's top bit.
    SignExtend,
    /// Widening with zero fill.
    ZeroExtend,
}

impl OpKind {
    /// Every kind, in declaration order.
    pub const ALL: [OpKind; 16] = [
        OpKind::Constant,
        OpKind::Add,
        OpKind::Sub,
        OpKind::Mul,
        OpKind::Div,
        OpKind::Mod,
        OpKind::And,
        OpKind::Or,
        OpKind::Xor,
        OpKind::AndReduce,
        OpKind::OrReduce,
        OpKind::XorReduce,
        OpKind::Concat,
        OpKind::Extract,
        OpKind::SignExtend,
        OpKind::ZeroExtend,
    ];

    /// The operation's mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Constant => "comb.constant",
            OpKind::Add => "comb.add",
            OpKind::Sub => "comb.sub",
            OpKind::Mul => "comb.mul",
            OpKind::Div => "comb.divu",
            OpKind::Mod => "comb.modu",
            OpKind::And => "comb.and",
            OpKind::Or => "comb.or",
            OpKind::Xor => "comb.xor",
            OpKind::AndReduce => "comb.and_reduce",
            OpKind::OrReduce => "comb.or_reduce",
            OpKind::XorReduce => "comb.xor_reduce",
            OpKind::Concat => "comb.concat",
            OpKind::Extract => "comb.extract",
            OpKind::SignExtend => "comb.sext",
            OpKind::ZeroExtend => "comb.zext",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attrs {
    /// No attributes.
    None,
    /// The magnitude of a [`OpKind::Constant`]; must fit the result width.
    Constant(BigUint),
    /// The low-bit offset of an [`OpKind::Extract`].
    Extract {
        /// Index of the first extracted bit.
        low_bit: u32,
    },
}

/// A verified operation node.
///
/// The only way to obtain one is [`OpBuilder::build`](crate::OpBuilder::build),
/// which verifies it first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Operation {
    kind: OpKind,
    operands: Vec<Value>,
    attrs: Attrs,
    result_ty: BitVectorType,
}

impl Operation {
    pub(crate) fn new_unverified(
        kind: OpKind,
        operands: Vec<Value>,
        attrs: Attrs,
        result_ty: BitVectorType,
    ) -> Self {
        Self {
            kind,
            operands,
            attrs,
            result_ty,
        }
    }

    /// The operation kind.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// The operands, in order.
    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    /// The attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// The result type.
    pub fn result_type(&self) -> BitVectorType {
        self.result_ty
    }

    /// The low-bit offset, for an extract.
    pub fn low_bit(&self) -> Option<u32> {
        match self.attrs {
            Attrs::Extract { low_bit } => Some(low_bit),
            _ => None,
        }
    }

    /// The constant value, for a verified constant operation.
    pub fn constant_value(&self) -> Option<BitVector> {
        match (&self.kind, &self.attrs) {
            (OpKind::Constant, Attrs::Constant(magnitude)) => {
                BitVector::new(self.result_ty.width(), magnitude.clone()).ok()
            }
            _ => None,
        }
    }

    /// Returns `true` if this is a constant operation.
    pub fn is_constant(&self) -> bool {
        self.kind == OpKind::Constant
    }

    /// Retargets operand `index`. Graph surgery only; callers keep use lists in sync.
    pub(crate) fn set_operand(&mut self, index: usize, value: Value) {
        self.operands[index] = value;
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        match &self.attrs {
            Attrs::None => {}
            Attrs::Constant(magnitude) => write!(f, " {magnitude}")?,
            Attrs::Extract { low_bit } => write!(f, " from {low_bit}")?,
        }
        write!(f, " : {}", self.result_ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{InputId, OpId};

    #[test]
    fn all_kinds_have_distinct_names() {
        let mut names: Vec<&str> = OpKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OpKind::ALL.len());
    }

    #[test]
    fn constant_value_roundtrip() {
        let op = Operation::new_unverified(
            OpKind::Constant,
            vec![],
            Attrs::Constant(BigUint::from(42u32)),
            BitVectorType::new(8).unwrap(),
        );
        assert_eq!(op.constant_value(), Some(BitVector::from_u64(42, 8).unwrap()));
        assert!(op.is_constant());
        assert_eq!(op.low_bit(), None);
    }

    #[test]
    fn display_formats() {
        let add = Operation::new_unverified(
            OpKind::Add,
            vec![Value::Input(InputId::from_raw(0)), Value::Op(OpId::from_raw(1))],
            Attrs::None,
            BitVectorType::new(8).unwrap(),
        );
        assert_eq!(add.to_string(), "comb.add %arg0, %1 : i8");

        let extract = Operation::new_unverified(
            OpKind::Extract,
            vec![Value::Op(OpId::from_raw(2))],
            Attrs::Extract { low_bit: 2 },
            BitVectorType::new(4).unwrap(),
        );
        assert_eq!(extract.to_string(), "comb.extract %2 from 2 : i4");
        assert_eq!(extract.low_bit(), Some(2));
    }
}
