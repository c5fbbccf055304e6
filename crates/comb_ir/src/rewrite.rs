//! Descriptions of rewrites, produced by the folder and canonicalizer.
//!
//! Neither query may touch the graph, so a rewrite that needs a constant
//! which does not exist yet carries it inline as an [`Operand::Constant`].
//! The container materializes it before building the new shape.

use crate::ids::Value;
use crate::op::{Attrs, OpKind};
use crate::types::BitVectorType;
use comb_common::BitVector;
use std::fmt;

/// An operand of a pending operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// An existing value.
    Value(Value),
    /// A constant that must be materialized first.
    Constant(BitVector),
}

impl Operand {
    /// The existing value, if this operand is one.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Operand::Value(v) => Some(*v),
            Operand::Constant(_) => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::Constant(c) => write!(f, "{c}"),
        }
    }
}

/// An operation not yet in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpShape {
    /// The kind to build.
    pub kind: OpKind,
    /// The operands, in order.
    pub operands: Vec<Operand>,
    /// The attributes.
    pub attrs: Attrs,
    /// The result type; always equal to the replaced operation's.
    pub result_ty: BitVectorType,
}

impl OpShape {
    /// A shape with no attributes.
    pub fn new(kind: OpKind, operands: Vec<Operand>, result_ty: BitVectorType) -> Self {
        Self {
            kind,
            operands,
            attrs: Attrs::None,
            result_ty,
        }
    }
}

/// What an operation should be replaced with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Replacement {
    /// An existing value of the same type.
    Value(Value),
    /// A constant of the same width.
    Constant(BitVector),
    /// A new operation.
    Op(OpShape),
}

impl Replacement {
    /// The constant, if the replacement is one.
    pub fn as_constant(&self) -> Option<&BitVector> {
        match self {
            Replacement::Constant(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Value(v) => write!(f, "{v}"),
            Replacement::Constant(c) => write!(f, "{c}"),
            Replacement::Op(shape) => {
                write!(f, "{}", shape.kind)?;
                for (i, operand) in shape.operands.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{operand}")?;
                }
                write!(f, " : {}", shape.result_ty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{InputId, OpId};

    #[test]
    fn display_pending_shape() {
        let shape = OpShape::new(
            OpKind::Add,
            vec![
                Operand::Value(Value::Input(InputId::from_raw(0))),
                Operand::Constant(BitVector::from_u64(8, 8).unwrap()),
            ],
            BitVectorType::new(8).unwrap(),
        );
        assert_eq!(
            Replacement::Op(shape).to_string(),
            "comb.add %arg0, 8'h8 : i8"
        );
    }

    #[test]
    fn operand_accessors() {
        let v = Value::Op(OpId::from_raw(4));
        assert_eq!(Operand::from(v).as_value(), Some(v));
        assert_eq!(Operand::Constant(BitVector::from_bool(true)).as_value(), None);
        let c = Replacement::Constant(BitVector::from_bool(false));
        assert!(c.as_constant().unwrap().is_zero());
        assert!(Replacement::Value(v).as_constant().is_none());
    }
}
