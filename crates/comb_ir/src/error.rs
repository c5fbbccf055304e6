//! The IR error taxonomy.

use crate::catalog::Arity;
use crate::ids::{OpId, Value};
use crate::op::OpKind;
use comb_common::BitVecError;

/// Errors from building, verifying, folding, or rewriting operations.
///
/// Construction-time errors mean the operation never enters the graph.
/// `BitVector(DivisionByZero)` during folding means the fold is declined and
/// the operation stays as it is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// A constant's magnitude does not fit its declared width.
    #[error("constant {magnitude} does not fit in declared width {width}")]
    ConstantWidthMismatch {
        /// The declared result width.
        width: u32,
        /// The magnitude, in decimal.
        magnitude: String,
    },

    /// Wrong number of operands for the kind.
    #[error("{kind} takes {expected} operands, found {found}")]
    ArityError {
        /// The operation kind.
        kind: OpKind,
        /// What the kind accepts.
        expected: Arity,
        /// How many were given.
        found: usize,
    },

    /// `low_bit + result_width` exceeds the input width.
    #[error(
        "extract of {result_width} bits from bit {low_bit} exceeds {input_width}-bit input"
    )]
    ExtractOutOfRange {
        /// The low-bit offset.
        low_bit: u32,
        /// The declared result width.
        result_width: u32,
        /// The input width.
        input_width: u32,
    },

    /// An extension to an equal or narrower width.
    #[error("{kind} from {input_width} to {result_width} bits must widen")]
    InvalidExtensionWidth {
        /// `SignExtend` or `ZeroExtend`.
        kind: OpKind,
        /// The input width.
        input_width: u32,
        /// The declared result width.
        result_width: u32,
    },

    /// An operand or the result has the wrong width for the kind.
    #[error("{kind} expects width {expected}, found {found}")]
    WidthMismatch {
        /// The operation kind.
        kind: OpKind,
        /// The width required by the kind's shape.
        expected: u32,
        /// The width actually present.
        found: u32,
    },

    /// The attribute variant does not belong to the kind.
    #[error("{kind} built with the wrong attribute")]
    AttributeMismatch {
        /// The operation kind.
        kind: OpKind,
    },

    /// The kind's result width cannot be inferred and none was declared.
    #[error("{kind} requires a declared result type")]
    MissingResultType {
        /// The operation kind.
        kind: OpKind,
    },

    /// The inferred result width does not fit in 32 bits.
    #[error("{kind} result width overflows")]
    ResultWidthOverflow {
        /// The operation kind.
        kind: OpKind,
    },

    /// A value is not defined (or no longer live) in this container.
    #[error("unknown value {0}")]
    UnknownValue(Value),

    /// A replacement would change the type of a value.
    #[error("cannot replace {from} with {to}: types differ")]
    ReplacementTypeMismatch {
        /// The value being replaced.
        from: Value,
        /// The proposed replacement.
        to: Value,
    },

    /// An operation still has uses and cannot be erased.
    #[error("operation %{} still has uses", .0.as_raw())]
    OperationInUse(OpId),

    /// The operand graph contains a cycle through this operation.
    #[error("cycle through operation %{}", .0.as_raw())]
    CyclicGraph(OpId),

    /// A bit-vector error, including `DivisionByZero` and `WidthOverflow`.
    #[error(transparent)]
    BitVector(#[from] BitVecError),
}

impl IrError {
    /// Returns `true` for a division or remainder by zero.
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, IrError::BitVector(BitVecError::DivisionByZero))
    }
}
