//! Services the core consumes from whatever container owns the graph.

use crate::error::IrError;
use crate::ids::Value;
use crate::op::Operation;
use crate::types::BitVectorType;
use comb_common::BitVector;

/// Looks up what defines a value.
///
/// The verifier only needs [`value_type`](Self::value_type); the folder and
/// canonicalizer also inspect defining operations to find constants.
pub trait ValueResolver {
    /// The type of a value, or `None` if the value is unknown to the container.
    fn value_type(&self, value: Value) -> Option<BitVectorType>;

    /// The live operation defining a value; `None` for inputs and unknown values.
    fn defining_op(&self, value: Value) -> Option<&Operation>;

    /// The constant a value is statically known to hold.
    fn constant_value(&self, value: Value) -> Option<BitVector> {
        self.defining_op(value)?.constant_value()
    }
}

/// Receives replacement requests. The core never edits the graph itself.
pub trait RewriteSink {
    /// Retargets every use of `from` to `to`, returning how many uses moved.
    ///
    /// All uses move in one call, so no user can observe a mix of old and new
    /// operands.
    fn replace_all_uses(&mut self, from: Value, to: Value) -> Result<usize, IrError>;
}
