//! Construction of verified operations.

use crate::catalog::ResultRule;
use crate::error::IrError;
use crate::ids::Value;
use crate::op::{Attrs, OpKind, Operation};
use crate::resolve::ValueResolver;
use crate::types::BitVectorType;
use crate::verify::{verify, VerifyOptions};
use comb_common::BitVector;

/// Builds operations against a resolver, verifying each one before returning it.
pub struct OpBuilder<'a, R: ValueResolver + ?Sized> {
    resolver: &'a R,
    options: VerifyOptions,
}

impl<'a, R: ValueResolver + ?Sized> OpBuilder<'a, R> {
    /// Creates a builder with default verifier options.
    pub fn new(resolver: &'a R) -> Self {
        Self::with_options(resolver, VerifyOptions::default())
    }

    /// Creates a builder with explicit verifier options.
    pub fn with_options(resolver: &'a R, options: VerifyOptions) -> Self {
        Self { resolver, options }
    }

    /// Constructs and verifies an operation.
    ///
    /// `result_ty` may be `None` when the kind's result width follows from its
    /// operands; constants, extracts and extensions must declare it.
    pub fn build(
        &self,
        kind: OpKind,
        operands: Vec<Value>,
        attrs: Attrs,
        result_ty: Option<BitVectorType>,
    ) -> Result<Operation, IrError> {
        let result_ty = match result_ty {
            Some(ty) => ty,
            None => self.infer_result_type(kind, &operands)?,
        };
        let op = Operation::new_unverified(kind, operands, attrs, result_ty);
        verify(&op, self.resolver, &self.options)?;
        Ok(op)
    }

    fn infer_result_type(
        &self,
        kind: OpKind,
        operands: &[Value],
    ) -> Result<BitVectorType, IrError> {
        let signature = kind.signature();
        let types = operands
            .iter()
            .map(|&v| self.resolver.value_type(v).ok_or(IrError::UnknownValue(v)))
            .collect::<Result<Vec<_>, _>>()?;
        match signature.result {
            ResultRule::SingleBit => Ok(BitVectorType::bit()),
            // Width agreement among the rest is the verifier's job.
            ResultRule::SameAsOperands => types.first().copied().ok_or(IrError::ArityError {
                kind,
                expected: signature.arity(&self.options),
                found: 0,
            }),
            ResultRule::SumOfOperands => {
                if types.is_empty() {
                    return Err(IrError::ArityError {
                        kind,
                        expected: signature.arity(&self.options),
                        found: 0,
                    });
                }
                BitVectorType::concatenated(types).ok_or(IrError::ResultWidthOverflow { kind })
            }
            ResultRule::Declared
            | ResultRule::DeclaredNarrowerOrEqual
            | ResultRule::DeclaredWider => Err(IrError::MissingResultType { kind }),
        }
    }

    /// A constant holding `value`.
    pub fn constant(&self, value: &BitVector) -> Result<Operation, IrError> {
        self.build(
            OpKind::Constant,
            Vec::new(),
            Attrs::Constant(value.magnitude().clone()),
            Some(BitVectorType::of(value)),
        )
    }

    /// A variadic add/mul/and/or/xor.
    pub fn variadic(&self, kind: OpKind, operands: Vec<Value>) -> Result<Operation, IrError> {
        self.build(kind, operands, Attrs::None, None)
    }

    /// A sub/div/mod.
    pub fn binary(&self, kind: OpKind, lhs: Value, rhs: Value) -> Result<Operation, IrError> {
        self.build(kind, vec![lhs, rhs], Attrs::None, None)
    }

    /// An and/or/xor reduction.
    pub fn reduce(&self, kind: OpKind, input: Value) -> Result<Operation, IrError> {
        self.build(kind, vec![input], Attrs::None, None)
    }

    /// A concatenation, most significant operand first.
    pub fn concat(&self, operands: Vec<Value>) -> Result<Operation, IrError> {
        self.build(OpKind::Concat, operands, Attrs::None, None)
    }

    /// `width` bits of `input` starting at `low_bit`.
    pub fn extract(&self, input: Value, low_bit: u32, width: u32) -> Result<Operation, IrError> {
        self.build(
            OpKind::Extract,
            vec![input],
            Attrs::Extract { low_bit },
            Some(BitVectorType::new(width)?),
        )
    }

    /// A sign or zero extension of `input` to `width` bits.
    pub fn extend(&self, kind: OpKind, input: Value, width: u32) -> Result<Operation, IrError> {
        self.build(kind, vec![input], Attrs::None, Some(BitVectorType::new(width)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::InputId;
    use std::collections::HashMap;

    struct Inputs(HashMap<Value, BitVectorType>);

    impl ValueResolver for Inputs {
        fn value_type(&self, value: Value) -> Option<BitVectorType> {
            self.0.get(&value).copied()
        }

        fn defining_op(&self, _value: Value) -> Option<&Operation> {
            None
        }
    }

    fn x() -> Value {
        Value::Input(InputId::from_raw(0))
    }

    fn y() -> Value {
        Value::Input(InputId::from_raw(1))
    }

    fn inputs() -> Inputs {
        Inputs(HashMap::from([
            (x(), BitVectorType::new(8).unwrap()),
            (y(), BitVectorType::new(4).unwrap()),
        ]))
    }

    #[test]
    fn constant_takes_width_from_value() {
        let resolver = inputs();
        let builder = OpBuilder::new(&resolver);
        let op = builder.constant(&BitVector::from_u64(42, 8).unwrap()).unwrap();
        assert_eq!(op.result_type().width(), 8);
        assert_eq!(op.constant_value().unwrap().to_u64(), Some(42));
    }

    #[test]
    fn infers_variadic_and_concat_types() {
        let resolver = inputs();
        let builder = OpBuilder::new(&resolver);
        let add = builder.variadic(OpKind::Add, vec![x(), x()]).unwrap();
        assert_eq!(add.result_type().width(), 8);
        let cat = builder.concat(vec![x(), y()]).unwrap();
        assert_eq!(cat.result_type().width(), 12);
        let red = builder.reduce(OpKind::OrReduce, x()).unwrap();
        assert_eq!(red.result_type(), BitVectorType::bit());
    }

    #[test]
    fn declared_kinds_need_result_type() {
        let resolver = inputs();
        let builder = OpBuilder::new(&resolver);
        let err = builder
            .build(OpKind::ZeroExtend, vec![x()], Attrs::None, None)
            .unwrap_err();
        assert_eq!(err, IrError::MissingResultType { kind: OpKind::ZeroExtend });
    }

    #[test]
    fn build_never_returns_unverified() {
        let resolver = inputs();
        let builder = OpBuilder::new(&resolver);
        assert!(matches!(
            builder.extract(x(), 5, 4),
            Err(IrError::ExtractOutOfRange { .. })
        ));
        assert!(matches!(
            builder.extend(OpKind::SignExtend, x(), 8),
            Err(IrError::InvalidExtensionWidth { .. })
        ));
        assert!(matches!(
            builder.variadic(OpKind::Mul, vec![x(), y()]),
            Err(IrError::WidthMismatch { .. })
        ));
        assert!(matches!(
            builder.variadic(OpKind::Mul, vec![]),
            Err(IrError::ArityError { found: 0, .. })
        ));
    }

    #[test]
    fn options_relax_arity() {
        let resolver = inputs();
        let builder = OpBuilder::with_options(
            &resolver,
            VerifyOptions {
                min_variadic_arity: 1,
            },
        );
        assert!(builder.variadic(OpKind::Or, vec![x()]).is_ok());
        assert!(OpBuilder::new(&resolver).variadic(OpKind::Or, vec![x()]).is_err());
    }
}
