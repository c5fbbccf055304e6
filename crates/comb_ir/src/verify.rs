//! Per-kind structural and width checks.
//!
//! Verification is local: it reads the operation's kind, attributes, declared
//! result type and the *types* of its operands, never their runtime values.

use crate::catalog::AttrShape;
use crate::error::IrError;
use crate::ids::Value;
use crate::op::{Attrs, OpKind, Operation};
use crate::resolve::ValueResolver;

/// Verifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Fewest operands accepted by add/mul/and/or/xor. Defaults to 2; a
    /// container that wants degenerate single-operand forms may lower it to 1.
    pub min_variadic_arity: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            min_variadic_arity: 2,
        }
    }
}

/// Checks one operation against the invariants of its kind.
pub fn verify<R: ValueResolver + ?Sized>(
    op: &Operation,
    resolver: &R,
    options: &VerifyOptions,
) -> Result<(), IrError> {
    let kind = op.kind();
    let signature = kind.signature();

    let attrs_ok = matches!(
        (signature.attrs, op.attrs()),
        (AttrShape::None, Attrs::None)
            | (AttrShape::Constant, Attrs::Constant(_))
            | (AttrShape::Extract, Attrs::Extract { .. })
    );
    if !attrs_ok {
        return Err(IrError::AttributeMismatch { kind });
    }

    let arity = signature.arity(options);
    if !arity.accepts(op.operands().len()) {
        return Err(IrError::ArityError {
            kind,
            expected: arity,
            found: op.operands().len(),
        });
    }

    let widths = operand_widths(op.operands(), resolver)?;
    let result_width = op.result_type().width();

    match kind {
        OpKind::Constant => {
            if let Attrs::Constant(magnitude) = op.attrs() {
                if magnitude.bits() > u64::from(result_width) {
                    return Err(IrError::ConstantWidthMismatch {
                        width: result_width,
                        magnitude: magnitude.to_string(),
                    });
                }
            }
        }
        OpKind::Add
        | OpKind::Mul
        | OpKind::And
        | OpKind::Or
        | OpKind::Xor
        | OpKind::Sub
        | OpKind::Div
        | OpKind::Mod => {
            if let Some(&found) = widths.iter().find(|&&w| w != result_width) {
                return Err(IrError::WidthMismatch {
                    kind,
                    expected: result_width,
                    found,
                });
            }
        }
        OpKind::AndReduce | OpKind::OrReduce | OpKind::XorReduce => {
            if result_width != 1 {
                return Err(IrError::WidthMismatch {
                    kind,
                    expected: 1,
                    found: result_width,
                });
            }
        }
        OpKind::Concat => {
            let total: u64 = widths.iter().map(|&w| u64::from(w)).sum();
            if total != u64::from(result_width) {
                return Err(IrError::WidthMismatch {
                    kind,
                    expected: u32::try_from(total)
                        .map_err(|_| IrError::ResultWidthOverflow { kind })?,
                    found: result_width,
                });
            }
        }
        OpKind::Extract => {
            let input_width = widths[0];
            let low_bit = op.low_bit().unwrap_or(0);
            if u64::from(low_bit) + u64::from(result_width) > u64::from(input_width) {
                return Err(IrError::ExtractOutOfRange {
                    low_bit,
                    result_width,
                    input_width,
                });
            }
        }
        OpKind::SignExtend | OpKind::ZeroExtend => {
            let input_width = widths[0];
            if result_width <= input_width {
                return Err(IrError::InvalidExtensionWidth {
                    kind,
                    input_width,
                    result_width,
                });
            }
        }
    }
    Ok(())
}

fn operand_widths<R: ValueResolver + ?Sized>(
    operands: &[Value],
    resolver: &R,
) -> Result<Vec<u32>, IrError> {
    operands
        .iter()
        .map(|&v| {
            resolver
                .value_type(v)
                .map(|t| t.width())
                .ok_or(IrError::UnknownValue(v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Arity;
    use crate::ids::{InputId, OpId};
    use crate::types::BitVectorType;
    use num_bigint::BigUint;
    use std::collections::HashMap;

    /// Resolver over a fixed table of input types.
    struct Types(HashMap<Value, BitVectorType>);

    impl ValueResolver for Types {
        fn value_type(&self, value: Value) -> Option<BitVectorType> {
            self.0.get(&value).copied()
        }

        fn defining_op(&self, _value: Value) -> Option<&Operation> {
            None
        }
    }

    fn ty(width: u32) -> BitVectorType {
        BitVectorType::new(width).unwrap()
    }

    fn input(i: u32) -> Value {
        Value::Input(InputId::from_raw(i))
    }

    /// Inputs 0 and 1 are 8 bits, input 2 is 4 bits.
    fn types() -> Types {
        Types(HashMap::from([
            (input(0), ty(8)),
            (input(1), ty(8)),
            (input(2), ty(4)),
        ]))
    }

    fn check(
        kind: OpKind,
        operands: Vec<Value>,
        attrs: Attrs,
        width: u32,
    ) -> Result<(), IrError> {
        let op = Operation::new_unverified(kind, operands, attrs, ty(width));
        verify(&op, &types(), &VerifyOptions::default())
    }

    #[test]
    fn constant_fits() {
        assert!(check(OpKind::Constant, vec![], Attrs::Constant(BigUint::from(255u32)), 8).is_ok());
    }

    #[test]
    fn constant_too_wide() {
        let err = check(OpKind::Constant, vec![], Attrs::Constant(BigUint::from(256u32)), 8)
            .unwrap_err();
        assert_eq!(
            err,
            IrError::ConstantWidthMismatch {
                width: 8,
                magnitude: "256".to_string()
            }
        );
    }

    #[test]
    fn constant_needs_magnitude_attribute() {
        let err = check(OpKind::Constant, vec![], Attrs::None, 8).unwrap_err();
        assert_eq!(err, IrError::AttributeMismatch { kind: OpKind::Constant });
    }

    #[test]
    fn variadic_needs_two_operands() {
        let err = check(OpKind::Add, vec![input(0)], Attrs::None, 8).unwrap_err();
        assert_eq!(
            err,
            IrError::ArityError {
                kind: OpKind::Add,
                expected: Arity::AtLeast(2),
                found: 1
            }
        );
    }

    #[test]
    fn variadic_single_operand_allowed_when_configured() {
        let op = Operation::new_unverified(OpKind::Xor, vec![input(0)], Attrs::None, ty(8));
        let lax = VerifyOptions {
            min_variadic_arity: 1,
        };
        assert!(verify(&op, &types(), &lax).is_ok());
    }

    #[test]
    fn variadic_width_mismatch() {
        let err = check(OpKind::And, vec![input(0), input(2)], Attrs::None, 8).unwrap_err();
        assert_eq!(
            err,
            IrError::WidthMismatch {
                kind: OpKind::And,
                expected: 8,
                found: 4
            }
        );
        assert!(check(OpKind::Or, vec![input(0), input(1)], Attrs::None, 4).is_err());
    }

    #[test]
    fn binary_exact_arity() {
        assert!(check(OpKind::Sub, vec![input(0), input(1)], Attrs::None, 8).is_ok());
        let err = check(OpKind::Div, vec![input(0), input(1), input(0)], Attrs::None, 8)
            .unwrap_err();
        assert!(matches!(err, IrError::ArityError { expected: Arity::Exactly(2), found: 3, .. }));
        assert!(check(OpKind::Mod, vec![input(0), input(2)], Attrs::None, 8).is_err());
    }

    #[test]
    fn reductions_produce_one_bit() {
        assert!(check(OpKind::XorReduce, vec![input(0)], Attrs::None, 1).is_ok());
        assert!(check(OpKind::AndReduce, vec![input(0)], Attrs::None, 8).is_err());
    }

    #[test]
    fn concat_sums_widths() {
        assert!(check(OpKind::Concat, vec![input(0), input(2)], Attrs::None, 12).is_ok());
        assert!(check(OpKind::Concat, vec![input(0), input(2)], Attrs::None, 8).is_err());
        assert!(check(OpKind::Concat, vec![], Attrs::None, 8).is_err());
    }

    #[test]
    fn extract_range() {
        let attrs = |low_bit| Attrs::Extract { low_bit };
        assert!(check(OpKind::Extract, vec![input(0)], attrs(4), 4).is_ok());
        assert!(check(OpKind::Extract, vec![input(0)], attrs(0), 8).is_ok());
        let err = check(OpKind::Extract, vec![input(0)], attrs(5), 4).unwrap_err();
        assert_eq!(
            err,
            IrError::ExtractOutOfRange {
                low_bit: 5,
                result_width: 4,
                input_width: 8
            }
        );
        assert!(check(OpKind::Extract, vec![input(0)], attrs(u32::MAX), 1).is_err());
    }

    #[test]
    fn extract_requires_low_bit() {
        let err = check(OpKind::Extract, vec![input(0)], Attrs::None, 4).unwrap_err();
        assert_eq!(err, IrError::AttributeMismatch { kind: OpKind::Extract });
    }

    #[test]
    fn extension_must_widen() {
        assert!(check(OpKind::ZeroExtend, vec![input(2)], Attrs::None, 8).is_ok());
        for width in [4, 2] {
            let err = check(OpKind::SignExtend, vec![input(2)], Attrs::None, width).unwrap_err();
            assert!(matches!(err, IrError::InvalidExtensionWidth { .. }));
        }
    }

    #[test]
    fn unknown_operand() {
        let ghost = Value::Op(OpId::from_raw(77));
        let err = check(OpKind::Add, vec![input(0), ghost], Attrs::None, 8).unwrap_err();
        assert_eq!(err, IrError::UnknownValue(ghost));
    }

    #[test]
    fn attribute_on_attributeless_kind() {
        let err = check(
            OpKind::Add,
            vec![input(0), input(1)],
            Attrs::Extract { low_bit: 0 },
            8,
        )
        .unwrap_err();
        assert_eq!(err, IrError::AttributeMismatch { kind: OpKind::Add });
    }
}
