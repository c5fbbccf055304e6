//! Diagnostic codes emitted by verification and the simplification passes.

use comb_diagnostics::{Category, DiagnosticCode};
use comb_ir::IrError;

/// A constant's magnitude does not fit its width.
pub const CONSTANT_WIDTH: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
/// Wrong operand count.
pub const ARITY: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
/// Extract range past the top of its input.
pub const EXTRACT_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
/// Extension that does not widen.
pub const EXTENSION_WIDTH: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);
/// Operand or result width disagrees with the kind's rule.
pub const WIDTH_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Error, 105);
/// Attribute variant does not belong to the kind.
pub const ATTRIBUTE: DiagnosticCode = DiagnosticCode::new(Category::Error, 106);
/// Operand that is not a live value of the graph.
pub const UNKNOWN_VALUE: DiagnosticCode = DiagnosticCode::new(Category::Error, 107);
/// Any other structural failure, including cycles.
pub const MALFORMED: DiagnosticCode = DiagnosticCode::new(Category::Error, 108);

/// Fold declined because the divisor is a constant zero.
pub const DIVISION_BY_ZERO: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// Operation folded.
pub const FOLDED: DiagnosticCode = DiagnosticCode::new(Category::Rewrite, 1);
/// Operation canonicalized.
pub const CANONICALIZED: DiagnosticCode = DiagnosticCode::new(Category::Rewrite, 2);
/// Operation merged into an identical one.
pub const MERGED: DiagnosticCode = DiagnosticCode::new(Category::Rewrite, 3);
/// Unreachable operation erased.
pub const ERASED: DiagnosticCode = DiagnosticCode::new(Category::Rewrite, 4);

/// The verification code for an error.
pub fn for_error(err: &IrError) -> DiagnosticCode {
    match err {
        IrError::ConstantWidthMismatch { .. } => CONSTANT_WIDTH,
        IrError::ArityError { .. } => ARITY,
        IrError::ExtractOutOfRange { .. } => EXTRACT_RANGE,
        IrError::InvalidExtensionWidth { .. } => EXTENSION_WIDTH,
        IrError::WidthMismatch { .. } => WIDTH_MISMATCH,
        IrError::AttributeMismatch { .. } => ATTRIBUTE,
        IrError::UnknownValue(_) => UNKNOWN_VALUE,
        _ => MALFORMED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comb_ir::{OpId, OpKind};

    #[test]
    fn codes_render_with_prefix() {
        assert_eq!(EXTRACT_RANGE.to_string(), "E103");
        assert_eq!(DIVISION_BY_ZERO.to_string(), "W101");
        assert_eq!(ERASED.to_string(), "R004");
    }

    #[test]
    fn errors_map_to_codes() {
        let err = IrError::InvalidExtensionWidth {
            kind: OpKind::SignExtend,
            input_width: 8,
            result_width: 8,
        };
        assert_eq!(for_error(&err), EXTENSION_WIDTH);
        assert_eq!(for_error(&IrError::CyclicGraph(OpId::from_raw(0))), MALFORMED);
    }
}
