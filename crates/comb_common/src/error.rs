//! Error type for bit-vector construction and arithmetic.

/// Errors produced by [`BitVector`](crate::BitVector) operations.
///
/// Every failure is surfaced to the caller; no operation silently truncates or
/// substitutes a default value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitVecError {
    /// A magnitude does not fit in the requested number of bits.
    #[error("magnitude {magnitude} does not fit in {width} bits")]
    WidthOverflow {
        /// The requested width.
        width: u32,
        /// The offending magnitude, in decimal.
        magnitude: String,
    },

    /// A bit-vector was requested with zero width.
    #[error("bit-vector width must be non-zero")]
    ZeroWidth,

    /// Unsigned division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A binary operation was applied to vectors of different widths.
    #[error("width mismatch: {lhs} bits vs {rhs} bits")]
    WidthMismatch {
        /// Width of the left operand.
        lhs: u32,
        /// Width of the right operand.
        rhs: u32,
    },

    /// A truncation or extension was requested in the wrong direction.
    #[error("cannot resize {from}-bit vector to {to} bits")]
    InvalidResize {
        /// The source width.
        from: u32,
        /// The requested width.
        to: u32,
    },

    /// A bit range reaches past the top of the vector.
    #[error("bits [{low}, {low}+{width}) are out of range for a {source_width}-bit vector")]
    OutOfRange {
        /// The lowest bit of the range.
        low: u32,
        /// The number of bits in the range.
        width: u32,
        /// The width of the vector being indexed.
        source_width: u32,
    },

    /// A literal string could not be parsed.
    #[error("invalid bit-vector literal '{0}'")]
    ParseError(String),
}
