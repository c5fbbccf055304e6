//! Static shape of every operation kind, and the algebra of the variadic ones.
//!
//! The verifier reads [`Signature`]s to check arity and attributes; the folder
//! and canonicalizer read [`Algebra`] instead of hard-coding identity elements
//! per kind.

use crate::op::OpKind;
use crate::verify::VerifyOptions;
use comb_common::{BitVecError, BitVector};
use std::fmt;

/// How many operands a kind takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// No operands.
    Nullary,
    /// Exactly one.
    Unary,
    /// Exactly two, of equal width.
    Binary,
    /// At least the configured minimum variadic arity, all of equal width.
    Variadic,
    /// At least one, of any widths.
    AtLeastOne,
}

/// How the result width relates to the operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRule {
    /// Declared by the builder; the constant must fit it.
    Declared,
    /// Equal to the (common) operand width.
    SameAsOperands,
    /// Always one bit.
    SingleBit,
    /// The sum of the operand widths.
    SumOfOperands,
    /// Declared by the builder; `low_bit + width` must not exceed the input.
    DeclaredNarrowerOrEqual,
    /// Declared by the builder; strictly wider than the input.
    DeclaredWider,
}

impl ResultRule {
    /// Whether the builder must be given a result type.
    pub fn is_declared(self) -> bool {
        matches!(
            self,
            ResultRule::Declared | ResultRule::DeclaredNarrowerOrEqual | ResultRule::DeclaredWider
        )
    }
}

/// Which attribute variant a kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrShape {
    /// [`Attrs::None`](crate::Attrs::None).
    None,
    /// [`Attrs::Constant`](crate::Attrs::Constant).
    Constant,
    /// [`Attrs::Extract`](crate::Attrs::Extract).
    Extract,
}

/// The static shape of one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Operand count relationship.
    pub operands: OperandShape,
    /// Result width relationship.
    pub result: ResultRule,
    /// Attribute variant.
    pub attrs: AttrShape,
}

impl Signature {
    /// The operand count this signature accepts under the given options.
    pub fn arity(&self, options: &VerifyOptions) -> Arity {
        match self.operands {
            OperandShape::Nullary => Arity::Exactly(0),
            OperandShape::Unary => Arity::Exactly(1),
            OperandShape::Binary => Arity::Exactly(2),
            OperandShape::Variadic => Arity::AtLeast(options.min_variadic_arity),
            OperandShape::AtLeastOne => Arity::AtLeast(1),
        }
    }
}

/// An accepted operand count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exactly(usize),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns `true` if `count` operands are acceptable.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A distinguished element of a bit-vector algebra, at any width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// All bits zero.
    Zero,
    /// The value one.
    One,
    /// All bits one.
    AllOnes,
}

impl Element {
    /// The element at the given width.
    pub fn value(self, width: u32) -> Result<BitVector, BitVecError> {
        match self {
            Element::Zero => BitVector::zero(width),
            Element::One => BitVector::one(width),
            Element::AllOnes => BitVector::ones(width),
        }
    }

    /// Returns `true` if `value` is this element at its own width.
    pub fn matches(self, value: &BitVector) -> bool {
        match self {
            Element::Zero => value.is_zero(),
            Element::One => value.is_one(),
            Element::AllOnes => value.is_all_ones(),
        }
    }
}

/// Algebraic properties of a variadic operator, consumed by the generic
/// variadic folder and the canonicalizer.
#[derive(Debug, Clone, Copy)]
pub struct Algebra {
    /// `x op identity == x`.
    pub identity: Element,
    /// `x op absorbing == absorbing`, if such an element exists.
    pub absorbing: Option<Element>,
    /// `(x op y) op z == x op (y op z)`.
    pub associative: bool,
    /// `x op y == y op x`.
    pub commutative: bool,
    /// `x op x == x`.
    pub idempotent: bool,
    /// Combines two equal-width constants.
    pub combine: fn(&BitVector, &BitVector) -> Result<BitVector, BitVecError>,
}

impl Algebra {
    /// Left-folds constants with [`combine`](Self::combine). `None` if empty.
    pub fn combine_all<'a>(
        &self,
        values: impl IntoIterator<Item = &'a BitVector>,
    ) -> Result<Option<BitVector>, BitVecError> {
        let mut acc: Option<BitVector> = None;
        for value in values {
            acc = Some(match acc {
                None => value.clone(),
                Some(prev) => (self.combine)(&prev, value)?,
            });
        }
        Ok(acc)
    }
}

impl OpKind {
    /// The static shape of this kind.
    pub const fn signature(self) -> Signature {
        use AttrShape as A;
        use OperandShape as O;
        use ResultRule as R;
        let (operands, result, attrs) = match self {
            OpKind::Constant => (O::Nullary, R::Declared, A::Constant),
            OpKind::Add | OpKind::Mul | OpKind::And | OpKind::Or | OpKind::Xor => {
                (O::Variadic, R::SameAsOperands, A::None)
            }
            OpKind::Sub | OpKind::Div | OpKind::Mod => (O::Binary, R::SameAsOperands, A::None),
            OpKind::AndReduce | OpKind::OrReduce | OpKind::XorReduce => {
                (O::Unary, R::SingleBit, A::None)
            }
            OpKind::Concat => (O::AtLeastOne, R::SumOfOperands, A::None),
            OpKind::Extract => (O::Unary, R::DeclaredNarrowerOrEqual, A::Extract),
            OpKind::SignExtend | OpKind::ZeroExtend => (O::Unary, R::DeclaredWider, A::None),
        };
        Signature {
            operands,
            result,
            attrs,
        }
    }

    /// The algebra of a variadic kind; `None` for every other kind.
    pub fn algebra(self) -> Option<Algebra> {
        let algebra = match self {
            OpKind::Add => Algebra {
                identity: Element::Zero,
                absorbing: None,
                associative: true,
                commutative: true,
                idempotent: false,
                combine: BitVector::add,
            },
            OpKind::Mul => Algebra {
                identity: Element::One,
                absorbing: Some(Element::Zero),
                associative: true,
                commutative: true,
                idempotent: false,
                combine: BitVector::mul,
            },
            OpKind::And => Algebra {
                identity: Element::AllOnes,
                absorbing: Some(Element::Zero),
                associative: true,
                commutative: true,
                idempotent: true,
                combine: BitVector::and,
            },
            OpKind::Or => Algebra {
                identity: Element::Zero,
                absorbing: Some(Element::AllOnes),
                associative: true,
                commutative: true,
                idempotent: true,
                combine: BitVector::or,
            },
            OpKind::Xor => Algebra {
                identity: Element::Zero,
                absorbing: None,
                associative: true,
                commutative: true,
                idempotent: false,
                combine: BitVector::xor,
            },
            OpKind::Constant
            | OpKind::Sub
            | OpKind::Div
            | OpKind::Mod
            | OpKind::AndReduce
            | OpKind::OrReduce
            | OpKind::XorReduce
            | OpKind::Concat
            | OpKind::Extract
            | OpKind::SignExtend
            | OpKind::ZeroExtend => return None,
        };
        Some(algebra)
    }
}
