//! The bit-vector type model.
//!
//! There is exactly one type constructor: a signless bit-vector of a non-zero
//! width. Two types are equal iff their widths are equal.

use crate::error::IrError;
use comb_common::{BitVecError, BitVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A signless bit-vector type, `iN`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawType")]
pub struct BitVectorType {
    width: u32,
}

#[derive(Deserialize)]
struct RawType {
    width: u32,
}

impl TryFrom<RawType> for BitVectorType {
    type Error = IrError;

    fn try_from(raw: RawType) -> Result<Self, Self::Error> {
        Self::new(raw.width)
    }
}

impl BitVectorType {
    /// Creates a type of the given width, rejecting zero.
    pub fn new(width: u32) -> Result<Self, IrError> {
        if width == 0 {
            return Err(BitVecError::ZeroWidth.into());
        }
        Ok(Self { width })
    }

    /// The 1-bit type produced by reductions.
    pub const fn bit() -> Self {
        Self { width: 1 }
    }

    /// The type of a constant value.
    pub fn of(value: &BitVector) -> Self {
        Self {
            width: value.width(),
        }
    }

    /// Returns the width in bits.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Returns the common type if every type in the iterator is the same.
    ///
    /// Returns `None` for an empty iterator or on the first mismatch.
    pub fn common(types: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut iter = types.into_iter();
        let first = iter.next()?;
        iter.all(|t| t == first).then_some(first)
    }

    /// The type of the concatenation of values of these types, or `None` if
    /// the total width does not fit in a `u32` (or the iterator is empty).
    pub fn concatenated(types: impl IntoIterator<Item = Self>) -> Option<Self> {
        let width = types
            .into_iter()
            .try_fold(0u32, |acc, t| acc.checked_add(t.width))?;
        (width > 0).then_some(Self { width })
    }
}

impl fmt::Display for BitVectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.width)
    }
}
