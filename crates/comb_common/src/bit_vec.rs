//! Arbitrary-precision, width-tagged bit-vector values.

use crate::error::BitVecError;
use num_bigint::BigUint;
use num_traits::{Num, One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-width unsigned bit pattern of any size.
///
/// The magnitude is always in `[0, 2^width)`. Arithmetic wraps modulo
/// `2^width` like fixed-width hardware; signedness is never stored and is only
/// chosen by the operation (e.g. [`sext`](Self::sext) vs [`zext`](Self::zext)).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBitVector")]
pub struct BitVector {
    width: u32,
    magnitude: BigUint,
}

/// The unchecked wire form of a [`BitVector`].
#[derive(Deserialize)]
struct RawBitVector {
    width: u32,
    magnitude: BigUint,
}

impl TryFrom<RawBitVector> for BitVector {
    type Error = BitVecError;

    fn try_from(raw: RawBitVector) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.magnitude)
    }
}

/// Returns `2^width - 1`.
fn mask(width: u32) -> BigUint {
    (BigUint::one() << width) - BigUint::one()
}

impl BitVector {
    /// Creates a bit-vector from a magnitude, failing if it does not fit.
    pub fn new(width: u32, magnitude: BigUint) -> Result<Self, BitVecError> {
        if width == 0 {
            return Err(BitVecError::ZeroWidth);
        }
        if magnitude.bits() > u64::from(width) {
            return Err(BitVecError::WidthOverflow {
                width,
                magnitude: magnitude.to_string(),
            });
        }
        Ok(Self { width, magnitude })
    }

    /// Builds a value known to fit, reducing the magnitude modulo `2^width`.
    fn wrapped(width: u32, magnitude: BigUint) -> Self {
        Self {
            width,
            magnitude: magnitude & mask(width),
        }
    }

    /// Creates a bit-vector from a `u64`, failing if it does not fit.
    pub fn from_u64(value: u64, width: u32) -> Result<Self, BitVecError> {
        Self::new(width, BigUint::from(value))
    }

    /// The all-zeros value of the given width.
    pub fn zero(width: u32) -> Result<Self, BitVecError> {
        Self::new(width, BigUint::zero())
    }

    /// The value `1` at the given width.
    pub fn one(width: u32) -> Result<Self, BitVecError> {
        Self::new(width, BigUint::one())
    }

    /// The all-ones value of the given width.
    pub fn ones(width: u32) -> Result<Self, BitVecError> {
        if width == 0 {
            return Err(BitVecError::ZeroWidth);
        }
        Ok(Self {
            width,
            magnitude: mask(width),
        })
    }

    /// A single-bit value.
    pub fn from_bool(value: bool) -> Self {
        Self {
            width: 1,
            magnitude: if value { BigUint::one() } else { BigUint::zero() },
        }
    }

    /// Parses a binary literal such as `"10110100"`; the width is the digit count.
    ///
    /// Underscores are accepted as separators and do not count toward the width.
    pub fn from_binary_str(s: &str) -> Result<Self, BitVecError> {
        let digits: String = s.chars().filter(|c| *c != '_').collect();
        let magnitude = BigUint::from_str_radix(&digits, 2)
            .map_err(|_| BitVecError::ParseError(s.to_string()))?;
        Self::new(digits.len() as u32, magnitude)
    }

    /// Parses a hexadecimal literal; each digit contributes four bits of width.
    pub fn from_hex_str(s: &str) -> Result<Self, BitVecError> {
        let digits: String = s.chars().filter(|c| *c != '_').collect();
        let magnitude = BigUint::from_str_radix(&digits, 16)
            .map_err(|_| BitVecError::ParseError(s.to_string()))?;
        Self::new(digits.len() as u32 * 4, magnitude)
    }

    /// Returns the number of bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the unsigned magnitude.
    pub fn magnitude(&self) -> &BigUint {
        &self.magnitude
    }

    /// Returns the magnitude as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.magnitude.to_u64()
    }

    /// Returns `true` if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// Returns `true` if the magnitude is exactly one.
    pub fn is_one(&self) -> bool {
        self.magnitude.is_one()
    }

    /// Returns `true` if every bit is one.
    pub fn is_all_ones(&self) -> bool {
        self.magnitude == mask(self.width)
    }

    /// Returns bit `index`, or `None` if the index is past the top bit.
    pub fn bit(&self, index: u32) -> Option<bool> {
        if index >= self.width {
            return None;
        }
        Some(((&self.magnitude >> index) & BigUint::one()).is_one())
    }

    /// Returns the most significant bit, the sign bit under signed interpretation.
    pub fn msb(&self) -> bool {
        ((&self.magnitude >> (self.width - 1)) & BigUint::one()).is_one()
    }

    fn check_width(&self, rhs: &Self) -> Result<(), BitVecError> {
        if self.width != rhs.width {
            return Err(BitVecError::WidthMismatch {
                lhs: self.width,
                rhs: rhs.width,
            });
        }
        Ok(())
    }

    /// Keeps the low `width` bits.
    pub fn truncate(&self, width: u32) -> Result<Self, BitVecError> {
        if width == 0 {
            return Err(BitVecError::ZeroWidth);
        }
        if width > self.width {
            return Err(BitVecError::InvalidResize {
                from: self.width,
                to: width,
            });
        }
        Ok(Self::wrapped(width, self.magnitude.clone()))
    }

    /// Widens with zero fill. The magnitude is unchanged.
    pub fn zext(&self, width: u32) -> Result<Self, BitVecError> {
        if width < self.width {
            return Err(BitVecError::InvalidResize {
                from: self.width,
                to: width,
            });
        }
        Ok(Self {
            width,
            magnitude: self.magnitude.clone(),
        })
    }

    /// Widens by replicating bit `width - 1` of the source into the new bits.
    pub fn sext(&self, width: u32) -> Result<Self, BitVecError> {
        let extended = self.zext(width)?;
        if !self.msb() {
            return Ok(extended);
        }
        let fill = mask(width) ^ mask(self.width);
        Ok(Self {
            width,
            magnitude: extended.magnitude | fill,
        })
    }

    /// Extracts `width` bits starting at bit `low`.
    pub fn extract(&self, low: u32, width: u32) -> Result<Self, BitVecError> {
        if width == 0 {
            return Err(BitVecError::ZeroWidth);
        }
        if u64::from(low) + u64::from(width) > u64::from(self.width) {
            return Err(BitVecError::OutOfRange {
                low,
                width,
                source_width: self.width,
            });
        }
        Ok(Self::wrapped(width, &self.magnitude >> low))
    }

    /// Concatenates `low` below `self`; `self` supplies the most significant bits.
    pub fn concat(&self, low: &Self) -> Self {
        Self {
            width: self.width + low.width,
            magnitude: (&self.magnitude << low.width) | &low.magnitude,
        }
    }

    /// Bitwise AND.
    pub fn and(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        Ok(Self {
            width: self.width,
            magnitude: &self.magnitude & &rhs.magnitude,
        })
    }

    /// Bitwise OR.
    pub fn or(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        Ok(Self {
            width: self.width,
            magnitude: &self.magnitude | &rhs.magnitude,
        })
    }

    /// Bitwise XOR.
    pub fn xor(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        Ok(Self {
            width: self.width,
            magnitude: &self.magnitude ^ &rhs.magnitude,
        })
    }

    /// Bitwise complement.
    pub fn not(&self) -> Self {
        Self {
            width: self.width,
            magnitude: &self.magnitude ^ mask(self.width),
        }
    }

    /// Addition modulo `2^width`.
    pub fn add(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        Ok(Self::wrapped(self.width, &self.magnitude + &rhs.magnitude))
    }

    /// Subtraction modulo `2^width`.
    pub fn sub(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        // a - b == a + (2^w - b) mod 2^w, which never underflows a BigUint.
        let modulus = BigUint::one() << self.width;
        Ok(Self::wrapped(
            self.width,
            &self.magnitude + modulus - &rhs.magnitude,
        ))
    }

    /// Multiplication modulo `2^width`.
    pub fn mul(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        Ok(Self::wrapped(self.width, &self.magnitude * &rhs.magnitude))
    }

    /// Unsigned division.
    pub fn udiv(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        if rhs.is_zero() {
            return Err(BitVecError::DivisionByZero);
        }
        Ok(Self {
            width: self.width,
            magnitude: &self.magnitude / &rhs.magnitude,
        })
    }

    /// Unsigned remainder.
    pub fn urem(&self, rhs: &Self) -> Result<Self, BitVecError> {
        self.check_width(rhs)?;
        if rhs.is_zero() {
            return Err(BitVecError::DivisionByZero);
        }
        Ok(Self {
            width: self.width,
            magnitude: &self.magnitude % &rhs.magnitude,
        })
    }

    /// AND of all bits, as a 1-bit value.
    pub fn reduce_and(&self) -> Self {
        Self::from_bool(self.is_all_ones())
    }

    /// OR of all bits, as a 1-bit value.
    pub fn reduce_or(&self) -> Self {
        Self::from_bool(!self.is_zero())
    }

    /// XOR of all bits (odd parity), as a 1-bit value.
    pub fn reduce_xor(&self) -> Self {
        let ones: u32 = self
            .magnitude
            .to_u64_digits()
            .iter()
            .map(|digit| digit.count_ones())
            .sum();
        Self::from_bool(ones % 2 == 1)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'h{}", self.width, self.magnitude.to_str_radix(16))
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({self})")
    }
}
