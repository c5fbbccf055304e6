//! Shared foundational types for the combinational IR workspace.
//!
//! This crate provides the arbitrary-precision [`BitVector`] value type that all
//! constant folding is computed with, its error type, and interned identifiers
//! used to name graph inputs and outputs.

#![warn(missing_docs)]

pub mod bit_vec;
pub mod error;
pub mod ident;

pub use bit_vec::BitVector;
pub use error::BitVecError;
pub use ident::{Ident, Interner};
