//! Opaque handles for operations, external inputs, and the values they produce.
//!
//! Handles are thin `u32` wrappers allocated by [`Arena::alloc`](crate::arena::Arena::alloc).
//! They stay valid for the life of the graph, so replacing an operation is a
//! matter of retargeting indices rather than moving owned nodes.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Handle of an operation in a graph's operation arena.
    OpId
);

define_id!(
    /// Handle of an external input owned by the container.
    InputId
);

/// A typed value flowing between operations.
///
/// Every value is either the single result of an operation or an external
/// input. The derived ordering (inputs first, then operation results, each by
/// handle) is the stable key the canonicalizer sorts operands by.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Value {
    /// An external input.
    Input(InputId),
    /// The result of an operation.
    Op(OpId),
}

impl Value {
    /// Returns the defining operation, or `None` for an external input.
    pub fn op(self) -> Option<OpId> {
        match self {
            Value::Op(id) => Some(id),
            Value::Input(_) => None,
        }
    }

    /// Returns the input handle, or `None` for an operation result.
    pub fn input(self) -> Option<InputId> {
        match self {
            Value::Input(id) => Some(id),
            Value::Op(_) => None,
        }
    }
}

impl From<OpId> for Value {
    fn from(id: OpId) -> Self {
        Value::Op(id)
    }
}

impl From<InputId> for Value {
    fn from(id: InputId) -> Self {
        Value::Input(id)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Input(id) => write!(f, "%arg{}", id.as_raw()),
            Value::Op(id) => write!(f, "%{}", id.as_raw()),
        }
    }
}
