//! A typed, verified, foldable IR for combinational bit-vector logic.
//!
//! Operations ([`Operation`]) are built through [`OpBuilder`], which runs the
//! [`verify`] checks before handing the node out, so an unverified operation
//! never exists outside this crate. [`try_fold`] and [`canonicalize`] are pure
//! queries that describe a [`Replacement`]; the container (the reference
//! [`Graph`], or any type implementing [`ValueResolver`] and [`RewriteSink`])
//! performs the actual graph surgery.

#![warn(missing_docs)]

pub mod arena;
pub mod builder;
pub mod canonicalize;
pub mod catalog;
pub mod error;
pub mod eval;
pub mod fold;
pub mod graph;
pub mod ids;
pub mod op;
pub mod resolve;
pub mod rewrite;
pub mod types;
pub mod verify;

pub use arena::{Arena, ArenaId};
pub use builder::OpBuilder;
pub use canonicalize::canonicalize;
pub use catalog::{Algebra, Arity, AttrShape, Element, OperandShape, ResultRule, Signature};
pub use error::IrError;
pub use eval::{evaluate, evaluate_op};
pub use fold::{fold, try_fold, FoldOptions, FoldOutcome};
pub use graph::{Graph, Input, Output, Use};
pub use ids::{InputId, OpId, Value};
pub use op::{Attrs, OpKind, Operation};
pub use resolve::{RewriteSink, ValueResolver};
pub use rewrite::{OpShape, Operand, Replacement};
pub use types::BitVectorType;
pub use verify::{verify, VerifyOptions};
