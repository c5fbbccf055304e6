//! Structured diagnostics for verification and simplification passes.
//!
//! Passes report what they did and what they refused to do as [`Diagnostic`]s
//! with a severity, a category-prefixed code, and the operation they concern.
//! The thread-safe [`DiagnosticSink`] accumulates them across worker threads,
//! and [`DiagnosticRenderer`] implementations format them for a terminal or
//! as JSON lines.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
