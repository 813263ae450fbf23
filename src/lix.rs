//! Low-level executable expressions produced by code generation.
//!
//! Lix expressions model the target runtime directly: typed constants, local
//! variables, static and instance method calls, native operators, conditional
//! expressions and casts. A `BlockBuilder` collects the variable declarations
//! that precede the expressions handed back to the caller.

pub mod block;
pub mod expr;

pub use block::{BlockBuilder, Checkpoint, Statement};
pub use expr::{BinaryOp, Expression, ParameterExpression, UnaryOp, RUNTIME_CLASS};
