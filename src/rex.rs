//! Row expressions: the scalar expression DAG handed to code generation.
//!
//! This module provides:
//! - Expression node representation (`RexNode`) and operator identities
//! - Programs: a topologically ordered node arena with projections and an
//!   optional condition
//! - A program builder that shares structurally equal subexpressions
//! - The usage analysis deciding which nodes are worth naming

pub mod builder;
pub mod error;
pub mod node;
pub mod operator;
pub mod program;
pub mod usage;

pub use builder::RexProgramBuilder;
pub use error::{ProgramError, ProgramResult};
pub use node::RexNode;
pub use operator::{AggregateFunction, SqlOperator};
pub use program::RexProgram;
pub use usage::UsageAnalysis;
