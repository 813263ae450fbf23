//! Type system shared by the expression DAG and the generated code.
//!
//! This module provides:
//!
//! - **DataType / LogicalType**: SQL-level types carried by expression nodes
//! - **Value**: literal values embedded in nodes and in generated constants
//! - **HostType / Primitive**: representation types of the target runtime,
//!   including primitive kinds and their boxed (nullable) forms
//! - **TypeAdapter**: the mapping from logical types to host types

pub mod adapter;
pub mod host;
pub mod value;

pub use adapter::{DefaultTypeAdapter, TypeAdapter};
pub use host::{HostType, Primitive};
pub use value::{DataType, LogicalType, Value};
