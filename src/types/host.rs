//! Host representation types.
//!
//! Generated code runs on a runtime with primitive value kinds and boxed
//! (nullable, heap-allocated) counterparts. Coercion between the two follows
//! the runtime's boxing and widening rules; see `translate::convert`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive value kinds of the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    /// Returns the primitive kind of a type, if it is primitive
    pub fn of(ty: &HostType) -> Option<Primitive> {
        match ty {
            HostType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the primitive kind boxed by a type, if it is a box
    pub fn of_box(ty: &HostType) -> Option<Primitive> {
        match ty {
            HostType::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// Name of the primitive type, e.g. "int"
    pub fn primitive_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    /// Name of the box type, e.g. "Integer"
    pub fn box_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "Boolean",
            Primitive::Byte => "Byte",
            Primitive::Char => "Character",
            Primitive::Short => "Short",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
        }
    }

    /// Accessor on the box that extracts this primitive, e.g. "intValue"
    pub fn value_method(&self) -> String {
        format!("{}Value", self.primitive_name())
    }
}

/// Representation type of a generated expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostType {
    Primitive(Primitive),
    Boxed(Primitive),
    String,
    /// Arbitrary-precision decimal
    Decimal,
    /// Arbitrary-precision integer
    BigInteger,
    Object,
    Array(Box<HostType>),
}

impl HostType {
    pub const BOOLEAN: HostType = HostType::Primitive(Primitive::Boolean);
    pub const INT: HostType = HostType::Primitive(Primitive::Int);
    pub const LONG: HostType = HostType::Primitive(Primitive::Long);

    /// Array of objects, the shape of an untyped input row
    pub fn object_array() -> HostType {
        HostType::Array(Box::new(HostType::Object))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, HostType::Primitive(_))
    }

    /// Whether values of this type may hold null
    pub fn is_nullable(&self) -> bool {
        !self.is_primitive()
    }

    /// Primitive types widen to their box; everything else is unchanged
    pub fn boxed(&self) -> HostType {
        match self {
            HostType::Primitive(p) => HostType::Boxed(*p),
            other => other.clone(),
        }
    }

    /// Whether arithmetic on this type must go through its own methods
    pub fn is_arbitrary_precision(&self) -> bool {
        matches!(self, HostType::Decimal | HostType::BigInteger)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Primitive(p) => f.write_str(p.primitive_name()),
            HostType::Boxed(p) => f.write_str(p.box_name()),
            HostType::String => f.write_str("String"),
            HostType::Decimal => f.write_str("BigDecimal"),
            HostType::BigInteger => f.write_str("BigInteger"),
            HostType::Object => f.write_str("Object"),
            HostType::Array(component) => write!(f, "{}[]", component),
        }
    }
}
