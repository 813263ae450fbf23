use dec::Decimal128;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL data types understood by the expression layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    TinyInt,
    SmallInt,
    Int32,
    BigInt,
    Real,
    Double,
    Decimal,
    Varchar,
    /// Values whose representation is only known at runtime
    Any,
}

impl DataType {
    /// Returns the SQL name of this type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::Int32 => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::Real => "REAL",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Varchar => "VARCHAR",
            DataType::Any => "ANY",
        }
    }
}

/// A data type together with its nullability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalType {
    pub data_type: DataType,
    pub nullable: bool,
}

impl LogicalType {
    /// Create a NOT NULL type
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: false,
        }
    }

    /// Create a nullable type
    pub fn nullable(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: true,
        }
    }

    /// Returns the same type with the given nullability
    pub fn with_nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_type.name())?;
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

/// Literal values appearing in expressions and generated constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    /// Exact decimal, serialized through its canonical string form
    Decimal(#[serde(with = "decimal_string")] Decimal128),
    String(String),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int8(_) => Some(DataType::TinyInt),
            Value::Int16(_) => Some(DataType::SmallInt),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::BigInt),
            Value::Float(_) => Some(DataType::Real),
            Value::Double(_) => Some(DataType::Double),
            Value::Decimal(_) => Some(DataType::Decimal),
            Value::String(_) => Some(DataType::Varchar),
        }
    }

    /// Whether the value can be the literal of a column of `data_type`.
    ///
    /// Integers also fit DECIMAL, since decimals are rebuilt from the
    /// canonical string.
    pub fn fits(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Value::Null, _) | (_, DataType::Any) => true,
            (Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_), DataType::Decimal) => {
                true
            }
            (value, data_type) => value.data_type() == Some(data_type),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parse a decimal literal, keeping its scale
    pub fn decimal(text: &str) -> Option<Value> {
        text.parse::<Decimal128>().ok().map(Value::Decimal)
    }

    /// The canonical string form of the value, as used to rebuild
    /// arbitrary-precision constants.
    pub fn to_canonical_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Int8(n) => n.to_string(),
            Value::Int16(n) => n.to_string(),
            Value::Int32(n) => n.to_string(),
            Value::Int64(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Double(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => s.clone(),
        }
    }
}

// Decimals compare by canonical form so that 1.5 and 1.50 stay distinct literals.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a.to_string() == b.to_string(),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            other => f.write_str(&other.to_canonical_string()),
        }
    }
}

mod decimal_string {
    use dec::Decimal128;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal128, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<Decimal128>()
            .map_err(|_| D::Error::custom(format!("invalid decimal literal: {}", text)))
    }
}
