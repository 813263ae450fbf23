use crate::types::{DataType, HostType, LogicalType, Primitive};

/// Maps logical types to the host types used for constants, casts and
/// accumulators.
pub trait TypeAdapter {
    fn host_type(&self, ty: &LogicalType) -> HostType;
}

/// Standard mapping: NOT NULL scalars become primitives, nullable scalars
/// become boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeAdapter;

impl DefaultTypeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl TypeAdapter for DefaultTypeAdapter {
    fn host_type(&self, ty: &LogicalType) -> HostType {
        let primitive = match ty.data_type {
            DataType::Boolean => Primitive::Boolean,
            DataType::TinyInt => Primitive::Byte,
            DataType::SmallInt => Primitive::Short,
            DataType::Int32 => Primitive::Int,
            DataType::BigInt => Primitive::Long,
            DataType::Real => Primitive::Float,
            DataType::Double => Primitive::Double,
            DataType::Decimal => return HostType::Decimal,
            DataType::Varchar => return HostType::String,
            DataType::Any => return HostType::Object,
        };
        if ty.nullable {
            HostType::Boxed(primitive)
        } else {
            HostType::Primitive(primitive)
        }
    }
}
