//! Literal lowering.

use crate::lix::Expression;
use crate::types::{HostType, LogicalType, TypeAdapter, Value};

/// Translate a literal to a constant of its host type.
///
/// Arbitrary-precision values are rebuilt from their canonical string, which
/// keeps both the exact value and its scale.
pub fn translate_literal(value: &Value, ty: &LogicalType, type_adapter: &dyn TypeAdapter) -> Expression {
    let host = type_adapter.host_type(ty);
    if value.is_null() {
        return Expression::typed_null(host.boxed());
    }
    if host.is_arbitrary_precision() {
        return Expression::new_instance(
            host,
            vec![Expression::constant(
                Value::String(value.to_canonical_string()),
                HostType::String,
            )],
        );
    }
    Expression::constant(value.clone(), host)
}
