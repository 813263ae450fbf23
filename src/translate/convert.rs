//! Host type coercion.

use crate::lix::Expression;
use crate::types::{HostType, Primitive};

/// Convert `operand` to `target` following the runtime's boxing rules.
///
/// Returns the operand unchanged when it already has the target type. For a
/// primitive target the box-specific cases come first, since a plain cast
/// between a box and an unrelated primitive is not valid on the host:
///
/// - from a primitive: plain widening or narrowing cast, `(long) x`
/// - from a reference of unknown runtime type: cast to the box, then unbox,
///   `((Short) x).shortValue()`
/// - from a different box: use the box's accessor, `x.intValue()`
///
/// Everything else is a plain cast.
pub fn convert(operand: Expression, target: &HostType) -> Expression {
    if operand.ty() == target {
        return operand;
    }
    if let Some(primitive) = Primitive::of(target) {
        if operand.ty().is_primitive() {
            return Expression::convert_(operand, target.clone());
        }
        match Primitive::of_box(operand.ty()) {
            None => {
                let boxed = Expression::convert_(operand, HostType::Boxed(primitive));
                return Expression::call(boxed, primitive.value_method(), vec![], target.clone());
            }
            Some(from) if from != primitive => {
                return Expression::call(operand, primitive.value_method(), vec![], target.clone());
            }
            Some(_) => {}
        }
    }
    Expression::convert_(operand, target.clone())
}

/// Convert e.g. an `Integer` expression to `int`; other types pass through
pub fn unbox(expression: Expression) -> Expression {
    match Primitive::of_box(expression.ty()) {
        Some(primitive) => convert(expression, &HostType::Primitive(primitive)),
        None => expression,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMITIVES: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    fn var(ty: HostType) -> Expression {
        Expression::parameter("x", ty)
    }

    #[test]
    fn test_identity() {
        let x = var(HostType::Boxed(Primitive::Int));
        assert_eq!(convert(x.clone(), &HostType::Boxed(Primitive::Int)), x);
        let s = var(HostType::String);
        assert_eq!(convert(s.clone(), &HostType::String), s);
    }

    #[test]
    fn test_object_to_primitive() {
        let converted = convert(var(HostType::Object), &HostType::Primitive(Primitive::Short));
        assert_eq!(converted.to_string(), "((Short) x).shortValue()");
        assert_eq!(converted.ty(), &HostType::Primitive(Primitive::Short));
    }

    #[test]
    fn test_box_to_other_primitive() {
        let converted = convert(var(HostType::Boxed(Primitive::Short)), &HostType::INT);
        assert_eq!(converted.to_string(), "x.intValue()");
        assert_eq!(converted.ty(), &HostType::INT);
    }

    #[test]
    fn test_box_to_own_primitive() {
        let converted = convert(var(HostType::Boxed(Primitive::Int)), &HostType::INT);
        assert_eq!(converted.to_string(), "(int) x");
    }

    #[test]
    fn test_primitive_widening() {
        let converted = convert(var(HostType::INT), &HostType::LONG);
        assert_eq!(converted.to_string(), "(long) x");
    }

    #[test]
    fn test_reference_targets() {
        assert_eq!(
            convert(var(HostType::INT), &HostType::Boxed(Primitive::Int)).to_string(),
            "(Integer) x"
        );
        assert_eq!(
            convert(var(HostType::Object), &HostType::String).to_string(),
            "(String) x"
        );
    }

    #[test]
    fn test_totality() {
        let mut sources = vec![HostType::Object, HostType::String, HostType::Decimal];
        for p in PRIMITIVES {
            sources.push(HostType::Primitive(p));
            sources.push(HostType::Boxed(p));
        }
        for source in &sources {
            for p in PRIMITIVES {
                for target in [HostType::Primitive(p), HostType::Boxed(p)] {
                    let converted = convert(var(source.clone()), &target);
                    assert_eq!(converted.ty(), &target, "{} -> {}", source, target);
                }
            }
        }
    }

    #[test]
    fn test_unbox() {
        let unboxed = unbox(var(HostType::Boxed(Primitive::Long)));
        assert_eq!(unboxed.ty(), &HostType::LONG);
        let untouched = unbox(var(HostType::String));
        assert_eq!(untouched, var(HostType::String));
    }
}
