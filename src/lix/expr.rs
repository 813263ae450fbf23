//! Lix expression tree.

use crate::types::{HostType, Value};
use std::fmt;

/// Class hosting the runtime support functions that generated calls invoke
pub const RUNTIME_CLASS: &str = "SqlFunctions";

/// A named, typed local variable or lambda parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterExpression {
    pub name: String,
    pub ty: HostType,
}

impl ParameterExpression {
    pub fn new(name: impl Into<String>, ty: HostType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Native binary operators of the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    AndAlso,
    OrElse,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    /// Whether the operator produces a boolean regardless of operand types
    pub fn is_boolean(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }
}

/// Native unary operators of the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

/// Executable expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant {
        value: Value,
        ty: HostType,
    },
    Parameter(ParameterExpression),
    /// Instance method call, e.g. `x.intValue()`
    Call {
        target: Box<Expression>,
        method: String,
        args: Vec<Expression>,
        ty: HostType,
    },
    /// Static method call, e.g. `SqlFunctions.upper(x)`
    StaticCall {
        class: String,
        method: String,
        args: Vec<Expression>,
        ty: HostType,
    },
    /// Constructor call
    New {
        ty: HostType,
        args: Vec<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: HostType,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        ty: HostType,
    },
    /// `test ? if_true : if_false`
    Conditional {
        test: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
        ty: HostType,
    },
    /// Cast to `ty`
    Convert {
        operand: Box<Expression>,
        ty: HostType,
    },
    ArrayIndex {
        array: Box<Expression>,
        index: usize,
        ty: HostType,
    },
    /// Function literal; its type is the type of its body
    Lambda {
        parameters: Vec<ParameterExpression>,
        body: Box<Expression>,
    },
}

impl Expression {
    pub fn constant(value: Value, ty: HostType) -> Self {
        Expression::Constant { value, ty }
    }

    /// Untyped `null`
    pub fn null() -> Self {
        Self::typed_null(HostType::Object)
    }

    /// `null` as a value of a reference type, e.g. `(Integer) null`
    pub fn typed_null(ty: HostType) -> Self {
        Expression::Constant {
            value: Value::Null,
            ty,
        }
    }

    pub fn boolean(b: bool) -> Self {
        Expression::Constant {
            value: Value::Boolean(b),
            ty: HostType::BOOLEAN,
        }
    }

    pub fn parameter(name: impl Into<String>, ty: HostType) -> Self {
        Expression::Parameter(ParameterExpression::new(name, ty))
    }

    pub fn call(target: Expression, method: impl Into<String>, args: Vec<Expression>, ty: HostType) -> Self {
        Expression::Call {
            target: Box::new(target),
            method: method.into(),
            args,
            ty,
        }
    }

    /// Call a runtime support function
    pub fn runtime_call(method: impl Into<String>, args: Vec<Expression>, ty: HostType) -> Self {
        Expression::StaticCall {
            class: RUNTIME_CLASS.to_string(),
            method: method.into(),
            args,
            ty,
        }
    }

    pub fn new_instance(ty: HostType, args: Vec<Expression>) -> Self {
        Expression::New { ty, args }
    }

    /// Binary operation typed as boolean for predicates, else as the left operand
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        let ty = if op.is_boolean() {
            HostType::BOOLEAN
        } else {
            left.ty().clone()
        };
        Self::make_binary(op, left, right, ty)
    }

    pub fn make_binary(op: BinaryOp, left: Expression, right: Expression, ty: HostType) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        }
    }

    pub fn equal(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Equal, left, right)
    }

    pub fn not_equal(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::NotEqual, left, right)
    }

    pub fn add(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn make_unary(op: UnaryOp, operand: Expression, ty: HostType) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
            ty,
        }
    }

    /// Conditional typed as its `if_true` branch
    pub fn condition(test: Expression, if_true: Expression, if_false: Expression) -> Self {
        let ty = if_true.ty().clone();
        Expression::Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            ty,
        }
    }

    /// Unconditional cast; see `translate::convert` for the coercing variant
    pub fn convert_(operand: Expression, ty: HostType) -> Self {
        Expression::Convert {
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn array_index(array: Expression, index: usize) -> Self {
        let ty = match array.ty() {
            HostType::Array(component) => (**component).clone(),
            _ => HostType::Object,
        };
        Expression::ArrayIndex {
            array: Box::new(array),
            index,
            ty,
        }
    }

    pub fn lambda(parameters: Vec<ParameterExpression>, body: Expression) -> Self {
        Expression::Lambda {
            parameters,
            body: Box::new(body),
        }
    }

    /// Host type of the value this expression produces
    pub fn ty(&self) -> &HostType {
        match self {
            Expression::Constant { ty, .. }
            | Expression::Call { ty, .. }
            | Expression::StaticCall { ty, .. }
            | Expression::New { ty, .. }
            | Expression::Binary { ty, .. }
            | Expression::Unary { ty, .. }
            | Expression::Conditional { ty, .. }
            | Expression::Convert { ty, .. }
            | Expression::ArrayIndex { ty, .. } => ty,
            Expression::Parameter(p) => &p.ty,
            Expression::Lambda { body, .. } => body.ty(),
        }
    }

    fn needs_parens(&self) -> bool {
        matches!(
            self,
            Expression::Binary { .. }
                | Expression::Conditional { .. }
                | Expression::Convert { .. }
                | Expression::Lambda { .. }
        )
    }
}

struct Operand<'a>(&'a Expression);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.needs_parens() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expression]) -> fmt::Result {
    f.write_str("(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(")")
}

fn write_constant(f: &mut fmt::Formatter<'_>, value: &Value, ty: &HostType) -> fmt::Result {
    match value {
        Value::Null if *ty == HostType::Object => f.write_str("null"),
        Value::Null => write!(f, "({}) null", ty),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Int8(n) => write!(f, "(byte) {}", n),
        Value::Int16(n) => write!(f, "(short) {}", n),
        Value::Int32(n) => write!(f, "{}", n),
        Value::Int64(n) => write!(f, "{}L", n),
        Value::Float(n) if n.is_finite() => write!(f, "{}F", n),
        Value::Float(n) => write_special(f, "Float", n.is_nan(), n.is_sign_positive()),
        Value::Double(n) if n.is_finite() => write!(f, "{}D", n),
        Value::Double(n) => write_special(f, "Double", n.is_nan(), n.is_sign_positive()),
        Value::Decimal(d) => write!(f, "{}", d),
        Value::String(s) => {
            f.write_str("\"")?;
            for c in s.chars() {
                match c {
                    '"' => f.write_str("\\\"")?,
                    '\\' => f.write_str("\\\\")?,
                    '\n' => f.write_str("\\n")?,
                    '\t' => f.write_str("\\t")?,
                    c => write!(f, "{}", c)?,
                }
            }
            f.write_str("\"")
        }
    }
}

/// NaN and the infinities are named by their box class
fn write_special(f: &mut fmt::Formatter<'_>, class: &str, nan: bool, positive: bool) -> fmt::Result {
    let name = match (nan, positive) {
        (true, _) => "NaN",
        (false, true) => "POSITIVE_INFINITY",
        (false, false) => "NEGATIVE_INFINITY",
    };
    write!(f, "{}.{}", class, name)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant { value, ty } => write_constant(f, value, ty),
            Expression::Parameter(p) => f.write_str(&p.name),
            Expression::Call {
                target,
                method,
                args,
                ..
            } => {
                write!(f, "{}.{}", Operand(target), method)?;
                write_args(f, args)
            }
            Expression::StaticCall {
                class,
                method,
                args,
                ..
            } => {
                write!(f, "{}.{}", class, method)?;
                write_args(f, args)
            }
            Expression::New { ty, args } => {
                write!(f, "new {}", ty)?;
                write_args(f, args)
            }
            Expression::Binary {
                op, left, right, ..
            } => write!(f, "{} {} {}", Operand(left), op.as_str(), Operand(right)),
            Expression::Unary { op, operand, .. } => {
                write!(f, "{}{}", op.as_str(), Operand(operand))
            }
            Expression::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => write!(
                f,
                "{} ? {} : {}",
                Operand(test),
                Operand(if_true),
                Operand(if_false)
            ),
            Expression::Convert { operand, ty } => write!(f, "({}) {}", ty, Operand(operand)),
            Expression::ArrayIndex { array, index, .. } => {
                write!(f, "{}[{}]", Operand(array), index)
            }
            Expression::Lambda { parameters, body } => {
                let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
                if names.len() == 1 {
                    write!(f, "{} -> {}", names[0], body)
                } else {
                    write!(f, "({}) -> {}", names.join(", "), body)
                }
            }
        }
    }
}
