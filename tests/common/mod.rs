//! Test helpers: a small interpreter for generated code.
//!
//! Runs a `BlockBuilder`'s declarations and evaluates lix expressions with a
//! stand-in for the `SqlFunctions` runtime class. Only the functions the
//! translator emits are covered.

#![allow(dead_code)]

use exprgen::lix::{BinaryOp, BlockBuilder, Expression, UnaryOp, RUNTIME_CLASS};
use exprgen::rex::{RexProgram, RexProgramBuilder, SqlOperator};
use exprgen::translate::{ArrayRowPhysType, InputGetterImpl};
use exprgen::types::{DataType, DefaultTypeAdapter, HostType, LogicalType, Primitive, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

pub type EvalResult = Result<Value, String>;

#[derive(Debug, Default)]
pub struct Interpreter {
    vars: HashMap<String, Value>,
    rows: HashMap<String, Vec<Value>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, name: &str, row: Vec<Value>) -> Self {
        self.rows.insert(name.to_string(), row);
        self
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Execute every declaration of `block` in order
    pub fn run(&mut self, block: &BlockBuilder) -> Result<(), String> {
        for statement in block.statements() {
            let name = statement.parameter().name.clone();
            if let Expression::Parameter(source) = statement.init() {
                if let Some(row) = self.rows.get(&source.name).cloned() {
                    self.rows.insert(name, row);
                    continue;
                }
            }
            let value = self.eval(statement.init())?;
            self.vars.insert(name, value);
        }
        Ok(())
    }

    pub fn eval(&self, expr: &Expression) -> EvalResult {
        match expr {
            Expression::Constant { value, .. } => Ok(value.clone()),
            Expression::Parameter(p) => self
                .vars
                .get(&p.name)
                .cloned()
                .ok_or_else(|| format!("unbound variable {}", p.name)),
            Expression::ArrayIndex { array, index, .. } => match array.as_ref() {
                Expression::Parameter(p) => self
                    .rows
                    .get(&p.name)
                    .and_then(|row| row.get(*index))
                    .cloned()
                    .ok_or_else(|| format!("no field {} in {}", index, p.name)),
                other => Err(format!("cannot index {}", other)),
            },
            Expression::Convert { operand, ty } => Ok(coerce(self.eval(operand)?, ty)),
            Expression::Call {
                target,
                method,
                args,
                ty,
            } => {
                let target = self.eval(target)?;
                match method.as_str() {
                    m if m.ends_with("Value") => {
                        if target.is_null() {
                            return Err(format!("{} on null", m));
                        }
                        Ok(coerce(target, ty))
                    }
                    "add" => {
                        let arg = self.eval(&args[0])?;
                        arithmetic(BinaryOp::Add, &target, &arg, ty)
                    }
                    other => Err(format!("unknown method {}", other)),
                }
            }
            Expression::StaticCall {
                class,
                method,
                args,
                ty,
            } => {
                if class != RUNTIME_CLASS {
                    return Err(format!("unknown class {}", class));
                }
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                sql_function(method, &args, ty)
            }
            Expression::New { ty, args } => match (ty, args.as_slice()) {
                (HostType::Decimal, [arg]) => match self.eval(arg)? {
                    Value::String(s) => Value::decimal(&s).ok_or_else(|| format!("bad decimal {}", s)),
                    other => Err(format!("cannot build decimal from {}", other)),
                },
                _ => Err(format!("cannot instantiate {}", ty)),
            },
            Expression::Binary {
                op,
                left,
                right,
                ty,
            } => {
                let left = self.eval(left)?;
                match op {
                    BinaryOp::AndAlso if !as_bool(&left)? => Ok(Value::Boolean(false)),
                    BinaryOp::OrElse if as_bool(&left)? => Ok(Value::Boolean(true)),
                    BinaryOp::AndAlso | BinaryOp::OrElse => {
                        Ok(Value::Boolean(as_bool(&self.eval(right)?)?))
                    }
                    _ => binary(*op, &left, &self.eval(right)?, ty),
                }
            }
            Expression::Unary { op, operand, ty } => {
                let operand = self.eval(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!as_bool(&operand)?)),
                    UnaryOp::Negate => {
                        arithmetic(BinaryOp::Subtract, &Value::Int64(0), &operand, ty)
                    }
                }
            }
            Expression::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => {
                if as_bool(&self.eval(test)?)? {
                    self.eval(if_true)
                } else {
                    self.eval(if_false)
                }
            }
            Expression::Lambda { .. } => Err("cannot evaluate a lambda".to_string()),
        }
    }
}

fn as_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(format!("not a boolean: {}", other)),
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int8(n) => Some(i64::from(*n)),
        Value::Int16(n) => Some(i64::from(*n)),
        Value::Int32(n) => Some(i64::from(*n)),
        Value::Int64(n) => Some(*n),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(n) => Some(f64::from(*n)),
        Value::Double(n) => Some(*n),
        other => as_i64(other).map(|n| n as f64),
    }
}

/// Host cast of a runtime value
fn coerce(value: Value, ty: &HostType) -> Value {
    if value.is_null() {
        return value;
    }
    let primitive = match Primitive::of(ty).or_else(|| Primitive::of_box(ty)) {
        Some(p) => p,
        None => return value,
    };
    let int = as_i64(&value).or_else(|| as_f64(&value).map(|f| f as i64));
    match (primitive, int) {
        (Primitive::Byte, Some(n)) => Value::Int8(n as i8),
        (Primitive::Short, Some(n)) => Value::Int16(n as i16),
        (Primitive::Int | Primitive::Char, Some(n)) => Value::Int32(n as i32),
        (Primitive::Long, Some(n)) => Value::Int64(n),
        (Primitive::Float, _) => as_f64(&value).map_or(value, |f| Value::Float(f as f32)),
        (Primitive::Double, _) => as_f64(&value).map_or(value, Value::Double),
        _ => value,
    }
}

fn compare(left: &Value, right: &Value) -> Result<Ordering, String> {
    if let (Some(l), Some(r)) = (as_i64(left), as_i64(right)) {
        return Ok(l.cmp(&r));
    }
    if let (Some(l), Some(r)) = (as_f64(left), as_f64(right)) {
        return l.partial_cmp(&r).ok_or_else(|| "NaN".to_string());
    }
    match (left, right) {
        (Value::String(l), Value::String(r)) => Ok(l.cmp(r)),
        (Value::Boolean(l), Value::Boolean(r)) => Ok(l.cmp(r)),
        _ => Err(format!("cannot compare {} and {}", left, right)),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.is_null(), right.is_null()) {
        (true, true) => true,
        (false, false) => compare(left, right)
            .map(|o| o == Ordering::Equal)
            .unwrap_or(left == right),
        _ => false,
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value, ty: &HostType) -> EvalResult {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    if let (Some(l), Some(r)) = (as_i64(left), as_i64(right)) {
        let result = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::Divide | BinaryOp::Modulo if r == 0 => {
                return Err("division by zero".to_string())
            }
            BinaryOp::Divide => l / r,
            BinaryOp::Modulo => l % r,
            other => return Err(format!("{} is not arithmetic", other.as_str())),
        };
        return Ok(coerce(Value::Int64(result), ty));
    }
    let (l, r) = match (as_f64(left), as_f64(right)) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err(format!("cannot apply {} to {} and {}", op.as_str(), left, right)),
    };
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Subtract => l - r,
        BinaryOp::Multiply => l * r,
        BinaryOp::Divide => l / r,
        BinaryOp::Modulo => l % r,
        other => return Err(format!("{} is not arithmetic", other.as_str())),
    };
    Ok(coerce(Value::Double(result), ty))
}

fn binary(op: BinaryOp, left: &Value, right: &Value, ty: &HostType) -> EvalResult {
    let ordering = |accept: fn(Ordering) -> bool| -> EvalResult {
        Ok(Value::Boolean(accept(compare(left, right)?)))
    };
    match op {
        BinaryOp::Equal => Ok(Value::Boolean(values_equal(left, right))),
        BinaryOp::NotEqual => Ok(Value::Boolean(!values_equal(left, right))),
        BinaryOp::LessThan => ordering(|o| o == Ordering::Less),
        BinaryOp::LessThanOrEqual => ordering(|o| o != Ordering::Greater),
        BinaryOp::GreaterThan => ordering(|o| o == Ordering::Greater),
        BinaryOp::GreaterThanOrEqual => ordering(|o| o != Ordering::Less),
        _ => arithmetic(op, left, right, ty),
    }
}

/// Stand-in for the runtime support class; null in, null out
fn sql_function(method: &str, args: &[Value], ty: &HostType) -> EvalResult {
    let comparison = |accept: fn(Ordering) -> bool| -> EvalResult {
        if args[0].is_null() || args[1].is_null() {
            return Ok(Value::Null);
        }
        Ok(Value::Boolean(accept(compare(&args[0], &args[1])?)))
    };
    match method {
        "plus" => arithmetic(BinaryOp::Add, &args[0], &args[1], ty),
        "minus" => arithmetic(BinaryOp::Subtract, &args[0], &args[1], ty),
        "multiply" => arithmetic(BinaryOp::Multiply, &args[0], &args[1], ty),
        "divide" => arithmetic(BinaryOp::Divide, &args[0], &args[1], ty),
        "mod" => arithmetic(BinaryOp::Modulo, &args[0], &args[1], ty),
        "lt" => comparison(|o| o == Ordering::Less),
        "le" => comparison(|o| o != Ordering::Greater),
        "gt" => comparison(|o| o == Ordering::Greater),
        "ge" => comparison(|o| o != Ordering::Less),
        "eq" => comparison(|o| o == Ordering::Equal),
        "ne" => comparison(|o| o != Ordering::Equal),
        "and" => {
            if args.iter().any(|a| matches!(a, Value::Boolean(false))) {
                Ok(Value::Boolean(false))
            } else if args.iter().any(Value::is_null) {
                Ok(Value::Null)
            } else {
                Ok(Value::Boolean(true))
            }
        }
        "or" => {
            if args.iter().any(|a| matches!(a, Value::Boolean(true))) {
                Ok(Value::Boolean(true))
            } else if args.iter().any(Value::is_null) {
                Ok(Value::Null)
            } else {
                Ok(Value::Boolean(false))
            }
        }
        "not" => match &args[0] {
            Value::Null => Ok(Value::Null),
            other => Ok(Value::Boolean(!as_bool(other)?)),
        },
        "upper" | "lower" => match &args[0] {
            Value::Null => Ok(Value::Null),
            Value::String(s) if method == "upper" => Ok(Value::String(s.to_uppercase())),
            Value::String(s) => Ok(Value::String(s.to_lowercase())),
            other => Err(format!("{} of {}", method, other)),
        },
        "substring" => match (&args[0], args.get(1).and_then(as_i64)) {
            (Value::String(s), Some(start)) => {
                let skip = (start.max(1) - 1) as usize;
                let chars = s.chars().skip(skip);
                let text: String = match args.get(2).and_then(as_i64) {
                    Some(len) => chars.take(len.max(0) as usize).collect(),
                    None => chars.collect(),
                };
                Ok(Value::String(text))
            }
            _ => Ok(Value::Null),
        },
        "lesser" | "greater" => {
            let ordering = compare(&args[0], &args[1])?;
            let pick_left = if method == "lesser" {
                ordering != Ordering::Greater
            } else {
                ordering != Ordering::Less
            };
            let picked = if pick_left { &args[0] } else { &args[1] };
            Ok(coerce(picked.clone(), ty))
        }
        other => Err(format!("unknown runtime function {}", other)),
    }
}

pub fn int() -> LogicalType {
    LogicalType::new(DataType::Int32)
}

pub fn nullable_int() -> LogicalType {
    LogicalType::nullable(DataType::Int32)
}

pub fn boolean() -> LogicalType {
    LogicalType::new(DataType::Boolean)
}

/// Input getter reading `row` as an `Object[]` of the program's input type
pub fn row_input(program: &RexProgram) -> InputGetterImpl {
    InputGetterImpl::single(
        Expression::parameter("row", HostType::object_array()),
        ArrayRowPhysType::of(program.input_row_type(), &DefaultTypeAdapter),
    )
}

/// `CASE WHEN x > 0 THEN 1 WHEN x < 0 THEN -1 ELSE 0 END` over one INT column
pub fn sign_program() -> RexProgram {
    let mut builder = RexProgramBuilder::new(vec![int()]);
    let x = builder.make_input_ref(0).unwrap();
    let zero = builder.make_literal(Value::Int32(0), int());
    let positive = builder.make_call(SqlOperator::GreaterThan, vec![x.clone(), zero.clone()], boolean());
    let negative = builder.make_call(SqlOperator::LessThan, vec![x, zero.clone()], boolean());
    let one = builder.make_literal(Value::Int32(1), int());
    let minus_one = builder.make_literal(Value::Int32(-1), int());
    let case = builder.make_case(vec![(positive, one), (negative, minus_one)], zero, int());
    builder.add_project(case);
    builder.build().unwrap()
}
