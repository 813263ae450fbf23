//! Aggregate function lowering.
//!
//! This module implements two independent strategies:
//! - Whole-collection: a single call to a built-in aggregate method on the
//!   grouping collection, optionally passing an accessor
//! - Incremental: init/add/result expressions over an accumulator, one
//!   accumulator per group, updated once per input row
//!
//! With `call_on_null` false, the container skips `add` for rows whose
//! arguments are null, so the generated add code never sees a null argument.

use crate::lix::{BinaryOp, Expression};
use crate::rex::AggregateFunction;
use crate::translate::convert::{convert, unbox};
use crate::translate::error::{TranslateError, TranslateResult};
use crate::translate::implementor::ImpTable;
use crate::types::{HostType, Primitive, Value};
use log::debug;

/// Aggregates a whole group with one call
pub trait AggregateImplementor: Send + Sync {
    fn implement_aggregate(&self, grouping: Expression, accessor: Option<Expression>) -> Expression;
}

/// Aggregates incrementally through an accumulator
pub trait AccumulatorImplementor: Send + Sync {
    /// Whether `add` must also run for null arguments
    fn call_on_null(&self) -> bool;

    /// Initial accumulator value
    fn implement_init(
        &self,
        aggregation: AggregateFunction,
        return_type: &HostType,
        parameter_types: &[HostType],
    ) -> Expression;

    /// Next accumulator value, given the current one and this row's arguments
    fn implement_add(
        &self,
        aggregation: AggregateFunction,
        accumulator: &Expression,
        arguments: &[Expression],
    ) -> TranslateResult<Expression>;

    fn implement_result(&self, _aggregation: AggregateFunction, accumulator: &Expression) -> Expression {
        accumulator.clone()
    }
}

/// `grouping.<method>([accessor])`
pub struct BuiltinAggregateImplementor {
    method: &'static str,
    /// Fixed result type; otherwise the accessor's type
    result_type: Option<HostType>,
}

impl BuiltinAggregateImplementor {
    pub fn new(method: &'static str) -> Self {
        Self {
            method,
            result_type: None,
        }
    }

    pub fn returning(method: &'static str, result_type: HostType) -> Self {
        Self {
            method,
            result_type: Some(result_type),
        }
    }
}

impl AggregateImplementor for BuiltinAggregateImplementor {
    fn implement_aggregate(&self, grouping: Expression, accessor: Option<Expression>) -> Expression {
        let ty = match (&self.result_type, &accessor) {
            (Some(ty), _) => ty.clone(),
            (None, Some(accessor)) => accessor.ty().clone(),
            (None, None) => HostType::Object,
        };
        Expression::call(grouping, self.method, accessor.into_iter().collect(), ty)
    }
}

pub struct CountImplementor;

impl AccumulatorImplementor for CountImplementor {
    fn call_on_null(&self) -> bool {
        false
    }

    fn implement_init(
        &self,
        _aggregation: AggregateFunction,
        return_type: &HostType,
        _parameter_types: &[HostType],
    ) -> Expression {
        numeric_constant(0, return_type)
    }

    fn implement_add(
        &self,
        _aggregation: AggregateFunction,
        accumulator: &Expression,
        _arguments: &[Expression],
    ) -> TranslateResult<Expression> {
        let one = numeric_constant(1, accumulator.ty());
        Ok(add(accumulator, one))
    }
}

pub struct SumImplementor;

impl AccumulatorImplementor for SumImplementor {
    fn call_on_null(&self) -> bool {
        false
    }

    fn implement_init(
        &self,
        _aggregation: AggregateFunction,
        return_type: &HostType,
        _parameter_types: &[HostType],
    ) -> Expression {
        numeric_constant(0, return_type)
    }

    fn implement_add(
        &self,
        aggregation: AggregateFunction,
        accumulator: &Expression,
        arguments: &[Expression],
    ) -> TranslateResult<Expression> {
        let argument = single_argument(aggregation, arguments)?;
        if accumulator.ty().is_arbitrary_precision() {
            return Ok(add(accumulator, argument.clone()));
        }
        Ok(add(accumulator, convert(argument.clone(), accumulator.ty())))
    }
}

/// Shared by MIN and MAX; the aggregation passed in picks the comparison
pub struct MinMaxImplementor;

impl AccumulatorImplementor for MinMaxImplementor {
    fn call_on_null(&self) -> bool {
        false
    }

    /// Typed null, boxed even for a NOT NULL column: null means "no row yet"
    fn implement_init(
        &self,
        _aggregation: AggregateFunction,
        return_type: &HostType,
        _parameter_types: &[HostType],
    ) -> Expression {
        Expression::typed_null(return_type.boxed())
    }

    fn implement_add(
        &self,
        aggregation: AggregateFunction,
        accumulator: &Expression,
        arguments: &[Expression],
    ) -> TranslateResult<Expression> {
        let method = match aggregation {
            AggregateFunction::Min => "lesser",
            AggregateFunction::Max => "greater",
            other => return Err(TranslateError::UnknownAggregate { aggregation: other }),
        };
        let argument = single_argument(aggregation, arguments)?;
        let current = unbox(accumulator.clone());
        let ty = current.ty().clone();
        let next = convert(
            Expression::runtime_call(method, vec![current, argument.clone()], ty),
            argument.ty(),
        );
        Ok(Expression::condition(
            Expression::equal(accumulator.clone(), Expression::null()),
            argument.clone(),
            next,
        ))
    }
}

fn single_argument(
    aggregation: AggregateFunction,
    arguments: &[Expression],
) -> TranslateResult<&Expression> {
    match arguments {
        [argument] => Ok(argument),
        _ => Err(TranslateError::AggregateArity {
            aggregation,
            expected: 1,
            actual: arguments.len(),
        }),
    }
}

/// `acc + x`, or `acc.add(x)` when the accumulator has its own arithmetic
fn add(accumulator: &Expression, operand: Expression) -> Expression {
    let ty = accumulator.ty().clone();
    if ty.is_arbitrary_precision() {
        Expression::call(accumulator.clone(), "add", vec![operand], ty)
    } else {
        Expression::make_binary(BinaryOp::Add, accumulator.clone(), operand, ty)
    }
}

/// Small integer constant of host type `ty`; other types get a converted `int`
fn numeric_constant(n: i8, ty: &HostType) -> Expression {
    let primitive = match ty {
        HostType::Primitive(p) | HostType::Boxed(p) => *p,
        HostType::Decimal | HostType::BigInteger => {
            return Expression::new_instance(
                ty.clone(),
                vec![Expression::constant(Value::String(n.to_string()), HostType::String)],
            )
        }
        _ => return convert(Expression::constant(Value::Int32(n.into()), HostType::INT), ty),
    };
    let value = match primitive {
        Primitive::Boolean => Value::Boolean(n != 0),
        Primitive::Byte => Value::Int8(n),
        Primitive::Short => Value::Int16(n.into()),
        Primitive::Char | Primitive::Int => Value::Int32(n.into()),
        Primitive::Long => Value::Int64(n.into()),
        Primitive::Float => Value::Float(n.into()),
        Primitive::Double => Value::Double(n.into()),
    };
    Expression::constant(value, ty.clone())
}

/// Whole-collection aggregate over `grouping`.
///
/// COUNT ignores the accessor and counts rows.
pub fn translate_aggregate(
    aggregation: AggregateFunction,
    grouping: Expression,
    accessor: Option<Expression>,
) -> TranslateResult<Expression> {
    let implementor = ImpTable::instance()
        .aggregate(aggregation)
        .ok_or(TranslateError::UnknownAggregate { aggregation })?;
    let accessor = match aggregation {
        AggregateFunction::Count => None,
        _ => accessor,
    };
    let expression = implementor.implement_aggregate(grouping, accessor);
    debug!("{} lowered to {}", aggregation, expression);
    Ok(expression)
}

/// Incremental strategy for `aggregation`
pub fn accumulator_implementor(
    aggregation: AggregateFunction,
) -> TranslateResult<&'static dyn AccumulatorImplementor> {
    ImpTable::instance()
        .accumulator(aggregation)
        .ok_or(TranslateError::UnknownAggregate { aggregation })
}
