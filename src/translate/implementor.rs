//! Operator implementor table.
//!
//! Maps each supported operator to the strategy that generates its code. The
//! default table calls into the runtime support class for every logical,
//! comparison and arithmetic operator; `ImpTable::with_native_operators`
//! lowers logic and comparisons to host operators instead.

use crate::lix::{BinaryOp, Expression, UnaryOp};
use crate::rex::{AggregateFunction, RexNode, SqlOperator};
use crate::translate::aggregate::{
    AccumulatorImplementor, AggregateImplementor, BuiltinAggregateImplementor,
    CountImplementor, MinMaxImplementor, SumImplementor,
};
use crate::translate::convert::{convert, unbox};
use crate::translate::error::{TranslateError, TranslateResult};
use crate::translate::translator::RexToLixTranslator;
use crate::types::HostType;
use log::debug;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Code generation strategy for calls to one operator.
///
/// `call` borrows from the translated program for as long as the translator
/// lives, so the translator can key its slots by node identity.
pub trait CallImplementor: Send + Sync {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression>;
}

fn malformed(call: &RexNode) -> TranslateError {
    TranslateError::UnsupportedExpressionKind {
        kind: call.kind(),
        digest: call.to_string(),
    }
}

/// `SqlFunctions.<method>(args...)`
struct MethodImplementor {
    method: &'static str,
}

impl CallImplementor for MethodImplementor {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression> {
        let args = translator.translate_operands(call)?;
        let ty = translator.host_type(call.ty());
        Ok(Expression::runtime_call(self.method, args, ty))
    }
}

/// Native binary operator, folded left over the operands
struct BinaryImplementor {
    op: BinaryOp,
}

impl CallImplementor for BinaryImplementor {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression> {
        let args = translator.translate_operands(call)?;
        if args.len() < 2 {
            return Err(malformed(call));
        }
        let op = self.op;
        let folded = args.into_iter().map(unbox).reduce(|left, right| {
            Expression::binary(op, left, right)
        });
        folded.ok_or_else(|| malformed(call))
    }
}

struct UnaryImplementor {
    op: UnaryOp,
}

impl CallImplementor for UnaryImplementor {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression> {
        let mut args = translator.translate_operands(call)?;
        if args.len() != 1 {
            return Err(malformed(call));
        }
        let operand = unbox(args.remove(0));
        let ty = operand.ty().clone();
        Ok(Expression::make_unary(self.op, operand, ty))
    }
}

/// `x == null` or `x != null`
struct NullTestImplementor {
    is_not_null: bool,
}

impl CallImplementor for NullTestImplementor {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression> {
        let mut args = translator.translate_operands(call)?;
        if args.len() != 1 {
            return Err(malformed(call));
        }
        let operand = args.remove(0);
        // a primitive is never null
        if operand.ty().is_primitive() {
            return Ok(Expression::boolean(self.is_not_null));
        }
        Ok(if self.is_not_null {
            Expression::not_equal(operand, Expression::null())
        } else {
            Expression::equal(operand, Expression::null())
        })
    }
}

/// Nested conditionals, one per WHEN branch.
///
/// Conditions and values are translated in source order, so the declarations
/// they need come out in that order too; the conditional is then assembled
/// from the last branch outward.
struct CaseImplementor;

impl CallImplementor for CaseImplementor {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression> {
        let (branches, otherwise): (Vec<(&RexNode, &RexNode)>, &RexNode) = match call {
            RexNode::Case {
                branches,
                otherwise,
                ..
            } => (
                branches.iter().map(|(c, r)| (c, r)).collect(),
                otherwise.as_ref(),
            ),
            // flat WHEN/THEN/.../ELSE operand list
            RexNode::Call { operands, .. } if operands.len() % 2 == 1 => {
                let (last, pairs) = operands.split_last().ok_or_else(|| malformed(call))?;
                let branches = pairs
                    .chunks(2)
                    .map(|pair| (&pair[0], &pair[1]))
                    .collect();
                (branches, last)
            }
            _ => return Err(malformed(call)),
        };

        let ty = translator.host_type(call.ty());
        let mut translated = Vec::with_capacity(branches.len());
        for (condition, result) in branches {
            let test = convert(translator.translate(condition)?, &HostType::BOOLEAN);
            let value = convert(translator.translate(result)?, &ty);
            translated.push((test, value));
        }
        let mut expression = convert(translator.translate(otherwise)?, &ty);
        for (test, value) in translated.into_iter().rev() {
            expression = Expression::condition(test, value, expression);
        }
        Ok(expression)
    }
}

/// Coerce the operand to the call's host type
struct CastImplementor;

impl CallImplementor for CastImplementor {
    fn implement<'a>(
        &self,
        translator: &mut RexToLixTranslator<'a>,
        call: &'a RexNode,
    ) -> TranslateResult<Expression> {
        let mut args = translator.translate_operands(call)?;
        if args.len() != 1 {
            return Err(malformed(call));
        }
        let ty = translator.host_type(call.ty());
        Ok(convert(args.remove(0), &ty))
    }
}

/// Registry of code generation strategies.
///
/// Read-only once built; the shared instance is created on first use.
pub struct ImpTable {
    map: HashMap<SqlOperator, Box<dyn CallImplementor>>,
    agg_map: HashMap<AggregateFunction, Box<dyn AggregateImplementor>>,
    agg2_map: HashMap<AggregateFunction, Box<dyn AccumulatorImplementor>>,
}

impl ImpTable {
    /// The process-wide default table
    pub fn instance() -> &'static ImpTable {
        static INSTANCE: OnceLock<ImpTable> = OnceLock::new();
        INSTANCE.get_or_init(ImpTable::new)
    }

    /// The process-wide table with native logic and comparisons
    pub fn native_instance() -> &'static ImpTable {
        static INSTANCE: OnceLock<ImpTable> = OnceLock::new();
        INSTANCE.get_or_init(ImpTable::with_native_operators)
    }

    pub fn new() -> Self {
        let mut table = Self {
            map: HashMap::new(),
            agg_map: HashMap::new(),
            agg2_map: HashMap::new(),
        };

        table.define_method(SqlOperator::Upper, "upper");
        table.define_method(SqlOperator::Lower, "lower");
        table.define_method(SqlOperator::Substring, "substring");

        table.define_method(SqlOperator::And, "and");
        table.define_method(SqlOperator::Or, "or");
        table.define_method(SqlOperator::Not, "not");

        table.define_method(SqlOperator::LessThan, "lt");
        table.define_method(SqlOperator::LessThanOrEqual, "le");
        table.define_method(SqlOperator::GreaterThan, "gt");
        table.define_method(SqlOperator::GreaterThanOrEqual, "ge");
        table.define_method(SqlOperator::Equals, "eq");
        table.define_method(SqlOperator::NotEquals, "ne");

        table.define_method(SqlOperator::Plus, "plus");
        table.define_method(SqlOperator::Minus, "minus");
        table.define_method(SqlOperator::Multiply, "multiply");
        table.define_method(SqlOperator::Divide, "divide");
        table.define_method(SqlOperator::Mod, "mod");
        table.define_method(SqlOperator::Exp, "exp");

        table.define(
            SqlOperator::IsNull,
            NullTestImplementor { is_not_null: false },
        );
        table.define(
            SqlOperator::IsNotNull,
            NullTestImplementor { is_not_null: true },
        );
        table.define(SqlOperator::Case, CaseImplementor);
        table.define(SqlOperator::Cast, CastImplementor);

        table.agg_map.insert(
            AggregateFunction::Count,
            Box::new(BuiltinAggregateImplementor::returning("longCount", HostType::LONG)),
        );
        table.define_aggregate(AggregateFunction::Sum, "sum");
        table.define_aggregate(AggregateFunction::Min, "min");
        table.define_aggregate(AggregateFunction::Max, "max");

        table
            .agg2_map
            .insert(AggregateFunction::Count, Box::new(CountImplementor));
        table
            .agg2_map
            .insert(AggregateFunction::Sum, Box::new(SumImplementor));
        table
            .agg2_map
            .insert(AggregateFunction::Min, Box::new(MinMaxImplementor));
        table
            .agg2_map
            .insert(AggregateFunction::Max, Box::new(MinMaxImplementor));

        debug!(
            "implementor table ready: {} operators, {} aggregates",
            table.map.len(),
            table.agg_map.len()
        );
        table
    }

    /// The default table with logic and comparisons lowered to host operators
    pub fn with_native_operators() -> Self {
        let mut table = Self::new();
        table.define_binary(SqlOperator::And, BinaryOp::AndAlso);
        table.define_binary(SqlOperator::Or, BinaryOp::OrElse);
        table.define_binary(SqlOperator::LessThan, BinaryOp::LessThan);
        table.define_binary(SqlOperator::LessThanOrEqual, BinaryOp::LessThanOrEqual);
        table.define_binary(SqlOperator::GreaterThan, BinaryOp::GreaterThan);
        table.define_binary(SqlOperator::GreaterThanOrEqual, BinaryOp::GreaterThanOrEqual);
        table.define_binary(SqlOperator::Equals, BinaryOp::Equal);
        table.define_binary(SqlOperator::NotEquals, BinaryOp::NotEqual);
        table.define(SqlOperator::Not, UnaryImplementor { op: UnaryOp::Not });
        table
    }

    fn define(&mut self, operator: SqlOperator, implementor: impl CallImplementor + 'static) {
        self.map.insert(operator, Box::new(implementor));
    }

    fn define_method(&mut self, operator: SqlOperator, method: &'static str) {
        self.define(operator, MethodImplementor { method });
    }

    fn define_binary(&mut self, operator: SqlOperator, op: BinaryOp) {
        self.define(operator, BinaryImplementor { op });
    }

    fn define_aggregate(&mut self, aggregation: AggregateFunction, method: &'static str) {
        self.agg_map
            .insert(aggregation, Box::new(BuiltinAggregateImplementor::new(method)));
    }

    pub fn get(&self, operator: SqlOperator) -> Option<&dyn CallImplementor> {
        self.map.get(&operator).map(|imp| imp.as_ref())
    }

    /// Whole-collection strategy for an aggregate function
    pub fn aggregate(&self, aggregation: AggregateFunction) -> Option<&dyn AggregateImplementor> {
        self.agg_map.get(&aggregation).map(|imp| imp.as_ref())
    }

    /// Incremental strategy for an aggregate function
    pub fn accumulator(
        &self,
        aggregation: AggregateFunction,
    ) -> Option<&dyn AccumulatorImplementor> {
        self.agg2_map.get(&aggregation).map(|imp| imp.as_ref())
    }
}

impl Default for ImpTable {
    fn default() -> Self {
        Self::new()
    }
}
