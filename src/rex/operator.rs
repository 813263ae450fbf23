//! Operator and aggregate function identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar operators that can appear in a call node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlOperator {
    // String functions
    Upper,
    Lower,
    Substring,
    Concat,
    Like,

    // Logical
    And,
    Or,
    Not,

    // Comparison
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equals,
    NotEquals,

    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Mod,
    Exp,

    // NULL checks
    IsNull,
    IsNotNull,

    // Special forms
    Case,
    Cast,
    Coalesce,
}

impl SqlOperator {
    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlOperator::Upper => "UPPER",
            SqlOperator::Lower => "LOWER",
            SqlOperator::Substring => "SUBSTRING",
            SqlOperator::Concat => "||",
            SqlOperator::Like => "LIKE",
            SqlOperator::And => "AND",
            SqlOperator::Or => "OR",
            SqlOperator::Not => "NOT",
            SqlOperator::LessThan => "<",
            SqlOperator::LessThanOrEqual => "<=",
            SqlOperator::GreaterThan => ">",
            SqlOperator::GreaterThanOrEqual => ">=",
            SqlOperator::Equals => "=",
            SqlOperator::NotEquals => "<>",
            SqlOperator::Plus => "+",
            SqlOperator::Minus => "-",
            SqlOperator::Multiply => "*",
            SqlOperator::Divide => "/",
            SqlOperator::Mod => "MOD",
            SqlOperator::Exp => "EXP",
            SqlOperator::IsNull => "IS NULL",
            SqlOperator::IsNotNull => "IS NOT NULL",
            SqlOperator::Case => "CASE",
            SqlOperator::Cast => "CAST",
            SqlOperator::Coalesce => "COALESCE",
        }
    }

    /// Whether the operator yields a boolean
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            SqlOperator::And
                | SqlOperator::Or
                | SqlOperator::Not
                | SqlOperator::LessThan
                | SqlOperator::LessThanOrEqual
                | SqlOperator::GreaterThan
                | SqlOperator::GreaterThanOrEqual
                | SqlOperator::Equals
                | SqlOperator::NotEquals
                | SqlOperator::IsNull
                | SqlOperator::IsNotNull
                | SqlOperator::Like
        )
    }
}

impl fmt::Display for SqlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    /// COUNT(*) or COUNT(expr)
    Count,
    /// SUM(expr)
    Sum,
    /// AVG(expr)
    Avg,
    /// MIN(expr)
    Min,
    /// MAX(expr)
    Max,
}

impl AggregateFunction {
    /// Returns the name of the aggregate function
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
