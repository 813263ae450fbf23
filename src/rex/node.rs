//! Expression DAG nodes.

use crate::rex::operator::SqlOperator;
use crate::types::{LogicalType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression DAG node
///
/// Nodes are immutable. Sharing inside a program is expressed positionally:
/// a `LocalRef` names an earlier entry of the program's expression list
/// instead of owning a copy of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RexNode {
    /// Field of the input row
    InputRef { index: usize, ty: LogicalType },

    /// Back-reference to an expression of the enclosing program
    LocalRef { index: usize, ty: LogicalType },

    /// Typed constant
    Literal { value: Value, ty: LogicalType },

    /// Operator applied to ordered operands
    Call {
        op: SqlOperator,
        operands: Vec<RexNode>,
        ty: LogicalType,
    },

    /// `CASE WHEN c1 THEN r1 ... ELSE e END`
    Case {
        branches: Vec<(RexNode, RexNode)>,
        otherwise: Box<RexNode>,
        ty: LogicalType,
    },

    /// Positional query parameter (`?`), bound at execution time
    DynamicParam { index: usize, ty: LogicalType },
}

impl RexNode {
    pub fn input_ref(index: usize, ty: LogicalType) -> Self {
        RexNode::InputRef { index, ty }
    }

    pub fn local_ref(index: usize, ty: LogicalType) -> Self {
        RexNode::LocalRef { index, ty }
    }

    pub fn literal(value: Value, ty: LogicalType) -> Self {
        RexNode::Literal { value, ty }
    }

    pub fn call(op: SqlOperator, operands: Vec<RexNode>, ty: LogicalType) -> Self {
        RexNode::Call { op, operands, ty }
    }

    pub fn case(branches: Vec<(RexNode, RexNode)>, otherwise: RexNode, ty: LogicalType) -> Self {
        RexNode::Case {
            branches,
            otherwise: Box::new(otherwise),
            ty,
        }
    }

    /// Build a CASE from the flat `[c1, r1, c2, r2, ..., else]` operand form.
    ///
    /// Returns `None` unless the operand count is odd.
    pub fn case_from_flat(mut operands: Vec<RexNode>, ty: LogicalType) -> Option<Self> {
        if operands.len() % 2 == 0 {
            return None;
        }
        let otherwise = operands.pop()?;
        let mut branches = Vec::with_capacity(operands.len() / 2);
        let mut iter = operands.into_iter();
        while let (Some(condition), Some(result)) = (iter.next(), iter.next()) {
            branches.push((condition, result));
        }
        Some(Self::case(branches, otherwise, ty))
    }

    /// Logical type of the value this node produces
    pub fn ty(&self) -> &LogicalType {
        match self {
            RexNode::InputRef { ty, .. }
            | RexNode::LocalRef { ty, .. }
            | RexNode::Literal { ty, .. }
            | RexNode::Call { ty, .. }
            | RexNode::Case { ty, .. }
            | RexNode::DynamicParam { ty, .. } => ty,
        }
    }

    /// Operator identity used to find a code generation strategy
    pub fn operator(&self) -> Option<SqlOperator> {
        match self {
            RexNode::Call { op, .. } => Some(*op),
            RexNode::Case { .. } => Some(SqlOperator::Case),
            _ => None,
        }
    }

    /// Operands of a call; empty for every other node
    pub fn operands(&self) -> &[RexNode] {
        match self {
            RexNode::Call { operands, .. } => operands,
            _ => &[],
        }
    }

    /// Short name of the node variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            RexNode::InputRef { .. } => "input reference",
            RexNode::LocalRef { .. } => "local reference",
            RexNode::Literal { .. } => "literal",
            RexNode::Call { .. } => "call",
            RexNode::Case { .. } => "case",
            RexNode::DynamicParam { .. } => "dynamic parameter",
        }
    }

    /// Visit every node directly nested in this one
    pub fn for_each_child<F: FnMut(&RexNode)>(&self, mut f: F) {
        match self {
            RexNode::Call { operands, .. } => operands.iter().for_each(f),
            RexNode::Case {
                branches,
                otherwise,
                ..
            } => {
                for (condition, result) in branches {
                    f(condition);
                    f(result);
                }
                f(otherwise);
            }
            _ => {}
        }
    }
}

impl fmt::Display for RexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RexNode::InputRef { index, .. } => write!(f, "${}", index),
            RexNode::LocalRef { index, .. } => write!(f, "$t{}", index),
            RexNode::Literal { value, .. } => write!(f, "{}", value),
            RexNode::Call { op, operands, .. } => {
                write!(f, "{}(", op)?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str(")")
            }
            RexNode::Case {
                branches,
                otherwise,
                ..
            } => {
                f.write_str("CASE(")?;
                for (condition, result) in branches {
                    write!(f, "{}, {}, ", condition, result)?;
                }
                write!(f, "{})", otherwise)
            }
            RexNode::DynamicParam { index, .. } => write!(f, "?{}", index),
        }
    }
}
