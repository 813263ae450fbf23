//! Incremental construction of programs.

use crate::rex::error::{ProgramError, ProgramResult};
use crate::rex::node::RexNode;
use crate::rex::operator::SqlOperator;
use crate::rex::program::RexProgram;
use crate::types::{LogicalType, Value};
use std::collections::HashMap;

/// Builds a `RexProgram`, registering each distinct expression once.
///
/// Expressions are keyed by digest and type, so asking twice for the same
/// call yields the same `LocalRef`.
pub struct RexProgramBuilder {
    input_row_type: Vec<LogicalType>,
    exprs: Vec<RexNode>,
    digests: HashMap<String, usize>,
    projects: Vec<RexNode>,
    condition: Option<RexNode>,
}

impl RexProgramBuilder {
    pub fn new(input_row_type: Vec<LogicalType>) -> Self {
        Self {
            input_row_type,
            exprs: Vec::new(),
            digests: HashMap::new(),
            projects: Vec::new(),
            condition: None,
        }
    }

    /// Register an expression and return a reference to it
    pub fn register(&mut self, node: RexNode) -> RexNode {
        if let RexNode::LocalRef { .. } = node {
            return node;
        }
        let ty = *node.ty();
        let key = format!("{}:{}", node, ty);
        if let Some(&index) = self.digests.get(&key) {
            return RexNode::local_ref(index, ty);
        }
        let index = self.exprs.len();
        self.exprs.push(node);
        self.digests.insert(key, index);
        RexNode::local_ref(index, ty)
    }

    pub fn make_input_ref(&mut self, index: usize) -> ProgramResult<RexNode> {
        let ty = *self
            .input_row_type
            .get(index)
            .ok_or(ProgramError::InputIndexOutOfBounds {
                index,
                field_count: self.input_row_type.len(),
            })?;
        Ok(self.register(RexNode::input_ref(index, ty)))
    }

    pub fn make_literal(&mut self, value: Value, ty: LogicalType) -> RexNode {
        self.register(RexNode::literal(value, ty))
    }

    pub fn make_call(&mut self, op: SqlOperator, operands: Vec<RexNode>, ty: LogicalType) -> RexNode {
        let operands = operands.into_iter().map(|o| self.register(o)).collect();
        self.register(RexNode::call(op, operands, ty))
    }

    pub fn make_case(
        &mut self,
        branches: Vec<(RexNode, RexNode)>,
        otherwise: RexNode,
        ty: LogicalType,
    ) -> RexNode {
        let branches = branches
            .into_iter()
            .map(|(c, r)| (self.register(c), self.register(r)))
            .collect();
        let otherwise = self.register(otherwise);
        self.register(RexNode::case(branches, otherwise, ty))
    }

    /// Append an output column
    pub fn add_project(&mut self, node: RexNode) -> &mut Self {
        let local = self.register(node);
        self.projects.push(local);
        self
    }

    pub fn set_condition(&mut self, node: RexNode) -> &mut Self {
        let local = self.register(node);
        self.condition = Some(local);
        self
    }

    pub fn build(self) -> ProgramResult<RexProgram> {
        RexProgram::new(
            self.input_row_type,
            self.exprs,
            self.projects,
            self.condition,
        )
    }
}
