//! Expression programs.

use crate::rex::error::{ProgramError, ProgramResult};
use crate::rex::node::RexNode;
use crate::types::LogicalType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A topologically ordered list of expressions plus the outputs computed from
/// them.
///
/// Every `LocalRef` inside expression `i` points at an expression `j < i`, so
/// the list is an arena of an acyclic DAG. Projections and the condition are
/// `LocalRef`s into the same list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProgramParts")]
pub struct RexProgram {
    input_row_type: Vec<LogicalType>,
    exprs: Vec<RexNode>,
    projects: Vec<RexNode>,
    condition: Option<RexNode>,
}

/// Unvalidated program contents, as found in program files
#[derive(Debug, Clone, Deserialize)]
struct ProgramParts {
    input_row_type: Vec<LogicalType>,
    exprs: Vec<RexNode>,
    projects: Vec<RexNode>,
    #[serde(default)]
    condition: Option<RexNode>,
}

impl TryFrom<ProgramParts> for RexProgram {
    type Error = ProgramError;

    fn try_from(parts: ProgramParts) -> ProgramResult<Self> {
        RexProgram::new(
            parts.input_row_type,
            parts.exprs,
            parts.projects,
            parts.condition,
        )
    }
}

impl RexProgram {
    /// Create a program, checking that every reference resolves backwards
    /// and that every literal fits its declared type
    pub fn new(
        input_row_type: Vec<LogicalType>,
        exprs: Vec<RexNode>,
        projects: Vec<RexNode>,
        condition: Option<RexNode>,
    ) -> ProgramResult<Self> {
        for (at, expr) in exprs.iter().enumerate() {
            check_node(expr, at, exprs.len(), input_row_type.len())?;
        }
        for output in projects.iter().chain(condition.iter()) {
            match output {
                RexNode::LocalRef { index, .. } if *index < exprs.len() => {}
                RexNode::LocalRef { index, .. } => {
                    return Err(ProgramError::LocalIndexOutOfBounds {
                        index: *index,
                        count: exprs.len(),
                    })
                }
                other => {
                    return Err(ProgramError::NotALocalRef {
                        digest: other.to_string(),
                    })
                }
            }
        }

        Ok(Self {
            input_row_type,
            exprs,
            projects,
            condition,
        })
    }

    pub fn input_row_type(&self) -> &[LogicalType] {
        &self.input_row_type
    }

    /// The shared expression list addressed by `LocalRef`
    pub fn exprs(&self) -> &[RexNode] {
        &self.exprs
    }

    pub fn expr(&self, index: usize) -> Option<&RexNode> {
        self.exprs.get(index)
    }

    pub fn projects(&self) -> &[RexNode] {
        &self.projects
    }

    pub fn condition(&self) -> Option<&RexNode> {
        self.condition.as_ref()
    }

    /// Output row type of the projection list
    pub fn output_row_type(&self) -> Vec<LogicalType> {
        self.projects.iter().map(|p| *p.ty()).collect()
    }
}

fn check_node(
    node: &RexNode,
    at: usize,
    count: usize,
    field_count: usize,
) -> ProgramResult<()> {
    match node {
        RexNode::LocalRef { index, .. } if *index >= count => {
            return Err(ProgramError::LocalIndexOutOfBounds {
                index: *index,
                count,
            })
        }
        RexNode::LocalRef { index, .. } if *index >= at => {
            return Err(ProgramError::ForwardReference { at, index: *index })
        }
        RexNode::Literal { value, ty } if !value.fits(ty.data_type) => {
            return Err(ProgramError::LiteralTypeMismatch {
                digest: node.to_string(),
                ty: *ty,
            })
        }
        RexNode::InputRef { index, .. } if *index >= field_count => {
            return Err(ProgramError::InputIndexOutOfBounds {
                index: *index,
                field_count,
            })
        }
        _ => {}
    }

    let mut result = Ok(());
    node.for_each_child(|child| {
        if result.is_ok() {
            result = check_node(child, at, count, field_count);
        }
    });
    result
}

impl fmt::Display for RexProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "exprs:")?;
        for (i, expr) in self.exprs.iter().enumerate() {
            writeln!(f, "  $t{} = {}", i, expr)?;
        }
        let projects: Vec<String> = self.projects.iter().map(|p| p.to_string()).collect();
        write!(f, "projects: [{}]", projects.join(", "))?;
        if let Some(condition) = &self.condition {
            write!(f, "\ncondition: {}", condition)?;
        }
        Ok(())
    }
}
