//! Statement sequence builder.

use crate::lix::expr::{Expression, ParameterExpression};
use std::collections::HashSet;
use std::fmt;

/// A statement of the generated block
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `[final] <type> <name> = <init>;`
    Declare {
        parameter: ParameterExpression,
        init: Expression,
        is_final: bool,
    },
}

impl Statement {
    /// The variable introduced by this statement
    pub fn parameter(&self) -> &ParameterExpression {
        match self {
            Statement::Declare { parameter, .. } => parameter,
        }
    }

    pub fn init(&self) -> &Expression {
        match self {
            Statement::Declare { init, .. } => init,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Declare {
                parameter,
                init,
                is_final,
            } => {
                if *is_final {
                    f.write_str("final ")?;
                }
                write!(f, "{} {} = {};", parameter.ty, parameter.name, init)
            }
        }
    }
}

/// Position in a block to roll back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    len: usize,
}

/// Ordered list of declarations with unique variable names
#[derive(Debug, Clone, Default)]
pub struct BlockBuilder {
    statements: Vec<Statement>,
    names: HashSet<String>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Reserve a variable name based on `suggestion`.
    ///
    /// Returns the suggestion itself if unused, else the first free
    /// `suggestion_N`.
    pub fn new_name(&mut self, suggestion: &str) -> String {
        let mut name = suggestion.to_string();
        let mut n = 1;
        while self.names.contains(&name) {
            name = format!("{}_{}", suggestion, n);
            n += 1;
        }
        self.names.insert(name.clone());
        name
    }

    pub fn add(&mut self, statement: Statement) {
        self.names.insert(statement.parameter().name.clone());
        self.statements.push(statement);
    }

    /// Declare a final variable holding `init` and return it
    pub fn declare_final(&mut self, suggestion: &str, init: Expression) -> ParameterExpression {
        let name = self.new_name(suggestion);
        let parameter = ParameterExpression::new(name, init.ty().clone());
        log::trace!("declare {} = {}", parameter.name, init);
        self.statements.push(Statement::Declare {
            parameter: parameter.clone(),
            init,
            is_final: true,
        });
        parameter
    }

    /// Bind `expression` to a variable, reusing an earlier final variable that
    /// already holds the same expression.
    pub fn append(&mut self, suggestion: &str, expression: Expression) -> Expression {
        let existing = self.statements.iter().find_map(|statement| match statement {
            Statement::Declare {
                parameter,
                init,
                is_final: true,
            } if *init == expression => Some(parameter.clone()),
            _ => None,
        });
        match existing {
            Some(parameter) => Expression::Parameter(parameter),
            None => Expression::Parameter(self.declare_final(suggestion, expression)),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.statements.len(),
        }
    }

    /// Discard every statement added since `checkpoint`
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        for statement in self.statements.drain(checkpoint.len..) {
            self.names.remove(&statement.parameter().name);
        }
    }
}

impl fmt::Display for BlockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HostType, Value};

    #[test]
    fn test_unique_names() {
        let mut block = BlockBuilder::new();
        assert_eq!(block.new_name("v0"), "v0");
        assert_eq!(block.new_name("v0"), "v0_1");
        assert_eq!(block.new_name("v0"), "v0_2");
        assert_eq!(block.new_name("v1"), "v1");
    }

    #[test]
    fn test_declare_and_render() {
        let mut block = BlockBuilder::new();
        let v = block.declare_final("v0", Expression::constant(Value::Int32(3), HostType::INT));
        assert_eq!(v.name, "v0");
        assert_eq!(v.ty, HostType::INT);
        assert_eq!(block.to_string(), "final int v0 = 3;\n");
    }

    #[test]
    fn test_append_reuses_declaration() {
        let mut block = BlockBuilder::new();
        let row = Expression::parameter("row", HostType::object_array());
        let a = block.append("current0", row.clone());
        let b = block.append("current1", row);
        assert_eq!(a, b);
        assert_eq!(block.len(), 1);
        assert_eq!(a.to_string(), "current0");
    }

    #[test]
    fn test_rollback() {
        let mut block = BlockBuilder::new();
        block.declare_final("a", Expression::boolean(true));
        let checkpoint = block.checkpoint();
        block.declare_final("b", Expression::boolean(false));
        block.declare_final("c", Expression::boolean(false));
        assert_eq!(block.len(), 3);

        block.rollback(checkpoint);
        assert_eq!(block.len(), 1);
        // released names can be reused
        assert_eq!(block.new_name("b"), "b");
        assert_eq!(block.new_name("a"), "a_1");
    }
}
