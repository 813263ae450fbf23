//! Program construction errors.

use crate::types::LogicalType;
use thiserror::Error;

/// Errors raised while assembling or validating a program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    #[error("Expression {at} references $t{index}, which is not defined before it")]
    ForwardReference { at: usize, index: usize },

    #[error("Local reference $t{index} out of bounds for program with {count} expressions")]
    LocalIndexOutOfBounds { index: usize, count: usize },

    #[error("Input reference ${index} out of bounds for row with {field_count} fields")]
    InputIndexOutOfBounds { index: usize, field_count: usize },

    #[error("Program output must be a local reference, got {digest}")]
    NotALocalRef { digest: String },

    #[error("Literal {digest} does not fit type {ty}")]
    LiteralTypeMismatch { digest: String, ty: LogicalType },
}

/// Result type for program construction.
pub type ProgramResult<T> = Result<T, ProgramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProgramError::ForwardReference { at: 1, index: 4 };
        assert_eq!(
            err.to_string(),
            "Expression 1 references $t4, which is not defined before it"
        );

        let err = ProgramError::InputIndexOutOfBounds {
            index: 5,
            field_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Input reference $5 out of bounds for row with 3 fields"
        );

        let err = ProgramError::NotALocalRef {
            digest: "+($0, 1)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Program output must be a local reference, got +($0, 1)"
        );

        let err = ProgramError::LiteralTypeMismatch {
            digest: "'x'".to_string(),
            ty: LogicalType::new(crate::types::DataType::Int32),
        };
        assert_eq!(
            err.to_string(),
            "Literal 'x' does not fit type INTEGER NOT NULL"
        );
    }
}
