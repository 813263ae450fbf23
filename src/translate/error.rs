//! Translation errors.
//!
//! Every error is fatal for the pass that raised it; the translator rolls back
//! any declarations the pass added before returning it.

use crate::rex::{AggregateFunction, SqlOperator};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Cannot translate call to unsupported operator {operator}")]
    UnsupportedOperator { operator: SqlOperator },

    #[error("Cannot translate {kind} expression {digest}")]
    UnsupportedExpressionKind { kind: &'static str, digest: String },

    #[error("Unknown aggregate function: {aggregation}")]
    UnknownAggregate { aggregation: AggregateFunction },

    #[error("{aggregation} expects {expected} argument(s), got {actual}")]
    AggregateArity {
        aggregation: AggregateFunction,
        expected: usize,
        actual: usize,
    },

    #[error("Input field {index} out of bounds for row with {field_count} fields")]
    InputIndexOutOfBounds { index: usize, field_count: usize },

    #[error("No input available to read field {index} from")]
    NoInput { index: usize },
}

/// Result type for translation.
pub type TranslateResult<T> = Result<T, TranslateError>;
