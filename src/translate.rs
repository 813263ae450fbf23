//! Lowering of row expressions into lix expressions and declarations.
//!
//! This module provides:
//! - The expression translator with per-pass common subexpression elimination
//! - Literal lowering and host type coercion
//! - The process-wide operator implementor table
//! - Whole-collection and incremental aggregate lowering
//! - Input getters that read fields of the current input row

pub mod aggregate;
pub mod convert;
pub mod error;
pub mod implementor;
pub mod input;
pub mod literal;
pub mod translator;

pub use aggregate::{
    accumulator_implementor, translate_aggregate, AccumulatorImplementor, AggregateImplementor,
};
pub use convert::{convert, unbox};
pub use error::{TranslateError, TranslateResult};
pub use implementor::{CallImplementor, ImpTable};
pub use input::{ArrayRowPhysType, InputGetter, InputGetterImpl, PhysType};
pub use literal::translate_literal;
pub use translator::{
    translate_condition, translate_condition_with, translate_projects, translate_projects_with,
    InlinePolicy, RexToLixTranslator, TranslatorConfig,
};
