//! Input row access.

use crate::lix::{BlockBuilder, Expression};
use crate::translate::convert::convert;
use crate::translate::error::{TranslateError, TranslateResult};
use crate::types::{HostType, LogicalType, TypeAdapter};

/// Produces the expression that reads field `index` of the current input.
///
/// May append declarations to `block`, e.g. to name the current row once.
pub trait InputGetter {
    fn field(&self, block: &mut BlockBuilder, index: usize) -> TranslateResult<Expression>;
}

/// Physical layout of a row
pub trait PhysType {
    fn field_count(&self) -> usize;

    /// Expression reading field `index` of `row`, typed as the field
    fn field_reference(&self, row: &Expression, index: usize) -> TranslateResult<Expression>;
}

/// Row stored as an `Object[]`; fields are cast from the array slots
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRowPhysType {
    field_types: Vec<HostType>,
}

impl ArrayRowPhysType {
    pub fn new(field_types: Vec<HostType>) -> Self {
        Self { field_types }
    }

    pub fn of(row_type: &[LogicalType], type_adapter: &dyn TypeAdapter) -> Self {
        Self::new(row_type.iter().map(|ty| type_adapter.host_type(ty)).collect())
    }

    pub fn field_types(&self) -> &[HostType] {
        &self.field_types
    }
}

impl PhysType for ArrayRowPhysType {
    fn field_count(&self) -> usize {
        self.field_types.len()
    }

    fn field_reference(&self, row: &Expression, index: usize) -> TranslateResult<Expression> {
        let ty = self
            .field_types
            .get(index)
            .ok_or(TranslateError::InputIndexOutOfBounds {
                index,
                field_count: self.field_types.len(),
            })?;
        Ok(convert(Expression::array_index(row.clone(), index), ty))
    }
}

/// Reads fields from one or more input rows.
///
/// Field indexes run across the inputs in order, as they do for the output
/// of a join: with inputs of 2 and 3 fields, field 3 is field 1 of the
/// second input.
pub struct InputGetterImpl {
    inputs: Vec<(Expression, Box<dyn PhysType>)>,
}

impl InputGetterImpl {
    pub fn new(inputs: Vec<(Expression, Box<dyn PhysType>)>) -> Self {
        Self { inputs }
    }

    pub fn single(row: Expression, phys_type: impl PhysType + 'static) -> Self {
        let phys_type: Box<dyn PhysType> = Box::new(phys_type);
        Self::new(vec![(row, phys_type)])
    }

    pub fn field_count(&self) -> usize {
        self.inputs.iter().map(|(_, phys)| phys.field_count()).sum()
    }
}

impl InputGetter for InputGetterImpl {
    fn field(&self, block: &mut BlockBuilder, index: usize) -> TranslateResult<Expression> {
        if self.inputs.is_empty() {
            return Err(TranslateError::NoInput { index });
        }
        let mut offset = index;
        for (ordinal, (row, phys_type)) in self.inputs.iter().enumerate() {
            if offset < phys_type.field_count() {
                let current = block.append(&format!("current{}", ordinal), row.clone());
                return phys_type.field_reference(&current, offset);
            }
            offset -= phys_type.field_count();
        }
        Err(TranslateError::InputIndexOutOfBounds {
            index,
            field_count: self.field_count(),
        })
    }
}
