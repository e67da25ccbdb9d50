//! Boolean fields encoded as 0/1.

use super::{target_column, Field, FieldCore, FieldKind, Matrices, DEFAULT_OUTPUT_NAME};
use crate::error::Result;
use crate::record::Record;
use std::ops::Range;

/// A boolean field, encoded as 1 for truthy values and 0 otherwise.
///
/// Multiple boolean fields can be gathered into a single matrix, one column
/// each.
#[derive(Debug)]
pub struct Boolean {
    core: FieldCore,
    index: usize,
}

impl Boolean {
    /// Create a boolean field writing column `index` of the default output.
    pub fn new(index: usize) -> Self {
        Self {
            core: FieldCore::new(DEFAULT_OUTPUT_NAME),
            index,
        }
    }

    /// Write to `output_name` instead of the default output.
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.core = FieldCore::new(output_name);
        self
    }

    /// Column this field writes.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for Boolean {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Field for Boolean {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Boolean
    }

    fn columns(&self) -> Range<usize> {
        self.index..self.index.saturating_add(1)
    }

    fn matricize(&self, records: &[&dyn Record], target: &mut Matrices) -> Result<()> {
        let values = self.core.read_values(records)?;
        let mut column = target_column(target, self.core.output_name(), records.len(), self.index)?;
        for (cell, value) in column.iter_mut().zip(values) {
            *cell = if value.is_truthy() { 1.0 } else { 0.0 };
        }
        Ok(())
    }
}
