//! Raw numeric fields.

use super::{target_column, Field, FieldCore, FieldKind, Matrices, DEFAULT_OUTPUT_NAME};
use crate::error::{MatricizeError, Result};
use crate::record::Record;
use std::ops::Range;

/// A regular numeric field.
///
/// A record type may declare several numeric fields under one output name;
/// each one writes its value, unmodified, into its own column of the shared
/// array.
#[derive(Debug)]
pub struct Number {
    core: FieldCore,
    index: usize,
}

impl Number {
    /// Create a numeric field writing column `index` of the default output.
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

impl Default for Number {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Field for Number {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Number
    }

    fn columns(&self) -> Range<usize> {
        // Empty at usize::MAX; the layout rejects zero-width fields
        self.index..self.index.saturating_add(1)
    }

    fn matricize(&self, records: &[&dyn Record], target: &mut Matrices) -> Result<()> {
        let attribute = self.core.bound_attribute()?;
        let values = self
            .core
            .read_values(records)?
            .into_iter()
            .map(|value| {
                value.as_f64().ok_or_else(|| MatricizeError::NotNumeric {
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let mut column = target_column(target, self.core.output_name(), records.len(), self.index)?;
        for (cell, value) in column.iter_mut().zip(values) {
            *cell = value;
        }
        Ok(())
    }
}
