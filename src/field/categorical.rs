//! One-hot encoding for categorical attributes.

use super::{Field, FieldCore, FieldKind, Matrices, DEFAULT_OUTPUT_NAME};
use crate::error::{MatricizeError, Result};
use crate::record::{Record, ScalarValue};
use ndarray::{Array2, Axis};
use std::collections::HashMap;
use std::ops::Range;

/// A categorical (enumerated) field whose values are chosen from a finite,
/// ordered set of categories. Values are one-hot encoded in declaration order.
///
/// # Example
///
/// ```rust
/// use matricize::Categorical;
///
/// let kind = Categorical::new(["vehicle", "building", "person"])?
///     .with_output_name("kind");
/// assert_eq!(kind.categories().len(), 3);
/// # Ok::<(), matricize::MatricizeError>(())
/// ```
#[derive(Debug)]
pub struct Categorical {
    core: FieldCore,
    categories: Vec<ScalarValue>,
    /// Category -> column
    category_map: HashMap<ScalarValue, usize>,
    /// Identity matrix; row i is the one-hot vector of category i
    reference_matrix: Array2<f64>,
}

impl Categorical {
    /// Create a categorical field writing to the default output.
    ///
    /// Fails when `categories` is empty or contains the same value twice.
    pub fn new<I, V>(categories: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        let categories: Vec<ScalarValue> = categories.into_iter().map(Into::into).collect();
        if categories.is_empty() {
            return Err(MatricizeError::EmptyCategories);
        }

        let mut category_map = HashMap::with_capacity(categories.len());
        for (idx, category) in categories.iter().enumerate() {
            if category_map.insert(category_key(category), idx).is_some() {
                return Err(MatricizeError::DuplicateCategory {
                    value: category.to_string(),
                });
            }
        }

        let reference_matrix = Array2::eye(categories.len());

        Ok(Self {
            core: FieldCore::new(DEFAULT_OUTPUT_NAME),
            categories,
            category_map,
            reference_matrix,
        })
    }

    /// Write to `output_name` instead of the default output.
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.core = FieldCore::new(output_name);
        self
    }

    /// Declared categories, in column order.
    pub fn categories(&self) -> &[ScalarValue] {
        &self.categories
    }

    /// Column of a category value.
    pub fn index_of(&self, value: &ScalarValue) -> Option<usize> {
        self.category_map.get(&category_key(value)).copied()
    }

    /// One-hot encode a sequence of values into a `(values.len(), k)` block.
    pub fn encode(&self, values: &[ScalarValue]) -> Result<Array2<f64>> {
        let indices = values
            .iter()
            .map(|value| {
                self.index_of(value)
                    .ok_or_else(|| MatricizeError::UnrecognizedCategory {
                        attribute: self
                            .core
                            .attribute()
                            .unwrap_or(self.core.output_name())
                            .to_string(),
                        value: value.to_string(),
                    })
            })
            .collect::<Result<Vec<usize>>>()?;

        Ok(self.reference_matrix.select(Axis(0), &indices))
    }
}

/// Lookup key of a category value. Numbers compare by value, so `2`, `2.0`
/// and `true`/`1` name the same category.
fn category_key(value: &ScalarValue) -> ScalarValue {
    match *value {
        ScalarValue::Bool(b) => ScalarValue::Int(b as i64),
        ScalarValue::Float(f)
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            ScalarValue::Int(f as i64)
        }
        _ => value.clone(),
    }
}

impl Field for Categorical {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Categorical
    }

    fn columns(&self) -> Range<usize> {
        0..self.categories.len()
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    /// Replaces `target[output_name]` with the one-hot block for `records`.
    fn matricize(&self, records: &[&dyn Record], target: &mut Matrices) -> Result<()> {
        let values = self.core.read_values(records)?;
        let block = self.encode(&values)?;

        let output_name = self.core.output_name();
        if let Some(existing) = target.get(output_name) {
            if existing.nrows() != records.len() {
                return Err(MatricizeError::RowMismatch {
                    output_name: output_name.to_string(),
                    expected: records.len(),
                    got: existing.nrows(),
                });
            }
        }
        target.insert(output_name.to_string(), block);
        Ok(())
    }
}
