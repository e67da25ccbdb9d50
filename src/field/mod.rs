//! Field definitions: per-attribute encoding rules.
//!
//! A [`Field`] describes how one attribute of a record type is represented in
//! a dense matrix and into which named output array it is written. Fields are
//! created once, registered against a record type in a
//! [`FieldRegistry`](crate::FieldRegistry), and shared from there.
//!
//! # Variants
//!
//! - [`Categorical`]: one-hot encoding over a declared set of categories
//! - [`Number`]: raw numeric value in one column
//! - [`Boolean`]: 0/1 in one column
//!
//! Several [`Number`] and [`Boolean`] fields can share an output name, each
//! writing its own column. A [`Categorical`] field owns its output array.

mod boolean;
mod categorical;
mod config;
mod number;

pub use boolean::Boolean;
pub use categorical::Categorical;
pub use config::FieldConfig;
pub use number::Number;

use crate::error::{MatricizeError, Result};
use crate::record::{Record, ScalarValue};
use ndarray::{Array2, ArrayViewMut1, Axis};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Output name used when a field does not declare one.
pub const DEFAULT_OUTPUT_NAME: &str = "default";

/// Named output arrays, one per output name.
pub type Matrices = BTreeMap<String, Array2<f64>>;

/// A field shared between the registry and its callers.
pub type SharedField = Arc<dyn Field>;

/// The encoding a field applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Categorical,
    Number,
    Boolean,
    /// User-defined encodings.
    Custom,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Categorical => write!(f, "categorical"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Custom => write!(f, "custom"),
        }
    }
}

/// State common to every field: the output it writes to and the attribute it
/// reads.
#[derive(Debug)]
pub struct FieldCore {
    output_name: String,
    /// Set once, when the field is registered
    attribute: OnceCell<String>,
}

impl FieldCore {
    /// Create an unbound core writing to `output_name`.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            attribute: OnceCell::new(),
        }
    }

    /// The output array this field contributes to.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// The attribute this field reads, if registered.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.get().map(String::as_str)
    }

    /// Bind the attribute name. Rebinding to the same name is a no-op.
    pub(crate) fn bind(&self, attribute: &str) -> Result<()> {
        let bound = self.attribute.get_or_init(|| attribute.to_string());
        if bound != attribute {
            return Err(MatricizeError::AlreadyBound {
                bound: bound.clone(),
                requested: attribute.to_string(),
            });
        }
        Ok(())
    }

    /// The bound attribute, or an error for fields never registered.
    pub fn bound_attribute(&self) -> Result<&str> {
        self.attribute().ok_or_else(|| MatricizeError::Unbound {
            output_name: self.output_name.clone(),
        })
    }

    /// Read the bound attribute from every record, in order.
    pub fn read_values(&self, records: &[&dyn Record]) -> Result<Vec<ScalarValue>> {
        let attribute = self.bound_attribute()?;
        records
            .iter()
            .map(|record| {
                record
                    .attribute(attribute)
                    .ok_or_else(|| MatricizeError::MissingAttribute {
                        attribute: attribute.to_string(),
                    })
            })
            .collect()
    }
}

/// An encoding rule bound to one attribute of a record type.
///
/// Implementors provide the layout information ([`columns`](Field::columns))
/// and the encoding step ([`matricize`](Field::matricize)).
pub trait Field: fmt::Debug + Send + Sync {
    /// Shared field state.
    fn core(&self) -> &FieldCore;

    /// The encoding this field applies.
    fn kind(&self) -> FieldKind;

    /// Columns of the output array this field writes.
    fn columns(&self) -> Range<usize>;

    /// Number of columns this field contributes.
    fn width(&self) -> usize {
        self.columns().len()
    }

    /// Whether this field must be the only one writing to its output name.
    fn is_exclusive(&self) -> bool {
        false
    }

    /// The output array this field contributes to.
    fn output_name(&self) -> &str {
        self.core().output_name()
    }

    /// The record attribute this field reads, once registered.
    fn attribute(&self) -> Option<&str> {
        self.core().attribute()
    }

    /// Write this field's contribution for every record into
    /// `target[output_name]`.
    ///
    /// The target array must already exist with one row per record and enough
    /// columns for [`columns`](Field::columns).
    fn matricize(&self, records: &[&dyn Record], target: &mut Matrices) -> Result<()> {
        let _ = (records, target);
        Err(MatricizeError::NotImplemented {
            kind: self.kind().to_string(),
        })
    }
}

/// Borrow the column a single-column field writes, checking the target shape.
pub(crate) fn target_column<'a>(
    target: &'a mut Matrices,
    output_name: &str,
    rows: usize,
    column: usize,
) -> Result<ArrayViewMut1<'a, f64>> {
    let array = target
        .get_mut(output_name)
        .ok_or_else(|| MatricizeError::MissingOutput {
            output_name: output_name.to_string(),
        })?;
    let (got, width) = array.dim();
    if got != rows {
        return Err(MatricizeError::RowMismatch {
            output_name: output_name.to_string(),
            expected: rows,
            got,
        });
    }
    if column >= width {
        return Err(MatricizeError::ColumnOutOfRange {
            output_name: output_name.to_string(),
            column,
            width,
        });
    }
    Ok(array.index_axis_mut(Axis(1), column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Opaque {
        core: FieldCore,
    }

    impl Field for Opaque {
        fn core(&self) -> &FieldCore {
            &self.core
        }

        fn kind(&self) -> FieldKind {
            FieldKind::Custom
        }

        fn columns(&self) -> Range<usize> {
            0..1
        }
    }

    #[test]
    fn test_default_matricize_not_implemented() {
        let field = Opaque {
            core: FieldCore::new("out"),
        };
        let record = serde_json::json!({"a": 1});
        let records: Vec<&dyn Record> = vec![&record];
        let mut target = Matrices::new();
        let err = field.matricize(&records, &mut target).unwrap_err();
        assert!(matches!(err, MatricizeError::NotImplemented { .. }));
    }

    #[test]
    fn test_bind_once() {
        let core = FieldCore::new(DEFAULT_OUTPUT_NAME);
        assert!(core.attribute().is_none());
        core.bind("x").unwrap();
        core.bind("x").unwrap();
        assert_eq!(core.attribute(), Some("x"));
        assert!(matches!(
            core.bind("y"),
            Err(MatricizeError::AlreadyBound { .. })
        ));
        assert_eq!(core.attribute(), Some("x"));
    }

    #[test]
    fn test_unbound_read() {
        let core = FieldCore::new("out");
        let record = serde_json::json!({"x": 1});
        let records: Vec<&dyn Record> = vec![&record];
        assert!(matches!(
            core.read_values(&records),
            Err(MatricizeError::Unbound { .. })
        ));
    }

    #[test]
    fn test_target_column_checks() {
        let mut target = Matrices::new();
        target.insert("out".to_string(), Array2::zeros((3, 2)));

        assert!(target_column(&mut target, "out", 3, 1).is_ok());
        assert!(matches!(
            target_column(&mut target, "missing", 3, 0),
            Err(MatricizeError::MissingOutput { .. })
        ));
        assert!(matches!(
            target_column(&mut target, "out", 4, 0),
            Err(MatricizeError::RowMismatch { .. })
        ));
        assert!(matches!(
            target_column(&mut target, "out", 3, 2),
            Err(MatricizeError::ColumnOutOfRange { .. })
        ));
    }
}
