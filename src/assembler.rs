//! Assembler: record collections to named matrices.
//!
//! The assembler resolves the record type of a collection, looks up its
//! declared fields, groups them by output name and lets every field fill its
//! columns of a freshly allocated array:
//!
//! ```text
//! kind:     Categorical(5) -> "kind"       (n, 5) one-hot
//! x, y:     Number 0, 1    -> "position"   (n, 2)
//! verified: Boolean 0      -> "parameters" (n, 2)
//! local:    Boolean 1      -> "parameters"
//! ```
//!
//! Either every output is produced or the call fails; no partial mapping is
//! returned.

use crate::error::{MatricizeError, Result};
use crate::field::Matrices;
use crate::layout::OutputLayout;
use crate::record::Record;
use crate::registry::FieldRegistry;
use std::any::type_name;
use tracing::{debug, debug_span, trace};

/// Converts record collections into [`Matrices`] using the fields declared in
/// a [`FieldRegistry`].
#[derive(Clone)]
pub struct Assembler {
    registry: FieldRegistry,
}

impl Assembler {
    /// Create an assembler reading fields from `registry`.
    pub fn new(registry: FieldRegistry) -> Self {
        Self { registry }
    }

    /// The registry this assembler reads from.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Convert a collection of records of one type into one matrix per output
    /// name.
    ///
    /// Every matrix has one row per record, in input order.
    ///
    /// # Errors
    ///
    /// - [`MatricizeError::EmptyInput`] for an empty collection
    /// - [`MatricizeError::NoFields`] when `R` has no declared fields
    /// - [`MatricizeError::InvalidLayout`] when the declared fields cannot
    ///   share their outputs
    /// - any error raised by a field while encoding
    pub fn matricize<R>(&self, records: &[R]) -> Result<Matrices>
    where
        R: Record + 'static,
    {
        if records.is_empty() {
            return Err(MatricizeError::EmptyInput);
        }

        let span = debug_span!("matricize", record = type_name::<R>(), count = records.len());
        let _enter = span.enter();

        let fields = self
            .registry
            .get_fields::<R>()
            .map_err(|_| MatricizeError::NoFields {
                type_name: type_name::<R>(),
            })?;
        let layout = OutputLayout::plan(fields.iter().map(|(a, f)| (a.as_str(), f)))?;

        let rows: Vec<&dyn Record> = records.iter().map(|r| r as &dyn Record).collect();
        let mut result = Matrices::new();

        for group in layout.groups() {
            let mut target = Matrices::new();
            target.insert(group.output_name().to_string(), group.allocate(rows.len()));

            for (attribute, field) in group.fields() {
                trace!(attribute = attribute.as_str(), kind = %field.kind(), "filling columns");
                field.matricize(&rows, &mut target)?;
            }

            let array = target
                .remove(group.output_name())
                .ok_or_else(|| MatricizeError::MissingOutput {
                    output_name: group.output_name().to_string(),
                })?;
            debug!(output = group.output_name(), shape = ?array.dim(), "assembled output");
            result.insert(group.output_name().to_string(), array);
        }

        Ok(result)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(FieldRegistry::global().clone())
    }
}
