//! # matricize: records to named matrices
//!
//! Declare, per attribute of a record type, how the attribute is encoded and
//! into which named output array it goes. Then convert whole collections of
//! records into dense `ndarray` matrices, one per output name.
//!
//! ## Quick Start
//!
//! ```rust
//! use matricize::{Boolean, Categorical, FieldRegistry, Assembler, Number, Record, ScalarValue};
//!
//! struct Sighting {
//!     kind: String,
//!     x: f64,
//!     y: f64,
//!     verified: bool,
//! }
//!
//! impl Record for Sighting {
//!     fn attribute(&self, name: &str) -> Option<ScalarValue> {
//!         match name {
//!             "kind" => Some((&self.kind).into()),
//!             "x" => Some(self.x.into()),
//!             "y" => Some(self.y.into()),
//!             "verified" => Some(self.verified.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let registry = FieldRegistry::new();
//! registry
//!     .declare::<Sighting>()
//!     .field("kind", Categorical::new(["vehicle", "person"])?.with_output_name("kind"))
//!     .field("x", Number::new(0).with_output_name("position"))
//!     .field("y", Number::new(1).with_output_name("position"))
//!     .field("verified", Boolean::new(0).with_output_name("parameters"))
//!     .finish()?;
//!
//! let sightings = vec![
//!     Sighting { kind: "person".into(), x: 1.0, y: 2.0, verified: true },
//!     Sighting { kind: "vehicle".into(), x: 12.0, y: 20.0, verified: false },
//! ];
//! let matrices = Assembler::new(registry).matricize(&sightings)?;
//!
//! assert_eq!(matrices["kind"].dim(), (2, 2));
//! assert_eq!(matrices["position"][[1, 0]], 12.0);
//! assert_eq!(matrices["parameters"][[0, 0]], 1.0);
//! # Ok::<(), matricize::MatricizeError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Record**: a data item whose attributes are read by name ([`Record`])
//! - **Field**: an encoding rule bound to one attribute ([`Field`])
//! - **Output name**: label grouping fields into one assembled array
//! - **Registry**: record type -> attribute -> field ([`FieldRegistry`])
//! - **Matricize**: converting a record collection into named matrices
//!   ([`Assembler`])
//!
//! The free functions in this crate ([`declare`], [`get_fields`],
//! [`matricize`], ...) operate on the process-wide
//! [`FieldRegistry::global`] instance.

pub mod assembler;
pub mod error;
pub mod field;
pub mod layout;
pub mod record;
pub mod registry;

// Re-exports for convenience
pub use assembler::Assembler;
pub use error::{ErrorClass, MatricizeError, Result};
pub use field::{
    Boolean, Categorical, Field, FieldConfig, FieldCore, FieldKind, Matrices, Number,
    SharedField, DEFAULT_OUTPUT_NAME,
};
pub use layout::{OutputGroup, OutputLayout};
pub use record::{Record, ScalarValue};
pub use registry::{Declaration, FieldRegistry, Fields};

/// Start declaring the fields of `R` in the global registry.
pub fn declare<R: Record + 'static>() -> Declaration<'static, R> {
    FieldRegistry::global().declare::<R>()
}

/// Register one field for `R` in the global registry.
pub fn register<R, F>(attribute: &str, field: F) -> Result<SharedField>
where
    R: Record + 'static,
    F: Field + 'static,
{
    FieldRegistry::global().register::<R, F>(attribute, field)
}

/// All fields registered for `R` in the global registry.
pub fn get_fields<R: 'static>() -> Result<Fields> {
    FieldRegistry::global().get_fields::<R>()
}

/// All fields registered for the type of `record` in the global registry.
pub fn get_fields_of<R: 'static>(record: &R) -> Result<Fields> {
    FieldRegistry::global().get_fields_of(record)
}

/// The field registered for `attribute` of `R` in the global registry.
pub fn get_field<R: 'static>(attribute: &str) -> Result<SharedField> {
    FieldRegistry::global().get_field::<R>(attribute)
}

/// The field registered for `attribute` of the type of `record` in the
/// global registry.
pub fn get_field_of<R: 'static>(record: &R, attribute: &str) -> Result<SharedField> {
    FieldRegistry::global().get_field_of(record, attribute)
}

/// Convert `records` into named matrices using the global registry.
///
/// See [`Assembler::matricize`].
pub fn matricize<R: Record + 'static>(records: &[R]) -> Result<Matrices> {
    Assembler::default().matricize(records)
}
