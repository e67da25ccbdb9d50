//! Error types for matricize.

use thiserror::Error;

/// Broad category of a [`MatricizeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad field or schema configuration, detected at declaration time.
    Configuration,
    /// Lookup of a type or attribute that was never registered.
    Registration,
    /// Records or targets that cannot be converted.
    Input,
    /// A value outside the domain a field was declared with.
    Domain,
    /// A field variant without an encoding step.
    NotImplemented,
}

/// Matricize error types.
#[derive(Error, Debug)]
pub enum MatricizeError {
    /// A categorical field was declared without categories
    #[error("Categories are required")]
    EmptyCategories,

    /// The same category value was declared twice
    #[error("Duplicate category value: {value}")]
    DuplicateCategory { value: String },

    /// Fields sharing an output name cannot be laid out together
    #[error("Invalid layout for output '{output_name}': {reason}")]
    InvalidLayout { output_name: String, reason: String },

    /// A field instance was registered under a second attribute name
    #[error("Field is already bound to attribute '{bound}', cannot bind to '{requested}'")]
    AlreadyBound { bound: String, requested: String },

    /// A schema description could not be parsed
    #[error("Invalid field configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// No field has ever been registered for the type
    #[error("Source '{type_name}' is not registered")]
    NotRegistered { type_name: &'static str },

    /// The type is registered but the attribute has no field
    #[error("Field '{attribute}' is not registered for '{type_name}'")]
    FieldNotRegistered {
        type_name: &'static str,
        attribute: String,
    },

    /// Nothing to convert
    #[error("No items found")]
    EmptyInput,

    /// The record type has no declared fields
    #[error("Unable to matricize '{type_name}': no fields have been declared for it")]
    NoFields { type_name: &'static str },

    /// A field was used before being registered on a record type
    #[error("Field for output '{output_name}' is not bound to an attribute")]
    Unbound { output_name: String },

    /// A record does not expose the attribute a field reads
    #[error("Record has no scalar attribute '{attribute}'")]
    MissingAttribute { attribute: String },

    /// A number field read a value with no numeric interpretation
    #[error("Attribute '{attribute}' is not numeric: {value}")]
    NotNumeric { attribute: String, value: String },

    /// The target mapping has no array for the field's output name
    #[error("No output array named '{output_name}'")]
    MissingOutput { output_name: String },

    /// The target array does not have one row per record
    #[error("Output '{output_name}' has {got} rows, expected {expected}")]
    RowMismatch {
        output_name: String,
        expected: usize,
        got: usize,
    },

    /// A single-column field points past the end of its output array
    #[error("Column {column} is out of range for output '{output_name}' of width {width}")]
    ColumnOutOfRange {
        output_name: String,
        column: usize,
        width: usize,
    },

    /// A categorical value outside the declared categories
    #[error("Unrecognized category value for '{attribute}': {value}")]
    UnrecognizedCategory { attribute: String, value: String },

    /// The field variant does not implement an encoding step
    #[error("matricize is not implemented for {kind} fields")]
    NotImplemented { kind: String },
}

impl MatricizeError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            MatricizeError::EmptyCategories
            | MatricizeError::DuplicateCategory { .. }
            | MatricizeError::InvalidLayout { .. }
            | MatricizeError::AlreadyBound { .. }
            | MatricizeError::Config(_) => ErrorClass::Configuration,
            MatricizeError::NotRegistered { .. } | MatricizeError::FieldNotRegistered { .. } => {
                ErrorClass::Registration
            }
            MatricizeError::EmptyInput
            | MatricizeError::NoFields { .. }
            | MatricizeError::Unbound { .. }
            | MatricizeError::MissingAttribute { .. }
            | MatricizeError::NotNumeric { .. }
            | MatricizeError::MissingOutput { .. }
            | MatricizeError::RowMismatch { .. }
            | MatricizeError::ColumnOutOfRange { .. } => ErrorClass::Input,
            MatricizeError::UnrecognizedCategory { .. } => ErrorClass::Domain,
            MatricizeError::NotImplemented { .. } => ErrorClass::NotImplemented,
        }
    }
}

/// Result type alias for matricize operations.
pub type Result<T> = std::result::Result<T, MatricizeError>;
