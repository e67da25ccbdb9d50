//! Field Registry: record type -> attribute -> field.
//!
//! Every record type gets its own independent entry, keyed by [`TypeId`].
//! Registrations are never inherited and never removed; registering the same
//! attribute again replaces the previous field for that exact type.
//!
//! Most code uses the process-wide [`FieldRegistry::global`] instance through
//! the crate-level functions. Tests and embedders can create isolated
//! registries with [`FieldRegistry::new`].

use crate::error::{MatricizeError, Result};
use crate::field::{Field, FieldConfig, SharedField};
use crate::layout::OutputLayout;
use crate::record::Record;
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Fields of one record type, by attribute name.
pub type Fields = BTreeMap<String, SharedField>;

static GLOBAL: Lazy<FieldRegistry> = Lazy::new(FieldRegistry::new);

#[derive(Clone, Debug)]
struct TypeEntry {
    type_name: &'static str,
    fields: Fields,
}

/// Maps record types to their declared fields.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    entries: Arc<RwLock<HashMap<TypeId, TypeEntry>>>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default registry.
    pub fn global() -> &'static FieldRegistry {
        &GLOBAL
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, TypeEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, TypeEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Associate `field` with attribute `attribute` of record type `R`.
    ///
    /// Replaces any field previously registered for the same attribute.
    /// Fails if the field is already bound to another attribute, or if it
    /// cannot share its output with the fields already registered for `R`.
    pub fn register<R, F>(&self, attribute: &str, field: F) -> Result<SharedField>
    where
        R: Record + 'static,
        F: Field + 'static,
    {
        self.register_shared::<R>(attribute, Arc::new(field))
    }

    /// [`register`](Self::register) for a field that is already shared.
    pub fn register_shared<R>(&self, attribute: &str, field: SharedField) -> Result<SharedField>
    where
        R: Record + 'static,
    {
        check_bindable(attribute, &field)?;

        let type_id = TypeId::of::<R>();
        let mut entries = self.write();
        let mut merged = entries
            .get(&type_id)
            .map(|entry| entry.fields.clone())
            .unwrap_or_default();
        merged.insert(attribute.to_string(), field.clone());
        OutputLayout::check_compatible(merged.iter().map(|(a, f)| (a.as_str(), f)))?;

        field.core().bind(attribute)?;
        entries.insert(
            type_id,
            TypeEntry {
                type_name: type_name::<R>(),
                fields: merged,
            },
        );

        debug!(
            record = type_name::<R>(),
            attribute,
            kind = %field.kind(),
            output = field.output_name(),
            "registered field"
        );
        Ok(field)
    }

    /// Start declaring the fields of record type `R`.
    ///
    /// The declaration is validated as a whole, together with any fields
    /// already registered for `R`, and committed by
    /// [`Declaration::finish`].
    pub fn declare<R>(&self) -> Declaration<'_, R>
    where
        R: Record + 'static,
    {
        Declaration {
            registry: self,
            fields: Vec::new(),
            error: None,
            _record: PhantomData,
        }
    }

    /// Declare the fields of `R` from a JSON object mapping attribute names
    /// to [`FieldConfig`]s.
    ///
    /// ```rust
    /// use matricize::{FieldRegistry, ScalarValue};
    /// use std::collections::HashMap;
    ///
    /// let registry = FieldRegistry::new();
    /// let fields = registry.declare_json::<HashMap<String, ScalarValue>>(r#"{
    ///     "x": {"type": "number", "output_name": "position", "index": 0},
    ///     "y": {"type": "number", "output_name": "position", "index": 1}
    /// }"#)?;
    /// assert_eq!(fields.len(), 2);
    /// # Ok::<(), matricize::MatricizeError>(())
    /// ```
    pub fn declare_json<R>(&self, json: &str) -> Result<Fields>
    where
        R: Record + 'static,
    {
        let configs: BTreeMap<String, FieldConfig> = serde_json::from_str(json)?;
        configs
            .iter()
            .fold(self.declare::<R>(), |declaration, (attribute, config)| {
                declaration.config(attribute, config)
            })
            .finish()
    }

    /// All fields registered for record type `R`.
    pub fn get_fields<R: 'static>(&self) -> Result<Fields> {
        self.read()
            .get(&TypeId::of::<R>())
            .filter(|entry| !entry.fields.is_empty())
            .map(|entry| entry.fields.clone())
            .ok_or(MatricizeError::NotRegistered {
                type_name: type_name::<R>(),
            })
    }

    /// All fields registered for the type of `record`.
    pub fn get_fields_of<R: 'static>(&self, record: &R) -> Result<Fields> {
        let _ = record;
        self.get_fields::<R>()
    }

    /// The field registered for `attribute` of record type `R`.
    pub fn get_field<R: 'static>(&self, attribute: &str) -> Result<SharedField> {
        self.get_fields::<R>()?
            .remove(attribute)
            .ok_or_else(|| MatricizeError::FieldNotRegistered {
                type_name: type_name::<R>(),
                attribute: attribute.to_string(),
            })
    }

    /// The field registered for `attribute` of the type of `record`.
    pub fn get_field_of<R: 'static>(&self, record: &R, attribute: &str) -> Result<SharedField> {
        let _ = record;
        self.get_field::<R>(attribute)
    }

    /// The validated output layout of record type `R`.
    pub fn layout<R: 'static>(&self) -> Result<OutputLayout> {
        let fields = self.get_fields::<R>()?;
        OutputLayout::plan(fields.iter().map(|(a, f)| (a.as_str(), f)))
    }

    /// Whether any field is registered for `R`.
    pub fn is_registered<R: 'static>(&self) -> bool {
        self.read()
            .get(&TypeId::of::<R>())
            .is_some_and(|entry| !entry.fields.is_empty())
    }

    /// Number of registered record types.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Names of the registered record types, sorted.
    pub fn record_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.read().values().map(|e| e.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("record_types", &self.record_types())
            .finish()
    }
}

fn check_bindable(attribute: &str, field: &SharedField) -> Result<()> {
    match field.attribute() {
        Some(bound) if bound != attribute => Err(MatricizeError::AlreadyBound {
            bound: bound.to_string(),
            requested: attribute.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Builder declaring several fields of one record type at once.
///
/// ```rust
/// use matricize::{Boolean, Categorical, FieldRegistry, Number, Record, ScalarValue};
///
/// struct Ship {
///     kind: String,
///     x: f64,
///     docked: bool,
/// }
///
/// impl Record for Ship {
///     fn attribute(&self, name: &str) -> Option<ScalarValue> {
///         match name {
///             "kind" => Some((&self.kind).into()),
///             "x" => Some(self.x.into()),
///             "docked" => Some(self.docked.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let registry = FieldRegistry::new();
/// registry
///     .declare::<Ship>()
///     .field("kind", Categorical::new(["tug", "tanker"])?.with_output_name("kind"))
///     .field("x", Number::new(0).with_output_name("position"))
///     .field("docked", Boolean::new(0).with_output_name("state"))
///     .finish()?;
/// assert!(registry.is_registered::<Ship>());
/// # Ok::<(), matricize::MatricizeError>(())
/// ```
pub struct Declaration<'r, R> {
    registry: &'r FieldRegistry,
    fields: Vec<(String, SharedField)>,
    /// First configuration error, reported by `finish`
    error: Option<MatricizeError>,
    _record: PhantomData<fn() -> R>,
}

impl<'r, R> Declaration<'r, R>
where
    R: Record + 'static,
{
    /// Declare `field` for `attribute`.
    pub fn field<F: Field + 'static>(self, attribute: &str, field: F) -> Self {
        self.shared(attribute, Arc::new(field))
    }

    /// Declare an already shared field for `attribute`.
    pub fn shared(mut self, attribute: &str, field: SharedField) -> Self {
        self.fields.push((attribute.to_string(), field));
        self
    }

    /// Declare the field described by `config` for `attribute`.
    pub fn config(mut self, attribute: &str, config: &FieldConfig) -> Self {
        debug!(attribute, output = config.output_name(), "building field from config");
        match config.build() {
            Ok(field) => self.shared(attribute, field),
            Err(err) => {
                self.error.get_or_insert(err);
                self
            }
        }
    }

    /// Validate and register every declared field.
    ///
    /// Nothing is registered when any field fails to build, is bound to
    /// another attribute, or breaks the output layout. Returns all fields
    /// of `R` after the declaration.
    pub fn finish(self) -> Result<Fields> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let type_id = TypeId::of::<R>();
        let mut entries = self.registry.write();
        let mut merged = entries
            .get(&type_id)
            .map(|entry| entry.fields.clone())
            .unwrap_or_default();
        for (attribute, field) in &self.fields {
            check_bindable(attribute, field)?;
            merged.insert(attribute.clone(), field.clone());
        }
        OutputLayout::plan(merged.iter().map(|(a, f)| (a.as_str(), f)))?;

        for (attribute, field) in &self.fields {
            field.core().bind(attribute)?;
        }
        entries.insert(
            type_id,
            TypeEntry {
                type_name: type_name::<R>(),
                fields: merged.clone(),
            },
        );

        debug!(
            record = type_name::<R>(),
            declared = self.fields.len(),
            total = merged.len(),
            "declared fields"
        );
        Ok(merged)
    }
}
