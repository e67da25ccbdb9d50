//! Output layout: grouping fields by output name.
//!
//! Fields that share an output name are written into one array. A group is
//! valid when it is either
//!
//! - a single field of any kind, with width equal to that field's width, or
//! - several single-column fields whose columns are all below the group width
//!   (the sum of the field widths) and pairwise distinct.
//!
//! A field that owns its output (see [`Field::is_exclusive`]) can never share
//! it with another field.

use crate::error::{MatricizeError, Result};
use crate::field::{Field, SharedField};
use ndarray::Array2;
use std::collections::BTreeMap;

/// Fields writing to one output array.
#[derive(Clone, Debug)]
pub struct OutputGroup {
    output_name: String,
    width: usize,
    /// (attribute, field), ordered by first column
    fields: Vec<(String, SharedField)>,
}

impl OutputGroup {
    /// The output name shared by the group.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Number of columns of the output array.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The grouped fields with their attribute names.
    pub fn fields(&self) -> &[(String, SharedField)] {
        &self.fields
    }

    /// A zeroed array with `rows` rows for this group.
    pub fn allocate(&self, rows: usize) -> Array2<f64> {
        Array2::zeros((rows, self.width))
    }

    /// Check exclusivity and column conflicts; with `complete`, also check
    /// that every column is below the group width.
    fn validate(&self, complete: bool) -> Result<()> {
        let invalid = |reason: String| MatricizeError::InvalidLayout {
            output_name: self.output_name.clone(),
            reason,
        };

        if self.fields.len() > 1 {
            if let Some((attribute, field)) = self.fields.iter().find(|(_, f)| f.is_exclusive()) {
                return Err(invalid(format!(
                    "{} field '{}' must be the only field writing to it",
                    field.kind(),
                    attribute
                )));
            }
        }

        let mut owners: BTreeMap<usize, &str> = BTreeMap::new();
        for (attribute, field) in &self.fields {
            if field.columns().is_empty() {
                return Err(invalid(format!(
                    "'{}' writes no columns (start {})",
                    attribute,
                    field.columns().start
                )));
            }
            for column in field.columns() {
                if complete && column >= self.width {
                    return Err(invalid(format!(
                        "column {} of '{}' exceeds width {}",
                        column, attribute, self.width
                    )));
                }
                if let Some(owner) = owners.insert(column, attribute.as_str()) {
                    return Err(invalid(format!(
                        "'{}' and '{}' both write column {}",
                        owner, attribute, column
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Validated grouping of a record type's fields, ordered by output name.
#[derive(Clone, Debug, Default)]
pub struct OutputLayout {
    groups: Vec<OutputGroup>,
}

impl OutputLayout {
    /// Group `(attribute, field)` pairs by output name and validate each group.
    ///
    /// The result does not depend on the order of the input.
    pub fn plan<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a SharedField)>,
    {
        Self::group(fields, true)
    }

    /// Validate a possibly incomplete set of fields: exclusive fields must be
    /// alone and no two fields may write the same column. Column bounds are
    /// not checked, since later fields widen their group.
    pub fn check_compatible<'a, I>(fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a SharedField)>,
    {
        Self::group(fields, false).map(|_| ())
    }

    fn group<'a, I>(fields: I, complete: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a SharedField)>,
    {
        let mut grouped: BTreeMap<&str, Vec<(String, SharedField)>> = BTreeMap::new();
        for (attribute, field) in fields {
            grouped
                .entry(field.output_name())
                .or_default()
                .push((attribute.to_string(), field.clone()));
        }

        let groups = grouped
            .into_iter()
            .map(|(output_name, mut fields)| {
                fields.sort_by(|(a, fa), (b, fb)| {
                    (fa.columns().start, a.as_str()).cmp(&(fb.columns().start, b.as_str()))
                });
                let group = OutputGroup {
                    output_name: output_name.to_string(),
                    width: fields.iter().map(|(_, f)| f.width()).sum(),
                    fields,
                };
                group.validate(complete)?;
                Ok(group)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { groups })
    }

    /// The groups, ordered by output name.
    pub fn groups(&self) -> &[OutputGroup] {
        &self.groups
    }

    /// The group for an output name.
    pub fn get(&self, output_name: &str) -> Option<&OutputGroup> {
        self.groups.iter().find(|g| g.output_name == output_name)
    }

    /// Output names and their widths.
    pub fn widths(&self) -> BTreeMap<&str, usize> {
        self.groups
            .iter()
            .map(|g| (g.output_name.as_str(), g.width))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Boolean, Categorical, Number};
    use std::sync::Arc;

    fn shared(field: impl Field + 'static) -> SharedField {
        Arc::new(field)
    }

    fn plan(fields: &[(&str, SharedField)]) -> Result<OutputLayout> {
        OutputLayout::plan(fields.iter().map(|(a, f)| (*a, f)))
    }

    #[test]
    fn test_groups_by_output_name() {
        let fields = vec![
            ("y", shared(Number::new(1).with_output_name("position"))),
            (
                "kind",
                shared(
                    Categorical::new(["a", "b", "c"])
                        .unwrap()
                        .with_output_name("kind"),
                ),
            ),
            ("x", shared(Number::new(0).with_output_name("position"))),
            ("local", shared(Boolean::new(0).with_output_name("flags"))),
        ];
        let layout = plan(&fields).unwrap();

        assert_eq!(layout.len(), 3);
        let names: Vec<&str> = layout.groups().iter().map(|g| g.output_name()).collect();
        assert_eq!(names, vec!["flags", "kind", "position"]);

        let widths = layout.widths();
        assert_eq!(widths["kind"], 3);
        assert_eq!(widths["position"], 2);
        assert_eq!(widths["flags"], 1);

        let position = layout.get("position").unwrap();
        let attributes: Vec<&str> = position.fields().iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(attributes, vec!["x", "y"]);
        assert_eq!(position.allocate(4).dim(), (4, 2));
    }

    #[test]
    fn test_categorical_must_be_alone() {
        let fields = vec![
            (
                "kind",
                shared(Categorical::new(["a", "b"]).unwrap().with_output_name("mixed")),
            ),
            ("x", shared(Number::new(2).with_output_name("mixed"))),
        ];
        assert!(matches!(
            plan(&fields),
            Err(MatricizeError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_conflicting_columns() {
        let fields = vec![
            ("x", shared(Number::new(0).with_output_name("position"))),
            ("y", shared(Number::new(0).with_output_name("position"))),
        ];
        let err = plan(&fields).unwrap_err();
        assert!(err.to_string().contains("both write column 0"));
    }

    #[test]
    fn test_column_beyond_width() {
        let fields = vec![
            ("x", shared(Number::new(0).with_output_name("position"))),
            ("y", shared(Number::new(2).with_output_name("position"))),
        ];
        assert!(matches!(
            plan(&fields),
            Err(MatricizeError::InvalidLayout { .. })
        ));

        let single = vec![("z", shared(Boolean::new(1)))];
        assert!(plan(&single).is_err());
        assert!(OutputLayout::check_compatible(single.iter().map(|(a, f)| (*a, f))).is_ok());
    }

    #[test]
    fn test_last_index_rejected() {
        let fields = vec![("x", shared(Number::new(usize::MAX)))];
        assert!(matches!(
            plan(&fields),
            Err(MatricizeError::InvalidLayout { .. })
        ));
        assert!(OutputLayout::check_compatible(fields.iter().map(|(a, f)| (*a, f))).is_err());
    }

    #[test]
    fn test_empty() {
        let layout = plan(&[]).unwrap();
        assert!(layout.is_empty());
    }
}
