//! Serializable field configuration.

use super::{Boolean, Categorical, Number, SharedField, DEFAULT_OUTPUT_NAME};
use crate::error::Result;
use crate::record::ScalarValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

/// Declarative description of a field.
///
/// ```json
/// {"type": "categorical", "output_name": "kind", "categories": ["a", "b"]}
/// {"type": "number", "output_name": "position", "index": 1}
/// {"type": "boolean"}
/// ```
///
/// `output_name` defaults to `"default"` and `index` to 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConfig {
    Categorical {
        #[serde(default = "default_output_name")]
        output_name: String,
        categories: Vec<ScalarValue>,
    },
    Number {
        #[serde(default = "default_output_name")]
        output_name: String,
        #[serde(default)]
        index: usize,
    },
    Boolean {
        #[serde(default = "default_output_name")]
        output_name: String,
        #[serde(default)]
        index: usize,
    },
}

impl FieldConfig {
    /// The output name this configuration writes to.
    pub fn output_name(&self) -> &str {
        match self {
            FieldConfig::Categorical { output_name, .. }
            | FieldConfig::Number { output_name, .. }
            | FieldConfig::Boolean { output_name, .. } => output_name,
        }
    }

    /// Construct the described field.
    pub fn build(&self) -> Result<SharedField> {
        Ok(match self {
            FieldConfig::Categorical {
                output_name,
                categories,
            } => Arc::new(
                Categorical::new(categories.iter().cloned())?.with_output_name(output_name),
            ),
            FieldConfig::Number { output_name, index } => {
                Arc::new(Number::new(*index).with_output_name(output_name))
            }
            FieldConfig::Boolean { output_name, index } => {
                Arc::new(Boolean::new(*index).with_output_name(output_name))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatricizeError;
    use crate::field::FieldKind;

    #[test]
    fn test_parse_with_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{"type": "number"}"#).unwrap();
        assert_eq!(
            config,
            FieldConfig::Number {
                output_name: "default".to_string(),
                index: 0
            }
        );
        assert_eq!(config.output_name(), DEFAULT_OUTPUT_NAME);
    }

    #[test]
    fn test_build_categorical() {
        let config: FieldConfig = serde_json::from_str(
            r#"{"type": "categorical", "output_name": "kind", "categories": ["a", "b", "c"]}"#,
        )
        .unwrap();
        assert_eq!(config.output_name(), "kind");
        let field = config.build().unwrap();
        assert_eq!(field.kind(), FieldKind::Categorical);
        assert_eq!(field.output_name(), config.output_name());
        assert_eq!(field.width(), 3);
    }

    #[test]
    fn test_build_boolean() {
        let config = FieldConfig::Boolean {
            output_name: "parameters".to_string(),
            index: 1,
        };
        let field = config.build().unwrap();
        assert_eq!(field.kind(), FieldKind::Boolean);
        assert_eq!(field.columns(), 1..2);
    }

    #[test]
    fn test_build_empty_categories() {
        let config = FieldConfig::Categorical {
            output_name: "kind".to_string(),
            categories: vec![],
        };
        assert!(matches!(
            config.build(),
            Err(MatricizeError::EmptyCategories)
        ));
    }

    #[test]
    fn test_unknown_type() {
        let result = serde_json::from_str::<FieldConfig>(r#"{"type": "tensor"}"#);
        assert!(result.is_err());
    }
}
