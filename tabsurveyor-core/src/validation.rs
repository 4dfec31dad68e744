//! JSON Schema validation for registry and primary key documents.
//!
//! This is the single boundary check for externally supplied datasets.
//! Each registry entry is validated against the embedded dataset schema; an
//! entry that does not describe a dataset is a
//! [`TabSurveyorError::TypeMismatch`] naming that entry.
//!
//! # Example
//! ```rust
//! use tabsurveyor_core::validation::validate_dataset_entry;
//! use serde_json::json;
//!
//! let entry = json!([{"order_id": "a1", "price": 10.5}]);
//! assert!(validate_dataset_entry("orders", &entry).is_ok());
//! assert!(validate_dataset_entry("orders", &json!("not a table")).is_err());
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

use crate::{Result, TabSurveyorError};

/// Embedded JSON Schema for one dataset entry.
///
/// A dataset is either an array of row objects (column types inferred) or
/// an object with declared `columns` and `rows`.
const DATASET_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "tabsurveyor dataset entry",
  "oneOf": [
    {
      "type": "array",
      "items": { "type": "object" }
    },
    {
      "type": "object",
      "required": ["columns", "rows"],
      "additionalProperties": false,
      "properties": {
        "columns": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["name", "type"],
            "properties": {
              "name": { "type": "string", "minLength": 1 },
              "type": {
                "enum": [
                  "numeric_continuous",
                  "numeric_discrete",
                  "categorical_nominal",
                  "categorical_ordinal",
                  "temporal"
                ]
              }
            }
          }
        },
        "rows": {
          "type": "array",
          "items": { "type": "object" }
        }
      }
    }
  ]
}"#;

/// Embedded JSON Schema for a primary key document.
const PRIMARY_KEYS_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "tabsurveyor primary key declarations",
  "type": "array",
  "items": {
    "type": "object",
    "required": ["primary_key"],
    "anyOf": [
      { "required": ["dataset"] },
      { "required": ["dataframe"] }
    ],
    "properties": {
      "dataset": { "type": "string", "minLength": 1 },
      "dataframe": { "type": "string", "minLength": 1 },
      "primary_key": {
        "type": "array",
        "minItems": 1,
        "items": { "type": "string", "minLength": 1 }
      }
    }
  }
}"#;

static DATASET_VALIDATOR: OnceLock<Validator> = OnceLock::new();
static PRIMARY_KEYS_VALIDATOR: OnceLock<Validator> = OnceLock::new();

/// Compiles an embedded schema once and caches it.
fn compiled(cell: &'static OnceLock<Validator>, source: &str) -> Result<&'static Validator> {
    if let Some(validator) = cell.get() {
        return Ok(validator);
    }

    let schema_json: Value = serde_json::from_str(source)
        .map_err(|e| TabSurveyorError::serialization("Failed to parse embedded schema", e))?;

    let validator = jsonschema::validator_for(&schema_json).map_err(|e| {
        TabSurveyorError::configuration(format!("Schema compilation error: {}", e))
    })?;

    // Another thread may have won the race; either copy is equivalent.
    let _ = cell.set(validator);
    cell.get()
        .ok_or_else(|| TabSurveyorError::configuration("Schema validator unavailable"))
}

/// Validates that a registry entry describes a dataset.
///
/// # Errors
/// Returns [`TabSurveyorError::TypeMismatch`] naming the entry when it is not
/// a dataset.
pub fn validate_dataset_entry(name: &str, entry: &Value) -> Result<()> {
    let validator = compiled(&DATASET_VALIDATOR, DATASET_SCHEMA)?;

    if let Err(validation_error) = validator.validate(entry) {
        return Err(TabSurveyorError::type_mismatch(format!(
            "entry '{}' is not a dataset: {}",
            name, validation_error
        )));
    }

    Ok(())
}

/// Validates a primary key document.
///
/// # Errors
/// Returns [`TabSurveyorError::Configuration`] when the document is not a
/// list of `{dataset, primary_key}` declarations.
pub fn validate_primary_keys(document: &Value) -> Result<()> {
    let validator = compiled(&PRIMARY_KEYS_VALIDATOR, PRIMARY_KEYS_SCHEMA)?;

    if let Err(validation_error) = validator.validate(document) {
        return Err(TabSurveyorError::configuration(format!(
            "invalid primary key declarations: {}",
            validation_error
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_array_entry_passes() {
        let entry = json!([
            {"order_id": "a1", "price": 10.5},
            {"order_id": "a2", "price": null}
        ]);
        assert!(validate_dataset_entry("orders", &entry).is_ok());
    }

    #[test]
    fn test_declared_entry_passes() {
        let entry = json!({
            "columns": [
                {"name": "order_id", "type": "categorical_nominal"},
                {"name": "price", "type": "numeric_continuous"}
            ],
            "rows": [{"order_id": "a1", "price": 10.5}]
        });
        assert!(validate_dataset_entry("orders", &entry).is_ok());
    }

    #[test]
    fn test_scalar_entry_is_type_mismatch() {
        let error = validate_dataset_entry("orders", &json!(42)).unwrap_err();
        assert!(matches!(error, TabSurveyorError::TypeMismatch { .. }));
        assert!(error.to_string().contains("'orders'"));
    }

    #[test]
    fn test_rows_must_be_objects() {
        let entry = json!([[1, 2, 3]]);
        assert!(validate_dataset_entry("orders", &entry).is_err());
    }

    #[test]
    fn test_unknown_declared_type_rejected() {
        let entry = json!({
            "columns": [{"name": "price", "type": "currency"}],
            "rows": []
        });
        assert!(validate_dataset_entry("orders", &entry).is_err());
    }

    #[test]
    fn test_primary_keys_document() {
        let document = json!([
            {"dataset": "orders", "primary_key": ["order_id"]},
            {"dataframe": "items", "primary_key": ["order_id", "order_item_id"]}
        ]);
        assert!(validate_primary_keys(&document).is_ok());
    }

    #[test]
    fn test_primary_keys_require_columns() {
        let document = json!([{"dataset": "orders", "primary_key": []}]);
        let error = validate_primary_keys(&document).unwrap_err();
        assert!(error.is_configuration());

        let document = json!([{"primary_key": ["order_id"]}]);
        assert!(validate_primary_keys(&document).is_err());
    }
}
