//! Registry population from JSON documents.
//!
//! The document maps dataset names to datasets. Each entry goes through
//! [`crate::validation`] first, then is converted into a [`RecordTable`] with
//! declared or inferred column types. Loading is fail-fast: the first entry
//! that is not a dataset aborts the load with a
//! [`TabSurveyorError::TypeMismatch`] naming it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::path::Path;

use crate::models::{ColumnSchema, ColumnType, RecordTable, ScalarValue};
use crate::registry::{DatasetRegistry, PrimaryKeySpec, PrimaryKeys};
use crate::validation::{validate_dataset_entry, validate_primary_keys};
use crate::{Result, TabSurveyorError};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads and parses a JSON document from disk.
///
/// # Errors
/// - [`TabSurveyorError::Io`] if the file cannot be read
/// - [`TabSurveyorError::Serialization`] if it is not valid JSON
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| TabSurveyorError::io(format!("reading {}", path.display()), e))?;
    serde_json::from_str(&text)
        .map_err(|e| TabSurveyorError::serialization(format!("parsing {}", path.display()), e))
}

/// Loads a registry document from a file.
pub fn load_registry_file(path: &Path) -> Result<DatasetRegistry> {
    tracing::debug!("Reading registry document {}", path.display());
    load_registry(&read_document(path)?)
}

/// Loads a primary key document from a file.
pub fn load_primary_keys_file(path: &Path) -> Result<PrimaryKeys> {
    load_primary_keys(&read_document(path)?)
}

/// Parses a registry document from a JSON string.
pub fn load_registry_str(json: &str) -> Result<DatasetRegistry> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| TabSurveyorError::serialization("parsing registry document", e))?;
    load_registry(&document)
}

/// Builds a registry from a document of the form `{ "<name>": <dataset>, ... }`.
///
/// # Errors
/// - [`TabSurveyorError::TypeMismatch`] if the document is not an object, or
///   an entry is not a dataset
/// - [`TabSurveyorError::Configuration`] for duplicate declared columns
pub fn load_registry(document: &Value) -> Result<DatasetRegistry> {
    let entries = document.as_object().ok_or_else(|| {
        TabSurveyorError::type_mismatch(
            "registry document must be an object mapping dataset names to datasets",
        )
    })?;

    let mut registry = DatasetRegistry::new();
    for (name, entry) in entries {
        let table = dataset_from_json(name, entry)?;
        registry.insert(name.clone(), table)?;
    }

    tracing::info!("Loaded {} datasets", registry.len());
    Ok(registry)
}

/// Converts one registry entry into a [`RecordTable`].
pub fn dataset_from_json(name: &str, entry: &Value) -> Result<RecordTable> {
    validate_dataset_entry(name, entry)?;

    match entry {
        Value::Array(rows) => inferred_table(name, &as_row_objects(name, rows)?),
        Value::Object(declared) => {
            let columns: Vec<ColumnSchema> = declared
                .get("columns")
                .cloned()
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| {
                    TabSurveyorError::serialization(
                        format!("parsing column declarations of '{}'", name),
                        e,
                    )
                })?
                .unwrap_or_default();
            let rows = match declared.get("rows") {
                Some(Value::Array(rows)) => as_row_objects(name, rows)?,
                _ => Vec::new(),
            };
            declared_table(name, columns, &rows)
        }
        _ => Err(TabSurveyorError::type_mismatch(format!(
            "entry '{}' is not a dataset",
            name
        ))),
    }
}

/// Parses a primary key document: `[{"dataset": "...", "primary_key": [...]}]`.
pub fn load_primary_keys(document: &Value) -> Result<PrimaryKeys> {
    validate_primary_keys(document)?;

    let specs: Vec<PrimaryKeySpec> = serde_json::from_value(document.clone())
        .map_err(|e| TabSurveyorError::serialization("parsing primary key declarations", e))?;
    PrimaryKeys::from_specs(specs)
}

fn as_row_objects<'a>(name: &str, rows: &'a [Value]) -> Result<Vec<&'a Map<String, Value>>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            row.as_object().ok_or_else(|| {
                TabSurveyorError::type_mismatch(format!(
                    "record {} of '{}' is not an object",
                    index, name
                ))
            })
        })
        .collect()
}

/// Column names in first-appearance order across all records.
fn column_names(rows: &[&Map<String, Value>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn inferred_table(name: &str, rows: &[&Map<String, Value>]) -> Result<RecordTable> {
    let columns: Vec<ColumnSchema> = column_names(rows)
        .into_iter()
        .map(|column| {
            let column_type = infer_column_type(rows.iter().filter_map(|r| r.get(&column)));
            tracing::trace!("Inferred '{}.{}' as {}", name, column, column_type);
            ColumnSchema::new(column, column_type)
        })
        .collect();

    declared_table(name, columns, rows)
}

fn declared_table(
    name: &str,
    columns: Vec<ColumnSchema>,
    rows: &[&Map<String, Value>],
) -> Result<RecordTable> {
    if let Some(row_index) = rows
        .iter()
        .position(|row| row.keys().any(|k| !columns.iter().any(|c| &c.name == k)))
    {
        return Err(TabSurveyorError::type_mismatch(format!(
            "record {} of '{}' has a column that is not declared",
            row_index, name
        )));
    }

    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| match row.get(&column.name) {
                    None => Ok(ScalarValue::Null),
                    Some(value) => coerce(value, column.column_type).ok_or_else(|| {
                        TabSurveyorError::type_mismatch(format!(
                            "value {} in '{}.{}' is not {}",
                            value, name, column.name, column.column_type
                        ))
                    }),
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    RecordTable::new(columns, cells)
}

/// Infers a column type from its JSON cells.
fn infer_column_type<'a>(values: impl Iterator<Item = &'a Value>) -> ColumnType {
    let present: Vec<&Value> = values.filter(|v| !v.is_null()).collect();
    if present.is_empty() {
        return ColumnType::CategoricalNominal;
    }

    if present.iter().all(|v| v.is_number()) {
        if present.iter().all(|v| v.is_i64()) {
            return ColumnType::NumericDiscrete;
        }
        return ColumnType::NumericContinuous;
    }

    if present
        .iter()
        .all(|v| v.as_str().and_then(parse_timestamp).is_some())
    {
        return ColumnType::Temporal;
    }

    ColumnType::CategoricalNominal
}

/// Converts a JSON cell to a scalar of the target column type.
fn coerce(value: &Value, column_type: ColumnType) -> Option<ScalarValue> {
    match (value, column_type) {
        (Value::Null, _) => Some(ScalarValue::Null),
        (Value::Array(_) | Value::Object(_), _) => None,
        (Value::Number(n), ColumnType::NumericContinuous | ColumnType::NumericDiscrete) => {
            number(n)
        }
        (Value::String(s), ColumnType::NumericContinuous | ColumnType::NumericDiscrete) => {
            parse_number(s)
        }
        (_, ColumnType::NumericContinuous | ColumnType::NumericDiscrete) => None,
        (Value::String(s), ColumnType::Temporal) => parse_timestamp(s).map(ScalarValue::Timestamp),
        (_, ColumnType::Temporal) => None,
        (Value::Bool(b), _) => Some(ScalarValue::Boolean(*b)),
        (Value::Number(n), _) => number(n),
        (Value::String(s), _) => Some(ScalarValue::Text(s.clone())),
    }
}

fn number(n: &serde_json::Number) -> Option<ScalarValue> {
    n.as_i64()
        .map(ScalarValue::Integer)
        .or_else(|| n.as_f64().map(ScalarValue::Float))
}

fn parse_number(s: &str) -> Option<ScalarValue> {
    let trimmed = s.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(ScalarValue::Integer(v));
    }
    trimmed.parse::<f64>().ok().map(ScalarValue::Float)
}

/// Parses RFC 3339 timestamps, naive `YYYY-MM-DD HH:MM:SS` (as UTC) and
/// plain dates (as UTC midnight).
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dataset;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_inferred_types() {
        let table = dataset_from_json(
            "orders",
            &json!([
                {"order_id": "a1", "items": 2, "price": 10.5, "approved": true,
                 "purchased_at": "2017-10-02 10:56:33"},
                {"order_id": "a2", "items": 1, "price": 3, "approved": null,
                 "purchased_at": "2018-07-24"}
            ]),
        )
        .unwrap();

        assert_eq!(
            table.column_names(),
            vec!["order_id", "items", "price", "approved", "purchased_at"]
        );
        assert_eq!(
            table.column_type("order_id"),
            Some(ColumnType::CategoricalNominal)
        );
        assert_eq!(table.column_type("items"), Some(ColumnType::NumericDiscrete));
        assert_eq!(
            table.column_type("price"),
            Some(ColumnType::NumericContinuous)
        );
        assert_eq!(
            table.column_type("approved"),
            Some(ColumnType::CategoricalNominal)
        );
        assert_eq!(table.column_type("purchased_at"), Some(ColumnType::Temporal));
    }

    #[test]
    fn test_absent_keys_become_null() {
        let table = dataset_from_json(
            "orders",
            &json!([
                {"order_id": "a1", "price": 10.5},
                {"order_id": "a2"}
            ]),
        )
        .unwrap();

        assert_eq!(table.value(1, 1), Some(&ScalarValue::Null));
    }

    #[test]
    fn test_declared_types_coerce_numeric_strings() {
        let table = dataset_from_json(
            "items",
            &json!({
                "columns": [
                    {"name": "price", "type": "numeric_continuous"},
                    {"name": "score", "type": "categorical_ordinal"}
                ],
                "rows": [
                    {"price": "12.5", "score": 5},
                    {"price": 3, "score": 1}
                ]
            }),
        )
        .unwrap();

        assert_eq!(table.value(0, 0), Some(&ScalarValue::Float(12.5)));
        assert_eq!(table.value(1, 0), Some(&ScalarValue::Integer(3)));
        assert_eq!(table.value(0, 1), Some(&ScalarValue::Integer(5)));
    }

    #[test]
    fn test_declared_numeric_rejects_text() {
        let result = dataset_from_json(
            "items",
            &json!({
                "columns": [{"name": "price", "type": "numeric_continuous"}],
                "rows": [{"price": "expensive"}]
            }),
        );
        assert!(matches!(
            result,
            Err(TabSurveyorError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_undeclared_column_rejected() {
        let result = dataset_from_json(
            "items",
            &json!({
                "columns": [{"name": "price", "type": "numeric_continuous"}],
                "rows": [{"price": 1.0, "freight": 2.0}]
            }),
        );
        assert!(matches!(
            result,
            Err(TabSurveyorError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_nested_cell_rejected() {
        let result = dataset_from_json("items", &json!([{"tags": ["a", "b"]}]));
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_document_must_be_object() {
        let result = load_registry(&json!([{"id": 1}]));
        assert!(matches!(
            result,
            Err(TabSurveyorError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_registry_rejects_non_dataset_entry() {
        let result = load_registry(&json!({
            "orders": [{"id": 1}],
            "notes": "free text"
        }));
        let error = result.unwrap_err();
        assert!(matches!(error, TabSurveyorError::TypeMismatch { .. }));
        assert!(error.to_string().contains("'notes'"));
    }

    #[test]
    fn test_registry_keeps_document_order() {
        let registry = load_registry_str(
            r#"{"orders": [{"id": 1}], "customers": [{"id": 2}], "items": []}"#,
        )
        .unwrap();
        assert_eq!(registry.names(), vec!["orders", "customers", "items"]);
    }

    #[test]
    fn test_load_primary_keys() {
        let keys = load_primary_keys(&json!([
            {"dataframe": "orders", "primary_key": ["order_id"]},
            {"dataset": "items", "primary_key": ["order_id", "order_item_id"]}
        ]))
        .unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get("orders").unwrap().primary_key, vec!["order_id"]);
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2018-01-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2018-01-01 10:00:00").is_some());
        assert!(parse_timestamp("2018-01-01").is_some());
        assert!(parse_timestamp("01/01/2018").is_none());
    }

    #[test]
    fn test_registry_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"orders": [{{"order_id": 1}}, {{"order_id": 2}}]}}"#).unwrap();

        let registry = load_registry_file(file.path()).unwrap();
        assert_eq!(registry.names(), vec!["orders"]);
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let error = read_document(Path::new("/nonexistent/registry.json")).unwrap_err();
        assert!(matches!(error, TabSurveyorError::Io { .. }));
        assert!(error.to_string().contains("/nonexistent/registry.json"));
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let error = load_primary_keys_file(file.path()).unwrap_err();
        assert!(matches!(error, TabSurveyorError::Serialization { .. }));
    }
}
