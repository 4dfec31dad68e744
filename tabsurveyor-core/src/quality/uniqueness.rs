//! Duplicate primary key detection.
//!
//! A record is a duplicate when its key tuple equals the tuple of an earlier
//! record. The first occurrence of each tuple is never counted.

use std::collections::HashSet;

use crate::batch::AuditBatch;
use crate::models::{Dataset, ScalarValue};
use crate::registry::{DatasetRegistry, PrimaryKeys};
use crate::{Result, TabSurveyorError};

use super::models::DuplicateReport;

/// Counts records of `dataset` repeating an earlier record's key.
///
/// # Errors
/// Returns [`TabSurveyorError::Configuration`] if `key_columns` is empty or
/// names a column the dataset does not have.
pub fn check_duplicates<S: AsRef<str>>(
    name: &str,
    dataset: &dyn Dataset,
    key_columns: &[S],
) -> Result<DuplicateReport> {
    if key_columns.is_empty() {
        return Err(TabSurveyorError::configuration(format!(
            "primary key for dataset '{}' has no columns",
            name
        )));
    }

    let indices = key_columns
        .iter()
        .map(|column| {
            dataset.column_index(column.as_ref()).ok_or_else(|| {
                TabSurveyorError::configuration(format!(
                    "primary key column '{}' does not exist in dataset '{}'",
                    column.as_ref(),
                    name
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total_rows = dataset.row_count();
    let mut seen_keys: HashSet<Vec<String>> = HashSet::with_capacity(total_rows);
    let mut duplicate_count: u64 = 0;

    for row in 0..total_rows {
        // Nulls share one comparison key, so they compare equal to each other
        let key: Vec<String> = indices
            .iter()
            .map(|&column| {
                dataset
                    .value(row, column)
                    .map_or_else(|| ScalarValue::Null.comparison_key(), ScalarValue::comparison_key)
            })
            .collect();

        if !seen_keys.insert(key) {
            duplicate_count += 1;
        }
    }

    tracing::debug!(
        "Dataset '{}': {} duplicate keys over {} records",
        name,
        duplicate_count,
        total_rows
    );

    Ok(DuplicateReport::new(
        name,
        key_columns.iter().map(|c| c.as_ref().to_string()).collect(),
        duplicate_count,
        total_rows as u64,
    ))
}

/// Checks every registered dataset against its declared primary key.
///
/// A dataset without a key spec fails with
/// [`TabSurveyorError::Configuration`]; other datasets are still checked.
pub fn audit_duplicates(
    registry: &DatasetRegistry,
    keys: &PrimaryKeys,
) -> AuditBatch<DuplicateReport> {
    let mut batch = AuditBatch::new();
    for (name, dataset) in registry.iter() {
        let outcome = keys
            .get(name)
            .ok_or_else(|| {
                TabSurveyorError::configuration(format!(
                    "no primary key declared for dataset '{}'",
                    name
                ))
            })
            .and_then(|spec| check_duplicates(name, dataset, &spec.primary_key));
        batch.record(name, outcome);
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnSchema, ColumnType, RecordTable};

    fn items(rows: Vec<(ScalarValue, ScalarValue)>) -> RecordTable {
        RecordTable::new(
            vec![
                ColumnSchema::new("order_id", ColumnType::CategoricalNominal),
                ColumnSchema::new("order_item_id", ColumnType::NumericDiscrete),
            ],
            rows.into_iter().map(|(a, b)| vec![a, b]).collect(),
        )
        .unwrap()
    }

    fn ids(values: &[i64]) -> RecordTable {
        RecordTable::new(
            vec![ColumnSchema::new("id", ColumnType::NumericDiscrete)],
            values.iter().map(|v| vec![ScalarValue::Integer(*v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_occurrence_not_counted() {
        let report = check_duplicates("orders", &ids(&[1, 2, 2, 3, 3]), &["id"]).unwrap();
        assert_eq!(report.duplicate_count, 2);
        assert_eq!(report.key_columns, vec!["id"]);
        assert!((report.duplicate_percentage - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_unique_keys_have_no_duplicates() {
        let report = check_duplicates("orders", &ids(&[1, 2, 3]), &["id"]).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_dataset() {
        let report = check_duplicates("orders", &ids(&[]), &["id"]).unwrap();
        assert_eq!(report.duplicate_count, 0);
        assert_eq!(report.duplicate_percentage, 0.0);
    }

    #[test]
    fn test_composite_key() {
        let table = items(vec![
            (ScalarValue::Text("a".into()), ScalarValue::Integer(1)),
            (ScalarValue::Text("a".into()), ScalarValue::Integer(2)),
            (ScalarValue::Text("b".into()), ScalarValue::Integer(1)),
            (ScalarValue::Text("a".into()), ScalarValue::Integer(1)),
        ]);

        let report = check_duplicates("items", &table, &["order_id", "order_item_id"]).unwrap();
        assert_eq!(report.duplicate_count, 1);

        let report = check_duplicates("items", &table, &["order_id"]).unwrap();
        assert_eq!(report.duplicate_count, 2);
    }

    #[test]
    fn test_null_keys_compare_equal() {
        let table = items(vec![
            (ScalarValue::Null, ScalarValue::Integer(1)),
            (ScalarValue::Null, ScalarValue::Integer(1)),
            (ScalarValue::Text("a".into()), ScalarValue::Null),
        ]);

        let report = check_duplicates("items", &table, &["order_id", "order_item_id"]).unwrap();
        assert_eq!(report.duplicate_count, 1);
    }

    #[test]
    fn test_unknown_key_column() {
        let result = check_duplicates("orders", &ids(&[1]), &["order_id"]);
        assert!(matches!(
            result,
            Err(TabSurveyorError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_key() {
        let result = check_duplicates::<&str>("orders", &ids(&[1]), &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_audit_duplicates_isolates_missing_specs() {
        let registry = DatasetRegistry::new()
            .with_dataset("orders", ids(&[1, 1]))
            .unwrap()
            .with_dataset("customers", ids(&[1]))
            .unwrap();
        let keys = PrimaryKeys::new().with("orders", ["id"]).unwrap();

        let batch = audit_duplicates(&registry, &keys);

        assert_eq!(batch.reports.len(), 1);
        assert_eq!(batch.reports[0].duplicate_count, 1);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].dataset, "customers");
        assert!(batch.failures[0].configuration);
    }
}
