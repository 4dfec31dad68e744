//! Missing-value analysis.
//!
//! Counts absent cells per column. A NaN float is absent; empty strings and
//! zeros are values.

use crate::models::Dataset;
use crate::registry::DatasetRegistry;

use super::models::{ColumnMissing, MissingValueReport};

/// Counts missing values in every column of `dataset`.
///
/// Percentages are relative to the dataset's row count and are 0 for an
/// empty dataset.
pub fn check_missing(name: &str, dataset: &dyn Dataset) -> MissingValueReport {
    let total_rows = dataset.row_count() as u64;

    let columns: Vec<ColumnMissing> = dataset
        .schema()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let missing_count = dataset
                .column_values(index)
                .filter(|v| v.is_null())
                .count() as u64;
            ColumnMissing::new(&column.name, missing_count, total_rows)
        })
        .collect();

    let total_missing = columns.iter().map(|c| c.missing_count).sum();
    tracing::debug!(
        "Dataset '{}': {} missing cells across {} columns",
        name,
        total_missing,
        columns.len()
    );

    MissingValueReport {
        dataset: name.to_string(),
        row_count: total_rows,
        columns,
        total_missing,
    }
}

/// Counts missing values in every registered dataset.
pub fn audit_missing(registry: &DatasetRegistry) -> Vec<MissingValueReport> {
    registry
        .iter()
        .map(|(name, dataset)| check_missing(name, dataset))
        .collect()
}
