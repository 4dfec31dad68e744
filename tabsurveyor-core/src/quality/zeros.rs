//! Zero-value analysis on numeric columns.

use crate::models::Dataset;
use crate::registry::DatasetRegistry;

use super::models::{ColumnZeros, ZeroValueReport};

/// Counts cells exactly equal to zero in every numeric column.
///
/// Returns `None` when the dataset has no numeric columns.
pub fn check_zeros(name: &str, dataset: &dyn Dataset) -> Option<ZeroValueReport> {
    let total_rows = dataset.row_count() as u64;

    let columns: Vec<ColumnZeros> = dataset
        .schema()
        .iter()
        .enumerate()
        .filter(|(_, column)| column.column_type.is_numeric())
        .map(|(index, column)| {
            let zero_count = dataset
                .column_values(index)
                .filter(|v| v.is_zero())
                .count() as u64;
            ColumnZeros::new(&column.name, zero_count, total_rows)
        })
        .collect();

    if columns.is_empty() {
        tracing::debug!("Dataset '{}' has no numeric columns, skipping zero check", name);
        return None;
    }

    let total_zeros = columns.iter().map(|c| c.zero_count).sum();
    Some(ZeroValueReport {
        dataset: name.to_string(),
        row_count: total_rows,
        columns,
        total_zeros,
    })
}

/// Counts zero values in every registered dataset with numeric columns.
pub fn audit_zeros(registry: &DatasetRegistry) -> Vec<ZeroValueReport> {
    registry
        .iter()
        .filter_map(|(name, dataset)| check_zeros(name, dataset))
        .collect()
}
