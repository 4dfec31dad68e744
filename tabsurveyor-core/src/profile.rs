//! Structural profiling of registered datasets.
//!
//! Reports row/column counts, column names and column types per dataset.
//! Profiling never fails over a validated registry: type mismatches are
//! rejected when datasets enter the registry.

use serde::{Deserialize, Serialize};

use crate::models::{ColumnSchema, Dataset};
use crate::registry::DatasetRegistry;

/// Row and column counts of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    /// Dataset name
    pub dataset: String,
    /// Number of records
    pub row_count: usize,
    /// Number of columns
    pub column_count: usize,
}

/// Column names of a dataset, in native order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetColumns {
    /// Dataset name
    pub dataset: String,
    /// Column names in native order
    pub columns: Vec<String>,
}

/// Column types of a dataset, in native order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetTypes {
    /// Dataset name
    pub dataset: String,
    /// Column schemas in native order
    pub types: Vec<ColumnSchema>,
}

/// Complete structural profile of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetProfile {
    /// Dataset name
    pub dataset: String,
    /// Number of records
    pub row_count: usize,
    /// Number of columns
    pub column_count: usize,
    /// Column schemas in native order
    pub columns: Vec<ColumnSchema>,
}

impl std::fmt::Display for DatasetShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dataset {} has {} records and {} variables",
            self.dataset, self.row_count, self.column_count
        )
    }
}

/// Shape of a single dataset.
pub fn shape_of(name: &str, dataset: &dyn Dataset) -> DatasetShape {
    DatasetShape {
        dataset: name.to_string(),
        row_count: dataset.row_count(),
        column_count: dataset.column_count(),
    }
}

/// Column names of a single dataset.
pub fn columns_of(name: &str, dataset: &dyn Dataset) -> DatasetColumns {
    DatasetColumns {
        dataset: name.to_string(),
        columns: dataset.column_names(),
    }
}

/// Column types of a single dataset.
pub fn types_of(name: &str, dataset: &dyn Dataset) -> DatasetTypes {
    DatasetTypes {
        dataset: name.to_string(),
        types: dataset.schema().to_vec(),
    }
}

/// Shapes of every registered dataset.
pub fn dataset_shapes(registry: &DatasetRegistry) -> Vec<DatasetShape> {
    registry
        .iter()
        .map(|(name, dataset)| shape_of(name, dataset))
        .collect()
}

/// Column names of every registered dataset.
pub fn dataset_columns(registry: &DatasetRegistry) -> Vec<DatasetColumns> {
    registry
        .iter()
        .map(|(name, dataset)| columns_of(name, dataset))
        .collect()
}

/// Column types of every registered dataset.
pub fn dataset_types(registry: &DatasetRegistry) -> Vec<DatasetTypes> {
    registry
        .iter()
        .map(|(name, dataset)| types_of(name, dataset))
        .collect()
}

/// Full structural profile of every registered dataset.
pub fn profile_registry(registry: &DatasetRegistry) -> Vec<DatasetProfile> {
    registry
        .iter()
        .map(|(name, dataset)| {
            tracing::debug!("Profiling dataset '{}'", name);
            DatasetProfile {
                dataset: name.to_string(),
                row_count: dataset.row_count(),
                column_count: dataset.column_count(),
                columns: dataset.schema().to_vec(),
            }
        })
        .collect()
}
