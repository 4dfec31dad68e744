//! Core data models for tabular dataset representation.
//!
//! A dataset is an ordered collection of records sharing one column set.
//! The engine only talks to datasets through the [`Dataset`] capability
//! trait, so any storage that can answer row/column counts, column types and
//! cell lookups can be audited and summarized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, TabSurveyorError};

/// Declared or inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Real-valued measurements (prices, weights, distances)
    NumericContinuous,
    /// Counts and integer-valued codes
    NumericDiscrete,
    /// Unordered labels
    CategoricalNominal,
    /// Ordered labels (e.g. review scores)
    CategoricalOrdinal,
    /// Dates and timestamps
    Temporal,
}

impl ColumnType {
    /// Returns true for both numeric kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::NumericContinuous | Self::NumericDiscrete)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::NumericContinuous => write!(f, "numeric (continuous)"),
            ColumnType::NumericDiscrete => write!(f, "numeric (discrete)"),
            ColumnType::CategoricalNominal => write!(f, "categorical (nominal)"),
            ColumnType::CategoricalOrdinal => write!(f, "categorical (ordinal)"),
            ColumnType::Temporal => write!(f, "temporal"),
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Absent value
    Null,
    /// Boolean flag
    Boolean(bool),
    /// Whole number
    Integer(i64),
    /// Real number; NaN counts as absent
    Float(f64),
    /// Free text or category label
    Text(String),
    /// Point in time, normalized to UTC
    Timestamp(DateTime<Utc>),
}

impl ScalarValue {
    /// Returns true for absent values. A NaN float counts as absent.
    pub fn is_null(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns the numeric value of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Integer(v) => Some(*v as f64),
            ScalarValue::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Returns true when a numeric cell is exactly zero (-0.0 included).
    pub fn is_zero(&self) -> bool {
        match self {
            ScalarValue::Integer(v) => *v == 0,
            ScalarValue::Float(v) => *v == 0.0,
            _ => false,
        }
    }

    /// Returns a type-tagged representation used for equality in
    /// duplicate detection.
    ///
    /// All absent values share one key. Floats holding an integral value
    /// compare equal to the matching integer.
    pub fn comparison_key(&self) -> String {
        if self.is_null() {
            return "__NULL__".to_string();
        }
        match self {
            ScalarValue::Boolean(b) => format!("b:{}", b),
            ScalarValue::Integer(v) => format!("n:{}", v),
            ScalarValue::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
                format!("n:{}", *v as i64)
            }
            ScalarValue::Float(v) => format!("n:{}", v),
            ScalarValue::Text(s) => format!("s:{}", s),
            ScalarValue::Timestamp(t) => format!("t:{}", t.to_rfc3339()),
            ScalarValue::Null => "__NULL__".to_string(),
        }
    }

    /// Short name of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ScalarValue::Null => "null",
            ScalarValue::Boolean(_) => "boolean",
            ScalarValue::Integer(_) => "integer",
            ScalarValue::Float(_) => "float",
            ScalarValue::Text(_) => "text",
            ScalarValue::Timestamp(_) => "timestamp",
        }
    }

    /// Returns true if the value may be stored in a column of `column_type`.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        if self.is_null() {
            return true;
        }
        match column_type {
            ColumnType::NumericContinuous | ColumnType::NumericDiscrete => {
                matches!(self, ScalarValue::Integer(_) | ScalarValue::Float(_))
            }
            ColumnType::Temporal => matches!(self, ScalarValue::Timestamp(_)),
            ColumnType::CategoricalNominal | ColumnType::CategoricalOrdinal => true,
        }
    }
}

/// Name and type of a dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name
    pub name: String,
    /// Semantic column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSchema {
    /// Creates a new column schema.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Read-only capabilities every dataset must provide.
///
/// Implementations must keep every record aligned with [`Dataset::schema`];
/// [`Dataset::value`] returns `None` only for out-of-range coordinates.
pub trait Dataset: Send + Sync + std::fmt::Debug {
    /// Number of records.
    fn row_count(&self) -> usize;

    /// Ordered column schemas, in the dataset's native column order.
    fn schema(&self) -> &[ColumnSchema];

    /// Cell at `(row, column)`.
    fn value(&self, row: usize, column: usize) -> Option<&ScalarValue>;

    /// Number of columns.
    fn column_count(&self) -> usize {
        self.schema().len()
    }

    /// Column names in native order.
    fn column_names(&self) -> Vec<String> {
        self.schema().iter().map(|c| c.name.clone()).collect()
    }

    /// Position of a column by name.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.schema().iter().position(|c| c.name == name)
    }

    /// Type of a column by name.
    fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.schema()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    /// Iterates over every cell of one column, in record order.
    fn column_values(&self, column: usize) -> Box<dyn Iterator<Item = &ScalarValue> + '_> {
        Box::new((0..self.row_count()).filter_map(move |row| self.value(row, column)))
    }

    /// Numeric values of one column, skipping absent cells.
    fn numeric_values(&self, column: usize) -> Vec<f64> {
        self.column_values(column)
            .filter_map(ScalarValue::as_f64)
            .collect()
    }
}

/// In-memory, row-major [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTable {
    columns: Vec<ColumnSchema>,
    rows: Vec<Vec<ScalarValue>>,
}

impl RecordTable {
    /// Builds a table from a schema and rows aligned with it.
    ///
    /// # Errors
    /// - [`TabSurveyorError::Configuration`] if two columns share a name
    /// - [`TabSurveyorError::TypeMismatch`] if a row has the wrong width or a
    ///   cell does not fit its column type
    pub fn new(columns: Vec<ColumnSchema>, rows: Vec<Vec<ScalarValue>>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TabSurveyorError::configuration(format!(
                    "column '{}' is declared more than once",
                    column.name
                )));
            }
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TabSurveyorError::type_mismatch(format!(
                    "record {} has {} values but the dataset has {} columns",
                    row_index,
                    row.len(),
                    columns.len()
                )));
            }
            for (value, column) in row.iter().zip(&columns) {
                if !value.fits(column.column_type) {
                    return Err(TabSurveyorError::type_mismatch(format!(
                        "record {} holds a {} value in {} column '{}'",
                        row_index,
                        value.kind(),
                        column.column_type,
                        column.name
                    )));
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Creates an empty table with the given schema.
    pub fn empty(columns: Vec<ColumnSchema>) -> Result<Self> {
        Self::new(columns, Vec::new())
    }

    /// Returns the records.
    pub fn rows(&self) -> &[Vec<ScalarValue>] {
        &self.rows
    }
}

impl Dataset for RecordTable {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn schema(&self) -> &[ColumnSchema] {
        &self.columns
    }

    fn value(&self, row: usize, column: usize) -> Option<&ScalarValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    fn column_values(&self, column: usize) -> Box<dyn Iterator<Item = &ScalarValue> + '_> {
        Box::new(self.rows.iter().filter_map(move |r| r.get(column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> RecordTable {
        RecordTable::new(
            vec![
                ColumnSchema::new("order_id", ColumnType::CategoricalNominal),
                ColumnSchema::new("price", ColumnType::NumericContinuous),
                ColumnSchema::new("items", ColumnType::NumericDiscrete),
            ],
            vec![
                vec![
                    ScalarValue::Text("a1".into()),
                    ScalarValue::Float(10.5),
                    ScalarValue::Integer(1),
                ],
                vec![
                    ScalarValue::Text("a2".into()),
                    ScalarValue::Null,
                    ScalarValue::Integer(0),
                ],
                vec![
                    ScalarValue::Text("a3".into()),
                    ScalarValue::Float(f64::NAN),
                    ScalarValue::Integer(3),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_dataset_capabilities() {
        let table = orders();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.column_names(), vec!["order_id", "price", "items"]);
        assert_eq!(table.column_index("price"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(
            table.column_type("items"),
            Some(ColumnType::NumericDiscrete)
        );
        assert_eq!(table.column_values(2).count(), 3);
    }

    #[test]
    fn test_numeric_values_skip_absent_cells() {
        let table = orders();
        assert_eq!(table.numeric_values(1), vec![10.5]);
        assert_eq!(table.numeric_values(2), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_nan_is_null() {
        assert!(ScalarValue::Float(f64::NAN).is_null());
        assert!(ScalarValue::Null.is_null());
        assert!(!ScalarValue::Float(0.0).is_null());
        assert!(!ScalarValue::Text(String::new()).is_null());
    }

    #[test]
    fn test_zero_detection() {
        assert!(ScalarValue::Integer(0).is_zero());
        assert!(ScalarValue::Float(0.0).is_zero());
        assert!(ScalarValue::Float(-0.0).is_zero());
        assert!(!ScalarValue::Float(1e-12).is_zero());
        assert!(!ScalarValue::Text("0".into()).is_zero());
    }

    #[test]
    fn test_comparison_key_unifies_integral_floats() {
        assert_eq!(
            ScalarValue::Integer(2).comparison_key(),
            ScalarValue::Float(2.0).comparison_key()
        );
        assert_ne!(
            ScalarValue::Integer(2).comparison_key(),
            ScalarValue::Text("2".into()).comparison_key()
        );
        assert_eq!(
            ScalarValue::Null.comparison_key(),
            ScalarValue::Float(f64::NAN).comparison_key()
        );
    }

    #[test]
    fn test_record_width_mismatch_rejected() {
        let result = RecordTable::new(
            vec![ColumnSchema::new("id", ColumnType::NumericDiscrete)],
            vec![vec![ScalarValue::Integer(1), ScalarValue::Integer(2)]],
        );
        assert!(matches!(
            result,
            Err(TabSurveyorError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_text_in_numeric_column_rejected() {
        let result = RecordTable::new(
            vec![ColumnSchema::new("price", ColumnType::NumericContinuous)],
            vec![vec![ScalarValue::Text("cheap".into())]],
        );
        assert!(matches!(
            result,
            Err(TabSurveyorError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_column_names_rejected() {
        let result = RecordTable::empty(vec![
            ColumnSchema::new("id", ColumnType::NumericDiscrete),
            ColumnSchema::new("id", ColumnType::NumericDiscrete),
        ]);
        assert!(matches!(
            result,
            Err(TabSurveyorError::Configuration { .. })
        ));
    }

    #[test]
    fn test_column_type_serde_names() {
        let json = serde_json::to_string(&ColumnType::NumericContinuous).unwrap();
        assert_eq!(json, "\"numeric_continuous\"");

        let parsed: ColumnType = serde_json::from_str("\"categorical_ordinal\"").unwrap();
        assert_eq!(parsed, ColumnType::CategoricalOrdinal);
    }
}
