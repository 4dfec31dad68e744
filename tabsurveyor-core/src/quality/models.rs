//! Data quality report models.
//!
//! Reports are computed from a dataset snapshot and hold no reference back
//! to it. Percentages are expressed in the range 0-100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity level for threshold violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Metric exceeds its threshold
    Warning,
    /// Metric exceeds its threshold by a wide margin
    Critical,
}

/// A configured maximum exceeded during the audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdViolation {
    /// Name of the metric that violated threshold
    pub metric: String,
    /// Column the measurement belongs to, if column-level
    pub column: Option<String>,
    /// The configured maximum percentage
    pub threshold: f64,
    /// The measured percentage
    pub actual: f64,
    /// Severity derived from how far the threshold was exceeded
    pub severity: ViolationSeverity,
}

/// Measurements at or above this multiple of the threshold are critical.
const CRITICAL_SEVERITY_RATIO: f64 = 2.0;

impl ThresholdViolation {
    /// Creates a new threshold violation.
    ///
    /// # Severity Classification
    /// - Critical: actual is at least twice the threshold, or the threshold is zero
    /// - Warning: otherwise
    pub fn new(
        metric: impl Into<String>,
        column: Option<String>,
        threshold: f64,
        actual: f64,
    ) -> Self {
        let severity = if threshold <= 0.0 || actual >= threshold * CRITICAL_SEVERITY_RATIO {
            ViolationSeverity::Critical
        } else {
            ViolationSeverity::Warning
        };

        Self {
            metric: metric.into(),
            column,
            threshold,
            actual,
            severity,
        }
    }
}

/// Share of `total` represented by `count`, as a percentage.
pub(crate) fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Duplicate-key findings for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Dataset name
    pub dataset: String,
    /// Key columns the records were compared on
    pub key_columns: Vec<String>,
    /// Records repeating an earlier record's key
    pub duplicate_count: u64,
    /// Percentage of records that are repeats
    pub duplicate_percentage: f64,
}

impl DuplicateReport {
    /// Creates a new duplicate report.
    pub fn new(
        dataset: impl Into<String>,
        key_columns: Vec<String>,
        duplicate_count: u64,
        total: u64,
    ) -> Self {
        let dataset = dataset.into();

        if duplicate_count > total {
            tracing::warn!(
                "Quality report anomaly: duplicate_count ({}) exceeds total ({}) for dataset '{}'",
                duplicate_count,
                total,
                dataset
            );
        }

        Self {
            dataset,
            key_columns,
            duplicate_count,
            duplicate_percentage: percentage(duplicate_count, total),
        }
    }

    /// Returns true when no key is repeated.
    pub fn is_clean(&self) -> bool {
        self.duplicate_count == 0
    }
}

/// Missing values in a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    /// Column name
    pub column_name: String,
    /// Absent values in the column
    pub missing_count: u64,
    /// Percentage of all records (0-100)
    pub missing_percentage: f64,
}

impl ColumnMissing {
    /// Creates new column missing-value metrics.
    pub fn new(column_name: impl Into<String>, missing_count: u64, total: u64) -> Self {
        Self {
            column_name: column_name.into(),
            missing_count,
            missing_percentage: percentage(missing_count, total),
        }
    }
}

/// Missing-value findings for a dataset.
///
/// Every column is listed; [`MissingValueReport::affected_columns`] yields
/// only the columns with at least one missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueReport {
    /// Dataset name
    pub dataset: String,
    /// Records in the dataset
    pub row_count: u64,
    /// One entry per column, in native order
    pub columns: Vec<ColumnMissing>,
    /// Missing cells across all columns
    pub total_missing: u64,
}

impl MissingValueReport {
    /// Columns with at least one missing value.
    pub fn affected_columns(&self) -> impl Iterator<Item = &ColumnMissing> {
        self.columns.iter().filter(|c| c.missing_count > 0)
    }

    /// Returns true when no column has a missing value.
    pub fn is_clean(&self) -> bool {
        self.total_missing == 0
    }

    /// Metrics for one column.
    pub fn column(&self, name: &str) -> Option<&ColumnMissing> {
        self.columns.iter().find(|c| c.column_name == name)
    }
}

/// Zero values in a single numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnZeros {
    /// Column name
    pub column_name: String,
    /// Cells exactly equal to zero
    pub zero_count: u64,
    /// Percentage of all records (0-100)
    pub zero_percentage: f64,
}

impl ColumnZeros {
    /// Creates new column zero-value metrics.
    pub fn new(column_name: impl Into<String>, zero_count: u64, total: u64) -> Self {
        Self {
            column_name: column_name.into(),
            zero_count,
            zero_percentage: percentage(zero_count, total),
        }
    }
}

/// Zero-value findings for the numeric columns of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroValueReport {
    /// Dataset name
    pub dataset: String,
    /// Records in the dataset
    pub row_count: u64,
    /// One entry per numeric column
    pub columns: Vec<ColumnZeros>,
    /// Zero cells across all numeric columns
    pub total_zeros: u64,
}

impl ZeroValueReport {
    /// Columns with at least one zero value.
    pub fn affected_columns(&self) -> impl Iterator<Item = &ColumnZeros> {
        self.columns.iter().filter(|c| c.zero_count > 0)
    }

    /// Returns true when no numeric column holds a zero.
    pub fn is_clean(&self) -> bool {
        self.total_zeros == 0
    }

    /// Metrics for one column.
    pub fn column(&self, name: &str) -> Option<&ColumnZeros> {
        self.columns.iter().find(|c| c.column_name == name)
    }
}

/// Complete quality report for a single dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Dataset name
    pub dataset: String,
    /// Number of records
    pub row_count: u64,
    /// Number of columns
    pub column_count: u64,
    /// Duplicate findings; `None` when the check was not run
    pub duplicates: Option<DuplicateReport>,
    /// Missing-value findings; `None` when the check was not run
    pub missing: Option<MissingValueReport>,
    /// Zero-value findings; `None` when not run or the dataset has no numeric columns
    pub zeros: Option<ZeroValueReport>,
    /// Measurements above their configured maximum
    pub threshold_violations: Vec<ThresholdViolation>,
    /// Timestamp when analysis was performed
    pub analyzed_at: DateTime<Utc>,
}

impl QualityReport {
    /// Creates a report holding only structural counts.
    pub fn new(dataset: impl Into<String>, row_count: u64, column_count: u64) -> Self {
        Self {
            dataset: dataset.into(),
            row_count,
            column_count,
            duplicates: None,
            missing: None,
            zeros: None,
            threshold_violations: Vec::new(),
            analyzed_at: Utc::now(),
        }
    }

    /// Sets the duplicate findings.
    pub fn with_duplicates(mut self, report: Option<DuplicateReport>) -> Self {
        self.duplicates = report;
        self
    }

    /// Sets the missing-value findings.
    pub fn with_missing(mut self, report: Option<MissingValueReport>) -> Self {
        self.missing = report;
        self
    }

    /// Sets the zero-value findings.
    pub fn with_zeros(mut self, report: Option<ZeroValueReport>) -> Self {
        self.zeros = report;
        self
    }

    /// Sets the threshold violations.
    pub fn with_threshold_violations(mut self, violations: Vec<ThresholdViolation>) -> Self {
        self.threshold_violations = violations;
        self
    }

    /// Returns true when every check that ran found nothing.
    pub fn is_clean(&self) -> bool {
        self.duplicates.as_ref().is_none_or(DuplicateReport::is_clean)
            && self.missing.as_ref().is_none_or(MissingValueReport::is_clean)
            && self.zeros.as_ref().is_none_or(ZeroValueReport::is_clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_violation_warning_severity() {
        let violation = ThresholdViolation::new("missing", Some("price".into()), 5.0, 7.5);
        assert_eq!(violation.severity, ViolationSeverity::Warning);
    }

    #[test]
    fn test_threshold_violation_critical_severity() {
        let violation = ThresholdViolation::new("missing", None, 5.0, 10.0);
        assert_eq!(violation.severity, ViolationSeverity::Critical);

        let violation = ThresholdViolation::new("duplicates", None, 0.0, 0.1);
        assert_eq!(violation.severity, ViolationSeverity::Critical);
    }

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
        assert!((percentage(1, 3) - 33.333).abs() < 0.001);
        assert_eq!(percentage(150, 100), 100.0);
    }

    #[test]
    fn test_column_missing_calculation() {
        let metrics = ColumnMissing::new("review_comment", 58, 100);
        assert_eq!(metrics.missing_count, 58);
        assert!((metrics.missing_percentage - 58.0).abs() < 0.001);
    }

    #[test]
    fn test_duplicate_report_calculation() {
        let report = DuplicateReport::new("orders", vec!["order_id".into()], 2, 5);
        assert!(!report.is_clean());
        assert!((report.duplicate_percentage - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_duplicate_report_anomalous_input() {
        let report = DuplicateReport::new("orders", vec!["id".into()], 150, 100);
        assert_eq!(report.duplicate_percentage, 100.0);
    }

    #[test]
    fn test_missing_report_affected_columns() {
        let report = MissingValueReport {
            dataset: "reviews".into(),
            row_count: 10,
            columns: vec![
                ColumnMissing::new("review_id", 0, 10),
                ColumnMissing::new("review_comment", 4, 10),
            ],
            total_missing: 4,
        };

        let affected: Vec<&str> = report
            .affected_columns()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(affected, vec!["review_comment"]);
        assert!(!report.is_clean());
        assert_eq!(report.column("review_id").unwrap().missing_count, 0);
    }

    #[test]
    fn test_quality_report_builder() {
        let report = QualityReport::new("orders", 5, 3)
            .with_duplicates(Some(DuplicateReport::new(
                "orders",
                vec!["order_id".into()],
                0,
                5,
            )))
            .with_threshold_violations(vec![ThresholdViolation::new("missing", None, 5.0, 6.0)]);

        assert_eq!(report.dataset, "orders");
        assert_eq!(report.row_count, 5);
        assert_eq!(report.column_count, 3);
        assert!(report.is_clean());
        assert_eq!(report.threshold_violations.len(), 1);
    }

    #[test]
    fn test_quality_report_serde_roundtrip() {
        let report = QualityReport::new("items", 500, 7).with_zeros(Some(ZeroValueReport {
            dataset: "items".into(),
            row_count: 500,
            columns: vec![ColumnZeros::new("freight_value", 12, 500)],
            total_zeros: 12,
        }));

        let json = serde_json::to_string(&report).unwrap();
        let deserialized: QualityReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report, deserialized);
        assert!(!deserialized.is_clean());
    }
}
