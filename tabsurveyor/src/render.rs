//! Plain text rendering of reports.
//!
//! One summary line per finding, indented detail lines underneath.

use tabsurveyor_core::quality::{QualityReport, ViolationSeverity};
use tabsurveyor_core::stats::StatisticsTable;
use tabsurveyor_core::{AuditBatch, DatasetFailure, DatasetProfile};

/// Lines describing the structure of each dataset.
pub fn profile_lines(profiles: &[DatasetProfile]) -> Vec<String> {
    let mut lines = Vec::new();
    for profile in profiles {
        lines.push(format!(
            "dataset {} has {} records and {} variables",
            profile.dataset, profile.row_count, profile.column_count
        ));
        for column in &profile.columns {
            lines.push(format!("  {}: {}", column.name, column.column_type));
        }
    }
    lines
}

/// Lines describing the findings of each audited dataset, then failures.
pub fn audit_lines(batch: &AuditBatch<QualityReport>) -> Vec<String> {
    let mut lines = Vec::new();
    for report in &batch.reports {
        let name = &report.dataset;

        if let Some(duplicates) = &report.duplicates {
            if duplicates.is_clean() {
                lines.push(format!("dataset {} has no duplicates", name));
            } else {
                lines.push(format!(
                    "dataset {} has {} duplicate values on ({})",
                    name,
                    duplicates.duplicate_count,
                    duplicates.key_columns.join(", ")
                ));
            }
        }

        if let Some(missing) = &report.missing {
            if missing.is_clean() {
                lines.push(format!("dataset {} has no missing values", name));
            } else {
                lines.push(format!("dataset {} has missing values", name));
                for column in missing.affected_columns() {
                    lines.push(format!(
                        "  {}: {} ({:.3}%)",
                        column.column_name, column.missing_count, column.missing_percentage
                    ));
                }
            }
        }

        if let Some(zeros) = &report.zeros {
            if zeros.is_clean() {
                lines.push(format!("dataset {} has no zero values", name));
            } else {
                lines.push(format!("dataset {} has zero values", name));
                for column in zeros.affected_columns() {
                    lines.push(format!(
                        "  {}: {} ({:.3}%)",
                        column.column_name, column.zero_count, column.zero_percentage
                    ));
                }
            }
        }

        for violation in &report.threshold_violations {
            let severity = match violation.severity {
                ViolationSeverity::Warning => "warning",
                ViolationSeverity::Critical => "critical",
            };
            let target = violation
                .column
                .as_ref()
                .map_or_else(|| name.clone(), |column| format!("{}.{}", name, column));
            lines.push(format!(
                "{}: {} {} = {:.3}% (threshold: {:.3}%)",
                severity, target, violation.metric, violation.actual, violation.threshold
            ));
        }
    }
    lines.extend(failure_lines(&batch.failures));
    lines
}

/// Lines with one block of statistics per column.
pub fn describe_lines(batch: &AuditBatch<StatisticsTable>) -> Vec<String> {
    let mut lines = Vec::new();
    for table in &batch.reports {
        for row in &table.rows {
            lines.push(format!("dataset {} column {}", table.dataset, row.column));
            let optional = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| v.to_string());
            let fields = [
                ("count", row.count.to_string()),
                ("minimum", row.minimum.to_string()),
                ("maximum", row.maximum.to_string()),
                ("mean", row.mean.to_string()),
                ("median", row.median.to_string()),
                ("mode", row.mode.to_string()),
                ("first_quartile", row.first_quartile.to_string()),
                ("third_quartile", row.third_quartile.to_string()),
                ("interquartile_range", row.interquartile_range.to_string()),
                ("lower_fence", row.lower_fence.to_string()),
                ("upper_fence", row.upper_fence.to_string()),
                ("standard_deviation", row.standard_deviation.to_string()),
                ("variance", row.variance.to_string()),
                ("skewness", optional(row.skewness)),
                ("kurtosis", optional(row.kurtosis)),
                (
                    "normality",
                    row.normality.map_or_else(
                        || "n/a".to_string(),
                        |test| format!("{} (p = {})", test.verdict, test.p_value),
                    ),
                ),
                ("distinct_values", row.distinct_value_count.to_string()),
                ("outliers", row.outlier_count.to_string()),
            ];
            for (label, value) in fields {
                lines.push(format!("  {}: {}", label, value));
            }
        }
    }
    lines.extend(failure_lines(&batch.failures));
    lines
}

fn failure_lines(failures: &[DatasetFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|f| format!("dataset {} could not be analyzed: {}", f.dataset, f.error))
        .collect()
}
