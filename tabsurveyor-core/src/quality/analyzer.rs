//! Integrity auditor facade.
//!
//! This module provides the `QualityAuditor` that runs the duplicate,
//! missing-value and zero-value checks for a dataset and assembles one
//! [`QualityReport`].

use crate::batch::AuditBatch;
use crate::models::Dataset;
use crate::registry::{DatasetRegistry, PrimaryKeySpec, PrimaryKeys};
use crate::{Result, TabSurveyorError};

use super::completeness::check_missing;
use super::config::AuditConfig;
use super::models::{QualityReport, ThresholdViolation};
use super::uniqueness::check_duplicates;
use super::zeros::check_zeros;

/// Integrity auditor for registered datasets.
///
/// # Example
///
/// ```rust,ignore
/// use tabsurveyor_core::quality::{AuditConfig, QualityAuditor};
///
/// let auditor = QualityAuditor::new(AuditConfig::default());
/// let batch = auditor.audit_registry(&registry, &keys);
/// for report in &batch.reports {
///     println!("{}: {} violations", report.dataset, report.threshold_violations.len());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct QualityAuditor {
    config: AuditConfig,
}

impl QualityAuditor {
    /// Creates a new auditor with the given configuration.
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Creates a new auditor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AuditConfig::default())
    }

    /// Returns a reference to the auditor configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audits one dataset.
    ///
    /// This method runs every enabled check:
    /// - Duplicates (against `key`)
    /// - Missing values (all columns)
    /// - Zero values (numeric columns)
    ///
    /// # Errors
    /// Returns [`TabSurveyorError::Configuration`] if the configuration is
    /// invalid, if `key` is `None` while primary keys are required, or if the
    /// key names an unknown column.
    pub fn audit(
        &self,
        name: &str,
        dataset: &dyn Dataset,
        key: Option<&PrimaryKeySpec>,
    ) -> Result<QualityReport> {
        self.config
            .validate()
            .map_err(|e| TabSurveyorError::configuration(e.to_string()))?;

        let checks = self.config.enabled_checks;

        let duplicates = if checks.duplicates {
            match key {
                Some(spec) => Some(check_duplicates(name, dataset, &spec.primary_key)?),
                None if self.config.require_primary_keys => {
                    return Err(TabSurveyorError::configuration(format!(
                        "no primary key declared for dataset '{}'",
                        name
                    )));
                }
                None => {
                    tracing::debug!(
                        "Dataset '{}' has no primary key, skipping duplicate check",
                        name
                    );
                    None
                }
            }
        } else {
            None
        };

        let missing = checks.missing.then(|| check_missing(name, dataset));
        let zeros = if checks.zeros {
            check_zeros(name, dataset)
        } else {
            None
        };

        let mut threshold_violations = Vec::new();

        if let Some(report) = &duplicates
            && report.duplicate_percentage > self.config.max_duplicate_percentage
        {
            threshold_violations.push(ThresholdViolation::new(
                "duplicates",
                None,
                self.config.max_duplicate_percentage,
                report.duplicate_percentage,
            ));
        }

        if let Some(report) = &missing {
            for column in report.affected_columns() {
                if column.missing_percentage > self.config.max_missing_percentage {
                    threshold_violations.push(ThresholdViolation::new(
                        "missing",
                        Some(column.column_name.clone()),
                        self.config.max_missing_percentage,
                        column.missing_percentage,
                    ));
                }
            }
        }

        if let Some(report) = &zeros {
            for column in report.affected_columns() {
                if column.zero_percentage > self.config.max_zero_percentage {
                    threshold_violations.push(ThresholdViolation::new(
                        "zeros",
                        Some(column.column_name.clone()),
                        self.config.max_zero_percentage,
                        column.zero_percentage,
                    ));
                }
            }
        }

        Ok(
            QualityReport::new(name, dataset.row_count() as u64, dataset.column_count() as u64)
                .with_duplicates(duplicates)
                .with_missing(missing)
                .with_zeros(zeros)
                .with_threshold_violations(threshold_violations),
        )
    }

    /// Audits every registered dataset.
    ///
    /// Datasets that fail their audit are logged and recorded as failures
    /// rather than aborting the batch, so reports for the remaining
    /// datasets are still available.
    pub fn audit_registry(
        &self,
        registry: &DatasetRegistry,
        keys: &PrimaryKeys,
    ) -> AuditBatch<QualityReport> {
        let mut batch = AuditBatch::new();
        for (name, dataset) in registry.iter() {
            batch.record(name, self.audit(name, dataset, keys.get(name)));
        }
        batch
    }
}
