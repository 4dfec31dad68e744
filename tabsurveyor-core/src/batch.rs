//! Per-dataset isolation for registry-wide operations.
//!
//! A dataset that fails its analysis is recorded as a failure and logged;
//! the remaining datasets are still analyzed and reported.

use serde::{Deserialize, Serialize};

use crate::TabSurveyorError;

/// A dataset whose analysis failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFailure {
    /// Dataset name
    pub dataset: String,
    /// Rendered error message
    pub error: String,
    /// True when the failure is a caller configuration problem
    pub configuration: bool,
}

/// Results of running one analysis over every dataset of a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditBatch<T> {
    /// Reports of datasets analyzed successfully, in registry order
    pub reports: Vec<T>,
    /// Datasets that could not be analyzed, in registry order
    pub failures: Vec<DatasetFailure>,
}

impl<T> Default for AuditBatch<T> {
    fn default() -> Self {
        Self {
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> AuditBatch<T> {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one dataset.
    pub fn record(&mut self, dataset: &str, outcome: crate::Result<T>) {
        match outcome {
            Ok(report) => self.reports.push(report),
            Err(e) => {
                tracing::warn!("Analysis failed for dataset '{}': {}", dataset, e);
                self.failures.push(DatasetFailure {
                    dataset: dataset.to_string(),
                    error: e.to_string(),
                    configuration: matches!(e, TabSurveyorError::Configuration { .. }),
                });
            }
        }
    }

    /// Returns true if every dataset was analyzed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of datasets covered, successful or not.
    pub fn len(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// Returns true if no dataset was covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
