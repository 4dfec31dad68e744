//! Distribution summarizer.
//!
//! Produces one [`ContinuousStatistics`] row per requested numeric column.
//! Values are kept at full precision; [`StatisticsTable::rounded`] applies
//! presentation rounding.

use serde::{Deserialize, Serialize};

use crate::batch::AuditBatch;
use crate::models::{ColumnType, Dataset};
use crate::registry::DatasetRegistry;
use crate::{Result, TabSurveyorError};

use super::config::SummaryConfig;
use super::descriptive::{distinct_count, mode, sorted_finite};
use super::normality::{NormalityTest, ks_normality};
use u_numflow::stats;

/// Minimum number of non-null values needed to summarize a column.
pub const MIN_SAMPLE_SIZE: usize = 2;

/// Distribution statistics of one continuous column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousStatistics {
    /// Column name
    pub column: String,
    /// Non-null values summarized
    pub count: usize,
    /// Smallest value
    pub minimum: f64,
    /// Largest value
    pub maximum: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// 50th percentile
    pub median: f64,
    /// Most frequent value, smallest on ties
    pub mode: f64,
    /// 25th percentile
    pub first_quartile: f64,
    /// 75th percentile
    pub third_quartile: f64,
    /// Third minus first quartile
    pub interquartile_range: f64,
    /// Tukey lower fence, never below the minimum
    pub lower_fence: f64,
    /// Tukey upper fence, never above the maximum
    pub upper_fence: f64,
    /// Sample standard deviation
    pub standard_deviation: f64,
    /// Sample variance
    pub variance: f64,
    /// `None` for fewer than three values
    pub skewness: Option<f64>,
    /// Excess kurtosis; `None` for fewer than four values
    pub kurtosis: Option<f64>,
    /// `None` for fewer than five values
    pub normality: Option<NormalityTest>,
    /// Distinct non-null values
    pub distinct_value_count: usize,
    /// Values outside the fences
    pub outlier_count: usize,
}

/// A statistic that must be a finite number for a validated sample.
fn finite(column: &str, statistic: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(TabSurveyorError::domain(format!(
            "{} of column '{}' is not representable as a finite number",
            statistic, column
        ))),
    }
}

/// Shape statistic that may be absent for small samples but never infinite.
fn shape(column: &str, statistic: &str, value: Option<f64>) -> Result<Option<f64>> {
    value.map(|v| finite(column, statistic, Some(v))).transpose()
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

impl ContinuousStatistics {
    /// Copy with every real-valued statistic rounded to `places` decimals.
    pub fn rounded(&self, places: u32) -> Self {
        let r = |v: f64| round_to(v, places);
        Self {
            column: self.column.clone(),
            count: self.count,
            minimum: r(self.minimum),
            maximum: r(self.maximum),
            mean: r(self.mean),
            median: r(self.median),
            mode: r(self.mode),
            first_quartile: r(self.first_quartile),
            third_quartile: r(self.third_quartile),
            interquartile_range: r(self.interquartile_range),
            lower_fence: r(self.lower_fence),
            upper_fence: r(self.upper_fence),
            standard_deviation: r(self.standard_deviation),
            variance: r(self.variance),
            skewness: self.skewness.map(r),
            kurtosis: self.kurtosis.map(r),
            normality: self.normality.map(|test| NormalityTest {
                statistic: r(test.statistic),
                p_value: r(test.p_value),
                verdict: test.verdict,
            }),
            distinct_value_count: self.distinct_value_count,
            outlier_count: self.outlier_count,
        }
    }
}

/// Statistics rows for the summarized columns of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsTable {
    /// Dataset name
    pub dataset: String,
    /// One row per column, in request order
    pub rows: Vec<ContinuousStatistics>,
}

impl StatisticsTable {
    /// Copy with presentation rounding applied to every row.
    pub fn rounded(&self, places: u32) -> Self {
        Self {
            dataset: self.dataset.clone(),
            rows: self.rows.iter().map(|row| row.rounded(places)).collect(),
        }
    }

    /// Row for a column.
    pub fn get(&self, column: &str) -> Option<&ContinuousStatistics> {
        self.rows.iter().find(|row| row.column == column)
    }

    /// Number of summarized columns.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no column was summarized.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summarizer for continuous numeric columns.
#[derive(Debug, Clone, Default)]
pub struct DistributionSummarizer {
    config: SummaryConfig,
}

impl DistributionSummarizer {
    /// Creates a new summarizer with the given configuration.
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Creates a new summarizer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SummaryConfig::default())
    }

    /// Returns a reference to the summarizer configuration.
    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Summarizes the requested columns of a dataset.
    ///
    /// Stops at the first column that cannot be summarized.
    ///
    /// # Errors
    /// - [`TabSurveyorError::Configuration`] for an unknown column or an
    ///   invalid configuration
    /// - [`TabSurveyorError::TypeMismatch`] for a non-numeric column
    /// - any error of [`DistributionSummarizer::summarize_column`]
    pub fn summarize<S: AsRef<str>>(
        &self,
        name: &str,
        dataset: &dyn Dataset,
        columns: &[S],
    ) -> Result<StatisticsTable> {
        self.config
            .validate()
            .map_err(|e| TabSurveyorError::configuration(e.to_string()))?;

        let rows = columns
            .iter()
            .map(|column| {
                let column = column.as_ref();
                let index = dataset.column_index(column).ok_or_else(|| {
                    TabSurveyorError::configuration(format!(
                        "column '{}' does not exist in dataset '{}'",
                        column, name
                    ))
                })?;
                let column_type = dataset.schema()[index].column_type;
                if !column_type.is_numeric() {
                    return Err(TabSurveyorError::type_mismatch(format!(
                        "column '{}' of dataset '{}' is {}, not numeric",
                        column, name, column_type
                    )));
                }
                tracing::debug!("Summarizing column '{}' of dataset '{}'", column, name);
                self.summarize_column(column, &dataset.numeric_values(index))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StatisticsTable {
            dataset: name.to_string(),
            rows,
        })
    }

    /// Summarizes one column from its values. NaN values are ignored.
    ///
    /// # Errors
    /// - [`TabSurveyorError::Domain`] if a value is infinite or a statistic
    ///   overflows `f64`
    /// - [`TabSurveyorError::InsufficientData`] for fewer than two values or
    ///   a constant column
    pub fn summarize_column(&self, column: &str, values: &[f64]) -> Result<ContinuousStatistics> {
        let sorted = sorted_finite(values);
        if sorted.iter().any(|v| v.is_infinite()) {
            return Err(TabSurveyorError::domain(format!(
                "column '{}' contains infinite values",
                column
            )));
        }

        let count = sorted.len();
        let (Some(&minimum), Some(&maximum)) = (sorted.first(), sorted.last()) else {
            return Err(TabSurveyorError::insufficient_data(
                column,
                "no values to summarize",
                MIN_SAMPLE_SIZE,
                count,
            ));
        };
        if count < MIN_SAMPLE_SIZE {
            return Err(TabSurveyorError::insufficient_data(
                column,
                "at least two values are needed",
                MIN_SAMPLE_SIZE,
                count,
            ));
        }
        if minimum == maximum {
            return Err(TabSurveyorError::insufficient_data(
                column,
                "values are constant and cannot be standardized",
                MIN_SAMPLE_SIZE,
                1,
            ));
        }

        let mean = finite(column, "mean", stats::mean(&sorted))?;
        let variance = finite(column, "variance", stats::variance(&sorted))?;
        let first_quartile = finite(column, "first quartile", stats::quantile(&sorted, 0.25))?;
        let median = finite(column, "median", stats::quantile(&sorted, 0.5))?;
        let third_quartile = finite(column, "third quartile", stats::quantile(&sorted, 0.75))?;
        let interquartile_range = third_quartile - first_quartile;
        let spread = self.config.fence_multiplier * interquartile_range;
        let lower_fence = (first_quartile - spread).max(minimum);
        let upper_fence = (third_quartile + spread).min(maximum);

        let outlier_count = sorted
            .iter()
            .filter(|v| **v < lower_fence || **v > upper_fence)
            .count();

        let skewness = if count >= 3 {
            shape(column, "skewness", stats::skewness(&sorted))?
        } else {
            None
        };
        let kurtosis = if count >= 4 {
            shape(column, "kurtosis", stats::kurtosis(&sorted))?
        } else {
            None
        };

        let normality = ks_normality(&sorted, self.config.significance_level);
        if normality.is_none() {
            tracing::debug!("Column '{}' is too small for a normality test", column);
        }

        Ok(ContinuousStatistics {
            column: column.to_string(),
            count,
            minimum,
            maximum,
            mean,
            median,
            mode: mode(&sorted).unwrap_or(minimum),
            first_quartile,
            third_quartile,
            interquartile_range,
            lower_fence,
            upper_fence,
            standard_deviation: variance.sqrt(),
            variance,
            skewness,
            kurtosis,
            normality,
            distinct_value_count: distinct_count(&sorted),
            outlier_count,
        })
    }

    /// Summarizes every continuous column of every registered dataset.
    ///
    /// Datasets without continuous columns are skipped. A dataset whose
    /// summary fails is recorded as a failure; the others are still
    /// summarized.
    pub fn summarize_registry(&self, registry: &DatasetRegistry) -> AuditBatch<StatisticsTable> {
        let mut batch = AuditBatch::new();
        for (name, dataset) in registry.iter() {
            let columns: Vec<&str> = dataset
                .schema()
                .iter()
                .filter(|c| c.column_type == ColumnType::NumericContinuous)
                .map(|c| c.name.as_str())
                .collect();

            if columns.is_empty() {
                tracing::debug!("Dataset '{}' has no continuous columns, skipping", name);
                continue;
            }
            batch.record(name, self.summarize(name, dataset, &columns));
        }
        batch
    }
}
