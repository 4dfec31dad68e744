//! Distribution summaries for continuous numeric columns.
//!
//! Per column: location (min, max, mean, median, mode), spread (quartiles,
//! IQR, Tukey fences, sample variance), shape (skewness, excess kurtosis),
//! a Kolmogorov-Smirnov normality verdict and the distinct value count.
//! Moments and quantiles are computed by `u_numflow`, the normality test by
//! `u_analytics`.
//!
//! # Example
//! ```rust,ignore
//! use tabsurveyor_core::stats::{DistributionSummarizer, SummaryConfig};
//!
//! let summarizer = DistributionSummarizer::new(SummaryConfig::default());
//! let table = summarizer.summarize("items", dataset, &["price", "freight_value"])?;
//! for row in table.rounded(3).rows {
//!     if let Some(test) = row.normality {
//!         println!("{}: median {} ({})", row.column, row.median, test.verdict);
//!     }
//! }
//! ```

pub mod bins;
mod config;
pub mod descriptive;
pub mod normality;
mod summary;

// Re-export public API
pub use bins::{bin_count, bin_count_for};
pub use config::{MAX_DECIMAL_PLACES, SummaryConfig};
pub use normality::{MIN_NORMALITY_SAMPLE, NormalityTest, NormalityVerdict};
pub use summary::{ContinuousStatistics, DistributionSummarizer, MIN_SAMPLE_SIZE, StatisticsTable};
