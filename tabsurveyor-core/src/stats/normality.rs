//! One-sample Kolmogorov-Smirnov normality test.
//!
//! The column is standardized with its own mean and standard deviation and
//! compared against the standard normal CDF by
//! [`u_analytics::distribution::ks_test_normal`], which also supplies the
//! p-value from the Kolmogorov distribution. This module only classifies the
//! result at a significance level.

use serde::{Deserialize, Serialize};

/// Smallest sample the Kolmogorov-Smirnov test accepts.
pub const MIN_NORMALITY_SAMPLE: usize = 5;

/// Outcome of a normality test at a given significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalityVerdict {
    /// The normal hypothesis is not rejected
    #[serde(rename = "normal")]
    Normal,
    /// The p-value fell below the significance level
    #[serde(rename = "non-normal")]
    NonNormal,
}

impl std::fmt::Display for NormalityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalityVerdict::Normal => write!(f, "normal"),
            NormalityVerdict::NonNormal => write!(f, "non-normal"),
        }
    }
}

/// Kolmogorov-Smirnov test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityTest {
    /// Supremum distance between empirical and normal CDF
    pub statistic: f64,
    /// Probability of a distance at least this large under normality
    pub p_value: f64,
    /// Classification at the configured significance level
    pub verdict: NormalityVerdict,
}

impl NormalityTest {
    /// Classifies a test outcome; `p_value < significance` rejects normality.
    pub fn classify(statistic: f64, p_value: f64, significance: f64) -> Self {
        let verdict = if p_value < significance {
            NormalityVerdict::NonNormal
        } else {
            NormalityVerdict::Normal
        };
        Self {
            statistic,
            p_value,
            verdict,
        }
    }
}

/// Tests finite `values` for normality.
///
/// Returns `None` when the test is not computable: fewer than
/// [`MIN_NORMALITY_SAMPLE`] values or zero variance.
pub fn ks_normality(values: &[f64], significance: f64) -> Option<NormalityTest> {
    if values.len() < MIN_NORMALITY_SAMPLE {
        return None;
    }
    u_analytics::distribution::ks_test_normal(values)
        .map(|(statistic, p_value)| NormalityTest::classify(statistic, p_value, significance))
}
