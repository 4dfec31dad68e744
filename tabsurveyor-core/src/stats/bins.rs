//! Histogram bin-count heuristic (Sturges' rule, 1 + 3.3 log10 n).

use crate::models::ScalarValue;
use crate::{Result, TabSurveyorError};

/// Number of histogram bins suggested for a sample of `n` observations.
///
/// Rounds half away from zero. Non-decreasing in `n`.
///
/// # Errors
/// Returns [`TabSurveyorError::Domain`] if `n` is zero.
pub fn bin_count(n: usize) -> Result<u32> {
    if n < 1 {
        return Err(TabSurveyorError::domain(
            "bin count requires a sample size of at least 1",
        ));
    }
    let bins = 1.0 + 3.3 * (n as f64).log10();
    Ok(bins.round() as u32)
}

/// Bin count for the non-null values of a column.
pub fn bin_count_for<'a>(values: impl IntoIterator<Item = &'a ScalarValue>) -> Result<u32> {
    let n = values.into_iter().filter(|v| !v.is_null()).count();
    bin_count(n)
}
