//! Sample preparation and the order statistics `u_numflow` does not cover.
//!
//! Moments and quantiles come from [`u_numflow::stats`]. Functions taking
//! `sorted` expect ascending order as produced by [`sorted_finite`].

/// Returns the non-NaN values of `values` in ascending order.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Most frequent value of a sorted sample; ties go to the smallest value.
pub fn mode(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut index = 0;
    while index < sorted.len() {
        let value = sorted[index];
        let run = sorted[index..].iter().take_while(|v| **v == value).count();
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        index += run;
    }
    best.map(|(value, _)| value)
}

/// Number of unique values in a sorted sample. `-0.0` and `0.0` are one value.
pub fn distinct_count(sorted: &[f64]) -> usize {
    let mut count = 0;
    let mut previous: Option<f64> = None;
    for &value in sorted {
        if previous != Some(value) {
            count += 1;
            previous = Some(value);
        }
    }
    count
}
