//! Distribution summary integration tests.
//!
//! This test suite covers:
//! - Quartiles, fences and outliers of a skewed column
//! - Normality classification at configurable significance
//! - Failure modes for constant, short and non-numeric columns
//! - Registry-wide summaries with per-dataset isolation
//! - Bin counts

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use serde_json::json;
use tabsurveyor_core::stats::{NormalityVerdict, bin_count_for};
use tabsurveyor_core::{
    Dataset, DatasetRegistry, DistributionSummarizer, SummaryConfig, TabSurveyorError,
    bin_count, dataset_from_json, load_registry,
};

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn products() -> DatasetRegistry {
    load_registry(&json!({
        "items": [
            {"product_id": "p1", "price": 1.5, "weight_g": 100},
            {"product_id": "p2", "price": 2.0, "weight_g": 250},
            {"product_id": "p3", "price": 3.0, "weight_g": null},
            {"product_id": "p4", "price": 4.0, "weight_g": 300},
            {"product_id": "p5", "price": 5.0, "weight_g": 300},
            {"product_id": "p6", "price": 100.0, "weight_g": 5000}
        ],
        "payments": [
            {"payment_value": 10.0},
            {"payment_value": 10.0},
            {"payment_value": 10.0}
        ],
        "reviews": [
            {"review_score": 5, "comment": "ok"}
        ]
    }))
    .expect("product fixture loads")
}

#[test]
fn test_integration_skewed_column_summary() {
    let registry = products();
    let items = registry.get("items").unwrap();

    let table = DistributionSummarizer::with_defaults()
        .summarize("items", items, &["price"])
        .unwrap();
    let price = table.get("price").unwrap();

    assert_eq!(price.count, 6);
    approx(price.minimum, 1.5);
    approx(price.maximum, 100.0);
    approx(price.median, 3.5);
    approx(price.first_quartile, 2.25);
    approx(price.third_quartile, 4.75);
    approx(price.interquartile_range, 2.5);
    approx(price.lower_fence, 1.5);
    approx(price.upper_fence, 8.5);
    assert!(price.lower_fence <= price.first_quartile);
    assert!(price.third_quartile <= price.upper_fence);
    assert_eq!(price.outlier_count, 1);
    assert!(price.skewness.unwrap() > 2.0);
    assert!(price.kurtosis.unwrap() > 0.0);
    assert!((0.0..=1.0).contains(&price.normality.unwrap().p_value));
}

#[test]
fn test_integration_discrete_column_with_nulls() {
    let registry = products();
    let items = registry.get("items").unwrap();

    let table = DistributionSummarizer::with_defaults()
        .summarize("items", items, &["weight_g"])
        .unwrap();
    let weight = &table.rows[0];

    assert_eq!(weight.count, 5);
    assert_eq!(weight.mode, 300.0);
    assert_eq!(weight.distinct_value_count, 4);
    approx(weight.median, 300.0);
}

#[test]
fn test_integration_constant_column_insufficient() {
    let values = vec![json!({"freight_value": 7.5}); 30];
    let table = dataset_from_json("shipping", &serde_json::Value::Array(values)).unwrap();

    let result =
        DistributionSummarizer::with_defaults().summarize("shipping", &table, &["freight_value"]);
    assert!(matches!(
        result,
        Err(TabSurveyorError::InsufficientData { .. })
    ));
}

#[test]
fn test_integration_non_numeric_column_type_mismatch() {
    let registry = products();
    let result = DistributionSummarizer::with_defaults().summarize(
        "items",
        registry.get("items").unwrap(),
        &["product_id"],
    );
    assert!(matches!(result, Err(TabSurveyorError::TypeMismatch { .. })));
}

#[test]
fn test_integration_summary_is_fail_fast() {
    let registry = products();
    let result = DistributionSummarizer::with_defaults().summarize(
        "items",
        registry.get("items").unwrap(),
        &["price", "dimensions", "weight_g"],
    );
    assert!(matches!(
        result,
        Err(TabSurveyorError::Configuration { .. })
    ));
}

#[test]
fn test_integration_registry_summary_isolates_failures() {
    let batch = DistributionSummarizer::with_defaults().summarize_registry(&products());

    // reviews has only a discrete column, payments is constant
    assert_eq!(batch.reports.len(), 1);
    assert_eq!(batch.reports[0].dataset, "items");
    assert_eq!(batch.reports[0].len(), 1);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].dataset, "payments");
    assert!(!batch.failures[0].configuration);
}

#[test]
fn test_integration_significance_level_changes_verdict() {
    let values: Vec<f64> = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 100.0];

    let strict = DistributionSummarizer::new(SummaryConfig::new().with_significance_level(0.001))
        .summarize_column("x", &values)
        .unwrap();
    let default = DistributionSummarizer::with_defaults()
        .summarize_column("x", &values)
        .unwrap();

    let strict = strict.normality.unwrap();
    let default = default.normality.unwrap();
    assert_eq!(strict.p_value, default.p_value);
    assert_eq!(default.verdict, NormalityVerdict::NonNormal);
    // p is between 0.004 and 0.009
    assert_eq!(strict.verdict, NormalityVerdict::Normal);
}

#[test]
fn test_integration_rounding_for_presentation() {
    let values = [1.0, 2.0, 2.0, 3.0, 7.0, 11.5, 13.25];
    let stats = DistributionSummarizer::with_defaults()
        .summarize_column("x", &values)
        .unwrap();
    let shown = stats.rounded(3);

    for value in [
        shown.mean,
        shown.standard_deviation,
        shown.variance,
        shown.skewness.unwrap(),
        shown.kurtosis.unwrap(),
        shown.normality.unwrap().p_value,
    ] {
        approx((value * 1000.0).round() / 1000.0, value);
    }
    assert!((shown.mean - stats.mean).abs() <= 0.0005);
}

#[test]
fn test_integration_bin_counts() {
    assert_eq!(bin_count(1000).unwrap(), 11);
    assert!(matches!(
        bin_count(0),
        Err(TabSurveyorError::Domain { .. })
    ));

    let registry = products();
    let items = registry.get("items").unwrap();
    let weight = items.column_index("weight_g").unwrap();
    // 5 non-null weights: 1 + 3.3 * log10(5) = 3.31
    assert_eq!(bin_count_for(items.column_values(weight)).unwrap(), 3);
}
