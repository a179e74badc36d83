// Histogram merge tests: percentile queries, merge order independence, serde forms

mod common;

use common::histogram;
use txview::config::HistogramConfig;
use txview::error::ViewError;
use txview::histogram::DurationHistogram;

const FRACTIONS: [f64; 7] = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];

#[test]
fn test_empty_histogram_returns_zero() {
    let h = DurationHistogram::default();
    assert!(h.is_empty());
    assert_eq!(h.value_at_percentile(0.5).unwrap(), 0);
    assert_eq!(h.value_at_percentile(1.0).unwrap(), 0);
}

#[test]
fn test_merge_all_of_nothing_is_empty() {
    let merged = DurationHistogram::merge_all(std::iter::empty(), HistogramConfig::default()).unwrap();
    assert!(merged.is_empty());
    assert_eq!(merged.value_at_percentile(0.99).unwrap(), 0);
}

#[test]
fn test_median_of_four_values() {
    let h = histogram(&[10, 20, 30, 40]);
    assert_eq!(h.value_at_percentile(0.5).unwrap(), 20);
    assert_eq!(h.value_at_percentile(0.0).unwrap(), 10);
    assert_eq!(h.value_at_percentile(0.75).unwrap(), 30);
    assert_eq!(h.value_at_percentile(1.0).unwrap(), 40);
}

#[test]
fn test_self_merge_keeps_percentiles() {
    let h = histogram(&[10, 20, 30, 40]);
    let merged = DurationHistogram::merge_all([&h, &h], HistogramConfig::default()).unwrap();
    assert_eq!(merged.len(), 8);
    for p in FRACTIONS {
        assert_eq!(
            merged.value_at_percentile(p).unwrap(),
            h.value_at_percentile(p).unwrap(),
            "percentile {p}"
        );
    }
}

fn assert_order_independent(config: HistogramConfig) {
    let h1 = DurationHistogram::from_values(&[5, 15, 25], config).unwrap();
    let h2 = DurationHistogram::from_values(&[100, 200], config).unwrap();
    let h3 = DurationHistogram::from_values(&[1, 2, 3, 4000], config).unwrap();

    let a = DurationHistogram::merge_all([&h1, &h2, &h3], config).unwrap();
    let b = DurationHistogram::merge_all([&h3, &h1, &h2], config).unwrap();
    let c = DurationHistogram::merge_all([&h2, &h3, &h1], config).unwrap();

    // pairwise first, then fold the pair into the third
    let mut pair = h2.clone();
    pair.merge(&h3).unwrap();
    let d = DurationHistogram::merge_all([&h1, &pair], config).unwrap();

    for p in FRACTIONS {
        let expected = a.value_at_percentile(p).unwrap();
        assert_eq!(b.value_at_percentile(p).unwrap(), expected, "percentile {p}");
        assert_eq!(c.value_at_percentile(p).unwrap(), expected, "percentile {p}");
        assert_eq!(d.value_at_percentile(p).unwrap(), expected, "percentile {p}");
    }
    assert_eq!(a.len(), 9);
    assert_eq!(d.len(), 9);
}

#[test]
fn test_merge_is_order_independent_for_raw_values() {
    assert_order_independent(HistogramConfig::default());
}

#[test]
fn test_merge_is_order_independent_for_hdr_buckets() {
    assert_order_independent(HistogramConfig {
        significant_digits: 3,
        raw_value_limit: 4,
    });
}

#[test]
fn test_large_histogram_uses_buckets_within_resolution() {
    let values: Vec<u64> = (1..=2000).collect();
    let h = histogram(&values);
    assert!(!h.is_exact());
    let median = h.value_at_percentile(0.5).unwrap();
    assert!((990..=1010).contains(&median), "median {median}");
}

#[test]
fn test_percentile_outside_unit_range_is_rejected() {
    let h = histogram(&[1, 2, 3]);
    assert_eq!(
        h.value_at_percentile(1.5).unwrap_err(),
        ViewError::InvalidPercentile(1.5)
    );
    assert!(matches!(
        h.value_at_percentile(-0.1),
        Err(ViewError::InvalidPercentile(_))
    ));
    assert!(matches!(
        h.value_at_percentile(f64::NAN),
        Err(ViewError::InvalidPercentile(_))
    ));
}

#[test]
fn test_raw_histogram_deserializes_from_json() {
    let h: DurationHistogram =
        serde_json::from_str(r#"{"kind":"raw","values":[40,10,30,20]}"#).unwrap();
    assert_eq!(h.len(), 4);
    assert_eq!(h.value_at_percentile(0.5).unwrap(), 20);
}

#[test]
fn test_hdr_histogram_roundtrips_through_encoded_form() {
    let values: Vec<u64> = (1..=2000).collect();
    let h = histogram(&values);
    let json = serde_json::to_string(&h).unwrap();
    assert!(json.contains("\"encoded\""));
    let back: DurationHistogram = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 2000);
    for p in FRACTIONS {
        assert_eq!(
            back.value_at_percentile(p).unwrap(),
            h.value_at_percentile(p).unwrap()
        );
    }
}
