use appdoc::core::{aggregate, coverage_percentage, merge_summaries, FileMetric, LanguageSummary};
use std::path::PathBuf;

fn metric(path: &str, language: &str, lines: usize, counts: [usize; 4]) -> FileMetric {
    let mut metric = FileMetric::new(PathBuf::from(path), language.to_string(), lines);
    metric.functions = counts[0];
    metric.documented_functions = counts[1];
    metric.classes = counts[2];
    metric.documented_classes = counts[3];
    metric
}

fn sample() -> Vec<FileMetric> {
    vec![
        metric("/p/a.py", "python", 10, [2, 1, 1, 1]),
        metric("/p/b.py", "python", 5, [1, 0, 0, 0]),
        metric("/p/c.js", "javascript", 7, [3, 3, 0, 0]),
        metric("/p/d.txt", "unknown", 4, [0, 0, 0, 0]),
    ]
}

#[test]
fn aggregate_groups_and_sums_by_language() {
    let summaries = aggregate(&sample());

    let languages: Vec<_> = summaries.keys().map(String::as_str).collect();
    assert_eq!(languages, vec!["javascript", "python", "unknown"]);

    let python = &summaries["python"];
    assert_eq!(python.language, "python");
    assert_eq!(python.files, 2);
    assert_eq!(python.lines, 15);
    assert_eq!(python.functions, 3);
    assert_eq!(python.documented_functions, 1);
    assert_eq!(python.classes, 1);
    assert_eq!(python.documented_classes, 1);
    assert!((python.coverage() - 50.0).abs() < 1e-9);

    assert_eq!(summaries["unknown"].coverage(), 0.0);
    assert_eq!(summaries["javascript"].coverage(), 100.0);
}

#[test]
fn empty_input_gives_no_summaries() {
    assert!(aggregate(&[]).is_empty());
}

#[test]
fn aggregation_is_associative_over_partitions() {
    let metrics = sample();
    let whole = aggregate(&metrics);

    for split in 0..=metrics.len() {
        let (left, right) = metrics.split_at(split);
        let merged = merge_summaries(aggregate(left), &aggregate(right));
        assert_eq!(merged, whole, "split at {split}");
    }
}

#[test]
fn summary_merge_adds_counters() {
    let mut left = LanguageSummary::new("rust");
    left.add(&metric("/p/a.rs", "rust", 3, [1, 1, 0, 0]));
    let mut right = LanguageSummary::new("rust");
    right.add(&metric("/p/b.rs", "rust", 4, [1, 0, 2, 1]));

    left.merge(&right);
    assert_eq!(left.files, 2);
    assert_eq!(left.lines, 7);
    assert_eq!(left.functions, 2);
    assert_eq!(left.classes, 2);
    assert!((left.coverage() - 50.0).abs() < 1e-9);
}

#[test]
fn coverage_formula_handles_zero_denominator() {
    assert_eq!(coverage_percentage(0, 0, 0, 0), 0.0);
    assert_eq!(coverage_percentage(1, 1, 1, 1), 100.0);
    assert!((coverage_percentage(3, 1, 0, 0) - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn serialized_summary_carries_computed_coverage() {
    let summaries = aggregate(&sample());
    let json = serde_json::to_value(&summaries["python"]).unwrap();

    assert_eq!(json["documentedFunctions"], 1);
    assert_eq!(json["coveragePercentage"], 50.0);
    assert_eq!(json["files"], 2);
}
