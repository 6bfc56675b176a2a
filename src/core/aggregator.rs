use std::collections::BTreeMap;

use super::metrics::{FileMetric, LanguageSummary};

/// Group metrics by language tag and sum their counters.
pub fn aggregate(metrics: &[FileMetric]) -> BTreeMap<String, LanguageSummary> {
    let mut summaries: BTreeMap<String, LanguageSummary> = BTreeMap::new();
    for metric in metrics {
        summaries
            .entry(metric.language.clone())
            .or_insert_with(|| LanguageSummary::new(&metric.language))
            .add(metric);
    }
    summaries
}

/// Combine two per-language maps computed over disjoint file sets.
pub fn merge_summaries(
    mut left: BTreeMap<String, LanguageSummary>,
    right: &BTreeMap<String, LanguageSummary>,
) -> BTreeMap<String, LanguageSummary> {
    for (language, summary) in right {
        left.entry(language.clone())
            .or_insert_with(|| LanguageSummary::new(language))
            .merge(summary);
    }
    left
}
