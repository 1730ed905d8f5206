use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// One extracted method, the unit of output.
#[derive(Debug, Clone, Serialize)]
pub struct TestDataMethod {
    pub repo: String,
    pub feature: String,
    pub class_name: String,
    pub method_name: String,
    /// Annotation attributes in source order, raw value text.
    pub annotation_attrs: Vec<(String, String)>,
    pub path: String,
}

/// Process-wide index of extracted methods grouped by feature.
///
/// Append is the only mutator and runs under the entry's shard lock, so a
/// batch of records from one file lands intact no matter how many workers
/// write at once. Read once via [`FeatureIndex::snapshot`] after all
/// dispatched work has completed.
#[derive(Debug, Default)]
pub struct FeatureIndex {
    by_feature: DashMap<String, Vec<TestDataMethod>>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, feature: &str, records: Vec<TestDataMethod>) {
        if records.is_empty() {
            return;
        }
        self.by_feature
            .entry(feature.to_string())
            .or_default()
            .extend(records);
    }

    pub fn snapshot(&self) -> BTreeMap<String, Vec<TestDataMethod>> {
        self.by_feature
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn feature_count(&self) -> usize {
        self.by_feature.len()
    }

    pub fn method_count(&self) -> usize {
        self.by_feature.iter().map(|entry| entry.value().len()).sum()
    }
}
