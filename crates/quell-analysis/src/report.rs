//! Flat metric-name → value report, the terminal output of an analysis run.

use quell_core::FrequencyBand;
use serde::Serialize;
use std::collections::BTreeMap;

/// Immutable-after-construction mapping from metric name to numeric value.
///
/// Serializes to a flat JSON object. Band-scoped metrics get a
/// `"{low}-{high}Hz"` key suffix via [`MetricsReport::insert_band`].
/// Non-finite values (e.g. the +∞ SNR limit) serialize as JSON `null`,
/// which is serde_json's representation for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsReport {
    #[serde(flatten)]
    metrics: BTreeMap<String, f64>,
}

impl MetricsReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric value.
    pub fn insert(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), value);
    }

    /// Record a band-scoped metric value under `"{name}_{low}-{high}Hz"`.
    pub fn insert_band(&mut self, name: &str, band: &FrequencyBand, value: f64) {
        self.metrics.insert(format!("{name}_{}", band.label()), value);
    }

    /// Look up a metric by exact key.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Iterate over (key, value) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of recorded metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// True when no metrics have been recorded.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Merge another report into this one, overwriting duplicate keys.
    pub fn extend(&mut self, other: MetricsReport) {
        self.metrics.extend(other.metrics);
    }
}
