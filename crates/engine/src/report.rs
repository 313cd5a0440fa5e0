use analytics::AssetSummary;
use chrono::NaiveDate;
use core_types::Window;
use serde::Serialize;
use std::collections::BTreeMap;

/// The outcome of one trailing window in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WindowOutcome {
    Summary(AssetSummary),
    /// The window could not be computed; only produced under the `report` policy.
    Unavailable { error: String },
}

impl WindowOutcome {
    pub fn summary(&self) -> Option<&AssetSummary> {
        match self {
            WindowOutcome::Summary(summary) => Some(summary),
            WindowOutcome::Unavailable { .. } => None,
        }
    }
}

/// Everything computed for one asset: what was asked for, what was resolved,
/// and the metrics of each trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReport {
    pub identifier: String,
    pub symbol: String,
    pub as_of: NaiveDate,
    pub start: NaiveDate,
    /// Number of bars retrieved for the full lookback.
    pub bars: usize,
    pub windows: BTreeMap<Window, WindowOutcome>,
}

impl AssetReport {
    /// The computed summaries keyed by window, skipping unavailable windows.
    pub fn summaries(&self) -> BTreeMap<Window, AssetSummary> {
        self.windows
            .iter()
            .filter_map(|(window, outcome)| outcome.summary().map(|s| (*window, *s)))
            .collect()
    }
}
