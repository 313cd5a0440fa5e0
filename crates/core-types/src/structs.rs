use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A chronologically ordered sequence of daily bars with no duplicate dates.
///
/// The ordering invariant is established on construction and the series is
/// immutable afterwards, so window slices are always contiguous suffixes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series from bars in any order.
    ///
    /// Bars are sorted by date; when a date repeats, the first bar for it wins.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        // Stable, so "first wins" refers to the caller's order.
        bars.sort_by_key(|bar| bar.date);
        let before = bars.len();
        bars.dedup_by_key(|bar| bar.date);
        if bars.len() != before {
            tracing::warn!(
                dropped = before - bars.len(),
                "Dropped bars with duplicate dates."
            );
        }
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Returns the bars dated strictly after `cutoff`.
    pub fn since(&self, cutoff: NaiveDate) -> &[PriceBar] {
        let start = self.bars.partition_point(|bar| bar.date <= cutoff);
        &self.bars[start..]
    }
}

impl From<Vec<PriceBar>> for PriceSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}
