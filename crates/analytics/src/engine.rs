use crate::error::AnalyticsError;
use crate::metrics;
use crate::report::AssetSummary;
use chrono::NaiveDate;
use core_types::{PriceBar, PriceSeries, Window};

/// A stateless calculator for deriving risk/return metrics from price bars.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes volatility, max drawdown and performance over one slice of bars.
    ///
    /// # Arguments
    ///
    /// * `bars` - Chronologically ordered bars; volatility needs at least three.
    pub fn summarize(&self, bars: &[PriceBar]) -> Result<AssetSummary, AnalyticsError> {
        Ok(AssetSummary {
            volatility: metrics::volatility(bars)?,
            max_drawdown: metrics::max_drawdown(bars)?,
            performance: metrics::performance(bars)?,
        })
    }

    /// Summarizes every trailing window of `series`, anchored on `today`.
    ///
    /// Each window is computed independently; one window's failure does not
    /// affect the others. Results are returned in report order.
    pub fn summarize_windows(
        &self,
        series: &PriceSeries,
        today: NaiveDate,
    ) -> Vec<(Window, Result<AssetSummary, AnalyticsError>)> {
        Window::ALL
            .into_iter()
            .map(|window| (window, self.summarize_window(series, window, today)))
            .collect()
    }

    /// Summarizes the bars of `series` dated strictly after the window's cutoff.
    pub fn summarize_window(
        &self,
        series: &PriceSeries,
        window: Window,
        today: NaiveDate,
    ) -> Result<AssetSummary, AnalyticsError> {
        let cutoff = window.cutoff(today)?;
        let bars = series.since(cutoff);
        tracing::debug!(%window, %cutoff, bars = bars.len(), "Summarizing window.");

        self.summarize(bars)
    }
}
