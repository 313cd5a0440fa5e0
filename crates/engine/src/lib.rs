use crate::error::EngineError;
use analytics::AnalyticsEngine;
use api_client::QuoteClient;
use chrono::{Days, NaiveDate, Utc};
use configuration::{ReportConfig, WindowFailurePolicy};
use core_types::Window;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod error;
pub mod report;

pub use report::{AssetReport, WindowOutcome};

/// The orchestrator behind a report: resolves an identifier, fetches the full
/// lookback once and summarizes every trailing window of it.
pub struct ReportEngine {
    client: Arc<dyn QuoteClient>,
    analytics: AnalyticsEngine,
    config: ReportConfig,
}

impl ReportEngine {
    pub fn new(client: Arc<dyn QuoteClient>, config: ReportConfig) -> Self {
        Self {
            client,
            analytics: AnalyticsEngine::new(),
            config,
        }
    }

    /// Builds the report for `identifier` as of today (UTC).
    pub async fn summarize_asset(&self, identifier: &str) -> Result<AssetReport, EngineError> {
        self.summarize_asset_as_of(identifier, Utc::now().date_naive())
            .await
    }

    /// Builds the report for `identifier` with every window anchored on `today`.
    pub async fn summarize_asset_as_of(
        &self,
        identifier: &str,
        today: NaiveDate,
    ) -> Result<AssetReport, EngineError> {
        let symbol = self.client.resolve_symbol(identifier).await?;

        let start = today
            .checked_sub_days(Days::new(Window::MAX_LOOKBACK_DAYS))
            .ok_or_else(|| EngineError::InvalidInput(format!("as-of date {} is out of range", today)))?;
        let series = self.client.fetch_series(&symbol, start, today).await?;

        let mut windows = BTreeMap::new();
        for (window, result) in self.analytics.summarize_windows(&series, today) {
            let outcome = match (result, self.config.on_window_error) {
                (Ok(summary), _) => WindowOutcome::Summary(summary),
                (Err(source), WindowFailurePolicy::Abort) => {
                    return Err(EngineError::Window { window, source });
                }
                (Err(source), WindowFailurePolicy::Report) => {
                    tracing::warn!(identifier, %window, error = %source, "Window unavailable.");
                    WindowOutcome::Unavailable {
                        error: source.to_string(),
                    }
                }
            };
            windows.insert(window, outcome);
        }

        tracing::info!(identifier, %symbol, bars = series.len(), "Report assembled.");

        Ok(AssetReport {
            identifier: identifier.to_string(),
            symbol,
            as_of: today,
            start,
            bars: series.len(),
            windows,
        })
    }
}
