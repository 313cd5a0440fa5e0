use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use core_types::{PriceBar, PriceSeries};
use serde::Deserialize;

/// The body of `GET /v1/finance/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub quotes: Vec<SearchQuote>,
}

/// One match of a symbol search. Only `symbol` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuote {
    pub symbol: String,
    pub shortname: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
}

/// The body of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    /// `null` when the service reports an error instead of data.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Absent when the range holds no trading days.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    pub quote: Vec<QuoteIndicator>,
}

/// Index-aligned OHLCV columns; individual entries may be `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

/// Decodes a search body and returns the first matching symbol.
pub fn parse_search(body: &str, identifier: &str) -> Result<String, ApiError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("symbol search: {}", e)))?;

    response
        .quotes
        .into_iter()
        .next()
        .map(|quote| quote.symbol)
        .ok_or_else(|| ApiError::NotFound(identifier.to_string()))
}

/// Decodes a chart body into a price series.
///
/// `symbol`, `start` and `end` only serve as error context.
pub fn parse_chart(
    body: &str,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, ApiError> {
    let no_data = || ApiError::NoData {
        symbol: symbol.to_string(),
        start,
        end,
    };

    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("chart for `{}`: {}", symbol, e)))?;

    if let Some(error) = &response.chart.error {
        tracing::debug!(code = %error.code, description = %error.description, "Chart endpoint reported an error.");
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(no_data)?;

    let bars = result.into_bars(symbol)?;
    if bars.is_empty() {
        return Err(no_data());
    }

    Ok(PriceSeries::new(bars))
}

impl ChartResult {
    /// Zips the timestamp and quote columns into bars.
    ///
    /// Rows missing any of open/high/low/close are skipped; a missing volume is zero.
    pub fn into_bars(self, symbol: &str) -> Result<Vec<PriceBar>, ApiError> {
        let rows = self.timestamp.len();
        if rows == 0 {
            return Ok(Vec::new());
        }

        let quote = self.indicators.quote.into_iter().next().ok_or_else(|| {
            ApiError::MalformedResponse(format!("chart for `{}` has no quote indicator", symbol))
        })?;

        for (name, len) in [
            ("open", quote.open.len()),
            ("high", quote.high.len()),
            ("low", quote.low.len()),
            ("close", quote.close.len()),
            ("volume", quote.volume.len()),
        ] {
            if len != rows {
                return Err(ApiError::MalformedResponse(format!(
                    "chart for `{}`: `{}` has {} entries for {} timestamps",
                    symbol, name, len, rows
                )));
            }
        }

        let mut bars = Vec::with_capacity(rows);
        let mut skipped = 0usize;
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let date = DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    ApiError::MalformedResponse(format!("invalid timestamp {} for `{}`", ts, symbol))
                })?;

            match (quote.open[i], quote.high[i], quote.low[i], quote.close[i]) {
                (Some(open), Some(high), Some(low), Some(close)) => bars.push(PriceBar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume[i].unwrap_or(0),
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(symbol, skipped, "Skipped chart rows with missing prices.");
        }

        Ok(bars)
    }
}
