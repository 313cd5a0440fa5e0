use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use configuration::ApiConfig;
use core_types::PriceSeries;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{parse_chart, parse_search, ChartResponse, SearchResponse};

/// The generic, abstract interface for a remote quote service.
/// This trait is the contract the report engine uses, allowing the
/// underlying implementation (live or in-memory) to be swapped out.
#[async_trait]
pub trait QuoteClient: Send + Sync {
    /// Resolves a free-text identifier (e.g., an ISIN) to a tradable symbol.
    async fn resolve_symbol(&self, identifier: &str) -> Result<String, ApiError>;

    /// Fetches the daily bars of `symbol` from `start` through `end`.
    async fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError>;
}

/// A concrete implementation of the `QuoteClient` for Yahoo Finance.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    search_url: Url,
    chart_url: Url,
}

impl YahooClient {
    pub fn new(api_config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&api_config.user_agent)
                .map_err(|e| ApiError::InvalidRequest(format!("invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            search_url: parse_url(&api_config.search_url, "search_url")?,
            chart_url: parse_url(&api_config.chart_url, "chart_url")?,
        })
    }

    /// Sends a GET request and returns the body of a successful response.
    async fn get_text(
        &self,
        url: Url,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<String, ApiError> {
        tracing::debug!(%url, ?query, "Sending request.");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::transport(context, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::transport(context, e))?;

        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(ApiError::transport(
                context,
                format!("HTTP {} ({})", status, snippet),
            ));
        }

        Ok(text)
    }

    fn chart_url_for(&self, symbol: &str) -> Result<Url, ApiError> {
        let mut url = self.chart_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("chart_url cannot take a symbol: {}", self.chart_url)))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }
}

#[async_trait]
impl QuoteClient for YahooClient {
    async fn resolve_symbol(&self, identifier: &str) -> Result<String, ApiError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ApiError::InvalidRequest("identifier must not be empty".to_string()));
        }

        let body = self
            .get_text(
                self.search_url.clone(),
                &search_query(identifier),
                &format!("fetching symbol for `{}`", identifier),
            )
            .await?;

        let symbol = parse_search(&body, identifier)?;
        tracing::info!(identifier, %symbol, "Resolved symbol.");
        Ok(symbol)
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        if start > end {
            return Err(ApiError::InvalidRequest(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let body = self
            .get_text(
                self.chart_url_for(symbol)?,
                &chart_query(start, end)?,
                &format!("fetching historical data for `{}`", symbol),
            )
            .await?;

        let series = parse_chart(&body, symbol, start, end)?;
        tracing::info!(symbol, bars = series.len(), %start, %end, "Fetched historical data.");
        Ok(series)
    }
}

/// Query parameters of a symbol search: one exact match, no news.
pub fn search_query(identifier: &str) -> Vec<(&'static str, String)> {
    vec![
        ("q", identifier.to_string()),
        ("quotesCount", "1".to_string()),
        ("newsCount", "0".to_string()),
        ("enableFuzzyQuery", "false".to_string()),
        ("quotesQueryId", "tss_match_phrase_query".to_string()),
    ]
}

/// Query parameters of a daily chart request.
///
/// `period2` is midnight UTC after `end`, so bars dated `end` are included.
pub fn chart_query(start: NaiveDate, end: NaiveDate) -> Result<Vec<(&'static str, String)>, ApiError> {
    let after_end = end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| ApiError::InvalidRequest(format!("end date {} is out of range", end)))?;

    Ok(vec![
        ("period1", epoch_seconds(start).to_string()),
        ("period2", epoch_seconds(after_end).to_string()),
        ("interval", "1d".to_string()),
        ("events", "history".to_string()),
    ])
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn parse_url(raw: &str, name: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|e| ApiError::InvalidRequest(format!("invalid {} `{}`: {}", name, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Serves exactly one HTTP response and hands back the raw request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn client_for(base: &str) -> YahooClient {
        let config = ApiConfig {
            search_url: format!("{}/v1/finance/search", base),
            chart_url: format!("{}/v8/finance/chart", base),
            user_agent: "asset-report-test/1.0".to_string(),
            timeout_secs: 5,
        };
        YahooClient::new(&config).unwrap()
    }

    #[test]
    fn test_search_query() {
        let query = search_query("US0378331005");
        assert!(query.contains(&("q", "US0378331005".to_string())));
        assert!(query.contains(&("quotesCount", "1".to_string())));
        assert!(query.contains(&("newsCount", "0".to_string())));
        assert!(query.contains(&("enableFuzzyQuery", "false".to_string())));
    }

    #[test]
    fn test_chart_query_covers_end_day() {
        let query = chart_query(date(2023, 1, 3), date(2023, 1, 5)).unwrap();
        assert_eq!(
            query,
            vec![
                ("period1", "1672704000".to_string()),
                ("period2", "1672963200".to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ]
        );
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = ApiConfig {
            chart_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(YahooClient::new(&config), Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_resolve_symbol_sends_search_request() {
        let (base, server) = serve_once("200 OK", r#"{"quotes": [{"symbol": "AAPL"}]}"#).await;

        let symbol = client_for(&base).resolve_symbol("US0378331005").await.unwrap();
        assert_eq!(symbol, "AAPL");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /v1/finance/search?"));
        assert!(request_line.contains("q=US0378331005"));
        assert!(request_line.contains("enableFuzzyQuery=false"));
        assert!(request.to_lowercase().contains("user-agent: asset-report-test/1.0"));
    }

    #[tokio::test]
    async fn test_resolve_symbol_not_found() {
        let (base, _server) = serve_once("200 OK", r#"{"quotes": []}"#).await;

        let err = client_for(&base).resolve_symbol("XX0000000000").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let (base, _server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;

        let err = client_for(&base).resolve_symbol("US0378331005").await.unwrap_err();
        match err {
            ApiError::Transport { context, message } => {
                assert!(context.contains("US0378331005"));
                assert!(message.contains("500"));
            }
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_symbol_rejects_blank_identifier() {
        let client = client_for("http://127.0.0.1:9");
        assert!(matches!(
            client.resolve_symbol("   ").await,
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_series_requests_symbol_path() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1672756200, 1672842600],
            "indicators": {"quote": [{
                "open": [130.28, 126.89], "high": [130.9, 128.66], "low": [124.17, 125.08],
                "close": [125.07, 126.36], "volume": [112117500, 89113600]
            }]}
        }], "error": null}}"#;
        let (base, server) = serve_once("200 OK", body).await;

        let series = client_for(&base)
            .fetch_series("MC.PA", date(2023, 1, 3), date(2023, 1, 5))
            .await
            .unwrap();
        assert_eq!(series.len(), 2);

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /v8/finance/chart/MC.PA?"));
        assert!(request_line.contains("period1=1672704000"));
        assert!(request_line.contains("interval=1d"));
    }

    #[tokio::test]
    async fn test_fetch_series_empty_result() {
        let (base, _server) = serve_once("200 OK", r#"{"chart": {"result": [], "error": null}}"#).await;

        let err = client_for(&base)
            .fetch_series("AAPL", date(2023, 1, 3), date(2023, 1, 5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("`AAPL` between 2023-01-03 and 2023-01-05"));
    }

    #[tokio::test]
    async fn test_fetch_series_error_status_is_transport_error() {
        let (base, _server) = serve_once("503 Service Unavailable", r#"{"error": "busy"}"#).await;

        let err = client_for(&base)
            .fetch_series("MC.PA", date(2023, 1, 3), date(2023, 1, 5))
            .await
            .unwrap_err();
        match err {
            ApiError::Transport { context, message } => {
                assert!(context.contains("MC.PA"));
                assert!(message.contains("503"));
            }
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_series_rejects_inverted_range() {
        let client = client_for("http://127.0.0.1:9");
        assert!(matches!(
            client.fetch_series("AAPL", date(2023, 1, 5), date(2023, 1, 3)).await,
            Err(ApiError::InvalidRequest(_))
        ));
    }
}
