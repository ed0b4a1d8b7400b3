use crate::config::Settings;
use crate::market::provider::MarketDataProvider;
use crate::market::types::Quote;
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// The chart endpoint rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Yahoo-style chart API client. One request per quote, nothing cached.
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self { http, base_url })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{symbol}",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooChartClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_latest_close(&self, symbol: &str) -> Result<Quote> {
        let res = self
            .http
            .get(self.chart_url(symbol))
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {text}");
        }

        let body = serde_json::from_str::<ChartResponse>(&text)
            .with_context(|| format!("market data response is not valid JSON: {text}"))?;
        latest_close(symbol, body)
    }
}

fn latest_close(symbol: &str, body: ChartResponse) -> Result<Quote> {
    if let Some(err) = body.chart.error {
        anyhow::bail!(
            "market data provider error for {symbol}: {} - {}",
            err.code,
            err.description
        );
    }

    let result = body
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .with_context(|| format!("empty chart result for {symbol}"))?;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .with_context(|| format!("missing quote series for {symbol}"))?;

    // Latest bar with a close value; trailing bars can be null intraday.
    for (idx, close) in quote.close.iter().enumerate().rev() {
        if let Some(close) = close {
            let ts = result
                .timestamp
                .get(idx)
                .copied()
                .context("timestamp/close series length mismatch")?;
            let as_of = Utc
                .timestamp_opt(ts, 0)
                .single()
                .context("invalid bar timestamp")?;
            return Ok(Quote {
                symbol: symbol.to_string(),
                close: *close,
                as_of,
            });
        }
    }

    anyhow::bail!("no close values returned for {symbol}")
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart_body(timestamps: Vec<i64>, closes: Vec<Option<f64>>) -> ChartResponse {
        let v = json!({
            "chart": {
                "result": [
                    {
                        "timestamp": timestamps,
                        "indicators": { "quote": [ { "close": closes } ] }
                    }
                ],
                "error": null
            }
        });
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn picks_latest_non_null_close() {
        let body = chart_body(
            vec![1_700_000_000, 1_700_086_400, 1_700_172_800],
            vec![Some(14.2), Some(15.1), None],
        );
        let quote = latest_close("^VIX", body).unwrap();
        assert_eq!(quote.close, 15.1);
        assert_eq!(quote.as_of.timestamp(), 1_700_086_400);
        assert_eq!(quote.symbol, "^VIX");
    }

    #[test]
    fn rejects_all_null_series() {
        let body = chart_body(vec![1_700_000_000], vec![None]);
        assert!(latest_close("^VIX", body).is_err());
    }

    #[test]
    fn surfaces_provider_error_payload() {
        let v = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found" }
            }
        });
        let body: ChartResponse = serde_json::from_value(v).unwrap();
        let err = latest_close("^GSPC", body).unwrap_err();
        assert!(err.to_string().contains("No data found"));
    }

    #[test]
    fn rejects_empty_result_array() {
        let v = json!({ "chart": { "result": [], "error": null } });
        let body: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(latest_close("^GSPC", body).is_err());
    }
}
