use crate::domain::snapshot::{FetchIssue, MarketSnapshot};
use crate::market::types::Quote;
use crate::market::{SP500_SYMBOL, VIX_SYMBOL};
use anyhow::Result;
use chrono::Utc;

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Single best-effort attempt. No retry, no backoff.
    async fn fetch_latest_close(&self, symbol: &str) -> Result<Quote>;
}

/// Queries both symbols independently and folds the results into one
/// snapshot. A per-symbol failure records an issue and leaves the value
/// absent; the other symbol is still attempted, so this never fails as a
/// whole.
pub async fn fetch_snapshot(provider: &dyn MarketDataProvider) -> MarketSnapshot {
    let generated_at = Utc::now();
    let mut issues = Vec::new();

    let vix = fetch_one(provider, VIX_SYMBOL, &mut issues).await;
    let sp500 = fetch_one(provider, SP500_SYMBOL, &mut issues).await;

    MarketSnapshot {
        generated_at,
        vix,
        sp500,
        issues,
    }
}

async fn fetch_one(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    issues: &mut Vec<FetchIssue>,
) -> Option<f64> {
    match provider.fetch_latest_close(symbol).await {
        Ok(quote) => Some(quote.close),
        Err(err) => {
            tracing::warn!(symbol, provider = provider.provider_name(), error = %err, "symbol fetch failed");
            issues.push(FetchIssue {
                symbol: symbol.to_string(),
                message: format!("Error fetching data for {symbol}: {err:#}"),
            });
            None
        }
    }
}
