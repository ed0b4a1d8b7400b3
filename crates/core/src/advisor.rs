use crate::classifier::CrashClassifier;
use crate::domain::prediction::{recommend, PredictionLabel, StrategyRecommendation};
use crate::domain::snapshot::{MarketReading, MarketSnapshot};
use crate::llm::{prompt, CompletionClient};
use crate::market::provider::{fetch_snapshot, MarketDataProvider};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Outcome of one render cycle. Prediction and strategy are absent whenever
/// the snapshot is incomplete; classification is skipped, never guessed.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub snapshot: MarketSnapshot,
    pub prediction: Option<PredictionLabel>,
    pub strategy: Option<StrategyRecommendation>,
}

/// Wires fetcher, classifier and narrative generator together. Everything in
/// here is read-only after construction and safe to share across requests.
pub struct Advisor {
    market: Arc<dyn MarketDataProvider>,
    classifier: Arc<CrashClassifier>,
    llm: Arc<dyn CompletionClient>,
}

impl Advisor {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        classifier: Arc<CrashClassifier>,
        llm: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            market,
            classifier,
            llm,
        }
    }

    /// Fetcher → classifier → selector, one pass.
    pub async fn assess(&self) -> Assessment {
        let snapshot = fetch_snapshot(self.market.as_ref()).await;
        let prediction = snapshot.reading().map(|r| self.classifier.predict(&r));
        let strategy = prediction.map(recommend);

        if let Some(label) = prediction {
            tracing::info!(%label, vix = ?snapshot.vix, sp500 = ?snapshot.sp500, "render cycle classified");
        } else {
            tracing::warn!(issues = snapshot.issues.len(), "render cycle skipped classification");
        }

        Assessment {
            snapshot,
            prediction,
            strategy,
        }
    }

    /// Re-invokes the fetcher without classifying; the manual refresh action.
    pub async fn refresh(&self) -> MarketSnapshot {
        fetch_snapshot(self.market.as_ref()).await
    }

    pub async fn narrate_snapshot(
        &self,
        generated_at: DateTime<Utc>,
        reading: &MarketReading,
    ) -> Result<String> {
        self.llm
            .complete(prompt::snapshot_narrative(generated_at, reading))
            .await
    }

    pub async fn explain_strategy(
        &self,
        strategy: StrategyRecommendation,
        question: &str,
    ) -> Result<String> {
        self.llm
            .complete(prompt::strategy_explanation(strategy, question))
            .await
    }
}
