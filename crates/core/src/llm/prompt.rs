use crate::domain::prediction::StrategyRecommendation;
use crate::domain::snapshot::MarketReading;
use crate::llm::CompletionRequest;
use chrono::{DateTime, Utc};

// Output budgets are fixed per call shape, independent of prompt content.
pub const SNAPSHOT_NARRATIVE_MAX_TOKENS: u32 = 150;
pub const EXPLANATION_MAX_TOKENS: u32 = 200;

/// Commentary on the current snapshot: embeds the timestamp and both market
/// values, asks for a recommended strategy.
pub fn snapshot_narrative(
    generated_at: DateTime<Utc>,
    reading: &MarketReading,
) -> CompletionRequest {
    let timestamp = generated_at.format("%Y-%m-%d %H:%M:%S UTC");
    CompletionRequest {
        prompt: format!(
            "Based on the market data at {timestamp}:\nVIX: {}\nS&P 500: {}\nWhat is a recommended investment strategy?",
            reading.vix, reading.sp500
        ),
        max_tokens: SNAPSHOT_NARRATIVE_MAX_TOKENS,
    }
}

/// Simplified explanation of the selected strategy, steered by the user's
/// free-text question.
pub fn strategy_explanation(
    strategy: StrategyRecommendation,
    question: &str,
) -> CompletionRequest {
    CompletionRequest {
        prompt: format!(
            "Explain the investment strategy '{strategy}' in simple terms. {}",
            question.trim()
        ),
        max_tokens: EXPLANATION_MAX_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_narrative_embeds_values_and_budget() {
        let at = Utc.with_ymd_and_hms(2026, 8, 6, 14, 30, 0).unwrap();
        let reading = MarketReading {
            vix: 22.5,
            sp500: 4812.3,
        };

        let req = snapshot_narrative(at, &reading);
        assert!(req.prompt.contains("2026-08-06 14:30:00 UTC"));
        assert!(req.prompt.contains("VIX: 22.5"));
        assert!(req.prompt.contains("S&P 500: 4812.3"));
        assert_eq!(req.max_tokens, SNAPSHOT_NARRATIVE_MAX_TOKENS);
    }

    #[test]
    fn explanation_embeds_strategy_and_question() {
        let req = strategy_explanation(
            StrategyRecommendation::MinimizeRisk,
            "  Why bonds over equities?  ",
        );
        assert!(req
            .prompt
            .contains("'Minimize exposure to high-risk assets'"));
        assert!(req.prompt.ends_with("Why bonds over equities?"));
        assert_eq!(req.max_tokens, EXPLANATION_MAX_TOKENS);
    }

    #[test]
    fn budgets_do_not_scale_with_prompt_content() {
        let long_question = "why ".repeat(5000);
        let req = strategy_explanation(StrategyRecommendation::OptimizeGrowth, &long_question);
        assert_eq!(req.max_tokens, EXPLANATION_MAX_TOKENS);

        let at = Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap();
        let req = snapshot_narrative(
            at,
            &MarketReading {
                vix: 80.0,
                sp500: 3200.0,
            },
        );
        assert_eq!(req.max_tokens, SNAPSHOT_NARRATIVE_MAX_TOKENS);
    }
}
