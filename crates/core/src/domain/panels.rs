use crate::domain::snapshot::MarketSnapshot;
use serde::{Deserialize, Serialize};

// Display thresholds for the live trend comment. Configuration constants,
// not tuned model parameters.
pub const VIX_HIGH: f64 = 30.0;
pub const SP500_STABLE: f64 = 4500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelChoice {
    RiskMitigation,
    TrendInsights,
}

impl PanelChoice {
    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "risk-mitigation" => Some(Self::RiskMitigation),
            "trend-insights" => Some(Self::TrendInsights),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::RiskMitigation => "Risk Mitigation Strategy",
            Self::TrendInsights => "Market Trend Insights",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Self::RiskMitigation => RISK_MITIGATION_BODY,
            Self::TrendInsights => TREND_INSIGHTS_BODY,
        }
    }
}

const RISK_MITIGATION_BODY: &str = "In times of market volatility (high VIX), the strategy \
typically involves shifting investments into safe assets like bonds, gold, and cash. When the \
market is stable or bullish (low VIX), focusing on growth stocks and equity-based investments \
is typically beneficial. If VIX is high, we recommend reducing exposure to equities and \
focusing on low-risk assets to mitigate losses. If VIX is low and the S&P 500 is trending \
upwards, investing in equities and growth stocks becomes more viable for maximizing returns.";

const TREND_INSIGHTS_BODY: &str = "VIX (Volatility Index) above 30 often indicates high market \
fear and risk, often followed by market corrections. A bullish market typically occurs when \
the S&P 500 is trending upwards with a VIX below 20.";

pub const HIGH_VOLATILITY_COMMENT: &str = "The market is experiencing high volatility. \
Consider focusing on risk mitigation strategies.";
pub const STABLE_GROWTH_COMMENT: &str =
    "The market is currently stable. A growth-focused strategy is recommended.";
pub const UNCERTAIN_COMMENT: &str =
    "Market trends are uncertain. Monitor closely and adjust your portfolio as needed.";

/// Threshold commentary for the trend-insights panel. An absent value falls
/// through to the uncertain branch instead of being guessed at.
pub fn trend_comment(snapshot: &MarketSnapshot) -> &'static str {
    if matches!(snapshot.vix, Some(vix) if vix > VIX_HIGH) {
        return HIGH_VOLATILITY_COMMENT;
    }
    if matches!(snapshot.sp500, Some(sp500) if sp500 > SP500_STABLE) {
        return STABLE_GROWTH_COMMENT;
    }
    UNCERTAIN_COMMENT
}
