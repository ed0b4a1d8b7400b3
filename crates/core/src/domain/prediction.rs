use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionLabel {
    CrashLikely,
    Stable,
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PredictionLabel::CrashLikely => "Market Crash Likely",
            PredictionLabel::Stable => "Market is Stable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyRecommendation {
    MinimizeRisk,
    OptimizeGrowth,
}

impl fmt::Display for StrategyRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyRecommendation::MinimizeRisk => "Minimize exposure to high-risk assets",
            StrategyRecommendation::OptimizeGrowth => "Optimize for growth",
        };
        f.write_str(s)
    }
}

/// Pure two-branch mapping from prediction label to recommendation.
pub fn recommend(label: PredictionLabel) -> StrategyRecommendation {
    match label {
        PredictionLabel::CrashLikely => StrategyRecommendation::MinimizeRisk,
        PredictionLabel::Stable => StrategyRecommendation::OptimizeGrowth,
    }
}
