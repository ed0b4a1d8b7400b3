use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One best-effort fetch of the two market indicators. Immutable once built;
/// a `None` value means the fetch for that symbol failed and the matching
/// issue carries the user-visible error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub generated_at: DateTime<Utc>,
    pub vix: Option<f64>,
    pub sp500: Option<f64>,
    pub issues: Vec<FetchIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchIssue {
    pub symbol: String,
    pub message: String,
}

/// The complete two-feature view of a snapshot. Only obtainable when both
/// symbols were fetched, so downstream classification can never see an
/// absent value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketReading {
    pub vix: f64,
    pub sp500: f64,
}

impl MarketSnapshot {
    pub fn reading(&self) -> Option<MarketReading> {
        match (self.vix, self.sp500) {
            (Some(vix), Some(sp500)) => Some(MarketReading { vix, sp500 }),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.vix.is_some() && self.sp500.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(vix: Option<f64>, sp500: Option<f64>) -> MarketSnapshot {
        MarketSnapshot {
            generated_at: Utc::now(),
            vix,
            sp500,
            issues: Vec::new(),
        }
    }

    #[test]
    fn reading_requires_both_values() {
        assert!(snapshot(Some(18.0), Some(4900.0)).reading().is_some());
        assert!(snapshot(None, Some(4900.0)).reading().is_none());
        assert!(snapshot(Some(18.0), None).reading().is_none());
        assert!(snapshot(None, None).reading().is_none());
    }

    #[test]
    fn reading_preserves_values() {
        let r = snapshot(Some(35.0), Some(4000.0)).reading().unwrap();
        assert_eq!(r.vix, 35.0);
        assert_eq!(r.sp500, 4000.0);
    }
}
