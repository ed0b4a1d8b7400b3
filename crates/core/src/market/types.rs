use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest closing value for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub close: f64,
    pub as_of: DateTime<Utc>,
}
