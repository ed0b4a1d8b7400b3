pub mod provider;
pub mod types;
pub mod yahoo;

/// The fixed pair of symbols the dashboard tracks.
pub const VIX_SYMBOL: &str = "^VIX";
pub const SP500_SYMBOL: &str = "^GSPC";
