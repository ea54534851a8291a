use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// Result of one trend analysis. Derived per cycle iteration, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalysis {
    pub trend: Trend,
    /// Percent change between the two most recent historical samples.
    pub momentum: f64,
    pub is_buy_signal: bool,
    /// Human-readable one-liner; numeric fields fixed at 2 decimals.
    pub summary: String,
}
