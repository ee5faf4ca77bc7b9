use serde::{Deserialize, Serialize};

/// A statistics snapshot for one price series.
///
/// This struct is the output of `SeriesAnalytics::summary()` and is the
/// data transfer object for analysis results throughout the system. It is
/// computed fresh on every request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub ticker: String,
    pub prices: PriceStats,
    pub returns: ReturnStats,
}

/// Price-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Total period return: `(last - first) / first`.
    #[serde(rename = "return")]
    pub period_return: f64,
    pub first: f64,
    pub last: f64,
    /// Worst drawdown as a fraction of the peak price.
    pub max_draw_pct: f64,
    pub avg_draw_down: f64,
    pub std_draw_down: f64,
}

/// Return-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    pub std: f64,
    /// Standard deviation restricted to negative returns (downside volatility).
    pub std_neg: f64,
    /// Standard deviation restricted to positive returns.
    pub std_pos: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sortino: f64,
    pub sharpe: f64,
    pub calmar: f64,
}
