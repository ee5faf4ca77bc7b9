//! Raw payload structures for the Yahoo Finance v8 chart endpoint.
//!
//! These mirror the provider's JSON shape exactly; conversion into domain
//! types happens in the client, not here.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Unix timestamps (seconds) for each trading day, oldest first.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    /// One entry per timestamp; `null` where the provider has no price.
    pub adjclose: Vec<Option<f64>>,
}
