use crate::error::ApiError;
use crate::responses::{ChartResponse, ChartResult};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use configuration::settings::ProviderConfig;
use core_types::Quote;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::ApiError as ProviderError;

/// The generic, abstract interface for a historical price data provider.
/// This trait is the contract the analytics layer builds against, allowing
/// the underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the daily adjusted-close history for `symbol`, from `start`
    /// through the present, ordered by date ascending.
    ///
    /// Dates without a price are returned with `adj_close: None` rather
    /// than omitted, so the caller can decide how to fill gaps.
    async fn fetch_adjusted_close(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Vec<Quote>, ApiError>;
}

/// A concrete implementation of the `PriceProvider` for Yahoo Finance.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(&config.user_agent)
                .build()
                .expect("Failed to build reqwest client"),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn fetch_adjusted_close(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Vec<Quote>, ApiError> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ApiError::InvalidData(format!("Invalid start date: {start}")))?
            .and_utc()
            .timestamp();
        let period2 = Utc::now().timestamp();

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,split".to_string()),
            ])
            .send()
            .await?
            .json::<ChartResponse>()
            .await?;

        let result = match (response.chart.result, response.chart.error) {
            (_, Some(err)) => {
                return Err(ApiError::Provider(format!("{}: {}", err.code, err.description)));
            }
            (Some(mut results), None) if !results.is_empty() => results.remove(0),
            _ => {
                return Err(ApiError::Deserialization(format!(
                    "Chart response for '{symbol}' contained no result"
                )));
            }
        };

        quotes_from_chart(result)
    }
}

/// Converts a raw chart result into dated quotes, pairing each timestamp
/// with its adjusted close.
fn quotes_from_chart(result: ChartResult) -> Result<Vec<Quote>, ApiError> {
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    if result.timestamp.len() != adjclose.len() {
        return Err(ApiError::InvalidData(format!(
            "Timestamp/adjclose length mismatch: {} vs {}",
            result.timestamp.len(),
            adjclose.len()
        )));
    }

    result
        .timestamp
        .into_iter()
        .zip(adjclose)
        .map(|(ts, adj_close)| {
            let date = Utc
                .timestamp_opt(ts, 0)
                .single()
                .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {ts}")))?
                .date_naive();
            Ok(Quote { date, adj_close })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1617667200, 1617753600, 1617840000],
                "indicators": {
                    "adjclose": [{ "adjclose": [100.0, null, 99.0] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_chart_payload_with_gaps() {
        let response: ChartResponse = serde_json::from_str(FIXTURE).unwrap();
        let mut results = response.chart.result.unwrap();
        let quotes = quotes_from_chart(results.remove(0)).unwrap();

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].adj_close, Some(100.0));
        assert_eq!(quotes[1].adj_close, None);
        assert_eq!(
            quotes[0].date,
            NaiveDate::from_ymd_opt(2021, 4, 6).unwrap()
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let raw = r#"{
            "timestamp": [1617667200, 1617753600],
            "indicators": { "adjclose": [{ "adjclose": [100.0] }] }
        }"#;
        let result: ChartResult = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            quotes_from_chart(result),
            Err(ApiError::InvalidData(_))
        ));
    }
}
