use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A submitted analysis request, in closed form.
///
/// The original service accepted free-form portfolio descriptions; this
/// struct enumerates exactly the fields an analysis needs. Anything else in
/// the payload is rejected by deserialization, and the field values are
/// validated before they ever reach the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioRequest {
    /// The symbols to analyze.
    pub holdings: Vec<String>,
    /// The benchmark symbol every holding is regressed against.
    pub benchmark: String,
    /// The first date of the analysis window.
    pub start_date: NaiveDate,
}

impl PortfolioRequest {
    /// Checks the request against the boundary rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.holdings.is_empty() {
            return Err(ConfigError::ValidationError(
                "request must list at least one holding".to_string(),
            ));
        }
        if let Some(blank) = self.holdings.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "holding symbol '{blank}' is blank"
            )));
        }
        if self.benchmark.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "benchmark symbol must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(holdings: Vec<&str>, benchmark: &str) -> PortfolioRequest {
        PortfolioRequest {
            holdings: holdings.into_iter().map(String::from).collect(),
            benchmark: benchmark.to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 4, 6).unwrap(),
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(request(vec!["AAPL", "MSFT"], "SPY").validate().is_ok());
    }

    #[test]
    fn rejects_empty_holdings() {
        let err = request(vec![], "SPY").validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_blank_symbols() {
        assert!(request(vec!["AAPL", "  "], "SPY").validate().is_err());
        assert!(request(vec!["AAPL"], "").validate().is_err());
    }
}
