use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row as delivered by a price provider.
///
/// `adj_close` is `None` when the provider has no price for that date.
/// Missing values are preserved here so the series construction can decide
/// how to fill them; they are never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: NaiveDate,
    pub adj_close: Option<f64>,
}

/// A single dated observation inside a [`PriceSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// An ordered adjusted-close price history for one symbol.
///
/// Observations are ascending by date with no duplicate dates. A missing
/// provider value becomes an exact `0.0` price, so the series length always
/// matches what the provider returned, gaps included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates a series from already-resolved price points.
    ///
    /// The symbol is normalized to uppercase for all later identification.
    pub fn new(symbol: &str, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            points,
        }
    }

    /// Creates a series from provider quotes, replacing every missing
    /// value with zero.
    pub fn zero_filled(symbol: &str, quotes: Vec<Quote>) -> Self {
        let points = quotes
            .into_iter()
            .map(|q| PricePoint {
                date: q.date,
                adj_close: q.adj_close.unwrap_or(0.0),
            })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The adjusted-close values in observation order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.adj_close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 4, d).unwrap()
    }

    #[test]
    fn zero_filled_preserves_length_and_fills_gaps() {
        let quotes = vec![
            Quote { date: date(6), adj_close: Some(100.0) },
            Quote { date: date(7), adj_close: None },
            Quote { date: date(8), adj_close: Some(99.0) },
        ];
        let series = PriceSeries::zero_filled("spy", quotes);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 0.0, 99.0]);
    }

    #[test]
    fn symbol_is_uppercased() {
        let series = PriceSeries::new("aapl", vec![]);
        assert_eq!(series.symbol(), "AAPL");
    }
}
