use crate::error::AnalyticsError;
use crate::report::{PriceStats, ReturnStats, SummaryReport};
use api_client::PriceProvider;
use chrono::NaiveDate;
use core_types::PriceSeries;

/// Series derived from the price history, recomputed whenever the prices
/// are replaced.
#[derive(Debug, Clone)]
struct DerivedSeries {
    /// `period_returns[0]` is defined as zero (no prior observation);
    /// `period_returns[i] = (p[i] - p[i-1]) / p[i-1]`.
    period_returns: Vec<f64>,
    /// `drawdown[i] = p[i] - running_max(p[0..=i])`, non-positive by
    /// construction.
    drawdown: Vec<f64>,
}

impl DerivedSeries {
    fn from_closes(closes: &[f64]) -> Self {
        let mut period_returns = Vec::with_capacity(closes.len());
        let mut drawdown = Vec::with_capacity(closes.len());
        let mut running_max = f64::NEG_INFINITY;

        for (i, &price) in closes.iter().enumerate() {
            if i == 0 {
                period_returns.push(0.0);
            } else {
                let prev = closes[i - 1];
                period_returns.push((price - prev) / prev);
            }

            if price > running_max {
                running_max = price;
            }
            drawdown.push(price - running_max);
        }

        Self {
            period_returns,
            drawdown,
        }
    }
}

/// Owns a single asset's price history and its derived series, and exposes
/// aggregate statistics and pairwise regression.
///
/// Instances are independent: nothing is shared between them, and `beta`
/// only borrows read-only access to the benchmark's return series.
#[derive(Debug, Clone)]
pub struct SeriesAnalytics {
    symbol: String,
    start_period: NaiveDate,
    prices: Option<PriceSeries>,
    derived: Option<DerivedSeries>,
}

impl SeriesAnalytics {
    /// Creates an instance with no price data. `set_prices` must be called
    /// before any statistics can be computed.
    pub fn new(symbol: &str, start_period: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            start_period,
            prices: None,
            derived: None,
        }
    }

    /// Creates an instance and immediately acquires its adjusted-close
    /// history from the provider, from `start_period` through now.
    ///
    /// Dates the provider has no price for are kept in the series with an
    /// exact zero value, so the observation count always matches what the
    /// provider returned.
    pub async fn fetch(
        symbol: &str,
        start_period: NaiveDate,
        provider: &dyn PriceProvider,
    ) -> Result<Self, AnalyticsError> {
        let mut instance = Self::new(symbol, start_period);
        let quotes = provider
            .fetch_adjusted_close(&instance.symbol, start_period)
            .await?;
        tracing::info!(
            symbol = %instance.symbol,
            observations = quotes.len(),
            "Fetched adjusted-close history"
        );
        instance.set_prices(PriceSeries::zero_filled(&instance.symbol, quotes))?;
        Ok(instance)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn start_period(&self) -> NaiveDate {
        self.start_period
    }

    /// The period returns aligned 1:1 with the price observations, if any
    /// prices have been set.
    pub fn period_returns(&self) -> Option<&[f64]> {
        self.derived.as_ref().map(|d| d.period_returns.as_slice())
    }

    /// The drawdown series aligned 1:1 with the price observations, if any
    /// prices have been set.
    pub fn drawdown(&self) -> Option<&[f64]> {
        self.derived.as_ref().map(|d| d.drawdown.as_slice())
    }

    /// Replaces the held price series and synchronously recomputes the
    /// derived returns and drawdown.
    pub fn set_prices(&mut self, series: PriceSeries) -> Result<(), AnalyticsError> {
        if series.is_empty() {
            return Err(AnalyticsError::InvalidSeries(
                "series contains no observations".to_string(),
            ));
        }
        for w in series.points().windows(2) {
            if w[1].date <= w[0].date {
                return Err(AnalyticsError::InvalidSeries(format!(
                    "observations must be ascending by date without duplicates: {} then {}",
                    w[0].date, w[1].date
                )));
            }
        }

        tracing::debug!(
            symbol = %self.symbol,
            observations = series.len(),
            "Recomputing derived series"
        );
        self.derived = Some(DerivedSeries::from_closes(&series.closes()));
        self.prices = Some(series);
        Ok(())
    }

    /// Total period return: `(last - first) / first`.
    pub fn period_return(&self) -> Result<f64, AnalyticsError> {
        let (prices, _) = self.state()?;
        let closes = prices.closes();
        let first = closes[0];
        let last = closes[closes.len() - 1];
        if first == 0.0 {
            return Err(AnalyticsError::DegenerateStatistic("return"));
        }
        Ok((last - first) / first)
    }

    /// Computes a fresh statistics snapshot from the current state.
    ///
    /// Any ratio whose denominator is zero, and any restricted standard
    /// deviation with fewer than two values (e.g. a series with no negative
    /// returns), fails with `DegenerateStatistic` rather than producing an
    /// infinite or NaN value.
    pub fn summary(&self) -> Result<SummaryReport, AnalyticsError> {
        let (prices, derived) = self.state()?;
        let closes = prices.closes();

        let period_return = self.period_return()?;
        let max_price = max_value(&closes);
        let min_drawdown = min_value(&derived.drawdown);
        if max_price == 0.0 {
            return Err(AnalyticsError::DegenerateStatistic("max_draw_pct"));
        }

        let price_stats = PriceStats {
            std: population_std(&closes),
            min: min_value(&closes),
            max: max_price,
            mean: mean(&closes),
            period_return,
            first: closes[0],
            last: closes[closes.len() - 1],
            max_draw_pct: min_drawdown.abs() / max_price,
            avg_draw_down: mean(&derived.drawdown).abs(),
            std_draw_down: sample_std(&derived.drawdown)
                .ok_or(AnalyticsError::DegenerateStatistic("std_draw_down"))?,
        };

        let returns = &derived.period_returns;
        let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let positive: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();

        let std_all = population_std(returns);
        let std_neg =
            sample_std(&negative).ok_or(AnalyticsError::DegenerateStatistic("std_neg"))?;
        let std_pos =
            sample_std(&positive).ok_or(AnalyticsError::DegenerateStatistic("std_pos"))?;

        if std_all == 0.0 {
            return Err(AnalyticsError::DegenerateStatistic("sharpe"));
        }
        if std_neg == 0.0 {
            return Err(AnalyticsError::DegenerateStatistic("sortino"));
        }
        if min_drawdown == 0.0 {
            return Err(AnalyticsError::DegenerateStatistic("calmar"));
        }

        let return_stats = ReturnStats {
            std: std_all,
            std_neg,
            std_pos,
            min: min_value(returns),
            max: max_value(returns),
            mean: mean(returns),
            sortino: period_return / std_neg,
            sharpe: period_return / std_all,
            calmar: max_price * period_return / min_drawdown.abs(),
        };

        Ok(SummaryReport {
            // The engine's own symbol identifies the report, regardless of
            // how the supplied series was labeled.
            ticker: self.symbol.clone(),
            prices: price_stats,
            returns: return_stats,
        })
    }

    /// Ordinary-least-squares slope of this instance's returns regressed on
    /// the benchmark's returns, aligned positionally.
    ///
    /// The engine performs no date-based re-alignment: observation `i` of
    /// self is paired with observation `i` of the benchmark, and differing
    /// lengths are an error rather than a silently meaningless fit.
    pub fn beta(&self, benchmark: &SeriesAnalytics) -> Result<f64, AnalyticsError> {
        let (_, own) = self.state()?;
        let (_, other) = benchmark.state()?;
        let y = &own.period_returns;
        let x = &other.period_returns;

        if y.len() != x.len() {
            return Err(AnalyticsError::MisalignedSeries(y.len(), x.len()));
        }
        if y.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                actual: y.len(),
            });
        }

        let x_mean = mean(x);
        let y_mean = mean(y);

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (xi, yi) in x.iter().zip(y) {
            covariance += (xi - x_mean) * (yi - y_mean);
            variance += (xi - x_mean) * (xi - x_mean);
        }

        if variance == 0.0 {
            return Err(AnalyticsError::DegenerateStatistic("beta"));
        }

        Ok(covariance / variance)
    }

    fn state(&self) -> Result<(&PriceSeries, &DerivedSeries), AnalyticsError> {
        match (&self.prices, &self.derived) {
            (Some(prices), Some(derived)) => Ok((prices, derived)),
            _ => Err(AnalyticsError::UninitializedSeries(self.symbol.clone())),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation (divisor `n`).
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (divisor `n - 1`), undefined below 2 values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn min_value(values: &[f64]) -> f64 {
    values.iter().fold(f64::INFINITY, |acc, &v| acc.min(v))
}

fn max_value(values: &[f64]) -> f64 {
    values.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_types::{PricePoint, Quote};

    const TOLERANCE: f64 = 1e-12;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 4, 6).unwrap()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &adj_close)| PricePoint {
                date: start() + chrono::Days::new(i as u64),
                adj_close,
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    fn analytics(closes: &[f64]) -> SeriesAnalytics {
        let mut instance = SeriesAnalytics::new("TEST", start());
        instance.set_prices(series(closes)).unwrap();
        instance
    }

    #[test]
    fn worked_example_returns_and_drawdown() {
        let a = analytics(&[100.0, 110.0, 90.0, 99.0]);

        let returns = a.period_returns().unwrap();
        assert_eq!(returns.len(), 4);
        assert_eq!(returns[0], 0.0);
        assert!((returns[1] - 0.10).abs() < TOLERANCE);
        assert!((returns[2] - (-20.0 / 110.0)).abs() < TOLERANCE);
        assert!((returns[3] - 0.10).abs() < TOLERANCE);

        assert_eq!(a.drawdown().unwrap(), &[0.0, 0.0, -20.0, -11.0]);
        assert!((a.period_return().unwrap() - (-0.01)).abs() < TOLERANCE);
    }

    #[test]
    fn drawdown_is_non_positive_and_zero_at_new_highs() {
        let a = analytics(&[1.0, 2.0, 1.5, 3.0, 2.0]);
        let drawdown = a.drawdown().unwrap();

        assert!(drawdown.iter().all(|&d| d <= 0.0));
        // Fresh running maxima at indices 0, 1 and 3.
        assert_eq!(drawdown[0], 0.0);
        assert_eq!(drawdown[1], 0.0);
        assert_eq!(drawdown[3], 0.0);
    }

    #[test]
    fn summary_matches_hand_computed_values() {
        let a = analytics(&[100.0, 110.0, 90.0, 99.0, 95.0, 105.0]);
        let report = a.summary().unwrap();

        assert_eq!(report.ticker, "TEST");
        assert_eq!(report.prices.first, 100.0);
        assert_eq!(report.prices.last, 105.0);
        assert_eq!(report.prices.min, 90.0);
        assert_eq!(report.prices.max, 110.0);
        assert!((report.prices.mean - 599.0 / 6.0).abs() < TOLERANCE);
        assert!((report.prices.period_return - 0.05).abs() < TOLERANCE);

        // Drawdown: [0, 0, -20, -11, -15, -5].
        assert!((report.prices.max_draw_pct - 20.0 / 110.0).abs() < TOLERANCE);
        assert!((report.prices.avg_draw_down - 8.5).abs() < TOLERANCE);

        assert!((report.returns.calmar - 0.275).abs() < TOLERANCE);
        assert!((report.returns.sharpe * report.returns.std - 0.05).abs() < TOLERANCE);
        assert!((report.returns.sortino * report.returns.std_neg - 0.05).abs() < TOLERANCE);
        assert!(report.returns.std > 0.0);
        assert!((report.returns.max - 10.0 / 95.0).abs() < TOLERANCE);
        assert!((report.returns.min - (-20.0 / 110.0)).abs() < TOLERANCE);
    }

    #[test]
    fn report_ticker_comes_from_the_engine_symbol() {
        // The helper labels the series "TEST"; the engine's own symbol wins.
        let mut a = SeriesAnalytics::new("aapl", start());
        a.set_prices(series(&[100.0, 110.0, 90.0, 99.0, 95.0, 105.0]))
            .unwrap();
        assert_eq!(a.summary().unwrap().ticker, "AAPL");
    }

    #[test]
    fn summary_is_degenerate_on_a_constant_series() {
        let a = analytics(&[50.0, 50.0, 50.0]);
        assert!(matches!(
            a.summary(),
            Err(AnalyticsError::DegenerateStatistic(_))
        ));
    }

    #[test]
    fn summary_requires_price_data() {
        let a = SeriesAnalytics::new("TEST", start());
        assert!(matches!(
            a.summary(),
            Err(AnalyticsError::UninitializedSeries(_))
        ));
    }

    #[test]
    fn set_prices_rejects_an_empty_series() {
        let mut a = SeriesAnalytics::new("TEST", start());
        assert!(matches!(
            a.set_prices(series(&[])),
            Err(AnalyticsError::InvalidSeries(_))
        ));
    }

    #[test]
    fn set_prices_rejects_unordered_dates() {
        let mut a = SeriesAnalytics::new("TEST", start());
        let points = vec![
            PricePoint { date: start() + chrono::Days::new(1), adj_close: 100.0 },
            PricePoint { date: start(), adj_close: 101.0 },
        ];
        assert!(matches!(
            a.set_prices(PriceSeries::new("TEST", points)),
            Err(AnalyticsError::InvalidSeries(_))
        ));
    }

    #[test]
    fn beta_against_itself_is_one() {
        let a = analytics(&[100.0, 110.0, 90.0, 99.0, 95.0]);
        assert!((a.beta(&a).unwrap() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn beta_scales_with_the_benchmark() {
        // Self moves exactly twice as much as the benchmark each period.
        let benchmark = analytics(&[100.0, 102.0, 99.0, 103.0]);
        let doubled: Vec<f64> = benchmark
            .period_returns()
            .unwrap()
            .iter()
            .map(|r| r * 2.0)
            .collect();

        // Rebuild a price series whose returns are exactly `doubled`.
        let mut closes = vec![100.0];
        for r in &doubled[1..] {
            let prev = *closes.last().unwrap();
            closes.push(prev * (1.0 + r));
        }
        let leveraged = analytics(&closes);

        assert!((leveraged.beta(&benchmark).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn beta_rejects_misaligned_series() {
        let long: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let short: Vec<f64> = (0..9).map(|i| 100.0 + i as f64).collect();
        let a = analytics(&long);
        let b = analytics(&short);
        assert!(matches!(
            a.beta(&b),
            Err(AnalyticsError::MisalignedSeries(10, 9))
        ));
    }

    #[test]
    fn beta_requires_two_observations() {
        let a = analytics(&[100.0]);
        let b = analytics(&[100.0]);
        assert!(matches!(
            a.beta(&b),
            Err(AnalyticsError::InsufficientData { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn beta_requires_price_data_on_both_sides() {
        let a = analytics(&[100.0, 101.0]);
        let empty = SeriesAnalytics::new("TEST", start());
        assert!(matches!(
            a.beta(&empty),
            Err(AnalyticsError::UninitializedSeries(_))
        ));
    }

    #[test]
    fn beta_is_degenerate_on_a_flat_benchmark() {
        let a = analytics(&[100.0, 110.0, 90.0]);
        let flat = analytics(&[50.0, 50.0, 50.0]);
        assert!(matches!(
            a.beta(&flat),
            Err(AnalyticsError::DegenerateStatistic("beta"))
        ));
    }

    struct FixedProvider {
        quotes: Vec<Quote>,
    }

    #[async_trait]
    impl PriceProvider for FixedProvider {
        async fn fetch_adjusted_close(
            &self,
            _symbol: &str,
            _start: NaiveDate,
        ) -> Result<Vec<Quote>, api_client::error::ApiError> {
            Ok(self.quotes.clone())
        }
    }

    #[tokio::test]
    async fn fetch_zero_fills_missing_prices() {
        let provider = FixedProvider {
            quotes: vec![
                Quote { date: start(), adj_close: Some(100.0) },
                Quote { date: start() + chrono::Days::new(1), adj_close: None },
                Quote { date: start() + chrono::Days::new(2), adj_close: Some(99.0) },
            ],
        };

        let a = SeriesAnalytics::fetch("spy", start(), &provider).await.unwrap();
        assert_eq!(a.symbol(), "SPY");

        // The gap is preserved as a zero price, which manufactures a -100%
        // return into the gap and an infinite return out of it.
        let returns = a.period_returns().unwrap();
        assert_eq!(returns.len(), 3);
        assert_eq!(returns[1], -1.0);
        assert!(returns[2].is_infinite());
    }
}
