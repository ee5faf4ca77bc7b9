use api_client::error::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("No price data has been set for '{0}'")]
    UninitializedSeries(String),

    #[error("Degenerate statistic '{0}': denominator is zero or undefined")]
    DegenerateStatistic(&'static str),

    #[error("Misaligned series: {0} returns regressed on {1} returns")]
    MisalignedSeries(usize, usize),

    #[error("Insufficient data: a regression requires at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error(transparent)]
    Acquisition(#[from] ApiError),
}
