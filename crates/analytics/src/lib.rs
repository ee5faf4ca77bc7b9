//! # Time-Series Analytics Engine
//!
//! This crate computes descriptive and risk-adjusted statistics for a single
//! asset's price history, and the regression slope ("beta") between two
//! histories.
//!
//! ## Architectural Principles
//!
//! - **Pure Calculation:** Every derivation is a synchronous computation
//!   over an in-memory series. Price acquisition lives behind the
//!   `PriceProvider` trait and is a single call made during construction;
//!   the engine holds no locks and does no I/O of its own.
//! - **Fail Loudly:** Ratios with a zero denominator are errors, never
//!   infinities or NaN sentinels. Callers decide whether to surface or
//!   suppress them.
//!
//! ## Public API
//!
//! - `SeriesAnalytics`: owns one symbol's price history and its derived
//!   returns and drawdown.
//! - `SummaryReport`: the statistics snapshot produced by `summary()`.
//! - `AnalyticsError`: the specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::SeriesAnalytics;
pub use error::AnalyticsError;
pub use report::{PriceStats, ReturnStats, SummaryReport};
