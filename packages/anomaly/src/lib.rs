#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation over flagged anomalies and monthly update volumes.
//!
//! Everything here is a pure projection or reduction over input rows: the
//! anomaly detector itself lives upstream, and no function mutates the
//! tables it is given.

pub mod aggregate;
pub mod trends;

pub use aggregate::{
    AnomalyFilter, MonthCount, StateCount, count_by_month, count_by_state, distinct_months,
    distinct_states, filter, filter_sorted, sort_by_ratio_desc,
};
pub use trends::{
    GrowthPoint, MonthlyTotals, RatioPoint, biometric_growth, monthly_ratio_trend, monthly_totals,
};

use thiserror::Error;

/// Errors that can occur while building anomaly views.
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// A month selector could not be parsed.
    #[error("Invalid month filter: {0}")]
    InvalidMonth(#[from] behavior_intel_behavior_models::MonthParseError),
}
