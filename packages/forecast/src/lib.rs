#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Load forecasting and forecast interpretation.
//!
//! The forecasting technique itself sits behind the [`Forecaster`] trait;
//! this crate ships a least-squares [`LinearTrendForecaster`] but the
//! interpretation in [`interpret`] only ever sees predicted series, so any
//! model can be plugged in (and tests use synthetic ones).
//!
//! Three independent series are forecast (biometric volume, demographic
//! volume and their ratio). The ratio forecast is compared to recent
//! history to produce a [`ForecastVerdict`](behavior_intel_behavior_models::ForecastVerdict).

pub mod interpret;
pub mod linear;
pub mod series;

use std::time::Instant;

pub use interpret::{
    ForecastReport, ForecastSummaryRow, VerdictThresholds, current_ratio, future_ratio, interpret,
    summary_table, verdict,
};
pub use linear::LinearTrendForecaster;
pub use series::{ForecastHorizon, ForecastSeries, History, SeriesKind, TimeSeries};

use thiserror::Error;

/// Errors that can occur while producing or interpreting a forecast.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    /// The forecaster could not fit or predict a series.
    #[error("Forecast unavailable for {series}: {reason}")]
    Unavailable {
        /// Which series failed.
        series: SeriesKind,
        /// Why the forecaster gave up.
        reason: String,
    },

    /// The three forecast series disagree on their future months.
    #[error("Forecast series are misaligned: {message}")]
    Misaligned {
        /// Description of the disagreement.
        message: String,
    },

    /// The requested horizon is outside `1..=12` months.
    #[error("Invalid forecast horizon {horizon}: expected 1-12 months")]
    InvalidHorizon {
        /// The rejected horizon.
        horizon: i64,
    },
}

impl ForecastError {
    /// Returns `true` for errors that mean "no trustworthy forecast could
    /// be produced", as opposed to a caller configuration mistake.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Misaligned { .. })
    }
}

/// Capability that turns a historical series into `horizon` future points.
///
/// Implementations predict the months immediately following
/// [`TimeSeries::through`].
pub trait Forecaster {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fits the series and predicts the next `horizon` months.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Unavailable`] if the series cannot be
    /// fitted (for example, fewer than two distinct months).
    fn fit_predict(
        &self,
        history: &TimeSeries,
        horizon: ForecastHorizon,
    ) -> Result<ForecastSeries, ForecastError>;
}

/// Forecasts all three series and interprets the result.
///
/// Fails as a whole if any single series cannot be forecast; a verdict is
/// never computed from partial data.
///
/// # Errors
///
/// Returns the first [`ForecastError`] raised by the forecaster or by
/// interpretation.
pub fn forecast_all(
    forecaster: &dyn Forecaster,
    history: &History,
    horizon: ForecastHorizon,
) -> Result<ForecastReport, ForecastError> {
    let start = Instant::now();
    log::info!(
        "Forecasting {} months ahead with {} over {} historical months",
        horizon.months(),
        forecaster.name(),
        history.biometric.len()
    );

    let biometric = forecaster.fit_predict(&history.biometric, horizon)?;
    let demographic = forecaster.fit_predict(&history.demographic, horizon)?;
    let ratio = forecaster.fit_predict(&history.ratio, horizon)?;

    let report = interpret(&history.ratio, &biometric, &demographic, &ratio, horizon)?;

    log::info!(
        "Forecast complete in {:.2?}: verdict {} (current {:.4}, future {:.4})",
        start.elapsed(),
        report.verdict,
        report.current_ratio,
        report.future_ratio
    );

    Ok(report)
}
