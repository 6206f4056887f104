#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis session and view computations.
//!
//! An [`AnalysisSession`](session::AnalysisSession) owns one read-only
//! snapshot of the input tables plus the risk thresholds computed once from
//! the full district corpus. Each public function in [`views`] builds one
//! view from that session and a plain parameter value. A failure in one view
//! (for example an unavailable forecast) never poisons the others.

pub mod session;
pub mod views;

use thiserror::Error;

/// Errors that can occur while building a view.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Loading the input tables failed.
    #[error(transparent)]
    Ingest(#[from] behavior_intel_ingest::IngestError),

    /// Risk tiering failed (for example an empty district corpus).
    #[error(transparent)]
    Risk(#[from] behavior_intel_risk::RiskError),

    /// An anomaly selector was invalid.
    #[error(transparent)]
    Anomaly(#[from] behavior_intel_anomaly::AnomalyError),

    /// Forecasting failed or was misconfigured.
    #[error(transparent)]
    Forecast(#[from] behavior_intel_forecast::ForecastError),
}

impl AnalyticsError {
    /// Returns `true` if the error means no forecast could be produced
    /// from the available history.
    #[must_use]
    pub const fn is_forecast_unavailable(&self) -> bool {
        matches!(self, Self::Forecast(e) if e.is_unavailable())
    }
}
