//! One function per analysis view.
//!
//! Each function takes the session plus plain request parameters and
//! returns a newly allocated result. Nothing here mutates the session.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use behavior_intel_analytics_models::{
    AnomalyParams, AnomalyView, ForecastParams, GeoView, InsightsView, NationalSummary,
    RankingParams, TrendsView,
};
use behavior_intel_anomaly::{
    AnomalyFilter, biometric_growth, count_by_month, count_by_state, distinct_months,
    distinct_states, filter_sorted, monthly_ratio_trend, monthly_totals,
};
use behavior_intel_behavior_models::{DataQualityError, DistrictRiskRecord, RiskLevel};
use behavior_intel_forecast::{ForecastHorizon, ForecastReport, Forecaster, History, forecast_all};
use behavior_intel_geography::hotspots;
use behavior_intel_risk::ranking::{rank_districts, top_states};
use behavior_intel_risk::recommendations;

use crate::AnalyticsError;
use crate::session::AnalysisSession;

/// Headline counts for the session. Districts without a usable score are
/// counted separately and left out of every other count.
///
/// # Errors
///
/// Returns [`AnalyticsError::Risk`] if the session could not tier its
/// districts.
pub fn summary(session: &AnalysisSession) -> Result<NationalSummary, AnalyticsError> {
    let tiered = session.tiered()?;
    let untiered = session.untiered()?;
    let states: BTreeSet<&str> = tiered.iter().map(|d| d.state.as_str()).collect();

    Ok(NationalSummary {
        districts: tiered.len(),
        anomalies: session.tables().anomalies.len(),
        high_risk_districts: tiered
            .iter()
            .filter(|d| d.risk_level == RiskLevel::High)
            .count(),
        states: states.len(),
        untiered_districts: untiered.len(),
    })
}

/// Monthly volume totals, ratio trend and biometric growth.
#[must_use]
pub fn trends(session: &AnalysisSession) -> TrendsView {
    let monthly = &session.tables().monthly;
    let totals = monthly_totals(monthly);
    let growth = biometric_growth(&totals);

    TrendsView {
        ratio: monthly_ratio_trend(monthly),
        totals,
        growth,
    }
}

/// Anomaly counts over the whole table plus the filtered, sorted rows.
///
/// # Errors
///
/// Returns [`AnalyticsError::Anomaly`] if the month selector is invalid.
pub fn anomalies(
    session: &AnalysisSession,
    params: &AnomalyParams,
) -> Result<AnomalyView, AnalyticsError> {
    let table = &session.tables().anomalies;
    let selection = AnomalyFilter::from_selection(params.month.as_deref(), params.state.as_deref())?;

    Ok(AnomalyView {
        by_month: count_by_month(table),
        by_state: count_by_state(table),
        rows: filter_sorted(table, &selection),
        months: distinct_months(table),
        states: distinct_states(table),
    })
}

/// State hotspots and the riskiest states.
#[must_use]
pub fn geo(session: &AnalysisSession, params: &RankingParams) -> GeoView {
    let tables = session.tables();
    let join = hotspots(&tables.state_risk, &tables.coordinates);

    let unlocated_states = join
        .missing
        .into_iter()
        .filter_map(|e| match e {
            DataQualityError::MissingCoordinates { state } => Some(state),
            _ => None,
        })
        .collect();

    GeoView {
        hotspots: join.points,
        unlocated_states,
        top_states: top_states(&tables.state_risk, params.top_states_limit),
    }
}

/// District ranking and recommended actions.
///
/// # Errors
///
/// Returns [`AnalyticsError::Risk`] if the session could not tier its
/// districts.
pub fn insights(
    session: &AnalysisSession,
    params: &RankingParams,
) -> Result<InsightsView, AnalyticsError> {
    let tiering = session.tiering()?;

    Ok(InsightsView {
        q_high: tiering.thresholds.high,
        q_medium: tiering.thresholds.medium,
        ranking: rank_districts(&tiering.districts, params.ranking_limit),
        recommendations: recommendations(&tiering.districts, params.recommendation_limit),
    })
}

/// Tiered districts, optionally narrowed to one state.
///
/// Narrowing only selects rows; tiers still come from the thresholds of
/// the full corpus.
///
/// # Errors
///
/// Returns [`AnalyticsError::Risk`] if the session could not tier its
/// districts.
pub fn districts(
    session: &AnalysisSession,
    state: Option<&str>,
) -> Result<Vec<DistrictRiskRecord>, AnalyticsError> {
    Ok(session
        .tiered()?
        .iter()
        .filter(|d| state.is_none_or(|s| d.state == s))
        .cloned()
        .collect())
}

/// Forecasts the three monthly series and interprets the result.
///
/// # Errors
///
/// Returns [`AnalyticsError::Forecast`] if the horizon is invalid or any
/// series cannot be forecast. Check
/// [`AnalyticsError::is_forecast_unavailable`] to tell the two apart.
pub fn forecast(
    session: &AnalysisSession,
    forecaster: &dyn Forecaster,
    params: &ForecastParams,
) -> Result<ForecastReport, AnalyticsError> {
    let horizon = params
        .horizon
        .map_or(Ok(session.default_horizon()), ForecastHorizon::new)?;
    let history = History::from_monthly(&session.tables().monthly)?;

    Ok(forecast_all(forecaster, &history, horizon)?)
}

/// Writes the raw anomaly table and the tiered district table to `dir`.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if tiering failed or a file cannot be written.
pub fn export(session: &AnalysisSession, dir: &Path) -> Result<Vec<PathBuf>, AnalyticsError> {
    let tiered = session.tiered()?;
    std::fs::create_dir_all(dir).map_err(behavior_intel_ingest::IngestError::from)?;

    Ok(vec![
        behavior_intel_ingest::export_anomalies(&session.tables().anomalies, dir)?,
        behavior_intel_ingest::export_tiered_districts(tiered, dir)?,
    ])
}
