#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request parameters and view results for the analysis session.
//!
//! Interactive state (selected view, selected filters, horizon) is never
//! stored in the session: every view takes a plain parameter value and
//! returns a freshly built result.

use behavior_intel_anomaly::{GrowthPoint, MonthCount, MonthlyTotals, RatioPoint, StateCount};
use behavior_intel_behavior_models::{
    AnomalyRecord, DistrictRiskRecord, RecommendationRow, StateRiskRecord, YearMonth,
};
use behavior_intel_geography::HotspotPoint;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The analysis views, in presentation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewName {
    /// National headline numbers.
    Summary,
    /// Monthly volume, ratio and growth trends.
    Trends,
    /// Anomaly counts and the filtered anomaly table.
    Anomalies,
    /// State hotspots and top risky states.
    Geo,
    /// District ranking and recommendations.
    Insights,
    /// Future load forecast and trend verdict.
    Forecast,
}

impl ViewName {
    /// All views in presentation order.
    pub const ALL: &[Self] = &[
        Self::Summary,
        Self::Trends,
        Self::Anomalies,
        Self::Geo,
        Self::Insights,
        Self::Forecast,
    ];

    /// Menu label for the view.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Summary => "National summary",
            Self::Trends => "Trends",
            Self::Anomalies => "Anomalies",
            Self::Geo => "Geo intelligence",
            Self::Insights => "Risk insights & recommendations",
            Self::Forecast => "Future risk prediction",
        }
    }
}

/// Headline numbers for the whole corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalSummary {
    /// Districts in the risk corpus.
    pub districts: usize,
    /// Flagged anomaly rows.
    pub anomalies: usize,
    /// Districts tiered HIGH.
    pub high_risk_districts: usize,
    /// Distinct states in the risk corpus.
    pub states: usize,
    /// Districts left untiered because their score is missing or not finite.
    pub untiered_districts: usize,
}

/// Trend series over the monthly behaviour table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsView {
    /// Volumes summed per month.
    pub totals: Vec<MonthlyTotals>,
    /// Mean ratio per month.
    pub ratio: Vec<RatioPoint>,
    /// Month-over-month biometric growth.
    pub growth: Vec<GrowthPoint>,
}

/// Selector values for the anomaly view. `"All"` or `None` disables a
/// filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyParams {
    /// Month selector (`YYYY-MM`).
    pub month: Option<String>,
    /// State selector.
    pub state: Option<String>,
}

/// Anomaly counts plus the filtered, ratio-sorted anomaly table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyView {
    /// Anomalies per month over the whole table.
    pub by_month: Vec<MonthCount>,
    /// Anomalies per state over the whole table.
    pub by_state: Vec<StateCount>,
    /// Filtered rows, highest ratio first.
    pub rows: Vec<AnomalyRecord>,
    /// Month options for the selector.
    pub months: Vec<YearMonth>,
    /// State options for the selector (excluding `"All"`).
    pub states: Vec<String>,
}

/// Row limits for ranking views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingParams {
    /// Districts shown in the ranking.
    pub ranking_limit: usize,
    /// Districts shown in the recommendation table.
    pub recommendation_limit: usize,
    /// States shown in the top-states chart.
    pub top_states_limit: usize,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            ranking_limit: 50,
            recommendation_limit: 30,
            top_states_limit: 10,
        }
    }
}

/// Hotspot map points and the top risky states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoView {
    /// One point per state; unlocated states have no coordinates.
    pub hotspots: Vec<HotspotPoint>,
    /// States lacking a coordinate row.
    pub unlocated_states: Vec<String>,
    /// Riskiest states, highest first.
    pub top_states: Vec<StateRiskRecord>,
}

/// District ranking with recommended actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsView {
    /// Session HIGH cut point (85th percentile).
    pub q_high: f64,
    /// Session MEDIUM cut point (60th percentile).
    pub q_medium: f64,
    /// Riskiest districts, highest first.
    pub ranking: Vec<DistrictRiskRecord>,
    /// Recommended action per district.
    pub recommendations: Vec<RecommendationRow>,
}

/// Parameters for the forecast view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastParams {
    /// Months ahead to forecast (`1..=12`). Uses the session default when
    /// absent.
    pub horizon: Option<i64>,
}
