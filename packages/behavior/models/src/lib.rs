#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types for regional update behaviour analysis.
//!
//! This crate defines the canonical table rows shared across the whole
//! behaviour-intelligence system: monthly biometric/demographic volumes,
//! upstream-flagged anomalies, per-district and per-state risk scores,
//! state coordinates, and the derived risk tiers, forecast points and
//! trend verdicts. Every other crate consumes these types; none of them
//! mutate source rows in place.

mod month;

pub use month::{MonthParseError, YearMonth};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Discrete risk tier derived from a continuous risk score.
///
/// Never set directly on a row: the tier is a function of the score and
/// the corpus-wide quantile thresholds of the current session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Below the 60th percentile of the corpus.
    Low,
    /// At or above the 60th percentile, below the 85th.
    Medium,
    /// At or above the 85th percentile.
    High,
}

impl RiskLevel {
    /// Returns all variants, lowest tier first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Qualitative trend verdict comparing recent vs. forecast ratio behaviour.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastVerdict {
    /// Forecast ratio within 5% of recent behaviour (or lower).
    Stable,
    /// Forecast ratio more than 5% above recent behaviour.
    ModerateIncrease,
    /// Forecast ratio more than 15% above recent behaviour.
    HighIncrease,
}

impl ForecastVerdict {
    /// Human-readable interpretation shown alongside the forecast.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Stable => "System behavior expected to remain stable.",
            Self::ModerateIncrease => "Moderate risk increase expected. Monitor closely.",
            Self::HighIncrease => "High risk increase predicted. Infrastructure stress likely.",
        }
    }
}

/// Upstream risk score for a single district, as read from `district_risk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictScore {
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Precomputed continuous abnormality score. `None` when the cell was
    /// empty.
    pub risk_score: Option<f64>,
}

impl DistrictScore {
    /// Returns the score when it is a finite number.
    #[must_use]
    pub fn defined_score(&self) -> Option<f64> {
        self.risk_score.filter(|s| s.is_finite())
    }
}

/// A district score annotated with its session-relative risk tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRiskRecord {
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Precomputed continuous abnormality score.
    pub risk_score: f64,
    /// Tier derived from `risk_score` and the session thresholds.
    pub risk_level: RiskLevel,
}

/// A tiered district annotated with its recommended action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRow {
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Session-relative risk tier.
    pub risk_level: RiskLevel,
    /// Recommended operational action for the tier.
    pub recommendation: String,
}

/// One row per state, used for hotspot and ranking views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRiskRecord {
    /// State name.
    pub state: String,
    /// Aggregated state-level risk score. `None` when the cell was empty.
    pub risk_score: Option<f64>,
}

impl StateRiskRecord {
    /// Returns the score when it is a finite number.
    #[must_use]
    pub fn defined_score(&self) -> Option<f64> {
        self.risk_score.filter(|s| s.is_finite())
    }
}

/// Monthly biometric vs. demographic update volumes.
///
/// The input table may contain several rows per month (for example one per
/// state); consumers aggregate per month before charting or forecasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBehaviorRecord {
    /// Reporting month.
    pub month: YearMonth,
    /// Demographic update count.
    pub demo_total: i64,
    /// Biometric update count.
    pub bio_total: i64,
    /// Biometric/demographic ratio as supplied upstream. `None` when the
    /// cell was empty.
    pub bio_demo_ratio: Option<f64>,
    /// Demographic updates, ages 5-17.
    #[serde(default)]
    pub demo_age_5_17: Option<i64>,
    /// Demographic updates, ages 17 and over.
    #[serde(default)]
    pub demo_age_17_: Option<i64>,
    /// Biometric updates, ages 5-17.
    #[serde(default)]
    pub bio_age_5_17: Option<i64>,
    /// Biometric updates, ages 17 and over.
    #[serde(default)]
    pub bio_age_17_: Option<i64>,
}

impl MonthlyBehaviorRecord {
    /// Computes `bio_total / demo_total` from the raw counts.
    ///
    /// # Errors
    ///
    /// Returns [`DataQualityError::ZeroDemographic`] when `demo_total` is
    /// zero, since the ratio is undefined rather than zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn derived_ratio(&self) -> Result<f64, DataQualityError> {
        if self.demo_total == 0 {
            return Err(DataQualityError::ZeroDemographic {
                month: self.month,
                context: "monthly_behavior".to_string(),
            });
        }
        Ok(self.bio_total as f64 / self.demo_total as f64)
    }

    /// Returns the usable ratio for this row: the supplied value when it is
    /// finite, otherwise the ratio derived from the raw counts.
    ///
    /// # Errors
    ///
    /// Returns [`DataQualityError`] when neither source yields a defined
    /// ratio.
    pub fn ratio(&self) -> Result<f64, DataQualityError> {
        match self.bio_demo_ratio {
            Some(ratio) if ratio.is_finite() => Ok(ratio),
            _ => self.derived_ratio(),
        }
    }
}

/// A district-month flagged as abnormal by an upstream detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Reporting month.
    pub month: YearMonth,
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Biometric update count.
    pub bio_total: i64,
    /// Demographic update count.
    pub demo_total: i64,
    /// Biometric/demographic ratio. `None` when the cell was empty.
    pub bio_demo_ratio: Option<f64>,
}

impl AnomalyRecord {
    /// Returns the ratio when it is a finite number.
    #[must_use]
    pub fn defined_ratio(&self) -> Option<f64> {
        self.bio_demo_ratio.filter(|r| r.is_finite())
    }
}

/// Centroid coordinates for a state, used for hotspot mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateCoordinate {
    /// State name (join key).
    pub state: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// A single predicted value for a future month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Future month this prediction applies to.
    pub month: YearMonth,
    /// Unrounded predicted value.
    pub predicted_value: f64,
}

/// Recoverable data problems. Callers surface these as a missing value
/// rather than substituting a default number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataQualityError {
    /// A ratio was requested for a row whose demographic total is zero.
    #[error("bio/demo ratio undefined for {context} in {month}: demographic total is zero")]
    ZeroDemographic {
        /// Month of the offending row.
        month: YearMonth,
        /// Which table or view the row came from.
        context: String,
    },

    /// A district has no usable risk score (empty cell, NaN or infinite).
    #[error("risk score for {state}/{district} is missing or not a finite number")]
    UndefinedRiskScore {
        /// State of the offending row.
        state: String,
        /// District of the offending row.
        district: String,
    },

    /// A state has no usable risk score (empty cell, NaN or infinite).
    #[error("risk score for state '{state}' is missing or not a finite number")]
    UndefinedStateScore {
        /// The offending state.
        state: String,
    },

    /// A state has no entry in the coordinates table.
    #[error("no coordinates for state '{state}'")]
    MissingCoordinates {
        /// The state lacking a join partner.
        state: String,
    },
}
