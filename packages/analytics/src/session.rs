//! Session-scoped analysis state.

use behavior_intel_behavior_models::{DataQualityError, DistrictRiskRecord, RiskLevel};
use behavior_intel_forecast::ForecastHorizon;
use behavior_intel_ingest::{DataPaths, Tables, load_tables};
use behavior_intel_risk::{RiskError, RiskThresholds, TieredDistricts, tier_districts};

use crate::AnalyticsError;

/// Thresholds and the tiered district table derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiering {
    /// Cut points computed from the full district corpus.
    pub thresholds: RiskThresholds,
    /// Every district with a usable score and its tier, in input order.
    pub districts: Vec<DistrictRiskRecord>,
    /// Districts left untiered because their score is missing or not finite.
    pub untiered: Vec<DataQualityError>,
}

/// One analysis session over a snapshot of the input tables.
///
/// Thresholds are computed exactly once, at construction, from the full
/// unfiltered district corpus. A tiering failure is kept and reported by
/// the views that need tiers; views that do not (trends, anomalies, geo,
/// forecast) keep working.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    tables: Tables,
    tiering: Result<Tiering, RiskError>,
    default_horizon: ForecastHorizon,
}

impl AnalysisSession {
    /// Builds a session and tiers the district corpus.
    #[must_use]
    pub fn new(tables: Tables) -> Self {
        let tiering = RiskThresholds::from_corpus(&tables.district_risk).map(|thresholds| {
            let TieredDistricts {
                districts,
                untiered,
            } = tier_districts(&tables.district_risk, &thresholds);
            Tiering {
                thresholds,
                districts,
                untiered,
            }
        });

        match &tiering {
            Ok(t) => log::info!(
                "Tiered {} districts, {} untiered (q_high={:.4}, q_medium={:.4})",
                t.districts.len(),
                t.untiered.len(),
                t.thresholds.high,
                t.thresholds.medium
            ),
            Err(e) => log::error!("Risk tiering unavailable for this session: {e}"),
        }

        Self {
            tables,
            tiering,
            default_horizon: ForecastHorizon::DEFAULT,
        }
    }

    /// Loads the input tables from `paths` and builds a session.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Ingest`] if any table cannot be read.
    pub fn load(paths: &DataPaths) -> Result<Self, AnalyticsError> {
        Ok(Self::new(load_tables(paths)?))
    }

    /// Sets the forecast horizon used when a request does not name one.
    #[must_use]
    pub const fn with_default_horizon(mut self, horizon: ForecastHorizon) -> Self {
        self.default_horizon = horizon;
        self
    }

    /// The forecast horizon used when a request does not name one.
    #[must_use]
    pub const fn default_horizon(&self) -> ForecastHorizon {
        self.default_horizon
    }

    /// The input tables.
    #[must_use]
    pub const fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Thresholds and tiered districts.
    ///
    /// # Errors
    ///
    /// Returns the [`RiskError`] raised when the session was built.
    pub fn tiering(&self) -> Result<&Tiering, RiskError> {
        self.tiering.as_ref().map_err(Clone::clone)
    }

    /// Session thresholds.
    ///
    /// # Errors
    ///
    /// Returns the [`RiskError`] raised when the session was built.
    pub fn thresholds(&self) -> Result<RiskThresholds, RiskError> {
        self.tiering().map(|t| t.thresholds)
    }

    /// Every district with its tier.
    ///
    /// # Errors
    ///
    /// Returns the [`RiskError`] raised when the session was built.
    pub fn tiered(&self) -> Result<&[DistrictRiskRecord], RiskError> {
        self.tiering().map(|t| t.districts.as_slice())
    }

    /// Districts that could not be tiered.
    ///
    /// # Errors
    ///
    /// Returns the [`RiskError`] raised when the session was built.
    pub fn untiered(&self) -> Result<&[DataQualityError], RiskError> {
        self.tiering().map(|t| t.untiered.as_slice())
    }

    /// Classifies an arbitrary score against the session thresholds.
    ///
    /// # Errors
    ///
    /// Returns the [`RiskError`] raised when the session was built.
    pub fn classify(&self, score: f64) -> Result<RiskLevel, RiskError> {
        self.thresholds().map(|t| t.classify(score))
    }
}

#[cfg(test)]
mod tests {
    use behavior_intel_behavior_models::DistrictScore;

    use super::*;

    fn tables(scores: &[f64]) -> Tables {
        tables_with(&scores.iter().copied().map(Some).collect::<Vec<_>>())
    }

    fn tables_with(scores: &[Option<f64>]) -> Tables {
        Tables {
            district_risk: scores
                .iter()
                .enumerate()
                .map(|(i, s)| DistrictScore {
                    state: "Sikkim".to_string(),
                    district: format!("D{i}"),
                    risk_score: *s,
                })
                .collect(),
            ..Tables::default()
        }
    }

    #[test]
    fn thresholds_computed_once_from_full_corpus() {
        let session = AnalysisSession::new(tables(&[10.0, 20.0, 30.0, 90.0, 95.0]));
        let t = session.thresholds().unwrap();
        assert!((t.high - 92.0).abs() < 1e-9);
        assert!((t.medium - 54.0).abs() < 1e-9);
        assert_eq!(session.classify(60.0).unwrap(), RiskLevel::Medium);
    }

    #[test]
    fn empty_corpus_fails_only_tiering() {
        let session = AnalysisSession::new(tables(&[]));
        assert_eq!(session.thresholds(), Err(RiskError::EmptyCorpus));
        assert!(session.tiered().is_err());
        assert!(session.tables().anomalies.is_empty());
    }

    #[test]
    fn undefined_scores_are_untiered_not_fatal() {
        let session = AnalysisSession::new(tables_with(&[
            Some(10.0),
            None,
            Some(20.0),
            Some(30.0),
            Some(f64::NAN),
            Some(90.0),
            Some(95.0),
        ]));
        let t = session.thresholds().unwrap();
        assert!((t.high - 92.0).abs() < 1e-9);
        assert_eq!(session.tiered().unwrap().len(), 5);
        assert_eq!(
            session.untiered().unwrap(),
            &[
                DataQualityError::UndefinedRiskScore {
                    state: "Sikkim".to_string(),
                    district: "D1".to_string(),
                },
                DataQualityError::UndefinedRiskScore {
                    state: "Sikkim".to_string(),
                    district: "D4".to_string(),
                },
            ]
        );
    }

    #[test]
    fn default_horizon_is_configurable() {
        let session = AnalysisSession::new(tables(&[1.0]))
            .with_default_horizon(ForecastHorizon::new(6).unwrap());
        assert_eq!(session.default_horizon().months(), 6);
    }
}
