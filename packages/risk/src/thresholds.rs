//! Corpus-relative quantile thresholds and tier classification.

use behavior_intel_behavior_models::{
    DataQualityError, DistrictRiskRecord, DistrictScore, RiskLevel,
};
use serde::{Deserialize, Serialize};

use crate::RiskError;

/// Percentile used for the HIGH cut point.
pub const HIGH_PERCENTILE: f64 = 0.85;

/// Percentile used for the MEDIUM cut point.
pub const MEDIUM_PERCENTILE: f64 = 0.60;

/// The two cut points used to tier risk scores.
///
/// Computed once per session from the full district corpus and reused for
/// every classification within that session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// 85th percentile of the corpus. Scores at or above are HIGH.
    pub high: f64,
    /// 60th percentile of the corpus. Scores at or above are MEDIUM.
    pub medium: f64,
}

impl RiskThresholds {
    /// Computes thresholds from a district corpus.
    ///
    /// Districts without a finite score are left out of the corpus.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::EmptyCorpus`] if no district has a finite score.
    pub fn from_corpus(corpus: &[DistrictScore]) -> Result<Self, RiskError> {
        let scores: Vec<f64> = corpus
            .iter()
            .filter_map(DistrictScore::defined_score)
            .collect();

        let skipped = corpus.len() - scores.len();
        if skipped > 0 {
            log::warn!(
                "{skipped} district(s) without a usable risk score left out of the thresholds"
            );
        }

        let (high, medium) = compute_thresholds(&scores)?;
        Ok(Self { high, medium })
    }

    /// Classifies a score against these thresholds.
    #[must_use]
    pub fn classify(&self, score: f64) -> RiskLevel {
        classify(score, self.high, self.medium)
    }
}

/// Returns the `p`-quantile (`0.0..=1.0`) of `values` using linear
/// interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - rank.floor();

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Computes `(q_high, q_medium)`: the 85th and 60th percentiles of
/// `scores`.
///
/// # Errors
///
/// Returns [`RiskError::EmptyCorpus`] if `scores` is empty and
/// [`RiskError::NonFiniteScore`] if any score is NaN or infinite.
pub fn compute_thresholds(scores: &[f64]) -> Result<(f64, f64), RiskError> {
    if let Some((idx, bad)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(RiskError::NonFiniteScore {
            district: format!("row {idx}"),
            score: *bad,
        });
    }

    let high = percentile(scores, HIGH_PERCENTILE).ok_or(RiskError::EmptyCorpus)?;
    let medium = percentile(scores, MEDIUM_PERCENTILE).ok_or(RiskError::EmptyCorpus)?;

    log::debug!(
        "Risk thresholds over {} scores: high={high:.4} medium={medium:.4}",
        scores.len()
    );

    Ok((high, medium))
}

/// Classifies a single score. Ties at a threshold go to the higher tier.
#[must_use]
pub fn classify(score: f64, q_high: f64, q_medium: f64) -> RiskLevel {
    if score >= q_high {
        RiskLevel::High
    } else if score >= q_medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Districts with their tiers, plus the ones that could not be tiered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TieredDistricts {
    /// Districts with a finite score, in input order.
    pub districts: Vec<DistrictRiskRecord>,
    /// One [`DataQualityError::UndefinedRiskScore`] per district whose score
    /// was missing or not finite.
    pub untiered: Vec<DataQualityError>,
}

/// Annotates every district with its tier under `thresholds`.
///
/// `districts` may be any subset of the corpus the thresholds were
/// computed from; the thresholds themselves are never recomputed here.
/// A district without a finite score gets no tier and is reported in
/// [`TieredDistricts::untiered`] instead.
#[must_use]
pub fn tier_districts(
    districts: &[DistrictScore],
    thresholds: &RiskThresholds,
) -> TieredDistricts {
    let mut tiered = TieredDistricts::default();

    for d in districts {
        if let Some(score) = d.defined_score() {
            tiered.districts.push(DistrictRiskRecord {
                state: d.state.clone(),
                district: d.district.clone(),
                risk_score: score,
                risk_level: thresholds.classify(score),
            });
        } else {
            let err = DataQualityError::UndefinedRiskScore {
                state: d.state.clone(),
                district: d.district.clone(),
            };
            log::warn!("Leaving district untiered: {err}");
            tiered.untiered.push(err);
        }
    }

    tiered
}
