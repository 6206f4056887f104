//! Risk tier to recommended action mapping.

use std::str::FromStr as _;

use behavior_intel_behavior_models::{DistrictRiskRecord, RecommendationRow, RiskLevel};

use crate::RiskError;

/// Returns the recommended action for a risk tier.
#[must_use]
pub const fn recommend(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "Increase centers + Audit infrastructure",
        RiskLevel::Medium => "Monitor & prepare resources",
        RiskLevel::Low => "Normal operations",
    }
}

/// Returns the recommended action for a tier given by its label
/// (`"HIGH"`, `"MEDIUM"`, `"LOW"`).
///
/// # Errors
///
/// Returns [`RiskError::UnknownRiskLevel`] for any other label. Such a
/// label can only come from a broken classification upstream, so callers
/// should abort the view rather than fall back to a default action.
pub fn recommend_label(label: &str) -> Result<&'static str, RiskError> {
    RiskLevel::from_str(label)
        .map(recommend)
        .map_err(|_| RiskError::UnknownRiskLevel {
            label: label.to_string(),
        })
}

/// Annotates the first `limit` tiered districts with their recommended
/// action, preserving input order.
#[must_use]
pub fn recommendations(tiered: &[DistrictRiskRecord], limit: usize) -> Vec<RecommendationRow> {
    tiered
        .iter()
        .take(limit)
        .map(|r| RecommendationRow {
            state: r.state.clone(),
            district: r.district.clone(),
            risk_level: r.risk_level,
            recommendation: recommend(r.risk_level).to_string(),
        })
        .collect()
}
