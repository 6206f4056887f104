//! Descending risk rankings for districts and states.

use behavior_intel_behavior_models::{DataQualityError, DistrictRiskRecord, StateRiskRecord};

/// Returns the `limit` highest-scoring districts, highest first.
///
/// Equal scores keep their input order.
#[must_use]
pub fn rank_districts(tiered: &[DistrictRiskRecord], limit: usize) -> Vec<DistrictRiskRecord> {
    let mut ranked = tiered.to_vec();
    ranked.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    ranked.truncate(limit);
    ranked
}

/// Returns the `limit` riskiest states, highest first.
///
/// States without a finite score are left out, so a missing value is never
/// ranked as the riskiest state.
#[must_use]
pub fn top_states(states: &[StateRiskRecord], limit: usize) -> Vec<StateRiskRecord> {
    let mut ranked: Vec<(f64, &StateRiskRecord)> = states
        .iter()
        .filter_map(|s| {
            let score = s.defined_score();
            if score.is_none() {
                log::warn!(
                    "{}",
                    DataQualityError::UndefinedStateScore {
                        state: s.state.clone(),
                    }
                );
            }
            score.map(|score| (score, s))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, s)| s.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use behavior_intel_behavior_models::RiskLevel;

    use super::*;

    fn district(name: &str, score: f64) -> DistrictRiskRecord {
        DistrictRiskRecord {
            state: "Assam".to_string(),
            district: name.to_string(),
            risk_score: score,
            risk_level: RiskLevel::Low,
        }
    }

    #[test]
    fn ranks_districts_descending() {
        let ranked = rank_districts(
            &[district("a", 1.0), district("b", 3.0), district("c", 2.0)],
            10,
        );
        let names: Vec<&str> = ranked.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let ranked = rank_districts(&[district("x", 5.0), district("y", 5.0)], 10);
        assert_eq!(ranked[0].district, "x");
        assert_eq!(ranked[1].district, "y");
    }

    #[test]
    fn top_states_truncates() {
        let states: Vec<StateRiskRecord> = (0..15)
            .map(|i| StateRiskRecord {
                state: format!("S{i}"),
                risk_score: Some(f64::from(i)),
            })
            .collect();
        let top = top_states(&states, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].state, "S14");
        assert_eq!(top[9].state, "S5");
    }

    #[test]
    fn top_states_skip_undefined_scores() {
        let states = vec![
            StateRiskRecord {
                state: "Goa".to_string(),
                risk_score: Some(0.5),
            },
            StateRiskRecord {
                state: "Kerala".to_string(),
                risk_score: Some(f64::NAN),
            },
            StateRiskRecord {
                state: "Ladakh".to_string(),
                risk_score: None,
            },
            StateRiskRecord {
                state: "Assam".to_string(),
                risk_score: Some(0.9),
            },
        ];
        let names: Vec<String> = top_states(&states, 10).into_iter().map(|s| s.state).collect();
        assert_eq!(names, vec!["Assam", "Goa"]);
    }
}
