//! Counting and filtering of flagged district-months.

use std::collections::BTreeMap;

use behavior_intel_behavior_models::{AnomalyRecord, YearMonth};
use serde::{Deserialize, Serialize};

use crate::AnomalyError;

/// Selector value meaning "no filter".
pub const ALL: &str = "All";

/// Number of anomalies in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    /// Reporting month.
    pub month: YearMonth,
    /// Anomalies flagged in that month.
    pub count: usize,
}

/// Number of anomalies in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCount {
    /// State name.
    pub state: String,
    /// Anomalies flagged in that state.
    pub count: usize,
}

/// Independent optional equality filters over the anomaly table.
///
/// `None` passes every row through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFilter {
    /// Keep only rows from this month.
    pub month: Option<YearMonth>,
    /// Keep only rows from this state.
    pub state: Option<String>,
}

impl AnomalyFilter {
    /// Builds a filter from selector strings, where `"All"` (or nothing)
    /// disables the corresponding filter.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::InvalidMonth`] if `month` is neither `"All"`
    /// nor a parseable month.
    pub fn from_selection(month: Option<&str>, state: Option<&str>) -> Result<Self, AnomalyError> {
        let month = match month.map(str::trim) {
            None | Some(ALL | "") => None,
            Some(m) => Some(m.parse()?),
        };
        let state = match state.map(str::trim) {
            None | Some(ALL | "") => None,
            Some(s) => Some(s.to_string()),
        };
        Ok(Self { month, state })
    }

    /// Returns `true` if `row` passes every active filter.
    #[must_use]
    pub fn matches(&self, row: &AnomalyRecord) -> bool {
        self.month.is_none_or(|m| row.month == m)
            && self.state.as_deref().is_none_or(|s| row.state == s)
    }
}

/// Counts anomalies per month, in chronological month order.
#[must_use]
pub fn count_by_month(anomalies: &[AnomalyRecord]) -> Vec<MonthCount> {
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for row in anomalies {
        *counts.entry(row.month).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}

/// Counts anomalies per state, most affected first (ties by state name).
#[must_use]
pub fn count_by_state(anomalies: &[AnomalyRecord]) -> Vec<StateCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in anomalies {
        *counts.entry(row.state.as_str()).or_default() += 1;
    }
    let mut out: Vec<StateCount> = counts
        .into_iter()
        .map(|(state, count)| StateCount {
            state: state.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Returns the rows passing `filter`, in their original relative order.
#[must_use]
pub fn filter(anomalies: &[AnomalyRecord], filter: &AnomalyFilter) -> Vec<AnomalyRecord> {
    anomalies
        .iter()
        .filter(|row| filter.matches(row))
        .cloned()
        .collect()
}

/// Stable sort descending by `bio_demo_ratio`. Rows with an undefined
/// ratio sort last.
pub fn sort_by_ratio_desc(rows: &mut [AnomalyRecord]) {
    rows.sort_by(|a, b| match (a.defined_ratio(), b.defined_ratio()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Filters, then sorts the result for display (highest ratio first).
#[must_use]
pub fn filter_sorted(anomalies: &[AnomalyRecord], selection: &AnomalyFilter) -> Vec<AnomalyRecord> {
    let mut rows = filter(anomalies, selection);
    sort_by_ratio_desc(&mut rows);
    log::debug!(
        "Anomaly filter {selection:?} kept {} of {} rows",
        rows.len(),
        anomalies.len()
    );
    rows
}

/// Distinct months present in the table, chronological.
#[must_use]
pub fn distinct_months(anomalies: &[AnomalyRecord]) -> Vec<YearMonth> {
    count_by_month(anomalies).into_iter().map(|c| c.month).collect()
}

/// Distinct states present in the table, alphabetical.
#[must_use]
pub fn distinct_states(anomalies: &[AnomalyRecord]) -> Vec<String> {
    let mut states: Vec<String> = anomalies.iter().map(|a| a.state.clone()).collect();
    states.sort();
    states.dedup();
    states
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: &str, state: &str, district: &str, ratio: Option<f64>) -> AnomalyRecord {
        AnomalyRecord {
            month: month.parse().unwrap(),
            state: state.to_string(),
            district: district.to_string(),
            bio_total: 100,
            demo_total: 50,
            bio_demo_ratio: ratio,
        }
    }

    fn sample() -> Vec<AnomalyRecord> {
        vec![
            row("2023-10", "Punjab", "Amritsar", Some(2.0)),
            row("2023-05", "Punjab", "Ludhiana", Some(1.5)),
            row("2023-9", "Odisha", "Puri", Some(3.1)),
            row("2023-05", "Odisha", "Cuttack", Some(4.2)),
            row("2023-05", "Punjab", "Patiala", None),
        ]
    }

    #[test]
    fn counts_sum_to_table_length() {
        let rows = sample();
        let counts = count_by_month(&rows);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), rows.len());
        assert_eq!(count_by_month(&[]).len(), 0);
    }

    #[test]
    fn counts_are_chronological() {
        let counts = count_by_month(&sample());
        let months: Vec<String> = counts.iter().map(|c| c.month.to_string()).collect();
        assert_eq!(months, vec!["2023-05", "2023-09", "2023-10"]);
        assert_eq!(counts[0].count, 3);
    }

    #[test]
    fn month_filter_with_all_states_keeps_original_order() {
        let selection = AnomalyFilter::from_selection(Some("2023-05"), Some("All")).unwrap();
        let rows = filter(&sample(), &selection);
        let districts: Vec<&str> = rows.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, vec!["Ludhiana", "Cuttack", "Patiala"]);
    }

    #[test]
    fn state_filter_narrows_further() {
        let selection = AnomalyFilter::from_selection(Some("2023-05"), Some("Odisha")).unwrap();
        let rows = filter(&sample(), &selection);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].district, "Cuttack");
    }

    #[test]
    fn empty_filter_passes_everything() {
        let rows = sample();
        assert_eq!(filter(&rows, &AnomalyFilter::default()), rows);
    }

    #[test]
    fn invalid_month_selection_is_rejected() {
        assert!(AnomalyFilter::from_selection(Some("May"), None).is_err());
    }

    #[test]
    fn filter_sorted_orders_by_ratio_desc_with_undefined_last() {
        let selection = AnomalyFilter::from_selection(Some("2023-05"), None).unwrap();
        let rows = filter_sorted(&sample(), &selection);
        let districts: Vec<&str> = rows.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, vec!["Cuttack", "Ludhiana", "Patiala"]);
    }

    #[test]
    fn counts_by_state_most_affected_first() {
        let counts = count_by_state(&sample());
        assert_eq!(counts[0].state, "Punjab");
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[1].state, "Odisha");
    }

    #[test]
    fn distinct_selectors() {
        let rows = sample();
        assert_eq!(distinct_states(&rows), vec!["Odisha", "Punjab"]);
        assert_eq!(distinct_months(&rows).len(), 3);
    }
}
