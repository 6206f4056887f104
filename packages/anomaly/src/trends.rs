//! Month-level trend series over the monthly behaviour table.

use std::collections::BTreeMap;

use behavior_intel_behavior_models::{MonthlyBehaviorRecord, YearMonth};
use serde::{Deserialize, Serialize};

/// Update volumes summed over every row of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Reporting month.
    pub month: YearMonth,
    /// Summed demographic updates.
    pub demo_total: i64,
    /// Summed biometric updates.
    pub bio_total: i64,
}

/// Mean biometric/demographic ratio for a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    /// Reporting month.
    pub month: YearMonth,
    /// Mean of the month's defined ratios.
    pub bio_demo_ratio: f64,
}

/// Month-over-month biometric growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Reporting month.
    pub month: YearMonth,
    /// Biometric total for the month.
    pub bio_total: i64,
    /// Percentage change from the previous month. `None` for the first
    /// month and after a zero-volume month.
    #[serde(rename = "bio_growth_%")]
    pub bio_growth_pct: Option<f64>,
}

/// Sums demographic and biometric volumes per month, chronologically.
#[must_use]
pub fn monthly_totals(monthly: &[MonthlyBehaviorRecord]) -> Vec<MonthlyTotals> {
    let mut sums: BTreeMap<YearMonth, (i64, i64)> = BTreeMap::new();
    for row in monthly {
        let entry = sums.entry(row.month).or_default();
        entry.0 += row.demo_total;
        entry.1 += row.bio_total;
    }
    sums.into_iter()
        .map(|(month, (demo_total, bio_total))| MonthlyTotals {
            month,
            demo_total,
            bio_total,
        })
        .collect()
}

/// Mean ratio per month, chronologically.
///
/// Rows whose ratio is undefined are left out of the mean. A month with no
/// defined ratio at all is omitted rather than reported as zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn monthly_ratio_trend(monthly: &[MonthlyBehaviorRecord]) -> Vec<RatioPoint> {
    let mut acc: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in monthly {
        match row.ratio() {
            Ok(ratio) => {
                let entry = acc.entry(row.month).or_default();
                entry.0 += ratio;
                entry.1 += 1;
            }
            Err(e) => {
                log::debug!("Skipping row: {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("{skipped} monthly rows have an undefined bio/demo ratio");
    }

    acc.into_iter()
        .map(|(month, (sum, n))| RatioPoint {
            month,
            bio_demo_ratio: sum / n as f64,
        })
        .collect()
}

/// Percentage change of the biometric total against the previous month.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn biometric_growth(totals: &[MonthlyTotals]) -> Vec<GrowthPoint> {
    let mut prev: Option<i64> = None;
    totals
        .iter()
        .map(|t| {
            let bio_growth_pct = prev
                .filter(|p| *p != 0)
                .map(|p| (t.bio_total - p) as f64 / p as f64 * 100.0);
            prev = Some(t.bio_total);
            GrowthPoint {
                month: t.month,
                bio_total: t.bio_total,
                bio_growth_pct,
            }
        })
        .collect()
}
