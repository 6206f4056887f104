//! Historical and predicted series types.

use std::collections::BTreeMap;

use behavior_intel_behavior_models::{ForecastPoint, MonthlyBehaviorRecord, YearMonth};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ForecastError;

/// Which of the three forecast metrics a series carries.
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
pub enum SeriesKind {
    /// Biometric update volume.
    Biometric,
    /// Demographic update volume.
    Demographic,
    /// Biometric/demographic ratio.
    Ratio,
}

/// Number of future months to forecast, `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ForecastHorizon(u8);

impl ForecastHorizon {
    /// Smallest accepted horizon.
    pub const MIN: i64 = 1;
    /// Largest accepted horizon.
    pub const MAX: i64 = 12;
    /// Horizon used when none is requested.
    pub const DEFAULT: Self = Self(3);

    /// Validates a horizon.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidHorizon`] outside `1..=12`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(months: i64) -> Result<Self, ForecastError> {
        if (Self::MIN..=Self::MAX).contains(&months) {
            Ok(Self(months as u8))
        } else {
            Err(ForecastError::InvalidHorizon { horizon: months })
        }
    }

    /// Horizon length in months.
    #[must_use]
    pub fn months(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for ForecastHorizon {
    type Error = ForecastError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ForecastHorizon> for i64 {
    fn from(value: ForecastHorizon) -> Self {
        Self::from(value.0)
    }
}

/// A chronologically ordered historical series, one value per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Metric carried by this series.
    pub kind: SeriesKind,
    /// `(month, value)` pairs, strictly increasing by month.
    pub points: Vec<(YearMonth, f64)>,
    /// Last month of the source table. Forecasts start the month after,
    /// even when this series has no value for it, so that all three
    /// series predict the same future months.
    pub through: YearMonth,
}

impl TimeSeries {
    /// Number of historical months.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Historical values in chronological order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }
}

/// Predicted future points for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Metric carried by this series.
    pub kind: SeriesKind,
    /// Future points, chronological.
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// The trailing `n` points (all of them if fewer exist).
    #[must_use]
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        &self.points[self.points.len().saturating_sub(n)..]
    }
}

/// The three historical series the forecaster is run over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Biometric totals summed per month.
    pub biometric: TimeSeries,
    /// Demographic totals summed per month.
    pub demographic: TimeSeries,
    /// Mean defined ratio per month. Months whose ratio is undefined are
    /// absent rather than zero.
    pub ratio: TimeSeries,
}

impl History {
    /// Aggregates the monthly behaviour table into per-month series.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Unavailable`] if the table is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_monthly(monthly: &[MonthlyBehaviorRecord]) -> Result<Self, ForecastError> {
        #[derive(Default)]
        struct MonthAccum {
            bio: i64,
            demo: i64,
            ratio_sum: f64,
            ratio_n: usize,
        }

        let mut by_month: BTreeMap<YearMonth, MonthAccum> = BTreeMap::new();
        let mut undefined = 0usize;

        for row in monthly {
            let acc = by_month.entry(row.month).or_default();
            acc.bio += row.bio_total;
            acc.demo += row.demo_total;
            match row.ratio() {
                Ok(r) => {
                    acc.ratio_sum += r;
                    acc.ratio_n += 1;
                }
                Err(_) => undefined += 1,
            }
        }

        let Some(through) = by_month.keys().next_back().copied() else {
            return Err(ForecastError::Unavailable {
                series: SeriesKind::Biometric,
                reason: "monthly behaviour table is empty".to_string(),
            });
        };

        if undefined > 0 {
            log::warn!("{undefined} monthly rows excluded from the ratio history (undefined ratio)");
        }

        let mut biometric = Vec::with_capacity(by_month.len());
        let mut demographic = Vec::with_capacity(by_month.len());
        let mut ratio = Vec::with_capacity(by_month.len());

        for (month, acc) in by_month {
            biometric.push((month, acc.bio as f64));
            demographic.push((month, acc.demo as f64));
            if acc.ratio_n > 0 {
                ratio.push((month, acc.ratio_sum / acc.ratio_n as f64));
            }
        }

        Ok(Self {
            biometric: TimeSeries {
                kind: SeriesKind::Biometric,
                points: biometric,
                through,
            },
            demographic: TimeSeries {
                kind: SeriesKind::Demographic,
                points: demographic,
                through,
            },
            ratio: TimeSeries {
                kind: SeriesKind::Ratio,
                points: ratio,
                through,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: &str, demo: i64, bio: i64) -> MonthlyBehaviorRecord {
        MonthlyBehaviorRecord {
            month: month.parse().unwrap(),
            demo_total: demo,
            bio_total: bio,
            bio_demo_ratio: None,
            demo_age_5_17: None,
            demo_age_17_: None,
            bio_age_5_17: None,
            bio_age_17_: None,
        }
    }

    #[test]
    fn horizon_bounds() {
        assert!(ForecastHorizon::new(0).is_err());
        assert!(ForecastHorizon::new(13).is_err());
        assert_eq!(ForecastHorizon::new(12).unwrap().months(), 12);
        assert_eq!(ForecastHorizon::default().months(), 3);
    }

    #[test]
    fn horizon_deserialize_validates() {
        assert!(serde_json::from_str::<ForecastHorizon>("6").is_ok());
        assert!(serde_json::from_str::<ForecastHorizon>("24").is_err());
    }

    #[test]
    fn history_aggregates_per_month() {
        let history = History::from_monthly(&[
            row("2023-02", 10, 30),
            row("2023-01", 10, 10),
            row("2023-02", 10, 10),
        ])
        .unwrap();
        assert_eq!(history.biometric.values(), vec![10.0, 40.0]);
        assert_eq!(history.demographic.values(), vec![10.0, 20.0]);
        assert_eq!(history.ratio.values(), vec![1.0, 2.0]);
        assert_eq!(history.ratio.through.to_string(), "2023-02");
    }

    #[test]
    fn undefined_ratio_month_is_absent_but_through_is_kept() {
        let history =
            History::from_monthly(&[row("2023-01", 10, 20), row("2023-02", 0, 5)]).unwrap();
        assert_eq!(history.ratio.len(), 1);
        assert_eq!(history.ratio.through.to_string(), "2023-02");
        assert_eq!(history.biometric.len(), 2);
    }

    #[test]
    fn empty_table_is_unavailable() {
        let err = History::from_monthly(&[]).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn tail_clamps_to_length() {
        let series = ForecastSeries {
            kind: SeriesKind::Ratio,
            points: vec![ForecastPoint {
                month: "2024-01".parse().unwrap(),
                predicted_value: 1.0,
            }],
        };
        assert_eq!(series.tail(5).len(), 1);
    }
}
