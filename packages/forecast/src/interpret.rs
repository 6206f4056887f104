//! Turns forecast series into a trend verdict and a summary table.
//!
//! The verdict compares the mean of the last three historical ratio points
//! with the mean of the predicted ratio over the whole horizon. Rounding
//! only happens when the summary table is built; the verdict always uses
//! unrounded means.

use behavior_intel_behavior_models::{ForecastPoint, ForecastVerdict, YearMonth};
use serde::{Deserialize, Serialize};

use crate::{ForecastError, ForecastHorizon, ForecastSeries, SeriesKind, TimeSeries};

/// Number of trailing historical points averaged into the current ratio.
pub const CURRENT_WINDOW: usize = 3;

/// Multiplicative growth cut points for the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictThresholds {
    /// Future ratio must exceed `current * high` for a high increase.
    pub high: f64,
    /// Future ratio must exceed `current * moderate` for a moderate increase.
    pub moderate: f64,
}

impl VerdictThresholds {
    /// 15% and 5% growth.
    pub const STANDARD: Self = Self {
        high: 1.15,
        moderate: 1.05,
    };

    /// Compares `future` against `current`. Both comparisons are strict.
    #[must_use]
    pub fn verdict(&self, current: f64, future: f64) -> ForecastVerdict {
        if future > current * self.high {
            ForecastVerdict::HighIncrease
        } else if future > current * self.moderate {
            ForecastVerdict::ModerateIncrease
        } else {
            ForecastVerdict::Stable
        }
    }
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Verdict under the standard 15% / 5% thresholds.
#[must_use]
pub fn verdict(current: f64, future: f64) -> ForecastVerdict {
    VerdictThresholds::STANDARD.verdict(current, future)
}

/// One presentation row of the forecast summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummaryRow {
    /// Future month.
    #[serde(rename = "Month")]
    pub month: YearMonth,
    /// Predicted biometric updates, rounded to a whole unit.
    #[serde(rename = "Predicted_Biometric")]
    pub predicted_biometric: i64,
    /// Predicted demographic updates, rounded to a whole unit.
    #[serde(rename = "Predicted_Demographic")]
    pub predicted_demographic: i64,
    /// Predicted ratio, rounded to two decimals.
    #[serde(rename = "Predicted_Ratio")]
    pub predicted_ratio: f64,
}

/// Everything the forecast view needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Months forecast.
    pub horizon: ForecastHorizon,
    /// Mean of the trailing historical ratio points.
    pub current_ratio: f64,
    /// Mean of the predicted ratio over the horizon.
    pub future_ratio: f64,
    /// Trend verdict.
    pub verdict: ForecastVerdict,
    /// Human-readable interpretation of the verdict.
    pub message: String,
    /// Rounded per-month summary.
    pub table: Vec<ForecastSummaryRow>,
    /// Unrounded biometric forecast.
    pub biometric: ForecastSeries,
    /// Unrounded demographic forecast.
    pub demographic: ForecastSeries,
    /// Unrounded ratio forecast.
    pub ratio: ForecastSeries,
}

impl ForecastReport {
    /// Prediction for the last month of the horizon.
    #[must_use]
    pub fn latest(&self) -> Option<&ForecastSummaryRow> {
        self.table.last()
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

/// Mean of the last [`CURRENT_WINDOW`] historical ratio values, or of all
/// of them when fewer exist.
///
/// # Errors
///
/// Returns [`ForecastError::Unavailable`] when there is no historical ratio.
pub fn current_ratio(historical: &[f64]) -> Result<f64, ForecastError> {
    let tail = &historical[historical.len().saturating_sub(CURRENT_WINDOW)..];
    mean(tail.iter().copied()).ok_or_else(|| ForecastError::Unavailable {
        series: SeriesKind::Ratio,
        reason: "no historical ratio points".to_string(),
    })
}

/// Mean of the last `horizon` predicted ratio points.
///
/// # Errors
///
/// Returns [`ForecastError::Misaligned`] when the forecast is shorter than
/// the horizon.
pub fn future_ratio(
    forecast: &ForecastSeries,
    horizon: ForecastHorizon,
) -> Result<f64, ForecastError> {
    let window = horizon_window(forecast, horizon)?;
    mean(window.iter().map(|p| p.predicted_value)).ok_or_else(|| ForecastError::Misaligned {
        message: "empty ratio forecast".to_string(),
    })
}

fn horizon_window(
    series: &ForecastSeries,
    horizon: ForecastHorizon,
) -> Result<&[ForecastPoint], ForecastError> {
    if series.points.len() < horizon.months() {
        return Err(ForecastError::Misaligned {
            message: format!(
                "{} forecast has {} points, horizon is {}",
                series.kind,
                series.points.len(),
                horizon.months()
            ),
        });
    }
    if let Some(bad) = series.points.iter().find(|p| !p.predicted_value.is_finite()) {
        return Err(ForecastError::Unavailable {
            series: series.kind,
            reason: format!("non-finite prediction for {}", bad.month),
        });
    }
    Ok(series.tail(horizon.months()))
}

#[allow(clippy::cast_possible_truncation)]
fn round_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Builds the per-month summary for the trailing `horizon` months.
///
/// # Errors
///
/// Returns [`ForecastError::Misaligned`] if any series is shorter than the
/// horizon or the series disagree on their months.
pub fn summary_table(
    biometric: &ForecastSeries,
    demographic: &ForecastSeries,
    ratio: &ForecastSeries,
    horizon: ForecastHorizon,
) -> Result<Vec<ForecastSummaryRow>, ForecastError> {
    let bio = horizon_window(biometric, horizon)?;
    let demo = horizon_window(demographic, horizon)?;
    let rat = horizon_window(ratio, horizon)?;

    bio.iter()
        .zip(demo)
        .zip(rat)
        .map(|((b, d), r)| {
            if b.month != d.month || b.month != r.month {
                return Err(ForecastError::Misaligned {
                    message: format!(
                        "months differ: biometric {}, demographic {}, ratio {}",
                        b.month, d.month, r.month
                    ),
                });
            }
            Ok(ForecastSummaryRow {
                month: b.month,
                predicted_biometric: round_whole(b.predicted_value),
                predicted_demographic: round_whole(d.predicted_value),
                predicted_ratio: round_2dp(r.predicted_value),
            })
        })
        .collect()
}

/// Interprets three forecast series against the historical ratio.
///
/// # Errors
///
/// Returns [`ForecastError`] when the history is empty or the forecasts
/// are incomplete or misaligned. No verdict is produced from partial data.
pub fn interpret(
    historical_ratio: &TimeSeries,
    biometric: &ForecastSeries,
    demographic: &ForecastSeries,
    ratio: &ForecastSeries,
    horizon: ForecastHorizon,
) -> Result<ForecastReport, ForecastError> {
    let table = summary_table(biometric, demographic, ratio, horizon)?;
    let current = current_ratio(&historical_ratio.values())?;
    let future = future_ratio(ratio, horizon)?;
    let verdict = verdict(current, future);

    Ok(ForecastReport {
        horizon,
        current_ratio: current,
        future_ratio: future,
        verdict,
        message: verdict.message().to_string(),
        table,
        biometric: biometric.clone(),
        demographic: demographic.clone(),
        ratio: ratio.clone(),
    })
}

#[cfg(test)]
mod tests {
    use crate::{Forecaster, History, forecast_all};

    use super::*;

    fn forecast(kind: SeriesKind, start: &str, values: &[f64]) -> ForecastSeries {
        let first: YearMonth = start.parse().unwrap();
        let mut months = vec![first];
        months.extend(first.following(values.len().saturating_sub(1)));
        ForecastSeries {
            kind,
            points: months
                .into_iter()
                .zip(values)
                .map(|(month, v)| ForecastPoint {
                    month,
                    predicted_value: *v,
                })
                .collect(),
        }
    }

    fn ratio_history(values: &[f64]) -> TimeSeries {
        let first: YearMonth = "2023-01".parse().unwrap();
        let mut months = vec![first];
        months.extend(first.following(values.len().saturating_sub(1)));
        let through = *months.last().unwrap();
        TimeSeries {
            kind: SeriesKind::Ratio,
            points: months.into_iter().zip(values.iter().copied()).collect(),
            through,
        }
    }

    #[test]
    fn verdict_boundaries() {
        assert_eq!(verdict(1.0, 1.16), ForecastVerdict::HighIncrease);
        assert_eq!(verdict(1.0, 1.06), ForecastVerdict::ModerateIncrease);
        assert_eq!(verdict(1.0, 1.00), ForecastVerdict::Stable);
        assert_eq!(verdict(1.0, 1.05), ForecastVerdict::Stable);
        assert_eq!(verdict(1.0, 0.5), ForecastVerdict::Stable);
    }

    #[test]
    fn custom_thresholds_change_sensitivity() {
        let strict = VerdictThresholds {
            high: 1.02,
            moderate: 1.01,
        };
        assert_eq!(strict.verdict(1.0, 1.03), ForecastVerdict::HighIncrease);
    }

    #[test]
    fn current_ratio_uses_last_three() {
        let r = current_ratio(&[10.0, 1.0, 2.0, 3.0]).unwrap();
        assert!((r - 2.0).abs() < 1e-12);
    }

    #[test]
    fn current_ratio_with_short_history() {
        assert!((current_ratio(&[4.0]).unwrap() - 4.0).abs() < 1e-12);
        assert!((current_ratio(&[1.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
        assert!(current_ratio(&[]).unwrap_err().is_unavailable());
    }

    #[test]
    fn trailing_means_yield_high_increase() {
        let history = ratio_history(&[5.0, 1.0, 2.0, 3.0]);
        let bio = forecast(SeriesKind::Biometric, "2023-05", &[10.0, 20.0, 30.0]);
        let demo = forecast(SeriesKind::Demographic, "2023-05", &[5.0, 5.0, 5.0]);
        let ratio = forecast(SeriesKind::Ratio, "2023-05", &[2.21, 2.31, 2.41]);
        let report =
            interpret(&history, &bio, &demo, &ratio, ForecastHorizon::new(3).unwrap()).unwrap();
        assert!((report.current_ratio - 2.0).abs() < 1e-12);
        assert!((report.future_ratio - 2.31).abs() < 1e-12);
        assert_eq!(report.verdict, ForecastVerdict::HighIncrease);
        assert_eq!(
            report.message,
            "High risk increase predicted. Infrastructure stress likely."
        );
    }

    #[test]
    fn table_rounds_for_presentation_only() {
        let history = ratio_history(&[1.0, 1.0, 1.0]);
        let bio = forecast(SeriesKind::Biometric, "2023-04", &[1234.5, 99.6]);
        let demo = forecast(SeriesKind::Demographic, "2023-04", &[10.4, 10.5]);
        let ratio = forecast(SeriesKind::Ratio, "2023-04", &[1.044, 1.0564]);
        let report =
            interpret(&history, &bio, &demo, &ratio, ForecastHorizon::new(2).unwrap()).unwrap();

        assert_eq!(report.table[0].month.to_string(), "2023-04");
        assert_eq!(report.table[0].predicted_biometric, 1234);
        assert_eq!(report.table[1].predicted_biometric, 100);
        assert_eq!(report.table[0].predicted_demographic, 10);
        assert_eq!(report.table[1].predicted_demographic, 10);
        assert!((report.table[0].predicted_ratio - 1.04).abs() < 1e-12);
        assert!((report.table[1].predicted_ratio - 1.06).abs() < 1e-12);

        // Unrounded mean is 1.0502 (> 1.05); the rounded ratios would
        // average exactly 1.05 and read as stable.
        assert_eq!(report.verdict, ForecastVerdict::ModerateIncrease);
        assert_eq!(report.latest().unwrap().month.to_string(), "2023-05");
    }

    #[test]
    fn table_uses_trailing_horizon_points() {
        let bio = forecast(SeriesKind::Biometric, "2023-01", &[1.0, 2.0, 3.0]);
        let demo = forecast(SeriesKind::Demographic, "2023-01", &[1.0, 2.0, 3.0]);
        let ratio = forecast(SeriesKind::Ratio, "2023-01", &[1.0, 2.0, 3.0]);
        let table = summary_table(&bio, &demo, &ratio, ForecastHorizon::new(2).unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].month.to_string(), "2023-02");
    }

    #[test]
    fn short_forecast_is_rejected() {
        let bio = forecast(SeriesKind::Biometric, "2023-01", &[1.0]);
        let demo = forecast(SeriesKind::Demographic, "2023-01", &[1.0, 2.0]);
        let ratio = forecast(SeriesKind::Ratio, "2023-01", &[1.0, 2.0]);
        let err = summary_table(&bio, &demo, &ratio, ForecastHorizon::new(2).unwrap()).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn misaligned_months_are_rejected() {
        let bio = forecast(SeriesKind::Biometric, "2023-01", &[1.0, 2.0]);
        let demo = forecast(SeriesKind::Demographic, "2023-02", &[1.0, 2.0]);
        let ratio = forecast(SeriesKind::Ratio, "2023-01", &[1.0, 2.0]);
        assert!(matches!(
            summary_table(&bio, &demo, &ratio, ForecastHorizon::new(2).unwrap()),
            Err(ForecastError::Misaligned { .. })
        ));
    }

    #[test]
    fn non_finite_prediction_is_unavailable() {
        let bio = forecast(SeriesKind::Biometric, "2023-01", &[f64::NAN]);
        let demo = forecast(SeriesKind::Demographic, "2023-01", &[1.0]);
        let ratio = forecast(SeriesKind::Ratio, "2023-01", &[1.0]);
        assert!(matches!(
            summary_table(&bio, &demo, &ratio, ForecastHorizon::new(1).unwrap()),
            Err(ForecastError::Unavailable {
                series: SeriesKind::Biometric,
                ..
            })
        ));
    }

    /// Returns a fixed value for every series except one, which fails.
    struct FailingOn(SeriesKind);

    impl Forecaster for FailingOn {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn fit_predict(
            &self,
            history: &TimeSeries,
            horizon: ForecastHorizon,
        ) -> Result<ForecastSeries, ForecastError> {
            if history.kind == self.0 {
                return Err(ForecastError::Unavailable {
                    series: history.kind,
                    reason: "synthetic failure".to_string(),
                });
            }
            Ok(ForecastSeries {
                kind: history.kind,
                points: history
                    .through
                    .following(horizon.months())
                    .into_iter()
                    .map(|month| ForecastPoint {
                        month,
                        predicted_value: 1.0,
                    })
                    .collect(),
            })
        }
    }

    fn history() -> History {
        let ratio = ratio_history(&[1.0, 1.0, 1.0]);
        History {
            biometric: TimeSeries {
                kind: SeriesKind::Biometric,
                ..ratio.clone()
            },
            demographic: TimeSeries {
                kind: SeriesKind::Demographic,
                ..ratio.clone()
            },
            ratio,
        }
    }

    #[test]
    fn any_failed_series_aborts_the_whole_forecast() {
        for kind in [SeriesKind::Biometric, SeriesKind::Demographic, SeriesKind::Ratio] {
            let err = forecast_all(&FailingOn(kind), &history(), ForecastHorizon::DEFAULT)
                .unwrap_err();
            assert_eq!(
                err,
                ForecastError::Unavailable {
                    series: kind,
                    reason: "synthetic failure".to_string()
                }
            );
        }
    }

    #[test]
    fn linear_forecaster_end_to_end() {
        let report = forecast_all(
            &crate::LinearTrendForecaster,
            &history(),
            ForecastHorizon::new(4).unwrap(),
        )
        .unwrap();
        assert_eq!(report.table.len(), 4);
        assert_eq!(report.table[0].month.to_string(), "2023-04");
        assert_eq!(report.verdict, ForecastVerdict::Stable);
    }
}
