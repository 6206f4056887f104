//! Least-squares linear trend forecaster.

use behavior_intel_behavior_models::{ForecastPoint, YearMonth};

use crate::{ForecastError, ForecastHorizon, ForecastSeries, Forecaster, TimeSeries};

/// Fits `value = intercept + slope * month_index` by ordinary least
/// squares and extrapolates it over the horizon.
///
/// Month indices count calendar months, so gaps in the history stretch
/// the x-axis instead of being collapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendForecaster;

/// Minimum number of distinct months needed to fit a trend.
pub const MIN_HISTORY_MONTHS: usize = 2;

fn month_index(month: YearMonth) -> f64 {
    f64::from(month.year()) * 12.0 + f64::from(month.month() - 1)
}

/// Returns `(intercept, slope)` for the points, or `None` when every x is
/// identical.
#[allow(clippy::cast_precision_loss)]
fn fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in points {
        num += (x - x_mean) * (y - y_mean);
        den += (x - x_mean).powi(2);
    }

    if den == 0.0 {
        return None;
    }

    let slope = num / den;
    Some((y_mean - slope * x_mean, slope))
}

impl Forecaster for LinearTrendForecaster {
    fn name(&self) -> &'static str {
        "linear_trend"
    }

    fn fit_predict(
        &self,
        history: &TimeSeries,
        horizon: ForecastHorizon,
    ) -> Result<ForecastSeries, ForecastError> {
        let unavailable = |reason: String| ForecastError::Unavailable {
            series: history.kind,
            reason,
        };

        if history.len() < MIN_HISTORY_MONTHS {
            return Err(unavailable(format!(
                "insufficient history: {} month(s), need at least {MIN_HISTORY_MONTHS}",
                history.len()
            )));
        }

        if let Some((month, _)) = history.points.iter().find(|(_, v)| !v.is_finite()) {
            return Err(unavailable(format!("non-finite value in {month}")));
        }

        let xy: Vec<(f64, f64)> = history
            .points
            .iter()
            .map(|(m, v)| (month_index(*m), *v))
            .collect();

        let (intercept, slope) = fit(&xy).ok_or_else(|| {
            unavailable("insufficient history: fewer than 2 distinct months".to_string())
        })?;

        log::debug!(
            "{} trend: intercept={intercept:.4} slope={slope:.4}/month over {} months",
            history.kind,
            xy.len()
        );

        let points = history
            .through
            .following(horizon.months())
            .into_iter()
            .map(|month| ForecastPoint {
                month,
                predicted_value: slope.mul_add(month_index(month), intercept),
            })
            .collect();

        Ok(ForecastSeries {
            kind: history.kind,
            points,
        })
    }
}
