//! Plain-text rendering of view results.

use std::fmt::Write as _;

use behavior_intel_analytics_models::{
    AnomalyView, GeoView, InsightsView, NationalSummary, TrendsView,
};
use behavior_intel_behavior_models::{DistrictRiskRecord, RecommendationRow};
use behavior_intel_cli_utils::TextTable;
use behavior_intel_forecast::ForecastReport;

fn opt_f64(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

/// Headline counts as a two-column metric table.
#[must_use]
pub fn summary(view: &NationalSummary) -> String {
    let mut table = TextTable::new(["METRIC", "VALUE"]);
    table.push(["Districts".to_string(), view.districts.to_string()]);
    table.push(["Anomalies".to_string(), view.anomalies.to_string()]);
    table.push([
        "High risk districts".to_string(),
        view.high_risk_districts.to_string(),
    ]);
    table.push(["States".to_string(), view.states.to_string()]);
    table.push([
        "Untiered districts".to_string(),
        view.untiered_districts.to_string(),
    ]);
    table.render()
}

/// Monthly trend tables.
#[must_use]
pub fn trends(view: &TrendsView) -> String {
    let mut totals = TextTable::new(["MONTH", "DEMO_TOTAL", "BIO_TOTAL"]);
    for row in &view.totals {
        totals.push([
            row.month.to_string(),
            row.demo_total.to_string(),
            row.bio_total.to_string(),
        ]);
    }

    let mut ratio = TextTable::new(["MONTH", "BIO_DEMO_RATIO"]);
    for point in &view.ratio {
        ratio.push([point.month.to_string(), format!("{:.2}", point.bio_demo_ratio)]);
    }

    let mut growth = TextTable::new(["MONTH", "BIO_TOTAL", "BIO_GROWTH_%"]);
    for point in &view.growth {
        growth.push([
            point.month.to_string(),
            point.bio_total.to_string(),
            opt_f64(point.bio_growth_pct, 2),
        ]);
    }

    format!(
        "Monthly volume\n{}\nBiometric / demographic ratio\n{}\nBiometric growth\n{}",
        totals.render(),
        ratio.render(),
        growth.render()
    )
}

/// Anomalies per month followed by the filtered anomaly rows.
#[must_use]
pub fn anomalies(view: &AnomalyView) -> String {
    let mut by_month = TextTable::new(["MONTH", "ANOMALIES"]);
    for row in &view.by_month {
        by_month.push([row.month.to_string(), row.count.to_string()]);
    }

    let mut rows = TextTable::new([
        "MONTH",
        "STATE",
        "DISTRICT",
        "BIO_TOTAL",
        "DEMO_TOTAL",
        "BIO_DEMO_RATIO",
    ]);
    for row in &view.rows {
        rows.push([
            row.month.to_string(),
            row.state.clone(),
            row.district.clone(),
            row.bio_total.to_string(),
            row.demo_total.to_string(),
            opt_f64(row.bio_demo_ratio, 2),
        ]);
    }

    format!(
        "Anomalies by month\n{}\n{} matching anomalies\n{}",
        by_month.render(),
        rows.len(),
        rows.render()
    )
}

/// State hotspot table followed by the top risky states.
#[must_use]
pub fn hotspots(view: &GeoView) -> String {
    let mut points = TextTable::new(["STATE", "RISK_SCORE", "LAT", "LON"]);
    for point in &view.hotspots {
        points.push([
            point.state.clone(),
            opt_f64(point.risk_score, 4),
            opt_f64(point.lat, 4),
            opt_f64(point.lon, 4),
        ]);
    }

    let mut top = TextTable::new(["STATE", "RISK_SCORE"]);
    for row in &view.top_states {
        top.push([row.state.clone(), opt_f64(row.defined_score(), 4)]);
    }

    let mut out = format!("State hotspots\n{}", points.render());
    if !view.unlocated_states.is_empty() {
        let _ = writeln!(
            out,
            "No coordinates for: {}",
            view.unlocated_states.join(", ")
        );
    }
    let _ = write!(out, "\nTop risky states\n{}", top.render());
    out
}

fn districts_table(rows: &[DistrictRiskRecord]) -> TextTable {
    let mut table = TextTable::new(["STATE", "DISTRICT", "RISK_SCORE", "RISK_LEVEL"]);
    for row in rows {
        table.push([
            row.state.clone(),
            row.district.clone(),
            format!("{:.4}", row.risk_score),
            row.risk_level.to_string(),
        ]);
    }
    table
}

/// Session thresholds followed by the ranked district table.
#[must_use]
pub fn ranking(view: &InsightsView) -> String {
    format!(
        "Thresholds: HIGH >= {:.4}, MEDIUM >= {:.4}\n{}",
        view.q_high,
        view.q_medium,
        districts_table(&view.ranking).render()
    )
}

fn recommendation_table(rows: &[RecommendationRow]) -> TextTable {
    let mut table = TextTable::new(["STATE", "DISTRICT", "RISK_LEVEL", "RECOMMENDATION"]);
    for row in rows {
        table.push([
            row.state.clone(),
            row.district.clone(),
            row.risk_level.to_string(),
            row.recommendation.clone(),
        ]);
    }
    table
}

/// Recommended action per district.
#[must_use]
pub fn recommendations(view: &InsightsView) -> String {
    recommendation_table(&view.recommendations).render()
}

/// Forecast table with the ratio comparison and verdict line.
#[must_use]
pub fn forecast(report: &ForecastReport) -> String {
    let mut table = TextTable::new([
        "Month",
        "Predicted_Biometric",
        "Predicted_Demographic",
        "Predicted_Ratio",
    ]);
    for row in &report.table {
        table.push([
            row.month.to_string(),
            row.predicted_biometric.to_string(),
            row.predicted_demographic.to_string(),
            format!("{:.2}", row.predicted_ratio),
        ]);
    }

    let mut out = format!(
        "Forecast for the next {} months\n{}\nCurrent ratio: {:.2}\nForecast ratio: {:.2}\n",
        report.horizon.months(),
        table.render(),
        report.current_ratio,
        report.future_ratio
    );
    if let Some(latest) = report.latest() {
        let _ = writeln!(
            out,
            "Latest prediction ({}): biometric {}, demographic {}, ratio {:.2}",
            latest.month,
            latest.predicted_biometric,
            latest.predicted_demographic,
            latest.predicted_ratio
        );
    }
    let _ = writeln!(out, "{}: {}", report.verdict, report.message);
    out
}

#[cfg(test)]
mod tests {
    use behavior_intel_behavior_models::{MonthlyBehaviorRecord, RiskLevel, StateRiskRecord};
    use behavior_intel_geography::HotspotPoint;
    use behavior_intel_forecast::{ForecastHorizon, History, LinearTrendForecaster, forecast_all};

    use super::*;

    #[test]
    fn summary_lists_each_metric() {
        let text = summary(&NationalSummary {
            districts: 700,
            anomalies: 12,
            high_risk_districts: 105,
            states: 36,
            untiered_districts: 2,
        });
        assert!(text.contains("High risk districts  105"));
        assert!(text.contains("Untiered districts   2"));
        assert!(text.starts_with("METRIC"));
    }

    #[test]
    fn hotspots_show_dash_for_missing_values() {
        let view = GeoView {
            hotspots: vec![HotspotPoint {
                state: "Ladakh".to_string(),
                risk_score: None,
                lat: None,
                lon: None,
            }],
            unlocated_states: vec!["Ladakh".to_string()],
            top_states: vec![StateRiskRecord {
                state: "Kerala".to_string(),
                risk_score: Some(0.8),
            }],
        };

        let text = hotspots(&view);
        assert!(text.contains("Ladakh  -"));
        assert!(text.contains("No coordinates for: Ladakh"));
        assert!(text.contains("0.8000"));
    }

    #[test]
    fn ranking_shows_thresholds_and_tiers() {
        let view = InsightsView {
            q_high: 92.0,
            q_medium: 54.0,
            ranking: vec![DistrictRiskRecord {
                state: "Kerala".to_string(),
                district: "Kollam".to_string(),
                risk_score: 95.0,
                risk_level: RiskLevel::High,
            }],
            recommendations: vec![RecommendationRow {
                state: "Kerala".to_string(),
                district: "Kollam".to_string(),
                risk_level: RiskLevel::High,
                recommendation: "Increase centers + Audit infrastructure".to_string(),
            }],
        };

        let text = ranking(&view);
        assert!(text.starts_with("Thresholds: HIGH >= 92.0000, MEDIUM >= 54.0000"));
        assert!(text.contains("95.0000"));
        assert!(text.contains("HIGH"));
        assert!(recommendations(&view).contains("Increase centers + Audit infrastructure"));
    }

    #[test]
    fn forecast_shows_table_and_verdict() {
        let monthly: Vec<MonthlyBehaviorRecord> = [
            ("2023-01", 100, 1.0),
            ("2023-02", 150, 1.5),
            ("2023-03", 200, 2.0),
        ]
        .into_iter()
        .map(|(month, bio, ratio)| MonthlyBehaviorRecord {
            month: month.parse().unwrap(),
            demo_total: 100,
            bio_total: bio,
            bio_demo_ratio: Some(ratio),
            demo_age_5_17: None,
            demo_age_17_: None,
            bio_age_5_17: None,
            bio_age_17_: None,
        })
        .collect();
        let history = History::from_monthly(&monthly).unwrap();
        let report = forecast_all(
            &LinearTrendForecaster,
            &history,
            ForecastHorizon::new(3).unwrap(),
        )
        .unwrap();

        let text = forecast(&report);
        assert!(text.contains("Predicted_Demographic"));
        assert!(text.contains("2023-06"));
        assert!(text.contains("Current ratio: 1.50"));
        assert!(text.contains("Forecast ratio: 3.00"));
        assert!(text.contains(
            "HIGH_INCREASE: High risk increase predicted. Infrastructure stress likely."
        ));
    }
}
