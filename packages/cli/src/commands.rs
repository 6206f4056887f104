//! Runs one view against the session and prints it.
//!
//! Shared by the subcommands and the interactive menu.

use std::path::Path;

use behavior_intel_analytics::session::AnalysisSession;
use behavior_intel_analytics::views;
use behavior_intel_analytics_models::{AnomalyParams, ForecastParams, RankingParams};
use behavior_intel_cli_utils::{MultiProgress, spinner};
use behavior_intel_forecast::LinearTrendForecaster;
use serde::Serialize;

use crate::render;

/// Printed when the forecaster cannot produce a usable forecast.
pub const FORECAST_UNAVAILABLE: &str = "Forecast unavailable, insufficient history";

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Renders views for one session.
pub struct Runner<'a> {
    pub session: &'a AnalysisSession,
    pub limits: RankingParams,
    pub multi: &'a MultiProgress,
    pub json: bool,
}

/// JSON body printed in place of a forecast report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ForecastUnavailable<'a> {
    forecast_unavailable: &'a str,
}

fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Runner<'_> {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> CommandResult {
        if self.json {
            print_json(value)
        } else {
            print!("{}", text(value));
            Ok(())
        }
    }

    /// National headline numbers.
    ///
    /// # Errors
    ///
    /// Fails if the district corpus could not be tiered.
    pub fn summary(&self) -> CommandResult {
        self.emit(&views::summary(self.session)?, render::summary)
    }

    /// Monthly volume, ratio and growth.
    ///
    /// # Errors
    ///
    /// Fails only if JSON serialization fails.
    pub fn trends(&self) -> CommandResult {
        self.emit(&views::trends(self.session), render::trends)
    }

    /// Anomaly counts and the filtered table.
    ///
    /// # Errors
    ///
    /// Fails if the month selector is invalid.
    pub fn anomalies(&self, params: &AnomalyParams) -> CommandResult {
        self.emit(&views::anomalies(self.session, params)?, render::anomalies)
    }

    /// State hotspots and top risky states.
    ///
    /// # Errors
    ///
    /// Fails only if JSON serialization fails.
    pub fn hotspots(&self) -> CommandResult {
        self.emit(&views::geo(self.session, &self.limits), render::hotspots)
    }

    /// Riskiest districts.
    ///
    /// # Errors
    ///
    /// Fails if the district corpus could not be tiered.
    pub fn ranking(&self) -> CommandResult {
        let view = views::insights(self.session, &self.limits)?;
        if self.json {
            return print_json(&view.ranking);
        }
        print!("{}", render::ranking(&view));
        Ok(())
    }

    /// Recommended action per district.
    ///
    /// # Errors
    ///
    /// Fails if the district corpus could not be tiered.
    pub fn recommendations(&self) -> CommandResult {
        let view = views::insights(self.session, &self.limits)?;
        if self.json {
            return print_json(&view.recommendations);
        }
        print!("{}", render::recommendations(&view));
        Ok(())
    }

    /// Forecast and verdict.
    ///
    /// An unavailable forecast is reported and treated as success; an
    /// invalid horizon is an error.
    ///
    /// # Errors
    ///
    /// Fails if the horizon is outside `1..=12`.
    pub fn forecast(&self, params: &ForecastParams) -> CommandResult {
        let bar = spinner(self.multi, "Forecasting biometric, demographic and ratio series");
        let result = views::forecast(self.session, &LinearTrendForecaster, params);
        bar.finish_and_clear();

        match result {
            Ok(report) => self.emit(&report, render::forecast),
            Err(e) if e.is_forecast_unavailable() => {
                log::warn!("{e}");
                if self.json {
                    print_json(&ForecastUnavailable {
                        forecast_unavailable: &e.to_string(),
                    })
                } else {
                    println!("{FORECAST_UNAVAILABLE}");
                    Ok(())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the anomaly and tiered district tables to `dir`.
    ///
    /// # Errors
    ///
    /// Fails if tiering failed or a file cannot be written.
    pub fn export(&self, dir: &Path) -> CommandResult {
        for path in views::export(self.session, dir)? {
            println!("Wrote {}", path.display());
        }
        Ok(())
    }
}
