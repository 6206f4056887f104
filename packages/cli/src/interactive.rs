//! Menu-driven front end over the analysis views.

use behavior_intel_analytics::views;
use behavior_intel_analytics_models::{AnomalyParams, ForecastParams, ViewName};
use behavior_intel_anomaly::aggregate::ALL;
use dialoguer::{Input, Select};

use crate::commands::Runner;

const QUIT: &str = "Quit";

/// Prompts for a view, shows it, and repeats until the user quits.
///
/// A failing view is logged and the menu stays open.
///
/// # Errors
///
/// Returns an error only if the terminal prompt itself fails.
pub fn run(runner: &Runner<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let mut labels: Vec<&str> = ViewName::ALL.iter().map(|v| v.label()).collect();
    labels.push(QUIT);

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("Which view would you like to see?")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(view) = ViewName::ALL.get(idx) else {
            return Ok(());
        };

        let result = match view {
            ViewName::Summary => runner.summary(),
            ViewName::Trends => runner.trends(),
            ViewName::Anomalies => prompt_anomalies(runner),
            ViewName::Geo => runner.hotspots(),
            ViewName::Insights => runner.ranking().and_then(|()| runner.recommendations()),
            ViewName::Forecast => prompt_forecast(runner),
        };

        if let Err(e) = result {
            log::error!("{} view failed: {e}", view.label());
        }
    }
}

fn pick(prompt: &str, options: Vec<String>) -> Result<String, dialoguer::Error> {
    let mut items = vec![ALL.to_string()];
    items.extend(options);
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .max_length(20)
        .interact()?;
    Ok(items.swap_remove(idx))
}

fn prompt_anomalies(runner: &Runner<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let options = views::anomalies(runner.session, &AnomalyParams::default())?;

    let month = pick(
        "Month",
        options.months.iter().map(ToString::to_string).collect(),
    )?;
    let state = pick("State", options.states)?;

    runner.anomalies(&AnomalyParams {
        month: Some(month),
        state: Some(state),
    })
}

fn prompt_forecast(runner: &Runner<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let default = i64::try_from(runner.session.default_horizon().months())?;
    let horizon: i64 = Input::new()
        .with_prompt("Months to forecast (1-12)")
        .default(default)
        .interact_text()?;

    runner.forecast(&ForecastParams {
        horizon: Some(horizon),
    })
}
