#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading and exporting the analysis input tables.
//!
//! Each table is a headered CSV file whose columns map one-to-one onto a
//! record type from `behavior_intel_behavior_models`. Loading happens once
//! per session; the loaded [`Tables`] are treated as a read-only snapshot.

pub mod paths;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use behavior_intel_behavior_models::{
    AnomalyRecord, DistrictRiskRecord, DistrictScore, MonthlyBehaviorRecord, StateCoordinate,
    StateRiskRecord,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use paths::DataPaths;

/// Errors that can occur while reading or writing tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required input file does not exist.
    #[error("Missing input table: {}", path.display())]
    MissingFile {
        /// Path that was expected.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing failed.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// All input tables for one analysis session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    /// `monthly_behavior` rows.
    pub monthly: Vec<MonthlyBehaviorRecord>,
    /// `anomalies` rows.
    pub anomalies: Vec<AnomalyRecord>,
    /// `district_risk` rows.
    pub district_risk: Vec<DistrictScore>,
    /// `state_risk` rows.
    pub state_risk: Vec<StateRiskRecord>,
    /// `state_coordinates` rows.
    pub coordinates: Vec<StateCoordinate>,
}

/// Reads a headered CSV file into typed rows.
///
/// # Errors
///
/// Returns [`IngestError::MissingFile`] if `path` does not exist and
/// [`IngestError::Csv`] if a row does not match the record type.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, IngestError> {
    if !path.exists() {
        return Err(IngestError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let csv_err = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)?;

    log::debug!("Read {} rows from {}", rows.len(), path.display());

    Ok(rows)
}

/// Loads every input table from `paths`.
///
/// # Errors
///
/// Returns the first [`IngestError`] encountered.
pub fn load_tables(paths: &DataPaths) -> Result<Tables, IngestError> {
    let start = Instant::now();

    let tables = Tables {
        monthly: read_table(&paths.monthly_behavior())?,
        anomalies: read_table(&paths.anomalies())?,
        district_risk: read_table(&paths.district_risk())?,
        state_risk: read_table(&paths.state_risk())?,
        coordinates: read_table(&paths.state_coordinates())?,
    };

    log::info!(
        "Loaded tables from {} in {:.2?}: {} monthly, {} anomalies, {} districts, {} states, {} coordinates",
        paths.root().display(),
        start.elapsed(),
        tables.monthly.len(),
        tables.anomalies.len(),
        tables.district_risk.len(),
        tables.state_risk.len(),
        tables.coordinates.len()
    );

    Ok(tables)
}

/// Writes rows as comma-delimited text with a header row.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if serialization or writing fails.
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], out: W) -> Result<(), IngestError> {
    let csv_err = |source| IngestError::Csv {
        path: PathBuf::from("<stream>"),
        source,
    };

    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes rows to `path`, creating or truncating the file.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created or written.
pub fn write_table<T: Serialize>(rows: &[T], path: &Path) -> Result<(), IngestError> {
    let file = std::fs::File::create(path)?;
    write_csv(rows, std::io::BufWriter::new(file)).map_err(|e| match e {
        IngestError::Csv { source, .. } => IngestError::Csv {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Exports the anomaly table unchanged.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be written.
pub fn export_anomalies(anomalies: &[AnomalyRecord], dir: &Path) -> Result<PathBuf, IngestError> {
    let path = dir.join(paths::ANOMALIES);
    write_table(anomalies, &path)?;
    Ok(path)
}

/// Exports the tiered district table (input columns plus `risk_level`).
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be written.
pub fn export_tiered_districts(
    tiered: &[DistrictRiskRecord],
    dir: &Path,
) -> Result<PathBuf, IngestError> {
    let path = dir.join(paths::DISTRICT_RISK);
    write_table(tiered, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use behavior_intel_behavior_models::RiskLevel;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("behavior_intel_ingest_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_fixture(dir: &Path) {
        std::fs::write(
            dir.join(paths::MONTHLY_BEHAVIOR),
            "month,demo_total,bio_total,bio_demo_ratio,demo_age_5_17,demo_age_17_,bio_age_5_17,bio_age_17_\n\
             2023-01,100,150,1.5,40,60,70,80\n\
             2023-02-28,0,20,,,,,\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(paths::ANOMALIES),
            "month,state,district,bio_total,demo_total,bio_demo_ratio\n\
             2023-01,Goa,North Goa,500,100,5.0\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(paths::DISTRICT_RISK),
            "state,district,risk_score\nGoa,North Goa,0.91\nGoa,South Goa,0.12\n",
        )
        .unwrap();
        std::fs::write(dir.join(paths::STATE_RISK), "state,risk_score\nGoa,0.5\n").unwrap();
        std::fs::write(
            dir.join(paths::STATE_COORDINATES),
            "state,lat,lon\nGoa,15.3,74.0\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_all_tables() {
        let dir = scratch("load");
        write_fixture(&dir);

        let tables = load_tables(&DataPaths::new(&dir)).unwrap();
        assert_eq!(tables.monthly.len(), 2);
        assert_eq!(tables.monthly[0].demo_age_5_17, Some(40));
        assert_eq!(tables.monthly[1].month.to_string(), "2023-02");
        assert!(tables.monthly[1].bio_demo_ratio.is_none());
        assert_eq!(tables.anomalies[0].district, "North Goa");
        assert_eq!(tables.district_risk.len(), 2);
        assert_eq!(tables.coordinates[0].state, "Goa");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn blank_and_nan_district_scores_still_load() {
        let dir = scratch("undefined_scores");
        write_fixture(&dir);
        std::fs::write(
            dir.join(paths::DISTRICT_RISK),
            "state,district,risk_score\nGoa,North Goa,0.91\nGoa,Blank,\nGoa,Broken,NaN\n",
        )
        .unwrap();

        let tables = load_tables(&DataPaths::new(&dir)).unwrap();
        assert_eq!(tables.district_risk.len(), 3);
        assert_eq!(tables.district_risk[0].defined_score(), Some(0.91));
        assert!(tables.district_risk[1].risk_score.is_none());
        assert!(tables.district_risk[2].risk_score.is_some());
        assert!(tables.district_risk[2].defined_score().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn age_columns_are_optional() {
        let dir = scratch("no_age");
        let path = dir.join(paths::MONTHLY_BEHAVIOR);
        std::fs::write(
            &path,
            "month,demo_total,bio_total,bio_demo_ratio\n2023-01,10,20,2.0\n",
        )
        .unwrap();
        let rows: Vec<MonthlyBehaviorRecord> = read_table(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].bio_age_17_.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = scratch("missing");
        let err = load_tables(&DataPaths::new(&dir)).unwrap_err();
        assert!(matches!(err, IngestError::MissingFile { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_month_is_a_csv_error() {
        let dir = scratch("bad_month");
        let path = dir.join(paths::ANOMALIES);
        std::fs::write(
            &path,
            "month,state,district,bio_total,demo_total,bio_demo_ratio\nMay,Goa,X,1,1,1.0\n",
        )
        .unwrap();
        let err = read_table::<AnomalyRecord>(&path).unwrap_err();
        assert!(matches!(err, IngestError::Csv { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn exports_tiered_districts_with_risk_level_column() {
        let dir = scratch("export");
        let tiered = vec![DistrictRiskRecord {
            state: "Goa".to_string(),
            district: "North Goa".to_string(),
            risk_score: 0.91,
            risk_level: RiskLevel::High,
        }];
        let path = export_tiered_districts(&tiered, &dir).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "state,district,risk_score,risk_level\nGoa,North Goa,0.91,HIGH\n"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn anomalies_round_trip_through_export() {
        let dir = scratch("anomaly_export");
        write_fixture(&dir);
        let anomalies: Vec<AnomalyRecord> = read_table(&dir.join(paths::ANOMALIES)).unwrap();

        let out = dir.join("out");
        std::fs::create_dir_all(&out).unwrap();
        let path = export_anomalies(&anomalies, &out).unwrap();
        let reread: Vec<AnomalyRecord> = read_table(&path).unwrap();
        assert_eq!(reread, anomalies);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
