//! Canonical file names inside an analysis data directory.

use std::path::{Path, PathBuf};

/// Monthly biometric/demographic volumes.
pub const MONTHLY_BEHAVIOR: &str = "monthly_behavior.csv";
/// Upstream-flagged anomalous district-months.
pub const ANOMALIES: &str = "anomalies.csv";
/// Per-district risk scores.
pub const DISTRICT_RISK: &str = "district_risk.csv";
/// Per-state risk scores.
pub const STATE_RISK: &str = "state_risk.csv";
/// State centroid coordinates.
pub const STATE_COORDINATES: &str = "state_coordinates.csv";

/// Resolves table paths relative to a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Creates paths rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `monthly_behavior.csv`.
    #[must_use]
    pub fn monthly_behavior(&self) -> PathBuf {
        self.root.join(MONTHLY_BEHAVIOR)
    }

    /// Path of `anomalies.csv`.
    #[must_use]
    pub fn anomalies(&self) -> PathBuf {
        self.root.join(ANOMALIES)
    }

    /// Path of `district_risk.csv`.
    #[must_use]
    pub fn district_risk(&self) -> PathBuf {
        self.root.join(DISTRICT_RISK)
    }

    /// Path of `state_risk.csv`.
    #[must_use]
    pub fn state_risk(&self) -> PathBuf {
        self.root.join(STATE_RISK)
    }

    /// Path of `state_coordinates.csv`.
    #[must_use]
    pub fn state_coordinates(&self) -> PathBuf {
        self.root.join(STATE_COORDINATES)
    }
}
