#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk tiering for district risk scores.
//!
//! Scores are classified against two quantile cut points computed once
//! from the full, unfiltered district corpus ([`RiskThresholds`]). The
//! thresholds are an explicit value passed into every classification so
//! that filtered views never silently recompute them from a subset.

pub mod ranking;
pub mod recommend;
pub mod thresholds;

pub use recommend::{recommend, recommend_label, recommendations};
pub use thresholds::{
    RiskThresholds, TieredDistricts, classify, compute_thresholds, percentile, tier_districts,
};

use thiserror::Error;

/// Errors that can occur while tiering risk scores.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RiskError {
    /// Thresholds were requested for a corpus with no finite score.
    #[error("Cannot compute risk thresholds: no district has a usable risk score")]
    EmptyCorpus,

    /// A score in the corpus is NaN or infinite.
    #[error("Risk score for {district} is not a finite number ({score})")]
    NonFiniteScore {
        /// District (or position) carrying the bad score.
        district: String,
        /// The offending value.
        score: f64,
    },

    /// A risk tier label did not match any known tier.
    #[error("Unrecognized risk level '{label}'")]
    UnknownRiskLevel {
        /// The label that failed to parse.
        label: String,
    },
}
