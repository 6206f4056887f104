#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! State hotspot geography.
//!
//! Left-joins the per-state risk table with the state coordinates table so
//! risk scores can be placed on a map. Coordinates are supplied by an
//! external lookup; a state without a coordinate row stays in the output
//! with no position instead of aborting the view.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use behavior_intel_behavior_models::{DataQualityError, StateCoordinate, StateRiskRecord};
use serde::{Deserialize, Serialize};

/// A state risk score with its map position, when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotPoint {
    /// State name.
    pub state: String,
    /// State-level risk score, absent when the input value is missing or
    /// not finite.
    pub risk_score: Option<f64>,
    /// Latitude, if the state has a coordinate row.
    pub lat: Option<f64>,
    /// Longitude, if the state has a coordinate row.
    pub lon: Option<f64>,
}

impl HotspotPoint {
    /// Returns `true` if the point can be placed on a map.
    #[must_use]
    pub const fn is_located(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// Result of joining state risk with coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotJoin {
    /// One point per state risk row, in input order.
    pub points: Vec<HotspotPoint>,
    /// States whose coordinates or risk score were missing.
    #[serde(skip)]
    pub missing: Vec<DataQualityError>,
}

/// Left-joins `state_risk` with `coordinates` on `state`.
///
/// If a state appears more than once in `coordinates`, the first row wins.
/// A state whose score is missing or not finite keeps its point with no
/// score.
#[must_use]
pub fn hotspots(state_risk: &[StateRiskRecord], coordinates: &[StateCoordinate]) -> HotspotJoin {
    let mut lookup: BTreeMap<&str, &StateCoordinate> = BTreeMap::new();
    for coord in coordinates {
        match lookup.entry(coord.state.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(coord);
            }
            Entry::Occupied(_) => {
                log::warn!("Duplicate coordinates for state '{}'", coord.state);
            }
        }
    }

    let mut missing = Vec::new();
    let points = state_risk
        .iter()
        .map(|row| {
            let coord = lookup.get(row.state.as_str());
            if coord.is_none() {
                log::warn!("No coordinates for state '{}'", row.state);
                missing.push(DataQualityError::MissingCoordinates {
                    state: row.state.clone(),
                });
            }
            let risk_score = row.defined_score();
            if risk_score.is_none() {
                let err = DataQualityError::UndefinedStateScore {
                    state: row.state.clone(),
                };
                log::warn!("{err}");
                missing.push(err);
            }
            HotspotPoint {
                state: row.state.clone(),
                risk_score,
                lat: coord.map(|c| c.lat),
                lon: coord.map(|c| c.lon),
            }
        })
        .collect();

    HotspotJoin { points, missing }
}
