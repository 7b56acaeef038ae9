//! Cost-of-living estimation
//!
//! Looks up a price-level index for a place and computes the relative
//! difference between two locations. The dataset is embedded in the binary
//! (Numbeo-style indices, New York = 100), parsed once and never mutated, so
//! concurrent requests read it without synchronization.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from the estimator.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// Place is in neither the city nor the country dataset
    #[error("no cost-of-living index for place: {place}")]
    PlaceNotFound { place: String },

    /// Origin index is zero; the ratio to origin is undefined
    #[error("cost-of-living index for {place} is zero")]
    InvalidIndex { place: String },
}

/// A named location and its cost-of-living index.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    cities: Vec<PlaceRecord>,
    countries: Vec<PlaceRecord>,
}

static DATASET: LazyLock<Dataset> = LazyLock::new(|| {
    serde_json::from_str(include_str!("indices.json"))
        .expect("embedded cost-of-living dataset is valid JSON")
});

/// Relative price-level comparison between two places.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostOfLivingResult {
    /// `(destination - origin) / origin * 100`; positive means the
    /// destination is more expensive than the origin.
    pub percentage_difference: f64,
    pub origin_index: f64,
    pub destination_index: f64,
}

/// Index for a place name: the city dataset by exact name match first, then
/// the country dataset.
#[must_use]
pub fn lookup_index(place: &str) -> Option<f64> {
    DATASET
        .cities
        .iter()
        .find(|record| record.name == place)
        .or_else(|| DATASET.countries.iter().find(|record| record.name == place))
        .map(|record| record.score)
}

/// Compare the cost of living between two places.
///
/// Deterministic over the embedded dataset; the result is recomputed per
/// request and never stored.
pub fn difference(origin: &str, destination: &str) -> Result<CostOfLivingResult, LookupError> {
    let origin_index = lookup_index(origin).ok_or_else(|| LookupError::PlaceNotFound {
        place: origin.to_string(),
    })?;
    let destination_index =
        lookup_index(destination).ok_or_else(|| LookupError::PlaceNotFound {
            place: destination.to_string(),
        })?;

    let percentage_difference = percentage_difference(origin_index, destination_index)
        .ok_or_else(|| LookupError::InvalidIndex {
            place: origin.to_string(),
        })?;

    debug!(
        "Cost of living {origin} ({origin_index}) vs {destination} ({destination_index}): {percentage_difference:.1}%"
    );

    Ok(CostOfLivingResult {
        percentage_difference,
        origin_index,
        destination_index,
    })
}

/// The raw formula. `None` when the origin index is zero - the ratio to
/// origin is undefined and must not leak out as NaN or infinity.
#[must_use]
pub fn percentage_difference(origin_index: f64, destination_index: f64) -> Option<f64> {
    if origin_index == 0.0 {
        return None;
    }
    Some((destination_index - origin_index) / origin_index * 100.0)
}
