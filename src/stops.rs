//! Stop records and the validated catalog the pipeline is built from.

use crate::error::{Result, WalkwaysError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use walkways_types::point::IndexedPoint;
use walkways_types::region::Region;

/// One input row: a stop id and its WGS84 position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub lng: f64,
    pub lat: f64,
}

impl Stop {
    pub fn new(id: impl Into<String>, lng: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            lng,
            lat,
        }
    }

    pub fn position(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn to_point(&self) -> IndexedPoint<String> {
        IndexedPoint::new(self.lng, self.lat, self.id.clone())
    }
}

/// Validates that a stop has an id and a finite, in-range position.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use walkways::stops::{Stop, validate_stop};
///
/// assert!(validate_stop(&Stop::new("a", 13.4, 52.5)).is_ok());
/// assert!(validate_stop(&Stop::new("a", 200.0, 52.5)).is_err());
/// assert!(validate_stop(&Stop::new("", 13.4, 52.5)).is_err());
/// ```
pub fn validate_stop(stop: &Stop) -> Result<()> {
    if stop.id.is_empty() {
        return Err(WalkwaysError::InvalidInput("Stop id must not be empty".to_string()));
    }

    if !stop.lng.is_finite() {
        return Err(WalkwaysError::InvalidInput(format!(
            "Longitude of '{}' must be finite, got: {}",
            stop.id, stop.lng
        )));
    }

    if !stop.lat.is_finite() {
        return Err(WalkwaysError::InvalidInput(format!(
            "Latitude of '{}' must be finite, got: {}",
            stop.id, stop.lat
        )));
    }

    if !(-180.0..=180.0).contains(&stop.lng) {
        return Err(WalkwaysError::InvalidInput(format!(
            "Longitude of '{}' out of range [-180.0, 180.0]: {}",
            stop.id, stop.lng
        )));
    }

    if !(-90.0..=90.0).contains(&stop.lat) {
        return Err(WalkwaysError::InvalidInput(format!(
            "Latitude of '{}' out of range [-90.0, 90.0]: {}",
            stop.id, stop.lat
        )));
    }

    Ok(())
}

/// Stops keyed by id, in input order.
#[derive(Debug, Clone)]
pub struct StopCatalog {
    stops: Vec<Stop>,
    by_id: FxHashMap<String, usize>,
}

impl StopCatalog {
    /// Validate `stops` and build the catalog.
    ///
    /// Rejects the whole input on the first malformed record or duplicate id,
    /// so a bad row can never widen the index region.
    pub fn new(stops: Vec<Stop>) -> Result<Self> {
        if stops.is_empty() {
            return Err(WalkwaysError::EmptyInput);
        }

        let mut by_id = FxHashMap::default();
        by_id.reserve(stops.len());
        for (idx, stop) in stops.iter().enumerate() {
            validate_stop(stop).map_err(|e| {
                WalkwaysError::InvalidInput(format!("Stop at index {}: {}", idx, e))
            })?;
            if by_id.insert(stop.id.clone(), idx).is_some() {
                return Err(WalkwaysError::InvalidInput(format!(
                    "Duplicate stop id '{}' at index {}",
                    stop.id, idx
                )));
            }
        }

        Ok(Self { stops, by_id })
    }

    /// Parse a JSON array of stops and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let stops: Vec<Stop> = serde_json::from_str(json)?;
        Self::new(stops)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Stop> {
        self.by_id.get(id).map(|&idx| &self.stops[idx])
    }

    /// `[lng, lat]` of the stop with `id`.
    pub fn coord(&self, id: &str) -> Option<[f64; 2]> {
        self.get(id).map(Stop::position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.stops.iter()
    }

    /// Index points for every stop, in input order.
    pub fn points(&self) -> Vec<IndexedPoint<String>> {
        self.stops.iter().map(Stop::to_point).collect()
    }

    /// Tight bounding region over all stops. The extreme stops lie on its
    /// boundary.
    pub fn extent(&self) -> Region {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for stop in &self.stops {
            min_x = min_x.min(stop.lng);
            min_y = min_y.min(stop.lat);
            max_x = max_x.max(stop.lng);
            max_y = max_y.max(stop.lat);
        }
        Region::new(min_x, min_y, max_x, max_y)
    }

    /// Index root: the extent padded by `padding` degrees below and by twice
    /// that above.
    ///
    /// The uneven padding keeps a degenerate axis (every stop on one latitude
    /// or longitude, or all stops coincident) at one third of the root's span,
    /// a position no midpoint split ever lands on. With zero padding the
    /// extreme stops are outside the root and get dropped by the index.
    pub fn root_region(&self, padding: f64) -> Region {
        let extent = self.extent();
        Region::new(
            extent.min_x() - padding,
            extent.min_y() - padding,
            extent.max_x() + 2.0 * padding,
            extent.max_y() + 2.0 * padding,
        )
    }
}
