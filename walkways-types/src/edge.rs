use serde::{Deserialize, Serialize};

/// A walking connection between two stops, as resolved by a distance service.
///
/// `duration` is in seconds and `distance` in meters, the units
/// openrouteservice-style matrix endpoints report by default.
///
/// # Examples
///
/// ```
/// use walkways_types::edge::Edge;
///
/// let edge = Edge::new("a".to_string(), "b".to_string(), 120.0, 150.0);
/// assert_eq!(edge.start, "a");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<K = String> {
    pub start: K,
    pub end: K,
    pub duration: f64,
    pub distance: f64,
}

impl<K> Edge<K> {
    pub fn new(start: K, end: K, duration: f64, distance: f64) -> Self {
        Self {
            start,
            end,
            duration,
            distance,
        }
    }

    /// Build an edge from possibly unresolved measurements.
    ///
    /// Returns `None` when either value is missing or not finite.
    pub fn resolved(start: K, end: K, duration: Option<f64>, distance: Option<f64>) -> Option<Self> {
        match (duration, distance) {
            (Some(duration), Some(distance)) if duration.is_finite() && distance.is_finite() => {
                Some(Self::new(start, end, duration, distance))
            }
            _ => None,
        }
    }
}
