use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A 2D point with an attached payload.
///
/// Coordinates are plain `f64` values to the index; the geographic helpers
/// treat `x` as longitude and `y` as latitude in degrees. The payload is opaque
/// and usually identifies the stop the point belongs to.
///
/// # Examples
///
/// ```
/// use walkways_types::point::IndexedPoint;
///
/// let point = IndexedPoint::new(-74.0060, 40.7128, "nyc");
/// assert_eq!(point.x(), -74.0060);
/// assert_eq!(*point.value(), "nyc");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedPoint<T> {
    coord: Coord<f64>,
    value: T,
}

impl<T> IndexedPoint<T> {
    /// Create a point at `(x, y)` carrying `value`.
    pub fn new(x: f64, y: f64, value: T) -> Self {
        Self {
            coord: Coord { x, y },
            value,
        }
    }

    /// X coordinate (longitude).
    pub fn x(&self) -> f64 {
        self.coord.x
    }

    /// Y coordinate (latitude).
    pub fn y(&self) -> f64 {
        self.coord.y
    }

    pub fn coord(&self) -> Coord<f64> {
        self.coord
    }

    /// Coordinates as an `[x, y]` pair, the layout distance-matrix services expect.
    pub fn position(&self) -> [f64; 2] {
        [self.coord.x, self.coord.y]
    }

    /// The attached payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Convert to a `geo::Point`, dropping the payload.
    pub fn to_geo(&self) -> Point<f64> {
        Point::from(self.coord)
    }

    /// Squared planar distance to `(x, y)`.
    pub fn distance_squared_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.coord.x - x;
        let dy = self.coord.y - y;
        dx * dx + dy * dy
    }
}

impl IndexedPoint<()> {
    /// Create a point without a payload.
    pub fn bare(x: f64, y: f64) -> Self {
        Self::new(x, y, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let point = IndexedPoint::new(1.5, -2.0, 7_u32);
        assert_eq!(point.x(), 1.5);
        assert_eq!(point.y(), -2.0);
        assert_eq!(point.position(), [1.5, -2.0]);
        assert_eq!(*point.value(), 7);
        assert_eq!(point.to_geo(), Point::new(1.5, -2.0));
        assert_eq!(point.into_value(), 7);
    }

    #[test]
    fn test_distance_squared() {
        let point = IndexedPoint::bare(0.0, 0.0);
        assert_eq!(point.distance_squared_to(3.0, 4.0), 25.0);
    }

    #[test]
    fn test_serde_keeps_payload() {
        let point = IndexedPoint::new(13.4, 52.5, "stop-1".to_string());
        let json = serde_json::to_string(&point).unwrap();
        let back: IndexedPoint<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }
}
