//! Conversion of a walking radius into an indexable rectangle.
//!
//! The window is built from four geodesic offsets of the center (east, west,
//! north, south) on the WGS84 ellipsoid. It is a broad-phase filter: the
//! rectangle over-includes the true geodesic disc near its corners and gets
//! visibly non-square in degree space at high latitudes.

use crate::error::{Result, WalkwaysError};
use geo::{Destination, Geodesic, Point};
use walkways_types::point::IndexedPoint;
use walkways_types::region::Region;

const NORTH: f64 = 0.0;
const EAST: f64 = 90.0;
const SOUTH: f64 = 180.0;
const WEST: f64 = 270.0;

/// Builds the search rectangle around a longitude/latitude center.
///
/// # Examples
///
/// ```
/// use walkways::GeoWindow;
///
/// let window = GeoWindow::new(0.5)?;
/// let region = window.around(13.4050, 52.5200);
/// assert!(region.contains_xy(13.4050, 52.5200));
/// assert!(region.height() < 0.01);
/// # Ok::<(), walkways::WalkwaysError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoWindow {
    radius_km: f64,
}

impl GeoWindow {
    pub fn new(radius_km: f64) -> Result<Self> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(WalkwaysError::InvalidInput(format!(
                "Window radius must be a finite, non-negative number of kilometers, got: {}",
                radius_km
            )));
        }
        Ok(Self { radius_km })
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Rectangle spanning the geodesic offsets of `(lon, lat)` in the four
    /// compass directions.
    ///
    /// Near the antimeridian the east or west offset is unwrapped past ±180
    /// so the rectangle stays on the center's side. Stops on the far side of
    /// the antimeridian are therefore never matched.
    pub fn around(&self, lon: f64, lat: f64) -> Region {
        let center = Point::new(lon, lat);
        let distance = self.radius_km * 1000.0;

        let east = Geodesic.destination(center, EAST, distance);
        let west = Geodesic.destination(center, WEST, distance);
        let north = Geodesic.destination(center, NORTH, distance);
        let south = Geodesic.destination(center, SOUTH, distance);

        let mut east_x = east.x();
        if east_x < lon {
            east_x += 360.0;
        }
        let mut west_x = west.x();
        if west_x > lon {
            west_x -= 360.0;
        }

        Region::new(west_x, south.y(), east_x, north.y())
    }

    /// Window around an indexed point.
    pub fn around_point<T>(&self, point: &IndexedPoint<T>) -> Region {
        self.around(point.x(), point.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Distance;

    #[test]
    fn test_window_contains_center() {
        let window = GeoWindow::new(0.5).unwrap();
        let region = window.around(-74.0060, 40.7128);
        assert!(region.contains_xy(-74.0060, 40.7128));
        assert!(region.is_valid());
    }

    #[test]
    fn test_edges_are_radius_away() {
        let window = GeoWindow::new(1.0).unwrap();
        let (lon, lat) = (2.3522, 48.8566);
        let region = window.around(lon, lat);
        let center = Point::new(lon, lat);

        let to_north = Geodesic.distance(center, Point::new(lon, region.max_y()));
        let to_east = Geodesic.distance(center, Point::new(region.max_x(), lat));
        assert!((to_north - 1000.0).abs() < 1.0);
        // Eastward geodesics curve toward the pole, so the parallel at the
        // same latitude is reached slightly further out.
        assert!((to_east - 1000.0).abs() < 5.0);
    }

    #[test]
    fn test_window_widens_with_latitude() {
        let window = GeoWindow::new(0.5).unwrap();
        let equator = window.around(0.0, 0.0);
        let north = window.around(0.0, 70.0);

        assert!(north.width() > 2.5 * equator.width());
        assert!((north.height() - equator.height()).abs() < 5e-4);
    }

    #[test]
    fn test_window_unwraps_at_antimeridian() {
        let window = GeoWindow::new(0.5).unwrap();
        let region = window.around(179.999, 10.0);
        assert!(region.max_x() > 180.0);
        assert!(region.width() < 0.01);
        assert!(region.contains_xy(179.998, 10.0));

        let region = window.around(-179.999, 10.0);
        assert!(region.min_x() < -180.0);
        assert!(region.contains_xy(-179.998, 10.0));
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert!(GeoWindow::new(-0.1).is_err());
        assert!(GeoWindow::new(f64::NAN).is_err());
        assert!(GeoWindow::new(0.0).is_ok());
    }
}
