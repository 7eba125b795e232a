use crate::point::IndexedPoint;
use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its bottom-left and top-right corners.
///
/// Point membership ([`Region::contains`]) is an open-interval test: points on
/// any of the four edges are outside. Region overlap ([`Region::overlaps`]) is
/// closed, so two regions that only touch along an edge do overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// The underlying geometric rectangle
    pub rect: Rect<f64>,
}

impl Region {
    /// Create a region from minimum and maximum coordinates.
    ///
    /// `geo::Rect` orders the corners, so swapped bounds still produce a
    /// well-formed rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use walkways_types::region::Region;
    ///
    /// let region = Region::new(-1.0, -1.0, 60.0, 60.0);
    /// assert_eq!(region.width(), 61.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    pub fn from_corners(bottom_left: Coord<f64>, top_right: Coord<f64>) -> Self {
        Self {
            rect: Rect::new(bottom_left, top_right),
        }
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self { rect }
    }

    /// Smallest region covering every point, or `None` for an empty input.
    ///
    /// The extreme points lie on the returned region's edges and are therefore
    /// not [`contains`](Self::contains)-ed by it; pad with [`expand`](Self::expand)
    /// before using the result as an index root.
    pub fn bounding<'a, T: 'a>(points: impl IntoIterator<Item = &'a IndexedPoint<T>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min_x, mut min_y) = (first.x(), first.y());
        let (mut max_x, mut max_y) = (min_x, min_y);
        for point in points {
            min_x = min_x.min(point.x());
            min_y = min_y.min(point.y());
            max_x = max_x.max(point.x());
            max_y = max_y.max(point.y());
        }
        Some(Self::new(min_x, min_y, max_x, max_y))
    }

    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    pub fn bottom_left(&self) -> Coord<f64> {
        self.rect.min()
    }

    pub fn top_right(&self) -> Coord<f64> {
        self.rect.max()
    }

    pub fn center(&self) -> Coord<f64> {
        self.rect.center()
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Whether the region has finite bounds and a non-zero extent on both axes.
    pub fn is_valid(&self) -> bool {
        let finite = [self.min_x(), self.min_y(), self.max_x(), self.max_y()]
            .iter()
            .all(|v| v.is_finite());
        finite && self.min_x() < self.max_x() && self.min_y() < self.max_y()
    }

    /// Open-interval membership test for a coordinate.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        x > self.min_x() && y > self.min_y() && x < self.max_x() && y < self.max_y()
    }

    /// Open-interval membership test. Points on the boundary are outside.
    pub fn contains<T>(&self, point: &IndexedPoint<T>) -> bool {
        self.contains_xy(point.x(), point.y())
    }

    /// Closed-interval overlap test. Touching regions overlap.
    pub fn overlaps(&self, other: &Region) -> bool {
        !(self.min_x() > other.max_x()
            || other.min_x() > self.max_x()
            || self.min_y() > other.max_y()
            || other.min_y() > self.max_y())
    }

    /// Closed overlap test against a circle, using the closest point of the
    /// rectangle to the circle's center.
    pub fn overlaps_circle(&self, circle: &Circle) -> bool {
        let test_x = circle.x().clamp(self.min_x(), self.max_x());
        let test_y = circle.y().clamp(self.min_y(), self.max_y());
        let dx = test_x - circle.x();
        let dy = test_y - circle.y();
        dx * dx + dy * dy <= circle.radius_squared()
    }

    /// Split at the midpoint into four quadrants, ordered NW, NE, SW, SE.
    pub fn quarter(&self) -> [Region; 4] {
        let (x_low, y_low) = (self.min_x(), self.min_y());
        let (x_high, y_high) = (self.max_x(), self.max_y());
        let x_mid = x_low + (x_high - x_low) / 2.0;
        let y_mid = y_low + (y_high - y_low) / 2.0;
        [
            Self::new(x_low, y_mid, x_mid, y_high),
            Self::new(x_mid, y_mid, x_high, y_high),
            Self::new(x_low, y_low, x_mid, y_mid),
            Self::new(x_mid, y_low, x_high, y_mid),
        ]
    }

    /// Grow the region by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.min_x() - amount,
            self.min_y() - amount,
            self.max_x() + amount,
            self.max_y() + amount,
        )
    }
}

/// A circle in the same planar coordinate space as the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    center: Coord<f64>,
    radius: f64,
}

impl Circle {
    /// Create a circle centered on `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative or NaN.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        assert!(radius >= 0.0, "Circle radius must be non-negative, got {radius}");
        Self {
            center: Coord { x, y },
            radius,
        }
    }

    pub fn x(&self) -> f64 {
        self.center.x
    }

    pub fn y(&self) -> f64 {
        self.center.y
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn radius_squared(&self) -> f64 {
        self.radius * self.radius
    }

    /// Strict containment: points exactly on the circumference are outside.
    pub fn contains<T>(&self, point: &IndexedPoint<T>) -> bool {
        point.distance_squared_to(self.center.x, self.center.y) < self.radius_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_open() {
        let region = Region::new(0.0, 0.0, 10.0, 10.0);
        assert!(region.contains(&IndexedPoint::bare(5.0, 5.0)));
        assert!(!region.contains(&IndexedPoint::bare(0.0, 5.0)));
        assert!(!region.contains(&IndexedPoint::bare(5.0, 10.0)));
        assert!(!region.contains(&IndexedPoint::bare(10.0, 10.0)));
    }

    #[test]
    fn test_overlap_is_closed() {
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let touching = Region::new(10.0, 0.0, 20.0, 10.0);
        let apart = Region::new(10.5, 0.0, 20.0, 10.0);
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_quarter_partitions_at_midpoint() {
        let [nw, ne, sw, se] = Region::new(0.0, 0.0, 4.0, 2.0).quarter();
        assert_eq!(nw, Region::new(0.0, 1.0, 2.0, 2.0));
        assert_eq!(ne, Region::new(2.0, 1.0, 4.0, 2.0));
        assert_eq!(sw, Region::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(se, Region::new(2.0, 0.0, 4.0, 1.0));
    }

    #[test]
    fn test_bounding_and_expand() {
        let points = [
            IndexedPoint::bare(1.0, 5.0),
            IndexedPoint::bare(-2.0, 3.0),
            IndexedPoint::bare(4.0, -1.0),
        ];
        let extent = Region::bounding(&points).unwrap();
        assert_eq!(extent, Region::new(-2.0, -1.0, 4.0, 5.0));
        assert!(!extent.contains(&points[1]));
        assert!(extent.expand(0.5).contains(&points[1]));
        assert!(Region::bounding::<()>(&[]).is_none());
    }

    #[test]
    fn test_is_valid() {
        assert!(Region::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Region::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Region::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
    }

    #[test]
    fn test_circle_overlap_and_containment() {
        let region = Region::new(0.0, 0.0, 1.0, 1.0);
        // Closest point of the region is (1, 0.5), exactly one unit away.
        let touching = Circle::new(2.0, 0.5, 1.0);
        assert!(region.overlaps_circle(&touching));
        assert!(!region.overlaps_circle(&Circle::new(2.0, 0.5, 0.99)));

        // Circumference is outside the circle.
        assert!(!touching.contains(&IndexedPoint::bare(1.0, 0.5)));
        assert!(touching.contains(&IndexedPoint::bare(1.01, 0.5)));
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_radius_panics() {
        let _ = Circle::new(0.0, 0.0, -1.0);
    }
}
