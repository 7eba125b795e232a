//! Nearby-pair enumeration over a built [`SpatialIndex`].
//!
//! Every center is matched against the index with its [`GeoWindow`]. The
//! center itself is reported too whenever it is stored in the index, so
//! callers filter self-matches by payload identity rather than by coordinates:
//! two distinct stops may share a position.

use crate::geo_window::GeoWindow;
use crate::quadtree::SpatialIndex;
use walkways_types::point::IndexedPoint;

/// A center and one point found inside its window.
#[derive(Debug)]
pub struct NearbyPair<'a, T> {
    pub center: &'a IndexedPoint<T>,
    pub neighbor: &'a IndexedPoint<T>,
}

// Manual impls: the pair only holds references, so it is `Copy` for any `T`.
impl<T> Clone for NearbyPair<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NearbyPair<'_, T> {}

/// Runs window queries for many centers against one read-only index.
#[derive(Debug, Clone, Copy)]
pub struct ProximityScanner<'a, T> {
    index: &'a SpatialIndex<T>,
    window: GeoWindow,
}

impl<'a, T> ProximityScanner<'a, T> {
    pub fn new(index: &'a SpatialIndex<T>, window: GeoWindow) -> Self {
        Self { index, window }
    }

    pub fn window(&self) -> GeoWindow {
        self.window
    }

    /// Invoke `on_pair(center, neighbor)` for every point inside each
    /// center's window, self-matches included. Invocation order is
    /// unspecified.
    pub fn for_each_nearby<I, F>(&self, centers: I, mut on_pair: F)
    where
        I: IntoIterator<Item = &'a IndexedPoint<T>>,
        F: FnMut(&'a IndexedPoint<T>, &'a IndexedPoint<T>),
        T: 'a,
    {
        for center in centers {
            let region = self.window.around_point(center);
            self.index
                .for_each_in_rect(&region, |neighbor| on_pair(center, neighbor));
        }
    }

    /// Collect every `(center, neighbor)` pair, self-matches included.
    pub fn scan<I>(&self, centers: I) -> Vec<NearbyPair<'a, T>>
    where
        I: IntoIterator<Item = &'a IndexedPoint<T>>,
        T: 'a,
    {
        let mut pairs = Vec::new();
        self.for_each_nearby(centers, |center, neighbor| {
            pairs.push(NearbyPair { center, neighbor })
        });
        pairs
    }

    /// Parallel [`scan`](Self::scan) over a slice of centers.
    ///
    /// The index is shared read-only between rayon workers.
    #[cfg(feature = "parallel")]
    pub fn par_scan(&self, centers: &'a [IndexedPoint<T>]) -> Vec<NearbyPair<'a, T>>
    where
        T: Sync,
    {
        use rayon::prelude::*;

        centers
            .par_iter()
            .flat_map_iter(|center| {
                let region = self.window.around_point(center);
                self.index
                    .query_rect(&region)
                    .into_iter()
                    .map(move |neighbor| NearbyPair { center, neighbor })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkways_types::region::Region;

    fn stops() -> Vec<IndexedPoint<&'static str>> {
        vec![
            IndexedPoint::new(0.0, 0.0, "A"),
            IndexedPoint::new(0.001, 0.001, "B"),
            IndexedPoint::new(50.0, 50.0, "C"),
            IndexedPoint::new(50.001, 50.001, "D"),
        ]
    }

    fn build(points: &[IndexedPoint<&'static str>]) -> SpatialIndex<&'static str> {
        SpatialIndex::bulk_load(
            Region::new(-1.0, -1.0, 60.0, 60.0),
            4,
            24,
            points.iter().cloned(),
        )
        .unwrap()
    }

    #[test]
    fn test_scan_reports_self_matches() {
        let points = stops();
        let index = build(&points);
        let scanner = ProximityScanner::new(&index, GeoWindow::new(1.0).unwrap());

        let pairs = scanner.scan(index.iter());
        let selfs = pairs
            .iter()
            .filter(|p| p.center.value() == p.neighbor.value())
            .count();
        assert_eq!(selfs, 4);
        assert_eq!(pairs.len(), 8);
    }

    #[test]
    fn test_coincident_stops_are_distinct_neighbors() {
        let points = vec![
            IndexedPoint::new(10.0, 10.0, "X"),
            IndexedPoint::new(10.0, 10.0, "Y"),
        ];
        let index = build(&points);
        let scanner = ProximityScanner::new(&index, GeoWindow::new(0.1).unwrap());

        let mut found = Vec::new();
        scanner.for_each_nearby(&points, |center, neighbor| {
            if center.value() != neighbor.value() {
                found.push((*center.value(), *neighbor.value()));
            }
        });
        found.sort_unstable();
        assert_eq!(found, vec![("X", "Y"), ("Y", "X")]);
    }

    #[test]
    fn test_centers_need_not_be_indexed() {
        let points = stops();
        let index = build(&points);
        let scanner = ProximityScanner::new(&index, GeoWindow::new(1.0).unwrap());

        let probe = [IndexedPoint::new(50.0005, 50.0005, "probe")];
        let pairs = scanner.scan(&probe);
        let mut names: Vec<_> = pairs.iter().map(|p| *p.neighbor.value()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["C", "D"]);
    }
}
