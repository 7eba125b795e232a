//! Point quadtree with rectangle and circle range queries.
//!
//! The index is built once by sequential insertion and then only read. Nodes
//! own their four children directly; a leaf splits lazily the first time it
//! receives a point beyond its capacity.
//!
//! Membership uses open intervals on every side, so a point lying exactly on
//! the root boundary or on a split line between two siblings is not stored.
//! Such points are counted in [`SpatialIndex::dropped`]. Pruning during
//! queries uses closed overlap tests, so no subtree that could hold a match is
//! ever skipped.

use crate::error::{Result, WalkwaysError};
use walkways_types::point::IndexedPoint;
use walkways_types::region::{Circle, Region};

/// Default leaf capacity.
pub const DEFAULT_CAPACITY: usize = 4;

/// Default depth limit. Below it, leaves accept points past their capacity,
/// which keeps coincident points from splitting forever.
pub const DEFAULT_MAX_DEPTH: usize = 24;

/// Outcome of offering a point to one node.
enum Placement<T> {
    /// The point is outside the node's region and is handed back.
    Outside(IndexedPoint<T>),
    /// The point was inside the node's region.
    Placed(Outcome),
}

#[derive(Debug, Clone, Copy, Default)]
struct Outcome {
    /// Whether the offered point ended up in a leaf.
    kept: bool,
    /// Previously stored points that fell on a new split line.
    evicted: usize,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    capacity: usize,
    max_depth: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    region: Region,
    points: Vec<IndexedPoint<T>>,
    /// NW, NE, SW, SE. A node is a leaf iff this is `None`.
    children: Option<Box<[Node<T>; 4]>>,
}

impl<T> Node<T> {
    fn new(region: Region) -> Self {
        Self {
            region,
            points: Vec::new(),
            children: None,
        }
    }

    #[cfg(test)]
    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn insert(&mut self, point: IndexedPoint<T>, limits: Limits, depth: usize) -> Placement<T> {
        if !self.region.contains(&point) {
            return Placement::Outside(point);
        }

        if let Some(children) = self.children.as_deref_mut() {
            return Placement::Placed(offer(children, point, limits, depth + 1));
        }

        if self.points.len() < limits.capacity || depth >= limits.max_depth {
            self.points.push(point);
            return Placement::Placed(Outcome {
                kept: true,
                evicted: 0,
            });
        }

        let [nw, ne, sw, se] = self.region.quarter();
        let mut children = Box::new([
            Node::new(nw),
            Node::new(ne),
            Node::new(sw),
            Node::new(se),
        ]);

        let mut evicted = 0;
        for held in std::mem::take(&mut self.points) {
            let outcome = offer(&mut children, held, limits, depth + 1);
            evicted += outcome.evicted + usize::from(!outcome.kept);
        }
        let outcome = offer(&mut children, point, limits, depth + 1);

        self.children = Some(children);
        Placement::Placed(Outcome {
            kept: outcome.kept,
            evicted: evicted + outcome.evicted,
        })
    }

    fn visit_rect<'a, F>(&'a self, query: &Region, visit: &mut F)
    where
        F: FnMut(&'a IndexedPoint<T>),
    {
        if !self.region.overlaps(query) {
            return;
        }

        match self.children.as_deref() {
            None => {
                for point in &self.points {
                    if query.contains(point) {
                        visit(point);
                    }
                }
            }
            Some(children) => {
                for child in children {
                    child.visit_rect(query, visit);
                }
            }
        }
    }

    fn visit_circle<'a, F>(&'a self, circle: &Circle, visit: &mut F)
    where
        F: FnMut(&'a IndexedPoint<T>),
    {
        if !self.region.overlaps_circle(circle) {
            return;
        }

        match self.children.as_deref() {
            None => {
                for point in &self.points {
                    if circle.contains(point) {
                        visit(point);
                    }
                }
            }
            Some(children) => {
                for child in children {
                    child.visit_circle(circle, visit);
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self.children.as_deref() {
            None => 0,
            Some(children) => 1 + children.iter().map(Node::depth).max().unwrap_or(0),
        }
    }

    fn leaf_count(&self) -> usize {
        match self.children.as_deref() {
            None => 1,
            Some(children) => children.iter().map(Node::leaf_count).sum(),
        }
    }
}

/// Offer `point` to each child in turn until one whose region contains it
/// takes it. A point rejected by all four lies on a split line and is lost.
fn offer<T>(
    children: &mut [Node<T>; 4],
    mut point: IndexedPoint<T>,
    limits: Limits,
    depth: usize,
) -> Outcome {
    for child in children.iter_mut() {
        match child.insert(point, limits, depth) {
            Placement::Outside(rejected) => point = rejected,
            Placement::Placed(outcome) => return outcome,
        }
    }
    Outcome::default()
}

/// A quadtree over points carrying a payload of type `T`.
///
/// # Examples
///
/// ```rust
/// use walkways::SpatialIndex;
/// use walkways_types::point::IndexedPoint;
/// use walkways_types::region::Region;
///
/// let mut index = SpatialIndex::new(Region::new(-1.0, -1.0, 60.0, 60.0), 4)?;
/// index.insert(IndexedPoint::new(0.0, 0.0, "A"));
/// index.insert(IndexedPoint::new(50.0, 50.0, "C"));
///
/// let found = index.query_rect(&Region::new(-0.5, -0.5, 0.5, 0.5));
/// assert_eq!(found.len(), 1);
/// assert_eq!(*found[0].value(), "A");
/// # Ok::<(), walkways::WalkwaysError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    root: Node<T>,
    limits: Limits,
    len: usize,
    dropped: usize,
}

impl<T> SpatialIndex<T> {
    /// Create an empty index covering `region`.
    ///
    /// Points are only retained if they lie strictly inside `region`, so the
    /// region should be padded around the input extent.
    pub fn new(region: Region, capacity: usize) -> Result<Self> {
        if !region.is_valid() {
            return Err(WalkwaysError::InvalidInput(format!(
                "Index region must be finite with positive width and height, got: {:?}",
                region
            )));
        }
        if capacity == 0 {
            return Err(WalkwaysError::InvalidInput(
                "Leaf capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            root: Node::new(region),
            limits: Limits {
                capacity,
                max_depth: DEFAULT_MAX_DEPTH,
            },
            len: 0,
            dropped: 0,
        })
    }

    /// Set the depth below which leaves stop splitting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.limits.max_depth = max_depth;
        self
    }

    /// Build an index from `points`, inserting them in iteration order.
    pub fn bulk_load(
        region: Region,
        capacity: usize,
        max_depth: usize,
        points: impl IntoIterator<Item = IndexedPoint<T>>,
    ) -> Result<Self> {
        let mut index = Self::new(region, capacity)?.with_max_depth(max_depth);
        for point in points {
            index.insert(point);
        }

        if index.dropped > 0 {
            log::warn!(
                "Dropped {} of {} points outside the index region or on a split line",
                index.dropped,
                index.len + index.dropped
            );
        }
        log::debug!(
            "Built quadtree with {} points in {} leaves, depth {}",
            index.len,
            index.leaf_count(),
            index.depth()
        );

        Ok(index)
    }

    /// Insert a point. Returns `false` when the point was not retained.
    ///
    /// Points outside the index region, or exactly on its boundary, are
    /// silently dropped and counted. A split triggered by this insertion may
    /// also lose earlier points that fall on the new split lines; those are
    /// counted as well.
    pub fn insert(&mut self, point: IndexedPoint<T>) -> bool {
        match self.root.insert(point, self.limits, 0) {
            Placement::Outside(point) => {
                log::trace!("Point ({}, {}) is outside the index region", point.x(), point.y());
                self.dropped += 1;
                false
            }
            Placement::Placed(outcome) => {
                if outcome.kept {
                    self.len += 1;
                } else {
                    self.dropped += 1;
                }
                self.len -= outcome.evicted;
                self.dropped += outcome.evicted;
                outcome.kept
            }
        }
    }

    /// All indexed points strictly inside `region`.
    pub fn query_rect(&self, region: &Region) -> Vec<&IndexedPoint<T>> {
        let mut found = Vec::new();
        self.root.visit_rect(region, &mut |point| found.push(point));
        found
    }

    /// Visit every indexed point strictly inside `region` without collecting.
    pub fn for_each_in_rect<'a, F>(&'a self, region: &Region, mut visit: F)
    where
        F: FnMut(&'a IndexedPoint<T>),
    {
        self.root.visit_rect(region, &mut visit);
    }

    /// All indexed points strictly inside `circle`.
    pub fn query_circle(&self, circle: &Circle) -> Vec<&IndexedPoint<T>> {
        let mut found = Vec::new();
        self.root.visit_circle(circle, &mut |point| found.push(point));
        found
    }

    /// Number of points currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of inserted points that are not stored.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The root region.
    pub fn region(&self) -> &Region {
        &self.root.region
    }

    pub fn capacity(&self) -> usize {
        self.limits.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.limits.max_depth
    }

    /// Depth of the deepest leaf; an unsplit root has depth zero.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Iterate over every stored point in no particular order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            pending: vec![&self.root],
            current: Default::default(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SpatialIndex<T> {
    type Item = &'a IndexedPoint<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the points of a [`SpatialIndex`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    pending: Vec<&'a Node<T>>,
    current: std::slice::Iter<'a, IndexedPoint<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a IndexedPoint<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(point) = self.current.next() {
                return Some(point);
            }
            let node = self.pending.pop()?;
            match node.children.as_deref() {
                Some(children) => self.pending.extend(children.iter()),
                None => self.current = node.points.iter(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(capacity: usize) -> SpatialIndex<u32> {
        SpatialIndex::new(Region::new(0.0, 0.0, 100.0, 100.0), capacity).unwrap()
    }

    fn values(found: Vec<&IndexedPoint<u32>>) -> Vec<u32> {
        let mut values: Vec<u32> = found.into_iter().map(|p| *p.value()).collect();
        values.sort_unstable();
        values
    }

    #[test]
    fn test_leaf_below_capacity_does_not_split() {
        let mut index = index(4);
        for i in 0..4 {
            assert!(index.insert(IndexedPoint::new(10.0 + i as f64, 10.0, i)));
        }
        assert!(index.root.is_leaf());
        assert_eq!(index.len(), 4);
        assert_eq!(index.depth(), 0);
    }

    #[test]
    fn test_overflow_splits_once_and_empties_parent() {
        let mut index = index(4);
        let coords = [(10.0, 10.0), (90.0, 10.0), (10.0, 90.0), (90.0, 90.0), (20.0, 20.0)];
        for (i, (x, y)) in coords.into_iter().enumerate() {
            assert!(index.insert(IndexedPoint::new(x, y, i as u32)));
        }

        assert!(!index.root.is_leaf());
        assert!(index.root.points.is_empty());
        assert_eq!(index.depth(), 1);
        assert_eq!(index.leaf_count(), 4);
        assert_eq!(index.len(), 5);

        let children = index.root.children.as_deref().unwrap();
        // SW holds (10, 10) and (20, 20).
        assert_eq!(children[2].points.len(), 2);
    }

    #[test]
    fn test_boundary_points_are_dropped() {
        let mut index = index(4);
        assert!(!index.insert(IndexedPoint::new(0.0, 50.0, 1)));
        assert!(!index.insert(IndexedPoint::new(50.0, 100.0, 2)));
        assert!(!index.insert(IndexedPoint::new(150.0, 50.0, 3)));
        assert!(index.insert(IndexedPoint::new(1.0, 50.0, 4)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.dropped(), 3);
    }

    #[test]
    fn test_points_on_split_line_are_lost() {
        let mut index = index(1);
        assert!(index.insert(IndexedPoint::new(50.0, 10.0, 1)));
        // Splitting at x = 50 leaves the first point on the shared edge.
        assert!(index.insert(IndexedPoint::new(10.0, 10.0, 2)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.dropped(), 1);
        assert_eq!(values(index.query_rect(index.region())), vec![2]);
    }

    #[test]
    fn test_query_rect_is_open() {
        let mut index = index(4);
        index.insert(IndexedPoint::new(10.0, 10.0, 1));
        index.insert(IndexedPoint::new(20.0, 20.0, 2));

        assert_eq!(values(index.query_rect(&Region::new(5.0, 5.0, 15.0, 15.0))), vec![1]);
        // (20, 20) lies on the query's top-right corner.
        assert_eq!(values(index.query_rect(&Region::new(5.0, 5.0, 20.0, 20.0))), vec![1]);
        assert!(index.query_rect(&Region::new(30.0, 30.0, 40.0, 40.0)).is_empty());
    }

    #[test]
    fn test_query_circle() {
        let mut index = index(2);
        for (i, x) in [10.0, 12.0, 14.0, 30.0, 70.0].into_iter().enumerate() {
            index.insert(IndexedPoint::new(x, 50.5, i as u32));
        }

        let found = index.query_circle(&Circle::new(12.0, 50.5, 2.5));
        assert_eq!(values(found), vec![0, 1, 2]);

        // Exactly on the circumference is excluded.
        let found = index.query_circle(&Circle::new(12.0, 50.5, 2.0));
        assert_eq!(values(found), vec![1]);
    }

    #[test]
    fn test_coincident_points_stop_at_max_depth() {
        let mut index = index(2).with_max_depth(5);
        for i in 0..10 {
            assert!(index.insert(IndexedPoint::new(33.3, 66.6, i)));
        }
        assert_eq!(index.len(), 10);
        assert_eq!(index.depth(), 5);
        assert_eq!(index.query_rect(&Region::new(33.0, 66.0, 34.0, 67.0)).len(), 10);
    }

    #[test]
    fn test_iter_visits_every_stored_point() {
        let mut index = index(3);
        for i in 0..50u32 {
            let x = 1.0 + (i as f64 * 7.3) % 97.0;
            let y = 1.0 + (i as f64 * 3.1) % 97.0;
            index.insert(IndexedPoint::new(x, y, i));
        }
        assert_eq!(index.iter().count(), index.len());
        assert_eq!(values(index.iter().collect()), values(index.query_rect(index.region())));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(SpatialIndex::<()>::new(Region::new(0.0, 0.0, 0.0, 1.0), 4).is_err());
        assert!(SpatialIndex::<()>::new(Region::new(0.0, 0.0, 1.0, 1.0), 0).is_err());
    }
}
