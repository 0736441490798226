//! Quadrilateral lot representation and its geometric predicates.

use crate::{LotId, NeighborQuery, Point};

/// Distance, along each axis, between a vertex and the probe points used by
/// [`Lot::has_exit_to_exterior`].
pub const SPREAD: f64 = 8.0;

/// Tolerance for the area comparison in [`Lot::is_inside`].
///
/// Points on a lot's boundary count as inside.
pub const INSIDE_EPSILON: f64 = 1e-6;

/// Direction along which a lot is cut into children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitAxis {
    /// Divide along the width: children sit side by side, cut lines run
    /// from the top edge to the bottom edge.
    Width,
    /// Divide along the height: children are stacked, cut lines run from the
    /// left edge to the right edge.
    Height,
}

/// A quadrilateral lot with four ordered vertices.
///
/// The vertices go around the quadrilateral in the order
/// top-left, top-right, bottom-right, bottom-left. `priority` is the
/// subdivision depth: the root lot has priority 0 and every child has its
/// parent's priority plus one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lot {
    top_left: Point,
    top_right: Point,
    bottom_right: Point,
    bottom_left: Point,
    priority: u32,
}

impl Lot {
    /// Creates a root lot (priority 0) from its four corners.
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            priority: 0,
        }
    }

    /// Creates an axis-aligned rectangular root lot.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        )
    }

    /// Returns this lot with a different priority.
    #[inline]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Corner where the top and left edges meet.
    #[inline]
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Corner where the top and right edges meet.
    #[inline]
    pub fn top_right(&self) -> Point {
        self.top_right
    }

    /// Corner where the bottom and right edges meet.
    #[inline]
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    /// Corner where the bottom and left edges meet.
    #[inline]
    pub fn bottom_left(&self) -> Point {
        self.bottom_left
    }

    /// Subdivision depth of this lot.
    #[inline]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns the four vertices in winding order
    /// (top-left, top-right, bottom-right, bottom-left).
    #[inline]
    pub fn vertices(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Width of the lot.
    ///
    /// Irregular lots (trapezoids, parallelograms) use the largest horizontal
    /// extent among the pairings of left and right vertices. Never negative.
    pub fn width(&self) -> f64 {
        let (tl, tr, br, bl) = (
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        );
        (tr.x() - tl.x())
            .max(br.x() - bl.x())
            .max(br.x() - tl.x())
            .max(tr.x() - bl.x())
            .max(0.0)
    }

    /// Height of the lot, defined like [`Lot::width`] on the vertical axis.
    pub fn height(&self) -> f64 {
        let (tl, tr, br, bl) = (
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        );
        (bl.y() - tl.y())
            .max(br.y() - tr.y())
            .max(bl.y() - tr.y())
            .max(br.y() - tl.y())
            .max(0.0)
    }

    /// Absolute area via the shoelace formula.
    pub fn area(&self) -> f64 {
        let v = self.vertices();
        let mut twice = 0.0;
        for i in 0..4 {
            let a = v[i];
            let b = v[(i + 1) % 4];
            twice += a.x() * b.y() - b.x() * a.y();
        }
        (twice / 2.0).abs()
    }

    /// Center of mass of the four vertices.
    pub fn centroid(&self) -> Point {
        let v = self.vertices();
        let x = v.iter().map(Point::x).sum::<f64>() / 4.0;
        let y = v.iter().map(Point::y).sum::<f64>() / 4.0;
        Point::new(x, y)
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    pub fn bounding_box(&self) -> (Point, Point) {
        let v = self.vertices();
        let min_x = v.iter().map(Point::x).fold(f64::INFINITY, f64::min);
        let min_y = v.iter().map(Point::y).fold(f64::INFINITY, f64::min);
        let max_x = v.iter().map(Point::x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = v.iter().map(Point::y).fold(f64::NEG_INFINITY, f64::max);
        (Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Tests whether `point` lies inside the lot (boundary included).
    ///
    /// The four triangles formed by `point` and each edge cover exactly the
    /// lot's area when the point is inside, and more when it is outside.
    /// Requires the vertices to be in winding order.
    pub fn is_inside(&self, point: Point) -> bool {
        let v = self.vertices();
        let around: f64 = (0..4)
            .map(|i| triangle_area(point, v[i], v[(i + 1) % 4]))
            .sum();
        (around - self.area()).abs() < INSIDE_EPSILON
    }

    /// Returns `true` if no edge of the lot crosses its opposite edge.
    ///
    /// Adjacent edges share a vertex and cannot cross properly, so only the
    /// two pairs of opposite edges are checked.
    pub fn is_simple(&self) -> bool {
        !segments_cross(self.top_left, self.top_right, self.bottom_right, self.bottom_left)
            && !segments_cross(self.top_right, self.bottom_right, self.bottom_left, self.top_left)
    }

    /// The sixteen probe points used to look for an exit: four per vertex,
    /// offset by [`SPREAD`] in each diagonal direction.
    pub fn probe_points(&self) -> [Point; 16] {
        const DIAGONALS: [(f64, f64); 4] = [
            (-SPREAD, -SPREAD),
            (SPREAD, SPREAD),
            (SPREAD, -SPREAD),
            (-SPREAD, SPREAD),
        ];

        let mut probes = [Point::default(); 16];
        for (i, vertex) in self.vertices().into_iter().enumerate() {
            for (j, (dx, dy)) in DIAGONALS.into_iter().enumerate() {
                probes[i * 4 + j] = vertex.translate(dx, dy);
            }
        }
        probes
    }

    /// Checks that the lot is not enclosed by its neighbors.
    ///
    /// A probe is free when no lot returned by `lookup` contains it, ignoring
    /// the lot identified by `exclude`. The lot has an exit when at least one
    /// of its [`probe_points`](Lot::probe_points) is free.
    ///
    /// Excluding the lot itself answers whether it touches a gap between its
    /// neighbours. Passing `None` for a lot that is covered by `lookup`, such
    /// as a child checked against a layout holding its parent, only accepts
    /// points outside every lot.
    pub fn has_exit_to_exterior<Q>(&self, lookup: &Q, exclude: Option<LotId>) -> bool
    where
        Q: NeighborQuery + ?Sized,
    {
        self.probe_points().into_iter().any(|probe| {
            !lookup
                .lots_near(probe)
                .into_iter()
                .any(|(id, other)| Some(id) != exclude && other.is_inside(probe))
        })
    }

    /// Cuts the lot into `count` children along `axis`.
    ///
    /// Children are produced by interpolating the parent's edges at
    /// `t = (i - 1) / count .. i / count`, in order from the top-left corner.
    /// Each child gets `priority + 1`. A `count` of zero is treated as one.
    pub fn split(&self, axis: SplitAxis, count: usize) -> Vec<Lot> {
        let count = count.max(1);
        let priority = self.priority + 1;

        (1..=count)
            .map(|i| {
                let start = (i - 1) as f64 / count as f64;
                let end = i as f64 / count as f64;

                let child = match axis {
                    SplitAxis::Width => {
                        let top = (self.top_left, self.top_right);
                        let bottom = (self.bottom_left, self.bottom_right);
                        Lot::new(
                            top.0.interpolate(top.1, start),
                            top.0.interpolate(top.1, end),
                            bottom.0.interpolate(bottom.1, end),
                            bottom.0.interpolate(bottom.1, start),
                        )
                    }
                    SplitAxis::Height => {
                        let left = (self.top_left, self.bottom_left);
                        let right = (self.top_right, self.bottom_right);
                        Lot::new(
                            left.0.interpolate(left.1, start),
                            right.0.interpolate(right.1, start),
                            right.0.interpolate(right.1, end),
                            left.0.interpolate(left.1, end),
                        )
                    }
                };
                child.with_priority(priority)
            })
            .collect()
    }
}

/// Unsigned area of the triangle `abc`.
#[inline]
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    ((a.x() * (b.y() - c.y()) + b.x() * (c.y() - a.y()) + c.x() * (a.y() - b.y())) / 2.0).abs()
}

/// Signed orientation of `c` relative to the directed line `ab`.
#[inline]
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

/// Proper crossing of segments `p1p2` and `q1q2` (touching does not count).
fn segments_cross(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(p1, p2, q1);
    let d2 = orientation(p1, p2, q2);
    let d3 = orientation(q1, q2, p1);
    let d4 = orientation(q1, q2, p2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trapezoid() -> Lot {
        Lot::new(
            Point::new(100.0, 200.0),
            Point::new(600.0, 200.0),
            Point::new(650.0, 1200.0),
            Point::new(150.0, 1100.0),
        )
    }

    #[test]
    fn rectangle_dimensions() {
        let lot = Lot::rectangle(0.0, 0.0, 100.0, 200.0);
        assert_eq!(lot.width(), 100.0);
        assert_eq!(lot.height(), 200.0);
        assert_eq!(lot.area(), 20_000.0);
        assert_eq!(lot.priority(), 0);
    }

    #[test]
    fn irregular_dimensions_take_largest_extent() {
        let lot = trapezoid();
        // br.x - tl.x = 650 - 100
        assert_eq!(lot.width(), 550.0);
        // br.y - tl.y = 1200 - 200
        assert_eq!(lot.height(), 1000.0);
    }

    #[test]
    fn degenerate_lot_has_zero_size() {
        let p = Point::new(5.0, 5.0);
        let lot = Lot::new(p, p, p, p);
        assert_eq!(lot.width(), 0.0);
        assert_eq!(lot.height(), 0.0);
        assert_eq!(lot.area(), 0.0);
    }

    #[test]
    fn inverted_lot_never_reports_negative_size() {
        // Vertices listed right-to-left and bottom-to-top.
        let lot = Lot::new(
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!(lot.width() >= 0.0);
        assert!(lot.height() >= 0.0);
    }

    #[test]
    fn shoelace_area_of_trapezoid() {
        let lot = Lot::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(3.0, 2.0),
            Point::new(1.0, 2.0),
        );
        assert!((lot.area() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_area_helper() {
        let area = triangle_area(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0));
        assert_eq!(area, 6.0);
    }

    #[test]
    fn inside_and_outside() {
        let lot = Lot::rectangle(0.0, 0.0, 100.0, 100.0);
        assert!(lot.is_inside(Point::new(50.0, 50.0)));
        assert!(lot.is_inside(Point::new(0.0, 50.0)), "boundary counts as inside");
        assert!(!lot.is_inside(Point::new(150.0, 150.0)));
        assert!(!lot.is_inside(Point::new(-0.5, 50.0)));
    }

    #[test]
    fn inside_irregular_lot() {
        let lot = trapezoid();
        assert!(lot.is_inside(lot.centroid()));
        assert!(!lot.is_inside(Point::new(120.0, 1150.0)));
    }

    #[test]
    fn bounding_box_of_trapezoid() {
        let (min, max) = trapezoid().bounding_box();
        assert_eq!(min, Point::new(100.0, 200.0));
        assert_eq!(max, Point::new(650.0, 1200.0));
    }

    #[test]
    fn simple_and_twisted() {
        assert!(trapezoid().is_simple());

        // Swapping two vertices yields a bow-tie.
        let twisted = Lot::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        );
        assert!(!twisted.is_simple());
    }

    #[test]
    fn probes_surround_every_vertex() {
        let lot = Lot::rectangle(0.0, 0.0, 100.0, 100.0);
        let probes = lot.probe_points();
        assert_eq!(probes.len(), 16);
        assert!(probes.contains(&Point::new(-SPREAD, -SPREAD)));
        assert!(probes.contains(&Point::new(100.0 + SPREAD, 100.0 + SPREAD)));
        for vertex in lot.vertices() {
            let near = probes
                .iter()
                .filter(|p| (p.distance_to(vertex) - SPREAD * 2f64.sqrt()).abs() < 1e-9)
                .count();
            assert_eq!(near, 4);
        }
    }

    #[test]
    fn split_along_width_tiles_parent() {
        let parent = Lot::rectangle(0.0, 0.0, 300.0, 100.0).with_priority(2);
        let children = parent.split(SplitAxis::Width, 3);

        assert_eq!(children.len(), 3);
        assert_eq!(children[0], Lot::rectangle(0.0, 0.0, 100.0, 100.0).with_priority(3));
        assert_eq!(children[2], Lot::rectangle(200.0, 0.0, 100.0, 100.0).with_priority(3));

        let total: f64 = children.iter().map(Lot::area).sum();
        assert!((total - parent.area()).abs() < 1e-6);
    }

    #[test]
    fn split_along_height_tiles_parent() {
        let parent = trapezoid();
        let children = parent.split(SplitAxis::Height, 4);

        assert_eq!(children.len(), 4);
        assert_eq!(children[0].top_left(), parent.top_left());
        assert_eq!(children[0].top_right(), parent.top_right());
        assert_eq!(children[3].bottom_left(), parent.bottom_left());
        assert_eq!(children[3].bottom_right(), parent.bottom_right());
        for pair in children.windows(2) {
            assert_eq!(pair[0].bottom_left(), pair[1].top_left());
            assert_eq!(pair[0].bottom_right(), pair[1].top_right());
        }

        let total: f64 = children.iter().map(Lot::area).sum();
        assert!((total - parent.area()).abs() / parent.area() < 1e-9);
        assert!(children.iter().all(|c| c.priority() == 1 && c.is_simple()));
    }

    #[test]
    fn split_count_zero_yields_one_child() {
        let parent = Lot::rectangle(0.0, 0.0, 10.0, 10.0);
        let children = parent.split(SplitAxis::Width, 0);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0], parent.with_priority(1));
    }

    #[test]
    fn isolated_lot_has_exit() {
        let lot = Lot::rectangle(0.0, 0.0, 100.0, 100.0);
        let others: [Lot; 0] = [];
        assert!(lot.has_exit_to_exterior(&others[..], None));
    }

    #[test]
    fn enclosed_lot_has_no_exit() {
        let small = Lot::rectangle(100.0, 100.0, 20.0, 20.0);
        let cover = Lot::rectangle(0.0, 0.0, 300.0, 300.0);
        let lots = [cover];
        assert!(!small.has_exit_to_exterior(&lots[..], None));
    }

    #[test]
    fn covering_parent_blocks_inner_points() {
        let parent = Lot::rectangle(0.0, 0.0, 300.0, 300.0);
        let edge = Lot::rectangle(0.0, 100.0, 100.0, 100.0);
        let inner = Lot::rectangle(100.0, 100.0, 100.0, 100.0);
        let lots = [parent];
        assert!(edge.has_exit_to_exterior(&lots[..], None));
        assert!(!inner.has_exit_to_exterior(&lots[..], None));
    }

    #[test]
    fn excluded_lot_is_ignored() {
        let small = Lot::rectangle(100.0, 100.0, 20.0, 20.0);
        let cover = Lot::rectangle(0.0, 0.0, 300.0, 300.0);
        let lots = [cover];
        assert!(small.has_exit_to_exterior(&lots[..], Some(LotId::new(0))));
    }
}
