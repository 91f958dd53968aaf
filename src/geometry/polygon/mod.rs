mod with_holes;

pub use with_holes::Polygon;

use std::cmp::Ordering;

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::error::{GeometryError, Result};
use crate::math::{Precision, Scalar};

use super::{
    Aabb, Bounded, ConvexArea, Intersect, Intersection, Line, LineSegment, Planar, Plane, Point, Transform,
    Triangle, Vector,
};

slotmap::new_key_type! {
    /// Identifier of a hole within its polygon.
    pub struct HoleId;
}

/// A simple planar polygon, possibly concave, given by its boundary ring.
///
/// The polygon is stored as its convex hull minus the external holes: the
/// regions between the hull and each concave stretch of the ring. Each hole
/// is itself a `PolygonNoInternalHoles`, so deeper concavities nest.
#[derive(Debug, Clone)]
pub struct PolygonNoInternalHoles<S: Scalar = f64> {
    points: Vec<Point<S>>,
    edges: Vec<LineSegment<S>>,
    hull: ConvexArea<S>,
    holes: SlotMap<HoleId, PolygonNoInternalHoles<S>>,
    epsilon: f64,
}

impl<S: Scalar> PolygonNoInternalHoles<S> {
    /// Builds the polygon and decomposes it into hull and external holes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CollinearPoints`] or
    /// [`GeometryError::NotCoplanar`] if the ring spans no single plane, and
    /// [`GeometryError::CoincidentPoints`] if two consecutive points coincide.
    pub fn new(points: Vec<Point<S>>, epsilon: f64) -> Result<Self> {
        let hull = ConvexArea::new(&points, epsilon)?;
        let edges = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| LineSegment::new(a.clone(), b.clone()))
            .collect::<Result<Vec<_>>>()?;
        let holes = decompose(&points, &hull, epsilon)?;
        Ok(Self {
            points,
            edges,
            hull,
            holes,
            epsilon,
        })
    }

    /// Returns the ring as given.
    #[must_use]
    pub fn points(&self) -> &[Point<S>] {
        &self.points
    }

    /// Returns the ring edges.
    #[must_use]
    pub fn edges(&self) -> &[LineSegment<S>] {
        &self.edges
    }

    #[must_use]
    pub fn plane(&self) -> &Plane<S> {
        self.hull.plane()
    }

    /// Returns the convex hull of the ring.
    #[must_use]
    pub fn hull(&self) -> &ConvexArea<S> {
        &self.hull
    }

    pub fn holes(&self) -> impl Iterator<Item = (HoleId, &Self)> {
        self.holes.iter()
    }

    #[must_use]
    pub fn hole(&self, id: HoleId) -> Option<&Self> {
        self.holes.get(id)
    }

    /// Returns the number of external holes.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// True if the ring is its own hull.
    #[must_use]
    pub fn is_convex(&self) -> bool {
        self.holes.is_empty()
    }

    #[must_use]
    pub fn is_on_boundary(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.edges.iter().any(|e| e.contains(pt, epsilon))
    }

    /// True if `pt` is inside the polygon or on its boundary.
    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        if !self.hull.contains(pt, epsilon) {
            return false;
        }
        self.is_on_boundary(pt, epsilon) || !self.holes.values().any(|h| h.contains(pt, epsilon))
    }

    #[must_use]
    pub fn intersects_segment(&self, segment: &LineSegment<S>, epsilon: f64) -> bool {
        let pl = self.plane();
        if !(pl.is_on_plane(segment.p(), epsilon) && pl.is_on_plane(&segment.q(), epsilon)) {
            return match pl.intersection(segment, epsilon) {
                Some(Intersection::Point(x)) => self.contains(&x, epsilon),
                _ => false,
            };
        }
        self.edges.iter().any(|e| e.intersects(segment, epsilon)) || self.contains(segment.p(), epsilon)
    }

    /// True if the whole segment lies in the polygon (boundary included).
    #[must_use]
    pub fn contains_segment(&self, segment: &LineSegment<S>, epsilon: f64) -> bool {
        runs_inside(segment, self.edges.iter(), |pt| self.contains(pt, epsilon), epsilon)
    }

    /// Either shape reaches into the other: some triangle edge meets the
    /// polygon or some polygon edge meets the triangle.
    #[must_use]
    pub fn intersects_triangle(&self, triangle: &Triangle<S>, epsilon: f64) -> bool {
        self.edges.iter().any(|e| triangle.intersects(e, epsilon))
            || triangle.edges().iter().any(|e| self.intersects_segment(e, epsilon))
    }

    /// Triangles whose edges stay inside cannot reach into an external hole,
    /// which is open to the hull boundary.
    #[must_use]
    pub fn contains_triangle(&self, triangle: &Triangle<S>, epsilon: f64) -> bool {
        triangle.edges().iter().all(|e| self.contains_segment(e, epsilon))
    }

    /// Hull area minus the hole areas.
    #[must_use]
    pub fn area(&self, precision: Precision) -> S {
        self.holes
            .values()
            .fold(self.hull.area(precision), |acc, h| acc - h.area(precision))
    }

    #[must_use]
    pub fn perimeter(&self, precision: Precision) -> S {
        self.edges
            .iter()
            .fold(S::zero(), |acc, e| acc + e.length(precision))
    }
}

/// Walks the ring from a vertex on the hull boundary. Every maximal run of
/// vertices off the boundary, together with the boundary vertices on either
/// side of it, outlines one external hole.
fn decompose<S: Scalar>(
    ring: &[Point<S>],
    hull: &ConvexArea<S>,
    epsilon: f64,
) -> Result<SlotMap<HoleId, PolygonNoInternalHoles<S>>> {
    let mut holes = SlotMap::with_key();
    let Some(start) = ring.iter().position(|pt| hull.is_on_boundary(pt, epsilon)) else {
        return Err(GeometryError::Degenerate("no ring vertex on the convex hull".into()).into());
    };
    let len = ring.len();
    let mut anchor = &ring[start];
    let mut run: Vec<Point<S>> = Vec::new();
    for k in 1..=len {
        let pt = &ring[(start + k) % len];
        if !hull.is_on_boundary(pt, epsilon) {
            run.push(pt.clone());
            continue;
        }
        if !run.is_empty() {
            let mut outline = Vec::with_capacity(run.len() + 2);
            outline.push(anchor.clone());
            outline.append(&mut run);
            outline.push(pt.clone());
            if Point::is_collinear(&outline, epsilon) {
                warn!(vertices = outline.len(), "discarding zero-area hole");
            } else {
                holes.insert(PolygonNoInternalHoles::new(outline, epsilon)?);
            }
        }
        anchor = pt;
    }
    debug!(vertices = len, holes = holes.len(), "decomposed polygon");
    Ok(holes)
}

/// True if every stretch of `segment` between its crossings with
/// `boundary` lies inside. Each stretch is tested at its midpoint.
pub(crate) fn runs_inside<'a, S: Scalar>(
    segment: &LineSegment<S>,
    boundary: impl Iterator<Item = &'a LineSegment<S>>,
    inside: impl Fn(&Point<S>) -> bool,
    epsilon: f64,
) -> bool {
    if !inside(segment.p()) || !inside(&segment.q()) {
        return false;
    }
    let line = segment.line();
    let mut cuts = vec![S::zero(), S::one()];
    for e in boundary {
        if let Some(hit) = segment.intersection(e, epsilon) {
            cuts.extend(hit.points().iter().map(|pt| line.parameter_of(pt)));
        }
    }
    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    cuts.windows(2)
        .all(|w| inside(&line.point_at(&((w[0].clone() + w[1].clone()) * S::half()))))
}

impl<S: Scalar> Bounded<S> for PolygonNoInternalHoles<S> {
    fn envelope(&self) -> Aabb<S> {
        self.hull.envelope()
    }
}

impl<S: Scalar> Transform<S> for PolygonNoInternalHoles<S> {
    fn translate(&mut self, v: &Vector<S>) {
        for pt in &mut self.points {
            pt.translate(v);
        }
        for e in &mut self.edges {
            e.translate(v);
        }
        self.hull.translate(v);
        for h in self.holes.values_mut() {
            h.translate(v);
        }
    }

    /// Re-decomposes the rotated ring; exact scalars use at least the
    /// rounding grid of `precision` as tolerance.
    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let points = self
            .points
            .iter()
            .map(|pt| pt.rotate(axis, uv, theta, precision))
            .collect::<Result<Vec<_>>>()?;
        let epsilon = if S::EXACT {
            self.epsilon.max(precision.tolerance())
        } else {
            self.epsilon
        };
        Self::new(points, epsilon)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use num_rational::BigRational;

    use super::*;

    const EPS: f64 = 1e-10;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::from_coords(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector {
        Vector::new(x, y, z)
    }

    fn seg(a: Point, b: Point) -> LineSegment {
        LineSegment::new(a, b).unwrap()
    }

    fn l_shape() -> PolygonNoInternalHoles {
        let ring = vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(4.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 4.0, 0.0),
            p(0.0, 4.0, 0.0),
        ];
        PolygonNoInternalHoles::new(ring, EPS).unwrap()
    }

    #[test]
    fn convex_ring_has_no_holes() {
        let square = PolygonNoInternalHoles::new(
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0), p(0.0, 2.0, 0.0)],
            EPS,
        )
        .unwrap();
        assert!(square.is_convex());
        assert_relative_eq!(square.area(Precision::default()), 4.0);
    }

    #[test]
    fn concave_corner_becomes_one_hole() {
        let poly = l_shape();
        assert_eq!(poly.hole_count(), 1);
        let (_, hole) = poly.holes().next().unwrap();
        let ring = hole.points();
        assert_eq!(ring.len(), 3);
        assert!(ring[0].equals_eps(&p(4.0, 1.0, 0.0), EPS));
        assert!(ring[1].equals_eps(&p(1.0, 1.0, 0.0), EPS));
        assert!(ring[2].equals_eps(&p(1.0, 4.0, 0.0), EPS));
        assert_relative_eq!(poly.area(Precision::default()), 7.0, epsilon = 1e-9);
        assert_relative_eq!(poly.perimeter(Precision::default()), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn holes_touch_the_hull_at_their_ends_only() {
        let comb = PolygonNoInternalHoles::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(6.0, 0.0, 0.0),
                p(6.0, 4.0, 0.0),
                p(5.0, 4.0, 0.0),
                p(5.0, 1.0, 0.0),
                p(3.0, 1.0, 0.0),
                p(3.0, 4.0, 0.0),
                p(2.0, 4.0, 0.0),
                p(2.0, 1.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(1.0, 4.0, 0.0),
                p(0.0, 4.0, 0.0),
            ],
            EPS,
        )
        .unwrap();
        assert_eq!(comb.hole_count(), 2);
        for (_, hole) in comb.holes() {
            let ring = hole.points();
            let touching: Vec<bool> = ring.iter().map(|pt| comb.hull().is_on_boundary(pt, EPS)).collect();
            assert!(touching[0]);
            assert!(touching[ring.len() - 1]);
            assert!(touching[1..ring.len() - 1].iter().all(|t| !t));
        }
        assert_relative_eq!(comb.area(Precision::default()), 24.0 - 6.0 - 3.0, epsilon = 1e-9);
    }

    #[test]
    fn containment() {
        let poly = l_shape();
        assert!(poly.contains(&p(0.5, 3.0, 0.0), EPS));
        assert!(poly.contains(&p(3.0, 0.5, 0.0), EPS));
        assert!(!poly.contains(&p(2.0, 2.0, 0.0), EPS));
        assert!(poly.contains(&p(1.0, 1.0, 0.0), EPS));
        assert!(poly.contains(&p(3.0, 1.0, 0.0), EPS));
        assert!(!poly.contains(&p(2.5, 2.5, 0.0), EPS));
        assert!(!poly.contains(&p(0.5, 0.5, 1.0), EPS));
        assert!(poly.is_on_boundary(&p(1.0, 2.0, 0.0), EPS));
    }

    #[test]
    fn segments() {
        let poly = l_shape();
        assert!(poly.contains_segment(&seg(p(0.5, 0.5, 0.0), p(0.5, 3.5, 0.0)), EPS));
        assert!(!poly.contains_segment(&seg(p(0.5, 3.0, 0.0), p(3.0, 0.5, 0.0)), EPS));
        assert!(poly.intersects_segment(&seg(p(0.5, 3.0, 0.0), p(3.0, 0.5, 0.0)), EPS));
        assert!(!poly.intersects_segment(&seg(p(2.0, 2.0, 0.0), p(3.0, 3.0, 0.0)), EPS));
        assert!(poly.intersects_segment(&seg(p(0.5, 0.5, -1.0), p(0.5, 0.5, 1.0)), EPS));
        assert!(!poly.intersects_segment(&seg(p(2.0, 2.0, -1.0), p(2.0, 2.0, 1.0)), EPS));
    }

    #[test]
    fn triangles() {
        let poly = l_shape();
        let inside = Triangle::new(p(0.2, 0.2, 0.0), p(0.8, 0.2, 0.0), p(0.2, 3.0, 0.0)).unwrap();
        assert!(poly.contains_triangle(&inside, EPS));
        assert!(poly.intersects_triangle(&inside, EPS));
        let straddling = Triangle::new(p(0.5, 0.5, 0.0), p(3.0, 0.5, 0.0), p(0.5, 3.0, 0.0)).unwrap();
        assert!(!poly.contains_triangle(&straddling, EPS));
        assert!(poly.intersects_triangle(&straddling, EPS));
        let in_the_notch = Triangle::new(p(2.0, 2.0, 0.0), p(3.0, 2.0, 0.0), p(2.0, 3.0, 0.0)).unwrap();
        assert!(!poly.intersects_triangle(&in_the_notch, EPS));
        let crossing = Triangle::new(p(0.5, 0.5, -1.0), p(0.5, 0.5, 1.0), p(0.5, 9.0, 0.0)).unwrap();
        assert!(poly.intersects_triangle(&crossing, EPS));
    }

    #[test]
    fn motion_and_envelope() {
        let mut poly = l_shape();
        poly.translate(&v(0.0, 0.0, 3.0));
        assert!(poly.contains(&p(0.5, 3.0, 3.0), EPS));
        assert!(!poly.contains(&p(2.0, 2.0, 3.0), EPS));
        assert_relative_eq!(*poly.envelope().zmin(), 3.0);

        let turned = poly.rotate(&Line::z_axis(), &v(0.0, 0.0, 1.0), PI, Precision::default()).unwrap();
        assert_eq!(turned.hole_count(), 1);
        assert!(turned.contains(&p(-0.5, -3.0, 3.0), 1e-9));
        assert!(!turned.contains(&p(-2.0, -2.0, 3.0), 1e-9));
    }

    #[test]
    fn degenerate_rings() {
        assert!(PolygonNoInternalHoles::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)], EPS).is_err());
        let repeated = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        assert!(PolygonNoInternalHoles::new(repeated, EPS).is_err());
    }

    #[test]
    fn exact_l_shape() {
        let r = |n: i64| BigRational::from_integer(n.into());
        let pt = |x: i64, y: i64| Point::from_coords(r(x), r(y), r(0));
        let poly = PolygonNoInternalHoles::new(vec![pt(0, 0), pt(4, 0), pt(4, 1), pt(1, 1), pt(1, 4), pt(0, 4)], 0.0)
            .unwrap();
        assert_eq!(poly.hole_count(), 1);
        assert!(poly.contains(&pt(1, 3), 0.0));
        assert!(!poly.contains(&Point::from_coords(r(1) + BigRational::new(1.into(), 1000.into()), r(3), r(0)), 0.0));
    }
}
