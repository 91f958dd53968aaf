use crate::math::{Precision, Scalar};

use super::plane::{side_of_raw, Side};
use super::{
    Aabb, ConvexArea, Distance, Intersect, Intersection, Line, LineSegment, Plane, Point, Ray, Rectangle,
    Triangle,
};

/// A bounded convex region of a plane.
///
/// Implementors supply the supporting plane, the boundary vertices in
/// counter-clockwise order about the plane normal, and the boundary edges
/// (edge `i` runs from vertex `i` to vertex `i + 1`). Containment, measures
/// and cuts by other primitives follow from those three.
pub trait Planar<S: Scalar> {
    fn plane(&self) -> &Plane<S>;

    fn ring(&self) -> &[Point<S>];

    fn edges(&self) -> &[LineSegment<S>];

    /// True if `pt` lies on the plane, inside or on the boundary.
    fn contains_point(&self, pt: &Point<S>, epsilon: f64) -> bool {
        if !self.plane().is_on_plane(pt, epsilon) {
            return false;
        }
        let n = self.plane().n();
        self.edges()
            .iter()
            .all(|e| side_of_raw(pt, e.p(), &n.cross(e.v()), epsilon) != Side::Back)
    }

    fn is_on_boundary(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.edges().iter().any(|e| e.contains(pt, epsilon))
    }

    /// Half the fan sum of `(v_i - v_0) × (v_{i+1} - v_0)` along the unit
    /// normal.
    fn area(&self, precision: Precision) -> S {
        let ring = self.ring();
        let Some((origin, rest)) = ring.split_first() else {
            return S::zero();
        };
        let n = self.plane().n();
        let twice = rest.windows(2).fold(S::zero(), |acc, w| {
            let a = super::Vector::between(origin, &w[0]);
            let b = super::Vector::between(origin, &w[1]);
            acc + a.cross(&b).dot(n)
        });
        let norm = n.magnitude(precision);
        if norm.is_zero() {
            return S::zero();
        }
        (twice / (norm * S::two())).abs()
    }

    fn perimeter(&self, precision: Precision) -> S {
        self.edges()
            .iter()
            .fold(S::zero(), |acc, e| acc + e.length(precision))
    }

    /// Distance to the foot on the plane when it falls inside, otherwise to
    /// the nearest edge.
    fn distance_squared_to(&self, pt: &Point<S>, epsilon: f64) -> S {
        let foot = self.plane().point_of_projection(pt);
        if self.contains_point(&foot, epsilon) {
            return self.plane().distance_squared(pt, epsilon);
        }
        self.edges()
            .iter()
            .map(|e| e.distance_squared(pt, epsilon))
            .reduce(S::min_of)
            .unwrap_or_else(S::zero)
    }

    fn envelope_of_ring(&self) -> Aabb<S> {
        Aabb::from_points(self.ring()).unwrap_or_else(|| Aabb::from_point(self.plane().p()))
    }

    fn cut_line(&self, line: &Line<S>, epsilon: f64) -> Option<Intersection<S>> {
        let plane = self.plane();
        if plane.is_parallel_to_line(line, epsilon) {
            if !plane.is_on_plane(line.p(), epsilon) {
                return None;
            }
            return gather(self.edges().iter().map(|e| e.intersection(line, epsilon)), epsilon);
        }
        match plane.intersection(line, epsilon)? {
            Intersection::Point(pt) => self.contains_point(&pt, epsilon).then_some(Intersection::Point(pt)),
            _ => None,
        }
    }

    fn cut_ray(&self, ray: &Ray<S>, epsilon: f64) -> Option<Intersection<S>> {
        match self.cut_line(ray.line(), epsilon)? {
            Intersection::Point(pt) => ray.is_aligned(&pt, epsilon).then_some(Intersection::Point(pt)),
            Intersection::Segment(s) => s.clip(ray.plane(), &ray.line().q(), epsilon),
            _ => None,
        }
    }

    fn cut_segment(&self, segment: &LineSegment<S>, epsilon: f64) -> Option<Intersection<S>> {
        let plane = self.plane();
        let (p, q) = (segment.p().clone(), segment.q());
        if plane.is_on_plane(&p, epsilon) && plane.is_on_plane(&q, epsilon) {
            let mut hits: Vec<Option<Intersection<S>>> =
                self.edges().iter().map(|e| e.intersection(segment, epsilon)).collect();
            for end in [p, q] {
                if self.contains_point(&end, epsilon) {
                    hits.push(Some(Intersection::Point(end)));
                }
            }
            return gather(hits, epsilon);
        }
        match plane.intersection(segment, epsilon)? {
            Intersection::Point(pt) => self.contains_point(&pt, epsilon).then_some(Intersection::Point(pt)),
            _ => None,
        }
    }

    /// Cut by a plane that is not coincident with this one.
    fn cut_plane(&self, plane: &Plane<S>, epsilon: f64) -> Option<Intersection<S>> {
        if self.plane().is_parallel(plane, epsilon) {
            return None;
        }
        gather(self.edges().iter().map(|e| e.intersection(plane, epsilon)), epsilon)
    }

    /// Coplanar regions are clipped against each other; otherwise each
    /// boundary is cut by the other region and the hits span the result.
    fn cut_planar<T: Planar<S>>(&self, other: &T, epsilon: f64) -> Option<Intersection<S>>
    where
        Self: Sized,
    {
        if self.plane().is_coincident(other.plane(), epsilon) {
            let clipped = clip_ring(self.ring(), other, epsilon);
            return ConvexArea::geometry_of(&clipped, epsilon);
        }
        if self.plane().is_parallel(other.plane(), epsilon) {
            return None;
        }
        let hits = self
            .edges()
            .iter()
            .map(|e| other.cut_segment(e, epsilon))
            .chain(other.edges().iter().map(|e| self.cut_segment(e, epsilon)));
        gather(hits, epsilon)
    }
}

/// Collapses scattered hits on one line into the point or segment spanning
/// them.
pub(crate) fn gather<S: Scalar>(
    hits: impl IntoIterator<Item = Option<Intersection<S>>>,
    epsilon: f64,
) -> Option<Intersection<S>> {
    let points: Vec<Point<S>> = hits.into_iter().flatten().flat_map(|hit| hit.points()).collect();
    LineSegment::geometry_of_points(&points, epsilon)
}

/// Sutherland-Hodgman: keeps the part of the `subject` ring inside every
/// edge of `clipper`.
pub(crate) fn clip_ring<S: Scalar, T: Planar<S>>(subject: &[Point<S>], clipper: &T, epsilon: f64) -> Vec<Point<S>> {
    let n = clipper.plane().n();
    let mut output = subject.to_vec();
    for edge in clipper.edges() {
        if output.is_empty() {
            break;
        }
        if let Ok(half) = Plane::new(edge.p().clone(), n.cross(edge.v())) {
            output = clip_half(&output, &half, epsilon);
        }
    }
    output
}

/// One Sutherland-Hodgman pass: the part of the ring not behind `half`.
pub(crate) fn clip_half<S: Scalar>(ring: &[Point<S>], half: &Plane<S>, epsilon: f64) -> Vec<Point<S>> {
    let inside = |pt: &Point<S>| half.side_of(pt, epsilon) != Side::Back;
    let crossing = |a: &Point<S>, b: &Point<S>| {
        let line = Line::from_points(a.clone(), b.clone()).ok()?;
        match half.intersection(&line, epsilon)? {
            Intersection::Point(x) => Some(x),
            _ => None,
        }
    };
    let mut output = Vec::with_capacity(ring.len() + 1);
    for (i, current) in ring.iter().enumerate() {
        let prev = &ring[(i + ring.len() - 1) % ring.len()];
        match (inside(prev), inside(current)) {
            (true, true) => output.push(current.clone()),
            (false, true) => {
                output.extend(crossing(prev, current));
                output.push(current.clone());
            }
            (true, false) => output.extend(crossing(prev, current)),
            (false, false) => {}
        }
    }
    output
}

macro_rules! planar_cuts {
    ($ty:ident, $variant:ident) => {
        impl<S: Scalar> Intersect<S, Line<S>> for $ty<S> {
            fn intersection(&self, other: &Line<S>, epsilon: f64) -> Option<Intersection<S>> {
                self.cut_line(other, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, $ty<S>> for Line<S> {
            fn intersection(&self, other: &$ty<S>, epsilon: f64) -> Option<Intersection<S>> {
                other.cut_line(self, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, Ray<S>> for $ty<S> {
            fn intersection(&self, other: &Ray<S>, epsilon: f64) -> Option<Intersection<S>> {
                self.cut_ray(other, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, $ty<S>> for Ray<S> {
            fn intersection(&self, other: &$ty<S>, epsilon: f64) -> Option<Intersection<S>> {
                other.cut_ray(self, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, LineSegment<S>> for $ty<S> {
            fn intersection(&self, other: &LineSegment<S>, epsilon: f64) -> Option<Intersection<S>> {
                self.cut_segment(other, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, $ty<S>> for LineSegment<S> {
            fn intersection(&self, other: &$ty<S>, epsilon: f64) -> Option<Intersection<S>> {
                other.cut_segment(self, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, Plane<S>> for $ty<S> {
            fn intersection(&self, other: &Plane<S>, epsilon: f64) -> Option<Intersection<S>> {
                if self.plane().is_coincident(other, epsilon) {
                    return Some(Intersection::$variant(self.clone()));
                }
                self.cut_plane(other, epsilon)
            }
        }

        impl<S: Scalar> Intersect<S, $ty<S>> for Plane<S> {
            fn intersection(&self, other: &$ty<S>, epsilon: f64) -> Option<Intersection<S>> {
                other.intersection(self, epsilon)
            }
        }

        impl<S: Scalar> Distance<S, Point<S>> for $ty<S> {
            fn distance_squared(&self, pt: &Point<S>, epsilon: f64) -> S {
                self.distance_squared_to(pt, epsilon)
            }
        }

        impl<S: Scalar> super::Bounded<S> for $ty<S> {
            fn envelope(&self) -> Aabb<S> {
                self.envelope_of_ring()
            }
        }
    };
}

macro_rules! planar_pair {
    ($a:ident, $b:ident) => {
        impl<S: Scalar> Intersect<S, $b<S>> for $a<S> {
            fn intersection(&self, other: &$b<S>, epsilon: f64) -> Option<Intersection<S>> {
                self.cut_planar(other, epsilon)
            }
        }
    };
}

planar_cuts!(Triangle, Triangle);
planar_cuts!(Rectangle, Rectangle);
planar_cuts!(ConvexArea, ConvexArea);

planar_pair!(Triangle, Triangle);
planar_pair!(Triangle, Rectangle);
planar_pair!(Triangle, ConvexArea);
planar_pair!(Rectangle, Triangle);
planar_pair!(Rectangle, Rectangle);
planar_pair!(Rectangle, ConvexArea);
planar_pair!(ConvexArea, Triangle);
planar_pair!(ConvexArea, Rectangle);
planar_pair!(ConvexArea, ConvexArea);
