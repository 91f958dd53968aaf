use crate::error::Result;
use crate::math::{Precision, Scalar};

use super::{Line, LineSegment, Planar, Plane, Point, Transform, Vector};

/// A triangle `pqr` with its plane (normal `(q - p) × (r - p)`) and the
/// three edges `pq`, `qr`, `rp`.
#[derive(Debug, Clone)]
pub struct Triangle<S: Scalar = f64> {
    pl: Plane<S>,
    points: [Point<S>; 3],
    edges: [LineSegment<S>; 3],
}

impl<S: Scalar> Triangle<S> {
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::CollinearPoints`] if the points
    /// are collinear or coincide.
    pub fn new(p: Point<S>, q: Point<S>, r: Point<S>) -> Result<Self> {
        let pl = Plane::from_points(p.clone(), &q, &r)?;
        let edges = [
            LineSegment::new(p.clone(), q.clone())?,
            LineSegment::new(q.clone(), r.clone())?,
            LineSegment::new(r.clone(), p.clone())?,
        ];
        Ok(Self {
            pl,
            points: [p, q, r],
            edges,
        })
    }

    /// Returns the first vertex.
    #[must_use]
    pub fn p(&self) -> &Point<S> {
        &self.points[0]
    }

    /// Returns the second vertex.
    #[must_use]
    pub fn q(&self) -> &Point<S> {
        &self.points[1]
    }

    /// Returns the third vertex.
    #[must_use]
    pub fn r(&self) -> &Point<S> {
        &self.points[2]
    }

    /// Returns the vertices in order.
    #[must_use]
    pub fn points(&self) -> &[Point<S>; 3] {
        &self.points
    }

    /// Returns the supporting plane, normal `(q - p) × (r - p)`.
    #[must_use]
    pub fn plane(&self) -> &Plane<S> {
        &self.pl
    }

    /// Returns the edges `pq`, `qr`, `rp`.
    #[must_use]
    pub fn edges(&self) -> &[LineSegment<S>; 3] {
        &self.edges
    }

    /// Twice the area, squared: `|(q - p) × (r - p)|²`. Exact for rational
    /// scalars.
    #[must_use]
    pub fn double_area_squared(&self) -> S {
        self.pl.n().magnitude_squared()
    }

    #[must_use]
    pub fn area(&self, precision: Precision) -> S {
        self.pl.n().magnitude(precision) * S::half()
    }

    #[must_use]
    pub fn perimeter(&self, precision: Precision) -> S {
        Planar::perimeter(self, precision)
    }

    #[must_use]
    pub fn centroid(&self) -> Point<S> {
        Point::centroid(&self.points).unwrap_or_else(|| self.points[0].clone())
    }

    /// True if `pt` lies in the plane, inside or on the boundary.
    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.contains_point(pt, epsilon)
    }
}

impl<S: Scalar> Planar<S> for Triangle<S> {
    fn plane(&self) -> &Plane<S> {
        &self.pl
    }

    fn ring(&self) -> &[Point<S>] {
        &self.points
    }

    fn edges(&self) -> &[LineSegment<S>] {
        &self.edges
    }
}

impl<S: Scalar> Transform<S> for Triangle<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.pl.translate(v);
        for pt in &mut self.points {
            pt.translate(v);
        }
        for e in &mut self.edges {
            e.translate(v);
        }
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let [p, q, r] = &self.points;
        Self::new(
            p.rotate(axis, uv, theta, precision)?,
            q.rotate(axis, uv, theta, precision)?,
            r.rotate(axis, uv, theta, precision)?,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use num_rational::BigRational;

    use super::*;
    use crate::geometry::{Bounded, Distance, Intersect, Intersection, Ray};

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

    fn unit_tri() -> Triangle {
        Triangle::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(0.0, 4.0, 0.0)).unwrap()
    }

    #[test]
    fn collinear_points_are_rejected() {
        assert!(Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)).is_err());
        assert!(Triangle::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0)).is_err());
    }

    #[test]
    fn measures() {
        let t = unit_tri();
        assert_relative_eq!(t.area(Precision::default()), 8.0);
        assert_relative_eq!(t.double_area_squared(), 256.0);
        assert_relative_eq!(t.perimeter(Precision::default()), 8.0 + 32f64.sqrt(), epsilon = 1e-12);
        assert!(t.centroid().equals_eps(&p(4.0 / 3.0, 4.0 / 3.0, 0.0), 1e-12));
    }

    #[test]
    fn containment_includes_the_boundary() {
        let t = unit_tri();
        assert!(t.contains(&p(1.0, 1.0, 0.0), EPS));
        assert!(t.contains(&p(2.0, 2.0, 0.0), EPS));
        assert!(t.contains(&p(4.0, 0.0, 0.0), EPS));
        assert!(!t.contains(&p(3.0, 3.0, 0.0), EPS));
        assert!(!t.contains(&p(1.0, 1.0, 0.1), EPS));
        assert!(t.is_on_boundary(&p(2.0, 0.0, 0.0), EPS));
        assert!(!t.is_on_boundary(&p(1.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn piercing_line_and_segment() {
        let t = unit_tri();
        let l = Line::new(p(1.0, 1.0, -3.0), v(0.0, 0.0, 1.0)).unwrap();
        let hit = t.intersection(&l, EPS).unwrap();
        assert!(hit.as_point().unwrap().equals_eps(&p(1.0, 1.0, 0.0), 1e-12));
        let short = seg(p(1.0, 1.0, 1.0), p(1.0, 1.0, 3.0));
        assert!(t.intersection(&short, EPS).is_none());
        let outside = Line::new(p(5.0, 5.0, -3.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(outside.intersection(&t, EPS).is_none());
    }

    #[test]
    fn coplanar_line_cuts_a_chord() {
        let t = unit_tri();
        let l = Line::new(p(-5.0, 1.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let hit = t.intersection(&l, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(0.0, 1.0, 0.0), p(3.0, 1.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-9));
    }

    #[test]
    fn coplanar_segment_partly_inside() {
        let t = unit_tri();
        let s = seg(p(1.0, 1.0, 0.0), p(6.0, 1.0, 0.0));
        let hit = t.intersection(&s, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(1.0, 1.0, 0.0), p(3.0, 1.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-9));
        let inside = seg(p(0.5, 0.5, 0.0), p(1.0, 1.0, 0.0));
        assert!(t.intersection(&inside, EPS).unwrap().equals_eps(&Intersection::Segment(inside.clone()), 1e-12));
    }

    #[test]
    fn ray_from_inside_the_plane() {
        let t = unit_tri();
        let r = Ray::new(p(1.0, 1.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let hit = t.intersection(&r, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(1.0, 1.0, 0.0), p(3.0, 1.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-9));
    }

    #[test]
    fn plane_cuts() {
        let t = unit_tri();
        let cut = Plane::new(p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let hit = t.intersection(&cut, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(1.0, 0.0, 0.0), p(1.0, 3.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-9));

        let own = Plane::new(p(7.0, 7.0, 0.0), v(0.0, 0.0, -2.0)).unwrap();
        assert!(matches!(own.intersection(&t, EPS), Some(Intersection::Triangle(_))));

        let above = Plane::new(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(t.intersection(&above, EPS).is_none());

        let corner = Plane::new(p(4.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        assert!(t.intersection(&corner, EPS).unwrap().is_point());
    }

    #[test]
    fn crossing_triangles_share_a_segment() {
        let a = unit_tri();
        let b = Triangle::new(p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(1.0, 5.0, 0.0)).unwrap();
        let hit = a.intersection(&b, EPS).unwrap();
        assert!(hit.is_segment());
        for pt in hit.points() {
            assert!(a.contains(&pt, 1e-9));
            assert!(b.contains(&pt, 1e-9));
        }
    }

    #[test]
    fn coplanar_triangles_overlap_in_an_area() {
        let a = unit_tri();
        let b = Triangle::new(p(1.0, 1.0, 0.0), p(5.0, 1.0, 0.0), p(1.0, 5.0, 0.0)).unwrap();
        let hit = a.intersection(&b, EPS).unwrap();
        let expected = Triangle::new(p(1.0, 1.0, 0.0), p(3.0, 1.0, 0.0), p(1.0, 3.0, 0.0)).unwrap();
        assert!(hit.equals_eps(&Intersection::Triangle(expected), 1e-9));

        let apart = Triangle::new(p(10.0, 10.0, 0.0), p(11.0, 10.0, 0.0), p(10.0, 11.0, 0.0)).unwrap();
        assert!(a.intersection(&apart, EPS).is_none());

        let lifted = Triangle::new(p(0.0, 0.0, 1.0), p(4.0, 0.0, 1.0), p(0.0, 4.0, 1.0)).unwrap();
        assert!(a.intersection(&lifted, EPS).is_none());
    }

    #[test]
    fn distance_to_points() {
        let t = unit_tri();
        assert_relative_eq!(t.distance_squared(&p(1.0, 1.0, 3.0), EPS), 9.0);
        assert_relative_eq!(t.distance_squared(&p(-2.0, 0.0, 0.0), EPS), 4.0);
        assert_relative_eq!(t.distance_squared(&p(1.0, 1.0, 0.0), EPS), 0.0);
    }

    #[test]
    fn envelope_and_motion() {
        let mut t = unit_tri();
        let b = t.envelope();
        assert_relative_eq!(*b.xmax(), 4.0);
        assert_relative_eq!(*b.zmax(), 0.0);

        t.translate(&v(0.0, 0.0, 2.0));
        assert!(t.contains(&p(1.0, 1.0, 2.0), EPS));
        assert!(!t.contains(&p(1.0, 1.0, 0.0), EPS));

        let turned = t.rotate(&Line::z_axis(), &v(0.0, 0.0, 1.0), FRAC_PI_2, Precision::default()).unwrap();
        assert!(turned.contains(&p(-1.0, 1.0, 2.0), 1e-9));
    }

    #[test]
    fn exact_containment() {
        let r = |n: i64, d: i64| BigRational::new(n.into(), d.into());
        let pt = |x: i64, y: i64| Point::from_coords(r(x, 1), r(y, 1), r(0, 1));
        let t = Triangle::new(pt(0, 0), pt(3, 0), pt(0, 3)).unwrap();
        let edge = Point::from_coords(r(3, 2), r(3, 2), r(0, 1));
        assert!(t.contains(&edge, 0.0));
        let just_outside = Point::from_coords(r(3, 2), r(3, 2) + r(1, 1_000_000_000), r(0, 1));
        assert!(!t.contains(&just_outside, 0.0));
        assert_eq!(t.double_area_squared(), r(81, 1));
    }
}
