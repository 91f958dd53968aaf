use crate::error::{GeometryError, Result};
use crate::math::{Precision, Scalar, DEFAULT_EPSILON};

use super::{Line, LineSegment, Planar, Plane, Point, Transform, Triangle, Vector};

/// A rectangle `pqrs`, stored with the two triangles `pqr` and `rsp` that
/// tile it. Its plane is the plane of `pqr`.
#[derive(Debug, Clone)]
pub struct Rectangle<S: Scalar = f64> {
    points: [Point<S>; 4],
    edges: [LineSegment<S>; 4],
    triangles: [Triangle<S>; 2],
}

impl<S: Scalar> Rectangle<S> {
    /// # Errors
    ///
    /// Returns [`GeometryError::CollinearPoints`] if `p`, `q`, `r` are
    /// collinear, [`GeometryError::NotCoplanar`] if `s` is off their plane,
    /// and [`GeometryError::NotRectangle`] if the sides are not pairwise
    /// parallel or not perpendicular.
    pub fn new(p: Point<S>, q: Point<S>, r: Point<S>, s: Point<S>, epsilon: f64) -> Result<Self> {
        let pqr = Triangle::new(p.clone(), q.clone(), r.clone())?;
        if !pqr.plane().is_on_plane(&s, epsilon) {
            return Err(GeometryError::NotCoplanar.into());
        }
        if !Self::is_rectangle(&p, &q, &r, &s, epsilon) {
            return Err(GeometryError::NotRectangle.into());
        }
        let rsp = Triangle::new(r.clone(), s.clone(), p.clone())?;
        let edges = [
            LineSegment::new(p.clone(), q.clone())?,
            LineSegment::new(q.clone(), r.clone())?,
            LineSegment::new(r.clone(), s.clone())?,
            LineSegment::new(s.clone(), p.clone())?,
        ];
        Ok(Self {
            points: [p, q, r, s],
            edges,
            triangles: [pqr, rsp],
        })
    }

    /// True if `pqrs`, taken in order, is a rectangle: opposite sides
    /// parallel and running the same way round, adjacent sides
    /// perpendicular.
    #[must_use]
    pub fn is_rectangle(p: &Point<S>, q: &Point<S>, r: &Point<S>, s: &Point<S>, epsilon: f64) -> bool {
        let pq = Vector::between(p, q);
        let qr = Vector::between(q, r);
        let sr = Vector::between(s, r);
        let ps = Vector::between(p, s);
        if [&pq, &qr, &sr, &ps].iter().any(|side| side.is_zero_eps(epsilon)) {
            return false;
        }
        pq.is_scalar_multiple(&sr, epsilon)
            && pq.dot(&sr) > S::zero()
            && qr.is_scalar_multiple(&ps, epsilon)
            && qr.dot(&ps) > S::zero()
            && pq.is_orthogonal(&qr, epsilon)
            && Point::is_coplanar(&[p.clone(), q.clone(), r.clone(), s.clone()], epsilon)
    }

    /// Returns the corners in order.
    #[must_use]
    pub fn points(&self) -> &[Point<S>; 4] {
        &self.points
    }

    /// Returns the supporting plane.
    #[must_use]
    pub fn plane(&self) -> &Plane<S> {
        self.triangles[0].plane()
    }

    /// Returns the four sides in order.
    #[must_use]
    pub fn edges(&self) -> &[LineSegment<S>; 4] {
        &self.edges
    }

    /// The tiling triangles `pqr` and `rsp`.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle<S>; 2] {
        &self.triangles
    }

    /// `|pq| |qr|`, taken as one square root of the product.
    #[must_use]
    pub fn area(&self, precision: Precision) -> S {
        let [pq, qr, ..] = &self.edges;
        Scalar::sqrt(&(pq.length_squared() * qr.length_squared()), precision)
    }

    #[must_use]
    pub fn perimeter(&self, precision: Precision) -> S {
        let [pq, qr, ..] = &self.edges;
        (pq.length(precision) + qr.length(precision)) * S::two()
    }

    #[must_use]
    pub fn centroid(&self) -> Point<S> {
        LineSegment::new(self.points[0].clone(), self.points[2].clone())
            .map(|diagonal| diagonal.midpoint())
            .unwrap_or_else(|_| self.points[0].clone())
    }

    /// True if `pt` lies in either tiling triangle.
    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.triangles.iter().any(|t| t.contains(pt, epsilon))
    }
}

impl<S: Scalar> Planar<S> for Rectangle<S> {
    fn plane(&self) -> &Plane<S> {
        self.triangles[0].plane()
    }

    fn ring(&self) -> &[Point<S>] {
        &self.points
    }

    fn edges(&self) -> &[LineSegment<S>] {
        &self.edges
    }
}

impl<S: Scalar> Transform<S> for Rectangle<S> {
    fn translate(&mut self, v: &Vector<S>) {
        for pt in &mut self.points {
            pt.translate(v);
        }
        for e in &mut self.edges {
            e.translate(v);
        }
        for t in &mut self.triangles {
            t.translate(v);
        }
    }

    /// Rotated corners are re-validated with a tolerance matching the
    /// rounding of the rotation: the grid of `precision` for exact scalars,
    /// [`DEFAULT_EPSILON`] for floats.
    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let [p, q, r, s] = &self.points;
        let turn = |pt: &Point<S>| pt.rotate(axis, uv, theta, precision);
        let epsilon = if S::EXACT { precision.tolerance() } else { DEFAULT_EPSILON };
        Self::new(turn(p)?, turn(q)?, turn(r)?, turn(s)?, epsilon)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use approx::assert_relative_eq;
    use num_rational::BigRational;

    use super::*;
    use crate::error::EuclisError;
    use crate::geometry::{Bounded, Distance, Intersect, Intersection};

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

    fn floor() -> Rectangle {
        Rectangle::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 2.0, 0.0), p(0.0, 2.0, 0.0), EPS).unwrap()
    }

    #[test]
    fn validation() {
        let skewed = Rectangle::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(5.0, 2.0, 0.0), p(1.0, 2.0, 0.0), EPS);
        assert!(matches!(skewed, Err(EuclisError::Geometry(GeometryError::NotRectangle))));
        let bent = Rectangle::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 2.0, 0.0), p(0.0, 2.0, 1.0), EPS);
        assert!(matches!(bent, Err(EuclisError::Geometry(GeometryError::NotCoplanar))));
        let crossed = Rectangle::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(0.0, 2.0, 0.0), p(4.0, 2.0, 0.0), EPS);
        assert!(crossed.is_err());
        let flat = Rectangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0), EPS);
        assert!(matches!(flat, Err(EuclisError::Geometry(GeometryError::CollinearPoints))));
    }

    #[test]
    fn measures() {
        let r = floor();
        assert_relative_eq!(r.area(Precision::default()), 8.0);
        assert_relative_eq!(r.perimeter(Precision::default()), 12.0);
        assert!(r.centroid().equals_eps(&p(2.0, 1.0, 0.0), 1e-12));
        assert_eq!(r.triangles().len(), 2);
    }

    #[test]
    fn containment_spans_both_triangles() {
        let r = floor();
        assert!(r.contains(&p(3.5, 0.5, 0.0), EPS));
        assert!(r.contains(&p(0.5, 1.5, 0.0), EPS));
        assert!(r.contains(&p(2.0, 1.0, 0.0), EPS));
        assert!(!r.contains(&p(4.5, 1.0, 0.0), EPS));
        assert!(r.is_on_boundary(&p(4.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn line_through_both_triangles() {
        let r = floor();
        let l = Line::new(p(-1.0, 1.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let hit = r.intersection(&l, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(0.0, 1.0, 0.0), p(4.0, 1.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-9));

        let diagonal = seg(p(-1.0, -1.0, 0.0), p(5.0, 5.0, 0.0));
        let hit = diagonal.intersection(&r, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(0.0, 0.0, 0.0), p(2.0, 2.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-9));
    }

    #[test]
    fn plane_cuts() {
        let r = floor();
        let cut = Plane::new(p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let hit = r.intersection(&cut, EPS).unwrap();
        assert!(hit.equals_eps(&Intersection::Segment(seg(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0))), 1e-9));
        let own = Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(matches!(r.intersection(&own, EPS), Some(Intersection::Rectangle(_))));
    }

    #[test]
    fn triangle_overlap() {
        let r = floor();
        let t = Triangle::new(p(2.0, -2.0, 0.0), p(6.0, 2.0, 0.0), p(2.0, 2.0, 0.0)).unwrap();
        let hit = r.intersection(&t, EPS).unwrap();
        for pt in hit.points() {
            assert!(r.contains(&pt, 1e-9));
            assert!(t.contains(&pt, 1e-9));
        }
        assert!(matches!(hit, Intersection::ConvexArea(_) | Intersection::Triangle(_)));
    }

    #[test]
    fn distance_and_envelope() {
        let r = floor();
        assert_relative_eq!(r.distance_squared(&p(2.0, 1.0, -3.0), EPS), 9.0);
        assert_relative_eq!(r.distance_squared(&p(6.0, 1.0, 0.0), EPS), 4.0);
        let b = r.envelope();
        assert_relative_eq!(*b.ymax(), 2.0);
    }

    #[test]
    fn motion_keeps_the_shape() {
        let mut r = floor();
        r.translate(&v(1.0, 1.0, 1.0));
        assert!(r.contains(&p(3.0, 2.0, 1.0), EPS));
        let turned = r.rotate(&Line::z_axis(), &v(0.0, 0.0, 1.0), FRAC_PI_4, Precision::default()).unwrap();
        assert_relative_eq!(turned.area(Precision::default()), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn exact_area() {
        let r = |n: i64| BigRational::from_integer(n.into());
        let pt = |x: i64, y: i64, z: i64| Point::from_coords(r(x), r(y), r(z));
        let rect = Rectangle::new(pt(0, 0, 0), pt(3, 0, 0), pt(3, 0, 12), pt(0, 0, 12), 0.0).unwrap();
        assert_eq!(rect.area(Precision::default()), r(36));
        assert!(rect.contains(&pt(3, 0, 6), 0.0));
    }
}
