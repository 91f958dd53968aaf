use crate::error::Result;
use crate::math::{Precision, Scalar};

use super::{Distance, Intersect, Intersection, Line, LineSegment, Plane, Point, Side, Transform, Vector};

/// A half-line starting at `origin` and running along `v`.
///
/// The plane through the origin with normal `v` splits space into the
/// forward half (front or on) and the excluded half (back).
#[derive(Debug, Clone)]
pub struct Ray<S: Scalar = f64> {
    l: Line<S>,
    pl: Plane<S>,
}

impl<S: Scalar> Ray<S> {
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::ZeroVector`] if `v` is zero.
    pub fn new(origin: Point<S>, v: Vector<S>) -> Result<Self> {
        Self::from_line(Line::new(origin, v)?)
    }

    /// The ray starting at `l.p()` in the direction of `l.v()`.
    ///
    /// # Errors
    ///
    /// Fails only if the line direction is zero, which [`Line`] already
    /// rules out.
    pub fn from_line(l: Line<S>) -> Result<Self> {
        let pl = Plane::new(l.p().clone(), l.v().clone())?;
        Ok(Self { l, pl })
    }

    /// Returns the origin.
    #[must_use]
    pub fn origin(&self) -> &Point<S> {
        self.l.p()
    }

    /// Returns the direction.
    #[must_use]
    pub fn v(&self) -> &Vector<S> {
        self.l.v()
    }

    /// Returns the supporting line.
    #[must_use]
    pub fn line(&self) -> &Line<S> {
        &self.l
    }

    /// The plane at the origin perpendicular to the ray.
    #[must_use]
    pub fn plane(&self) -> &Plane<S> {
        &self.pl
    }

    /// True if `pt` is not behind the origin.
    #[must_use]
    pub fn is_aligned(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.pl.side_of(pt, epsilon) != Side::Back
    }

    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.l.contains(pt, epsilon) && self.is_aligned(pt, epsilon)
    }

    /// Same origin and same direction (positive multiple).
    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        self.origin().equals_eps(other.origin(), epsilon)
            && self.v().is_scalar_multiple(other.v(), epsilon)
            && self.v().dot(other.v()) > S::zero()
    }

    /// Restricts a result computed on the supporting line to the forward half.
    fn forward(&self, hit: Intersection<S>, epsilon: f64) -> Option<Intersection<S>> {
        match hit {
            Intersection::Point(pt) => self.is_aligned(&pt, epsilon).then_some(Intersection::Point(pt)),
            Intersection::Line(_) => Some(Intersection::Ray(self.clone())),
            other => Some(other),
        }
    }

    fn collinear_overlap(&self, other: &Self, epsilon: f64) -> Option<Intersection<S>> {
        if self.v().dot(other.v()) > S::zero() {
            // same direction: whichever origin lies further ahead
            return Some(if self.is_aligned(other.origin(), epsilon) {
                Intersection::Ray(other.clone())
            } else {
                Intersection::Ray(self.clone())
            });
        }
        None
    }
}

impl<S: Scalar> Intersect<S, Line<S>> for Ray<S> {
    fn intersection(&self, line: &Line<S>, epsilon: f64) -> Option<Intersection<S>> {
        let hit = self.l.intersection(line, epsilon)?;
        self.forward(hit, epsilon)
    }
}

impl<S: Scalar> Intersect<S, Ray<S>> for Line<S> {
    fn intersection(&self, ray: &Ray<S>, epsilon: f64) -> Option<Intersection<S>> {
        ray.intersection(self, epsilon)
    }
}

impl<S: Scalar> Intersect<S, Plane<S>> for Ray<S> {
    fn intersection(&self, plane: &Plane<S>, epsilon: f64) -> Option<Intersection<S>> {
        let hit = plane.intersection(&self.l, epsilon)?;
        self.forward(hit, epsilon)
    }
}

impl<S: Scalar> Intersect<S, Ray<S>> for Plane<S> {
    fn intersection(&self, ray: &Ray<S>, epsilon: f64) -> Option<Intersection<S>> {
        ray.intersection(self, epsilon)
    }
}

impl<S: Scalar> Intersect<S, Ray<S>> for Ray<S> {
    /// Collinear rays pointing the same way overlap in the one that starts
    /// further ahead; opposite rays overlap between their origins (a point
    /// when the origins coincide) or not at all.
    fn intersection(&self, other: &Ray<S>, epsilon: f64) -> Option<Intersection<S>> {
        match self.l.intersection(&other.l, epsilon)? {
            Intersection::Point(pt) => (self.is_aligned(&pt, epsilon) && other.is_aligned(&pt, epsilon))
                .then_some(Intersection::Point(pt)),
            Intersection::Line(_) => self.collinear_overlap(other, epsilon).or_else(|| {
                let (a, b) = (self.origin(), other.origin());
                self.is_aligned(b, epsilon)
                    .then(|| LineSegment::geometry(a.clone(), b.clone(), epsilon))
            }),
            _ => None,
        }
    }
}

impl<S: Scalar> Intersect<S, LineSegment<S>> for Ray<S> {
    fn intersection(&self, segment: &LineSegment<S>, epsilon: f64) -> Option<Intersection<S>> {
        match segment.intersection(&self.l, epsilon)? {
            Intersection::Point(pt) => self.is_aligned(&pt, epsilon).then_some(Intersection::Point(pt)),
            Intersection::Segment(s) => s.clip(&self.pl, &self.l.q(), epsilon),
            _ => None,
        }
    }
}

impl<S: Scalar> Intersect<S, Ray<S>> for LineSegment<S> {
    fn intersection(&self, ray: &Ray<S>, epsilon: f64) -> Option<Intersection<S>> {
        ray.intersection(self, epsilon)
    }
}

impl<S: Scalar> Distance<S, Point<S>> for Ray<S> {
    fn distance_squared(&self, pt: &Point<S>, epsilon: f64) -> S {
        if self.is_aligned(pt, epsilon) {
            self.l.distance_squared(pt, epsilon)
        } else {
            self.origin().distance_squared(pt)
        }
    }
}

impl<S: Scalar> Transform<S> for Ray<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.l.translate(v);
        self.pl.translate(v);
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        Self::from_line(self.l.rotate(axis, uv, theta, precision)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const EPS: f64 = 1e-10;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::from_coords(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector {
        Vector::new(x, y, z)
    }

    fn ray(o: Point, d: Vector) -> Ray {
        Ray::new(o, d).unwrap()
    }

    fn seg(a: Point, b: Point) -> LineSegment {
        LineSegment::new(a, b).unwrap()
    }

    #[test]
    fn alignment_is_a_half_space() {
        let r = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert!(r.is_aligned(&p(0.0, 5.0, 5.0), EPS));
        assert!(r.is_aligned(&p(3.0, -1.0, 0.0), EPS));
        assert!(!r.is_aligned(&p(-0.5, 0.0, 0.0), EPS));
        assert!(r.contains(&p(7.0, 0.0, 0.0), EPS));
        assert!(!r.contains(&p(-7.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn line_behind_the_origin_is_missed() {
        let r = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let ahead = Line::new(p(4.0, -1.0, 0.0), v(0.0, 1.0, 0.0)).unwrap();
        let behind = Line::new(p(-4.0, -1.0, 0.0), v(0.0, 1.0, 0.0)).unwrap();
        let hit = r.intersection(&ahead, EPS).unwrap();
        assert!(hit.as_point().unwrap().equals_eps(&p(4.0, 0.0, 0.0), 1e-12));
        assert!(r.intersection(&behind, EPS).is_none());
        assert!(behind.intersection(&r, EPS).is_none());
    }

    #[test]
    fn collinear_line_gives_the_ray() {
        let r = ray(p(1.0, 1.0, 1.0), v(0.0, 0.0, 2.0));
        let l = Line::new(p(1.0, 1.0, -9.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(matches!(r.intersection(&l, EPS), Some(Intersection::Ray(_))));
    }

    #[test]
    fn ray_and_plane() {
        let plane = Plane::new(p(0.0, 0.0, 5.0), v(0.0, 0.0, 1.0)).unwrap();
        let up = ray(p(1.0, 2.0, 0.0), v(0.0, 0.0, 1.0));
        let down = ray(p(1.0, 2.0, 0.0), v(0.0, 0.0, -1.0));
        let hit = plane.intersection(&up, EPS).unwrap();
        assert!(hit.as_point().unwrap().equals_eps(&p(1.0, 2.0, 5.0), 1e-9));
        assert!(down.intersection(&plane, EPS).is_none());
    }

    #[test]
    fn same_direction_rays_overlap_in_the_leading_one() {
        let a = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let b = ray(p(3.0, 0.0, 0.0), v(2.0, 0.0, 0.0));
        let hit = a.intersection(&b, EPS).unwrap();
        assert!(hit.equals_eps(&Intersection::Ray(b.clone()), EPS));
        assert!(b.intersection(&a, EPS).unwrap().equals_eps(&hit, EPS));
    }

    #[test]
    fn opposite_rays() {
        let a = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let facing = ray(p(3.0, 0.0, 0.0), v(-1.0, 0.0, 0.0));
        let hit = a.intersection(&facing, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-12));
        assert!(facing.intersection(&a, EPS).unwrap().equals_eps(&expected, 1e-12));

        let touching = ray(p(0.0, 0.0, 0.0), v(-1.0, 0.0, 0.0));
        assert!(a.intersection(&touching, EPS).unwrap().is_point());

        let away = ray(p(-3.0, 0.0, 0.0), v(-1.0, 0.0, 0.0));
        assert!(a.intersection(&away, EPS).is_none());
    }

    #[test]
    fn crossing_rays() {
        let a = ray(p(0.0, 0.0, 0.0), v(1.0, 1.0, 0.0));
        let b = ray(p(4.0, 0.0, 0.0), v(-1.0, 1.0, 0.0));
        let hit = a.intersection(&b, EPS).unwrap();
        assert!(hit.as_point().unwrap().equals_eps(&p(2.0, 2.0, 0.0), 1e-12));
        let c = ray(p(4.0, 0.0, 0.0), v(1.0, -1.0, 0.0));
        assert!(a.intersection(&c, EPS).is_none());
    }

    #[test]
    fn ray_clips_collinear_segment() {
        let r = ray(p(2.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let s = seg(p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0));
        let hit = r.intersection(&s, EPS).unwrap();
        let expected = Intersection::Segment(seg(p(2.0, 0.0, 0.0), p(5.0, 0.0, 0.0)));
        assert!(hit.equals_eps(&expected, 1e-12));
        assert!(s.intersection(&r, EPS).unwrap().equals_eps(&expected, 1e-12));

        let behind = seg(p(-5.0, 0.0, 0.0), p(-1.0, 0.0, 0.0));
        assert!(r.intersection(&behind, EPS).is_none());
    }

    #[test]
    fn ray_crosses_segment() {
        let r = ray(p(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0));
        let s = seg(p(-1.0, 3.0, 0.0), p(1.0, 3.0, 0.0));
        let hit = r.intersection(&s, EPS).unwrap();
        assert!(hit.as_point().unwrap().equals_eps(&p(0.0, 3.0, 0.0), 1e-12));
        let below = seg(p(-1.0, -3.0, 0.0), p(1.0, -3.0, 0.0));
        assert!(r.intersection(&below, EPS).is_none());
    }

    #[test]
    fn distance_uses_origin_behind() {
        let r = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert_relative_eq!(r.distance_squared(&p(5.0, 3.0, 0.0), EPS), 9.0);
        assert_relative_eq!(r.distance_squared(&p(-3.0, 4.0, 0.0), EPS), 25.0);
    }

    #[test]
    fn translate_moves_the_half_space() {
        let mut r = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        r.translate(&v(10.0, 0.0, 0.0));
        assert!(!r.is_aligned(&p(5.0, 0.0, 0.0), EPS));
        assert!(r.contains(&p(11.0, 0.0, 0.0), EPS));
    }
}
