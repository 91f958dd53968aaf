use crate::error::{EuclisError, GeometryError, Result};
use crate::math::{Precision, Scalar};

use super::plane::{side_of_raw, Side};
use super::{Line, Transform, Vector};

/// A position stored as `offset + rel`.
///
/// Points that share an offset can be translated as a group by moving the
/// offset alone; [`Point::set_offset`] and [`Point::set_rel`] change one
/// half of the representation while keeping the absolute position.
#[derive(Debug, Clone)]
pub struct Point<S: Scalar = f64> {
    offset: Vector<S>,
    rel: Vector<S>,
}

impl<S: Scalar> Point<S> {
    /// Creates a point at `offset + rel`.
    #[must_use]
    pub fn new(offset: Vector<S>, rel: Vector<S>) -> Self {
        Self { offset, rel }
    }

    /// A point at `position` with a zero offset.
    #[must_use]
    pub fn from_vector(position: Vector<S>) -> Self {
        Self::new(Vector::zero(), position)
    }

    /// Creates a point from absolute coordinates with a zero offset.
    #[must_use]
    pub fn from_coords(x: S, y: S, z: S) -> Self {
        Self::from_vector(Vector::new(x, y, z))
    }

    /// Returns the origin.
    #[must_use]
    pub fn origin() -> Self {
        Self::from_vector(Vector::zero())
    }

    /// Returns the offset half of the representation.
    #[must_use]
    pub fn offset(&self) -> &Vector<S> {
        &self.offset
    }

    /// Returns the position relative to the offset.
    #[must_use]
    pub fn rel(&self) -> &Vector<S> {
        &self.rel
    }

    /// Absolute position, `rel + offset`.
    #[must_use]
    pub fn vector(&self) -> Vector<S> {
        &self.rel + &self.offset
    }

    /// Returns the absolute x coordinate.
    #[must_use]
    pub fn x(&self) -> S {
        self.rel.x().clone() + self.offset.x().clone()
    }

    /// Returns the absolute y coordinate.
    #[must_use]
    pub fn y(&self) -> S {
        self.rel.y().clone() + self.offset.y().clone()
    }

    /// Returns the absolute z coordinate.
    #[must_use]
    pub fn z(&self) -> S {
        self.rel.z().clone() + self.offset.z().clone()
    }

    /// Replaces the offset, recomputing `rel` so the position is unchanged.
    pub fn set_offset(&mut self, offset: Vector<S>) {
        self.rel = &self.vector() - &offset;
        self.offset = offset;
    }

    /// Replaces `rel`, recomputing the offset so the position is unchanged.
    pub fn set_rel(&mut self, rel: Vector<S>) {
        self.offset = &self.vector() - &rel;
        self.rel = rel;
    }

    /// The point displaced by `v`, keeping this point's offset.
    #[must_use]
    pub fn displaced(&self, v: &Vector<S>) -> Self {
        Self::new(self.offset.clone(), &self.rel + v)
    }

    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        self.vector().equals_eps(&other.vector(), epsilon)
    }

    /// Returns the squared distance to `other`.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> S {
        Vector::between(self, other).magnitude_squared()
    }

    #[must_use]
    pub fn distance(&self, other: &Self, precision: Precision) -> S {
        self.distance_squared(other).sqrt(precision)
    }

    /// True if this point lies within the two planes perpendicular to `ab`
    /// through `a` and through `b` (boundaries included).
    ///
    /// Weaker than collinearity: the point may be anywhere in the slab.
    #[must_use]
    pub fn is_aligned(&self, a: &Self, b: &Self, epsilon: f64) -> bool {
        let ab = Vector::between(a, b);
        if ab.is_zero() {
            return self.equals_eps(a, epsilon);
        }
        side_of_raw(self, a, &ab, epsilon) != Side::Back
            && side_of_raw(self, b, &ab, epsilon) != Side::Front
    }

    /// True if this point lies on the closed segment `ab`.
    #[must_use]
    pub fn is_between(&self, a: &Self, b: &Self, epsilon: f64) -> bool {
        Self::is_collinear(&[a.clone(), b.clone(), self.clone()], epsilon)
            && self.is_aligned(a, b, epsilon)
    }

    /// Arithmetic mean of `points`, `None` if empty.
    #[must_use]
    pub fn centroid(points: &[Self]) -> Option<Self> {
        let first = points.first()?;
        let mut sum = Vector::zero();
        let mut n = S::zero();
        for p in points {
            sum = &sum + &p.vector();
            n = n + S::one();
        }
        let mut c = Self::from_vector(sum.divide(&n));
        c.set_offset(first.offset.clone());
        Some(c)
    }

    /// The point of `points` maximising `key`, `None` if empty.
    pub(crate) fn farthest_by<'a>(points: &'a [Self], key: impl Fn(&Self) -> S) -> Option<&'a Self> {
        let mut best: Option<(S, &Self)> = None;
        for p in points {
            let d = key(p);
            let better = match &best {
                Some((bd, _)) => d > *bd,
                None => true,
            };
            if better {
                best = Some((d, p));
            }
        }
        best.map(|(_, p)| p)
    }

    /// Two far-apart anchors of `points`: the point farthest from the first,
    /// then the point farthest from that one. `None` if every point
    /// coincides within `epsilon`.
    pub(crate) fn spread(points: &[Self], epsilon: f64) -> Option<(&Self, &Self)> {
        let first = points.first()?;
        let a = Self::farthest_by(points, |p| first.distance_squared(p))?;
        let b = Self::farthest_by(points, |p| a.distance_squared(p))?;
        if a.equals_eps(b, epsilon) {
            None
        } else {
            Some((a, b))
        }
    }

    /// True if every point lies on one line (fewer than three points are
    /// trivially collinear).
    #[must_use]
    pub fn is_collinear(points: &[Self], epsilon: f64) -> bool {
        let Some((a, b)) = Self::spread(points, epsilon) else {
            return true;
        };
        match Line::from_points(a.clone(), b.clone()) {
            Ok(line) => points.iter().all(|p| line.contains(p, epsilon)),
            Err(EuclisError::Geometry(GeometryError::CoincidentPoints)) => true,
            Err(_) => false,
        }
    }

    /// True if every point lies on one plane.
    #[must_use]
    pub fn is_coplanar(points: &[Self], epsilon: f64) -> bool {
        match super::Plane::through(points, epsilon) {
            Some(plane) => points.iter().all(|p| plane.is_on_plane(p, epsilon)),
            None => true,
        }
    }
}

impl<S: Scalar> PartialEq for Point<S> {
    /// Exact equality of absolute positions, whatever the offsets.
    fn eq(&self, other: &Self) -> bool {
        self.vector() == other.vector()
    }
}

impl<S: Scalar> Transform<S> for Point<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.offset = &self.offset + v;
    }

    /// Projects onto the axis, rotates the remaining offset about `uv` and
    /// translates back.
    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let foot = axis.point_of_projection(self);
        let arm = Vector::between(&foot, self);
        let rotated = arm.rotate(uv, theta, precision)?;
        let position = &foot.vector() + &rotated;
        Ok(Self::new(self.offset.clone(), &position - &self.offset))
    }
}

impl From<nalgebra::Point3<f64>> for Point<f64> {
    fn from(p: nalgebra::Point3<f64>) -> Self {
        Self::from_vector(p.coords.into())
    }
}

impl From<&Point<f64>> for nalgebra::Point3<f64> {
    fn from(p: &Point<f64>) -> Self {
        nalgebra::Point3::from(nalgebra::Vector3::from(p.vector()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::from_coords(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector {
        Vector::new(x, y, z)
    }

    #[test]
    fn offset_and_rel_compose() {
        let pt = Point::new(v(1.0, 1.0, 1.0), v(2.0, 3.0, 4.0));
        assert_eq!(pt.vector(), v(3.0, 4.0, 5.0));
        assert_relative_eq!(pt.y(), 4.0);
    }

    #[test]
    fn set_offset_keeps_position() {
        let mut pt = p(3.0, 4.0, 5.0);
        pt.set_offset(v(10.0, 0.0, -1.0));
        assert_eq!(pt.vector(), v(3.0, 4.0, 5.0));
        assert_eq!(*pt.rel(), v(-7.0, 4.0, 6.0));

        pt.set_rel(v(0.0, 0.0, 0.0));
        assert_eq!(pt.vector(), v(3.0, 4.0, 5.0));
        assert_eq!(*pt.offset(), v(3.0, 4.0, 5.0));
    }

    #[test]
    fn translate_then_back() {
        let mut pt = p(1.0, 2.0, 3.0);
        let shift = v(0.5, -7.0, 2.0);
        pt.translate(&shift);
        assert!(pt.equals_eps(&p(1.5, -5.0, 5.0), 1e-12));
        pt.translate(&-shift);
        assert!(pt.equals_eps(&p(1.0, 2.0, 3.0), 1e-12));
    }

    #[test]
    fn distance() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(3.0, 4.0, 12.0);
        assert_relative_eq!(a.distance_squared(&b), 169.0);
        assert_relative_eq!(a.distance(&b, Precision::default()), 13.0);
    }

    #[test]
    fn aligned_is_a_slab_test() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(10.0, 0.0, 0.0);
        assert!(p(5.0, 7.0, -3.0).is_aligned(&a, &b, 1e-10));
        assert!(p(10.0, 1.0, 0.0).is_aligned(&a, &b, 1e-10));
        assert!(!p(10.5, 0.0, 0.0).is_aligned(&a, &b, 1e-10));
        assert!(!p(-0.1, 0.0, 0.0).is_aligned(&a, &b, 1e-10));
    }

    #[test]
    fn between_requires_collinearity() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(10.0, 10.0, 0.0);
        assert!(p(5.0, 5.0, 0.0).is_between(&a, &b, 1e-10));
        assert!(!p(5.0, 6.0, 0.0).is_between(&a, &b, 1e-10));
    }

    #[test]
    fn centroid_of_square() {
        let pts = [
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
        ];
        let c = Point::centroid(&pts).unwrap();
        assert!(c.equals_eps(&p(1.0, 1.0, 0.0), 1e-12));
        assert!(Point::<f64>::centroid(&[]).is_none());
    }

    #[test]
    fn collinear_and_coplanar() {
        let line = [p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(3.0, 3.0, 3.0)];
        assert!(Point::is_collinear(&line, 1e-10));
        let bent = [p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(3.0, 3.0, 3.5)];
        assert!(!Point::is_collinear(&bent, 1e-10));
        assert!(Point::is_coplanar(&bent, 1e-10));
        let mut tetra = bent.to_vec();
        tetra.push(p(1.0, 0.0, 0.0));
        assert!(!Point::is_coplanar(&tetra, 1e-10));
    }

    #[test]
    fn collinear_with_nearly_coincident_lead() {
        let pts = [
            p(0.0, 0.0, 0.0),
            p(2e-10, 5e-11, 0.0),
            p(10.0, 0.0, 0.0),
            p(20.0, 0.0, 0.0),
        ];
        assert!(Point::is_collinear(&pts, 1e-10));
        assert!(!Point::is_collinear(&[pts[0].clone(), pts[2].clone(), p(5.0, 1.0, 0.0)], 1e-10));
        assert!(Point::is_collinear(&[p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)], 1e-10));
    }

    #[test]
    fn rotate_about_offset_axis() {
        // axis parallel to z through (1, 0, 0)
        let axis = Line::new(p(1.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let uv = v(0.0, 0.0, 1.0);
        let rotated = p(2.0, 0.0, 5.0)
            .rotate(&axis, &uv, FRAC_PI_2, Precision::default())
            .unwrap();
        assert!(rotated.equals_eps(&p(1.0, 1.0, 5.0), 1e-12));
    }

    #[test]
    fn exact_points() {
        let r = |n: i64| BigRational::from_integer(BigInt::from(n));
        let a = Point::from_coords(r(1), r(2), r(2));
        assert_eq!(a.distance_squared(&Point::origin()), r(9));
        assert_eq!(a.distance(&Point::origin(), Precision::default()), r(3));
    }

    #[test]
    fn exact_distance_beyond_float_range() {
        let far = BigRational::from_integer(num_traits::pow(BigInt::from(10), 200));
        let zero = BigRational::from_integer(BigInt::from(0));
        let a = Point::from_coords(far.clone(), zero.clone(), zero.clone());
        let b = Point::from_coords(zero.clone(), zero.clone(), zero);
        assert_eq!(a.distance(&b, Precision::default()), far);
    }

    #[test]
    fn nalgebra_conversion() {
        let np = nalgebra::Point3::new(1.0, 2.0, 3.0);
        let pt = Point::from(np);
        assert_eq!(nalgebra::Point3::from(&pt), np);
    }
}
