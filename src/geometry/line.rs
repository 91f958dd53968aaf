use crate::error::{GeometryError, Result};
use crate::math::matrix::det4;
use crate::math::{Precision, Scalar};

use super::{Distance, Intersect, Intersection, LineSegment, Point, Transform, Vector};

/// An infinite line through `p` with direction `v`.
///
/// The parametric form is: `P(t) = p + t * v`. The direction is not
/// normalised, so `q() = p + v` is a second point on the line.
#[derive(Debug, Clone)]
pub struct Line<S: Scalar = f64> {
    p: Point<S>,
    v: Vector<S>,
}

impl<S: Scalar> Line<S> {
    /// Creates a new line from a point and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero.
    pub fn new(p: Point<S>, v: Vector<S>) -> Result<Self> {
        if v.is_zero() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { p, v })
    }

    /// Line through `p` and `q`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CoincidentPoints`] if `p == q`.
    pub fn from_points(p: Point<S>, q: Point<S>) -> Result<Self> {
        let v = Vector::between(&p, &q);
        if v.is_zero() {
            return Err(GeometryError::CoincidentPoints.into());
        }
        Ok(Self { p, v })
    }

    /// Returns the x axis through the origin.
    #[must_use]
    pub fn x_axis() -> Self {
        Self {
            p: Point::origin(),
            v: Vector::new(S::one(), S::zero(), S::zero()),
        }
    }

    /// Returns the y axis through the origin.
    #[must_use]
    pub fn y_axis() -> Self {
        Self {
            p: Point::origin(),
            v: Vector::new(S::zero(), S::one(), S::zero()),
        }
    }

    /// Returns the z axis through the origin.
    #[must_use]
    pub fn z_axis() -> Self {
        Self {
            p: Point::origin(),
            v: Vector::new(S::zero(), S::zero(), S::one()),
        }
    }

    /// Returns the anchor point.
    #[must_use]
    pub fn p(&self) -> &Point<S> {
        &self.p
    }

    /// Returns the direction vector.
    #[must_use]
    pub fn v(&self) -> &Vector<S> {
        &self.v
    }

    /// The point `p + v`.
    #[must_use]
    pub fn q(&self) -> Point<S> {
        self.p.displaced(&self.v)
    }

    /// The point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: &S) -> Point<S> {
        self.p.displaced(&self.v.scale(t))
    }

    /// Parameter of the foot of the perpendicular from `pt`.
    #[must_use]
    pub fn parameter_of(&self, pt: &Point<S>) -> S {
        Vector::between(&self.p, pt).dot(&self.v) / self.v.magnitude_squared()
    }

    #[must_use]
    pub fn is_parallel(&self, other: &Self, epsilon: f64) -> bool {
        self.v.is_scalar_multiple(&other.v, epsilon)
    }

    /// True if `pt` is within distance `epsilon` of the line.
    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        let tol = S::tolerance(epsilon);
        self.distance_squared(pt, epsilon) <= tol.clone() * tol
    }

    /// Foot of the perpendicular from `pt`.
    #[must_use]
    pub fn point_of_projection(&self, pt: &Point<S>) -> Point<S> {
        self.point_at(&self.parameter_of(pt))
    }

    /// Same set of points, whatever the direction orientation.
    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        self.is_parallel(other, epsilon) && self.contains(&other.p, epsilon)
    }

    /// The shortest segment joining two skew lines, from this line to
    /// `other`. `None` if the lines are parallel or intersect.
    #[must_use]
    pub fn line_of_intersection(&self, other: &Self, epsilon: f64) -> Option<LineSegment<S>> {
        if self.is_parallel(other, epsilon) {
            return None;
        }
        let w0 = Vector::between(&other.p, &self.p);
        let a = self.v.magnitude_squared();
        let b = self.v.dot(&other.v);
        let c = other.v.magnitude_squared();
        let d = self.v.dot(&w0);
        let e = other.v.dot(&w0);
        let den = a.clone() * c.clone() - b.clone() * b.clone();
        if den.is_zero() {
            return None;
        }
        let s = (b.clone() * e.clone() - c * d.clone()) / den.clone();
        let t = (a * e - b * d) / den;
        let near = self.point_at(&s);
        let far = other.point_at(&t);
        if near.equals_eps(&far, epsilon) {
            return None;
        }
        LineSegment::new(near, far).ok()
    }

    /// `(p2 - p1) · (v1 × v2)` through the coplanarity determinant of
    /// `p1, q1, p2, q2`; zero iff the lines are coplanar.
    fn coplanarity(&self, other: &Self) -> S {
        let row = |pt: &Point<S>| [pt.x(), pt.y(), pt.z(), S::one()];
        det4(&[row(&self.p), row(&self.q()), row(&other.p), row(&other.q())])
    }
}

impl<S: Scalar> Intersect<S, Line<S>> for Line<S> {
    /// A point, the line itself when coincident, or `None` for parallel or
    /// skew lines.
    fn intersection(&self, other: &Line<S>, epsilon: f64) -> Option<Intersection<S>> {
        if self.is_parallel(other, epsilon) {
            return self
                .contains(&other.p, epsilon)
                .then(|| Intersection::Line(self.clone()));
        }

        let cross = self.v.cross(&other.v);
        let cross_sq = cross.magnitude_squared();

        // skew distance = |det| / |v1 × v2|
        let det = self.coplanarity(other);
        let tol = S::tolerance(epsilon);
        if det.clone() * det > tol.clone() * tol * cross_sq.clone() {
            return None;
        }

        let w = Vector::between(&self.p, &other.p);
        let t = w.cross(&other.v).dot(&cross) / cross_sq;
        Some(Intersection::Point(self.point_at(&t)))
    }
}

impl<S: Scalar> Distance<S, Point<S>> for Line<S> {
    /// `|(pt - p) × v|² / |v|²`.
    fn distance_squared(&self, pt: &Point<S>, _epsilon: f64) -> S {
        Vector::between(&self.p, pt).cross(&self.v).magnitude_squared() / self.v.magnitude_squared()
    }
}

impl<S: Scalar> Distance<S, Line<S>> for Line<S> {
    fn distance_squared(&self, other: &Line<S>, epsilon: f64) -> S {
        if self.is_parallel(other, epsilon) {
            return self.distance_squared(&other.p, epsilon);
        }
        let cross = self.v.cross(&other.v);
        let triple = Vector::between(&self.p, &other.p).dot(&cross);
        triple.clone() * triple / cross.magnitude_squared()
    }
}

impl<S: Scalar> Transform<S> for Line<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.p.translate(v);
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let p = self.p.rotate(axis, uv, theta, precision)?;
        let v = self.v.rotate(uv, theta, precision)?;
        Self::new(p, v)
    }
}
