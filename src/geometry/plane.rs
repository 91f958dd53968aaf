use crate::error::{GeometryError, Result};
use crate::math::matrix::det4;
use crate::math::{Precision, Scalar};

use super::{Distance, Intersect, Intersection, Line, Point, Transform, Vector};

/// Classification of a point relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Point is on the positive side (in the direction of the normal).
    Front,
    /// Point is on the negative side (opposite the normal).
    Back,
    /// Point lies on the plane (within tolerance).
    On,
}

impl Side {
    /// `1`, `-1` or `0`.
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Self::Front => 1,
            Self::Back => -1,
            Self::On => 0,
        }
    }
}

/// Coefficients of `ax + by + cz + d = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneEquation<S: Scalar = f64> {
    pub a: S,
    pub b: S,
    pub c: S,
    pub d: S,
}

impl<S: Scalar> PlaneEquation<S> {
    fn new(p: &Point<S>, n: &Vector<S>) -> Self {
        Self {
            a: n.x().clone(),
            b: n.y().clone(),
            c: n.z().clone(),
            d: -n.dot(&p.vector()),
        }
    }

    /// `ax + by + cz + d` at `pt`; zero on the plane, signed by side.
    #[must_use]
    pub fn evaluate(&self, pt: &Point<S>) -> S {
        self.a.clone() * pt.x() + self.b.clone() * pt.y() + self.c.clone() * pt.z() + self.d.clone()
    }
}

/// Snaps `value` (a dot product against `normal`) to a side.
///
/// `epsilon` is a distance: the point is `On` when `|value| / |normal| <= epsilon`.
fn classify<S: Scalar>(value: &S, normal: &Vector<S>, epsilon: f64) -> Side {
    let tol = S::tolerance(epsilon);
    if value.clone() * value.clone() <= tol.clone() * tol * normal.magnitude_squared() {
        Side::On
    } else if *value > S::zero() {
        Side::Front
    } else {
        Side::Back
    }
}

/// Side of `point` relative to the plane through `anchor` with `normal`,
/// without building a [`Plane`].
pub(crate) fn side_of_raw<S: Scalar>(
    point: &Point<S>,
    anchor: &Point<S>,
    normal: &Vector<S>,
    epsilon: f64,
) -> Side {
    classify(&Vector::between(anchor, point).dot(normal), normal, epsilon)
}

/// An infinite plane through `p` with normal `n`.
///
/// The equation coefficients are derived at construction and recomputed on
/// every transform.
#[derive(Debug, Clone)]
pub struct Plane<S: Scalar = f64> {
    p: Point<S>,
    n: Vector<S>,
    equation: PlaneEquation<S>,
}

impl<S: Scalar> Plane<S> {
    /// Creates a plane from a point and a normal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `n` is zero.
    pub fn new(p: Point<S>, n: Vector<S>) -> Result<Self> {
        if n.is_zero() {
            return Err(GeometryError::ZeroVector.into());
        }
        let equation = PlaneEquation::new(&p, &n);
        Ok(Self { p, n, equation })
    }

    /// Plane through three points, normal `(q - p) × (r - p)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CollinearPoints`] if the points are collinear.
    pub fn from_points(p: Point<S>, q: &Point<S>, r: &Point<S>) -> Result<Self> {
        let n = Vector::between(&p, q).cross(&Vector::between(&p, r));
        if n.is_zero() {
            return Err(GeometryError::CollinearPoints.into());
        }
        Self::new(p, n)
    }

    /// Some plane containing every point, `None` if all points are collinear.
    ///
    /// Anchored on the two most distant points and the point farthest off
    /// their line, so clustered leading points do not tilt the normal.
    #[must_use]
    pub fn through(points: &[Point<S>], epsilon: f64) -> Option<Self> {
        let (a, b) = Point::spread(points, epsilon)?;
        let line = Line::from_points(a.clone(), b.clone()).ok()?;
        let off = Point::farthest_by(points, |p| line.distance_squared(p, epsilon))?;
        if line.contains(off, epsilon) {
            return None;
        }
        Self::from_points(a.clone(), b, off).ok()
    }

    /// Returns the anchor point.
    #[must_use]
    pub fn p(&self) -> &Point<S> {
        &self.p
    }

    /// Returns the normal, not normalised.
    #[must_use]
    pub fn n(&self) -> &Vector<S> {
        &self.n
    }

    /// Returns the cached `ax + by + cz + d = 0` coefficients.
    #[must_use]
    pub fn equation(&self) -> &PlaneEquation<S> {
        &self.equation
    }

    /// Two in-plane vectors `(u, w)` with `w = n × u`; neither is normalised.
    #[must_use]
    pub fn basis(&self) -> (Vector<S>, Vector<S>) {
        let u = self.n.orthogonal();
        let w = self.n.cross(&u);
        (u, w)
    }

    /// The same plane with its normal reversed.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let n = -&self.n;
        let equation = PlaneEquation::new(&self.p, &n);
        Self {
            p: self.p.clone(),
            n,
            equation,
        }
    }

    #[must_use]
    pub fn side_of(&self, pt: &Point<S>, epsilon: f64) -> Side {
        classify(&self.equation.evaluate(pt), &self.n, epsilon)
    }

    #[must_use]
    pub fn is_on_plane(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.side_of(pt, epsilon) == Side::On
    }

    /// True unless `a` and `b` are strictly on opposite sides; points on the
    /// plane count as being on either side.
    #[must_use]
    pub fn is_on_same_side(&self, a: &Point<S>, b: &Point<S>, epsilon: f64) -> bool {
        let sa = self.side_of(a, epsilon);
        let sb = self.side_of(b, epsilon);
        sa == Side::On || sb == Side::On || sa == sb
    }

    /// True if `a` and `b` are strictly on the same side, neither on the plane.
    #[must_use]
    pub fn is_on_same_side_not_on(&self, a: &Point<S>, b: &Point<S>, epsilon: f64) -> bool {
        let sa = self.side_of(a, epsilon);
        sa != Side::On && sa == self.side_of(b, epsilon)
    }

    /// True if no two of `points` are strictly on opposite sides.
    #[must_use]
    pub fn all_on_same_side(&self, points: &[Point<S>], epsilon: f64) -> bool {
        let sides = self.sides(points, epsilon);
        !(sides.contains(&Side::Front) && sides.contains(&Side::Back))
    }

    /// True if every point is strictly on one side.
    #[must_use]
    pub fn all_on_same_side_not_on(&self, points: &[Point<S>], epsilon: f64) -> bool {
        let sides = self.sides(points, epsilon);
        !sides.contains(&Side::On)
            && !(sides.contains(&Side::Front) && sides.contains(&Side::Back))
    }

    #[cfg(feature = "parallel")]
    fn sides(&self, points: &[Point<S>], epsilon: f64) -> Vec<Side> {
        use rayon::prelude::*;
        points.par_iter().map(|p| self.side_of(p, epsilon)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn sides(&self, points: &[Point<S>], epsilon: f64) -> Vec<Side> {
        points.iter().map(|p| self.side_of(p, epsilon)).collect()
    }

    /// True if `line` runs parallel to (or lies in) the plane.
    #[must_use]
    pub fn is_parallel_to_line(&self, line: &Line<S>, epsilon: f64) -> bool {
        self.n.is_orthogonal(line.v(), epsilon)
    }

    #[must_use]
    pub fn is_parallel(&self, other: &Self, epsilon: f64) -> bool {
        self.n.is_scalar_multiple(&other.n, epsilon)
    }

    /// Same set of points, whatever the normal orientation.
    #[must_use]
    pub fn is_coincident(&self, other: &Self, epsilon: f64) -> bool {
        self.is_parallel(other, epsilon) && self.is_on_plane(&other.p, epsilon)
    }

    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        self.is_coincident(other, epsilon)
    }

    /// Foot of the perpendicular from `pt`.
    #[must_use]
    pub fn point_of_projection(&self, pt: &Point<S>) -> Point<S> {
        let t = self.equation.evaluate(pt) / self.n.magnitude_squared();
        pt.displaced(&-self.n.scale(&t))
    }

    /// Intersection of three planes: a point, a line, a plane or nothing.
    #[must_use]
    pub fn intersection_planes(&self, a: &Self, b: &Self, epsilon: f64) -> Option<Intersection<S>> {
        match self.intersection(a, epsilon)? {
            Intersection::Plane(p) => p.intersection(b, epsilon),
            Intersection::Line(l) => b.intersection(&l, epsilon),
            _ => None,
        }
    }
}

impl<S: Scalar> Intersect<S, Line<S>> for Plane<S> {
    /// Non-parallel lines meet the plane at the parameter given by the
    /// determinant ratio over three in-plane points and two line points.
    fn intersection(&self, line: &Line<S>, epsilon: f64) -> Option<Intersection<S>> {
        if self.is_parallel_to_line(line, epsilon) {
            return self
                .is_on_plane(line.p(), epsilon)
                .then(|| Intersection::Line(line.clone()));
        }

        let (u, w) = self.basis();
        let x1 = self.p.vector();
        let x2 = &x1 + &u;
        let x3 = &x1 + &w;
        let x4 = line.p().vector();
        let d = line.v();

        let one = S::one();
        let zero = S::zero();
        let row = |f: fn(&Vector<S>) -> &S, last: &Vector<S>| {
            [f(&x1).clone(), f(&x2).clone(), f(&x3).clone(), f(last).clone()]
        };
        let num = det4(&[
            [one.clone(), one.clone(), one.clone(), one.clone()],
            row(Vector::x, &x4),
            row(Vector::y, &x4),
            row(Vector::z, &x4),
        ]);
        let den = det4(&[
            [one.clone(), one.clone(), one, zero],
            row(Vector::x, d),
            row(Vector::y, d),
            row(Vector::z, d),
        ]);
        if den.is_zero() {
            return None;
        }
        let t = -(num / den);
        Some(Intersection::Point(line.p().displaced(&d.scale(&t))))
    }
}

impl<S: Scalar> Intersect<S, Plane<S>> for Line<S> {
    fn intersection(&self, plane: &Plane<S>, epsilon: f64) -> Option<Intersection<S>> {
        plane.intersection(self, epsilon)
    }
}

impl<S: Scalar> Intersect<S, Plane<S>> for Plane<S> {
    /// Parallel planes give the plane itself when coincident; otherwise the
    /// line along `n1 × n2`, anchored where an in-plane line of `self`
    /// perpendicular to it crosses `other`.
    fn intersection(&self, other: &Plane<S>, epsilon: f64) -> Option<Intersection<S>> {
        if self.is_parallel(other, epsilon) {
            return self
                .is_on_plane(&other.p, epsilon)
                .then(|| Intersection::Plane(self.clone()));
        }
        let direction = self.n.cross(&other.n);
        let across = Line::new(self.p.clone(), self.n.cross(&direction)).ok()?;
        match other.intersection(&across, epsilon)? {
            Intersection::Point(anchor) => Line::new(anchor, direction).ok().map(Intersection::Line),
            _ => None,
        }
    }
}

impl<S: Scalar> Distance<S, Point<S>> for Plane<S> {
    fn distance_squared(&self, pt: &Point<S>, _epsilon: f64) -> S {
        let value = self.equation.evaluate(pt);
        value.clone() * value / self.n.magnitude_squared()
    }
}

impl<S: Scalar> Transform<S> for Plane<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.p.translate(v);
        self.equation = PlaneEquation::new(&self.p, &self.n);
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let p = self.p.rotate(axis, uv, theta, precision)?;
        let n = self.n.rotate(uv, theta, precision)?;
        Self::new(p, n)
    }
}
