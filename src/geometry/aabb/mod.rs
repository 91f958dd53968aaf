mod slice;
mod viewport;

pub use slice::{AabbSlice, Axis};

use crate::error::{GeometryError, Result};
use crate::math::{Precision, Scalar};

use super::{Bounded, Line, Plane, Point, Transform, Vector};

/// An axis-aligned bounding box, stored as its six extremes.
///
/// `min[i] <= max[i]` on every axis. A box may be flat (a single point or
/// face); flat boxes still take part in union and containment.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb<S: Scalar = f64> {
    min: [S; 3],
    max: [S; 3],
}

impl<S: Scalar> Aabb<S> {
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if `min` exceeds `max` on any
    /// axis.
    pub fn new(min: [S; 3], max: [S; 3]) -> Result<Self> {
        if min.iter().zip(&max).any(|(lo, hi)| lo > hi) {
            return Err(GeometryError::Degenerate("box minimum exceeds maximum".into()).into());
        }
        Ok(Self { min, max })
    }

    /// The flat box at a single point.
    #[must_use]
    pub fn from_point(pt: &Point<S>) -> Self {
        let c = pt.vector().to_array();
        Self {
            min: c.clone(),
            max: c,
        }
    }

    /// The smallest box containing every point, `None` if there are none.
    #[must_use]
    pub fn from_points(points: &[Point<S>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::from_point(first);
        for pt in rest {
            aabb.expand(pt);
        }
        Some(aabb)
    }

    /// Grows the box to include `pt`.
    pub fn expand(&mut self, pt: &Point<S>) {
        for (i, c) in pt.vector().to_array().into_iter().enumerate() {
            if c < self.min[i] {
                self.min[i] = c;
            } else if c > self.max[i] {
                self.max[i] = c;
            }
        }
    }

    /// Returns the smallest x coordinate.
    #[must_use]
    pub fn xmin(&self) -> &S {
        &self.min[0]
    }

    /// Returns the largest x coordinate.
    #[must_use]
    pub fn xmax(&self) -> &S {
        &self.max[0]
    }

    /// Returns the smallest y coordinate.
    #[must_use]
    pub fn ymin(&self) -> &S {
        &self.min[1]
    }

    /// Returns the largest y coordinate.
    #[must_use]
    pub fn ymax(&self) -> &S {
        &self.max[1]
    }

    /// Returns the smallest z coordinate.
    #[must_use]
    pub fn zmin(&self) -> &S {
        &self.min[2]
    }

    /// Returns the largest z coordinate.
    #[must_use]
    pub fn zmax(&self) -> &S {
        &self.max[2]
    }

    /// Extremes along `axis` as `(min, max)`.
    #[must_use]
    pub fn range(&self, axis: Axis) -> (&S, &S) {
        let i = axis.index();
        (&self.min[i], &self.max[i])
    }

    /// Returns the corner with every coordinate minimal.
    #[must_use]
    pub fn min_corner(&self) -> Point<S> {
        Point::from_vector(Vector::from_array(self.min.clone()))
    }

    /// Returns the corner with every coordinate maximal.
    #[must_use]
    pub fn max_corner(&self) -> Point<S> {
        Point::from_vector(Vector::from_array(self.max.clone()))
    }

    /// Returns the centre of the box.
    #[must_use]
    pub fn centroid(&self) -> Point<S> {
        let mid = |i: usize| (self.min[i].clone() + self.max[i].clone()) * S::half();
        Point::from_coords(mid(0), mid(1), mid(2))
    }

    /// The eight corners, `x` varying fastest.
    #[must_use]
    pub fn corners(&self) -> [Point<S>; 8] {
        std::array::from_fn(|k| {
            let pick = |i: usize| {
                if (k >> i) & 1 == 0 {
                    self.min[i].clone()
                } else {
                    self.max[i].clone()
                }
            };
            Point::from_coords(pick(0), pick(1), pick(2))
        })
    }

    /// The box grown by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: &S) -> Self {
        Self {
            min: self.min.clone().map(|c| c - amount.clone()),
            max: self.max.clone().map(|c| c + amount.clone()),
        }
    }

    /// Component-wise hull of both boxes; one box is returned unchanged when
    /// it already contains the other.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.contains(other, 0.0) {
            return self.clone();
        }
        if other.contains(self, 0.0) {
            return other.clone();
        }
        Self {
            min: std::array::from_fn(|i| S::min_of(self.min[i].clone(), other.min[i].clone())),
            max: std::array::from_fn(|i| S::max_of(self.max[i].clone(), other.max[i].clone())),
        }
    }

    #[must_use]
    pub fn contains_point(&self, pt: &Point<S>, epsilon: f64) -> bool {
        let tol = S::tolerance(epsilon);
        pt.vector()
            .to_array()
            .iter()
            .enumerate()
            .all(|(i, c)| *c >= self.min[i].clone() - tol.clone() && *c <= self.max[i].clone() + tol.clone())
    }

    /// True if `other` lies entirely inside this box (shared faces allowed).
    #[must_use]
    pub fn contains(&self, other: &Self, epsilon: f64) -> bool {
        let tol = S::tolerance(epsilon);
        (0..3).all(|i| {
            other.min[i] >= self.min[i].clone() - tol.clone() && other.max[i] <= self.max[i].clone() + tol.clone()
        })
    }

    /// True if the boxes are disjoint on some axis.
    ///
    /// The comparison is strict: boxes that share a face, edge or corner are
    /// not beyond each other.
    #[must_use]
    pub fn is_beyond(&self, other: &Self) -> bool {
        (0..3).any(|i| self.max[i] < other.min[i] || other.max[i] < self.min[i])
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_beyond(other)
    }

    /// The overlap box, `None` if the boxes are beyond each other.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if self.is_beyond(other) {
            return None;
        }
        Some(Self {
            min: std::array::from_fn(|i| S::max_of(self.min[i].clone(), other.min[i].clone())),
            max: std::array::from_fn(|i| S::min_of(self.max[i].clone(), other.max[i].clone())),
        })
    }

    /// The cross-section perpendicular to `axis` at coordinate `at`, `None`
    /// if `at` is outside the box.
    #[must_use]
    pub fn slice(&self, axis: Axis, at: S) -> Option<AabbSlice<S>> {
        let i = axis.index();
        if at < self.min[i] || at > self.max[i] {
            return None;
        }
        let (u, v) = axis.others();
        AabbSlice::new(
            axis,
            at,
            [self.min[u].clone(), self.min[v].clone()],
            [self.max[u].clone(), self.max[v].clone()],
        )
        .ok()
    }

    /// The six bounding faces: `xmin, xmax, ymin, ymax, zmin, zmax`.
    #[must_use]
    pub fn faces(&self) -> Vec<AabbSlice<S>> {
        [Axis::X, Axis::Y, Axis::Z]
            .into_iter()
            .flat_map(|axis| {
                let (lo, hi) = self.range(axis);
                [self.slice(axis, lo.clone()), self.slice(axis, hi.clone())]
            })
            .flatten()
            .collect()
    }

    /// True unless every corner is strictly on one side of `plane`.
    #[must_use]
    pub fn intersects_plane(&self, plane: &Plane<S>, epsilon: f64) -> bool {
        !plane.all_on_same_side_not_on(&self.corners(), epsilon)
    }
}

impl<S: Scalar> Bounded<S> for Aabb<S> {
    fn envelope(&self) -> Aabb<S> {
        self.clone()
    }
}

impl<S: Scalar> Bounded<S> for Point<S> {
    fn envelope(&self) -> Aabb<S> {
        Aabb::from_point(self)
    }
}

impl<S: Scalar> Transform<S> for Aabb<S> {
    fn translate(&mut self, v: &Vector<S>) {
        let d = v.to_array();
        for i in 0..3 {
            self.min[i] = self.min[i].clone() + d[i].clone();
            self.max[i] = self.max[i].clone() + d[i].clone();
        }
    }

    /// The box around the rotated corners.
    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let corners = self
            .corners()
            .iter()
            .map(|c| c.rotate(axis, uv, theta, precision))
            .collect::<Result<Vec<_>>>()?;
        Self::from_points(&corners).ok_or_else(|| GeometryError::Degenerate("empty box".into()).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    const EPS: f64 = 1e-10;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::from_coords(x, y, z)
    }

    fn cube(lo: f64, hi: f64) -> Aabb {
        Aabb::new([lo; 3], [hi; 3]).unwrap()
    }

    #[test]
    fn inverted_extremes_are_rejected() {
        assert!(Aabb::new([0.0, 0.0, 1.0], [1.0, 1.0, 0.0]).is_err());
    }

    #[test]
    fn from_points_tracks_extremes() {
        let b = Aabb::from_points(&[p(1.0, 5.0, -2.0), p(-3.0, 0.0, 4.0), p(0.0, 7.0, 0.0)]).unwrap();
        assert_relative_eq!(*b.xmin(), -3.0);
        assert_relative_eq!(*b.xmax(), 1.0);
        assert_relative_eq!(*b.ymin(), 0.0);
        assert_relative_eq!(*b.ymax(), 7.0);
        assert_relative_eq!(*b.zmin(), -2.0);
        assert_relative_eq!(*b.zmax(), 4.0);
        assert!(Aabb::<f64>::from_points(&[]).is_none());
    }

    #[test]
    fn union_of_overlapping_boxes() {
        let u = cube(0.0, 10.0).union(&cube(5.0, 15.0));
        assert_eq!(u, cube(0.0, 15.0));
    }

    #[test]
    fn union_with_contained_box_is_unchanged() {
        let outer = cube(0.0, 10.0);
        assert_eq!(outer.union(&cube(2.0, 3.0)), outer);
        assert_eq!(cube(2.0, 3.0).union(&outer), outer);
    }

    #[test]
    fn touching_boxes_are_not_beyond() {
        let a = cube(0.0, 1.0);
        let b = Aabb::new([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]).unwrap();
        assert!(!a.is_beyond(&b));
        assert!(a.intersects(&b));
        let c = Aabb::new([1.5, 0.0, 0.0], [2.0, 1.0, 1.0]).unwrap();
        assert!(a.is_beyond(&c));
        assert!(c.is_beyond(&a));
    }

    #[test]
    fn intersection_box() {
        let i = cube(0.0, 10.0).intersection(&cube(5.0, 15.0)).unwrap();
        assert_eq!(i, cube(5.0, 10.0));
        assert!(cube(0.0, 1.0).intersection(&cube(2.0, 3.0)).is_none());
    }

    #[test]
    fn containment() {
        let b = cube(0.0, 10.0);
        assert!(b.contains_point(&p(10.0, 0.0, 5.0), EPS));
        assert!(!b.contains_point(&p(10.1, 0.0, 5.0), EPS));
        assert!(b.contains(&cube(0.0, 10.0), EPS));
        assert!(!b.contains(&cube(-1.0, 3.0), EPS));
    }

    #[test]
    fn corners_and_centroid() {
        let b = Aabb::new([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]).unwrap();
        let corners = b.corners();
        assert!(corners[0].equals_eps(&p(0.0, 0.0, 0.0), EPS));
        assert!(corners[1].equals_eps(&p(1.0, 0.0, 0.0), EPS));
        assert!(corners[7].equals_eps(&p(1.0, 2.0, 3.0), EPS));
        assert!(b.centroid().equals_eps(&p(0.5, 1.0, 1.5), EPS));
    }

    #[test]
    fn faces_and_slices() {
        let b = cube(0.0, 2.0);
        let faces = b.faces();
        assert_eq!(faces.len(), 6);
        assert_eq!(faces[1].axis(), Axis::X);
        assert_relative_eq!(*faces[1].at(), 2.0);
        assert!(b.slice(Axis::Z, 3.0).is_none());
        let mid = b.slice(Axis::Z, 1.0).unwrap();
        assert!(mid.contains_point(&p(0.5, 1.5, 1.0), EPS));
    }

    #[test]
    fn plane_crossing() {
        let b = cube(0.0, 1.0);
        let through = Plane::new(p(0.5, 0.5, 0.5), Vector::new(1.0, 1.0, 1.0)).unwrap();
        let touching = Plane::new(p(0.0, 0.0, 1.0), Vector::new(0.0, 0.0, 1.0)).unwrap();
        let away = Plane::new(p(0.0, 0.0, 3.0), Vector::new(0.0, 0.0, 1.0)).unwrap();
        assert!(b.intersects_plane(&through, EPS));
        assert!(b.intersects_plane(&touching, EPS));
        assert!(!b.intersects_plane(&away, EPS));
    }

    #[test]
    fn translate_and_rotate() {
        let mut b = cube(0.0, 1.0);
        b.translate(&Vector::new(1.0, 2.0, 3.0));
        assert_eq!(b, Aabb::new([1.0, 2.0, 3.0], [2.0, 3.0, 4.0]).unwrap());

        let r = cube(0.0, 1.0)
            .rotate(&Line::z_axis(), &Vector::new(0.0, 0.0, 1.0), FRAC_PI_2, Precision::default())
            .unwrap();
        assert_relative_eq!(*r.xmin(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(*r.xmax(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(*r.ymax(), 1.0, epsilon = 1e-12);
    }
}
