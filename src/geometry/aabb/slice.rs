use crate::error::{GeometryError, Result};
use crate::geometry::{Plane, Point, Rectangle, Vector};
use crate::math::Scalar;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Indices of the two remaining axes, in cyclic order (`X -> (Y, Z)`,
    /// `Y -> (Z, X)`, `Z -> (X, Y)`).
    #[must_use]
    pub fn others(self) -> (usize, usize) {
        match self {
            Self::X => (1, 2),
            Self::Y => (2, 0),
            Self::Z => (0, 1),
        }
    }

    #[must_use]
    pub fn unit<S: Scalar>(self) -> Vector<S> {
        let mut c = [S::zero(), S::zero(), S::zero()];
        c[self.index()] = S::one();
        Vector::from_array(c)
    }
}

/// A flat axis-aligned rectangle: the coordinate along `axis` is fixed at
/// `at`, and the two remaining coordinates (in [`Axis::others`] order) span
/// `min..=max`.
#[derive(Debug, Clone, PartialEq)]
pub struct AabbSlice<S: Scalar = f64> {
    axis: Axis,
    at: S,
    min: [S; 2],
    max: [S; 2],
}

impl<S: Scalar> AabbSlice<S> {
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if `min` exceeds `max`.
    pub fn new(axis: Axis, at: S, min: [S; 2], max: [S; 2]) -> Result<Self> {
        if min[0] > max[0] || min[1] > max[1] {
            return Err(GeometryError::Degenerate("slice minimum exceeds maximum".into()).into());
        }
        Ok(Self { axis, at, min, max })
    }

    /// The smallest slice at `at` covering the projections of `points`.
    #[must_use]
    pub fn from_points(axis: Axis, at: S, points: &[Point<S>]) -> Option<Self> {
        let (u, v) = axis.others();
        let (first, rest) = points.split_first()?;
        let c = first.vector().to_array();
        let mut min = [c[u].clone(), c[v].clone()];
        let mut max = min.clone();
        for pt in rest {
            let c = pt.vector().to_array();
            for (k, i) in [u, v].into_iter().enumerate() {
                if c[i] < min[k] {
                    min[k] = c[i].clone();
                }
                if c[i] > max[k] {
                    max[k] = c[i].clone();
                }
            }
        }
        Some(Self { axis, at, min, max })
    }

    /// Returns the axis the slice is perpendicular to.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Returns the fixed coordinate along the axis.
    #[must_use]
    pub fn at(&self) -> &S {
        &self.at
    }

    /// Extremes of the first in-plane coordinate.
    #[must_use]
    pub fn u_range(&self) -> (&S, &S) {
        (&self.min[0], &self.max[0])
    }

    /// Extremes of the second in-plane coordinate.
    #[must_use]
    pub fn v_range(&self) -> (&S, &S) {
        (&self.min[1], &self.max[1])
    }

    fn point(&self, u: S, v: S) -> Point<S> {
        let (iu, iv) = self.axis.others();
        let mut c = [S::zero(), S::zero(), S::zero()];
        c[self.axis.index()] = self.at.clone();
        c[iu] = u;
        c[iv] = v;
        Point::from_vector(Vector::from_array(c))
    }

    /// Corners in counter-clockwise order about the positive axis.
    #[must_use]
    pub fn corners(&self) -> [Point<S>; 4] {
        let [u0, v0] = self.min.clone();
        let [u1, v1] = self.max.clone();
        [
            self.point(u0.clone(), v0.clone()),
            self.point(u1.clone(), v0),
            self.point(u1, v1.clone()),
            self.point(u0, v1),
        ]
    }

    /// The plane of the slice, normal along the positive axis.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the normal is a unit axis.
    pub fn plane(&self) -> Result<Plane<S>> {
        let [u0, v0] = self.min.clone();
        Plane::new(self.point(u0, v0), self.axis.unit())
    }

    /// The slice as a rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CollinearPoints`] or
    /// [`GeometryError::CoincidentPoints`] when the slice is flat in one of
    /// its in-plane directions.
    pub fn to_rectangle(&self) -> Result<Rectangle<S>> {
        let [p, q, r, s] = self.corners();
        Rectangle::new(p, q, r, s, 0.0)
    }

    /// Hull of both slices; `None` if they lie on different axes or at
    /// different coordinates.
    #[must_use]
    pub fn union(&self, other: &Self) -> Option<Self> {
        if self.axis != other.axis || self.at != other.at {
            return None;
        }
        if self.contains(other, 0.0) {
            return Some(self.clone());
        }
        if other.contains(self, 0.0) {
            return Some(other.clone());
        }
        Some(Self {
            axis: self.axis,
            at: self.at.clone(),
            min: std::array::from_fn(|k| S::min_of(self.min[k].clone(), other.min[k].clone())),
            max: std::array::from_fn(|k| S::max_of(self.max[k].clone(), other.max[k].clone())),
        })
    }

    #[must_use]
    pub fn contains_point(&self, pt: &Point<S>, epsilon: f64) -> bool {
        let c = pt.vector().to_array();
        if !c[self.axis.index()].eq_eps(&self.at, epsilon) {
            return false;
        }
        let tol = S::tolerance(epsilon);
        let (u, v) = self.axis.others();
        [u, v].into_iter().enumerate().all(|(k, i)| {
            c[i] >= self.min[k].clone() - tol.clone() && c[i] <= self.max[k].clone() + tol.clone()
        })
    }

    #[must_use]
    pub fn contains(&self, other: &Self, epsilon: f64) -> bool {
        if self.axis != other.axis || !self.at.eq_eps(&other.at, epsilon) {
            return false;
        }
        let tol = S::tolerance(epsilon);
        (0..2).all(|k| {
            other.min[k] >= self.min[k].clone() - tol.clone() && other.max[k] <= self.max[k].clone() + tol.clone()
        })
    }

    /// True if the slices cannot meet: different axis positions, or
    /// disjoint on one in-plane coordinate. Touching is not beyond.
    ///
    /// Slices on different axes are compared through their corners' boxes.
    #[must_use]
    pub fn is_beyond(&self, other: &Self) -> bool {
        if self.axis != other.axis {
            let a = super::Aabb::from_points(&self.corners());
            let b = super::Aabb::from_points(&other.corners());
            return match (a, b) {
                (Some(a), Some(b)) => a.is_beyond(&b),
                _ => true,
            };
        }
        self.at != other.at || (0..2).any(|k| self.max[k] < other.min[k] || other.max[k] < self.min[k])
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_beyond(other)
    }

    /// The overlapping slice, `None` if the slices are beyond each other or
    /// on different axes.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if self.axis != other.axis || self.is_beyond(other) {
            return None;
        }
        Some(Self {
            axis: self.axis,
            at: self.at.clone(),
            min: std::array::from_fn(|k| S::max_of(self.min[k].clone(), other.min[k].clone())),
            max: std::array::from_fn(|k| S::min_of(self.max[k].clone(), other.max[k].clone())),
        })
    }
}
