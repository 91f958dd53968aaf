pub mod aabb;
pub mod convex_area;
pub mod line;
pub mod planar;
pub mod plane;
pub mod point;
pub mod polygon;
pub mod ray;
pub mod rectangle;
pub mod segment;
pub mod triangle;
pub mod vector;

pub use aabb::{Aabb, AabbSlice, Axis};
pub use convex_area::ConvexArea;
pub use line::Line;
pub use planar::Planar;
pub use plane::{Plane, PlaneEquation, Side};
pub use point::Point;
pub use polygon::{HoleId, Polygon, PolygonNoInternalHoles};
pub use ray::Ray;
pub use rectangle::Rectangle;
pub use segment::LineSegment;
pub use triangle::Triangle;
pub use vector::Vector;

use crate::error::Result;
use crate::math::{Precision, Scalar};

/// Result of an intersection query.
///
/// Queries return `Option<Intersection<S>>`; `None` means the operands are
/// disjoint.
#[derive(Debug, Clone)]
pub enum Intersection<S: Scalar = f64> {
    Point(Point<S>),
    Line(Line<S>),
    Ray(Ray<S>),
    Segment(LineSegment<S>),
    Plane(Plane<S>),
    Triangle(Triangle<S>),
    Rectangle(Rectangle<S>),
    ConvexArea(ConvexArea<S>),
}

impl<S: Scalar> Intersection<S> {
    #[must_use]
    pub fn as_point(&self) -> Option<&Point<S>> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_segment(&self) -> Option<&LineSegment<S>> {
        match self {
            Self::Segment(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&Line<S>> {
        match self {
            Self::Line(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_plane(&self) -> Option<&Plane<S>> {
        match self {
            Self::Plane(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }

    #[must_use]
    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Segment(_))
    }

    /// Corner points of bounded results (empty for lines, rays and planes).
    #[must_use]
    pub fn points(&self) -> Vec<Point<S>> {
        match self {
            Self::Point(p) => vec![p.clone()],
            Self::Segment(s) => vec![s.p().clone(), s.q()],
            Self::Triangle(t) => t.points().to_vec(),
            Self::Rectangle(r) => r.points().to_vec(),
            Self::ConvexArea(c) => c.points().to_vec(),
            Self::Line(_) | Self::Ray(_) | Self::Plane(_) => Vec::new(),
        }
    }

    /// Geometric equality: same kind, same point set in any order.
    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => a.equals_eps(b, epsilon),
            (Self::Ray(a), Self::Ray(b)) => a.equals_eps(b, epsilon),
            (Self::Plane(a), Self::Plane(b)) => a.equals_eps(b, epsilon),
            (Self::Point(_), Self::Point(_))
            | (Self::Segment(_), Self::Segment(_))
            | (Self::Triangle(_), Self::Triangle(_))
            | (Self::Rectangle(_), Self::Rectangle(_))
            | (Self::ConvexArea(_), Self::ConvexArea(_)) => {
                let (a, b) = (self.points(), other.points());
                a.len() == b.len()
                    && a.iter().all(|p| b.iter().any(|q| p.equals_eps(q, epsilon)))
                    && b.iter().all(|q| a.iter().any(|p| p.equals_eps(q, epsilon)))
            }
            _ => false,
        }
    }
}

impl<S: Scalar> Transform<S> for Intersection<S> {
    fn translate(&mut self, v: &Vector<S>) {
        match self {
            Self::Point(g) => g.translate(v),
            Self::Line(g) => g.translate(v),
            Self::Ray(g) => g.translate(v),
            Self::Segment(g) => g.translate(v),
            Self::Plane(g) => g.translate(v),
            Self::Triangle(g) => g.translate(v),
            Self::Rectangle(g) => g.translate(v),
            Self::ConvexArea(g) => g.translate(v),
        }
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        Ok(match self {
            Self::Point(g) => Self::Point(g.rotate(axis, uv, theta, precision)?),
            Self::Line(g) => Self::Line(g.rotate(axis, uv, theta, precision)?),
            Self::Ray(g) => Self::Ray(g.rotate(axis, uv, theta, precision)?),
            Self::Segment(g) => Self::Segment(g.rotate(axis, uv, theta, precision)?),
            Self::Plane(g) => Self::Plane(g.rotate(axis, uv, theta, precision)?),
            Self::Triangle(g) => Self::Triangle(g.rotate(axis, uv, theta, precision)?),
            Self::Rectangle(g) => Self::Rectangle(g.rotate(axis, uv, theta, precision)?),
            Self::ConvexArea(g) => Self::ConvexArea(g.rotate(axis, uv, theta, precision)?),
        })
    }
}

/// Intersection of `Self` with `Rhs` under a tolerance.
pub trait Intersect<S: Scalar, Rhs: ?Sized> {
    /// The shared geometry, or `None` if the operands are disjoint.
    fn intersection(&self, other: &Rhs, epsilon: f64) -> Option<Intersection<S>>;

    fn intersects(&self, other: &Rhs, epsilon: f64) -> bool {
        self.intersection(other, epsilon).is_some()
    }
}

/// Minimum distance between `Self` and `Rhs`.
pub trait Distance<S: Scalar, Rhs: ?Sized> {
    fn distance_squared(&self, other: &Rhs, epsilon: f64) -> S;

    fn distance(&self, other: &Rhs, epsilon: f64, precision: Precision) -> S {
        self.distance_squared(other, epsilon).sqrt(precision)
    }
}

/// Rigid motions.
///
/// `translate` updates in place and recomputes any derived geometry
/// (plane equations, bounding planes); `rotate` returns a new value.
pub trait Transform<S: Scalar>: Sized {
    fn translate(&mut self, v: &Vector<S>);

    /// Rotates by `theta` radians about `axis`, whose unit direction is `uv`.
    ///
    /// # Errors
    ///
    /// Returns an error if `uv` is zero or the rotated shape degenerates
    /// after rounding.
    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self>;
}

/// Shapes with a finite axis-aligned envelope.
pub trait Bounded<S: Scalar> {
    fn envelope(&self) -> Aabb<S>;
}

/// Point membership as an intersection query, in both argument orders.
macro_rules! point_membership {
    ($($ty:ident => $test:ident),* $(,)?) => {$(
        impl<S: Scalar> Intersect<S, Point<S>> for $ty<S> {
            fn intersection(&self, pt: &Point<S>, epsilon: f64) -> Option<Intersection<S>> {
                self.$test(pt, epsilon).then(|| Intersection::Point(pt.clone()))
            }
        }

        impl<S: Scalar> Intersect<S, $ty<S>> for Point<S> {
            fn intersection(&self, other: &$ty<S>, epsilon: f64) -> Option<Intersection<S>> {
                other.intersection(self, epsilon)
            }
        }
    )*};
}

point_membership!(
    Line => contains,
    Ray => contains,
    LineSegment => contains,
    Plane => is_on_plane,
    Triangle => contains,
    Rectangle => contains,
    ConvexArea => contains,
);
