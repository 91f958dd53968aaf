mod intersect;

use crate::error::Result;
use crate::math::{Precision, Scalar};

use super::{Aabb, Bounded, Distance, Intersect, Intersection, Line, Plane, Point, Side, Transform, Vector};

/// A finite segment from `p` to `q`.
///
/// Stored as the supporting line (`p` plus the direction `q - p`) and the two
/// bounding planes perpendicular to it at each endpoint. A point lies in the
/// closed interval when it is not outside either bounding plane.
#[derive(Debug, Clone)]
pub struct LineSegment<S: Scalar = f64> {
    l: Line<S>,
    ppl: Plane<S>,
    qpl: Plane<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::CoincidentPoints`] if `p == q`.
    pub fn new(p: Point<S>, q: Point<S>) -> Result<Self> {
        Self::from_line(Line::from_points(p, q)?)
    }

    /// The segment from `l.p()` to `l.q()`.
    fn from_line(l: Line<S>) -> Result<Self> {
        let ppl = Plane::new(l.p().clone(), l.v().clone())?;
        let qpl = Plane::new(l.q(), l.v().clone())?;
        Ok(Self { l, ppl, qpl })
    }

    /// A segment from `p` to `q`, or the single point when they coincide
    /// within `epsilon`.
    #[must_use]
    pub fn geometry(p: Point<S>, q: Point<S>, epsilon: f64) -> Intersection<S> {
        if p.equals_eps(&q, epsilon) {
            return Intersection::Point(p);
        }
        match Self::new(p.clone(), q) {
            Ok(s) => Intersection::Segment(s),
            Err(_) => Intersection::Point(p),
        }
    }

    /// The shortest segment covering collinear `points`, collapsing to a
    /// point when they all coincide. `None` for an empty slice.
    #[must_use]
    pub fn geometry_of_points(points: &[Point<S>], epsilon: f64) -> Option<Intersection<S>> {
        let first = points.first()?;
        let farthest = |from: &Point<S>| {
            points
                .iter()
                .fold(from, |best, p| {
                    if from.distance_squared(p) > from.distance_squared(best) {
                        p
                    } else {
                        best
                    }
                })
                .clone()
        };
        let a = farthest(first);
        let b = farthest(&a);
        Some(Self::geometry(a, b, epsilon))
    }

    /// Returns the supporting line, anchored at `p` with direction `q - p`.
    #[must_use]
    pub fn line(&self) -> &Line<S> {
        &self.l
    }

    /// Returns the start point.
    #[must_use]
    pub fn p(&self) -> &Point<S> {
        self.l.p()
    }

    /// Returns the end point.
    #[must_use]
    pub fn q(&self) -> Point<S> {
        self.l.q()
    }

    /// `q - p`.
    #[must_use]
    pub fn v(&self) -> &Vector<S> {
        self.l.v()
    }

    /// Bounding plane at `p`, normal `q - p`.
    #[must_use]
    pub fn ppl(&self) -> &Plane<S> {
        &self.ppl
    }

    /// Bounding plane at `q`, normal `q - p`.
    #[must_use]
    pub fn qpl(&self) -> &Plane<S> {
        &self.qpl
    }

    /// Returns the squared length.
    #[must_use]
    pub fn length_squared(&self) -> S {
        self.l.v().magnitude_squared()
    }

    #[must_use]
    pub fn length(&self, precision: Precision) -> S {
        self.l.v().magnitude(precision)
    }

    /// Returns the midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Point<S> {
        self.p().displaced(&self.l.v().scale(&S::half()))
    }

    /// The same segment traversed from `q` to `p`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            l: Line::from_points(self.q(), self.p().clone()).unwrap_or_else(|_| self.l.clone()),
            ppl: self.qpl.flipped(),
            qpl: self.ppl.flipped(),
        }
    }

    /// True if `pt` lies between the two bounding planes: on the same side of
    /// `ppl` as `q` and on the same side of `qpl` as `p`.
    ///
    /// Says nothing about the distance from the supporting line.
    #[must_use]
    pub fn is_between(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.ppl.is_on_same_side(pt, &self.q(), epsilon) && self.qpl.is_on_same_side(pt, self.p(), epsilon)
    }

    /// True if the projection of `pt` onto the supporting line falls in the
    /// closed interval.
    #[must_use]
    pub fn is_aligned(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.is_between(&self.l.point_of_projection(pt), epsilon)
    }

    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.l.contains(pt, epsilon) && self.is_between(pt, epsilon)
    }

    #[must_use]
    pub fn is_parallel(&self, other: &Self, epsilon: f64) -> bool {
        self.l.is_parallel(&other.l, epsilon)
    }

    /// Same endpoints in either order.
    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        let (p, q) = (self.p(), self.q());
        let (op, oq) = (other.p(), other.q());
        (p.equals_eps(op, epsilon) && q.equals_eps(&oq, epsilon))
            || (p.equals_eps(&oq, epsilon) && q.equals_eps(op, epsilon))
    }

    /// The part of the segment on the same side of `plane` as `reference`.
    ///
    /// Endpoints on the plane count as kept. A reference on the plane keeps
    /// the whole segment. Returns a point when only a single endpoint touches
    /// the kept side.
    #[must_use]
    pub fn clip(&self, plane: &Plane<S>, reference: &Point<S>, epsilon: f64) -> Option<Intersection<S>> {
        let keep = plane.side_of(reference, epsilon);
        if keep == Side::On {
            return Some(Intersection::Segment(self.clone()));
        }
        let kept = |pt: &Point<S>| {
            let side = plane.side_of(pt, epsilon);
            side == keep || side == Side::On
        };
        let (p, q) = (self.p().clone(), self.q());
        match (kept(&p), kept(&q)) {
            (true, true) => Some(Intersection::Segment(self.clone())),
            (false, false) => None,
            (p_kept, _) => {
                let cut = match plane.intersection(&self.l, epsilon) {
                    Some(Intersection::Point(x)) => x,
                    _ => return Some(Intersection::Point(if p_kept { p } else { q })),
                };
                Some(if p_kept {
                    Self::geometry(p, cut, epsilon)
                } else {
                    Self::geometry(cut, q, epsilon)
                })
            }
        }
    }

    /// The minimal segment covering both collinear segments, `None` if they
    /// are not collinear or do not touch.
    #[must_use]
    pub fn union_collinear(&self, other: &Self, epsilon: f64) -> Option<Intersection<S>> {
        if !(self.l.contains(other.p(), epsilon) && self.l.contains(&other.q(), epsilon)) {
            return None;
        }
        if !self.intersects(other, epsilon) {
            return None;
        }
        Self::geometry_of_points(&[self.p().clone(), self.q(), other.p().clone(), other.q()], epsilon)
    }
}

impl<S: Scalar> Distance<S, Point<S>> for LineSegment<S> {
    /// Distance to the foot of the perpendicular when it falls inside the
    /// interval, otherwise to the nearer endpoint.
    fn distance_squared(&self, pt: &Point<S>, epsilon: f64) -> S {
        if self.is_aligned(pt, epsilon) {
            return self.l.distance_squared(pt, epsilon);
        }
        S::min_of(self.p().distance_squared(pt), self.q().distance_squared(pt))
    }
}

impl<S: Scalar> Distance<S, LineSegment<S>> for LineSegment<S> {
    fn distance_squared(&self, other: &LineSegment<S>, epsilon: f64) -> S {
        if self.intersects(other, epsilon) {
            return S::zero();
        }
        if self.is_parallel(other, epsilon) {
            return [
                self.distance_squared(other.p(), epsilon),
                self.distance_squared(&other.q(), epsilon),
                other.distance_squared(self.p(), epsilon),
                other.distance_squared(&self.q(), epsilon),
            ]
            .into_iter()
            .reduce(S::min_of)
            .unwrap_or_else(S::zero);
        }
        self.line_of_intersection(other, epsilon)
            .map_or_else(S::zero, |connector| connector.length_squared())
    }
}

impl<S: Scalar> Bounded<S> for LineSegment<S> {
    fn envelope(&self) -> Aabb<S> {
        let mut envelope = Aabb::from_point(self.p());
        envelope.expand(&self.q());
        envelope
    }
}

impl<S: Scalar> Transform<S> for LineSegment<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.l.translate(v);
        self.ppl.translate(v);
        self.qpl.translate(v);
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let p = self.p().rotate(axis, uv, theta, precision)?;
        let q = self.q().rotate(axis, uv, theta, precision)?;
        Self::new(p, q)
    }
}
