use tracing::trace;

use crate::geometry::{Bounded, Intersect, Intersection, Line, Plane, Point, Vector};
use crate::math::Scalar;

use super::LineSegment;

impl<S: Scalar> LineSegment<S> {
    /// Overlap of two segments on the same line.
    ///
    /// Decided from four membership tests: whether each endpoint of one
    /// segment falls inside the other's interval. The result is nothing, a
    /// shared endpoint, or the overlapping sub-segment.
    fn collinear_overlap(&self, other: &Self, epsilon: f64) -> Option<Intersection<S>> {
        let (p, q) = (self.p().clone(), self.q());
        let (op, oq) = (other.p().clone(), other.q());
        let ap = other.is_between(&p, epsilon);
        let aq = other.is_between(&q, epsilon);
        let bp = self.is_between(&op, epsilon);
        let bq = self.is_between(&oq, epsilon);
        trace!(ap, aq, bp, bq, "collinear segment overlap");

        match (ap, aq, bp, bq) {
            (false, false, false, false) => None,
            (true, true, _, _) => {
                trace!("contained in other");
                Some(Intersection::Segment(self.clone()))
            }
            (_, _, true, true) => {
                trace!("contains other");
                Some(Intersection::Segment(other.clone()))
            }
            // One end of each lies in the other: the overlap runs between
            // those two ends, or is the single point they share.
            (true, false, true, false) => Some(Self::geometry(p, op, epsilon)),
            (true, false, false, true) => Some(Self::geometry(p, oq, epsilon)),
            (false, true, true, false) => Some(Self::geometry(q, op, epsilon)),
            (false, true, false, true) => Some(Self::geometry(q, oq, epsilon)),
            // A lone membership only happens at a shared endpoint within
            // tolerance.
            _ => {
                let lone = if ap {
                    p
                } else if aq {
                    q
                } else if bp {
                    op
                } else {
                    oq
                };
                trace!("touching at one endpoint");
                Some(Intersection::Point(lone))
            }
        }
    }

    /// The shortest segment from this segment to `other`, `None` when the
    /// closest points coincide (the segments intersect).
    ///
    /// Starts from the closest points of the two supporting lines and
    /// substitutes endpoints while a parameter falls outside `[0, 1]`.
    #[must_use]
    pub fn line_of_intersection(&self, other: &Self, epsilon: f64) -> Option<Self> {
        let zero = S::zero();
        let one = S::one();
        let clamp = |x: S| S::max_of(zero.clone(), S::min_of(one.clone(), x));

        let d1 = self.v();
        let d2 = other.v();
        let r = Vector::between(other.p(), self.p());
        let a = d1.magnitude_squared();
        let e = d2.magnitude_squared();
        let f = d2.dot(&r);
        let c = d1.dot(&r);
        let b = d1.dot(d2);
        let denom = a.clone() * e.clone() - b.clone() * b.clone();

        let mut s = if denom.is_zero() {
            S::zero()
        } else {
            clamp((b.clone() * f.clone() - c.clone() * e.clone()) / denom)
        };
        let mut t = (b.clone() * s.clone() + f) / e;
        if t < zero {
            t = S::zero();
            s = clamp(-c / a);
        } else if t > one {
            t = S::one();
            s = clamp((b - c) / a);
        }

        let near = self.line().point_at(&s);
        let far = other.line().point_at(&t);
        if near.equals_eps(&far, epsilon) {
            return None;
        }
        Self::new(near, far).ok()
    }
}

impl<S: Scalar> Intersect<S, LineSegment<S>> for LineSegment<S> {
    /// Envelope rejection first, then the supporting lines: a crossing point
    /// must lie inside both intervals, and coincident lines fall through to
    /// the collinear overlap procedure.
    fn intersection(&self, other: &LineSegment<S>, epsilon: f64) -> Option<Intersection<S>> {
        let tol = S::tolerance(epsilon);
        if self.envelope().inflate(&tol).is_beyond(&other.envelope()) {
            return None;
        }
        match self.line().intersection(other.line(), epsilon)? {
            Intersection::Point(pt) => (self.is_between(&pt, epsilon) && other.is_between(&pt, epsilon))
                .then_some(Intersection::Point(pt)),
            Intersection::Line(_) => self.collinear_overlap(other, epsilon),
            _ => None,
        }
    }
}

impl<S: Scalar> Intersect<S, Line<S>> for LineSegment<S> {
    fn intersection(&self, line: &Line<S>, epsilon: f64) -> Option<Intersection<S>> {
        match self.line().intersection(line, epsilon)? {
            Intersection::Point(pt) => self.is_between(&pt, epsilon).then_some(Intersection::Point(pt)),
            Intersection::Line(_) => Some(Intersection::Segment(self.clone())),
            _ => None,
        }
    }
}

impl<S: Scalar> Intersect<S, LineSegment<S>> for Line<S> {
    fn intersection(&self, segment: &LineSegment<S>, epsilon: f64) -> Option<Intersection<S>> {
        segment.intersection(self, epsilon)
    }
}

impl<S: Scalar> Intersect<S, Plane<S>> for LineSegment<S> {
    /// Skips the plane/line solve when both endpoints are strictly on one
    /// side.
    fn intersection(&self, plane: &Plane<S>, epsilon: f64) -> Option<Intersection<S>> {
        let ends: [Point<S>; 2] = [self.p().clone(), self.q()];
        if plane.all_on_same_side_not_on(&ends, epsilon) {
            return None;
        }
        match plane.intersection(self.line(), epsilon)? {
            Intersection::Point(pt) => self.is_between(&pt, epsilon).then_some(Intersection::Point(pt)),
            Intersection::Line(_) => Some(Intersection::Segment(self.clone())),
            _ => None,
        }
    }
}

impl<S: Scalar> Intersect<S, LineSegment<S>> for Plane<S> {
    fn intersection(&self, segment: &LineSegment<S>, epsilon: f64) -> Option<Intersection<S>> {
        segment.intersection(self, epsilon)
    }
}
