use slotmap::SlotMap;
use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{Aabb, Bounded, Intersect, Intersection, Line, LineSegment, Point, Transform, Triangle, Vector};
use crate::math::{Precision, Scalar};

use super::{runs_inside, HoleId, PolygonNoInternalHoles};

/// A polygon with internal holes: an exterior ring and any number of hole
/// rings strictly inside it, pairwise disjoint.
#[derive(Debug, Clone)]
pub struct Polygon<S: Scalar = f64> {
    exterior: PolygonNoInternalHoles<S>,
    holes: SlotMap<HoleId, PolygonNoInternalHoles<S>>,
}

impl<S: Scalar> Polygon<S> {
    #[must_use]
    pub fn new(exterior: PolygonNoInternalHoles<S>) -> Self {
        Self {
            exterior,
            holes: SlotMap::with_key(),
        }
    }

    /// Builds the exterior from `ring` and adds each of `holes` in turn.
    ///
    /// # Errors
    ///
    /// Fails if any ring is degenerate or a hole breaks the containment
    /// rules of [`Polygon::add_hole`].
    pub fn from_rings(ring: Vec<Point<S>>, holes: Vec<Vec<Point<S>>>, epsilon: f64) -> Result<Self> {
        let mut polygon = Self::new(PolygonNoInternalHoles::new(ring, epsilon)?);
        for hole in holes {
            polygon.add_hole(hole, epsilon)?;
        }
        Ok(polygon)
    }

    /// Adds an internal hole.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotCoplanar`] if the hole is off the
    /// exterior plane, and [`OperationError::InvalidInput`] if it is not
    /// strictly inside the exterior or meets another hole.
    pub fn add_hole(&mut self, ring: Vec<Point<S>>, epsilon: f64) -> Result<HoleId> {
        let hole = PolygonNoInternalHoles::new(ring, epsilon)?;
        let plane = self.exterior.plane();
        if !hole.points().iter().all(|pt| plane.is_on_plane(pt, epsilon)) {
            return Err(GeometryError::NotCoplanar.into());
        }
        let strictly_inside = hole
            .points()
            .iter()
            .all(|pt| self.exterior.contains(pt, epsilon) && !self.exterior.is_on_boundary(pt, epsilon))
            && !edges_meet(hole.edges(), self.exterior.edges(), epsilon);
        if !strictly_inside {
            return Err(OperationError::InvalidInput("hole is not strictly inside the exterior".into()).into());
        }
        let overlaps = self.holes.values().any(|other| {
            edges_meet(hole.edges(), other.edges(), epsilon)
                || hole.points().iter().any(|pt| other.contains(pt, epsilon))
                || other.points().iter().any(|pt| hole.contains(pt, epsilon))
        });
        if overlaps {
            return Err(OperationError::InvalidInput("holes overlap".into()).into());
        }
        let id = self.holes.insert(hole);
        debug!(holes = self.holes.len(), "added internal hole");
        Ok(id)
    }

    pub fn remove_hole(&mut self, id: HoleId) -> Option<PolygonNoInternalHoles<S>> {
        self.holes.remove(id)
    }

    /// Returns the outer boundary.
    #[must_use]
    pub fn exterior(&self) -> &PolygonNoInternalHoles<S> {
        &self.exterior
    }

    pub fn holes(&self) -> impl Iterator<Item = (HoleId, &PolygonNoInternalHoles<S>)> {
        self.holes.iter()
    }

    /// Returns the internal hole with `id`, if present.
    #[must_use]
    pub fn hole(&self, id: HoleId) -> Option<&PolygonNoInternalHoles<S>> {
        self.holes.get(id)
    }

    fn boundary(&self) -> impl Iterator<Item = &LineSegment<S>> {
        self.exterior
            .edges()
            .iter()
            .chain(self.holes.values().flat_map(|h| h.edges().iter()))
    }

    #[must_use]
    pub fn is_on_boundary(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.boundary().any(|e| e.contains(pt, epsilon))
    }

    /// Inside the exterior and not strictly inside any hole.
    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.exterior.contains(pt, epsilon)
            && !self
                .holes
                .values()
                .any(|h| h.contains(pt, epsilon) && !h.is_on_boundary(pt, epsilon))
    }

    /// A segment off the plane must pierce it inside; a coplanar one must
    /// cross some boundary ring or lie wholly inside.
    #[must_use]
    pub fn intersects_segment(&self, segment: &LineSegment<S>, epsilon: f64) -> bool {
        let plane = self.exterior.plane();
        if !(plane.is_on_plane(segment.p(), epsilon) && plane.is_on_plane(&segment.q(), epsilon)) {
            return match plane.intersection(segment, epsilon) {
                Some(Intersection::Point(x)) => self.contains(&x, epsilon),
                _ => false,
            };
        }
        self.boundary().any(|e| e.intersects(segment, epsilon)) || self.contains(segment.p(), epsilon)
    }

    #[must_use]
    pub fn contains_segment(&self, segment: &LineSegment<S>, epsilon: f64) -> bool {
        runs_inside(segment, self.boundary(), |pt| self.contains(pt, epsilon), epsilon)
    }

    #[must_use]
    pub fn intersects_triangle(&self, triangle: &Triangle<S>, epsilon: f64) -> bool {
        self.boundary().any(|e| triangle.intersects(e, epsilon))
            || triangle.edges().iter().any(|e| self.intersects_segment(e, epsilon))
    }

    /// The edges must stay inside and no hole may sit within the triangle.
    #[must_use]
    pub fn contains_triangle(&self, triangle: &Triangle<S>, epsilon: f64) -> bool {
        triangle.edges().iter().all(|e| self.contains_segment(e, epsilon))
            && !self
                .holes
                .values()
                .any(|h| h.points().iter().all(|pt| triangle.contains(pt, epsilon)))
    }

    /// True if the polygons share any point: an edge of one meets the other.
    #[must_use]
    pub fn intersects_polygon(&self, other: &Self, epsilon: f64) -> bool {
        self.boundary().any(|e| other.intersects_segment(e, epsilon))
            || other.boundary().any(|e| self.intersects_segment(e, epsilon))
    }

    /// Shared geometry of two polygons.
    ///
    /// # Errors
    ///
    /// Always returns [`OperationError::Unsupported`]; use
    /// [`Polygon::intersects_polygon`] for the predicate.
    pub fn intersection(&self, _other: &Self, _epsilon: f64) -> Result<Option<Intersection<S>>> {
        Err(OperationError::Unsupported("polygon intersection geometry").into())
    }

    /// Exterior area minus the internal holes.
    #[must_use]
    pub fn area(&self, precision: Precision) -> S {
        self.holes
            .values()
            .fold(self.exterior.area(precision), |acc, h| acc - h.area(precision))
    }

    /// Exterior and hole rings together.
    #[must_use]
    pub fn perimeter(&self, precision: Precision) -> S {
        self.holes
            .values()
            .fold(self.exterior.perimeter(precision), |acc, h| acc + h.perimeter(precision))
    }
}

fn edges_meet<S: Scalar>(a: &[LineSegment<S>], b: &[LineSegment<S>], epsilon: f64) -> bool {
    a.iter().any(|x| b.iter().any(|y| x.intersects(y, epsilon)))
}

impl<S: Scalar> Bounded<S> for Polygon<S> {
    fn envelope(&self) -> Aabb<S> {
        self.exterior.envelope()
    }
}

impl<S: Scalar> Transform<S> for Polygon<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.exterior.translate(v);
        for h in self.holes.values_mut() {
            h.translate(v);
        }
    }

    /// Hole ids are not preserved.
    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let mut rotated = Self::new(self.exterior.rotate(axis, uv, theta, precision)?);
        for h in self.holes.values() {
            rotated.holes.insert(h.rotate(axis, uv, theta, precision)?);
        }
        Ok(rotated)
    }
}
