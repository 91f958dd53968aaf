use std::cmp::Ordering;

use crate::error::{GeometryError, Result};
use crate::math::{Precision, Scalar};

use super::planar::clip_half;
use super::plane::{side_of_raw, Side};
use super::{Intersection, Line, LineSegment, Planar, Plane, Point, Rectangle, Transform, Triangle, Vector};

/// A convex planar region bounded by a ring of at least three vertices,
/// counter-clockwise about the plane normal.
#[derive(Debug, Clone)]
pub struct ConvexArea<S: Scalar = f64> {
    pl: Plane<S>,
    points: Vec<Point<S>>,
    edges: Vec<LineSegment<S>>,
}

impl<S: Scalar> ConvexArea<S> {
    /// The convex hull of coplanar `points`. Interior points and points in
    /// the middle of a hull edge are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CollinearPoints`] if the points span no
    /// plane and [`GeometryError::NotCoplanar`] if they span more than one.
    pub fn new(points: &[Point<S>], epsilon: f64) -> Result<Self> {
        let pl = Plane::through(points, epsilon).ok_or(GeometryError::CollinearPoints)?;
        if !points.iter().all(|pt| pl.is_on_plane(pt, epsilon)) {
            return Err(GeometryError::NotCoplanar.into());
        }
        let ring = gift_wrap(points, &pl, epsilon)?;
        if ring.len() < 3 {
            return Err(GeometryError::CollinearPoints.into());
        }
        Self::from_ring(pl, ring)
    }

    fn from_ring(pl: Plane<S>, points: Vec<Point<S>>) -> Result<Self> {
        let edges = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| LineSegment::new(a.clone(), b.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pl, points, edges })
    }

    /// The simplest geometry spanned by `points`: nothing, a point, a
    /// segment, a triangle, a rectangle or a convex area.
    #[must_use]
    pub fn geometry_of(points: &[Point<S>], epsilon: f64) -> Option<Intersection<S>> {
        let mut distinct: Vec<Point<S>> = Vec::with_capacity(points.len());
        for pt in points {
            if !distinct.iter().any(|d| d.equals_eps(pt, epsilon)) {
                distinct.push(pt.clone());
            }
        }
        if Point::is_collinear(&distinct, epsilon) {
            return LineSegment::geometry_of_points(&distinct, epsilon);
        }
        let Ok(area) = Self::new(&distinct, epsilon) else {
            return LineSegment::geometry_of_points(&distinct, epsilon);
        };
        Some(match area.points.as_slice() {
            [p, q, r] => match Triangle::new(p.clone(), q.clone(), r.clone()) {
                Ok(t) => Intersection::Triangle(t),
                Err(_) => Intersection::ConvexArea(area),
            },
            [p, q, r, s] if Rectangle::is_rectangle(p, q, r, s, epsilon) => {
                match Rectangle::new(p.clone(), q.clone(), r.clone(), s.clone(), epsilon) {
                    Ok(rect) => Intersection::Rectangle(rect),
                    Err(_) => Intersection::ConvexArea(area),
                }
            }
            _ => Intersection::ConvexArea(area),
        })
    }

    /// True if the ring, taken in order, turns the same way at every vertex.
    /// Straight vertices are allowed.
    #[must_use]
    pub fn is_convex(ring: &[Point<S>], epsilon: f64) -> bool {
        if ring.len() < 3 {
            return false;
        }
        let Some(pl) = Plane::through(ring, epsilon) else {
            return false;
        };
        if !ring.iter().all(|pt| pl.is_on_plane(pt, epsilon)) {
            return false;
        }
        let n = pl.n();
        let len = ring.len();
        let turns: Vec<Side> = (0..len)
            .map(|i| {
                let (a, b, c) = (&ring[i], &ring[(i + 1) % len], &ring[(i + 2) % len]);
                side_of_raw(c, a, &n.cross(&Vector::between(a, b)), epsilon)
            })
            .collect();
        !(turns.contains(&Side::Front) && turns.contains(&Side::Back))
    }

    /// Returns the hull vertices, counter-clockwise about the plane normal.
    #[must_use]
    pub fn points(&self) -> &[Point<S>] {
        &self.points
    }

    /// Returns the supporting plane.
    #[must_use]
    pub fn plane(&self) -> &Plane<S> {
        &self.pl
    }

    /// Returns the hull edges in ring order.
    #[must_use]
    pub fn edges(&self) -> &[LineSegment<S>] {
        &self.edges
    }

    /// Fan triangulation from the first vertex.
    #[must_use]
    pub fn triangles(&self) -> Vec<Triangle<S>> {
        let Some((apex, rest)) = self.points.split_first() else {
            return Vec::new();
        };
        rest.windows(2)
            .filter_map(|w| Triangle::new(apex.clone(), w[0].clone(), w[1].clone()).ok())
            .collect()
    }

    #[must_use]
    pub fn area(&self, precision: Precision) -> S {
        Planar::area(self, precision)
    }

    #[must_use]
    pub fn perimeter(&self, precision: Precision) -> S {
        Planar::perimeter(self, precision)
    }

    /// Vertex average; inside the area since the ring is convex.
    #[must_use]
    pub fn centroid(&self) -> Point<S> {
        Point::centroid(&self.points).unwrap_or_else(|| self.pl.p().clone())
    }

    #[must_use]
    pub fn contains(&self, pt: &Point<S>, epsilon: f64) -> bool {
        self.contains_point(pt, epsilon)
    }

    /// The part of the area on the same side of `plane` as `reference`;
    /// a reference on the plane keeps the whole area.
    #[must_use]
    pub fn clip(&self, plane: &Plane<S>, reference: &Point<S>, epsilon: f64) -> Option<Intersection<S>> {
        let half = match plane.side_of(reference, epsilon) {
            Side::On => return Some(Intersection::ConvexArea(self.clone())),
            Side::Front => plane.clone(),
            Side::Back => plane.flipped(),
        };
        Self::geometry_of(&clip_half(&self.points, &half, epsilon), epsilon)
    }
}

/// Jarvis march about the plane normal, starting from the vertex lowest in
/// the plane basis. Each step takes the candidate no other point lies to the
/// right of, preferring the farthest one among collinear candidates.
fn gift_wrap<S: Scalar>(points: &[Point<S>], pl: &Plane<S>, epsilon: f64) -> Result<Vec<Point<S>>> {
    let (u, w) = pl.basis();
    let key = |pt: &Point<S>| {
        let rel = Vector::between(pl.p(), pt);
        (rel.dot(&u), rel.dot(&w))
    };
    let start = points
        .iter()
        .min_by(|a, b| key(*a).partial_cmp(&key(*b)).unwrap_or(Ordering::Equal))
        .ok_or(GeometryError::CollinearPoints)?
        .clone();
    let n = pl.n();

    let mut ring = Vec::new();
    let mut current = start.clone();
    for _ in 0..=points.len() {
        ring.push(current.clone());
        let mut candidate: Option<&Point<S>> = None;
        for pt in points {
            if pt.equals_eps(&current, epsilon) {
                continue;
            }
            let Some(best) = candidate else {
                candidate = Some(pt);
                continue;
            };
            let left = n.cross(&Vector::between(&current, best));
            match side_of_raw(pt, &current, &left, epsilon) {
                Side::Back => candidate = Some(pt),
                Side::On if current.distance_squared(pt) > current.distance_squared(best) => candidate = Some(pt),
                _ => {}
            }
        }
        let Some(next) = candidate else {
            return Ok(ring);
        };
        if next.equals_eps(&start, epsilon) {
            return Ok(ring);
        }
        current = next.clone();
    }
    Err(GeometryError::Degenerate("convex hull did not close".into()).into())
}

impl<S: Scalar> Planar<S> for ConvexArea<S> {
    fn plane(&self) -> &Plane<S> {
        &self.pl
    }

    fn ring(&self) -> &[Point<S>] {
        &self.points
    }

    fn edges(&self) -> &[LineSegment<S>] {
        &self.edges
    }
}

impl<S: Scalar> Transform<S> for ConvexArea<S> {
    fn translate(&mut self, v: &Vector<S>) {
        self.pl.translate(v);
        for pt in &mut self.points {
            pt.translate(v);
        }
        for e in &mut self.edges {
            e.translate(v);
        }
    }

    fn rotate(&self, axis: &Line<S>, uv: &Vector<S>, theta: f64, precision: Precision) -> Result<Self> {
        let pl = self.pl.rotate(axis, uv, theta, precision)?;
        let points = self
            .points
            .iter()
            .map(|pt| pt.rotate(axis, uv, theta, precision))
            .collect::<Result<Vec<_>>>()?;
        Self::from_ring(pl, points)
    }
}
