use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{Intersection, Plane, Point, Rectangle, Vector};
use crate::math::Scalar;

use super::Aabb;

impl<S: Scalar> Aabb<S> {
    /// The rectangle on the view plane that just frames the box as seen from
    /// `eye`, with its sides aligned to `up`.
    ///
    /// The view plane faces the eye through the corner nearest to it. Every
    /// corner is projected onto it along its sight line; the supporting
    /// planes through the eye and the extreme projections (left, right,
    /// bottom, top) cut the view plane in the four sides of the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the eye is inside the
    /// box, at its centroid, or if `up` is parallel to the view direction.
    pub fn viewport(&self, eye: &Point<S>, up: &Vector<S>, epsilon: f64) -> Result<Rectangle<S>> {
        if self.contains_point(eye, epsilon) {
            return Err(OperationError::InvalidInput("eye is inside the box".into()).into());
        }
        let d = Vector::between(eye, &self.centroid());
        let right = d.cross(up);
        if right.is_zero() {
            return Err(OperationError::InvalidInput("up is parallel to the view direction".into()).into());
        }
        let up = right.cross(&d);

        let corners = self.corners();
        let near = corners
            .iter()
            .fold(&corners[0], |best, c| {
                if eye.distance_squared(c) < eye.distance_squared(best) {
                    c
                } else {
                    best
                }
            })
            .clone();
        let view = Plane::new(near.clone(), d.clone())?;
        let reach = Vector::between(eye, &near).dot(&d);

        let mut projected = Vec::with_capacity(corners.len());
        for c in &corners {
            let sight = Vector::between(eye, c);
            let along = sight.dot(&d);
            if along <= S::zero() {
                return Err(OperationError::InvalidInput("box corner behind the eye".into()).into());
            }
            projected.push(eye.displaced(&sight.scale(&(reach.clone() / along))));
        }

        let extreme = |axis: &Vector<S>, max: bool| {
            projected
                .iter()
                .fold(&projected[0], |best, c| {
                    let a = Vector::between(&near, c).dot(axis);
                    let b = Vector::between(&near, best).dot(axis);
                    if (max && a > b) || (!max && a < b) {
                        c
                    } else {
                        best
                    }
                })
                .clone()
        };
        let through_eye = |pt: &Point<S>, along: &Vector<S>| {
            Plane::new(eye.clone(), Vector::between(eye, pt).cross(along))
        };
        let left = through_eye(&extreme(&right, false), &up)?;
        let right_side = through_eye(&extreme(&right, true), &up)?;
        let bottom = through_eye(&extreme(&up, false), &right)?;
        let top = through_eye(&extreme(&up, true), &right)?;

        let corner = |a: &Plane<S>, b: &Plane<S>| match view.intersection_planes(a, b, epsilon) {
            Some(Intersection::Point(pt)) => Ok(pt),
            _ => Err(GeometryError::Degenerate("viewport side planes do not meet".into())),
        };
        let p = corner(&left, &bottom)?;
        let q = corner(&right_side, &bottom)?;
        let r = corner(&right_side, &top)?;
        let s = corner(&left, &top)?;
        debug!(?eye, ?p, ?q, ?r, ?s, "viewport");
        Rectangle::new(p, q, r, s, epsilon)
    }
}
