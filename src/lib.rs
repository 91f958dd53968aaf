pub mod error;
pub mod geometry;
pub mod math;

pub use error::{EuclisError, GeometryError, OperationError, Result};
pub use geometry::{
    Aabb, AabbSlice, Axis, Bounded, ConvexArea, Distance, Intersect, Intersection, Line, LineSegment, Planar,
    Plane, Point, Polygon, PolygonNoInternalHoles, Ray, Rectangle, Side, Transform, Triangle, Vector,
};
pub use math::{Exact, Precision, RoundingMode, Scalar, DEFAULT_EPSILON};
