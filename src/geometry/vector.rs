use std::ops::{Add, Neg, Sub};

use nalgebra::Vector3;

use crate::error::{GeometryError, Result};
use crate::math::{settle, Precision, Quaternion, Scalar};

use super::Point;

/// A displacement in R³.
///
/// Derived `PartialEq` is exact equality; [`Vector::equals_eps`] is the
/// tolerant form.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<S: Scalar = f64> {
    coords: Vector3<S>,
}

impl<S: Scalar> Vector<S> {
    /// Creates a vector from its components.
    #[must_use]
    pub fn new(x: S, y: S, z: S) -> Self {
        Self {
            coords: Vector3::new(x, y, z),
        }
    }

    /// Returns the zero vector.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(S::zero(), S::zero(), S::zero())
    }

    /// Creates a vector from `[x, y, z]`.
    #[must_use]
    pub fn from_array(v: [S; 3]) -> Self {
        let [x, y, z] = v;
        Self::new(x, y, z)
    }

    /// The vector from `a` to `b`.
    #[must_use]
    pub fn between(a: &Point<S>, b: &Point<S>) -> Self {
        b.vector() - a.vector()
    }

    /// Returns the x component.
    #[must_use]
    pub fn x(&self) -> &S {
        &self.coords.x
    }

    /// Returns the y component.
    #[must_use]
    pub fn y(&self) -> &S {
        &self.coords.y
    }

    /// Returns the z component.
    #[must_use]
    pub fn z(&self) -> &S {
        &self.coords.z
    }

    /// Returns the components as `[x, y, z]`.
    #[must_use]
    pub fn to_array(&self) -> [S; 3] {
        [self.x().clone(), self.y().clone(), self.z().clone()]
    }

    /// True if every component is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x().is_zero() && self.y().is_zero() && self.z().is_zero()
    }

    /// True if the magnitude is at most `epsilon`.
    #[must_use]
    pub fn is_zero_eps(&self, epsilon: f64) -> bool {
        let tol = S::tolerance(epsilon);
        self.magnitude_squared() <= tol.clone() * tol
    }

    #[must_use]
    pub fn equals_eps(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).is_zero_eps(epsilon)
    }

    #[must_use]
    pub fn scale(&self, s: &S) -> Self {
        Self {
            coords: self.coords.map(|c| c * s.clone()),
        }
    }

    /// Divides every component by `s`; callers guarantee `s != 0`.
    #[must_use]
    pub fn divide(&self, s: &S) -> Self {
        Self {
            coords: self.coords.map(|c| c / s.clone()),
        }
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> S {
        self.x().clone() * other.x().clone()
            + self.y().clone() * other.y().clone()
            + self.z().clone() * other.z().clone()
    }

    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        let (ax, ay, az) = (self.x(), self.y(), self.z());
        let (bx, by, bz) = (other.x(), other.y(), other.z());
        Self::new(
            ay.clone() * bz.clone() - az.clone() * by.clone(),
            az.clone() * bx.clone() - ax.clone() * bz.clone(),
            ax.clone() * by.clone() - ay.clone() * bx.clone(),
        )
    }

    /// Returns the squared length.
    #[must_use]
    pub fn magnitude_squared(&self) -> S {
        self.dot(self)
    }

    /// Returns the length, truncated to `precision` for exact scalars.
    #[must_use]
    pub fn magnitude(&self, precision: Precision) -> S {
        self.magnitude_squared().sqrt(precision)
    }

    /// Unit vector in the same direction.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for the zero vector.
    pub fn unit(&self, precision: Precision) -> Result<Self> {
        let m = self.magnitude(precision);
        if m.is_zero() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            coords: self.coords.map(|c| settle(c / m.clone(), precision)),
        })
    }

    /// True if the angle between the vectors is a right angle, to within
    /// `epsilon` on the cosine. The zero vector is orthogonal to everything.
    #[must_use]
    pub fn is_orthogonal(&self, other: &Self, epsilon: f64) -> bool {
        let d = self.dot(other);
        let tol = S::tolerance(epsilon);
        d.clone() * d <= tol.clone() * tol * self.magnitude_squared() * other.magnitude_squared()
    }

    /// True if `self = k * other` for some scalar `k`, to within `epsilon`
    /// relative to the magnitude of `self`.
    ///
    /// Two zero vectors are multiples of each other; a zero and a non-zero
    /// vector are not.
    #[must_use]
    pub fn is_scalar_multiple(&self, other: &Self, epsilon: f64) -> bool {
        let self_zero = self.is_zero();
        let other_zero = other.is_zero();
        if self_zero || other_zero {
            return self_zero && other_zero;
        }

        // Divide by the largest component of `other`; ties resolve x, then y, then z.
        let components = other.to_array();
        let mut divisor = 0;
        for i in 1..3 {
            if components[i].abs() > components[divisor].abs() {
                divisor = i;
            }
        }
        let k = self.to_array()[divisor].clone() / components[divisor].clone();
        if k.is_zero() {
            return false;
        }

        let residual = self - &other.scale(&k);
        let tol = S::tolerance(epsilon);
        residual.magnitude_squared() <= tol.clone() * tol * self.magnitude_squared()
    }

    /// Angle to `other` in radians, evaluated in floating point.
    #[must_use]
    pub fn angle(&self, other: &Self) -> f64 {
        let denom = (self.magnitude_squared() * other.magnitude_squared())
            .to_f64()
            .sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other).to_f64() / denom).clamp(-1.0, 1.0).acos()
    }

    /// Some non-zero vector orthogonal to this one (zero for the zero vector).
    ///
    /// Crosses with the axis of the smallest-magnitude component, so no square
    /// root is needed.
    #[must_use]
    pub fn orthogonal(&self) -> Self {
        let [ax, ay, az] = self.to_array().map(|c| c.abs());
        let axis = if ax <= ay && ax <= az {
            Self::new(S::one(), S::zero(), S::zero())
        } else if ay <= az {
            Self::new(S::zero(), S::one(), S::zero())
        } else {
            Self::new(S::zero(), S::zero(), S::one())
        };
        self.cross(&axis)
    }

    /// Rotates by `theta` radians about the unit vector `uv` using quaternion
    /// conjugation `q·v·q⁻¹`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `uv` is zero.
    pub fn rotate(&self, uv: &Self, theta: f64, precision: Precision) -> Result<Self> {
        if uv.is_zero() {
            return Err(GeometryError::ZeroVector.into());
        }
        if self.is_zero() {
            return Ok(self.clone());
        }
        let q = Quaternion::from_axis_angle(&uv.to_array(), theta, precision);
        let rotated = q.rotate(self.to_array()).ok_or_else(|| {
            GeometryError::Degenerate("rotation quaternion rounded to zero".into())
        })?;
        Ok(Self::from_array(rotated.map(|c| settle(c, precision))))
    }
}

impl<S: Scalar> Add for &Vector<S> {
    type Output = Vector<S>;

    fn add(self, rhs: Self) -> Vector<S> {
        Vector {
            coords: self.coords.zip_map(&rhs.coords, |a, b| a + b),
        }
    }
}

impl<S: Scalar> Add for Vector<S> {
    type Output = Vector<S>;

    fn add(self, rhs: Self) -> Vector<S> {
        &self + &rhs
    }
}

impl<S: Scalar> Sub for &Vector<S> {
    type Output = Vector<S>;

    fn sub(self, rhs: Self) -> Vector<S> {
        Vector {
            coords: self.coords.zip_map(&rhs.coords, |a, b| a - b),
        }
    }
}

impl<S: Scalar> Sub for Vector<S> {
    type Output = Vector<S>;

    fn sub(self, rhs: Self) -> Vector<S> {
        &self - &rhs
    }
}

impl<S: Scalar> Neg for &Vector<S> {
    type Output = Vector<S>;

    fn neg(self) -> Vector<S> {
        Vector {
            coords: self.coords.map(|c| -c),
        }
    }
}

impl<S: Scalar> Neg for Vector<S> {
    type Output = Vector<S>;

    fn neg(self) -> Vector<S> {
        -&self
    }
}

impl From<Vector3<f64>> for Vector<f64> {
    fn from(coords: Vector3<f64>) -> Self {
        Self { coords }
    }
}

impl From<Vector<f64>> for Vector3<f64> {
    fn from(v: Vector<f64>) -> Self {
        v.coords
    }
}
