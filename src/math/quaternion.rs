use std::ops::Mul;

use super::{settle, Precision, Scalar};

/// A quaternion `w + xi + yj + zk` over any [`Scalar`].
///
/// Only what rotation needs: Hamilton product, conjugate and inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Quaternion<S: Scalar> {
    pub w: S,
    pub x: S,
    pub y: S,
    pub z: S,
}

impl<S: Scalar> Quaternion<S> {
    #[must_use]
    pub fn new(w: S, x: S, y: S, z: S) -> Self {
        Self { w, x, y, z }
    }

    /// Pure quaternion `(0, v)`.
    #[must_use]
    pub fn pure(v: [S; 3]) -> Self {
        let [x, y, z] = v;
        Self::new(S::zero(), x, y, z)
    }

    /// Rotation by `theta` radians about the unit axis `uv`.
    ///
    /// The half-angle sine and cosine are evaluated in floating point and
    /// settled to `precision` for exact scalars.
    #[must_use]
    pub fn from_axis_angle(uv: &[S; 3], theta: f64, precision: Precision) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let s = settle(S::from_f64(s), precision);
        let c = settle(S::from_f64(c), precision);
        Self::new(
            c,
            uv[0].clone() * s.clone(),
            uv[1].clone() * s.clone(),
            uv[2].clone() * s,
        )
    }

    #[must_use]
    pub fn conjugate(&self) -> Self {
        Self::new(
            self.w.clone(),
            -self.x.clone(),
            -self.y.clone(),
            -self.z.clone(),
        )
    }

    #[must_use]
    pub fn norm_squared(&self) -> S {
        self.w.clone() * self.w.clone()
            + self.x.clone() * self.x.clone()
            + self.y.clone() * self.y.clone()
            + self.z.clone() * self.z.clone()
    }

    /// Multiplicative inverse, `None` for the zero quaternion.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let n = self.norm_squared();
        if n.is_zero() {
            return None;
        }
        let c = self.conjugate();
        Some(Self::new(
            c.w / n.clone(),
            c.x / n.clone(),
            c.y / n.clone(),
            c.z / n,
        ))
    }

    /// Rotates `v` by conjugation `q·v·q⁻¹`.
    ///
    /// Conjugation by any non-zero quaternion is a rotation, so exact scalars
    /// keep the vector length exactly even though the angle was rounded.
    #[must_use]
    pub fn rotate(&self, v: [S; 3]) -> Option<[S; 3]> {
        let inv = self.inverse()?;
        let r = &(self * &Self::pure(v)) * &inv;
        Some([r.x, r.y, r.z])
    }
}

impl<S: Scalar> Mul for &Quaternion<S> {
    type Output = Quaternion<S>;

    fn mul(self, rhs: Self) -> Quaternion<S> {
        let (a1, b1, c1, d1) = (&self.w, &self.x, &self.y, &self.z);
        let (a2, b2, c2, d2) = (&rhs.w, &rhs.x, &rhs.y, &rhs.z);
        let m = |a: &S, b: &S| a.clone() * b.clone();
        Quaternion::new(
            m(a1, a2) - m(b1, b2) - m(c1, c2) - m(d1, d2),
            m(a1, b2) + m(b1, a2) + m(c1, d2) - m(d1, c2),
            m(a1, c2) - m(b1, d2) + m(c1, a2) + m(d1, b2),
            m(a1, d2) + m(b1, c2) - m(c1, b2) + m(d1, a2),
        )
    }
}
