use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::Precision;

/// Numeric field the geometry kernel is generic over.
///
/// Implemented for `f64` (tolerance-based) and [`BigRational`] (exact).
/// Every predicate in the kernel takes an `epsilon: f64`; for exact scalars it
/// is converted without loss, so `0.0` yields exact answers.
pub trait Scalar:
    Clone
    + Debug
    + PartialEq
    + PartialOrd
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Whether arithmetic on this scalar is exact.
    const EXACT: bool;

    /// Converts a float. Non-finite input maps to zero for exact scalars.
    fn from_f64(value: f64) -> Self;

    /// Nearest float to this value.
    fn to_f64(&self) -> f64;

    /// Absolute value.
    fn abs(&self) -> Self;

    /// Square root, truncated to `precision` for exact scalars.
    /// Negative input yields zero.
    fn sqrt(&self, precision: Precision) -> Self;

    /// Rounds onto the grid described by `precision`.
    fn round(&self, precision: Precision) -> Self;

    /// Non-negative tolerance for `epsilon`.
    fn tolerance(epsilon: f64) -> Self {
        Self::from_f64(epsilon.abs())
    }

    fn two() -> Self {
        Self::one() + Self::one()
    }

    fn half() -> Self {
        Self::one() / Self::two()
    }

    /// `|self - other| <= epsilon`.
    fn eq_eps(&self, other: &Self, epsilon: f64) -> bool {
        (self.clone() - other.clone()).abs() <= Self::tolerance(epsilon)
    }

    /// `|self| <= epsilon`.
    fn is_zero_eps(&self, epsilon: f64) -> bool {
        self.abs() <= Self::tolerance(epsilon)
    }

    /// Sign of the value, snapped to `0` within `epsilon`.
    fn sign_eps(&self, epsilon: f64) -> i32 {
        if self.is_zero_eps(epsilon) {
            0
        } else if *self > Self::zero() {
            1
        } else {
            -1
        }
    }

    fn min_of(a: Self, b: Self) -> Self {
        if b < a {
            b
        } else {
            a
        }
    }

    fn max_of(a: Self, b: Self) -> Self {
        if b > a {
            b
        } else {
            a
        }
    }
}

impl Scalar for f64 {
    const EXACT: bool = false;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn sqrt(&self, _precision: Precision) -> Self {
        if *self <= 0.0 {
            0.0
        } else {
            f64::sqrt(*self)
        }
    }

    fn round(&self, precision: Precision) -> Self {
        precision.round_f64(*self)
    }
}

impl Scalar for BigRational {
    const EXACT: bool = true;

    fn from_f64(value: f64) -> Self {
        BigRational::from_float(value).unwrap_or_else(Self::zero)
    }

    fn to_f64(&self) -> f64 {
        ToPrimitive::to_f64(self).unwrap_or(f64::NAN)
    }

    fn abs(&self) -> Self {
        Signed::abs(self)
    }

    /// Integer square root of the value scaled onto a grid four digits
    /// finer than `precision`, then rounded onto `precision`. Any magnitude
    /// is handled exactly up to that truncation.
    fn sqrt(&self, precision: Precision) -> Self {
        if !self.is_positive() {
            return Self::zero();
        }
        let digits = usize::try_from(4 - precision.scale).unwrap_or(0);
        let grid = num_traits::pow(BigInt::from(10), digits);
        let root = (self.numer() * &grid * &grid / self.denom()).sqrt();
        precision.round_rational(&BigRational::new(root, grid))
    }

    fn round(&self, precision: Precision) -> Self {
        precision.round_rational(self)
    }
}
