pub mod matrix;
pub mod precision;
pub mod quaternion;
pub mod scalar;

pub use precision::{Precision, RoundingMode};
pub use quaternion::Quaternion;
pub use scalar::Scalar;

/// Exact rational scalar.
pub type Exact = num_rational::BigRational;

/// Default tolerance for floating-point comparisons.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Rounds exact values to `precision`; floating-point values pass through.
///
/// Used after square roots and trigonometry so rational numerators and
/// denominators stay bounded.
#[must_use]
pub fn settle<S: Scalar>(value: S, precision: Precision) -> S {
    if S::EXACT {
        value.round(precision)
    } else {
        value
    }
}
