use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// How a value is brought onto the grid of a [`Precision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    HalfUp,
    /// Nearest neighbour, ties towards zero.
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour.
    #[default]
    HalfEven,
}

impl RoundingMode {
    /// Rounds a rational to an integral rational.
    #[must_use]
    pub fn to_integer(self, x: &BigRational) -> BigRational {
        if x.is_integer() {
            return x.clone();
        }
        let half = BigRational::new(BigInt::one(), BigInt::from(2));
        match self {
            Self::Up => away_from_zero(x),
            Self::Down => x.trunc(),
            Self::Ceiling => x.ceil(),
            Self::Floor => x.floor(),
            Self::HalfUp => x.round(),
            Self::HalfDown => {
                let t = x.trunc();
                if (x - &t).abs() > half {
                    away_from_zero(x)
                } else {
                    t
                }
            }
            Self::HalfEven => {
                let f = x.floor();
                match (x - &f).cmp(&half) {
                    Ordering::Less => f,
                    Ordering::Greater => f + BigRational::one(),
                    Ordering::Equal => {
                        if (f.to_integer() % BigInt::from(2)).is_zero() {
                            f
                        } else {
                            f + BigRational::one()
                        }
                    }
                }
            }
        }
    }

    /// Rounds a float to an integral float.
    #[must_use]
    pub fn to_integer_f64(self, x: f64) -> f64 {
        match self {
            Self::Up => {
                if x > 0.0 {
                    x.ceil()
                } else {
                    x.floor()
                }
            }
            Self::Down => x.trunc(),
            Self::Ceiling => x.ceil(),
            Self::Floor => x.floor(),
            Self::HalfUp => x.round(),
            Self::HalfDown => {
                let t = x.trunc();
                if (x - t).abs() > 0.5 {
                    t + x.signum()
                } else {
                    t
                }
            }
            Self::HalfEven => x.round_ties_even(),
        }
    }
}

fn away_from_zero(x: &BigRational) -> BigRational {
    if x.is_positive() {
        x.ceil()
    } else {
        x.floor()
    }
}

/// Order-of-magnitude and rounding-mode pair controlling how irrational
/// results (square roots, trigonometry) are truncated.
///
/// `scale` is the decimal exponent of the last kept digit: `-3` keeps
/// values on a grid of `0.001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Decimal exponent of the last kept digit.
    pub scale: i32,
    /// Rounding applied when a value falls between grid points.
    pub rounding: RoundingMode,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            scale: -20,
            rounding: RoundingMode::HalfEven,
        }
    }
}

impl Precision {
    /// Creates a new precision context.
    #[must_use]
    pub fn new(scale: i32, rounding: RoundingMode) -> Self {
        Self { scale, rounding }
    }

    /// Returns a context keeping `digits` more decimal digits.
    #[must_use]
    pub fn finer(self, digits: i32) -> Self {
        Self {
            scale: self.scale - digits,
            ..self
        }
    }

    /// The grid spacing `10^scale` as a rational.
    #[must_use]
    pub fn unit(self) -> BigRational {
        let magnitude = num_traits::pow(BigInt::from(10), self.scale.unsigned_abs() as usize);
        if self.scale >= 0 {
            BigRational::from_integer(magnitude)
        } else {
            BigRational::new(BigInt::one(), magnitude)
        }
    }

    /// Rounds a rational onto the grid.
    #[must_use]
    pub fn round_rational(self, value: &BigRational) -> BigRational {
        let unit = self.unit();
        let scaled = value / &unit;
        self.rounding.to_integer(&scaled) * unit
    }

    /// Comparison tolerance for values that went through rounding on this
    /// grid: a hundred grid steps.
    #[must_use]
    pub fn tolerance(self) -> f64 {
        10f64.powi(self.scale + 2)
    }

    /// Rounds a float onto the grid.
    #[must_use]
    pub fn round_f64(self, value: f64) -> f64 {
        let unit = 10f64.powi(self.scale);
        self.rounding.to_integer_f64(value / unit) * unit
    }
}
