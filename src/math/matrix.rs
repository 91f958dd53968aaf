use super::Scalar;

/// Determinant of a 3x3 matrix given in row-major order.
#[must_use]
pub fn det3<S: Scalar>(m: &[[S; 3]; 3]) -> S {
    let minor = |r1: usize, r2: usize, c1: usize, c2: usize| {
        m[r1][c1].clone() * m[r2][c2].clone() - m[r1][c2].clone() * m[r2][c1].clone()
    };
    m[0][0].clone() * minor(1, 2, 1, 2) - m[0][1].clone() * minor(1, 2, 0, 2)
        + m[0][2].clone() * minor(1, 2, 0, 1)
}

/// Determinant of a 4x4 matrix given in row-major order.
///
/// Cofactor expansion along the first row; exact for rational scalars.
#[must_use]
pub fn det4<S: Scalar>(m: &[[S; 4]; 4]) -> S {
    let mut total = S::zero();
    for col in 0..4 {
        let mut sub: [[S; 3]; 3] = std::array::from_fn(|_| std::array::from_fn(|_| S::zero()));
        for (r, row) in m.iter().skip(1).enumerate() {
            let mut c = 0;
            for (k, value) in row.iter().enumerate() {
                if k != col {
                    sub[r][c] = value.clone();
                    c += 1;
                }
            }
        }
        let term = m[0][col].clone() * det3(&sub);
        total = if col % 2 == 0 { total + term } else { total - term };
    }
    total
}
