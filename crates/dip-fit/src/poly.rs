use log::debug;

use crate::{EPS, FitError};

/// Least-squares polynomial of the given degree, constant term first.
///
/// Builds the normal equations `A c = b` with `A[j][k] = sum x^(j+k)` and
/// `b[j] = sum y x^j`, then solves them by Gaussian elimination with partial
/// pivoting.
pub fn polynomial_fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>, FitError> {
    if degree < 1 {
        return Err(FitError::InvalidDegree);
    }
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }
    let m = degree + 1;
    if xs.len() < m {
        return Err(FitError::TooFewPoints {
            required: m,
            actual: xs.len(),
        });
    }

    let mut a = vec![vec![0.0; m]; m];
    let mut b = vec![0.0; m];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut xj = 1.0;
        for j in 0..m {
            b[j] += y * xj;
            let mut xjk = xj;
            for cell in a[j].iter_mut() {
                *cell += xjk;
                xjk *= x;
            }
            xj *= x;
        }
    }

    let coeffs = solve(a, b)?;
    debug!("polynomial_fit degree {degree} over {} points: {coeffs:?}", xs.len());
    Ok(coeffs)
}

fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, FitError> {
    let m = b.len();

    for i in 0..m {
        let pivot = (i..m)
            .max_by(|&r, &s| a[r][i].abs().total_cmp(&a[s][i].abs()))
            .unwrap_or(i);
        a.swap(i, pivot);
        b.swap(i, pivot);

        if a[i][i].abs() < EPS {
            return Err(FitError::Singular);
        }

        for k in i + 1..m {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..m {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut c = vec![0.0; m];
    for i in (0..m).rev() {
        let tail: f64 = (i + 1..m).map(|j| a[i][j] * c[j]).sum();
        c[i] = (b[i] - tail) / a[i][i];
    }
    Ok(c)
}

/// Evaluates `sum coeffs[i] * x^i`; empty coefficients give 0.
pub fn predict(x: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::{polynomial_fit, predict};
    use crate::FitError;

    #[test]
    fn recovers_exact_quadratic() {
        let xs: Vec<f64> = (-3..=3).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 1.0 - 2.0 * x + 0.5 * x * x).collect();
        let c = polynomial_fit(&xs, &ys, 2).expect("fit");

        assert_eq!(c.len(), 3);
        for (got, want) in c.iter().zip([1.0, -2.0, 0.5]) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
        assert!((predict(4.0, &c) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degree_one_matches_a_line() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [1.0, 3.0, 5.0];
        let c = polynomial_fit(&xs, &ys, 1).expect("fit");
        assert!((c[0] - 1.0).abs() < 1e-12);
        assert!((c[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(polynomial_fit(&[1.0], &[1.0], 0), Err(FitError::InvalidDegree));
        assert_eq!(
            polynomial_fit(&[1.0, 2.0], &[1.0, 2.0], 2),
            Err(FitError::TooFewPoints {
                required: 3,
                actual: 2
            })
        );
        assert_eq!(
            polynomial_fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], 1),
            Err(FitError::Singular)
        );
    }

    #[test]
    fn predict_uses_power_series() {
        assert_eq!(predict(3.0, &[]), 0.0);
        assert_eq!(predict(2.0, &[1.0, 0.0, 3.0]), 13.0);
    }
}
