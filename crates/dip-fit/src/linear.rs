use log::debug;

use crate::{EPS, FitError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `y = slope * x + intercept`.
///
/// Needs at least two points and some spread in `x`; a vertical point set fails
/// with [`FitError::Singular`].
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<LinearFit, FitError> {
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(FitError::TooFewPoints {
            required: 2,
            actual: xs.len(),
        });
    }

    let n = xs.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }

    let denom = n * sxx - sx * sx;
    if denom.abs() < EPS {
        return Err(FitError::Singular);
    }

    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    let pred: Vec<f64> = xs.iter().map(|&x| slope * x + intercept).collect();
    let fit = LinearFit {
        slope,
        intercept,
        r_squared: r_squared(ys, &pred),
    };
    debug!("linear_fit over {} points: {fit:?}", xs.len());
    Ok(fit)
}

/// Coefficient of determination `1 - SSE / SST`.
///
/// Returns 0 for empty or mismatched inputs and when `y_true` has no variance.
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return 0.0;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let (mut sst, mut sse) = (0.0, 0.0);
    for (&t, &p) in y_true.iter().zip(y_pred) {
        sst += (t - mean) * (t - mean);
        sse += (t - p) * (t - p);
    }

    if sst > EPS { 1.0 - sse / sst } else { 0.0 }
}
