//! Time-history transforms over paired series.
//!
//! Each transform keeps the input X values and replaces Y. Inputs are
//! assumed to have X increasing (typically time).

use crate::types::Dataset2D;

/// Running trapezoidal integral, starting at zero
///
/// Series with fewer than two points are returned unchanged.
pub fn integral(data: &Dataset2D) -> Dataset2D {
    let mut result = data.clone();
    if data.len() < 2 {
        return result;
    }

    let (x, y) = (data.x(), data.y());
    let out = result.y_mut();
    out[0] = 0.0;
    for i in 1..x.len() {
        out[i] = out[i - 1] + (x[i] - x[i - 1]) * 0.5 * (y[i] + y[i - 1]);
    }
    result
}

/// Backward-difference derivative
///
/// The first point reuses the forward difference of the first interval.
/// Series with fewer than two points have a zero derivative.
pub fn derivative(data: &Dataset2D) -> Dataset2D {
    let mut result = data.clone();
    let (x, y) = (data.x(), data.y());
    let out = result.y_mut();

    if x.len() < 2 {
        out.iter_mut().for_each(|v| *v = 0.0);
        return result;
    }

    for i in 1..x.len() {
        out[i] = (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
    }
    out[0] = out[1];
    result
}

/// Running root-mean-square of Y
pub fn rms(data: &Dataset2D) -> Dataset2D {
    let mut result = data.clone();
    let mut sum_of_squares = 0.0;
    for (i, v) in result.y_mut().iter_mut().enumerate() {
        sum_of_squares += *v * *v;
        *v = (sum_of_squares / (i + 1) as f64).sqrt();
    }
    result
}
