//! Affine least-squares fit from gaze space to screen space.
//!
//! The model is `screen_x = a0 + a1 * eye_x + a2 * eye_y` and the same shape
//! for `screen_y`. Both axes share the design matrix, so the 3 x 3 normal
//! matrix is inverted once with the closed-form cofactor expansion and then
//! applied to each right-hand side.

use crate::{
    calibration::CalibrationPoint,
    constants::{MIN_FIT_POINTS, SINGULAR_DETERMINANT_EPSILON},
    geometry::Point2,
};
use nalgebra::{Matrix3, Vector3};

/// Fitted affine model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionCoefficients {
    /// `[a0, a1, a2]` for the horizontal axis
    pub x_coeffs: [f64; 3],
    /// `[b0, b1, b2]` for the vertical axis
    pub y_coeffs: [f64; 3],
}

impl RegressionCoefficients {
    /// Apply the model without clamping
    #[must_use]
    pub fn apply(&self, eye_x: f64, eye_y: f64) -> Point2 {
        let [a0, a1, a2] = self.x_coeffs;
        let [b0, b1, b2] = self.y_coeffs;
        Point2::new(
            a2.mul_add(eye_y, a1.mul_add(eye_x, a0)),
            b2.mul_add(eye_y, b1.mul_add(eye_x, b0)),
        )
    }
}

/// Residual error of a fitted model over the points it was fitted on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationQuality {
    /// Root mean square distance between predicted and target positions
    pub rms_error_px: f64,
    /// Largest single distance
    pub max_error_px: f64,
}

impl CalibrationQuality {
    /// Evaluate `coeffs` against the correspondences
    #[must_use]
    pub fn evaluate(coeffs: &RegressionCoefficients, points: &[CalibrationPoint]) -> Self {
        if points.is_empty() {
            return Self {
                rms_error_px: 0.0,
                max_error_px: 0.0,
            };
        }

        let errors: Vec<f64> = points
            .iter()
            .map(|p| coeffs.apply(p.eye_x, p.eye_y).distance(&Point2::new(p.screen_x, p.screen_y)))
            .collect();

        let mean_sq = errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64;
        let max_error_px = errors.iter().copied().fold(0.0, f64::max);

        Self {
            rms_error_px: mean_sq.sqrt(),
            max_error_px,
        }
    }
}

/// Invert a 3 x 3 matrix with the explicit cofactor formula.
///
/// Returns `None` when `|det| < 1e-10`.
#[must_use]
pub fn invert_3x3(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let c00 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    let c01 = m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)];
    let c02 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];

    let det = m[(0, 0)] * c00 + m[(0, 1)] * c01 + m[(0, 2)] * c02;
    if det.abs() < SINGULAR_DETERMINANT_EPSILON {
        return None;
    }

    let c10 = m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)];
    let c11 = m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)];
    let c12 = m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)];

    let c20 = m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)];
    let c21 = m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)];
    let c22 = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];

    // Adjugate is the transposed cofactor matrix
    let adjugate = Matrix3::new(
        c00, c10, c20,
        c01, c11, c21,
        c02, c12, c22,
    );

    Some(adjugate / det)
}

/// Ordinary least squares fit via the normal equations.
///
/// Returns `None` with fewer than three points or when `XtX` is singular,
/// in which case callers fall back to the uncalibrated mapping.
#[must_use]
pub fn fit_affine(points: &[CalibrationPoint]) -> Option<RegressionCoefficients> {
    if points.len() < MIN_FIT_POINTS {
        return None;
    }

    let mut xtx = Matrix3::<f64>::zeros();
    let mut xty_x = Vector3::<f64>::zeros();
    let mut xty_y = Vector3::<f64>::zeros();

    for p in points {
        let row = Vector3::new(1.0, p.eye_x, p.eye_y);
        xtx += row * row.transpose();
        xty_x += row * p.screen_x;
        xty_y += row * p.screen_y;
    }

    let inverse = invert_3x3(&xtx)?;
    let x = inverse * xty_x;
    let y = inverse * xty_y;

    Some(RegressionCoefficients {
        x_coeffs: [x[0], x[1], x[2]],
        y_coeffs: [y[0], y[1], y[2]],
    })
}
