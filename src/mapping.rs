//! Gaze-to-screen mapping.

use crate::{
    geometry::{Point2, Viewport},
    regression::RegressionCoefficients,
};

/// Convert a gaze position to a screen coordinate.
///
/// With coefficients the affine model is applied and each axis clamped to
/// the viewport. Without them (not calibrated, or the fit was singular) the
/// horizontal axis is mirrored for a front-facing camera and both axes are
/// scaled linearly.
#[must_use]
pub fn map_gaze_to_screen(
    eye_x: f64,
    eye_y: f64,
    coeffs: Option<&RegressionCoefficients>,
    viewport: Viewport,
) -> Point2 {
    match coeffs {
        Some(coeffs) => viewport.clamp(coeffs.apply(eye_x, eye_y)),
        None => Point2::new((1.0 - eye_x) * viewport.width, eye_y * viewport.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Viewport = Viewport::new(1000.0, 800.0);

    #[test]
    fn test_fallback_mirrors_x() {
        let p = map_gaze_to_screen(0.25, 0.75, None, VIEWPORT);
        assert_eq!(p, Point2::new(750.0, 600.0));
    }

    #[test]
    fn test_fallback_corners() {
        assert_eq!(map_gaze_to_screen(0.0, 0.0, None, VIEWPORT), Point2::new(1000.0, 0.0));
        assert_eq!(map_gaze_to_screen(1.0, 1.0, None, VIEWPORT), Point2::new(0.0, 800.0));
    }

    #[test]
    fn test_calibrated_applies_model() {
        let coeffs = RegressionCoefficients {
            x_coeffs: [10.0, 500.0, 100.0],
            y_coeffs: [20.0, 0.0, 400.0],
        };
        let p = map_gaze_to_screen(0.5, 0.5, Some(&coeffs), VIEWPORT);
        assert!((p.x - 310.0).abs() < 1e-9);
        assert!((p.y - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_calibrated_clamps() {
        let coeffs = RegressionCoefficients {
            x_coeffs: [-500.0, 3000.0, 0.0],
            y_coeffs: [-100.0, 0.0, 3000.0],
        };
        assert_eq!(map_gaze_to_screen(0.0, 0.0, Some(&coeffs), VIEWPORT), Point2::new(0.0, 0.0));
        assert_eq!(map_gaze_to_screen(1.0, 1.0, Some(&coeffs), VIEWPORT), Point2::new(1000.0, 800.0));
    }

    proptest! {
        #[test]
        fn prop_calibrated_output_within_viewport(
            eye_x in -2.0f64..3.0,
            eye_y in -2.0f64..3.0,
            a in proptest::array::uniform3(-5000.0f64..5000.0),
            b in proptest::array::uniform3(-5000.0f64..5000.0),
        ) {
            let coeffs = RegressionCoefficients { x_coeffs: a, y_coeffs: b };
            let p = map_gaze_to_screen(eye_x, eye_y, Some(&coeffs), VIEWPORT);
            prop_assert!((0.0..=VIEWPORT.width).contains(&p.x));
            prop_assert!((0.0..=VIEWPORT.height).contains(&p.y));
        }

        #[test]
        fn prop_fallback_within_viewport_for_normalized_input(eye_x in 0.0f64..=1.0, eye_y in 0.0f64..=1.0) {
            let p = map_gaze_to_screen(eye_x, eye_y, None, VIEWPORT);
            prop_assert!((0.0..=VIEWPORT.width).contains(&p.x));
            prop_assert!((0.0..=VIEWPORT.height).contains(&p.y));
        }
    }
}
