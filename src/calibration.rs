//! Nine-point personal calibration.
//!
//! The user looks at each target of a 3 x 3 grid in turn and confirms; every
//! confirmation pairs the current smoothed gaze with the target's screen
//! position. After the ninth point an affine model is fitted once and kept
//! until the next reset.

use crate::{
    constants::{CALIBRATION_GRID_FRACTIONS, NUM_CALIBRATION_POINTS},
    geometry::{Point2, Viewport},
    mapping::map_gaze_to_screen,
    regression::{fit_affine, CalibrationQuality, RegressionCoefficients},
};
use log::{debug, info, warn};

/// One of the nine fixed grid positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationTarget {
    /// Position in collection order, `0..9`
    pub index: usize,
    /// Screen position in pixels
    pub screen: Point2,
}

/// One observed gaze/screen correspondence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    /// Horizontal gaze position
    pub eye_x: f64,
    /// Vertical gaze position
    pub eye_y: f64,
    /// Horizontal target position in pixels
    pub screen_x: f64,
    /// Vertical target position in pixels
    pub screen_y: f64,
}

/// Where the calibration session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// Not calibrating
    Idle,
    /// Waiting for the user to confirm the target at `index`
    Collecting {
        /// Index of the active target
        index: usize,
    },
    /// All targets recorded and the fit attempted
    Complete,
}

/// Snapshot of the calibration session for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationState {
    /// Current phase
    pub phase: CalibrationPhase,
    /// Active target while collecting
    pub current_index: Option<usize>,
    /// Targets already recorded, in order
    pub completed_indices: Vec<usize>,
}

/// Build the 3 x 3 grid of targets for a viewport, row by row.
#[must_use]
pub fn calibration_targets(viewport: Viewport) -> Vec<CalibrationTarget> {
    CALIBRATION_GRID_FRACTIONS
        .iter()
        .flat_map(|&fy| CALIBRATION_GRID_FRACTIONS.iter().map(move |&fx| (fx, fy)))
        .enumerate()
        .map(|(index, (fx, fy))| CalibrationTarget {
            index,
            screen: viewport.at_fraction(fx, fy),
        })
        .collect()
}

/// Calibration state machine and fitted model
#[derive(Debug, Clone)]
pub struct Calibrator {
    phase: CalibrationPhase,
    targets: Vec<CalibrationTarget>,
    points: Vec<CalibrationPoint>,
    coefficients: Option<RegressionCoefficients>,
    quality: Option<CalibrationQuality>,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibrator {
    /// Create an idle calibrator with no model
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: CalibrationPhase::Idle,
            targets: Vec::new(),
            points: Vec::new(),
            coefficients: None,
            quality: None,
        }
    }

    /// Begin collecting against targets laid out for `viewport`.
    ///
    /// Ignored while a session is already collecting. Starting from
    /// `Complete` discards the previous model. Returns whether a session was
    /// started.
    pub fn start(&mut self, viewport: Viewport) -> bool {
        if self.is_collecting() {
            debug!("Ignoring calibration start while {:?}", self.phase);
            return false;
        }

        self.targets = calibration_targets(viewport);
        self.points.clear();
        self.coefficients = None;
        self.quality = None;
        self.phase = CalibrationPhase::Collecting { index: 0 };

        info!(
            "Calibration started for {}x{} viewport",
            viewport.width, viewport.height
        );
        true
    }

    /// Record the gaze for the active target.
    ///
    /// Ignored unless collecting. Returns whether a point was recorded.
    pub fn record_point(&mut self, eye_x: f64, eye_y: f64) -> bool {
        let CalibrationPhase::Collecting { index } = self.phase else {
            debug!("Ignoring calibration point while {:?}", self.phase);
            return false;
        };

        let target = self.targets[index].screen;
        self.points.push(CalibrationPoint {
            eye_x,
            eye_y,
            screen_x: target.x,
            screen_y: target.y,
        });
        debug!(
            "Calibration point {}: gaze ({:.4}, {:.4}) -> screen ({:.1}, {:.1})",
            index, eye_x, eye_y, target.x, target.y
        );

        let next = index + 1;
        if next < NUM_CALIBRATION_POINTS {
            self.phase = CalibrationPhase::Collecting { index: next };
        } else {
            self.finish();
        }
        true
    }

    fn finish(&mut self) {
        self.coefficients = fit_affine(&self.points);
        self.quality = self
            .coefficients
            .as_ref()
            .map(|coeffs| CalibrationQuality::evaluate(coeffs, &self.points));

        match (&self.coefficients, &self.quality) {
            (Some(coeffs), Some(quality)) => info!(
                "Calibration complete: x = {:?}, y = {:?}, rms error {:.2}px, max error {:.2}px",
                coeffs.x_coeffs, coeffs.y_coeffs, quality.rms_error_px, quality.max_error_px
            ),
            _ => warn!("Calibration fit is singular, using uncalibrated mapping"),
        }

        self.phase = CalibrationPhase::Complete;
    }

    /// Return to `Idle` and drop points and model
    pub fn reset(&mut self) {
        self.phase = CalibrationPhase::Idle;
        self.targets.clear();
        self.points.clear();
        self.coefficients = None;
        self.quality = None;
        info!("Calibration reset");
    }

    /// Map a gaze position with the current model or the fallback
    #[must_use]
    pub fn map_to_screen(&self, eye_x: f64, eye_y: f64, viewport: Viewport) -> Point2 {
        map_gaze_to_screen(eye_x, eye_y, self.coefficients.as_ref(), viewport)
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// Whether points are being collected
    #[must_use]
    pub const fn is_collecting(&self) -> bool {
        matches!(self.phase, CalibrationPhase::Collecting { .. })
    }

    /// Snapshot for presentation
    #[must_use]
    pub fn state(&self) -> CalibrationState {
        let current_index = match self.phase {
            CalibrationPhase::Collecting { index } => Some(index),
            _ => None,
        };
        CalibrationState {
            phase: self.phase,
            current_index,
            completed_indices: (0..self.points.len()).collect(),
        }
    }

    /// Targets of the current session (empty when idle)
    #[must_use]
    pub fn targets(&self) -> &[CalibrationTarget] {
        &self.targets
    }

    /// Target the user should look at now
    #[must_use]
    pub fn active_target(&self) -> Option<&CalibrationTarget> {
        match self.phase {
            CalibrationPhase::Collecting { index } => self.targets.get(index),
            _ => None,
        }
    }

    /// Recorded correspondences, ordered by target index
    #[must_use]
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Fitted model, if calibration succeeded
    #[must_use]
    pub const fn coefficients(&self) -> Option<&RegressionCoefficients> {
        self.coefficients.as_ref()
    }

    /// Residuals of the fitted model
    #[must_use]
    pub const fn quality(&self) -> Option<&CalibrationQuality> {
        self.quality.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(1000.0, 1000.0);

    #[test]
    fn test_target_grid() {
        let targets = calibration_targets(Viewport::new(1000.0, 500.0));
        assert_eq!(targets.len(), NUM_CALIBRATION_POINTS);
        assert_eq!(targets[0].screen, Point2::new(100.0, 50.0));
        assert_eq!(targets[1].screen, Point2::new(500.0, 50.0));
        assert_eq!(targets[3].screen, Point2::new(100.0, 250.0));
        assert_eq!(targets[8].screen, Point2::new(900.0, 450.0));
        for (i, target) in targets.iter().enumerate() {
            assert_eq!(target.index, i);
        }
    }

    #[test]
    fn test_record_ignored_when_idle() {
        let mut calibrator = Calibrator::new();
        assert!(!calibrator.record_point(0.5, 0.5));
        assert_eq!(calibrator.phase(), CalibrationPhase::Idle);
        assert!(calibrator.points().is_empty());
    }

    #[test]
    fn test_phase_progression() {
        let mut calibrator = Calibrator::new();
        assert!(calibrator.start(VIEWPORT));
        assert_eq!(calibrator.phase(), CalibrationPhase::Collecting { index: 0 });

        for i in 0..NUM_CALIBRATION_POINTS {
            let target = calibrator.active_target().unwrap().screen;
            assert!(calibrator.record_point(target.x / 1000.0, target.y / 1000.0));
            if i + 1 < NUM_CALIBRATION_POINTS {
                assert_eq!(calibrator.phase(), CalibrationPhase::Collecting { index: i + 1 });
            }
        }

        assert_eq!(calibrator.phase(), CalibrationPhase::Complete);
        assert!(calibrator.coefficients().is_some());
        assert!(calibrator.active_target().is_none());

        // A tenth point is ignored
        assert!(!calibrator.record_point(0.5, 0.5));
        assert_eq!(calibrator.points().len(), NUM_CALIBRATION_POINTS);
    }

    #[test]
    fn test_state_snapshot() {
        let mut calibrator = Calibrator::new();
        calibrator.start(VIEWPORT);
        calibrator.record_point(0.1, 0.1);
        calibrator.record_point(0.5, 0.1);

        let state = calibrator.state();
        assert_eq!(state.phase, CalibrationPhase::Collecting { index: 2 });
        assert_eq!(state.current_index, Some(2));
        assert_eq!(state.completed_indices, vec![0, 1]);
    }

    #[test]
    fn test_start_ignored_while_collecting() {
        let mut calibrator = Calibrator::new();
        assert!(calibrator.start(VIEWPORT));
        calibrator.record_point(0.1, 0.1);
        assert!(!calibrator.start(VIEWPORT));
        assert_eq!(calibrator.points().len(), 1);
    }

    #[test]
    fn test_restart_after_complete() {
        let mut calibrator = Calibrator::new();
        calibrator.start(VIEWPORT);
        for target in calibration_targets(VIEWPORT) {
            calibrator.record_point(target.screen.x / 1000.0, target.screen.y / 1000.0);
        }
        assert!(calibrator.start(VIEWPORT));
        assert_eq!(calibrator.phase(), CalibrationPhase::Collecting { index: 0 });
        assert!(calibrator.points().is_empty());
        assert!(calibrator.coefficients().is_none());
    }

    #[test]
    fn test_reset_clears_model() {
        let mut calibrator = Calibrator::new();
        calibrator.start(VIEWPORT);
        for target in calibration_targets(VIEWPORT) {
            calibrator.record_point(target.screen.x / 1000.0, target.screen.y / 1000.0);
        }
        assert!(calibrator.coefficients().is_some());
        assert!(calibrator.quality().is_some());

        calibrator.reset();
        assert_eq!(calibrator.phase(), CalibrationPhase::Idle);
        assert!(calibrator.coefficients().is_none());
        assert!(calibrator.quality().is_none());
        assert!(calibrator.targets().is_empty());

        // Falls back to the mirrored mapping
        assert_eq!(calibrator.map_to_screen(0.25, 0.5, VIEWPORT), Point2::new(750.0, 500.0));
    }
}
