//! Replay application: drives a tracking session from a gaze script.

use crate::{
    calibration::CalibrationPhase,
    click::ClickTarget,
    dwell::ClickEvent,
    geometry::{Point2, Viewport},
    regression::CalibrationQuality,
    script::{GazeScript, ScriptAction, ScriptEvent},
    session::{SessionConfig, TrackingSession},
};
use log::{debug, info};

/// What a replay produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    /// Events applied
    pub events: usize,
    /// Ticks that ran (not throttled)
    pub ticks: usize,
    /// Ticks without a tracked face
    pub lost_ticks: usize,
    /// Clicks fired, in order
    pub clicks: Vec<ClickEvent>,
    /// Calibration phase at the end
    pub calibration_phase: CalibrationPhase,
    /// Fit residuals, if calibrated
    pub calibration_quality: Option<CalibrationQuality>,
    /// Pointer position at the end
    pub final_pointer: Option<Point2>,
}

/// Replays recorded tracker output through the pipeline
pub struct ReplayApp {
    session: TrackingSession,
    viewport: Viewport,
}

impl ReplayApp {
    /// Create a replay app with an initial viewport
    #[must_use]
    pub fn new(config: SessionConfig, viewport: Viewport) -> Self {
        Self {
            session: TrackingSession::new(config),
            viewport,
        }
    }

    /// Run every script event, ticking once after each
    pub fn run(&mut self, script: &GazeScript, clicker: &mut dyn ClickTarget) -> ReplaySummary {
        info!(
            "Replaying {} events on {}x{} viewport",
            script.len(),
            self.viewport.width,
            self.viewport.height
        );

        self.session.start();

        let mut ticks = 0;
        let mut lost_ticks = 0;
        let mut clicks = Vec::new();

        for event in script.events() {
            self.apply(event);

            if let Some(output) = self.session.tick(event.time, self.viewport, clicker) {
                ticks += 1;
                if !output.tracking {
                    lost_ticks += 1;
                }
                clicks.extend(output.click);
            }
        }

        let summary = ReplaySummary {
            events: script.len(),
            ticks,
            lost_ticks,
            clicks,
            calibration_phase: self.session.calibration_state().phase,
            calibration_quality: self.session.calibrator().quality().copied(),
            final_pointer: self.session.pointer_position(),
        };

        self.session.stop();

        info!(
            "Replay finished: {} ticks, {} clicks, calibration {:?}",
            summary.ticks,
            summary.clicks.len(),
            summary.calibration_phase
        );
        summary
    }

    fn apply(&mut self, event: &ScriptEvent) {
        debug!("Line {}: {:?}", event.line, event.action);
        match event.action {
            ScriptAction::Tracker(signal) => self.session.on_tracker_signal(signal),
            ScriptAction::StartCalibration => {
                self.session.start_calibration(self.viewport);
            }
            ScriptAction::ConfirmCalibration => {
                self.session.confirm_calibration_point();
            }
            ScriptAction::ResetCalibration => self.session.reset_calibration(),
            ScriptAction::Resize(viewport) => {
                info!("Viewport resized to {}x{}", viewport.width, viewport.height);
                self.viewport = viewport;
            }
            ScriptAction::Dwell(enabled) => self.session.set_dwell_enabled(enabled),
        }
    }

    /// Session being driven
    #[must_use]
    pub const fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Current viewport
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}
