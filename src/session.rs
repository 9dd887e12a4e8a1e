//! Per-session owner of the whole gaze pipeline.
//!
//! A [`TrackingSession`] is created when tracking starts and holds every
//! piece of mutable state: the sample slot, both smoothers, the calibrator
//! and the dwell detector. Everything is advanced synchronously from
//! [`TrackingSession::tick`], driven by the host's display callback.

use crate::{
    calibration::{CalibrationState, CalibrationTarget, Calibrator},
    click::ClickTarget,
    constants::{DEFAULT_GAZE_ALPHA, DEFAULT_MIN_TICK_INTERVAL_MS, DEFAULT_POINTER_ALPHA},
    dwell::{ClickEvent, DwellConfig, DwellDetector},
    filters::exponential::{GazeSmoother, PointerSmoother},
    gaze::{GazeSample, SampleSlot, TrackerSignal},
    geometry::{Point2, Viewport},
    regression::RegressionCoefficients,
};
use log::{debug, info, warn};
use std::time::Duration;

/// Tunables of a tracking session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Camera-space smoothing factor
    pub gaze_alpha: f64,
    /// Screen-space smoothing factor
    pub pointer_alpha: f64,
    /// Dwell thresholds
    pub dwell: DwellConfig,
    /// Minimum time between two logical ticks
    pub min_tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gaze_alpha: DEFAULT_GAZE_ALPHA,
            pointer_alpha: DEFAULT_POINTER_ALPHA,
            dwell: DwellConfig::default(),
            min_tick_interval: Duration::from_millis(DEFAULT_MIN_TICK_INTERVAL_MS),
        }
    }
}

/// Rate limiter for the display callback
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    last: Option<Duration>,
}

impl FrameThrottle {
    /// Create a throttle that lets through at most one tick per `min_interval`
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Whether a tick at `now` should run; records it if so
    pub fn should_run(&mut self, now: Duration) -> bool {
        let due = self
            .last
            .map_or(true, |last| now.saturating_sub(last) >= self.min_interval);
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Forget the last tick
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// What the presentation layer needs after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Rendered pointer position, if any sample has been seen
    pub pointer: Option<Point2>,
    /// Dwell progress, `[0, 1]`
    pub dwell_progress: f64,
    /// Whether the pointer is visibly dwelling
    pub is_dwelling: bool,
    /// Click fired during this tick
    pub click: Option<ClickEvent>,
    /// Whether the tracker had a face this tick
    pub tracking: bool,
}

/// Gaze pipeline state for one tracking session
#[derive(Debug)]
pub struct TrackingSession {
    config: SessionConfig,
    running: bool,
    dwell_enabled: bool,
    slot: SampleSlot,
    gaze_smoother: GazeSmoother,
    calibrator: Calibrator,
    pointer_smoother: PointerSmoother,
    dwell: DwellDetector,
    throttle: FrameThrottle,
}

impl TrackingSession {
    /// Create a stopped session
    ///
    /// # Panics
    ///
    /// Panics if either smoothing factor is not in (0, 1]
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            running: false,
            dwell_enabled: true,
            slot: SampleSlot::new(),
            gaze_smoother: GazeSmoother::new(config.gaze_alpha),
            calibrator: Calibrator::new(),
            pointer_smoother: PointerSmoother::new(config.pointer_alpha),
            dwell: DwellDetector::new(config.dwell),
            throttle: FrameThrottle::new(config.min_tick_interval),
        }
    }

    /// Open the tick loop
    pub fn start(&mut self) {
        if !self.running {
            info!("Tracking session started");
            self.running = true;
        }
    }

    /// Close the tick loop and discard in-flight smoothing and dwell state.
    ///
    /// The calibration model survives; only a calibration reset drops it.
    pub fn stop(&mut self) {
        if self.running {
            info!("Tracking session stopped");
        }
        self.running = false;
        self.slot.clear();
        self.gaze_smoother.reset();
        self.pointer_smoother.reset();
        self.dwell.reset();
        self.throttle.reset();
    }

    /// Whether the tick loop is open
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Store the tracker's latest signal. Last write wins.
    pub fn on_tracker_signal(&mut self, signal: TrackerSignal) {
        if self.running {
            self.slot.publish(signal);
        }
    }

    /// Switch dwell clicking on or off
    pub fn set_dwell_enabled(&mut self, enabled: bool) {
        self.dwell_enabled = enabled;
    }

    /// Advance the pipeline by one display frame.
    ///
    /// Returns `None` when stopped or throttled. Without a current tracker
    /// sample, mapping is skipped, any dwell in progress is abandoned and the
    /// held pointer is reported.
    pub fn tick(
        &mut self,
        now: Duration,
        viewport: Viewport,
        clicker: &mut dyn ClickTarget,
    ) -> Option<TickOutput> {
        if !self.running || !self.throttle.should_run(now) {
            return None;
        }

        if let Some(raw) = self.slot.take_fresh() {
            self.gaze_smoother.apply(raw);
        }

        let Some(gaze) = self.current_gaze() else {
            self.dwell.interrupt();
            return Some(self.output(None, false));
        };

        let target = self
            .calibrator
            .map_to_screen(gaze.average.x, gaze.average.y, viewport);
        let pointer = self.pointer_smoother.apply(target);

        let enabled = self.dwell_enabled && !self.calibrator.is_collecting();
        let outcome = self.dwell.update(pointer, now, enabled);

        if let Some(click) = outcome.click {
            Self::dispatch(clicker, click.at);
        }

        Some(self.output(outcome.click, true))
    }

    /// Smoothed gaze, but only while the tracker sees a face
    fn current_gaze(&self) -> Option<GazeSample> {
        if self.slot.has_current() {
            self.smoothed_gaze()
        } else {
            None
        }
    }

    fn dispatch(clicker: &mut dyn ClickTarget, at: Point2) {
        if let Err(e) = clicker.click(at) {
            warn!("{} failed to deliver click: {}", clicker.name(), e);
            return;
        }
        match clicker.focus(at) {
            Ok(true) => debug!("Focused target at ({:.1}, {:.1})", at.x, at.y),
            Ok(false) => {}
            Err(e) => warn!("{} failed to focus target: {}", clicker.name(), e),
        }
    }

    fn output(&self, click: Option<ClickEvent>, tracking: bool) -> TickOutput {
        TickOutput {
            pointer: self.pointer_position(),
            dwell_progress: self.dwell.progress(),
            is_dwelling: self.dwell.is_dwelling(),
            click,
            tracking,
        }
    }

    /// Begin a calibration session laid out for `viewport`
    pub fn start_calibration(&mut self, viewport: Viewport) -> bool {
        let started = self.calibrator.start(viewport);
        if started {
            self.dwell.reset();
        }
        started
    }

    /// Record the current smoothed gaze against the active target.
    ///
    /// Ignored when the tracker has no face, when no smoothed sample exists
    /// or when calibration is not collecting. Returns whether a point was
    /// recorded.
    pub fn confirm_calibration_point(&mut self) -> bool {
        let Some(gaze) = self.current_gaze() else {
            debug!("No tracked gaze available, ignoring calibration confirm");
            return false;
        };
        self.calibrator.record_point(gaze.average.x, gaze.average.y)
    }

    /// Drop the calibration model and gaze smoothing state
    pub fn reset_calibration(&mut self) {
        self.calibrator.reset();
        self.gaze_smoother.reset();
        self.pointer_smoother.reset();
        self.dwell.reset();
    }

    /// Calibration phase and progress
    #[must_use]
    pub fn calibration_state(&self) -> CalibrationState {
        self.calibrator.state()
    }

    /// Targets of the active calibration session
    #[must_use]
    pub fn calibration_targets(&self) -> &[CalibrationTarget] {
        self.calibrator.targets()
    }

    /// Calibrator, for quality and point inspection
    #[must_use]
    pub const fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    /// Fitted model, if calibrated
    #[must_use]
    pub const fn coefficients(&self) -> Option<&RegressionCoefficients> {
        self.calibrator.coefficients()
    }

    /// Latest smoothed gaze sample
    #[must_use]
    pub fn smoothed_gaze(&self) -> Option<GazeSample> {
        self.gaze_smoother.current().copied()
    }

    /// Rendered pointer position
    #[must_use]
    pub fn pointer_position(&self) -> Option<Point2> {
        self.pointer_smoother.current().copied()
    }

    /// Dwell progress, `[0, 1]`
    #[must_use]
    pub const fn dwell_progress(&self) -> f64 {
        self.dwell.progress()
    }

    /// Whether the pointer is visibly dwelling
    #[must_use]
    pub const fn is_dwelling(&self) -> bool {
        self.dwell.is_dwelling()
    }

    /// Session tunables
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}
