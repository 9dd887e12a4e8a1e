//! Dwell-click detection.
//!
//! Holding the pointer inside a small radius for long enough fires a click
//! at the dwell centre. Leaving the radius restarts the dwell from scratch,
//! and after a click a cooldown ignores samples entirely.
//!
//! All times are offsets from a caller-supplied monotonic clock.

use crate::{
    constants::{
        DEFAULT_COOLDOWN_MS, DEFAULT_DWELL_DURATION_MS, DEFAULT_DWELL_HYSTERESIS,
        DEFAULT_DWELL_RADIUS_PX,
    },
    geometry::Point2,
};
use log::{debug, info};
use std::time::Duration;

/// Dwell detection thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellConfig {
    /// Maximum distance from the centre in pixels before the dwell restarts
    pub radius_px: f64,
    /// Time the gaze must be held to click
    pub duration: Duration,
    /// Refractory period after a click
    pub cooldown: Duration,
    /// Progress above which `is_dwelling` is reported
    pub hysteresis: f64,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_DWELL_RADIUS_PX,
            duration: Duration::from_millis(DEFAULT_DWELL_DURATION_MS),
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            hysteresis: DEFAULT_DWELL_HYSTERESIS,
        }
    }
}

/// State machine for dwell accumulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DwellPhase {
    /// No active centre
    Idle,
    /// Gaze is being held near `center` since `start`
    Dwelling {
        /// Dwell centre in screen pixels
        center: Point2,
        /// When the gaze settled on the centre
        start: Duration,
    },
}

/// A click produced by a completed dwell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Screen position to click
    pub at: Point2,
    /// When the dwell completed
    pub time: Duration,
}

/// Result of a single update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellOutcome {
    /// Progress after this update, `[0, 1]`
    pub progress: f64,
    /// Whether progress is past the hysteresis threshold
    pub is_dwelling: bool,
    /// Click fired by this update
    pub click: Option<ClickEvent>,
}

/// Dwell-click detector
#[derive(Debug, Clone)]
pub struct DwellDetector {
    config: DwellConfig,
    phase: DwellPhase,
    progress: f64,
    is_dwelling: bool,
    last_click: Option<Duration>,
}

impl DwellDetector {
    /// Create an idle detector
    #[must_use]
    pub const fn new(config: DwellConfig) -> Self {
        Self {
            config,
            phase: DwellPhase::Idle,
            progress: 0.0,
            is_dwelling: false,
            last_click: None,
        }
    }

    /// Feed the pointer position for this tick
    pub fn update(&mut self, point: Point2, now: Duration, enabled: bool) -> DwellOutcome {
        if !enabled {
            self.go_idle();
            return self.outcome(None);
        }

        if self.in_cooldown(now) {
            return self.outcome(None);
        }

        let click = match self.phase {
            DwellPhase::Idle => {
                self.phase = DwellPhase::Dwelling {
                    center: point,
                    start: now,
                };
                self.progress = 0.0;
                self.is_dwelling = false;
                None
            }
            DwellPhase::Dwelling { center, start } => {
                if point.distance(&center) > self.config.radius_px {
                    debug!(
                        "Gaze left dwell radius, re-centering at ({:.1}, {:.1})",
                        point.x, point.y
                    );
                    self.phase = DwellPhase::Dwelling {
                        center: point,
                        start: now,
                    };
                    self.progress = 0.0;
                    self.is_dwelling = false;
                    None
                } else {
                    self.accumulate(center, start, now)
                }
            }
        };

        self.outcome(click)
    }

    fn accumulate(&mut self, center: Point2, start: Duration, now: Duration) -> Option<ClickEvent> {
        let elapsed = now.saturating_sub(start);
        self.progress = if self.config.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_nanos() as f64 / self.config.duration.as_nanos() as f64).min(1.0)
        };
        self.is_dwelling = self.progress > self.config.hysteresis;

        if self.progress < 1.0 {
            return None;
        }

        info!("Dwell click at ({:.1}, {:.1})", center.x, center.y);
        self.last_click = Some(now);
        self.go_idle();
        Some(ClickEvent {
            at: center,
            time: now,
        })
    }

    fn in_cooldown(&self, now: Duration) -> bool {
        self.last_click
            .is_some_and(|last| now.saturating_sub(last) < self.config.cooldown)
    }

    fn go_idle(&mut self) {
        self.phase = DwellPhase::Idle;
        self.progress = 0.0;
        self.is_dwelling = false;
    }

    const fn outcome(&self, click: Option<ClickEvent>) -> DwellOutcome {
        DwellOutcome {
            progress: self.progress,
            is_dwelling: self.is_dwelling,
            click,
        }
    }

    /// Abandon an in-progress dwell without touching the cooldown.
    ///
    /// Used when the tracker loses the face: time without a tracked sample
    /// never counts towards a click.
    pub fn interrupt(&mut self) {
        if let DwellPhase::Dwelling { center, .. } = self.phase {
            debug!(
                "Dwell at ({:.1}, {:.1}) interrupted by tracking loss",
                center.x, center.y
            );
        }
        self.go_idle();
    }

    /// Discard all dwell state, including the cooldown
    pub fn reset(&mut self) {
        self.go_idle();
        self.last_click = None;
    }

    /// Current progress, `[0, 1]`
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the pointer is visibly dwelling
    #[must_use]
    pub const fn is_dwelling(&self) -> bool {
        self.is_dwelling
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> DwellPhase {
        self.phase
    }

    /// Active dwell centre, if any
    #[must_use]
    pub const fn center(&self) -> Option<Point2> {
        match self.phase {
            DwellPhase::Dwelling { center, .. } => Some(center),
            DwellPhase::Idle => None,
        }
    }

    /// Time of the most recent click
    #[must_use]
    pub const fn last_click(&self) -> Option<Duration> {
        self.last_click
    }

    /// Thresholds in use
    #[must_use]
    pub const fn config(&self) -> &DwellConfig {
        &self.config
    }
}
