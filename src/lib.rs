//! Gaze calibration, mapping and dwell-click engine for hands-free pointer
//! control.
//!
//! Per-frame iris positions from an external face tracker are turned into a
//! stable on-screen pointer and a debounced click signal:
//! 1. Exponential smoothing of the raw gaze sample in camera space
//! 2. Mapping to the screen through a personal affine calibration, fitted by
//!    least squares over nine targets (or a mirrored linear fallback)
//! 3. A second exponential smoothing stage in screen space
//! 4. Dwell detection with hysteresis and cooldown, emitting clicks
//!
//! # Examples
//!
//! ## Calibrating
//!
//! ```
//! use gaze_dwell_pointer::{calibration::Calibrator, geometry::Viewport};
//!
//! let viewport = Viewport::new(1000.0, 1000.0);
//! let mut calibrator = Calibrator::new();
//! calibrator.start(viewport);
//!
//! // The user looks at each target; here the gaze happens to equal the
//! // target's normalized position.
//! while let Some(target) = calibrator.active_target().copied() {
//!     calibrator.record_point(target.screen.x / 1000.0, target.screen.y / 1000.0);
//! }
//!
//! let p = calibrator.map_to_screen(0.5, 0.5, viewport);
//! assert!((p.x - 500.0).abs() < 1e-6 && (p.y - 500.0).abs() < 1e-6);
//! ```
//!
//! ## Driving a session
//!
//! ```
//! use gaze_dwell_pointer::{
//!     click::RecordingClickTarget,
//!     gaze::{GazeSample, TrackerSignal},
//!     geometry::{Point2, Viewport},
//!     session::{SessionConfig, TrackingSession},
//! };
//! use std::time::Duration;
//!
//! let mut session = TrackingSession::new(SessionConfig::default());
//! let mut clicker = RecordingClickTarget::new();
//! let viewport = Viewport::new(1920.0, 1080.0);
//! session.start();
//!
//! for frame in 0..=60u64 {
//!     let sample = GazeSample::uniform(Point2::new(0.5, 0.5));
//!     session.on_tracker_signal(TrackerSignal::Sample(sample));
//!     session.tick(Duration::from_millis(frame * 20), viewport, &mut clicker);
//! }
//!
//! // Holding still for 800ms fires one click at the pointer
//! assert_eq!(clicker.clicks().len(), 1);
//! session.stop();
//! ```

/// Shared 2D geometry types
pub mod geometry;

/// Tracker samples and the single-slot sample holder
pub mod gaze;

/// Exponential smoothing for gaze and pointer
pub mod filters;

/// Least-squares affine fit
pub mod regression;

/// Gaze-to-screen mapping
pub mod mapping;

/// Nine-point calibration state machine
pub mod calibration;

/// Dwell-click detection
pub mod dwell;

/// Click delivery capability
pub mod click;

/// Cursor control module for X11 systems
pub mod cursor_control;

/// Per-session pipeline owner and tick loop
pub mod session;

/// Gaze script format for replaying tracker output
pub mod script;

/// Replay application
pub mod app;

/// Utility functions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the engine
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
