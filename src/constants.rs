//! Constants used throughout the engine

/// Number of calibration targets (3 x 3 grid)
pub const NUM_CALIBRATION_POINTS: usize = 9;

/// Grid positions of calibration targets as fractions of the viewport
pub const CALIBRATION_GRID_FRACTIONS: [f64; 3] = [0.1, 0.5, 0.9];

/// Minimum number of correspondences an affine fit needs
pub const MIN_FIT_POINTS: usize = 3;

/// Determinant magnitude below which the normal matrix is treated as singular
pub const SINGULAR_DETERMINANT_EPSILON: f64 = 1e-10;

/// Default gaze-space smoothing factor
pub const DEFAULT_GAZE_ALPHA: f64 = 0.3;

/// Default screen-space pointer smoothing factor
pub const DEFAULT_POINTER_ALPHA: f64 = 0.35;

/// Smoothing factor bounds
pub const SMOOTHING_ALPHA_MIN: f64 = 0.0;
pub const SMOOTHING_ALPHA_MAX: f64 = 1.0;

/// Default dwell radius in pixels
pub const DEFAULT_DWELL_RADIUS_PX: f64 = 50.0;

/// Default dwell duration in milliseconds
pub const DEFAULT_DWELL_DURATION_MS: u64 = 800;

/// Default post-click cooldown in milliseconds
pub const DEFAULT_COOLDOWN_MS: u64 = 500;

/// Progress above which the pointer is reported as dwelling
pub const DEFAULT_DWELL_HYSTERESIS: f64 = 0.1;

/// Minimum interval between two logical ticks (~60 Hz)
pub const DEFAULT_MIN_TICK_INTERVAL_MS: u64 = 16;

/// Fallback viewport used when no live display is queried
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1920.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 1080.0;
