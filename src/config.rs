//! Configuration management for the gaze dwell pointer

use crate::{
    constants::{
        DEFAULT_COOLDOWN_MS, DEFAULT_DWELL_DURATION_MS, DEFAULT_DWELL_HYSTERESIS,
        DEFAULT_DWELL_RADIUS_PX, DEFAULT_GAZE_ALPHA, DEFAULT_MIN_TICK_INTERVAL_MS,
        DEFAULT_POINTER_ALPHA, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
    },
    dwell::DwellConfig,
    geometry::Viewport,
    session::SessionConfig,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Dwell-click configuration
    pub dwell: DwellSettings,

    /// Tick loop configuration
    pub frame_loop: FrameLoopConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Cursor control configuration
    pub cursor: CursorConfig,
}

/// Smoothing factors for both EMA stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Camera-space smoothing factor (0.0-1.0]
    pub gaze_alpha: f64,

    /// Screen-space smoothing factor (0.0-1.0]
    pub pointer_alpha: f64,
}

/// Dwell detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwellSettings {
    /// Radius in pixels the gaze must stay within
    pub radius_px: f64,

    /// Hold time before a click, in milliseconds
    pub duration_ms: u64,

    /// Refractory period after a click, in milliseconds
    pub cooldown_ms: u64,

    /// Progress above which the pointer is shown as dwelling
    pub hysteresis: f64,
}

/// Tick loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    /// Minimum interval between logical ticks, in milliseconds
    pub min_tick_interval_ms: u64,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Viewport width used without a live display
    pub viewport_width: f64,

    /// Viewport height used without a live display
    pub viewport_height: f64,
}

/// Cursor control configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Deliver clicks to the X11 display
    pub dispatch_clicks: bool,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            gaze_alpha: DEFAULT_GAZE_ALPHA,
            pointer_alpha: DEFAULT_POINTER_ALPHA,
        }
    }
}

impl Default for DwellSettings {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_DWELL_RADIUS_PX,
            duration_ms: DEFAULT_DWELL_DURATION_MS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            hysteresis: DEFAULT_DWELL_HYSTERESIS,
        }
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            min_tick_interval_ms: DEFAULT_MIN_TICK_INTERVAL_MS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Dwell thresholds from configuration
    #[must_use]
    pub fn dwell_config(&self) -> DwellConfig {
        DwellConfig {
            radius_px: self.dwell.radius_px,
            duration: Duration::from_millis(self.dwell.duration_ms),
            cooldown: Duration::from_millis(self.dwell.cooldown_ms),
            hysteresis: self.dwell.hysteresis,
        }
    }

    /// Session tunables from configuration
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            gaze_alpha: self.smoothing.gaze_alpha,
            pointer_alpha: self.smoothing.pointer_alpha,
            dwell: self.dwell_config(),
            min_tick_interval: Duration::from_millis(self.frame_loop.min_tick_interval_ms),
        }
    }

    /// Fallback viewport from configuration
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.display.viewport_width, self.display.viewport_height)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first invalid value
    pub fn validate(&self) -> Result<()> {
        // Validate smoothing factors
        if !(self.smoothing.gaze_alpha > 0.0 && self.smoothing.gaze_alpha <= 1.0) {
            return Err(Error::ConfigError(
                "Gaze alpha must be in (0.0, 1.0]".to_string(),
            ));
        }
        if !(self.smoothing.pointer_alpha > 0.0 && self.smoothing.pointer_alpha <= 1.0) {
            return Err(Error::ConfigError(
                "Pointer alpha must be in (0.0, 1.0]".to_string(),
            ));
        }

        // Validate dwell parameters
        if !(self.dwell.radius_px > 0.0 && self.dwell.radius_px.is_finite()) {
            return Err(Error::ConfigError(
                "Dwell radius must be a positive number of pixels".to_string(),
            ));
        }
        if self.dwell.duration_ms == 0 {
            return Err(Error::ConfigError(
                "Dwell duration must be greater than 0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.dwell.hysteresis) {
            return Err(Error::ConfigError(
                "Dwell hysteresis must be in [0.0, 1.0)".to_string(),
            ));
        }

        // Validate display settings
        validate_viewport(self.viewport())
    }
}

/// Check that a viewport has finite, positive dimensions
///
/// # Errors
///
/// Returns a `ConfigError` if either dimension is zero, negative or not finite
pub fn validate_viewport(viewport: Viewport) -> Result<()> {
    let valid = |v: f64| v > 0.0 && v.is_finite();
    if valid(viewport.width) && valid(viewport.height) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "Viewport dimensions must be finite and greater than 0, got {}x{}",
            viewport.width, viewport.height
        )))
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gaze Dwell Pointer Configuration

# Exponential smoothing
smoothing:
  gaze_alpha: 0.3
  pointer_alpha: 0.35

# Dwell clicking
dwell:
  radius_px: 50.0
  duration_ms: 800
  cooldown_ms: 500
  hysteresis: 0.1

# Tick loop
frame_loop:
  min_tick_interval_ms: 16

# Viewport used without a live display
display:
  viewport_width: 1920.0
  viewport_height: 1080.0

# Cursor control
cursor:
  dispatch_clicks: false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml_str("dwell:\n  duration_ms: 1500\n").unwrap();
        assert_eq!(parsed.dwell.duration_ms, 1500);
        assert_eq!(parsed.dwell.radius_px, 50.0);
        assert_eq!(parsed.smoothing.gaze_alpha, 0.3);
    }

    #[test]
    fn test_session_config() {
        let config = Config::default();
        let session = config.session_config();
        assert_eq!(session.dwell.duration, Duration::from_millis(800));
        assert_eq!(session.dwell.cooldown, Duration::from_millis(500));
        assert_eq!(session.min_tick_interval, Duration::from_millis(16));
        assert_eq!(session.pointer_alpha, 0.35);
    }
}
