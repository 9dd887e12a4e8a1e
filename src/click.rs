//! Delivery of dwell clicks to whatever UI occupies a screen position.
//!
//! The engine never talks to a UI toolkit directly. Anything that can resolve
//! the topmost target at a coordinate and deliver a click to it implements
//! [`ClickTarget`]: an X11 display, a widget tree, a game scene graph.

use crate::{geometry::Point2, Result};
use log::info;

/// Capability to click at a screen coordinate
pub trait ClickTarget {
    /// Deliver a click-equivalent signal to the target at `at`
    ///
    /// # Errors
    ///
    /// Returns an error if the click could not be delivered
    fn click(&mut self, at: Point2) -> Result<()>;

    /// Try to give input focus to the target at `at`.
    ///
    /// Returns whether something focusable was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the focus request could not be delivered
    fn focus(&mut self, _at: Point2) -> Result<bool> {
        Ok(false)
    }

    /// Target name for logging
    fn name(&self) -> &str;
}

/// Click target that only remembers where it was clicked
#[derive(Debug, Default, Clone)]
pub struct RecordingClickTarget {
    clicks: Vec<Point2>,
}

impl RecordingClickTarget {
    /// Create an empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self { clicks: Vec::new() }
    }

    /// Positions clicked so far, oldest first
    #[must_use]
    pub fn clicks(&self) -> &[Point2] {
        &self.clicks
    }
}

impl ClickTarget for RecordingClickTarget {
    fn click(&mut self, at: Point2) -> Result<()> {
        info!("Click at ({:.1}, {:.1})", at.x, at.y);
        self.clicks.push(at);
        Ok(())
    }

    fn name(&self) -> &str {
        "RecordingClickTarget"
    }
}
