//! Cursor control module for X11-based systems.
//!
//! Moves the real pointer and injects dwell clicks through the XTEST
//! extension, so any X11 client under the gaze point receives them.

use crate::{
    click::ClickTarget,
    error::{Error, Result},
    geometry::{Point2, Viewport},
    utils::safe_cast::f64_to_i16_clamp,
};
use log::{debug, info};
use x11rb::{
    connection::{Connection, RequestConnection},
    protocol::{
        xproto::{
            ConnectionExt as _, InputFocus, Screen, Window, BUTTON_PRESS_EVENT,
            BUTTON_RELEASE_EVENT,
        },
        xtest::{self, ConnectionExt as _},
    },
    rust_connection::RustConnection,
};

/// Primary mouse button
const LEFT_BUTTON: u8 = 1;

/// Upper bound on window nesting when searching for the focus target
const MAX_WINDOW_DEPTH: usize = 64;

/// Follow `child_of` down from `root` until no child is reported.
///
/// Returns the innermost window found, or `None` if `root` has no child under
/// the pointer.
fn deepest_window<F>(root: Window, mut child_of: F) -> Result<Option<Window>>
where
    F: FnMut(Window) -> Result<Window>,
{
    let mut found = None;
    let mut window = root;
    for _ in 0..MAX_WINDOW_DEPTH {
        let child = child_of(window)?;
        if child == x11rb::NONE {
            break;
        }
        found = Some(child);
        window = child;
    }
    Ok(found)
}

/// Cursor control implementation for X11
pub struct CursorController {
    connection: RustConnection,
    screen: Screen,
    screen_width: u16,
    screen_height: u16,
}

impl CursorController {
    /// Create a new cursor controller
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be reached or lacks XTEST
    pub fn new() -> Result<Self> {
        info!("Initializing X11 cursor controller");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::X11(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::X11("Failed to get screen".to_string()))?
            .clone();

        let has_xtest = connection
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(|e| Error::X11(format!("Failed to query XTEST: {e}")))?
            .is_some();
        if !has_xtest {
            return Err(Error::X11("XTEST extension not available".to_string()));
        }

        let screen_width = screen.width_in_pixels;
        let screen_height = screen.height_in_pixels;

        info!(
            "Connected to X11 display, screen: {}x{}",
            screen_width, screen_height
        );

        Ok(Self {
            connection,
            screen,
            screen_width,
            screen_height,
        })
    }

    /// Get current cursor position
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer query fails
    pub fn get_position(&self) -> Result<(i16, i16)> {
        let reply = self
            .connection
            .query_pointer(self.screen.root)
            .map_err(|e| Error::CursorControl(format!("Failed to send query pointer: {e}")))?
            .reply()
            .map_err(|e| Error::CursorControl(format!("Failed to query pointer: {e}")))?;

        Ok((reply.root_x, reply.root_y))
    }

    /// Set cursor position (absolute)
    ///
    /// # Errors
    ///
    /// Returns an error if the warp request fails
    pub fn set_position(&self, x: i16, y: i16) -> Result<()> {
        debug!("Setting cursor position to ({}, {})", x, y);

        self.connection
            .warp_pointer(x11rb::NONE, self.screen.root, 0, 0, 0, 0, x, y)
            .map_err(|e| Error::CursorControl(format!("Failed to warp pointer: {e}")))?;

        self.flush()
    }

    /// Get screen dimensions
    #[must_use]
    pub const fn get_screen_size(&self) -> (u16, u16) {
        (self.screen_width, self.screen_height)
    }

    /// Screen as a viewport for mapping
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(f64::from(self.screen_width), f64::from(self.screen_height))
    }

    /// Convert a screen point to clamped X11 coordinates
    #[must_use]
    pub fn to_screen_coords(&self, at: Point2) -> (i16, i16) {
        let max_x = i16::try_from(self.screen_width.saturating_sub(1)).unwrap_or(i16::MAX);
        let max_y = i16::try_from(self.screen_height.saturating_sub(1)).unwrap_or(i16::MAX);
        (f64_to_i16_clamp(at.x, 0, max_x), f64_to_i16_clamp(at.y, 0, max_y))
    }

    fn fake_button(&self, event_type: u8, x: i16, y: i16) -> Result<()> {
        self.connection
            .xtest_fake_input(event_type, LEFT_BUTTON, x11rb::CURRENT_TIME, self.screen.root, x, y, 0)
            .map_err(|e| Error::CursorControl(format!("Failed to inject button event: {e}")))?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))?;
        Ok(())
    }
}

impl ClickTarget for CursorController {
    fn click(&mut self, at: Point2) -> Result<()> {
        let (x, y) = self.to_screen_coords(at);
        self.set_position(x, y)?;
        self.fake_button(BUTTON_PRESS_EVENT, x, y)?;
        self.fake_button(BUTTON_RELEASE_EVENT, x, y)?;
        self.flush()
    }

    fn focus(&mut self, at: Point2) -> Result<bool> {
        let (x, y) = self.to_screen_coords(at);
        self.set_position(x, y)?;

        // The root's child is usually a window manager frame; descend to the
        // client window actually under the pointer.
        let connection = &self.connection;
        let target = deepest_window(self.screen.root, |window| {
            Ok(connection
                .query_pointer(window)
                .map_err(|e| Error::CursorControl(format!("Failed to send query pointer: {e}")))?
                .reply()
                .map_err(|e| Error::CursorControl(format!("Failed to query pointer: {e}")))?
                .child)
        })?;

        let Some(target) = target else {
            return Ok(false);
        };
        debug!("Focusing window 0x{:x}", target);

        self.connection
            .set_input_focus(InputFocus::PARENT, target, x11rb::CURRENT_TIME)
            .map_err(|e| Error::CursorControl(format!("Failed to set input focus: {e}")))?;
        self.flush()?;
        Ok(true)
    }

    fn name(&self) -> &str {
        "X11"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ROOT: Window = 1;

    fn walk(tree: &HashMap<Window, Window>) -> Result<Option<Window>> {
        deepest_window(ROOT, |window| Ok(tree.get(&window).copied().unwrap_or(x11rb::NONE)))
    }

    #[test]
    fn test_deepest_window_descends_past_frame() {
        // root -> frame -> client -> button
        let tree = HashMap::from([(ROOT, 10), (10, 20), (20, 30)]);
        assert_eq!(walk(&tree).unwrap(), Some(30));
    }

    #[test]
    fn test_deepest_window_top_level_only() {
        let tree = HashMap::from([(ROOT, 10)]);
        assert_eq!(walk(&tree).unwrap(), Some(10));
    }

    #[test]
    fn test_deepest_window_nothing_under_pointer() {
        assert_eq!(walk(&HashMap::new()).unwrap(), None);
    }

    #[test]
    fn test_deepest_window_bounded_on_cycle() {
        let tree = HashMap::from([(ROOT, 10), (10, 20), (20, 10)]);
        assert!(walk(&tree).unwrap().is_some());
    }

    #[test]
    fn test_deepest_window_propagates_errors() {
        let mut calls = 0;
        let result = deepest_window(ROOT, |window| {
            calls += 1;
            if window == ROOT {
                Ok(10)
            } else {
                Err(Error::CursorControl("query failed".to_string()))
            }
        });
        assert!(matches!(result, Err(Error::CursorControl(_))));
        assert_eq!(calls, 2);
    }

    #[test]
    #[ignore] // Requires X11 display
    fn test_cursor_controller_creation() {
        let controller = CursorController::new().unwrap();
        let (width, height) = controller.get_screen_size();
        assert!(width > 0 && height > 0);
        let viewport = controller.viewport();
        assert_eq!(viewport.width, f64::from(width));
    }

    #[test]
    #[ignore] // Requires X11 display
    fn test_to_screen_coords_clamps() {
        let controller = CursorController::new().unwrap();
        let (width, _) = controller.get_screen_size();
        let (x, y) = controller.to_screen_coords(Point2::new(-50.0, 1e9));
        assert_eq!(x, 0);
        assert!(y >= 0);
        let (x, _) = controller.to_screen_coords(Point2::new(f64::from(width) + 10.0, 0.0));
        assert_eq!(i32::from(x), i32::from(width) - 1);
    }
}
