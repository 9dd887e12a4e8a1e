use super::{smooth, Blend};
use crate::constants::{SMOOTHING_ALPHA_MAX, SMOOTHING_ALPHA_MIN};
use crate::{gaze::GazeSample, geometry::Point2};

/// Exponential smoothing filter that owns its previous output.
///
/// The state lives with the session that created it and is cleared with
/// [`ExponentialSmoother::reset`] when tracking stops or calibration resets.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother<T> {
    alpha: f64,
    last: Option<T>,
}

/// Camera-space smoother for tracker samples
pub type GazeSmoother = ExponentialSmoother<GazeSample>;

/// Screen-space smoother for the rendered pointer
pub type PointerSmoother = ExponentialSmoother<Point2>;

impl<T: Blend> ExponentialSmoother<T> {
    /// Create a new smoother
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(
            alpha > SMOOTHING_ALPHA_MIN && alpha <= SMOOTHING_ALPHA_MAX,
            "Alpha must be in (0, 1]"
        );
        Self { alpha, last: None }
    }

    /// Feed a raw value and return the smoothed one
    pub fn apply(&mut self, raw: T) -> T {
        let out = smooth(self.last.as_ref(), &raw, self.alpha);
        self.last = Some(out);
        out
    }

    /// Most recent smoothed value, if any
    #[must_use]
    pub const fn current(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Smoothing factor
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Forget the previous value
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_smoother() {
        let mut smoother = PointerSmoother::new(0.5);

        // First value passes through
        let p1 = smoother.apply(Point2::new(10.0, 20.0));
        assert_eq!(p1, Point2::new(10.0, 20.0));

        // Second value is smoothed
        let p2 = smoother.apply(Point2::new(20.0, 30.0));
        assert_eq!(p2, Point2::new(15.0, 25.0));
        assert_eq!(smoother.current(), Some(&p2));
    }

    #[test]
    fn test_reset() {
        let mut smoother = PointerSmoother::new(0.35);
        smoother.apply(Point2::new(1.0, 1.0));
        smoother.reset();
        assert!(smoother.current().is_none());
        assert_eq!(smoother.apply(Point2::new(7.0, 8.0)), Point2::new(7.0, 8.0));
    }

    #[test]
    fn test_alpha_bounds() {
        // High alpha = less smoothing
        let mut fast = PointerSmoother::new(0.9);
        fast.apply(Point2::new(10.0, 0.0));
        let p = fast.apply(Point2::new(20.0, 0.0));
        assert!((p.x - 19.0).abs() < 0.001);

        // Low alpha = more smoothing
        let mut slow = PointerSmoother::new(0.1);
        slow.apply(Point2::new(10.0, 0.0));
        let p = slow.apply(Point2::new(20.0, 0.0));
        assert!((p.x - 11.0).abs() < 0.001);
    }

    #[test]
    #[should_panic(expected = "Alpha must be in (0, 1]")]
    fn test_zero_alpha_rejected() {
        let _ = GazeSmoother::new(0.0);
    }
}
