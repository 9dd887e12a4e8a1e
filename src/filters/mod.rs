//! Exponential smoothing used at both ends of the pipeline.
//!
//! Gaze samples are smoothed in camera space before mapping, and the mapped
//! pointer is smoothed again in screen space. Both stages share the same
//! algebra, `out = prev + alpha * (raw - prev)`, applied per axis.

/// Exponential moving average smoother with owned state
pub mod exponential;

use crate::{
    gaze::GazeSample,
    geometry::Point2,
};

/// Values that can be blended axis by axis
pub trait Blend: Copy {
    /// Move `self` towards `target` by `alpha`
    #[must_use]
    fn blend(&self, target: &Self, alpha: f64) -> Self;
}

impl Blend for f64 {
    fn blend(&self, target: &Self, alpha: f64) -> Self {
        alpha.mul_add(target - self, *self)
    }
}

impl Blend for Point2 {
    fn blend(&self, target: &Self, alpha: f64) -> Self {
        Self::new(self.x.blend(&target.x, alpha), self.y.blend(&target.y, alpha))
    }
}

impl Blend for GazeSample {
    fn blend(&self, target: &Self, alpha: f64) -> Self {
        Self::new(
            self.left_iris.blend(&target.left_iris, alpha),
            self.right_iris.blend(&target.right_iris, alpha),
            self.average.blend(&target.average, alpha),
        )
    }
}

/// One EMA step. The first sample passes through unmodified.
#[must_use]
pub fn smooth<T: Blend>(prev: Option<&T>, raw: &T, alpha: f64) -> T {
    match prev {
        Some(prev) => prev.blend(raw, alpha),
        None => *raw,
    }
}
