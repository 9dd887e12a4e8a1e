//! Gaze samples as delivered by the external face tracker, and the
//! single-slot holder the tick loop reads them from.

use crate::geometry::Point2;

/// One frame's iris positions, normalized to `[0, 1]` in camera space.
///
/// The same shape is used for raw tracker output and for the smoothed
/// sample owned by the gaze smoother.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeSample {
    /// Left iris centre
    pub left_iris: Point2,
    /// Right iris centre
    pub right_iris: Point2,
    /// Combined gaze point used for mapping
    pub average: Point2,
}

impl GazeSample {
    /// Create a sample with an explicit average
    #[must_use]
    pub const fn new(left_iris: Point2, right_iris: Point2, average: Point2) -> Self {
        Self {
            left_iris,
            right_iris,
            average,
        }
    }

    /// Create a sample whose average is the midpoint of both irises
    #[must_use]
    pub fn from_irises(left_iris: Point2, right_iris: Point2) -> Self {
        Self::new(left_iris, right_iris, left_iris.midpoint(&right_iris))
    }

    /// Sample with all three points at the same location
    #[must_use]
    pub const fn uniform(point: Point2) -> Self {
        Self::new(point, point, point)
    }
}

/// What the tracker reports for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerSignal {
    /// A face was tracked
    Sample(GazeSample),
    /// No face detected in the frame
    NoFace,
}

/// Last-write-wins holder between the tracker and the tick loop.
///
/// There is no queue: a newer sample overwrites an unread one. A sample is
/// handed out as fresh at most once, so repeated reads within or across
/// ticks never cause extra smoothing steps.
#[derive(Debug, Default)]
pub struct SampleSlot {
    latest: Option<GazeSample>,
    fresh: bool,
}

impl SampleSlot {
    /// Create an empty slot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: None,
            fresh: false,
        }
    }

    /// Store a tracker signal, replacing whatever was there
    pub fn publish(&mut self, signal: TrackerSignal) {
        match signal {
            TrackerSignal::Sample(sample) => {
                self.latest = Some(sample);
                self.fresh = true;
            }
            TrackerSignal::NoFace => {
                self.latest = None;
                self.fresh = false;
            }
        }
    }

    /// Take the current sample if it has not been consumed yet
    pub fn take_fresh(&mut self) -> Option<GazeSample> {
        if self.fresh {
            self.fresh = false;
            self.latest
        } else {
            None
        }
    }

    /// Whether the tracker currently sees a face
    #[must_use]
    pub const fn has_current(&self) -> bool {
        self.latest.is_some()
    }

    /// Drop any held sample
    pub fn clear(&mut self) {
        self.latest = None;
        self.fresh = false;
    }
}
