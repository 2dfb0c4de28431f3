//! Frame driver: feeds timestamped detection batches through the tracker.

use crate::io::{Frame, FrameLabels};
use crate::tracker::{Tracker, TrackerConfig};

/// Owns a tracker and advances it one frame at a time, pairing each frame's
/// labels with its timestamp for persistence.
pub struct FrameDriver {
    tracker: Tracker,
}

impl FrameDriver {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracker: Tracker::new(config),
        }
    }

    /// Process a single frame and return its labeled output.
    pub fn process(&mut self, frame: &Frame) -> FrameLabels {
        let labels = self.tracker.step(frame.ts, &frame.detections);
        FrameLabels {
            ts: frame.ts,
            labels,
        }
    }

    /// Get a reference to the underlying tracker (for visualization).
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}
