//! Per-object track record.

use ndarray::{Array1, Array2};

use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::Detection;
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// A believed persistent object: identity plus filtered motion state.
///
/// Mutated only by the tracker engine. `rect` always mirrors the rectangle
/// part of the filter state (indices 0, 1, 4, 5) after the most recent
/// predict or correct, and is what gating and visualization read.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique identifier, never reused within one engine lifetime
    pub id: u64,
    /// Current lifecycle state
    pub state: TrackState,
    /// Rectangle read back from the filter state
    pub rect: Rect,
    /// Timestamp of creation or of the last correction (seconds since epoch)
    pub last_ts: f64,
    /// Frames since creation
    pub age: u32,
    /// Frames since the last correction
    pub time_since_update: u32,
    /// Kalman filter state mean (8-dim)
    mean: Array1<f64>,
    /// Kalman filter state covariance (8x8)
    covariance: Array2<f64>,
}

impl Track {
    /// Start a new track from an unclaimed detection.
    pub fn from_detection(id: u64, kalman_filter: &KalmanFilter, det: &Detection, ts: f64) -> Self {
        let (mean, covariance) = kalman_filter.initiate(det.measurement());
        let rect = state_rect(&mean);

        Self {
            id,
            state: TrackState::Tentative,
            rect,
            last_ts: ts,
            age: 0,
            time_since_update: 0,
            mean,
            covariance,
        }
    }

    /// Extrapolate to timestamp `ts` and age the counters.
    ///
    /// The elapsed time is measured from the last correction, not from the
    /// previous predict, matching how `last_ts` is maintained.
    pub fn predict(&mut self, kalman_filter: &KalmanFilter, ts: f64) {
        let dt = ts - self.last_ts;
        let (mean, covariance) = kalman_filter.predict(&self.mean, &self.covariance, dt);
        self.mean = mean;
        self.covariance = covariance;
        self.rect = state_rect(&self.mean);

        self.age += 1;
        self.time_since_update += 1;
        self.state = TrackState::Coasting;
    }

    /// Assimilate the associated detection at timestamp `ts`.
    pub fn correct(&mut self, kalman_filter: &KalmanFilter, det: &Detection, ts: f64) {
        let (mean, covariance) =
            kalman_filter.update(&self.mean, &self.covariance, det.measurement());
        self.mean = mean;
        self.covariance = covariance;
        self.rect = state_rect(&self.mean);

        self.last_ts = ts;
        self.time_since_update = 0;
        self.state = TrackState::Tracked;
    }

    pub fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
    }
}

fn state_rect(mean: &Array1<f64>) -> Rect {
    Rect::new(mean[0], mean[1], mean[4], mean[5])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_track_lifecycle_counters() {
        let kf = KalmanFilter::new();
        let det = Detection::new(0.3, 0.3, 0.1, 0.1);
        let mut track = Track::from_detection(7, &kf, &det, 10.0);

        assert_eq!(track.id, 7);
        assert_eq!(track.state, TrackState::Tentative);
        assert_eq!(track.rect, det.rect());

        track.predict(&kf, 10.033);
        assert_eq!(track.age, 1);
        assert_eq!(track.time_since_update, 1);
        assert_eq!(track.state, TrackState::Coasting);
        // last_ts only moves on correction.
        assert_eq!(track.last_ts, 10.0);

        track.correct(&kf, &Detection::new(0.31, 0.3, 0.1, 0.1), 10.033);
        assert_eq!(track.time_since_update, 0);
        assert_eq!(track.age, 1);
        assert_eq!(track.state, TrackState::Tracked);
        assert_eq!(track.last_ts, 10.033);
    }

    #[test]
    fn test_correct_moves_rect_toward_detection() {
        let kf = KalmanFilter::new();
        let mut track = Track::from_detection(0, &kf, &Detection::new(0.3, 0.3, 0.1, 0.1), 0.0);

        track.predict(&kf, 0.033);
        track.correct(&kf, &Detection::new(0.35, 0.3, 0.1, 0.1), 0.033);

        assert!(track.rect.x > 0.3);
        assert_abs_diff_eq!(track.rect.width, 0.1, epsilon = 1e-6);
    }
}
