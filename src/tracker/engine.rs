//! Main tracking engine: one predict/associate/correct cycle per frame.

use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, Detection, BIG_COST};
use crate::tracker::rect::Rect;
use crate::tracker::track::Track;

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Maximum center distance for an allowed association
    pub max_dist: f64,
    /// Longest permissible coasting duration (frames) before retirement
    pub max_age: u32,
    /// Weight of the overlap term against the distance term, in [0, 1]
    pub alpha: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_dist: 0.15,
            max_age: 5,
            alpha: 0.7,
        }
    }
}

/// Per-frame output: a stable id paired with the raw detection it claimed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub track_id: u64,
    pub det: Detection,
}

/// Multi-object tracker maintaining persistent ids across frames.
///
/// Strictly single-threaded and synchronous: one `step` runs to completion
/// before the next begins, and the engine exclusively owns its track list
/// and id counter.
pub struct Tracker {
    config: TrackerConfig,
    kalman_filter: KalmanFilter,
    tracks: Vec<Track>,
    next_track_id: u64,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            kalman_filter: KalmanFilter::new(),
            tracks: Vec::new(),
            next_track_id: 0,
        }
    }

    /// Advance one frame: associate `detections` observed at `ts` with the
    /// live tracks and return one label per associated detection, in
    /// detection order. Newly spawned tracks label their detection too.
    pub fn step(&mut self, ts: f64, detections: &[Detection]) -> Vec<Label> {
        // Step 1: Extrapolate every track to the new timestamp.
        for track in &mut self.tracks {
            track.predict(&self.kalman_filter, ts);
        }

        let num_tracks = self.tracks.len();
        let num_dets = detections.len();
        let mut det_to_track: Vec<Option<usize>> = vec![None; num_dets];

        if num_tracks.max(num_dets) > 0 {
            // Step 2: Gated costs on the square-padded matrix.
            let track_rects: Vec<Rect> = self.tracks.iter().map(|t| t.rect).collect();
            let cost = matching::build_cost_matrix(
                &track_rects,
                detections,
                self.config.max_dist,
                self.config.alpha,
            );

            // Step 3: Exact assignment.
            let assign = matching::solve_assignment(&cost);

            // Step 4 + 5: Keep real matches (not a dummy, not gated) and
            // correct them with their detections.
            for (track_idx, &det_idx) in assign.iter().enumerate().take(num_tracks) {
                if det_idx < num_dets && cost[[track_idx, det_idx]] < BIG_COST {
                    self.tracks[track_idx].correct(
                        &self.kalman_filter,
                        &detections[det_idx],
                        ts,
                    );
                    det_to_track[det_idx] = Some(track_idx);
                }
            }
        }

        // Step 6: Every unclaimed detection starts a new track.
        for (det_idx, det) in detections.iter().enumerate() {
            if det_to_track[det_idx].is_none() {
                let id = self.next_track_id;
                self.next_track_id += 1;
                self.tracks
                    .push(Track::from_detection(id, &self.kalman_filter, det, ts));
                det_to_track[det_idx] = Some(self.tracks.len() - 1);
            }
        }

        // Step 7: Labels in detection order, raw rectangles.
        let labels = det_to_track
            .iter()
            .zip(detections)
            .filter_map(|(&slot, det)| {
                slot.map(|track_idx| Label {
                    track_id: self.tracks[track_idx].id,
                    det: *det,
                })
            })
            .collect();

        // Step 8: Retire tracks that coasted too long. This runs after label
        // emission so a retiring track's final correction is not lost.
        let max_age = self.config.max_age;
        for track in &mut self.tracks {
            if track.time_since_update > max_age {
                track.mark_removed();
            }
        }
        self.tracks
            .retain(|track| track.time_since_update <= max_age);

        labels
    }

    /// Read-only view of the current tracks, for visualization.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
