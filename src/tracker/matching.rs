//! Detection-to-track association: gated costs and exact linear assignment.

use crate::tracker::rect::Rect;
use ndarray::Array2;

/// Cost assigned to forbidden pairs. Any allowed cost is bounded by
/// `alpha + (1 - alpha) * max_dist < 1`, so this dominates by nine orders of
/// magnitude while staying finite for the solver.
pub const BIG_COST: f64 = 1e9;

/// Minimum overlap for a pair to be considered at all.
const MIN_IOU: f64 = 0.01;

/// Detection input for the tracker.
///
/// A raw axis-aligned rectangle in normalized coordinates, top-left anchored,
/// with no identity attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Detection {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// The measurement vector fed to the Kalman filter.
    pub fn measurement(&self) -> [f64; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

/// Build the square cost matrix for one frame.
///
/// Real (track, detection) cells carry `alpha * (1 - iou) + (1 - alpha) * ccd`
/// when the pair passes both gates (center distance within `max_dist`, IoU at
/// least 0.01) and `BIG_COST` otherwise. The rectangular problem is padded to
/// `max(nT, nD)` with zero-cost dummy rows/columns that freely absorb the
/// surplus side; the solver prefers any finite real pair over a dummy.
pub fn build_cost_matrix(
    track_rects: &[Rect],
    detections: &[Detection],
    max_dist: f64,
    alpha: f64,
) -> Array2<f64> {
    let num_tracks = track_rects.len();
    let num_dets = detections.len();
    let size = num_tracks.max(num_dets);

    let mut cost = Array2::from_elem((size, size), BIG_COST);

    for i in 0..size {
        for j in 0..size {
            if i >= num_tracks || j >= num_dets {
                cost[[i, j]] = 0.0;
            }
        }
    }

    for (i, track_rect) in track_rects.iter().enumerate() {
        for (j, det) in detections.iter().enumerate() {
            let det_rect = det.rect();
            let dist = track_rect.center_distance(&det_rect);
            if dist > max_dist {
                continue;
            }
            let iou = track_rect.iou(&det_rect);
            if iou < MIN_IOU {
                continue;
            }
            let c = alpha * (1.0 - iou) + (1.0 - alpha) * dist;
            assert!(
                c.is_finite(),
                "non-finite assignment cost for track {i} / detection {j}"
            );
            cost[[i, j]] = c;
        }
    }

    cost
}

/// Solve minimum-cost perfect matching on a square cost matrix.
///
/// Returns the assigned column for every row. Solver failure or a
/// non-permutation result is a programming error and aborts the run: the
/// engine never commits a partially assigned step.
pub fn solve_assignment(cost: &Array2<f64>) -> Vec<usize> {
    let size = cost.nrows();
    debug_assert_eq!(size, cost.ncols());

    let (row_to_col, _col_to_row) = lapjv::lapjv(cost)
        .unwrap_or_else(|err| panic!("assignment solver failed on {size}x{size} matrix: {err}"));

    let mut column_taken = vec![false; size];
    for (row, &col) in row_to_col.iter().enumerate() {
        assert!(
            col < size && !column_taken[col],
            "assignment solver returned a non-permutation (row {row} -> column {col})"
        );
        column_taken[col] = true;
    }

    row_to_col
}
