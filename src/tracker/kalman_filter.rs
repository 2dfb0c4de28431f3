//! Kalman filter for bounding box tracking using ndarray and a nalgebra-based inverse.

use ndarray::{Array1, Array2};

/// Dimension of the state vector (x, y, vx, vy, w, h, vw, vh).
pub const STATE_DIM: usize = 8;
/// Dimension of the measurement vector (x, y, w, h).
pub const MEASUREMENT_DIM: usize = 4;

/// (position, rate) index pairs sharing one constant-acceleration noise block.
const NOISE_BLOCKS: [(usize, usize); 4] = [(0, 2), (1, 3), (4, 6), (5, 7)];

/// Constant-velocity filter over position and size with a variable time step.
///
/// The state is (x, y, vx, vy, w, h, vw, vh); measurements are raw top-left
/// rectangles (x, y, w, h). Position and size dynamics are decoupled: the
/// transition only couples each coordinate to its own rate.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    update_mat: Array2<f64>,
    measurement_var: f64,
    process_var: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let mut update_mat = Array2::zeros((MEASUREMENT_DIM, STATE_DIM));
        for (row, (pos, _)) in NOISE_BLOCKS.iter().enumerate() {
            update_mat[[row, *pos]] = 1.0;
        }

        Self {
            update_mat,
            measurement_var: 1e-2,
            process_var: 1e-2,
        }
    }

    /// Initial state for a fresh track: the measured rectangle at rest.
    pub fn initiate(&self, measurement: [f64; 4]) -> (Array1<f64>, Array2<f64>) {
        let [x, y, w, h] = measurement;
        let mean = Array1::from_vec(vec![x, y, 0.0, 0.0, w, h, 0.0, 0.0]);
        let covariance = Array2::eye(STATE_DIM);
        (mean, covariance)
    }

    /// Transition matrix for a step of `dt` seconds.
    fn motion_mat(dt: f64) -> Array2<f64> {
        let mut motion_mat = Array2::eye(STATE_DIM);
        for (pos, vel) in NOISE_BLOCKS {
            motion_mat[[pos, vel]] = dt;
        }
        motion_mat
    }

    /// Process noise for a step of `dt` seconds, constant-acceleration model
    /// applied independently to each (coordinate, rate) block.
    fn process_cov(&self, dt: f64) -> Array2<f64> {
        let dt2 = dt * dt;
        let dt3 = dt2 * dt;
        let dt4 = dt2 * dt2;

        let mut cov = Array2::zeros((STATE_DIM, STATE_DIM));
        for (pos, vel) in NOISE_BLOCKS {
            cov[[pos, pos]] = dt4 / 4.0 * self.process_var;
            cov[[pos, vel]] = dt3 / 2.0 * self.process_var;
            cov[[vel, pos]] = dt3 / 2.0 * self.process_var;
            cov[[vel, vel]] = dt2 * self.process_var;
        }
        cov
    }

    /// Extrapolate the state by `dt` seconds.
    ///
    /// A non-positive `dt` (out-of-order or duplicate timestamps) is clamped
    /// to a microsecond so the transition stays well-formed.
    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        dt: f64,
    ) -> (Array1<f64>, Array2<f64>) {
        let dt = if dt <= 0.0 { 1e-6 } else { dt };
        let motion_mat = Self::motion_mat(dt);

        let new_mean = motion_mat.dot(mean);
        let new_covariance =
            motion_mat.dot(covariance).dot(&motion_mat.t()) + self.process_cov(dt);

        (new_mean, new_covariance)
    }

    /// Project the state into measurement space: (H x, H P H^T + R).
    fn project(&self, mean: &Array1<f64>, covariance: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
        let mut innovation_cov = self
            .update_mat
            .dot(covariance)
            .dot(&self.update_mat.t());
        for i in 0..MEASUREMENT_DIM {
            innovation_cov[[i, i]] += self.measurement_var;
        }

        (self.update_mat.dot(mean), innovation_cov)
    }

    /// Assimilate a measured rectangle into the state.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 4],
    ) -> (Array1<f64>, Array2<f64>) {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let measurement_arr = Array1::from_vec(measurement.to_vec());
        let innovation = measurement_arr - projected_mean;

        // K = P * H^T * S^-1. We use nalgebra for the 4x4 inversion to avoid
        // BLAS/LAPACK; a singular S means the covariance went bad upstream.
        let s_inv = self.invert_4x4(&projected_cov);
        let kalman_gain = covariance.dot(&self.update_mat.t()).dot(&s_inv);

        let new_mean = mean + &kalman_gain.dot(&innovation);

        // P = (I - K * H) * P
        let identity: Array2<f64> = Array2::eye(STATE_DIM);
        let new_covariance = (identity - kalman_gain.dot(&self.update_mat)).dot(covariance);

        (new_mean, new_covariance)
    }

    /// Helper to invert a 4x4 matrix using nalgebra (pure Rust).
    fn invert_4x4(&self, m: &Array2<f64>) -> Array2<f64> {
        let mut nm = nalgebra::Matrix4::zeros();
        for i in 0..MEASUREMENT_DIM {
            for j in 0..MEASUREMENT_DIM {
                nm[(i, j)] = m[[i, j]];
            }
        }
        let inv = nm
            .try_inverse()
            .expect("innovation covariance is singular");
        let mut res = Array2::zeros((MEASUREMENT_DIM, MEASUREMENT_DIM));
        for i in 0..MEASUREMENT_DIM {
            for j in 0..MEASUREMENT_DIM {
                res[[i, j]] = inv[(i, j)];
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_initiate() {
        let kf = KalmanFilter::new();
        let (mean, cov) = kf.initiate([0.5, 0.4, 0.1, 0.2]);
        assert_eq!(mean[0], 0.5);
        assert_eq!(mean[1], 0.4);
        assert_eq!(mean[4], 0.1);
        assert_eq!(mean[5], 0.2);
        // Rates start at rest, covariance starts at identity.
        assert_eq!(mean[2], 0.0);
        assert_eq!(mean[7], 0.0);
        assert_eq!(cov[[0, 0]], 1.0);
        assert_eq!(cov[[0, 1]], 0.0);
    }

    #[test]
    fn test_predict_applies_velocity() {
        let kf = KalmanFilter::new();
        let (mut mean, cov) = kf.initiate([0.2, 0.3, 0.1, 0.1]);
        mean[2] = 0.5; // vx
        mean[7] = 0.2; // vh

        let (predicted, _) = kf.predict(&mean, &cov, 0.1);
        assert_abs_diff_eq!(predicted[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(predicted[1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(predicted[5], 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_predict_clamps_non_positive_dt() {
        let kf = KalmanFilter::new();
        let (mut mean, cov) = kf.initiate([0.2, 0.3, 0.1, 0.1]);
        mean[2] = 1.0;

        let (predicted, _) = kf.predict(&mean, &cov, -0.5);
        // The guard substitutes a microsecond, so the state barely moves.
        assert_abs_diff_eq!(predicted[0], 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_predict_inflates_covariance() {
        let kf = KalmanFilter::new();
        let (mean, cov) = kf.initiate([0.2, 0.3, 0.1, 0.1]);
        let (_, predicted_cov) = kf.predict(&mean, &cov, 0.05);
        assert!(predicted_cov[[0, 0]] > cov[[0, 0]]);
        // Position and its rate become correlated after one step.
        assert!(predicted_cov[[0, 2]] > 0.0);
    }

    #[test]
    fn test_update_pulls_toward_measurement() {
        let kf = KalmanFilter::new();
        let (mean, cov) = kf.initiate([0.2, 0.2, 0.1, 0.1]);
        let (mean, cov) = kf.predict(&mean, &cov, 0.033);

        let (corrected, corrected_cov) = kf.update(&mean, &cov, [0.3, 0.2, 0.1, 0.1]);
        assert!(corrected[0] > 0.2 && corrected[0] < 0.3);
        // With R = 1e-2 against an O(1) covariance the gain is close to one.
        assert!(corrected[0] > 0.28);
        assert!(corrected_cov[[0, 0]] < cov[[0, 0]]);
    }
}
