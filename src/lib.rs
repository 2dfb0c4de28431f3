//! Multi-object tracking over normalized rectangular detections.
//!
//! The engine assigns integer ids that stay stable across frames for the
//! same physical object, surviving brief disappearances up to a configurable
//! number of frames. Association pairs an 8-D constant-velocity Kalman
//! filter per track with an exact minimum-cost assignment over a gated
//! IoU/center-distance cost.
//!
//! ```rust,ignore
//! use boxtrack_rs::{Detection, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::new(TrackerConfig::default());
//! let labels = tracker.step(0.0, &[Detection::new(0.5, 0.5, 0.1, 0.1)]);
//! assert_eq!(labels[0].track_id, 0);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod io;
pub mod tracker;
pub mod vis;

pub use driver::FrameDriver;
pub use error::Error;
pub use io::{Frame, FrameLabels};
pub use tracker::{Detection, Label, Rect, Track, TrackState, Tracker, TrackerConfig};
