mod engine;
mod kalman_filter;
mod matching;
mod rect;
mod track;
mod track_state;

pub use engine::{Label, Tracker, TrackerConfig};
pub use kalman_filter::KalmanFilter;
pub use matching::{Detection, BIG_COST};
pub use rect::Rect;
pub use track::Track;
pub use track_state::TrackState;
