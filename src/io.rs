//! JSON and timestamp adapters between the tracker core and the filesystem.

mod frames;
mod timestamp;

pub use frames::{load_frames, save_labels, Frame, FrameLabels};
pub use timestamp::{format_iso, parse_iso};
