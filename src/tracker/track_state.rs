/// Track lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Just created from an unclaimed detection, no correction yet
    #[default]
    Tentative,
    /// Corrected with a detection this frame
    Tracked,
    /// Surviving on the motion model, no detection for 1..=max_age frames
    Coasting,
    /// Went too long without an update, about to be culled
    Removed,
}
