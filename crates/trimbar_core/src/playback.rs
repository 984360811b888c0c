//! One-way sync from the playback collaborator into the read-models, and the
//! command surface the session drives it through.

use crate::error::Result;
use crate::state::TimelineState;
use crate::types::PlaybackEvent;
use tracing::{debug, warn};

/// Commands the session may issue to the player.
pub trait PlaybackControl {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek(&mut self, seconds: f64) -> Result<()>;
}

/// Stream metadata arrived. A zero, negative or unbounded duration (live
/// streams) is ignored and the previous one kept.
pub fn on_metadata_ready(state: &mut TimelineState, duration: f64) {
    if !(duration.is_finite() && duration > 0.0) {
        warn!(duration, "ignoring unusable duration");
        return;
    }
    debug!(duration, "metadata ready");
    state.set_duration(duration);
}

/// Playback moved to `current_time`. Only play-head fields are written, never
/// the trim range, so this can interleave freely with drags.
pub fn on_time_advanced(state: &mut TimelineState, current_time: f64) {
    state.set_playhead_time(current_time);
}

pub fn apply(state: &mut TimelineState, event: PlaybackEvent) {
    match event {
        PlaybackEvent::MetadataReady { duration } => on_metadata_ready(state, duration),
        PlaybackEvent::TimeAdvanced { current_time } => on_time_advanced(state, current_time),
    }
}
