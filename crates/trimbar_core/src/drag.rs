use crate::correction::{Correction, DeferredCorrections};
use crate::error::{CoreError, Result};
use crate::state::TimelineState;
use crate::types::{Handle, Px};
use tracing::{debug, info};

/// Distance from the right edge within which the end handle snaps to the edge.
///
/// While moving the snap only triggers on an exact hit (`anchor + dx + 4 == width`);
/// on drag end anything past the threshold (`> width`) snaps. The two checks are
/// deliberately different.
pub const END_SNAP_EPSILON_PX: Px = 4;

/// Pixel positions of the three handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub start: Px,
    pub end: Px,
    pub track_bar: Px,
}

impl Bounds {
    fn shifted(&self, dx: Px) -> Self {
        Self {
            start: self.start.saturating_add(dx),
            end: self.end.saturating_add(dx),
            track_bar: self.track_bar.saturating_add(dx),
        }
    }
}

/// Result of a drag end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The new position was written and becomes the anchor for the next drag.
    Committed,
    /// A provisional position was written; a deferred correction restores the anchor.
    PendingRevert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging { anchor: Bounds },
}

/// Turns drag gestures on the start, end and track bar handles into timeline
/// commits or reverts.
///
/// Every handle runs the same protocol independently: the anchor is captured on
/// drag start from the last committed positions, moves only update the time
/// labels, and the drag end either commits or writes a provisional value and
/// schedules a correction.
#[derive(Debug)]
pub struct DragGestureHandler {
    committed: Bounds,
    start: Phase,
    end: Phase,
    track_bar: Phase,
}

impl DragGestureHandler {
    pub fn new() -> Self {
        Self {
            committed: Bounds::default(),
            start: Phase::Idle,
            end: Phase::Idle,
            track_bar: Phase::Idle,
        }
    }

    /// Last committed handle positions.
    pub fn committed(&self) -> Bounds {
        self.committed
    }

    pub fn is_dragging(&self, handle: Handle) -> bool {
        matches!(self.phase(handle), Phase::Dragging { .. })
    }

    fn phase(&self, handle: Handle) -> Phase {
        match handle {
            Handle::Start => self.start,
            Handle::End => self.end,
            Handle::TrackBar => self.track_bar,
        }
    }

    fn phase_mut(&mut self, handle: Handle) -> &mut Phase {
        match handle {
            Handle::Start => &mut self.start,
            Handle::End => &mut self.end,
            Handle::TrackBar => &mut self.track_bar,
        }
    }

    fn anchor(&self, handle: Handle) -> Bounds {
        match self.phase(handle) {
            Phase::Dragging { anchor } => anchor,
            Phase::Idle => {
                debug!(%handle, "drag event without drag start, using committed anchor");
                self.committed
            }
        }
    }

    /// Commit an initial range, e.g. the full track once the stream is known.
    pub fn seed_range(&mut self, state: &mut TimelineState, start: Px, end: Px) -> Result<()> {
        let width = state.width();
        if start < 0 || start > end || end > width {
            return Err(CoreError::InvalidRange { start, end, width });
        }
        state.set_start_pixel(start);
        state.set_end_pixel(end);
        state.set_track_bar_pixel(start);
        self.committed = Bounds {
            start,
            end,
            track_bar: start,
        };
        debug!(start, end, "seeded trim range");
        Ok(())
    }

    /// Begin an interaction. A correction still pending for the same handle is
    /// canceled; corrections for other handles are not touched.
    pub fn drag_start(&mut self, handle: Handle, corrections: &mut DeferredCorrections) {
        if let Some(canceled) = corrections.cancel(handle) {
            debug!(%handle, ?canceled, "new drag canceled pending correction");
        }
        let anchor = self.committed;
        *self.phase_mut(handle) = Phase::Dragging { anchor };
    }

    /// Live feedback: only the time labels follow the pointer.
    pub fn drag_move(&mut self, handle: Handle, distance_x: Px, state: &mut TimelineState) {
        let anchor = self.anchor(handle);
        match handle {
            Handle::Start => {
                state.preview_start_time(anchor.start.saturating_add(distance_x));
            }
            Handle::End => {
                let width = state.width();
                let candidate = anchor.end.saturating_add(distance_x);
                let candidate = if candidate.saturating_add(END_SNAP_EPSILON_PX) == width {
                    width
                } else {
                    candidate
                };
                state.preview_end_time(candidate);
            }
            Handle::TrackBar => {
                let moved = anchor.shifted(distance_x);
                state.preview_start_time(moved.start);
                state.preview_end_time(moved.end);
            }
        }
    }

    /// Validate the final position and commit it, or write the provisional
    /// boundary value and schedule the revert.
    pub fn drag_end(
        &mut self,
        handle: Handle,
        distance_x: Px,
        state: &mut TimelineState,
        corrections: &mut DeferredCorrections,
    ) -> DragOutcome {
        let anchor = self.anchor(handle);
        *self.phase_mut(handle) = Phase::Idle;

        match handle {
            Handle::Start => self.end_start_drag(anchor, distance_x, state, corrections),
            Handle::End => self.end_end_drag(anchor, distance_x, state, corrections),
            Handle::TrackBar => self.end_track_bar_drag(anchor, distance_x, state, corrections),
        }
    }

    fn end_start_drag(
        &mut self,
        anchor: Bounds,
        distance_x: Px,
        state: &mut TimelineState,
        corrections: &mut DeferredCorrections,
    ) -> DragOutcome {
        let candidate = anchor.start.saturating_add(distance_x).max(0);
        let end_pixel = state.timeline().end_pixel;

        if candidate >= end_pixel {
            info!(candidate, end_pixel, "start handle crossed end, reverting");
            state.set_start_pixel(end_pixel);
            corrections.schedule(Correction::RestoreStart {
                pixel: anchor.start,
            });
            return DragOutcome::PendingRevert;
        }

        state.set_start_pixel(candidate);
        state.set_track_bar_pixel(candidate);
        self.committed.start = candidate;
        self.committed.track_bar = candidate;
        debug!(start = candidate, "committed start handle");
        DragOutcome::Committed
    }

    fn end_end_drag(
        &mut self,
        anchor: Bounds,
        distance_x: Px,
        state: &mut TimelineState,
        corrections: &mut DeferredCorrections,
    ) -> DragOutcome {
        let width = state.width();
        let raw = anchor.end.saturating_add(distance_x);
        let candidate = if raw.saturating_add(END_SNAP_EPSILON_PX) > width {
            width
        } else {
            raw
        };
        let start_pixel = state.timeline().start_pixel;

        if candidate <= start_pixel {
            info!(candidate, start_pixel, "end handle crossed start, reverting");
            state.set_end_pixel(start_pixel);
            corrections.schedule(Correction::RestoreEnd { pixel: anchor.end });
            return DragOutcome::PendingRevert;
        }

        state.set_end_pixel(candidate);
        self.committed.end = candidate;
        debug!(end = candidate, "committed end handle");
        DragOutcome::Committed
    }

    fn end_track_bar_drag(
        &mut self,
        anchor: Bounds,
        distance_x: Px,
        state: &mut TimelineState,
        corrections: &mut DeferredCorrections,
    ) -> DragOutcome {
        let moved = anchor.shifted(distance_x);

        if moved.end > state.width() || moved.start < 0 {
            info!(?moved, "track bar left the track, reverting");
            state.set_start_pixel(anchor.start);
            state.set_end_pixel(anchor.end);
            // settle at the far boundary first, the correction pulls it back next turn
            state.set_track_bar_pixel(anchor.end);
            corrections.schedule(Correction::RestoreTrackBar {
                pixel: anchor.track_bar,
            });
            return DragOutcome::PendingRevert;
        }

        state.set_start_pixel(moved.start);
        state.set_end_pixel(moved.end);
        state.set_track_bar_pixel(moved.track_bar);
        self.committed = moved;
        debug!(?moved, "committed track bar");
        DragOutcome::Committed
    }
}

impl Default for DragGestureHandler {
    fn default() -> Self {
        Self::new()
    }
}
