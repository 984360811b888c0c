use crate::state::TimelineState;
use crate::types::{Handle, Px};
use tracing::debug;

/// A revert applied on the event-loop turn after an invalid drag end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    RestoreStart { pixel: Px },
    RestoreEnd { pixel: Px },
    RestoreTrackBar { pixel: Px },
}

impl Correction {
    /// The handle this correction belongs to. At most one is pending per handle.
    pub fn handle(&self) -> Handle {
        match self {
            Correction::RestoreStart { .. } => Handle::Start,
            Correction::RestoreEnd { .. } => Handle::End,
            Correction::RestoreTrackBar { .. } => Handle::TrackBar,
        }
    }

    pub fn apply(&self, state: &mut TimelineState) {
        match *self {
            Correction::RestoreStart { pixel } => state.set_start_pixel(pixel),
            Correction::RestoreEnd { pixel } => state.set_end_pixel(pixel),
            Correction::RestoreTrackBar { pixel } => state.set_track_bar_pixel(pixel),
        }
    }
}

/// Next-tick correction queue keyed by handle.
///
/// Scheduling replaces whatever is pending for the same handle; other handles
/// are left alone. The host drains the queue once per event-loop turn, after
/// the event that scheduled the correction has been fully handled.
#[derive(Debug, Default)]
pub struct DeferredCorrections {
    pending: Vec<Correction>,
}

impl DeferredCorrections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `correction`, returning the one it superseded, if any.
    pub fn schedule(&mut self, correction: Correction) -> Option<Correction> {
        let superseded = self.cancel(correction.handle());
        self.pending.push(correction);
        superseded
    }

    /// Drop the correction pending for `handle` without running it.
    pub fn cancel(&mut self, handle: Handle) -> Option<Correction> {
        let pos = self.pending.iter().position(|c| c.handle() == handle)?;
        Some(self.pending.remove(pos))
    }

    /// Drop everything. Returns how many corrections were discarded.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn pending(&self, handle: Handle) -> Option<&Correction> {
        self.pending.iter().find(|c| c.handle() == handle)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Apply every pending correction in scheduling order and clear the queue.
    /// Returns the number applied.
    pub fn run(&mut self, state: &mut TimelineState) -> usize {
        let due = std::mem::take(&mut self.pending);
        for correction in &due {
            debug!(handle = %correction.handle(), ?correction, "applying deferred correction");
            correction.apply(state);
        }
        due.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TimelineState {
        let mut state = TimelineState::new(1024).unwrap();
        state.set_duration(200.0);
        state
    }

    #[test]
    fn schedule_replaces_same_handle() {
        let mut queue = DeferredCorrections::new();
        assert_eq!(queue.schedule(Correction::RestoreStart { pixel: 10 }), None);
        let superseded = queue.schedule(Correction::RestoreStart { pixel: 20 });
        assert_eq!(superseded, Some(Correction::RestoreStart { pixel: 10 }));
        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue.pending(Handle::Start),
            Some(&Correction::RestoreStart { pixel: 20 })
        );
    }

    #[test]
    fn handles_are_independent() {
        let mut queue = DeferredCorrections::new();
        queue.schedule(Correction::RestoreStart { pixel: 10 });
        queue.schedule(Correction::RestoreEnd { pixel: 900 });
        queue.schedule(Correction::RestoreTrackBar { pixel: 10 });
        assert_eq!(queue.len(), 3);

        queue.cancel(Handle::End);
        assert_eq!(queue.len(), 2);
        assert!(queue.pending(Handle::Start).is_some());
        assert!(queue.pending(Handle::TrackBar).is_some());
        assert!(queue.pending(Handle::End).is_none());
    }

    #[test]
    fn run_applies_once_and_empties() {
        let mut state = state();
        state.set_end_pixel(1024);
        state.set_start_pixel(1024);

        let mut queue = DeferredCorrections::new();
        queue.schedule(Correction::RestoreStart { pixel: 256 });
        assert_eq!(queue.run(&mut state), 1);
        assert!(queue.is_empty());

        assert_eq!(state.timeline().start_pixel, 256);
        assert_eq!(state.timeline().start_time, 50.0);
        assert_eq!(state.timeline().start_time_string, "00:50");
        assert_eq!(state.timeline().track_bar_width, 768);

        state.set_start_pixel(300);
        assert_eq!(queue.run(&mut state), 0);
        assert_eq!(state.timeline().start_pixel, 300);
    }

    #[test]
    fn canceled_correction_never_runs() {
        let mut state = state();
        state.set_end_pixel(400);

        let mut queue = DeferredCorrections::new();
        queue.schedule(Correction::RestoreEnd { pixel: 1024 });
        assert_eq!(
            queue.cancel(Handle::End),
            Some(Correction::RestoreEnd { pixel: 1024 })
        );
        assert_eq!(queue.run(&mut state), 0);
        assert_eq!(state.timeline().end_pixel, 400);
    }

    #[test]
    fn cancel_all_discards_everything() {
        let mut state = state();
        let mut queue = DeferredCorrections::new();
        queue.schedule(Correction::RestoreEnd { pixel: 1024 });
        queue.schedule(Correction::RestoreTrackBar { pixel: 7 });
        assert_eq!(queue.cancel_all(), 2);
        assert_eq!(queue.run(&mut state), 0);
        assert_eq!(state.timeline().track_bar_pixel, 0);
    }

    #[test]
    fn run_preserves_scheduling_order() {
        let mut state = state();
        let mut queue = DeferredCorrections::new();
        queue.schedule(Correction::RestoreTrackBar { pixel: 1 });
        queue.schedule(Correction::RestoreEnd { pixel: 500 });
        // superseding moves the track bar correction behind the end correction
        queue.schedule(Correction::RestoreTrackBar { pixel: 2 });

        let handles: Vec<Handle> = queue.pending.iter().map(|c| c.handle()).collect();
        assert_eq!(handles, vec![Handle::End, Handle::TrackBar]);
        queue.run(&mut state);
        assert_eq!(state.timeline().track_bar_pixel, 2);
        assert_eq!(state.timeline().end_pixel, 500);
    }
}
