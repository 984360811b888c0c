use crate::correction::DeferredCorrections;
use crate::drag::{DragGestureHandler, DragOutcome};
use crate::error::Result;
use crate::mapping::pixel_to_time;
use crate::playback::{self, PlaybackControl};
use crate::settings::SessionSettings;
use crate::state::TimelineState;
use crate::types::*;
use tracing::{debug, info};

/// Presents modal dialogs on behalf of the session. Nothing is read back.
pub trait DialogPresenter {
    fn open(&mut self, descriptor: &DialogDescriptor, size_hint: DialogSize) -> Result<()>;
}

/// A trim timeline bound to one player.
///
/// All events are handled synchronously on the caller's thread. Reverts of
/// invalid drags are queued, and the host must call [`TrimSession::run_deferred`]
/// on the event-loop turn after the event that queued them.
pub struct TrimSession {
    settings: SessionSettings,
    state: TimelineState,
    drag: DragGestureHandler,
    corrections: DeferredCorrections,
    playback: Box<dyn PlaybackControl>,
    dialogs: Box<dyn DialogPresenter>,
}

impl TrimSession {
    pub fn new(
        settings: SessionSettings,
        playback: Box<dyn PlaybackControl>,
        dialogs: Box<dyn DialogPresenter>,
    ) -> Result<Self> {
        settings.validate()?;
        let state = TimelineState::new(settings.width)?;
        info!(width = settings.width, "trim session created");
        Ok(Self {
            settings,
            state,
            drag: DragGestureHandler::new(),
            corrections: DeferredCorrections::new(),
            playback,
            dialogs,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn seed_range(&mut self, start: Px, end: Px) -> Result<()> {
        self.drag.seed_range(&mut self.state, start, end)
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::DragStart { handle } => {
                self.drag_start(handle);
                Ok(())
            }
            SessionEvent::DragMove { handle, distance_x } => {
                self.drag_move(handle, distance_x);
                Ok(())
            }
            SessionEvent::DragEnd {
                handle, distance_x, ..
            } => {
                self.drag_end(handle, distance_x);
                Ok(())
            }
            SessionEvent::PlayheadDragEnd { free_drag_x } => self.playhead_drag_end(free_drag_x),
            SessionEvent::MetadataReady { duration } => {
                self.on_playback(PlaybackEvent::MetadataReady { duration });
                Ok(())
            }
            SessionEvent::TimeAdvanced { current_time } => {
                self.on_playback(PlaybackEvent::TimeAdvanced { current_time });
                Ok(())
            }
            SessionEvent::Play => self.play(),
            SessionEvent::Pause => self.pause(),
            SessionEvent::Stop => self.stop(),
            SessionEvent::Seek => self.seek_to_middle(),
            SessionEvent::OpenCommentDialog => self.open_comment_dialog(),
        }
    }

    // -- drag gestures -----------------------------------------------------

    pub fn drag_start(&mut self, handle: Handle) {
        self.drag.drag_start(handle, &mut self.corrections);
    }

    pub fn drag_move(&mut self, handle: Handle, distance_x: Px) {
        self.drag.drag_move(handle, distance_x, &mut self.state);
    }

    pub fn drag_end(&mut self, handle: Handle, distance_x: Px) -> DragOutcome {
        self.drag
            .drag_end(handle, distance_x, &mut self.state, &mut self.corrections)
    }

    /// The play-head reports where it was dropped; playback seeks there and the
    /// marker follows on the next time update.
    pub fn playhead_drag_end(&mut self, free_drag_x: Px) -> Result<()> {
        let time = pixel_to_time(free_drag_x, self.state.width(), self.state.duration());
        debug!(free_drag_x, time, "play-head dropped");
        self.playback.seek(time)
    }

    // -- deferred corrections ----------------------------------------------

    pub fn has_pending_corrections(&self) -> bool {
        !self.corrections.is_empty()
    }

    /// Run corrections queued by earlier events. Returns how many were applied.
    pub fn run_deferred(&mut self) -> usize {
        self.corrections.run(&mut self.state)
    }

    /// Cancel everything still queued. Runs automatically on drop.
    pub fn teardown(&mut self) {
        let canceled = self.corrections.cancel_all();
        if canceled > 0 {
            info!(canceled, "teardown canceled pending corrections");
        }
    }

    // -- playback ----------------------------------------------------------

    pub fn on_playback(&mut self, event: PlaybackEvent) {
        playback::apply(&mut self.state, event);
    }

    pub fn play(&mut self) -> Result<()> {
        self.playback.play()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.playback.pause()
    }

    pub fn stop(&mut self) -> Result<()> {
        self.playback.pause()?;
        self.playback.seek(0.0)
    }

    /// Jump to the middle of the stream.
    pub fn seek_to_middle(&mut self) -> Result<()> {
        self.playback.seek(self.state.duration() / 2.0)
    }

    pub fn open_comment_dialog(&mut self) -> Result<()> {
        self.dialogs
            .open(&DialogDescriptor::comment(), self.settings.comment_dialog)
    }
}

impl Drop for TrimSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
