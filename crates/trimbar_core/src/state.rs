use crate::error::{CoreError, Result};
use crate::mapping::{format_time, pixel_to_time, time_to_pixel};
use crate::types::*;

/// Mutable player and timeline read-models.
///
/// Setters keep derived fields (times, labels, track bar width) in step with the
/// pixel they change. None of them enforce the start <= end ordering; the drag
/// handler validates before committing and may write provisional values that
/// a deferred correction later rolls back.
#[derive(Debug, Clone)]
pub struct TimelineState {
    player: Player,
    timeline: Timeline,
}

impl TimelineState {
    pub fn new(width: Px) -> Result<Self> {
        if width <= 0 {
            return Err(CoreError::InvalidWidth(width));
        }
        Ok(Self {
            player: Player::new(width),
            timeline: Timeline::new(),
        })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn width(&self) -> Px {
        self.player.width
    }

    pub fn duration(&self) -> f64 {
        self.player.duration
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player.clone(),
            timeline: self.timeline.clone(),
        }
    }

    fn to_time(&self, pixel: Px) -> f64 {
        pixel_to_time(pixel, self.player.width, self.player.duration)
    }

    fn update_track_bar_width(&mut self) {
        self.timeline.track_bar_width = self.timeline.end_pixel - self.timeline.start_pixel;
    }

    pub fn set_start_pixel(&mut self, pixel: Px) {
        self.timeline.start_pixel = pixel;
        self.preview_start_time(pixel);
        self.update_track_bar_width();
    }

    pub fn set_end_pixel(&mut self, pixel: Px) {
        self.timeline.end_pixel = pixel;
        self.preview_end_time(pixel);
        self.update_track_bar_width();
    }

    pub fn set_track_bar_pixel(&mut self, pixel: Px) {
        self.timeline.track_bar_pixel = pixel;
    }

    /// Update only the start label, as shown while a handle is being dragged.
    pub fn preview_start_time(&mut self, pixel: Px) {
        self.timeline.start_time = self.to_time(pixel);
        self.timeline.start_time_string = format_time(self.timeline.start_time);
    }

    /// Update only the end label, as shown while a handle is being dragged.
    pub fn preview_end_time(&mut self, pixel: Px) {
        self.timeline.end_time = self.to_time(pixel);
        self.timeline.end_time_string = format_time(self.timeline.end_time);
    }

    pub fn set_playhead_time(&mut self, time: f64) {
        self.player.current_time = time;
        self.player.current_time_string = format_time(time);
        self.timeline.current_time = time;
        self.timeline.current_pixel = time_to_pixel(time, self.player.width, self.player.duration);
    }

    /// Record the stream duration and re-derive the start/end labels from their
    /// current pixels. Pixels are left untouched.
    pub fn set_duration(&mut self, duration: f64) {
        self.player.duration = duration;
        self.player.duration_string = format_time(duration);
        self.preview_start_time(self.timeline.start_pixel);
        self.preview_end_time(self.timeline.end_pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state() -> TimelineState {
        let mut state = TimelineState::new(1024).unwrap();
        state.set_duration(200.0);
        state
    }

    #[test]
    fn rejects_non_positive_width() {
        assert!(matches!(
            TimelineState::new(0),
            Err(CoreError::InvalidWidth(0))
        ));
        assert!(matches!(
            TimelineState::new(-3),
            Err(CoreError::InvalidWidth(-3))
        ));
    }

    #[test]
    fn start_setter_updates_time_and_width() {
        let mut state = loaded_state();
        state.set_end_pixel(1024);
        state.set_start_pixel(512);

        let timeline = state.timeline();
        assert_eq!(timeline.start_pixel, 512);
        assert_eq!(timeline.start_time, 100.0);
        assert_eq!(timeline.start_time_string, "01:40");
        assert_eq!(timeline.track_bar_width, 512);
    }

    #[test]
    fn end_setter_updates_time_and_width() {
        let mut state = loaded_state();
        state.set_end_pixel(768);

        let timeline = state.timeline();
        assert_eq!(timeline.end_pixel, 768);
        assert_eq!(timeline.end_time, 150.0);
        assert_eq!(timeline.end_time_string, "02:30");
        assert_eq!(timeline.track_bar_width, 768);
    }

    #[test]
    fn setters_allow_transient_disorder() {
        let mut state = loaded_state();
        state.set_end_pixel(100);
        state.set_start_pixel(300);
        assert_eq!(state.timeline().track_bar_width, -200);
        assert!(!state.timeline().is_consistent(state.width()));
    }

    #[test]
    fn track_bar_setter_touches_only_its_pixel() {
        let mut state = loaded_state();
        state.set_end_pixel(400);
        state.set_track_bar_pixel(50);
        assert_eq!(state.timeline().track_bar_pixel, 50);
        assert_eq!(state.timeline().start_pixel, 0);
        assert_eq!(state.timeline().track_bar_width, 400);
    }

    #[test]
    fn previews_leave_pixels_alone() {
        let mut state = loaded_state();
        state.preview_start_time(256);
        state.preview_end_time(512);
        let timeline = state.timeline();
        assert_eq!(timeline.start_pixel, 0);
        assert_eq!(timeline.end_pixel, 0);
        assert_eq!(timeline.start_time, 50.0);
        assert_eq!(timeline.end_time, 100.0);
    }

    #[test]
    fn playhead_updates_player_and_timeline() {
        let mut state = loaded_state();
        state.set_playhead_time(65.0);
        assert_eq!(state.player().current_time, 65.0);
        assert_eq!(state.player().current_time_string, "01:05");
        assert_eq!(state.timeline().current_time, 65.0);
        assert_eq!(state.timeline().current_pixel, 65.0 * 1024.0 / 200.0);
    }

    #[test]
    fn playhead_before_metadata_stays_at_origin() {
        let mut state = TimelineState::new(1024).unwrap();
        state.set_playhead_time(3.0);
        assert_eq!(state.timeline().current_pixel, 0.0);
        assert!(state.timeline().current_pixel.is_finite());
    }

    #[test]
    fn duration_refreshes_labels() {
        let mut state = TimelineState::new(1024).unwrap();
        state.set_end_pixel(512);
        assert_eq!(state.timeline().end_time, 0.0);

        state.set_duration(200.0);
        assert_eq!(state.player().duration_string, "03:20");
        assert_eq!(state.timeline().end_time, 100.0);
        assert_eq!(state.timeline().end_pixel, 512);
    }
}
