use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel offset along the timeline track.
pub type Px = i32;

/// Label shown before any time has been mapped.
pub const ZERO_TIME_STRING: &str = "00:00";

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// One of the three draggable elements controlling the trim range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    Start,
    End,
    TrackBar,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Start => f.write_str("start"),
            Handle::End => f.write_str("end"),
            Handle::TrackBar => f.write_str("track_bar"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Playback read-model. Written only by playback sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub width: Px,
    pub duration: f64,
    pub duration_string: String,
    pub current_time: f64,
    pub current_time_string: String,
}

impl Player {
    pub fn new(width: Px) -> Self {
        Self {
            width,
            duration: 0.0,
            duration_string: ZERO_TIME_STRING.to_string(),
            current_time: 0.0,
            current_time_string: ZERO_TIME_STRING.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Trim-range read-model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    pub current_time: f64,
    pub current_pixel: f64,
    pub start_time: f64,
    pub start_time_string: String,
    pub start_pixel: Px,
    pub track_bar_pixel: Px,
    pub track_bar_width: Px,
    pub end_time: f64,
    pub end_time_string: String,
    pub end_pixel: Px,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            current_pixel: 0.0,
            start_time: 0.0,
            start_time_string: ZERO_TIME_STRING.to_string(),
            start_pixel: 0,
            track_bar_pixel: 0,
            track_bar_width: 0,
            end_time: 0.0,
            end_time_string: ZERO_TIME_STRING.to_string(),
            end_pixel: 0,
        }
    }

    /// Whether the committed-state invariants hold for a track of `width` pixels.
    pub fn is_consistent(&self, width: Px) -> bool {
        0 <= self.start_pixel
            && self.start_pixel <= self.end_pixel
            && self.end_pixel <= width
            && self.track_bar_width == self.end_pixel - self.start_pixel
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Owned copy of both read-models handed to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub player: Player,
    pub timeline: Timeline,
}

// ---------------------------------------------------------------------------
// PlaybackEvent
// ---------------------------------------------------------------------------

/// Notifications coming from the playback collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    MetadataReady { duration: f64 },
    TimeAdvanced { current_time: f64 },
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Everything a session reacts to: drag gestures, playback notifications
/// and commands issued by the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DragStart {
        handle: Handle,
    },
    DragMove {
        handle: Handle,
        distance_x: Px,
    },
    DragEnd {
        handle: Handle,
        distance_x: Px,
        #[serde(default)]
        free_drag_x: Px,
    },
    /// The play-head reports an absolute position instead of a delta.
    PlayheadDragEnd {
        free_drag_x: Px,
    },
    MetadataReady {
        duration: f64,
    },
    TimeAdvanced {
        current_time: f64,
    },
    Play,
    Pause,
    Stop,
    Seek,
    OpenCommentDialog,
}

impl From<PlaybackEvent> for SessionEvent {
    fn from(event: PlaybackEvent) -> Self {
        match event {
            PlaybackEvent::MetadataReady { duration } => SessionEvent::MetadataReady { duration },
            PlaybackEvent::TimeAdvanced { current_time } => {
                SessionEvent::TimeAdvanced { current_time }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogSize {
    pub width: u32,
    pub height: u32,
}

/// What the dialog presenter should show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogDescriptor {
    pub title: String,
    pub actions: Vec<String>,
}

impl DialogDescriptor {
    pub fn comment() -> Self {
        Self {
            title: "Comment".to_string(),
            actions: vec!["Cancel".to_string(), "Save".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
