use crate::error::{PreviewError, Result};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};
use trimbar_core::playback::PlaybackControl;
use trimbar_core::types::PlaybackEvent;

const SOCKET_WAIT_ATTEMPTS: u32 = 50;
const SOCKET_WAIT_STEP: Duration = Duration::from_millis(100);
const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Wrap IPC arguments in mpv's `{"command": [...]}` envelope.
pub fn command_payload(args: Value) -> Value {
    json!({ "command": args })
}

/// Read lines until the command reply arrives, skipping asynchronous event
/// lines mpv interleaves on the same socket. Returns the reply's `data`.
pub fn read_reply<R: BufRead>(mut reader: R) -> Result<Value> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PreviewError::Mpv("connection closed before reply".into()));
        }
        let msg: Value = serde_json::from_str(line.trim())?;
        if msg.get("event").is_some() {
            continue;
        }
        return match msg.get("error").and_then(Value::as_str) {
            Some("success") | None => Ok(msg.get("data").cloned().unwrap_or(Value::Null)),
            Some(err) => Err(PreviewError::Mpv(err.to_string())),
        };
    }
}

fn send_command(socket_path: &Path, args: Value) -> Result<Value> {
    let mut stream = UnixStream::connect(socket_path).map_err(PreviewError::Connect)?;
    stream.set_read_timeout(Some(READ_TIMEOUT)).ok();

    let msg = format!("{}\n", command_payload(args));
    stream.write_all(msg.as_bytes())?;
    read_reply(BufReader::new(stream))
}

/// Numeric property, `None` while mpv has nothing loaded.
fn get_f64_property(socket_path: &Path, name: &'static str) -> Result<Option<f64>> {
    match send_command(socket_path, json!(["get_property", name])) {
        Ok(data) => data
            .as_f64()
            .map(Some)
            .ok_or(PreviewError::MissingProperty(name)),
        Err(PreviewError::Mpv(err)) if err == "property unavailable" => Ok(None),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// PropertyTracker
// ---------------------------------------------------------------------------

/// Turns sampled `duration` / `time-pos` values into playback notifications.
#[derive(Debug, Default)]
pub struct PropertyTracker {
    duration_reported: bool,
    last_time: Option<f64>,
}

impl PropertyTracker {
    /// Live streams report an infinite duration; it is never forwarded.
    pub fn observe(&mut self, duration: Option<f64>, time_pos: Option<f64>) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();

        if !self.duration_reported {
            if let Some(duration) = duration.filter(|d| d.is_finite() && *d > 0.0) {
                events.push(PlaybackEvent::MetadataReady { duration });
                self.duration_reported = true;
            }
        }

        if let Some(current_time) = time_pos {
            if self.last_time != Some(current_time) {
                events.push(PlaybackEvent::TimeAdvanced { current_time });
                self.last_time = Some(current_time);
            }
        }

        events
    }
}

// ---------------------------------------------------------------------------
// MpvObserver
// ---------------------------------------------------------------------------

/// Polls a running mpv for playback notifications over its own connection.
#[derive(Debug)]
pub struct MpvObserver {
    socket_path: PathBuf,
    tracker: PropertyTracker,
}

impl MpvObserver {
    pub fn poll(&mut self) -> Result<Vec<PlaybackEvent>> {
        let duration = get_f64_property(&self.socket_path, "duration")?;
        let time_pos = get_f64_property(&self.socket_path, "time-pos")?;
        Ok(self.tracker.observe(duration, time_pos))
    }
}

// ---------------------------------------------------------------------------
// MpvPlayer
// ---------------------------------------------------------------------------

/// Playback collaborator backed by an mpv child process driven over JSON IPC.
pub struct MpvPlayer {
    process: Option<Child>,
    socket_path: PathBuf,
}

impl MpvPlayer {
    pub fn new() -> Self {
        let socket_path =
            std::env::temp_dir().join(format!("trimbar-mpv-{}", std::process::id()));
        Self::with_socket_path(socket_path)
    }

    pub fn with_socket_path(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            process: None,
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Start an idle mpv window and wait for its IPC socket.
    pub fn start(&mut self) -> Result<()> {
        self.stop();

        let log_path =
            std::env::temp_dir().join(format!("trimbar-mpv-{}.log", std::process::id()));
        let log_file = std::fs::File::create(&log_path).ok();
        info!(log = %log_path.display(), "starting mpv");

        let child = Command::new("mpv")
            .args([
                "--idle=yes",
                "--keep-open=yes",
                "--pause",
                "--title=trimbar-preview",
                &format!("--input-ipc-server={}", self.socket_path.display()),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(log_file.map(Stdio::from).unwrap_or(Stdio::null()))
            .spawn()
            .map_err(PreviewError::Spawn)?;

        self.process = Some(child);

        for _ in 0..SOCKET_WAIT_ATTEMPTS {
            if self.socket_path.exists() {
                debug!(socket = %self.socket_path.display(), "mpv socket ready");
                return Ok(());
            }
            std::thread::sleep(SOCKET_WAIT_STEP);
        }
        warn!("mpv socket did not appear");
        Err(PreviewError::SocketTimeout)
    }

    pub fn load_file(&self, path: &str) -> Result<()> {
        info!(path, "loading media");
        send_command(&self.socket_path, json!(["loadfile", path]))?;
        Ok(())
    }

    /// A poller for this player's notifications, starting fresh.
    pub fn observer(&self) -> MpvObserver {
        MpvObserver {
            socket_path: self.socket_path.clone(),
            tracker: PropertyTracker::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
            info!("mpv stopped");
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl Default for MpvPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackControl for MpvPlayer {
    fn play(&mut self) -> trimbar_core::error::Result<()> {
        send_command(&self.socket_path, json!(["set_property", "pause", false]))?;
        Ok(())
    }

    fn pause(&mut self) -> trimbar_core::error::Result<()> {
        send_command(&self.socket_path, json!(["set_property", "pause", true]))?;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> trimbar_core::error::Result<()> {
        send_command(&self.socket_path, json!(["seek", seconds, "absolute"]))?;
        Ok(())
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
