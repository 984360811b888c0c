use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tokio::sync::mpsc;
use tracing::{info, warn};
use trimbar_core::error::Result as CoreResult;
use trimbar_core::playback::PlaybackControl;
use trimbar_core::session::{DialogPresenter, TrimSession};
use trimbar_core::types::{DialogDescriptor, DialogSize, SessionEvent, Snapshot};

/// Player stand-in used when no media is given: commands are only logged.
pub struct LoggingPlayback;

impl PlaybackControl for LoggingPlayback {
    fn play(&mut self) -> CoreResult<()> {
        info!("play");
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        info!("pause");
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> CoreResult<()> {
        info!(seconds, "seek");
        Ok(())
    }
}

/// Terminal has no modals, so dialog requests end up in the log.
pub struct LoggingDialogs;

impl DialogPresenter for LoggingDialogs {
    fn open(&mut self, descriptor: &DialogDescriptor, size_hint: DialogSize) -> CoreResult<()> {
        info!(
            title = %descriptor.title,
            width = size_hint.width,
            height = size_hint.height,
            "open dialog"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Frame<'a> {
    step: usize,
    phase: &'static str,
    snapshot: &'a Snapshot,
}

fn emit(
    out: &mut impl Write,
    step: usize,
    phase: &'static str,
    session: &TrimSession,
    pretty: bool,
) -> Result<()> {
    let snapshot = session.snapshot();
    let frame = Frame {
        step,
        phase,
        snapshot: &snapshot,
    };
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &frame)?;
    } else {
        serde_json::to_writer(&mut *out, &frame)?;
    }
    writeln!(out).context("failed to write snapshot")?;
    Ok(())
}

/// Drive `session` from `events` until every sender is gone.
///
/// Each event is handled to completion and its snapshot written. When it
/// queued corrections the loop yields once, runs them, and writes a second
/// `deferred` snapshot before taking the next event.
///
/// Dispatch may block on a player socket, so it runs under `block_in_place`
/// and needs the multi-threaded runtime.
pub async fn run_event_loop(
    session: &mut TrimSession,
    mut events: mpsc::Receiver<SessionEvent>,
    out: &mut impl Write,
    pretty: bool,
) -> Result<usize> {
    let mut step = 0;
    while let Some(event) = events.recv().await {
        step += 1;
        if let Err(e) = tokio::task::block_in_place(|| session.dispatch(event.clone())) {
            warn!(?event, "event failed: {}", e);
        }
        emit(out, step, "event", session, pretty)?;

        if session.has_pending_corrections() {
            tokio::task::yield_now().await;
            session.run_deferred();
            emit(out, step, "deferred", session, pretty)?;
        }
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimbar_core::settings::preset_default;
    use trimbar_core::types::Handle;

    fn session() -> TrimSession {
        TrimSession::new(
            preset_default(),
            Box::new(LoggingPlayback),
            Box::new(LoggingDialogs),
        )
        .unwrap()
    }

    async fn replay(
        session: &mut TrimSession,
        events: Vec<SessionEvent>,
    ) -> Vec<serde_json::Value> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for event in events {
                tx.send(event).await.unwrap();
            }
        });

        let mut out = Vec::new();
        run_event_loop(session, rx, &mut out, false).await.unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn track_bar_overshoot_emits_deferred_frame() {
        let mut session = session();
        session.seed_range(200, 700).unwrap();
        let frames = replay(
            &mut session,
            vec![
                SessionEvent::MetadataReady { duration: 200.0 },
                SessionEvent::DragStart {
                    handle: Handle::TrackBar,
                },
                SessionEvent::DragEnd {
                    handle: Handle::TrackBar,
                    distance_x: 400,
                    free_drag_x: 0,
                },
            ],
        )
        .await;

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[2]["phase"], "event");
        assert_eq!(frames[2]["snapshot"]["timeline"]["track_bar_pixel"], 700);
        assert_eq!(frames[3]["phase"], "deferred");
        assert_eq!(frames[3]["step"], 3);
        assert_eq!(frames[3]["snapshot"]["timeline"]["track_bar_pixel"], 200);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn committed_drag_has_no_deferred_frame() {
        let mut session = session();
        session.seed_range(0, 1024).unwrap();
        let frames = replay(
            &mut session,
            vec![
                SessionEvent::MetadataReady { duration: 200.0 },
                SessionEvent::DragEnd {
                    handle: Handle::End,
                    distance_x: -512,
                    free_drag_x: 0,
                },
                SessionEvent::Play,
                SessionEvent::OpenCommentDialog,
            ],
        )
        .await;

        assert_eq!(frames.len(), 4);
        assert!(frames.iter().all(|f| f["phase"] == "event"));
        assert_eq!(frames[1]["snapshot"]["timeline"]["end_pixel"], 512);
        assert_eq!(frames[1]["snapshot"]["timeline"]["end_time_string"], "01:40");
    }
}
