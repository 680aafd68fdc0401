//! # Per-Track Session
//!
//! [`TrackSession`] drives one track at a time through the session's state
//! machine and is the surface the host playback engine calls:
//!
//! ```text
//! Unopened → Opening → Loading → Ready → Playing ⇄ Seeking
//!                                           │
//!                                           ├─→ Ended   (sentinel pulled)
//!                                           └─→ Failed  (input/session error)
//! ```
//!
//! The decode side never touches `TrackSession`: the backend is handed a
//! [`SourceFeed`] and pushes decoded entries (or the end-of-stream
//! sentinel, or a fatal-error signal) from its own thread.
//!
//! Locking discipline: buffer flushes always happen *before* guard calls,
//! and no guard call waits on the buffer, so the session lock is never held
//! across a buffer wait.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use core_handoff::{Entry, FatalFlag, HandoffBuffer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{SessionConfig, TrackState};
use crate::error::{Result, SessionError};
use crate::guard::SessionGuard;
use crate::traits::{PlaybackFormat, StreamingSource, TrackHandle, TrackMetadata, TrackStatus};

// ============================================================================
// SourceFeed (producer side)
// ============================================================================

/// Producer-side handle registered with the streaming backend.
///
/// The backend's decode thread calls [`produce`](SourceFeed::produce) for
/// each decoded chunk, [`end_of_stream`](SourceFeed::end_of_stream) when the
/// track runs out, and [`notify_fatal_error`](SourceFeed::notify_fatal_error)
/// when the session becomes unusable. Cloneable; all clones feed the same
/// buffer.
#[derive(Clone)]
pub struct SourceFeed {
    buffer: Arc<HandoffBuffer>,
    fatal: FatalFlag,
}

impl SourceFeed {
    /// Hand one decoded entry to the consumer, blocking while the buffer
    /// is full.
    pub fn produce(&self, entry: Entry) {
        self.buffer.push(entry);
    }

    /// Hand one decoded entry to the consumer, reporting backpressure
    /// instead of blocking. The entry is dropped on rejection.
    pub fn try_produce(&self, entry: Entry) -> Result<()> {
        self.buffer
            .try_push(entry)
            .map_err(|_| SessionError::Backpressure)
    }

    /// Signal that the current track has no more data.
    pub fn end_of_stream(&self) {
        self.buffer.push(Entry::end_of_stream());
    }

    /// Signal an unrecoverable session failure. Subsequent pulls fail fast.
    pub fn notify_fatal_error(&self) {
        self.fatal.trip();
    }

    /// Advisory: `true` while the buffer has room for another entry.
    ///
    /// Lets the backend pause decoding early; `produce` enforces the bound
    /// regardless.
    pub fn wants_more(&self) -> bool {
        !self.buffer.is_full()
    }
}

// ============================================================================
// TrackSession (consumer / control side)
// ============================================================================

/// State machine and host-facing surface for one track of the shared
/// streaming session.
///
/// Long-lived: one `TrackSession` serves successive tracks; the handoff
/// buffer is flushed, never recreated, across track changes and seeks.
pub struct TrackSession<S: StreamingSource> {
    guard: SessionGuard<S>,
    buffer: Arc<HandoffBuffer>,
    fatal: FatalFlag,
    config: SessionConfig,
    state: TrackState,
    track: Option<TrackHandle>,
    format: Option<PlaybackFormat>,
}

impl<S: StreamingSource> std::fmt::Debug for TrackSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackSession")
            .field("state", &self.state)
            .field("track", &self.track)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl<S: StreamingSource> TrackSession<S> {
    /// Wrap a backend session handle.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidConfig`] when `config` fails validation.
    pub fn new(source: S, config: SessionConfig) -> Result<Self> {
        config.validate().map_err(SessionError::InvalidConfig)?;
        Ok(Self {
            guard: SessionGuard::new(source),
            buffer: Arc::new(HandoffBuffer::new(config.buffer_capacity)),
            fatal: FatalFlag::new(),
            config,
            state: TrackState::Unopened,
            track: None,
            format: None,
        })
    }

    /// Producer-side handle to register with the backend.
    pub fn feed(&self) -> SourceFeed {
        SourceFeed {
            buffer: Arc::clone(&self.buffer),
            fatal: self.fatal.clone(),
        }
    }

    /// The guard serializing session access, for backend event plumbing
    /// that shares the same exclusion domain.
    pub fn guard(&self) -> SessionGuard<S> {
        self.guard.clone()
    }

    /// Current track state.
    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Format of the most recently pulled entry, if any.
    pub fn playback_format(&self) -> Option<PlaybackFormat> {
        self.format
    }

    /// The handoff buffer, for host-side occupancy probes.
    pub fn buffer(&self) -> Arc<HandoffBuffer> {
        Arc::clone(&self.buffer)
    }

    /// Resolve a locator and wait until the backend has the track loaded.
    ///
    /// Polls [`StreamingSource::track_status`] with bounded backoff,
    /// checking `cancel` every cycle; cancellation is honored within one
    /// poll interval and restores the `Unopened` state.
    ///
    /// # Errors
    ///
    /// Input errors ([`InvalidLink`](SessionError::InvalidLink),
    /// [`NotATrack`](SessionError::NotATrack),
    /// [`TrackLoadFailed`](SessionError::TrackLoadFailed)) abort this open
    /// attempt only. [`Cancelled`](SessionError::Cancelled) is a clean
    /// unwind, not a failure.
    pub fn open(&mut self, link: &str, cancel: &CancellationToken) -> Result<TrackHandle> {
        // A re-open abandons the previous track; its handle must not
        // survive into a failed or cancelled attempt.
        self.track = None;
        self.format = None;
        self.state = TrackState::Opening;
        debug!(link, "resolving link");
        let track = match self.guard.resolve_link(link) {
            Ok(track) => track,
            Err(e) => {
                self.state = TrackState::Failed;
                warn!(link, error = %e, "link did not resolve");
                return Err(e);
            }
        };

        self.state = TrackState::Loading;
        let mut delay = self.config.poll_interval;
        loop {
            if cancel.is_cancelled() {
                self.state = TrackState::Unopened;
                debug!(link, "open cancelled while loading");
                return Err(SessionError::Cancelled);
            }
            if self.fatal.is_tripped() {
                self.state = TrackState::Failed;
                return Err(SessionError::SessionFatal(
                    "session failed while loading track".to_string(),
                ));
            }

            match self.guard.track_status(&track) {
                TrackStatus::Ready => break,
                TrackStatus::Failed(message) => {
                    self.state = TrackState::Failed;
                    warn!(link, %message, "track failed to load");
                    return Err(SessionError::TrackLoadFailed(message));
                }
                TrackStatus::Loading => {}
            }

            thread::sleep(delay);
            delay = (delay * 2).min(self.config.max_poll_interval);
        }

        self.state = TrackState::Ready;
        self.track = Some(track);
        info!(link, track = track.id(), "track ready");
        Ok(track)
    }

    /// Metadata for the open track.
    pub fn metadata(&self) -> Result<TrackMetadata> {
        let track = self.track.ok_or(SessionError::NoTrackLoaded)?;
        self.guard.metadata(&track)
    }

    /// Start (or restart) playback of the open track.
    ///
    /// Flushes the buffer first: anything still queued belongs to a
    /// previous track or a previous run of this one.
    pub fn start(&mut self) -> Result<()> {
        let track = self.track.ok_or(SessionError::NoTrackLoaded)?;
        self.buffer.flush();
        if let Err(e) = self.guard.load_and_play(&track) {
            self.state = TrackState::Failed;
            return Err(e);
        }
        self.state = TrackState::Playing;
        info!(track = track.id(), "playback started");
        Ok(())
    }

    /// Pull the next decoded entry, blocking until the producer delivers.
    ///
    /// Returns `Ok(None)` when the end-of-stream sentinel arrives: the
    /// track is over, not broken. Checks the fatal flag before blocking so
    /// a dead session fails fast instead of waiting forever.
    pub fn pull_frame(&mut self) -> Result<Option<Entry>> {
        self.check_fatal()?;
        let entry = self.buffer.take();
        Ok(self.accept(entry))
    }

    /// Cancellable [`pull_frame`](TrackSession::pull_frame) for hosts that
    /// must stay responsive to shutdown.
    pub fn pull_frame_until(&mut self, cancel: &CancellationToken) -> Result<Option<Entry>> {
        self.check_fatal()?;
        match self.buffer.take_until(cancel) {
            Some(entry) => Ok(self.accept(entry)),
            None => Err(SessionError::Cancelled),
        }
    }

    /// Reposition playback to an absolute offset.
    ///
    /// Only valid while playing: a track that has not been started has no
    /// decode position to move. Flushes the buffer before issuing the
    /// seek, so every entry a later pull returns was decoded at the new
    /// position.
    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        if self.track.is_none() {
            return Err(SessionError::NoTrackLoaded);
        }
        if !matches!(self.state, TrackState::Playing | TrackState::Seeking) {
            return Err(SessionError::NotPlaying);
        }
        self.state = TrackState::Seeking;
        self.buffer.flush();
        if let Err(e) = self.guard.seek(position) {
            self.state = TrackState::Failed;
            return Err(e);
        }
        self.state = TrackState::Playing;
        debug!(?position, "seek complete");
        Ok(())
    }

    /// Tear down the current track: discard queued audio and release the
    /// backend's player interest. The session object stays usable for the
    /// next `open`.
    pub fn close(&mut self) -> Result<()> {
        self.buffer.flush();
        let result = match self.track.take() {
            Some(_) => self.guard.stop(),
            None => Ok(()),
        };
        self.state = TrackState::Unopened;
        self.format = None;
        debug!("track closed");
        result
    }

    fn check_fatal(&mut self) -> Result<()> {
        if self.fatal.is_tripped() {
            self.state = TrackState::Failed;
            return Err(SessionError::SessionFatal(
                "session failed during playback".to_string(),
            ));
        }
        Ok(())
    }

    fn accept(&mut self, entry: Entry) -> Option<Entry> {
        if entry.is_end_of_stream() {
            self.state = TrackState::Ended;
            info!("end of stream");
            return None;
        }
        self.format = Some(PlaybackFormat {
            sample_rate: entry.sample_rate(),
            channels: entry.channels(),
        });
        Some(entry)
    }
}
