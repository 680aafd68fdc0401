//! # Session Guard
//!
//! Exclusive-access wrapper around the single shared [`StreamingSource`]
//! handle. Every thread that touches the session (the backend's event
//! thread, the playback puller issuing control calls, and out-of-band
//! open/seek/teardown) goes through one of these methods, so no two
//! session operations ever interleave.
//!
//! Each method acquires the lock for exactly its own body and releases it
//! on every exit path (the guard is scoped). None of them touch the
//! handoff buffer, which is what makes "never hold the session lock across
//! a buffer wait" structural rather than a convention at call sites.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::Result;
use crate::traits::{StreamingSource, TrackHandle, TrackMetadata, TrackStatus};

/// Cloneable serializing wrapper over the shared session handle.
pub struct SessionGuard<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SessionGuard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StreamingSource> SessionGuard<S> {
    /// Take ownership of the session handle.
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Resolve a locator string into a track handle.
    pub fn resolve_link(&self, link: &str) -> Result<TrackHandle> {
        self.inner.lock().resolve_link(link)
    }

    /// Poll the load status of a resolved track.
    ///
    /// Cheap by contract; the caller owns the wait/retry loop and its
    /// cancellation.
    pub fn track_status(&self, track: &TrackHandle) -> TrackStatus {
        self.inner.lock().track_status(track)
    }

    /// Fetch metadata for a ready track.
    pub fn metadata(&self, track: &TrackHandle) -> Result<TrackMetadata> {
        self.inner.lock().metadata(track)
    }

    /// Load the track into the player and start decoding.
    pub fn load_and_play(&self, track: &TrackHandle) -> Result<()> {
        self.inner.lock().load_and_play(track)
    }

    /// Reposition decoding to `position` in the current track.
    pub fn seek(&self, position: Duration) -> Result<()> {
        self.inner.lock().seek(position)
    }

    /// Release player interest in the current track.
    pub fn stop(&self) -> Result<()> {
        self.inner.lock().stop()
    }

    /// Run an arbitrary closure under the session lock.
    ///
    /// For backend event processing that needs the same exclusion domain as
    /// the named operations. The closure must not wait on the handoff
    /// buffer.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
