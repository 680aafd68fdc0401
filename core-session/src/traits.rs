//! # Streaming Backend Contract
//!
//! [`StreamingSource`] is the seam between this core and the actual
//! streaming-media backend. The backend owns networking, authentication,
//! and decoding; this crate sees it only as "resolves links, reports load
//! status, accepts play/seek commands". Decoded audio does not flow through
//! this trait; the backend delivers it from its own thread via
//! [`SourceFeed`](crate::SourceFeed).
//!
//! All methods take `&mut self`: exclusivity is provided by
//! [`SessionGuard`](crate::SessionGuard), which is the only caller.

use std::time::Duration;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Opaque handle to a track resolved by the backend.
///
/// Issued by [`StreamingSource::resolve_link`]; meaningful only to the
/// backend that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackHandle(u64);

impl TrackHandle {
    /// Wrap a backend-issued id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The backend-issued id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Load status of a resolved track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackStatus {
    /// Resolution still in progress; poll again.
    Loading,
    /// Track metadata is available and playback can start.
    Ready,
    /// Resolution failed; the message comes from the backend.
    Failed(String),
}

/// Descriptive metadata for an open track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackMetadata {
    /// Track title.
    pub title: String,
    /// Primary artist name.
    pub artist: String,
    /// Album name.
    pub album: String,
    /// The locator string the track was opened with.
    pub link: String,
    /// Total track duration, if the backend knows it.
    pub duration: Option<Duration>,
}

/// Format of the most recently pulled audio, reported to the host for
/// dynamic display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// The streaming backend, as seen from the session core.
///
/// Implementations are free to block briefly inside each method (every call
/// happens under the session lock), but must never wait on the handoff
/// buffer from here; the decode side pushes entries from its own thread.
///
/// `track_status` must stay cheap: the open path polls it repeatedly while
/// the backend resolves a track.
#[cfg_attr(test, automock)]
pub trait StreamingSource: Send {
    /// Resolve a locator string into a track handle.
    ///
    /// # Errors
    ///
    /// [`InvalidLink`](crate::SessionError::InvalidLink) when the string is
    /// not parseable, [`NotATrack`](crate::SessionError::NotATrack) when it
    /// parses but names something unplayable.
    fn resolve_link(&mut self, link: &str) -> Result<TrackHandle>;

    /// Current load status of a resolved track. Cheap and pollable.
    fn track_status(&mut self, track: &TrackHandle) -> TrackStatus;

    /// Metadata for a track whose status has reached [`TrackStatus::Ready`].
    fn metadata(&mut self, track: &TrackHandle) -> Result<TrackMetadata>;

    /// Load the track into the session's player and start decoding.
    ///
    /// Decoded entries begin arriving on the backend's thread via the feed
    /// registered with it.
    fn load_and_play(&mut self, track: &TrackHandle) -> Result<()>;

    /// Reposition decoding to an absolute offset in the current track.
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Release player interest in the current track.
    fn stop(&mut self) -> Result<()>;
}
