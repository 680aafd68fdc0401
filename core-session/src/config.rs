//! # Session Configuration
//!
//! Configuration, credentials, and the per-track state enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Session configuration.
///
/// Controls handoff buffer sizing and the track-resolution poll cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Entry slots in the handoff buffer.
    ///
    /// Default: 255.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Initial delay between track-resolution polls.
    ///
    /// Default: 50 ms.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Upper bound for the poll delay; each unproductive poll doubles the
    /// delay up to this value.
    ///
    /// Default: 400 ms.
    #[serde(default = "default_max_poll_interval")]
    pub max_poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            poll_interval: default_poll_interval(),
            max_poll_interval: default_max_poll_interval(),
        }
    }
}

impl SessionConfig {
    /// Preset tuned for snappy open/cancel response.
    ///
    /// - Small buffer (fast flush, low latency on seek)
    /// - Tight poll cadence with a low backoff ceiling
    pub fn responsive() -> Self {
        Self {
            buffer_capacity: 64,
            poll_interval: Duration::from_millis(10),
            max_poll_interval: Duration::from_millis(80),
        }
    }

    /// Preset tuned for slow backends.
    ///
    /// - Default buffer
    /// - Relaxed polling so a slow resolver is not hammered
    pub fn patient() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_poll_interval: Duration::from_secs(1),
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_capacity == 0 {
            return Err("buffer_capacity must be > 0".to_string());
        }

        if self.poll_interval.is_zero() {
            return Err("poll_interval must be > 0".to_string());
        }

        if self.max_poll_interval < self.poll_interval {
            return Err("max_poll_interval cannot be below poll_interval".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_buffer_capacity() -> usize {
    core_handoff::DEFAULT_CAPACITY
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(50)
}

fn default_max_poll_interval() -> Duration {
    Duration::from_millis(400)
}

// ============================================================================
// Credentials
// ============================================================================

/// Backend login credentials.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create credentials from owned strings.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Track State
// ============================================================================

/// Per-track state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackState {
    /// No track open.
    Unopened,
    /// Resolving the locator into a track handle.
    Opening,
    /// Waiting for the backend to finish loading track metadata.
    Loading,
    /// Track resolved; playback not started.
    Ready,
    /// Decoding and filling the handoff buffer.
    Playing,
    /// A seek is in flight.
    Seeking,
    /// The consumer observed the end-of-stream sentinel.
    Ended,
    /// An input or session error stopped this track.
    Failed,
}

impl TrackState {
    /// `true` while the track is usable or becoming usable.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Opening | Self::Loading | Self::Ready | Self::Playing | Self::Seeking
        )
    }

    /// `true` once this track can no longer produce audio.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Failed)
    }
}
