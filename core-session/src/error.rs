//! # Session Error Types
//!
//! Error taxonomy for session and playback-control operations.

use thiserror::Error;

/// Errors surfaced by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    // ========================================================================
    // Input Errors (fatal to the single open attempt, not to the session)
    // ========================================================================
    /// The locator string could not be parsed by the backend.
    #[error("link not parseable: {0}")]
    InvalidLink(String),

    /// The locator parsed but does not refer to a playable track.
    #[error("link is not a track: {0}")]
    NotATrack(String),

    /// The backend reported an error while resolving the track.
    #[error("track failed to load: {0}")]
    TrackLoadFailed(String),

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// The backend session entered an unrecoverable state.
    #[error("session failed: {0}")]
    SessionFatal(String),

    /// The handoff buffer was full and the entry was not queued.
    #[error("handoff buffer full, entry dropped by caller")]
    Backpressure,

    // ========================================================================
    // Control
    // ========================================================================
    /// The operation was cancelled by the host. Not a failure: buffer and
    /// session state are left consistent.
    #[error("operation cancelled")]
    Cancelled,

    /// A track-scoped operation was called with no track open.
    #[error("no track loaded")]
    NoTrackLoaded,

    /// A playback-only operation was called before playback started.
    #[error("track is not playing")]
    NotPlaying,

    /// Session configuration failed validation.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// `true` for errors caused by the input locator rather than the
    /// session; these abort one open attempt only.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidLink(_)
                | SessionError::NotATrack(_)
                | SessionError::TrackLoadFailed(_)
        )
    }

    /// `true` when the shared session itself is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::SessionFatal(_))
    }

    /// `true` for a clean host-requested unwind.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionError::Cancelled)
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
