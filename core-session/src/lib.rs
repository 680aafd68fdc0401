//! # Streaming Session Core
//!
//! Serialized access to a single long-lived streaming-media session shared
//! by three kinds of callers: the backend's decode/event thread, the
//! playback puller, and out-of-band control calls (open, seek, teardown).
//!
//! ## Overview
//!
//! - [`StreamingSource`]: the backend contract; the only thing this crate
//!   knows about networking, authentication, or codecs
//! - [`SessionGuard`]: exclusive-access wrapper serializing every call
//!   into the shared session handle
//! - [`TrackSession`]: per-track state machine and host-facing surface
//!   (open, pull, seek, close)
//! - [`SourceFeed`]: producer-side handle routing decoded entries and
//!   fatal-error signals into the handoff buffer
//!
//! Decoded audio moves through [`core_handoff::HandoffBuffer`]; this crate
//! never holds the session lock while waiting on that buffer.

pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod traits;

pub use config::{Credentials, SessionConfig, TrackState};
pub use error::{Result, SessionError};
pub use guard::SessionGuard;
pub use session::{SourceFeed, TrackSession};
pub use traits::{PlaybackFormat, StreamingSource, TrackHandle, TrackMetadata, TrackStatus};
