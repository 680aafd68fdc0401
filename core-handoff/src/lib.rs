//! # Audio Handoff Buffer
//!
//! Bounded, blocking handoff of decoded audio entries between a producer
//! (the streaming backend's decode thread) and a consumer (the playback
//! puller). The two sides run on independent threads at independent rates;
//! this crate owns the only queue between them.
//!
//! ## Overview
//!
//! - [`Entry`]: one decoded audio unit, or the end-of-stream sentinel
//! - [`HandoffBuffer`]: fixed-capacity FIFO ring with blocking push/take
//! - [`FatalFlag`]: set-once failure signal shared across both sides

pub mod buffer;
pub mod entry;
pub mod error;
pub mod flag;

pub use buffer::{BufferStats, HandoffBuffer, DEFAULT_CAPACITY};
pub use entry::Entry;
pub use error::TryPushError;
pub use flag::FatalFlag;
