//! Handoff buffer error types.

use crate::entry::Entry;
use thiserror::Error;

/// Error returned by [`HandoffBuffer::try_push`](crate::HandoffBuffer::try_push).
///
/// The rejected entry is handed back to the caller so it can be retried,
/// dropped deliberately, or routed elsewhere; the buffer never discards
/// data on the caller's behalf.
#[derive(Error, Debug)]
pub enum TryPushError {
    /// Every slot is occupied; the entry was not queued.
    #[error("handoff buffer full ({capacity} entries)")]
    Full {
        /// The entry that could not be queued.
        entry: Entry,
        /// Buffer capacity at the time of rejection.
        capacity: usize,
    },
}

impl TryPushError {
    /// Recover the rejected entry.
    pub fn into_entry(self) -> Entry {
        match self {
            TryPushError::Full { entry, .. } => entry,
        }
    }
}
