//! # Bounded blocking handoff buffer
//!
//! A fixed-capacity FIFO ring of [`Entry`] slots shared between one
//! producer thread and one consumer thread. All ring state lives under a
//! single mutex; two condition variables carry the "not empty" and
//! "not full" edges.
//!
//! ## Design
//!
//! - **FIFO**: entries come out in exactly the order they went in; decoded
//!   audio order encodes temporal order.
//! - **Backpressure**: a full buffer never overwrites an unconsumed slot.
//!   [`HandoffBuffer::push`] blocks the producer until a slot frees;
//!   [`HandoffBuffer::try_push`] rejects and hands the entry back.
//! - **Flush**: [`HandoffBuffer::flush`] drains every queued entry without
//!   blocking and is safe against concurrent pushes; it is the seek and
//!   track-change boundary.
//!
//! ## Usage
//!
//! ```rust
//! use core_handoff::{Entry, HandoffBuffer};
//!
//! let buffer = HandoffBuffer::new(8);
//!
//! // Producer thread: hand over a decoded chunk, then signal the end.
//! buffer.push(Entry::pcm(vec![0u8; 4096], 44100, 2));
//! buffer.push(Entry::end_of_stream());
//!
//! // Consumer thread: pull until the sentinel shows up.
//! while !buffer.take().is_end_of_stream() {}
//! ```

use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::entry::Entry;
use crate::error::TryPushError;

/// Default slot count, sized for roughly a second of typical decode chunks.
pub const DEFAULT_CAPACITY: usize = 255;

/// How often a cancellable wait re-checks its token.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(25);

/// Counters describing buffer traffic since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Entries accepted by `push`/`try_push`.
    pub pushed: u64,
    /// Entries handed to the consumer by `take`/`take_until`.
    pub taken: u64,
    /// Entries rejected by `try_push` on a full buffer.
    pub rejected: u64,
    /// Entries discarded by `flush`.
    pub flushed: u64,
    /// Number of `flush` calls.
    pub flushes: u64,
}

struct Ring {
    slots: Vec<Option<Entry>>,
    head: usize,
    occupied: usize,
    stats: BufferStats,
}

impl Ring {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_full(&self) -> bool {
        self.occupied == self.capacity()
    }

    /// Write at the logical tail. Caller must have checked occupancy.
    fn push_tail(&mut self, entry: Entry) {
        let tail = (self.head + self.occupied) % self.capacity();
        debug_assert!(self.slots[tail].is_none());
        self.slots[tail] = Some(entry);
        self.occupied += 1;
        self.stats.pushed += 1;
    }

    /// Remove the logical head entry, or `None` when empty.
    fn pop_head(&mut self) -> Option<Entry> {
        if self.occupied == 0 {
            return None;
        }
        let entry = self.slots[self.head]
            .take()
            .expect("occupied slot must hold an entry");
        self.head = (self.head + 1) % self.capacity();
        self.occupied -= 1;
        self.stats.taken += 1;
        Some(entry)
    }
}

/// Bounded blocking FIFO carrying decoded audio entries from the decode
/// thread to the playback puller.
///
/// Single-producer, single-consumer per instance. Long-lived: created once
/// per playback session, flushed (not recreated) across tracks and seeks.
pub struct HandoffBuffer {
    state: Mutex<Ring>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl HandoffBuffer {
    /// Create a buffer with `capacity` entry slots.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero. A zero-slot ring could neither
    /// accept nor deliver an entry, so `push` and `take` would both block
    /// forever.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "handoff buffer capacity must be at least 1");
        Self {
            state: Mutex::new(Ring {
                slots: (0..capacity).map(|_| None).collect(),
                head: 0,
                occupied: 0,
                stats: BufferStats::default(),
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Insert one entry at the logical tail, blocking while the buffer is
    /// full.
    ///
    /// Wakes exactly one waiting consumer. A concurrent [`flush`] frees
    /// every slot and unblocks a producer parked here.
    ///
    /// [`flush`]: HandoffBuffer::flush
    pub fn push(&self, entry: Entry) {
        let mut ring = self.state.lock();
        while ring.is_full() {
            self.not_full.wait(&mut ring);
        }
        ring.push_tail(entry);
        trace!(occupied = ring.occupied, "pushed entry");
        drop(ring);
        self.not_empty.notify_one();
    }

    /// Insert one entry at the logical tail, rejecting when full.
    ///
    /// The rejected entry travels back inside the error so the caller
    /// decides its fate; ring state is untouched by a rejection.
    pub fn try_push(&self, entry: Entry) -> Result<(), TryPushError> {
        let mut ring = self.state.lock();
        if ring.is_full() {
            ring.stats.rejected += 1;
            let capacity = ring.capacity();
            drop(ring);
            debug!(capacity, "rejected push on full handoff buffer");
            return Err(TryPushError::Full { entry, capacity });
        }
        ring.push_tail(entry);
        drop(ring);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the entry at the logical head, blocking while the
    /// buffer is empty.
    ///
    /// Never returns a "no data" value: end of stream arrives as the
    /// sentinel entry pushed by the producer.
    pub fn take(&self) -> Entry {
        let mut ring = self.state.lock();
        loop {
            if let Some(entry) = ring.pop_head() {
                drop(ring);
                self.not_full.notify_one();
                return entry;
            }
            self.not_empty.wait(&mut ring);
        }
    }

    /// Cancellable [`take`](HandoffBuffer::take).
    ///
    /// Returns `None` once `cancel` is triggered; cancellation is observed
    /// within one check interval even if no entry ever arrives.
    pub fn take_until(&self, cancel: &CancellationToken) -> Option<Entry> {
        let mut ring = self.state.lock();
        loop {
            if let Some(entry) = ring.pop_head() {
                drop(ring);
                self.not_full.notify_one();
                return Some(entry);
            }
            if cancel.is_cancelled() {
                return None;
            }
            let _ = self.not_empty.wait_for(&mut ring, CANCEL_CHECK_INTERVAL);
        }
    }

    /// Drain and drop every queued entry without blocking.
    ///
    /// Returns the number of entries discarded. All `not_full` waiters are
    /// woken, so a producer blocked mid-`push` proceeds into the emptied
    /// ring. Consumers blocked in `take` stay parked until the next push.
    pub fn flush(&self) -> usize {
        let mut ring = self.state.lock();
        let drained = ring.occupied;
        for slot in ring.slots.iter_mut() {
            *slot = None;
        }
        ring.head = 0;
        ring.occupied = 0;
        ring.stats.flushed += drained as u64;
        ring.stats.flushes += 1;
        drop(ring);
        self.not_full.notify_all();
        if drained > 0 {
            debug!(drained, "flushed handoff buffer");
        }
        drained
    }

    /// Advisory: `true` when every slot is occupied.
    ///
    /// Producers may use this to pause decoding early; the no-overwrite
    /// guarantee does not depend on it; `push`/`try_push` re-check under
    /// the lock.
    pub fn is_full(&self) -> bool {
        self.state.lock().is_full()
    }

    /// Advisory: `true` when no entry is queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().occupied == 0
    }

    /// Number of currently occupied slots.
    pub fn occupied(&self) -> usize {
        self.state.lock().occupied
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity()
    }

    /// Snapshot of the traffic counters.
    pub fn stats(&self) -> BufferStats {
        self.state.lock().stats
    }
}

impl Default for HandoffBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
