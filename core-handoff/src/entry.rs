//! Decoded audio entries.
//!
//! An [`Entry`] is the unit of exchange between the decode thread and the
//! playback puller: an owned byte payload plus the format needed to
//! interpret it. An entry with an empty payload is the end-of-stream
//! sentinel; the consumer treats it as "no more data for this track", never
//! as an error.

use bytes::Bytes;

/// One decoded audio unit, or the end-of-stream sentinel.
///
/// Ownership moves producer → buffer → consumer; the entry is dropped by
/// whoever holds it last (the consumer after conversion, or the buffer on
/// flush).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    payload: Bytes,
    sample_rate: u32,
    channels: u16,
}

impl Entry {
    /// Create a data entry from decoded PCM bytes.
    ///
    /// `sample_rate` and `channels` describe the payload; callers hand in
    /// fully populated entries, the buffer never fills fields in.
    pub fn pcm(payload: impl Into<Bytes>, sample_rate: u32, channels: u16) -> Self {
        Self {
            payload: payload.into(),
            sample_rate,
            channels,
        }
    }

    /// The end-of-stream sentinel: empty payload, zeroed format.
    pub fn end_of_stream() -> Self {
        Self {
            payload: Bytes::new(),
            sample_rate: 0,
            channels: 0,
        }
    }

    /// `true` if this entry is the end-of-stream sentinel.
    pub fn is_end_of_stream(&self) -> bool {
        self.payload.is_empty()
    }

    /// Decoded PCM bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes. Zero only for the sentinel.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// `true` if the payload is empty (i.e. the sentinel).
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Sample rate of the payload in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count of the payload.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Consume the entry, keeping only the payload.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}
