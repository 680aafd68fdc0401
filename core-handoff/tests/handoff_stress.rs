//! Cross-thread behavior of the handoff buffer: wakeups, backpressure
//! blocking, ordering under contention, and flush racing a producer.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use core_handoff::{Entry, HandoffBuffer};
use tokio_util::sync::CancellationToken;

fn seq_entry(seq: u32) -> Entry {
    Entry::pcm(seq.to_be_bytes().to_vec(), 44100, 2)
}

fn seq_of(entry: &Entry) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&entry.payload()[..4]);
    u32::from_be_bytes(bytes)
}

#[test]
fn consumer_blocked_before_first_push_is_woken() {
    let buffer = Arc::new(HandoffBuffer::new(4));

    let consumer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || buffer.take())
    };

    // Give the consumer time to park in take() before anything exists.
    thread::sleep(Duration::from_millis(50));
    buffer.push(seq_entry(1));

    let entry = consumer.join().unwrap();
    assert_eq!(seq_of(&entry), 1);
}

#[test]
fn producer_blocked_on_full_buffer_resumes_after_take() {
    let buffer = Arc::new(HandoffBuffer::new(2));
    buffer.push(seq_entry(1));
    buffer.push(seq_entry(2));
    assert!(buffer.is_full());

    let (started_tx, started_rx) = mpsc::channel();
    let producer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            started_tx.send(()).unwrap();
            buffer.push(seq_entry(3));
        })
    };

    started_rx.recv().unwrap();
    // The producer must still be parked: occupancy never exceeds capacity.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(buffer.occupied(), 2);

    assert_eq!(seq_of(&buffer.take()), 1);
    producer.join().unwrap();

    assert_eq!(seq_of(&buffer.take()), 2);
    assert_eq!(seq_of(&buffer.take()), 3);
}

#[test]
fn producer_blocked_on_full_buffer_resumes_after_flush() {
    let buffer = Arc::new(HandoffBuffer::new(2));
    buffer.push(seq_entry(1));
    buffer.push(seq_entry(2));

    let producer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || buffer.push(seq_entry(3)))
    };

    thread::sleep(Duration::from_millis(50));
    let drained = buffer.flush();
    assert_eq!(drained, 2);

    producer.join().unwrap();
    // Only the post-flush entry remains.
    assert_eq!(buffer.occupied(), 1);
    assert_eq!(seq_of(&buffer.take()), 3);
}

#[test]
fn fifo_and_bounded_occupancy_under_contention() {
    const TOTAL: u32 = 2000;
    let buffer = Arc::new(HandoffBuffer::new(8));

    let producer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            for seq in 0..TOTAL {
                buffer.push(seq_entry(seq));
                // Irregular pacing to exercise both full and empty edges.
                if seq % 97 == 0 {
                    thread::sleep(Duration::from_micros(200));
                }
            }
        })
    };

    let consumer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            for expected in 0..TOTAL {
                let entry = buffer.take();
                assert_eq!(seq_of(&entry), expected, "entries reordered");
                assert!(buffer.occupied() <= buffer.capacity());
                if expected % 131 == 0 {
                    thread::sleep(Duration::from_micros(300));
                }
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();

    let stats = buffer.stats();
    assert_eq!(stats.pushed, u64::from(TOTAL));
    assert_eq!(stats.taken, u64::from(TOTAL));
    assert_eq!(stats.rejected, 0);
    assert!(buffer.is_empty());
}

#[test]
fn flush_races_pushes_without_losing_or_duplicating() {
    const TOTAL: u32 = 500;
    let buffer = Arc::new(HandoffBuffer::new(4));

    let producer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            for seq in 0..TOTAL {
                buffer.push(seq_entry(seq));
            }
            // Unblocks any final consumer-side accounting below.
            buffer.push(Entry::end_of_stream());
        })
    };

    // Flush until the producer is done, so a producer blocked on a full
    // buffer is always freed by a flush rather than a take.
    let producer_done = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flusher = {
        let buffer = Arc::clone(&buffer);
        let producer_done = Arc::clone(&producer_done);
        thread::spawn(move || {
            while !producer_done.load(std::sync::atomic::Ordering::Acquire) {
                buffer.flush();
                thread::sleep(Duration::from_micros(500));
            }
        })
    };

    producer.join().unwrap();
    producer_done.store(true, std::sync::atomic::Ordering::Release);
    flusher.join().unwrap();

    // Drain whatever survived the flushes.
    while !buffer.is_empty() {
        let _ = buffer.take();
    }

    // Every pushed entry was either taken or flushed, exactly once.
    let stats = buffer.stats();
    assert_eq!(stats.pushed, stats.taken + stats.flushed);
    assert_eq!(stats.pushed, u64::from(TOTAL) + 1);
}

#[test]
fn take_until_unblocks_on_late_cancellation() {
    let buffer = Arc::new(HandoffBuffer::new(4));
    let token = CancellationToken::new();

    let consumer = {
        let buffer = Arc::clone(&buffer);
        let token = token.clone();
        thread::spawn(move || buffer.take_until(&token))
    };

    thread::sleep(Duration::from_millis(60));
    token.cancel();
    assert!(consumer.join().unwrap().is_none());
}

#[test]
fn take_until_prefers_data_over_cancellation_when_both_race() {
    let buffer = Arc::new(HandoffBuffer::new(4));
    let token = CancellationToken::new();
    buffer.push(seq_entry(42));
    token.cancel();

    // Data already queued is delivered even on a cancelled token.
    let entry = buffer.take_until(&token).unwrap();
    assert_eq!(seq_of(&entry), 42);
    assert!(buffer.take_until(&token).is_none());
}
