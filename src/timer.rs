// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tick-driven retry/backoff scheduling facility.
//!
//! The core never blocks: all waiting is expressed via the timer facility,
//! which schedules callbacks after a tick count. Callers
//! (the PSMP FSM, SPDP lease tracking, CTT remembered-token expiry) arm a
//! timer with a deadline and an opaque token identifying what to do when
//! it fires; a single driver thread (or an external caller, in tests)
//! advances the wheel and drains due timers without ever touching
//! application code while holding the domain lock.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Opaque identifier for an armed timer, returned by [`TimerWheel::arm`] so
/// the caller can cancel it before it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Entry<T> {
    deadline: Instant,
    id: TimerId,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}
impl<T> Eq for Entry<T> {}
impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.deadline, self.id).cmp(&(other.deadline, other.id))
    }
}

/// Min-heap of pending deadlines, keyed by opaque payload `T` (typically
/// an enum identifying which FSM/peer/state the timeout belongs to).
///
/// Cancellation is lazy: a canceled id is recorded in a small set and
/// skipped when it is popped, avoiding an O(n) heap search.
pub struct TimerWheel<T> {
    heap: Mutex<BinaryHeap<Reverse<Entry<T>>>>,
    canceled: Mutex<std::collections::HashSet<TimerId>>,
    next_id: std::sync::atomic::AtomicU64,
}

impl<T> TimerWheel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            canceled: Mutex::new(std::collections::HashSet::new()),
            next_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Arm a timer to fire no earlier than `after` from now, carrying
    /// `payload` for the caller to interpret when it fires.
    pub fn arm(&self, after: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, std::sync::atomic::Ordering::Relaxed));
        let deadline = Instant::now() + after;
        self.heap.lock().push(Reverse(Entry { deadline, id, payload }));
        id
    }

    /// Cancel a previously armed timer. A no-op if it already fired or
    /// was already canceled -- timers are canceled at every state
    /// transition that arms a new one, so double-cancel is
    /// routine, not an error.
    pub fn cancel(&self, id: TimerId) {
        self.canceled.lock().insert(id);
    }

    /// Pop and return every timer whose deadline has passed, in deadline
    /// order, skipping canceled ones.
    pub fn drain_expired(&self) -> Vec<T> {
        let now = Instant::now();
        let mut heap = self.heap.lock();
        let mut canceled = self.canceled.lock();
        let mut fired = Vec::new();
        while let Some(Reverse(entry)) = heap.peek() {
            if entry.deadline > now {
                break;
            }
            let Reverse(entry) = heap.pop().expect("peeked entry must pop");
            if canceled.remove(&entry.id) {
                continue;
            }
            fired.push(entry.payload);
        }
        fired
    }

    /// Duration until the next deadline, if any timer is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        let now = Instant::now();
        self.heap
            .lock()
            .peek()
            .map(|Reverse(e)| e.deadline.saturating_duration_since(now))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }
}

impl<T> Default for TimerWheel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exponential backoff with jitter, used by PSMP's W_REQ/W_MSG retry
/// timers: "the retry interval is multiplied by
/// `1 << rand(0..backoff_exp)` where `backoff_exp` saturates at 3."
#[must_use]
pub fn backoff_interval(base: Duration, attempt: u32, max_backoff_exp: u32) -> Duration {
    let exp = attempt.min(max_backoff_exp);
    let shift = fastrand::u32(0..=exp);
    base * (1u32 << shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_expired_orders_by_deadline() {
        let wheel: TimerWheel<&'static str> = TimerWheel::new();
        wheel.arm(Duration::from_millis(0), "first");
        wheel.arm(Duration::from_millis(0), "second");
        std::thread::sleep(Duration::from_millis(5));
        let fired = wheel.drain_expired();
        assert_eq!(fired, vec!["first", "second"]);
    }

    #[test]
    fn test_cancel_suppresses_firing() {
        let wheel: TimerWheel<u32> = TimerWheel::new();
        let id = wheel.arm(Duration::from_millis(0), 42);
        wheel.cancel(id);
        std::thread::sleep(Duration::from_millis(5));
        assert!(wheel.drain_expired().is_empty());
    }

    #[test]
    fn test_backoff_saturates_at_max_exp() {
        for attempt in 0..10 {
            let d = backoff_interval(Duration::from_millis(900), attempt, 3);
            assert!(d >= Duration::from_millis(900));
            assert!(d <= Duration::from_millis(900 * 8));
        }
    }
}
