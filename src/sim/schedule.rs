//! Flip timeline and timer scheduling
//!
//! The flip is a fixed list of half-turn steps plus an independent resolve
//! timer. Both are queued on a [`Scheduler`] that runs on virtual milliseconds,
//! so frontends feed it wall-clock deltas and tests fast-forward it.

use serde::{Deserialize, Serialize};

/// One half-turn of the flip animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipStep {
    /// 1-based step number
    pub index: u64,
    /// Offset from flip start (ms)
    pub start_ms: u64,
    pub duration_ms: u64,
    /// Progress value this step tweens toward (alternates 1, 0, 1, ...)
    pub target: f32,
}

/// Build the step list for a flip of `total_ms` split into `step_ms` half-turns
pub fn flip_sequence(total_ms: u64, step_ms: u64) -> Vec<FlipStep> {
    if step_ms == 0 {
        return Vec::new();
    }
    let count = total_ms / step_ms;
    (1..=count)
        .map(|index| FlipStep {
            index,
            start_ms: (index - 1) * step_ms,
            duration_ms: step_ms,
            target: (index % 2) as f32,
        })
        .collect()
}

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timer queue driven by an external clock
pub trait Scheduler<E> {
    /// Current time (ms since the scheduler was created)
    fn now(&self) -> u64;

    /// Queue `event` to fire `delay_ms` from now
    fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId;

    /// Drop a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Drop every pending timer, returning how many were released
    fn cancel_all(&mut self) -> usize;

    /// Number of timers still waiting
    fn pending(&self) -> usize;

    /// Move the clock forward and return every event that came due,
    /// paired with its due time, in firing order
    fn advance(&mut self, elapsed_ms: u64) -> Vec<(u64, E)>;
}

#[derive(Debug)]
struct Timer<E> {
    id: TimerId,
    due: u64,
    event: E,
}

/// Deterministic in-memory scheduler.
///
/// Timers due at the same instant fire in the order they were scheduled.
#[derive(Debug)]
pub struct VirtualClock<E> {
    now: u64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for VirtualClock<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> VirtualClock<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 1,
            timers: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> for VirtualClock<E> {
    fn now(&self) -> u64 {
        self.now
    }

    fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now.saturating_add(delay_ms),
            event,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }

    fn advance(&mut self, elapsed_ms: u64) -> Vec<(u64, E)> {
        self.now = self.now.saturating_add(elapsed_ms);
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = waiting;

        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| (t.due, t.event)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_reference_sequence() {
        let steps = flip_sequence(FLIP_TOTAL_MS, FLIP_STEP_MS);
        assert_eq!(steps.len(), 12);
        assert_eq!(steps[0].start_ms, 0);
        assert_eq!(steps[0].target, 1.0);
        assert_eq!(steps[1].target, 0.0);
        assert_eq!(steps[11].index, 12);
        assert_eq!(steps[11].start_ms, 1100);
        assert_eq!(steps[11].target, 0.0);
        assert!(steps.iter().all(|s| s.duration_ms == FLIP_STEP_MS));
    }

    #[test]
    fn test_partial_step_is_dropped() {
        assert_eq!(flip_sequence(250, 100).len(), 2);
        assert!(flip_sequence(100, 0).is_empty());
    }

    #[test]
    fn test_virtual_clock_order() {
        let mut clock = VirtualClock::new();
        clock.schedule(50, "late");
        clock.schedule(10, "first");
        clock.schedule(10, "second");

        assert!(clock.advance(9).is_empty());
        let fired: Vec<_> = clock.advance(1).into_iter().map(|(_, e)| e).collect();
        assert_eq!(fired, vec!["first", "second"]);
        assert_eq!(clock.pending(), 1);

        let fired = clock.advance(100);
        assert_eq!(fired, vec![(50, "late")]);
        assert_eq!(clock.now(), 110);
    }

    #[test]
    fn test_cancel() {
        let mut clock = VirtualClock::new();
        let a = clock.schedule(10, 'a');
        clock.schedule(10, 'b');

        assert!(clock.cancel(a));
        assert!(!clock.cancel(a));
        assert_eq!(clock.cancel_all(), 1);
        assert!(clock.advance(100).is_empty());
    }
}
