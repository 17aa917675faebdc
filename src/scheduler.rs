use std::time::Duration;

#[derive(Debug)]
struct Entry<T> {
    remaining: Duration,
    seq: u64,
    action: T,
}

/// Delayed-action queue advanced by the game clock.
///
/// The reward chains are sequences of named actions scheduled with fixed
/// delays; `advance` retires whatever has come due, ordered by due time and
/// then by insertion order, so chained cues always fire in the order they
/// were queued. `clear` cancels everything pending, which is how leaving the
/// playing screen guarantees no stale action lands in a fresh session.
#[derive(Debug)]
pub struct CueScheduler<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> CueScheduler<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, delay: Duration, action: T) {
        self.entries.push(Entry {
            remaining: delay,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Moves the clock forward by `dt` and returns every action whose delay
    /// has elapsed.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        let mut due: Vec<Entry<T>> = Vec::new();
        let mut rest: Vec<Entry<T>> = Vec::new();

        for mut entry in self.entries.drain(..) {
            if entry.remaining <= dt {
                due.push(entry);
            } else {
                entry.remaining -= dt;
                rest.push(entry);
            }
        }

        self.entries = rest;
        due.sort_by_key(|e| (e.remaining, e.seq));
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for CueScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
