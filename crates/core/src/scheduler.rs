//! Virtual-time "run this after a delay" queue.
//!
//! Hosts own the real clock and call [`Scheduler::pop_due`] with the
//! current time; the scheduler only orders deadlines. Every handle is unique
//! for the lifetime of the scheduler, so a handle that was cancelled or has
//! already fired can never match a newer task.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Opaque ticket for one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Pending<K> {
    due: Duration,
    handle: TaskHandle,
    key: K,
}

// Min-heap on (due, scheduling order); the key takes no part in ordering.
impl<K> Ord for Pending<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.handle.0.cmp(&self.handle.0))
    }
}

impl<K> PartialOrd for Pending<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> PartialEq for Pending<K> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<K> Eq for Pending<K> {}

#[derive(Debug)]
pub struct Scheduler<K> {
    now: Duration,
    next_handle: u64,
    queue: BinaryHeap<Pending<K>>,
    live: HashSet<TaskHandle>,
}

impl<K> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            queue: BinaryHeap::new(),
            live: HashSet::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arm `key` to fire `after` from now.
    pub fn schedule(&mut self, after: Duration, key: K) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        self.queue.push(Pending {
            due: self.now + after,
            handle,
            key,
        });
        handle
    }

    /// Returns `false` if the task already fired or was cancelled before.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.live.remove(&handle)
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Earliest deadline among live tasks.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue.peek().map(|p| p.due)
    }

    /// Take the next live task due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, K)> {
        self.discard_cancelled();
        if self.queue.peek()?.due > until {
            return None;
        }
        let task = self.queue.pop()?;
        self.live.remove(&task.handle);
        self.now = self.now.max(task.due);
        Some((task.handle, task.key))
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.queue.peek() {
            if self.live.contains(&top.handle) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
