use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use hecs::Entity;

/// Work that must happen some time after the event that caused it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    /// Remove a segment, and everything attached to it, the mover left.
    DespawnSegment(Entity),
    /// Record the finished run and start a new one.
    RestartRun,
}

#[derive(Debug)]
struct Scheduled {
    due: f64,
    seq: u64,
    task: DeferredTask,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then(self.seq.cmp(&other.seq))
    }
}

/// One-shot tasks ordered by due time. Tasks due at the same time come out in
/// the order they were scheduled. Nothing runs before its due time, even with
/// a zero delay: tasks only surface through [`DeferredQueue::drain_due`].
#[derive(Default)]
pub struct DeferredQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: f64, delay: f32, task: DeferredTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled {
            due: now + f64::from(delay),
            seq,
            task,
        }));
    }

    /// Pop every task due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<DeferredTask> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.due > now {
                break;
            }
            if let Some(Reverse(next)) = self.heap.pop() {
                due.push(next.task);
            }
        }
        due
    }

    /// Pending tasks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, DeferredTask)> + '_ {
        self.heap.iter().map(|Reverse(s)| (s.due, s.task))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop everything pending. Only the owner of the queue may cancel.
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }
}
