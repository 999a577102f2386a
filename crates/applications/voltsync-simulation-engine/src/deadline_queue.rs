//! Ready queue ordered by deadline
//!
//! Replaces a per-tick scan over all tasks. Tasks enter the heap once, when
//! they arrive, and leave it once, when they complete; the heap top is always
//! the task a deadline-driven policy must run next.
//!
//! Ties on deadline go to the earlier arrival, then to the task that appears
//! first in the caller's input.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::types::Task;

/// Heap entry for one ready task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReadyEntry {
    deadline: u64,
    arrival_time: u64,
    index: usize,
}

// BinaryHeap is a max-heap, so every comparison is reversed
impl Ord for ReadyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.arrival_time.cmp(&self.arrival_time))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for ReadyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Earliest-deadline-first ready queue over a task slice
///
/// Holds indices into the slice it was built from; callers must pass the same
/// slice to [`DeadlineQueue::admit`].
#[derive(Debug)]
pub struct DeadlineQueue {
    ready: BinaryHeap<ReadyEntry>,
    /// Not yet arrived, in (arrival_time, index) order
    upcoming: VecDeque<(u64, usize)>,
}

impl DeadlineQueue {
    pub fn new(tasks: &[Task]) -> Self {
        let mut upcoming: Vec<(u64, usize)> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.arrival_time, i))
            .collect();
        upcoming.sort_unstable();

        DeadlineQueue {
            ready: BinaryHeap::with_capacity(tasks.len()),
            upcoming: upcoming.into(),
        }
    }

    /// Move every task with `arrival_time <= time` into the ready heap.
    /// Returns how many were admitted.
    pub fn admit(&mut self, tasks: &[Task], time: u64) -> usize {
        let mut admitted = 0;
        while let Some(&(arrival_time, index)) = self.upcoming.front() {
            if arrival_time > time {
                break;
            }
            self.upcoming.pop_front();
            self.ready.push(ReadyEntry {
                deadline: tasks[index].deadline,
                arrival_time,
                index,
            });
            admitted += 1;
        }
        admitted
    }

    /// Index of the ready task with the earliest deadline
    pub fn peek(&self) -> Option<usize> {
        self.ready.peek().map(|entry| entry.index)
    }

    /// Remove the earliest-deadline task (called when it completes)
    pub fn pop(&mut self) -> Option<usize> {
        self.ready.pop().map(|entry| entry.index)
    }

    /// Arrival time of the next task that has not been admitted yet
    pub fn next_arrival(&self) -> Option<u64> {
        self.upcoming.front().map(|&(arrival_time, _)| arrival_time)
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_drained(&self) -> bool {
        self.ready.is_empty() && self.upcoming.is_empty()
    }
}
