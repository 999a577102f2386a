//! Round-robin baseline
//!
//! Tasks are admitted in arrival order (stable on ties) into a FIFO ready
//! queue. The front task runs for at most one quantum; anything that arrived
//! during that burst is queued before the task itself is requeued.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::{Result, SimError};
use crate::policies::Scheduler;
use crate::types::{record_slice, snapshot_tasks, ExecutionSlice, Schedule, Task};

/// Time-quantum round-robin scheduler. The quantum is an integer tick count.
#[derive(Debug, Clone)]
pub struct RoundRobinScheduler {
    time_quantum: u64,
}

impl RoundRobinScheduler {
    pub fn new(time_quantum: u64) -> Result<Self> {
        if time_quantum == 0 {
            return Err(SimError::InvalidQuantum(time_quantum));
        }
        Ok(RoundRobinScheduler { time_quantum })
    }

    pub fn time_quantum(&self) -> u64 {
        self.time_quantum
    }
}

/// Push every task in `arrival_order[*next..]` that has arrived by `time`
fn admit_arrivals(
    tasks: &[Task],
    arrival_order: &[usize],
    next: &mut usize,
    time: u64,
    queue: &mut VecDeque<usize>,
) {
    while let Some(&index) = arrival_order.get(*next) {
        if !tasks[index].has_arrived(time) {
            break;
        }
        trace!(task = %tasks[index].id, time, "admitted");
        queue.push_back(index);
        *next += 1;
    }
}

impl Scheduler for RoundRobinScheduler {
    fn schedule(&mut self, input: &[Task]) -> Result<Schedule> {
        let mut tasks = snapshot_tasks(input)?;
        let total = tasks.len();

        // Stable sort keeps input order among equal arrivals
        let mut arrival_order: Vec<usize> = (0..total).collect();
        arrival_order.sort_by_key(|&i| tasks[i].arrival_time);

        let mut time = 0u64;
        let mut next = 0usize;
        let mut queue = VecDeque::with_capacity(total);
        let mut completed = Vec::with_capacity(total);
        let mut timeline = Vec::new();

        while completed.len() < total {
            admit_arrivals(&tasks, &arrival_order, &mut next, time, &mut queue);

            let Some(index) = queue.pop_front() else {
                // CPU is idle until the next arrival
                let Some(&upcoming) = arrival_order.get(next) else {
                    break;
                };
                let wake = tasks[upcoming].arrival_time;
                record_slice(&mut timeline, ExecutionSlice::idle(time, wake));
                time = wake;
                continue;
            };

            let task = &mut tasks[index];
            let chunk = self.time_quantum.min(task.remaining_time.ceil() as u64);
            let finished = task.run_for(chunk as f64);
            record_slice(&mut timeline, ExecutionSlice::busy(task.id.clone(), time, time + chunk));
            time += chunk;

            // Arrivals during the burst go ahead of the preempted task
            admit_arrivals(&tasks, &arrival_order, &mut next, time, &mut queue);

            let task = &mut tasks[index];
            if finished {
                task.complete(time);
                debug!(task = %task.id, time, "task completed");
                completed.push(task.clone());
            } else {
                queue.push_back(index);
            }
        }

        debug!(policy = self.name(), total_time = time, tasks = total, "simulation finished");

        Ok(Schedule {
            policy_name: self.name().to_string(),
            completed,
            timeline,
            total_time: time,
            energy: None,
        })
    }

    fn name(&self) -> &str {
        "RoundRobin"
    }
}

/// Run round robin over `tasks` and return them in completion order.
///
/// `time_quantum` is a whole number of ticks (at least 1), matching the
/// integer execution times of [`Task`].
pub fn round_robin_schedule(tasks: &[Task], time_quantum: u64) -> Result<Vec<Task>> {
    Ok(RoundRobinScheduler::new(time_quantum)?.schedule(tasks)?.completed)
}
