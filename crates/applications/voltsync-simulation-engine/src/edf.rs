//! Earliest-deadline-first baseline
//!
//! Fully preemptive at unit granularity: the ready task with the earliest
//! deadline runs for one tick, then the choice is made again, so a newly
//! arrived task with a tighter deadline takes over mid-execution.

use tracing::{debug, trace};

use crate::deadline_queue::DeadlineQueue;
use crate::error::Result;
use crate::policies::Scheduler;
use crate::types::{record_slice, snapshot_tasks, ExecutionSlice, Schedule, Task};

/// Preemptive EDF scheduler
#[derive(Debug, Clone, Default)]
pub struct EdfScheduler;

impl EdfScheduler {
    pub fn new() -> Self {
        EdfScheduler
    }
}

impl Scheduler for EdfScheduler {
    fn schedule(&mut self, input: &[Task]) -> Result<Schedule> {
        let mut tasks = snapshot_tasks(input)?;
        let total = tasks.len();
        let mut queue = DeadlineQueue::new(&tasks);

        let mut time = 0u64;
        let mut completed = Vec::with_capacity(total);
        let mut timeline = Vec::new();

        while completed.len() < total {
            queue.admit(&tasks, time);

            let Some(index) = queue.peek() else {
                // Nothing ready: skip straight to the next arrival
                let Some(wake) = queue.next_arrival() else {
                    break;
                };
                record_slice(&mut timeline, ExecutionSlice::idle(time, wake));
                time = wake;
                continue;
            };

            let task = &mut tasks[index];
            trace!(task = %task.id, time, deadline = task.deadline, "running");
            let finished = task.run_for(1.0);
            record_slice(&mut timeline, ExecutionSlice::busy(task.id.clone(), time, time + 1));
            time += 1;

            if finished {
                task.complete(time);
                debug!(task = %task.id, time, deadline = task.deadline, "task completed");
                completed.push(task.clone());
                queue.pop();
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
        "EDF"
    }
}

/// Run EDF over `tasks` and return them in completion order
pub fn edf_schedule(tasks: &[Task]) -> Result<Vec<Task>> {
    Ok(EdfScheduler::new().schedule(tasks)?.completed)
}
